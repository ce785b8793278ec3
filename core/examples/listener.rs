// missive/examples/listener.rs

use missive::{ChannelPublisher, ChannelSubscriber, Executor, Listener, ListenerConfig, Payload};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Listener Example ---");

  let (publisher, mut published) = ChannelPublisher::channel();
  let executor = Executor::builder(missive::handler_fn(|mut message: Payload| async move {
    message.insert("seen".to_string(), json!(true));
    Ok::<_, anyhow::Error>(message)
  }))
  .publisher(publisher)
  .build();

  // MISSIVE_ACK_MODE=early switches to at-most-once processing.
  let config = ListenerConfig::from_env()?;
  let (sender, subscriber) = ChannelSubscriber::<Value>::channel(16);
  let listener = Listener::from_config(executor, Arc::new(subscriber), &config);

  let subscription = listener.start_listening().await?;
  for n in 0..3 {
    sender.send(json!({ "n": n })).await?;
  }
  drop(sender);
  subscription.await??;

  while let Ok(result) = published.try_recv() {
    info!(status = %result.status(), data = ?result.data(), "Published.");
  }
  let acked = listener.subscriber().take_acked();
  info!(count = acked.len(), total = listener.subscriber().acked_count(), "Messages acknowledged.");

  Ok(())
}
