// missive/examples/basic_execution.rs

use missive::{handler_fn, ChannelPublisher, Executor, Payload, Serialized};
use serde_json::json;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Execution Example ---");

  // 1. Business logic: double the "label" field.
  let handler = handler_fn(|message: Payload| async move {
    let label = message
      .get("label")
      .and_then(|v| v.as_i64())
      .ok_or_else(|| anyhow::anyhow!("'label' must be an integer"))?;
    let mut out = Payload::new();
    out.insert("doubled".to_string(), json!(label * 2));
    Ok::<_, anyhow::Error>(out)
  });

  // 2. An executor with the identity serde and a channel-backed publisher.
  let (publisher, mut published) = ChannelPublisher::channel();
  let executor = Executor::builder(handler).publisher(publisher).build();

  // 3. Request/response style: the serialized output comes back to the caller.
  let output = executor.run_for_result(&json!({ "label": 21 })).await?;
  if let Serialized::One(payload) = &output {
    info!(?payload, "run_for_result returned.");
  }

  // 4. Fire-and-forget style: the result goes to the publisher.
  let outcome = executor.run(&json!({ "label": 4 })).await;
  info!(clean = outcome.is_clean(), "run finished.");
  while let Ok(result) = published.try_recv() {
    info!(status = %result.status(), data = ?result.data(), "Published result.");
  }

  // 5. A failing handler without a fallback makes the run fatal.
  let outcome = executor.run(&json!({ "label": "four" })).await;
  if let Some(error) = outcome.error() {
    info!(%error, "run failed as expected.");
  }

  Ok(())
}
