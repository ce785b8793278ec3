// missive/examples/pipeline_stop.rs

use async_trait::async_trait;
use missive::{Executor, ExecutorCallbacks, Flow, HandlingResult, Payload, RunOutcome, StopPipeline};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// Stops every message flagged as a duplicate before it reaches the serializer.
struct DedupCallbacks;

#[async_trait]
impl ExecutorCallbacks<Value, Payload> for DedupCallbacks {
  async fn on_received(&self, message: Option<&Value>) -> Flow {
    if message.is_none() {
      return Err(StopPipeline::new("nothing to process"));
    }
    Ok(())
  }

  async fn on_handled(&self, _message: Option<&Value>, parsed: &Payload, result: &HandlingResult) -> Flow {
    info!(status = %result.status(), "Handled.");
    if parsed.get("duplicate").and_then(Value::as_bool).unwrap_or(false) {
      return Err(StopPipeline::new("duplicate delivery"));
    }
    Ok(())
  }

  async fn on_stopped(&self, _message: Option<&Value>, reason: &str) {
    info!(reason, "Pipeline stopped.");
  }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Pipeline Stop Example ---");

  let executor = Executor::builder(missive::handler_fn(|message: Payload| async move {
    Ok::<_, anyhow::Error>(message)
  }))
  .callbacks(Arc::new(DedupCallbacks))
  .build();

  for message in [json!({ "id": 1 }), json!({ "id": 1, "duplicate": true })] {
    match executor.run(&message).await {
      RunOutcome::Finished { error: None } => info!(%message, "Processed."),
      RunOutcome::Finished { error: Some(error) } => info!(%message, %error, "Failed."),
      RunOutcome::Stopped { reason } => info!(%message, reason, "Skipped."),
    }
  }

  // Stopping is not an error for `run`, but `run_for_result` has nothing to return.
  let err = executor.run_for_result(None).await.unwrap_err();
  assert!(err.is_fetched_no_result());
  info!(%err, "run_for_result on an absent message.");

  Ok(())
}
