// missive/examples/error_handling.rs

use async_trait::async_trait;
use missive::{
  ExecutorBuilder, Handler, JsonSerde, Payload, RequestIdFields, RequestIdJsonDeserializer, ResultData,
};
use serde_json::{json, Value};
use tracing::{info, warn};

/// Divides `dividend` by `divisor`, answering division errors with an error payload.
struct DivideHandler;

#[async_trait]
impl Handler for DivideHandler {
  async fn handle(&self, message: &Payload) -> anyhow::Result<ResultData> {
    let dividend = message.get("dividend").and_then(|v| v.as_i64()).unwrap_or_default();
    let divisor = message.get("divisor").and_then(|v| v.as_i64()).unwrap_or_default();
    let quotient = dividend
      .checked_div(divisor)
      .ok_or_else(|| anyhow::anyhow!("cannot divide {} by {}", dividend, divisor))?;
    Ok(ResultData::try_from(json!({ "request_id": request_id(message), "quotient": quotient }))?)
  }

  async fn on_handling_failed(&self, message: &Payload, error: anyhow::Error) -> anyhow::Result<ResultData> {
    warn!(%error, "Answering with an error payload.");
    Ok(ResultData::try_from(json!({ "request_id": request_id(message), "error": error.to_string() }))?)
  }
}

fn request_id(message: &Payload) -> Value {
  message.get("request_id").cloned().unwrap_or(Value::Null)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Error Handling Example ---");

  let executor = ExecutorBuilder::<Vec<u8>, String>::with_serde(
    DivideHandler,
    RequestIdJsonDeserializer::new(RequestIdFields::from_env()?).with_required_fields(["dividend", "divisor"]),
    JsonSerde,
  )
  .build();

  let messages: [&[u8]; 5] = [
    br#"{"request_id": "a", "dividend": 9, "divisor": 3}"#,
    br#"{"request_id": "b", "dividend": 9, "divisor": 0}"#,
    br#"{"request_id": "c", "dividend": 9}"#,
    br#"{"request_id": "d", "dividend": 9"#,
    br#"{"dividend": 9, "divisor": 3}"#,
  ];

  for raw in messages {
    // a: success. b: handler fallback. c: missing divisor, answered with an error result.
    // d: not JSON, so there is no id to echo and the run is fatal. e: no request id, fatal too.
    match executor.run_for_result(&raw.to_vec()).await {
      Ok(output) => info!(output = ?output.into_vec(), "Result."),
      Err(error) => warn!(%error, "No result."),
    }
  }

  Ok(())
}
