// tests/executor_flow_tests.rs
mod common;

use async_trait::async_trait;
use common::*;
use missive::{
  handler_fn, ChannelPublisher, Executor, ExecutorBuilder, Handler, HandlingResult, HandlingStatus, JsonSerde, Payload,
  ResultData, RunOutcome, Serialized,
};
use serde_json::{json, Value};
use serial_test::serial;
use std::sync::Arc;

#[tokio::test]
#[serial]
async fn test_defaults_return_handler_payload() {
  setup_tracing();
  let executor = Executor::new(ConstHandler::new(answer()));
  assert!(!executor.has_publisher());

  let output = executor.run_for_result(None).await.unwrap();
  assert_eq!(output, Serialized::One(answer()));
}

#[tokio::test]
#[serial]
async fn test_absent_message_is_an_empty_payload() {
  setup_tracing();
  let deserializer = Arc::new(SpamDeserializer::default());
  let recorder = Recorder::new();
  let executor = ExecutorBuilder::<String, String>::with_serde(EchoHandler, deserializer.clone(), TextSerializer)
    .callbacks(recorder.clone())
    .build();

  let output = executor.run_for_result(None).await.unwrap();

  assert_eq!(output, Serialized::One("{}".to_string()));
  assert_eq!(deserializer.calls(), 0, "the deserializer must not see an absent message");
  assert_eq!(recorder.absent_messages(), 1);
  assert_eq!(recorder.events(), vec!["received", "deserialized", "handled", "serialized", "finished"]);
}

#[tokio::test]
#[serial]
async fn test_dummy_serde_treats_null_as_empty_payload() {
  setup_tracing();
  let executor = Executor::new(EchoHandler);
  let output = executor.run_for_result(&Value::Null).await.unwrap();
  assert_eq!(output, Serialized::One(Payload::new()));
}

#[tokio::test]
#[serial]
async fn test_successful_run_fires_callbacks_in_order() {
  setup_tracing();
  let recorder = Recorder::new();
  let executor = Executor::builder(EchoHandler).callbacks(recorder.clone()).build();

  let outcome = executor.run(&json!({ "info": "hello" })).await;

  assert!(outcome.is_clean());
  assert_eq!(recorder.events(), vec!["received", "deserialized", "handled", "serialized", "finished"]);
  assert_eq!(recorder.finished_errors(), vec![None]);
  assert_eq!(recorder.absent_messages(), 0);
}

#[tokio::test]
#[serial]
async fn test_successful_run_publishes_when_publisher_is_set() {
  setup_tracing();
  let recorder = Recorder::new();
  let (publisher, mut published) = ChannelPublisher::channel();
  let executor = Executor::builder(ConstHandler::new(answer()))
    .publisher(publisher)
    .callbacks(recorder.clone())
    .build();
  assert!(executor.has_publisher());

  let outcome = executor.run(&json!({ "info": "hello" })).await;

  assert!(outcome.is_clean());
  assert_eq!(
    recorder.events(),
    vec!["received", "deserialized", "handled", "serialized", "published", "finished"]
  );
  let result = published.try_recv().unwrap();
  assert_eq!(result.status(), HandlingStatus::Ok);
  assert_eq!(result.data(), &ResultData::Single(answer()));
  assert!(published.try_recv().is_err(), "exactly one result is published");
}

#[tokio::test]
#[serial]
async fn test_run_for_result_never_publishes() {
  setup_tracing();
  let recorder = Recorder::new();
  let (publisher, mut published) = ChannelPublisher::channel();
  let executor = Executor::builder(ConstHandler::new(answer()))
    .publisher(publisher)
    .callbacks(recorder.clone())
    .build();

  let output = executor.run_for_result(&json!({})).await.unwrap();

  assert_eq!(output, Serialized::One(answer()));
  assert_eq!(recorder.count("published"), 0);
  assert!(published.try_recv().is_err());
}

#[tokio::test]
#[serial]
async fn test_handler_fallback_result_is_serialized_and_published() {
  setup_tracing();
  let recorder = Recorder::new();
  let (publisher, mut published) = ChannelPublisher::channel();
  let fallback = payload(json!({ "error": "handled badly" }));
  let executor = Executor::builder(FailingHandler {
    fallback: Fallback::Recover(fallback.clone()),
  })
  .publisher(publisher)
  .callbacks(recorder.clone())
  .build();

  let outcome = executor.run(&json!({ "info": "hello" })).await;

  assert!(outcome.is_clean());
  assert_eq!(recorder.handled()[0].status(), HandlingStatus::Err);
  assert_eq!(recorder.count("handling_failed"), 0, "a recovered handler failure is not fatal");
  let result = published.try_recv().unwrap();
  assert_eq!(result.status(), HandlingStatus::Err);
  assert_eq!(result.data(), &ResultData::Single(fallback));
}

#[tokio::test]
#[serial]
async fn test_many_payloads_are_serialized_independently() {
  setup_tracing();
  let items = vec![payload(json!({ "n": 1 })), payload(json!({ "n": 2 }))];
  let executor = Executor::new(ConstHandler::new(items.clone()));

  let output = executor.run_for_result(None).await.unwrap();

  assert_eq!(output, Serialized::Many(items));
}

#[tokio::test]
#[serial]
async fn test_no_payload_means_no_result_and_no_publish() {
  setup_tracing();
  let recorder = Recorder::new();
  let (publisher, mut published) = ChannelPublisher::channel();
  let executor = Executor::builder(ConstHandler::new(()))
    .publisher(publisher)
    .callbacks(recorder.clone())
    .build();

  let outcome = executor.run(None).await;
  assert!(outcome.is_clean());
  assert_eq!(recorder.events(), vec!["received", "deserialized", "handled", "serialized", "finished"]);
  assert!(published.try_recv().is_err());

  let err = executor.run_for_result(None).await.unwrap_err();
  assert!(err.is_fetched_no_result());
  assert!(err.to_string().contains("no serialized output"), "got: {err}");
}

#[tokio::test]
#[serial]
async fn test_run_for_result_is_idempotent_for_pure_stages() {
  setup_tracing();
  let executor = Executor::new(EchoHandler);
  let message = json!({ "request_id": "abc", "label": 4 });

  let first = executor.run_for_result(&message).await.unwrap();
  let second = executor.run_for_result(&message).await.unwrap();

  assert_eq!(first, second);
}

#[tokio::test]
#[serial]
async fn test_custom_message_and_output_types() {
  setup_tracing();
  let handler = handler_fn(|message: Payload| async move {
    let label = message.get("label").and_then(Value::as_i64).unwrap_or_default();
    Ok::<_, anyhow::Error>(payload(json!({ "doubled": label * 2 })))
  });
  let executor = ExecutorBuilder::<String, String>::with_serde(handler, JsonSerde, JsonSerde).build();

  let output = executor
    .run_for_result(&r#"{"request_id": "123", "label": 4}"#.to_string())
    .await
    .unwrap();

  assert_eq!(output.into_one().unwrap(), r#"{"doubled":8}"#);
}

#[tokio::test]
#[serial]
async fn test_cloned_executor_serves_concurrent_runs() {
  setup_tracing();
  let handler = Arc::new(ConstHandler::new(answer()));
  let executor = Executor::new(handler.clone());

  let mut tasks = Vec::new();
  for i in 0..8 {
    let executor = executor.clone();
    tasks.push(tokio::spawn(async move {
      executor.run(&json!({ "n": i })).await
    }));
  }
  for task in tasks {
    assert!(matches!(task.await.unwrap(), RunOutcome::Finished { error: None }));
  }
  assert_eq!(handler.calls(), 8);
}

/// Answers from `invoke` directly; `handle` alone would produce nothing.
struct ShortCircuitHandler;

#[async_trait]
impl Handler for ShortCircuitHandler {
  async fn handle(&self, _message: &Payload) -> anyhow::Result<ResultData> {
    Ok(ResultData::None)
  }

  async fn invoke(&self, _message: &Payload) -> anyhow::Result<HandlingResult> {
    Ok(HandlingResult::ok(answer()))
  }
}

#[tokio::test]
#[serial]
async fn test_shared_handler_keeps_its_invoke_override() {
  setup_tracing();
  let direct = Executor::new(ShortCircuitHandler);
  let shared = Executor::new(Arc::new(ShortCircuitHandler));

  assert_eq!(direct.run_for_result(None).await.unwrap(), Serialized::One(answer()));
  assert_eq!(shared.run_for_result(None).await.unwrap(), Serialized::One(answer()));
}
