// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use missive::{
  Deserializer, ExecutorCallbacks, Flow, Handler, HandlingResult, MissiveError, Payload, Publisher, ResultData,
  Serialized, Serializer, StopPipeline,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::Level;

// --- Payload helpers ---
pub fn payload(value: Value) -> Payload {
  match value {
    Value::Object(map) => map,
    other => panic!("test payload must be an object, got {other}"),
  }
}

pub fn answer() -> Payload {
  payload(json!({ "result": 42 }))
}

// --- Recording callbacks ---

/// Records every callback it receives, optionally stopping the pipeline at one of them.
#[derive(Default)]
pub struct Recorder {
  stop_at: Option<&'static str>,
  events: Mutex<Vec<&'static str>>,
  absent_messages: AtomicUsize,
  stage_errors: Mutex<Vec<String>>,
  finished_errors: Mutex<Vec<Option<String>>>,
  stopped_reasons: Mutex<Vec<String>>,
  handled: Mutex<Vec<HandlingResult>>,
  published: Mutex<Vec<HandlingResult>>,
}

impl Recorder {
  pub fn new() -> std::sync::Arc<Self> {
    std::sync::Arc::new(Self::default())
  }

  pub fn stopping_at(event: &'static str) -> std::sync::Arc<Self> {
    std::sync::Arc::new(Self {
      stop_at: Some(event),
      ..Self::default()
    })
  }

  pub fn events(&self) -> Vec<&'static str> {
    self.events.lock().clone()
  }

  pub fn count(&self, event: &str) -> usize {
    self.events.lock().iter().filter(|e| **e == event).count()
  }

  pub fn absent_messages(&self) -> usize {
    self.absent_messages.load(Ordering::SeqCst)
  }

  /// Display strings of errors handed to the `*_failed` callbacks.
  pub fn stage_errors(&self) -> Vec<String> {
    self.stage_errors.lock().clone()
  }

  pub fn finished_errors(&self) -> Vec<Option<String>> {
    self.finished_errors.lock().clone()
  }

  pub fn stopped_reasons(&self) -> Vec<String> {
    self.stopped_reasons.lock().clone()
  }

  pub fn handled(&self) -> Vec<HandlingResult> {
    self.handled.lock().clone()
  }

  pub fn published(&self) -> Vec<HandlingResult> {
    self.published.lock().clone()
  }

  fn record(&self, event: &'static str) -> Flow {
    self.events.lock().push(event);
    tracing::debug!(target: "test_callbacks", event, "callback fired");
    match self.stop_at {
      Some(stop) if stop == event => Err(StopPipeline::new(format!("stopped at {event}"))),
      _ => Ok(()),
    }
  }

  fn record_error(&self, event: &'static str, error: &MissiveError) -> Flow {
    self.stage_errors.lock().push(error.to_string());
    self.record(event)
  }
}

#[async_trait]
impl<M, O> ExecutorCallbacks<M, O> for Recorder
where
  M: Send + Sync + 'static,
  O: Send + Sync + 'static,
{
  async fn on_received(&self, message: Option<&M>) -> Flow {
    if message.is_none() {
      self.absent_messages.fetch_add(1, Ordering::SeqCst);
    }
    self.record("received")
  }

  async fn on_deserialized(&self, _message: Option<&M>, _parsed: &Payload) -> Flow {
    self.record("deserialized")
  }

  async fn on_deserialization_failed(&self, _message: Option<&M>, error: &MissiveError) -> Flow {
    self.record_error("deserialization_failed", error)
  }

  async fn on_handled(&self, _message: Option<&M>, _parsed: &Payload, result: &HandlingResult) -> Flow {
    self.handled.lock().push(result.clone());
    self.record("handled")
  }

  async fn on_handling_failed(&self, _message: Option<&M>, _parsed: &Payload, error: &MissiveError) -> Flow {
    self.record_error("handling_failed", error)
  }

  async fn on_serialized(&self, _message: Option<&M>, _result: &HandlingResult, _serialized: Option<&Serialized<O>>) -> Flow {
    self.record("serialized")
  }

  async fn on_serialization_failed(&self, _message: Option<&M>, _result: &HandlingResult, error: &MissiveError) -> Flow {
    self.record_error("serialization_failed", error)
  }

  async fn on_published(&self, _message: Option<&M>, result: &HandlingResult) -> Flow {
    self.published.lock().push(result.clone());
    self.record("published")
  }

  async fn on_publishing_failed(&self, _message: Option<&M>, _result: &HandlingResult, error: &MissiveError) -> Flow {
    self.record_error("publishing_failed", error)
  }

  async fn on_finished(&self, _message: Option<&M>, error: Option<&MissiveError>) -> Flow {
    self.finished_errors.lock().push(error.map(ToString::to_string));
    self.record("finished")
  }

  async fn on_stopped(&self, _message: Option<&M>, reason: &str) {
    self.stopped_reasons.lock().push(reason.to_string());
    self.events.lock().push("stopped");
  }

  async fn on_acknowledged(&self, _message: &M) {
    self.events.lock().push("acknowledged");
  }
}

// --- Handlers ---

/// Returns the same data for every message and counts its calls.
pub struct ConstHandler {
  data: ResultData,
  calls: AtomicUsize,
}

impl ConstHandler {
  pub fn new(data: impl Into<ResultData>) -> Self {
    Self {
      data: data.into(),
      calls: AtomicUsize::new(0),
    }
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl Handler for ConstHandler {
  async fn handle(&self, _message: &Payload) -> anyhow::Result<ResultData> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    Ok(self.data.clone())
  }
}

/// Returns the parsed message unchanged.
pub struct EchoHandler;

#[async_trait]
impl Handler for EchoHandler {
  async fn handle(&self, message: &Payload) -> anyhow::Result<ResultData> {
    Ok(ResultData::Single(message.clone()))
  }
}

pub enum Fallback {
  /// The fallback succeeds with this payload.
  Recover(Payload),
  /// The fallback hands back the error it was given.
  ReRaise,
  /// The fallback fails with its own error wrapping the original one.
  Wrap(&'static str),
}

/// Always fails with "original boom", then runs the configured fallback.
pub struct FailingHandler {
  pub fallback: Fallback,
}

#[async_trait]
impl Handler for FailingHandler {
  async fn handle(&self, _message: &Payload) -> anyhow::Result<ResultData> {
    Err(anyhow::anyhow!("original boom"))
  }

  async fn on_handling_failed(&self, _message: &Payload, error: anyhow::Error) -> anyhow::Result<ResultData> {
    match &self.fallback {
      Fallback::Recover(payload) => Ok(ResultData::Single(payload.clone())),
      Fallback::ReRaise => Err(error),
      Fallback::Wrap(context) => Err(error.context(*context)),
    }
  }
}

// --- Deserializers ---

/// Deserializes every string message into `{"spam": "eggs"}` and counts its calls.
#[derive(Default)]
pub struct SpamDeserializer {
  calls: AtomicUsize,
}

impl SpamDeserializer {
  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

impl Deserializer<String> for SpamDeserializer {
  fn deserialize(&self, _message: &String) -> anyhow::Result<Payload> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    Ok(payload(json!({ "spam": "eggs" })))
  }
}

/// Fails every message with a missing-key error. `error_result` decides what
/// `build_error_result` does: `Some` returns it, `None` fails.
pub struct BrokenDeserializer {
  pub error_result: Option<Payload>,
}

impl Deserializer<String> for BrokenDeserializer {
  fn deserialize(&self, _message: &String) -> anyhow::Result<Payload> {
    Err(anyhow::anyhow!("KeyError: 'spam'"))
  }

  fn build_error_result(&self, _message: &String, error: MissiveError) -> anyhow::Result<Payload> {
    match &self.error_result {
      Some(result) => Ok(result.clone()),
      None => Err(anyhow::Error::from(error).context("error result unavailable")),
    }
  }
}

/// Fails every message and keeps the default `build_error_result`.
pub struct StrictDeserializer;

impl Deserializer<String> for StrictDeserializer {
  fn deserialize(&self, _message: &String) -> anyhow::Result<Payload> {
    Err(anyhow::anyhow!("schema mismatch"))
  }
}

// --- Serializers ---

pub struct FailingSerializer;

impl Serializer for FailingSerializer {
  type Output = Payload;

  fn serialize(&self, _payload: &Payload) -> anyhow::Result<Payload> {
    Err(anyhow::anyhow!("unserializable payload"))
  }
}

/// Serializes a payload into its compact JSON text.
pub struct TextSerializer;

impl Serializer for TextSerializer {
  type Output = String;

  fn serialize(&self, payload: &Payload) -> anyhow::Result<String> {
    Ok(serde_json::to_string(payload)?)
  }
}

// --- Publishers ---

pub struct FailingPublisher;

#[async_trait]
impl Publisher for FailingPublisher {
  async fn publish_result(&self, _result: &HandlingResult) -> anyhow::Result<()> {
    Err(anyhow::anyhow!("broker unavailable"))
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
