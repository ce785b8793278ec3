// missive/src/executor/definition.rs

//! Contains the `Executor<M, O>` struct definition and its builder.

use crate::core::payload::Payload;
use crate::executor::hooks::{ExecutorCallbacks, NoopCallbacks};
use crate::stages::{Deserializer, DummySerde, Handler, Publisher, Serializer};
use serde_json::Value;
use std::sync::Arc;

/// The pipeline orchestrator, generic over the raw message type `M` and the serialized
/// output type `O`.
///
/// An executor is configured once and never mutated afterwards. Every collaborator sits
/// behind an `Arc`, so cloning is cheap and one executor can serve any number of runs,
/// sequential or concurrent.
pub struct Executor<M, O = Payload>
where
  M: Send + Sync + 'static,
  O: Send + Sync + 'static,
{
  pub(crate) handler: Arc<dyn Handler>,
  pub(crate) deserializer: Arc<dyn Deserializer<M>>,
  pub(crate) serializer: Arc<dyn Serializer<Output = O>>,
  pub(crate) publisher: Option<Arc<dyn Publisher>>,
  pub(crate) callbacks: Arc<dyn ExecutorCallbacks<M, O>>,
}

impl<M, O> Clone for Executor<M, O>
where
  M: Send + Sync + 'static,
  O: Send + Sync + 'static,
{
  fn clone(&self) -> Self {
    Self {
      handler: Arc::clone(&self.handler),
      deserializer: Arc::clone(&self.deserializer),
      serializer: Arc::clone(&self.serializer),
      publisher: self.publisher.clone(),
      callbacks: Arc::clone(&self.callbacks),
    }
  }
}

impl<M, O> std::fmt::Debug for Executor<M, O>
where
  M: Send + Sync + 'static,
  O: Send + Sync + 'static,
{
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Executor")
      .field("message_type", &std::any::type_name::<M>())
      .field("output_type", &std::any::type_name::<O>())
      .field("publisher_present", &self.publisher.is_some())
      .finish()
  }
}

impl Executor<Value, Payload> {
  /// An executor with the identity serde on both ends, no publisher and no callbacks.
  pub fn new(handler: impl Handler + 'static) -> Self {
    Self::builder(handler).build()
  }

  /// Starts a builder whose deserializer and serializer default to [`DummySerde`].
  pub fn builder(handler: impl Handler + 'static) -> ExecutorBuilder<Value, Payload> {
    ExecutorBuilder::with_serde(handler, DummySerde, DummySerde)
  }
}

impl<M, O> Executor<M, O>
where
  M: Send + Sync + 'static,
  O: Send + Sync + 'static,
{
  pub fn has_publisher(&self) -> bool {
    self.publisher.is_some()
  }
}

/// Collects an executor's collaborators. `build` freezes them.
pub struct ExecutorBuilder<M, O>
where
  M: Send + Sync + 'static,
  O: Send + Sync + 'static,
{
  handler: Arc<dyn Handler>,
  deserializer: Arc<dyn Deserializer<M>>,
  serializer: Arc<dyn Serializer<Output = O>>,
  publisher: Option<Arc<dyn Publisher>>,
  callbacks: Arc<dyn ExecutorCallbacks<M, O>>,
}

impl<M, O> ExecutorBuilder<M, O>
where
  M: Send + Sync + 'static,
  O: Send + Sync + 'static,
{
  /// Starts a builder for custom message and output types.
  pub fn with_serde(
    handler: impl Handler + 'static,
    deserializer: impl Deserializer<M> + 'static,
    serializer: impl Serializer<Output = O> + 'static,
  ) -> Self {
    Self {
      handler: Arc::new(handler),
      deserializer: Arc::new(deserializer),
      serializer: Arc::new(serializer),
      publisher: None,
      callbacks: Arc::new(NoopCallbacks),
    }
  }

  pub fn deserializer(mut self, deserializer: impl Deserializer<M> + 'static) -> Self {
    self.deserializer = Arc::new(deserializer);
    self
  }

  pub fn serializer(mut self, serializer: impl Serializer<Output = O> + 'static) -> Self {
    self.serializer = Arc::new(serializer);
    self
  }

  /// Adds the publish stage. Without a publisher, `run` stops after serialization.
  pub fn publisher(mut self, publisher: impl Publisher + 'static) -> Self {
    self.publisher = Some(Arc::new(publisher));
    self
  }

  /// Installs lifecycle callbacks. Taking an `Arc` lets the caller keep a handle on them.
  pub fn callbacks<C>(mut self, callbacks: Arc<C>) -> Self
  where
    C: ExecutorCallbacks<M, O> + 'static,
  {
    self.callbacks = callbacks;
    self
  }

  pub fn build(self) -> Executor<M, O> {
    Executor {
      handler: self.handler,
      deserializer: self.deserializer,
      serializer: self.serializer,
      publisher: self.publisher,
      callbacks: self.callbacks,
    }
  }
}
