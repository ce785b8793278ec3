// missive/src/listener/acking.rs

//! Defines the `Listener`, which runs an executor for every message of a subscription.

use crate::config::{AckMode, ListenerConfig};
use crate::core::control::RunOutcome;
use crate::executor::Executor;
use crate::listener::subscriber::{MessageCallback, SubscriberWithAck, Subscription};
use futures::FutureExt;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Wraps an [`Executor`] with a message source and an acknowledgment policy.
///
/// With [`AckMode::Early`] a message is acknowledged before its pipeline runs (lowest ack
/// latency, at-most-once processing). With [`AckMode::Late`] it is acknowledged after the
/// pipeline finished or was stopped (at-least-once processing: a crash mid-pipeline leads to
/// redelivery). Apart from acking, everything is delegated to [`Executor::run`].
pub struct Listener<M, O, S>
where
  M: Send + Sync + 'static,
  O: Send + Sync + 'static,
{
  executor: Executor<M, O>,
  subscriber: Arc<S>,
  ack_mode: AckMode,
}

impl<M, O, S> Clone for Listener<M, O, S>
where
  M: Send + Sync + 'static,
  O: Send + Sync + 'static,
{
  fn clone(&self) -> Self {
    Self {
      executor: self.executor.clone(),
      subscriber: Arc::clone(&self.subscriber),
      ack_mode: self.ack_mode,
    }
  }
}

impl<M, O, S> Listener<M, O, S>
where
  M: Send + Sync + 'static,
  O: Send + Sync + 'static,
  S: SubscriberWithAck<M> + 'static,
{
  pub fn new(executor: Executor<M, O>, subscriber: Arc<S>, ack_mode: AckMode) -> Self {
    Self {
      executor,
      subscriber,
      ack_mode,
    }
  }

  pub fn early_ack(executor: Executor<M, O>, subscriber: Arc<S>) -> Self {
    Self::new(executor, subscriber, AckMode::Early)
  }

  pub fn late_ack(executor: Executor<M, O>, subscriber: Arc<S>) -> Self {
    Self::new(executor, subscriber, AckMode::Late)
  }

  pub fn from_config(executor: Executor<M, O>, subscriber: Arc<S>, config: &ListenerConfig) -> Self {
    Self::new(executor, subscriber, config.ack_mode)
  }

  pub fn executor(&self) -> &Executor<M, O> {
    &self.executor
  }

  pub fn subscriber(&self) -> &Arc<S> {
    &self.subscriber
  }

  pub fn ack_mode(&self) -> AckMode {
    self.ack_mode
  }

  /// Subscribes to the message source; every delivered message goes through [`Listener::process`].
  pub async fn start_listening(&self) -> anyhow::Result<Subscription> {
    event!(Level::INFO, ack_mode = %self.ack_mode, "Listener subscribing.");
    let listener = self.clone();
    let callback: MessageCallback<M> = Arc::new(move |message: M| {
      let listener = listener.clone();
      async move {
        listener.process(message).await;
      }
      .boxed()
    });
    self.subscriber.subscribe(callback).await
  }

  /// Acknowledges `message` according to the ack mode and runs the pipeline on it.
  #[instrument(name = "Listener::process", skip_all, fields(ack_mode = %self.ack_mode))]
  pub async fn process(&self, message: M) -> RunOutcome {
    match self.ack_mode {
      AckMode::Early => {
        self.acknowledge(&message).await;
        self.executor.run(&message).await
      }
      AckMode::Late => {
        let outcome = self.executor.run(&message).await;
        self.acknowledge(&message).await;
        outcome
      }
    }
  }

  async fn acknowledge(&self, message: &M) {
    match self.subscriber.ack(message).await {
      Ok(()) => {
        event!(Level::DEBUG, "Message acknowledged.");
        self.executor.callbacks.on_acknowledged(message).await;
      }
      Err(error) => {
        event!(Level::ERROR, error = %error, "Message acknowledgment failed.");
      }
    }
  }
}
