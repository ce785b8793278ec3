// missive/src/executor/hooks.rs

//! Lifecycle callbacks fired by the executor after every stage and every failure.

use crate::core::control::Flow;
use crate::core::payload::{Payload, Serialized};
use crate::core::result::HandlingResult;
use crate::error::MissiveError;
use async_trait::async_trait;

/// Observation and steering points of a pipeline run.
///
/// Every method defaults to a no-op, so implementors override only what they care about.
/// `message` is `None` when the run was started without a message.
///
/// Returning `Err(StopPipeline)` from any method that returns [`Flow`] halts the run: the
/// remaining stages and the publish attempt are skipped, `on_stopped` fires with the reason
/// and `on_finished` does not fire.
#[async_trait]
pub trait ExecutorCallbacks<M, O>: Send + Sync
where
  M: Send + Sync + 'static,
  O: Send + Sync + 'static,
{
  /// Always fires first.
  async fn on_received(&self, message: Option<&M>) -> Flow {
    let _ = message;
    Ok(())
  }

  async fn on_deserialized(&self, message: Option<&M>, parsed: &Payload) -> Flow {
    let _ = (message, parsed);
    Ok(())
  }

  /// Fires before the deserializer is asked for an error result.
  async fn on_deserialization_failed(&self, message: Option<&M>, error: &MissiveError) -> Flow {
    let _ = (message, error);
    Ok(())
  }

  /// `result` is `Err` when the handler failed and its fallback produced the data.
  async fn on_handled(&self, message: Option<&M>, parsed: &Payload, result: &HandlingResult) -> Flow {
    let _ = (message, parsed, result);
    Ok(())
  }

  /// The handler's fallback failed; the run is fatal.
  async fn on_handling_failed(&self, message: Option<&M>, parsed: &Payload, error: &MissiveError) -> Flow {
    let _ = (message, parsed, error);
    Ok(())
  }

  /// `serialized` is `None` when the result carried no payload.
  async fn on_serialized(
    &self,
    message: Option<&M>,
    result: &HandlingResult,
    serialized: Option<&Serialized<O>>,
  ) -> Flow {
    let _ = (message, result, serialized);
    Ok(())
  }

  async fn on_serialization_failed(&self, message: Option<&M>, result: &HandlingResult, error: &MissiveError) -> Flow {
    let _ = (message, result, error);
    Ok(())
  }

  async fn on_published(&self, message: Option<&M>, result: &HandlingResult) -> Flow {
    let _ = (message, result);
    Ok(())
  }

  async fn on_publishing_failed(&self, message: Option<&M>, result: &HandlingResult, error: &MissiveError) -> Flow {
    let _ = (message, result, error);
    Ok(())
  }

  /// Fires exactly once per run that was not stopped. `error` is set for fatal
  /// deserialization/handling failures and for publishing failures.
  async fn on_finished(&self, message: Option<&M>, error: Option<&MissiveError>) -> Flow {
    let _ = (message, error);
    Ok(())
  }

  /// Fires instead of `on_finished` when a callback stopped the run.
  async fn on_stopped(&self, message: Option<&M>, reason: &str) {
    let _ = (message, reason);
  }

  /// Fired by a `Listener` once the message source confirmed the acknowledgment.
  async fn on_acknowledged(&self, message: &M) {
    let _ = message;
  }
}

/// Callbacks that do nothing. The executor's default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCallbacks;

impl<M, O> ExecutorCallbacks<M, O> for NoopCallbacks
where
  M: Send + Sync + 'static,
  O: Send + Sync + 'static,
{
}
