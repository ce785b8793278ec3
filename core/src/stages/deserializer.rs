// missive/src/stages/deserializer.rs

use crate::core::payload::Payload;
use crate::error::MissiveError;
use std::sync::Arc;

/// Turns a raw message `M` into a [`Payload`] for the handler.
///
/// Deserializers are synchronous: they are expected to be pure transformations.
pub trait Deserializer<M>: Send + Sync {
  /// Parses `message`. Any error counts as a deserialization failure.
  fn deserialize(&self, message: &M) -> anyhow::Result<Payload>;

  /// Builds a best-effort payload describing why `message` could not be deserialized
  /// (for example, echoing a request id so the caller can correlate the failure).
  ///
  /// The executor wraps the returned payload as a failed `HandlingResult` and carries on
  /// to serialization. If this fails too, the run is fatal. The default re-raises `error`.
  fn build_error_result(&self, message: &M, error: MissiveError) -> anyhow::Result<Payload> {
    let _ = message;
    Err(error.into())
  }
}

impl<M, D> Deserializer<M> for Arc<D>
where
  D: Deserializer<M> + ?Sized,
{
  fn deserialize(&self, message: &M) -> anyhow::Result<Payload> {
    (**self).deserialize(message)
  }

  fn build_error_result(&self, message: &M, error: MissiveError) -> anyhow::Result<Payload> {
    (**self).build_error_result(message, error)
  }
}
