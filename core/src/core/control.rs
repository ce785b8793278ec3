// missive/src/core/control.rs

//! Defines the signals for controlling pipeline flow and the outcome of a pipeline run.

use crate::error::MissiveError;
use thiserror::Error;

/// Cooperative request to halt the pipeline, returned by a callback.
///
/// This is not a stage failure. Wherever it is returned, the executor skips every remaining
/// stage (including publishing), fires `on_stopped` with the reason and does not fire
/// `on_finished` for that run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("pipeline stopped: {reason}")]
pub struct StopPipeline {
  pub reason: String,
}

impl StopPipeline {
  pub fn new(reason: impl Into<String>) -> Self {
    Self { reason: reason.into() }
  }
}

/// Return type of every steering callback: `Ok(())` to continue, `Err(StopPipeline)` to halt.
pub type Flow = Result<(), StopPipeline>;

/// Outcome of `Executor::run`.
#[derive(Debug)]
pub enum RunOutcome {
  /// The pipeline reached FINISHED. `error` is the terminal error handed to `on_finished`
  /// (a fatal deserialization/handling failure, or a publishing failure).
  Finished { error: Option<MissiveError> },
  /// A callback stopped the pipeline.
  Stopped { reason: String },
}

impl RunOutcome {
  pub fn is_stopped(&self) -> bool {
    matches!(self, RunOutcome::Stopped { .. })
  }

  /// Finished without a terminal error.
  pub fn is_clean(&self) -> bool {
    matches!(self, RunOutcome::Finished { error: None })
  }

  pub fn error(&self) -> Option<&MissiveError> {
    match self {
      RunOutcome::Finished { error } => error.as_ref(),
      RunOutcome::Stopped { .. } => None,
    }
  }
}
