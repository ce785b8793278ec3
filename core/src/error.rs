// missive/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Why `Executor::run_for_result` had nothing to hand back.
#[derive(Debug, Error)]
pub enum NoResultCause {
  #[error("pipeline was stopped: {reason}")]
  Stopped { reason: String },

  #[error("pipeline failed: {0}")]
  Failed(#[source] Box<MissiveError>),

  #[error("pipeline produced no serialized output")]
  Empty,
}

#[derive(Debug, Error)]
pub enum MissiveError {
  #[error("Deserialization failed. Source: {source}")]
  Deserialization {
    #[source]
    source: AnyhowError,
  },

  #[error("Could not build an error result for an undeserializable message. Source: {source}")]
  ErrorResult {
    #[source]
    source: AnyhowError,
  },

  #[error("Handler fallback failed. Source: {source}")]
  Handling {
    #[source]
    source: AnyhowError,
  },

  #[error("Serialization failed. Source: {source}")]
  Serialization {
    #[source]
    source: AnyhowError,
  },

  #[error("Publishing failed. Source: {source}")]
  Publishing {
    #[source]
    source: AnyhowError,
  },

  #[error("Invalid input shape: expected a JSON object or nothing, got {found}")]
  InvalidInputShape { found: &'static str },

  #[error("Invalid result shape: expected nothing, an object or an array of objects, got {found}")]
  InvalidResultShape { found: &'static str },

  #[error("Required field '{field}' is missing from the message")]
  MissingField { field: String },

  #[error("Fetched no result ({cause})")]
  FetchedNoResult { cause: NoResultCause },

  #[error("Configuration error: {message}")]
  Configuration { message: String },

  #[error("Subscriber already has an active subscription")]
  AlreadySubscribed,
}

impl MissiveError {
  /// True for the uniform no-result failure of `run_for_result`.
  pub fn is_fetched_no_result(&self) -> bool {
    matches!(self, MissiveError::FetchedNoResult { .. })
  }
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
  match value {
    serde_json::Value::Null => "null",
    serde_json::Value::Bool(_) => "a boolean",
    serde_json::Value::Number(_) => "a number",
    serde_json::Value::String(_) => "a string",
    serde_json::Value::Array(_) => "an array",
    serde_json::Value::Object(_) => "an object",
  }
}

pub type MissiveResult<T, E = MissiveError> = std::result::Result<T, E>;
