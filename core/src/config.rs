// missive/src/config.rs

//! Deployment knobs loaded from the environment.
//!
//! Executors themselves are configured in code through `ExecutorBuilder`; the structs here
//! cover the values that usually differ between deployments.

use crate::error::{MissiveError, MissiveResult};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::str::FromStr;

/// Field names used by `RequestIdJsonDeserializer` to read the request id and to shape
/// error results.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RequestIdFields {
  pub request_id_field: String,
  pub status_field: String,
  pub error_field: String,
  /// Value written to `status_field` in error results.
  pub status_error: String,
}

impl Default for RequestIdFields {
  fn default() -> Self {
    Self {
      request_id_field: "request_id".to_string(),
      status_field: "status".to_string(),
      error_field: "error".to_string(),
      status_error: "ERROR".to_string(),
    }
  }
}

impl RequestIdFields {
  /// Reads `MISSIVE_REQUEST_ID_FIELD`, `MISSIVE_STATUS_FIELD`, `MISSIVE_ERROR_FIELD` and
  /// `MISSIVE_STATUS_ERROR`, falling back to the defaults for unset variables.
  pub fn from_env() -> MissiveResult<Self> {
    let defaults = Self::default();
    let fields = Self {
      request_id_field: non_empty_env("MISSIVE_REQUEST_ID_FIELD")?.unwrap_or(defaults.request_id_field),
      status_field: non_empty_env("MISSIVE_STATUS_FIELD")?.unwrap_or(defaults.status_field),
      error_field: non_empty_env("MISSIVE_ERROR_FIELD")?.unwrap_or(defaults.error_field),
      status_error: non_empty_env("MISSIVE_STATUS_ERROR")?.unwrap_or(defaults.status_error),
    };
    tracing::debug!(config = ?fields, "Request id field configuration loaded.");
    Ok(fields)
  }
}

/// When a listener acknowledges a message relative to running its pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckMode {
  /// Acknowledge before the pipeline runs: at-most-once processing.
  Early,
  /// Acknowledge after the pipeline completes: at-least-once processing.
  #[default]
  Late,
}

impl FromStr for AckMode {
  type Err = MissiveError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "early" => Ok(AckMode::Early),
      "late" => Ok(AckMode::Late),
      other => Err(MissiveError::Configuration {
        message: format!("Invalid ack mode '{}', expected 'early' or 'late'", other),
      }),
    }
  }
}

impl fmt::Display for AckMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AckMode::Early => f.write_str("early"),
      AckMode::Late => f.write_str("late"),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
  pub ack_mode: AckMode,
}

impl ListenerConfig {
  /// Reads `MISSIVE_ACK_MODE` (`early` or `late`, default `late`).
  pub fn from_env() -> MissiveResult<Self> {
    let ack_mode = match non_empty_env("MISSIVE_ACK_MODE")? {
      Some(raw) => raw.parse()?,
      None => AckMode::default(),
    };
    tracing::debug!(%ack_mode, "Listener configuration loaded.");
    Ok(Self { ack_mode })
  }
}

fn non_empty_env(var_name: &str) -> MissiveResult<Option<String>> {
  match env::var(var_name) {
    Ok(value) if value.trim().is_empty() => Ok(None),
    Ok(value) => Ok(Some(value)),
    Err(env::VarError::NotPresent) => Ok(None),
    Err(e) => Err(MissiveError::Configuration {
      message: format!("Invalid environment variable '{}': {}", var_name, e),
    }),
  }
}
