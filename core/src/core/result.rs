// missive/src/core/result.rs

use crate::core::payload::ResultData;
use std::fmt;

/// Handling status: `Ok` or `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlingStatus {
  Ok,
  Err,
}

impl fmt::Display for HandlingStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      HandlingStatus::Ok => f.write_str("OK"),
      HandlingStatus::Err => f.write_str("ERR"),
    }
  }
}

/// Immutable outcome of handling one message.
///
/// Status and data are fixed together at construction; there are no setters.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlingResult {
  status: HandlingStatus,
  data: ResultData,
}

impl HandlingResult {
  /// Successful result: the handler returned `data`.
  pub fn ok(data: impl Into<ResultData>) -> Self {
    Self {
      status: HandlingStatus::Ok,
      data: data.into(),
    }
  }

  /// Failed result: `data` came from a fallback or an error-result builder.
  pub fn err(data: impl Into<ResultData>) -> Self {
    Self {
      status: HandlingStatus::Err,
      data: data.into(),
    }
  }

  pub fn status(&self) -> HandlingStatus {
    self.status
  }

  pub fn data(&self) -> &ResultData {
    &self.data
  }

  pub fn is_ok(&self) -> bool {
    self.status == HandlingStatus::Ok
  }

  pub fn into_data(self) -> ResultData {
    self.data
  }
}
