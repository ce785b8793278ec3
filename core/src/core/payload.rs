// missive/src/core/payload.rs

//! Payload types flowing between stages.

use crate::error::{json_kind, MissiveError};
use serde_json::{Map, Value};

/// A mapping from string keys to values: the parsed form of a message and the unit of
/// handler output.
pub type Payload = Map<String, Value>;

/// Zero, one or many payloads produced by a handler.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultData {
  #[default]
  None,
  Single(Payload),
  Many(Vec<Payload>),
}

impl ResultData {
  pub fn is_none(&self) -> bool {
    matches!(self, ResultData::None)
  }

  /// Number of payloads carried.
  pub fn payload_count(&self) -> usize {
    match self {
      ResultData::None => 0,
      ResultData::Single(_) => 1,
      ResultData::Many(items) => items.len(),
    }
  }
}

impl From<()> for ResultData {
  fn from(_: ()) -> Self {
    ResultData::None
  }
}

impl From<Payload> for ResultData {
  fn from(payload: Payload) -> Self {
    ResultData::Single(payload)
  }
}

impl From<Vec<Payload>> for ResultData {
  fn from(payloads: Vec<Payload>) -> Self {
    ResultData::Many(payloads)
  }
}

impl From<Option<Payload>> for ResultData {
  fn from(payload: Option<Payload>) -> Self {
    payload.map_or(ResultData::None, ResultData::Single)
  }
}

impl TryFrom<Value> for ResultData {
  type Error = MissiveError;

  fn try_from(value: Value) -> Result<Self, Self::Error> {
    match value {
      Value::Null => Ok(ResultData::None),
      Value::Object(map) => Ok(ResultData::Single(map)),
      Value::Array(items) => items
        .into_iter()
        .map(|item| match item {
          Value::Object(map) => Ok(map),
          other => Err(MissiveError::InvalidResultShape {
            found: json_kind(&other),
          }),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(ResultData::Many),
      other => Err(MissiveError::InvalidResultShape {
        found: json_kind(&other),
      }),
    }
  }
}

/// Output of the serialization stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Serialized<O> {
  /// A single payload was serialized.
  One(O),
  /// Each payload of a sequence was serialized independently, in order.
  Many(Vec<O>),
}

impl<O> Serialized<O> {
  pub fn into_one(self) -> Option<O> {
    match self {
      Serialized::One(item) => Some(item),
      Serialized::Many(_) => None,
    }
  }

  pub fn into_vec(self) -> Vec<O> {
    match self {
      Serialized::One(item) => vec![item],
      Serialized::Many(items) => items,
    }
  }
}
