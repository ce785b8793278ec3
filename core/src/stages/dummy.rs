// missive/src/stages/dummy.rs

use crate::core::payload::Payload;
use crate::error::{json_kind, MissiveError};
use crate::stages::deserializer::Deserializer;
use crate::stages::serializer::Serializer;
use serde_json::Value;

/// Identity deserializer and serializer, used when an executor is built without one.
///
/// Objects pass through unchanged, `null` becomes an empty payload, and anything else is
/// rejected with [`MissiveError::InvalidInputShape`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DummySerde;

impl Deserializer<Value> for DummySerde {
  fn deserialize(&self, message: &Value) -> anyhow::Result<Payload> {
    match message {
      Value::Object(map) => Ok(map.clone()),
      Value::Null => Ok(Payload::new()),
      other => Err(
        MissiveError::InvalidInputShape {
          found: json_kind(other),
        }
        .into(),
      ),
    }
  }
}

impl Deserializer<Payload> for DummySerde {
  fn deserialize(&self, message: &Payload) -> anyhow::Result<Payload> {
    Ok(message.clone())
  }
}

impl Serializer for DummySerde {
  type Output = Payload;

  fn serialize(&self, payload: &Payload) -> anyhow::Result<Payload> {
    Ok(payload.clone())
  }
}
