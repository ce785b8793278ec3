// missive/src/stages/json.rs

//! JSON stages: a schemaless serde and a deserializer that insists on a request id.

use crate::config::RequestIdFields;
use crate::core::payload::Payload;
use crate::error::{json_kind, MissiveError};
use crate::stages::deserializer::Deserializer;
use crate::stages::serializer::Serializer;
use anyhow::Context as AnyhowContext;
use serde_json::Value;

fn object_from_slice(raw: &[u8]) -> anyhow::Result<Payload> {
  let value: Value = serde_json::from_slice(raw).context("message is not valid JSON")?;
  match value {
    Value::Object(map) => Ok(map),
    other => Err(
      MissiveError::InvalidInputShape {
        found: json_kind(&other),
      }
      .into(),
    ),
  }
}

/// JSON serializer/deserializer which does not validate against any schema.
///
/// Messages must decode to a JSON object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerde;

impl Deserializer<String> for JsonSerde {
  fn deserialize(&self, message: &String) -> anyhow::Result<Payload> {
    object_from_slice(message.as_bytes())
  }
}

impl Deserializer<Vec<u8>> for JsonSerde {
  fn deserialize(&self, message: &Vec<u8>) -> anyhow::Result<Payload> {
    object_from_slice(message)
  }
}

impl Serializer for JsonSerde {
  type Output = String;

  fn serialize(&self, payload: &Payload) -> anyhow::Result<String> {
    serde_json::to_string(payload).context("payload could not be encoded as JSON")
  }
}

/// Deserializes JSON messages that must carry a request id, plus any other required fields.
///
/// When deserialization fails but the raw message still carries a request id, the error
/// result echoes it so the requester can correlate the failure:
/// `{"request_id": "...", "status": "ERROR", "error": "..."}` (field names configurable).
#[derive(Debug, Clone, Default)]
pub struct RequestIdJsonDeserializer {
  fields: RequestIdFields,
  required: Vec<String>,
}

impl RequestIdJsonDeserializer {
  pub fn new(fields: RequestIdFields) -> Self {
    Self {
      fields,
      required: Vec::new(),
    }
  }

  /// Also rejects messages lacking any of `fields`.
  pub fn with_required_fields<I, F>(mut self, fields: I) -> Self
  where
    I: IntoIterator<Item = F>,
    F: Into<String>,
  {
    self.required.extend(fields.into_iter().map(Into::into));
    self
  }

  pub fn fields(&self) -> &RequestIdFields {
    &self.fields
  }

  fn missing_request_id(&self) -> MissiveError {
    MissiveError::MissingField {
      field: self.fields.request_id_field.clone(),
    }
  }
}

impl Deserializer<Vec<u8>> for RequestIdJsonDeserializer {
  fn deserialize(&self, message: &Vec<u8>) -> anyhow::Result<Payload> {
    let parsed = object_from_slice(message)?;
    if !parsed.contains_key(&self.fields.request_id_field) {
      return Err(self.missing_request_id().into());
    }
    if let Some(field) = self.required.iter().find(|field| !parsed.contains_key(field.as_str())) {
      return Err(MissiveError::MissingField { field: field.clone() }.into());
    }
    Ok(parsed)
  }

  fn build_error_result(&self, message: &Vec<u8>, error: MissiveError) -> anyhow::Result<Payload> {
    let request_id = serde_json::from_slice::<Value>(message)
      .ok()
      .and_then(|value| value.get(&self.fields.request_id_field).cloned())
      .ok_or_else(|| self.missing_request_id())
      .context("cannot report a deserialization failure without a request id")?;

    let mut result = Payload::new();
    result.insert(self.fields.request_id_field.clone(), request_id);
    result.insert(self.fields.status_field.clone(), Value::String(self.fields.status_error.clone()));
    result.insert(self.fields.error_field.clone(), Value::String(error.to_string()));
    Ok(result)
  }
}
