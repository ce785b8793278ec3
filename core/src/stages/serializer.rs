// missive/src/stages/serializer.rs

use crate::core::payload::{Payload, ResultData, Serialized};
use crate::error::MissiveError;

/// Turns a handler payload into its outgoing form.
pub trait Serializer: Send + Sync {
  type Output: Send + Sync + 'static;

  fn serialize(&self, payload: &Payload) -> anyhow::Result<Self::Output>;
}

/// Serializes `data` according to its shape.
///
/// No payload yields `Ok(None)`, a single payload one `serialize` call, and a sequence one
/// call per item. The first failing item aborts the whole sequence.
pub fn serialize_result<S>(serializer: &S, data: &ResultData) -> Result<Option<Serialized<S::Output>>, MissiveError>
where
  S: Serializer + ?Sized,
{
  let wrap = |source| MissiveError::Serialization { source };
  match data {
    ResultData::None => Ok(None),
    ResultData::Single(payload) => serializer.serialize(payload).map(|one| Some(Serialized::One(one))).map_err(wrap),
    ResultData::Many(payloads) => payloads
      .iter()
      .map(|payload| serializer.serialize(payload))
      .collect::<anyhow::Result<Vec<_>>>()
      .map(|many| Some(Serialized::Many(many)))
      .map_err(wrap),
  }
}
