// missive/src/stages/mod.rs

//! Stage contracts the executor is built from, plus the stock implementations.

pub mod deserializer;
pub mod dummy;
pub mod handler;
pub mod json;
pub mod publisher;
pub mod serializer;

pub use deserializer::Deserializer;
pub use dummy::DummySerde;
pub use handler::{handler_fn, FnHandler, Handler};
pub use json::{JsonSerde, RequestIdJsonDeserializer};
pub use publisher::{ChannelPublisher, Publisher};
pub use serializer::{serialize_result, Serializer};
