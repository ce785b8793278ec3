// src/lib.rs

//! Missive: a pluggable message-handling pipeline for Pub/Sub-style services.
//!
//! An [`Executor`] takes an incoming message through a fixed sequence of stages:
//!  - deserialize it into a [`Payload`] (a [`Deserializer`]),
//!  - hand it to user logic (a [`Handler`], with a fallback for failures),
//!  - serialize whatever the handler returned (a [`Serializer`]),
//!  - optionally publish the [`HandlingResult`] (a [`Publisher`]).
//!
//! Lifecycle callbacks ([`ExecutorCallbacks`]) fire after every stage and every failure, and
//! any of them can halt the run by returning [`StopPipeline`]. Each stage has its own
//! recovery policy: a deserialization failure can still produce an error result, a failing
//! serializer only drops the output, and a failing publisher is reported to `on_finished`.
//!
//! The same executor serves two kinds of callers:
//!  - [`Executor::run`] for fire-and-forget subscribers, where observability goes through
//!    callbacks and logging;
//!  - [`Executor::run_for_result`] for request/response callers that need the serialized
//!    output or a definite failure.
//!
//! A [`Listener`] puts an executor behind a subscription and acknowledges messages early or
//! late.

pub mod config;
pub mod core;
pub mod error;
pub mod executor;
pub mod listener;
pub mod stages;

// --- Re-exports for the Public API ---

// Core types that users will interact with frequently
pub use crate::core::control::{Flow, RunOutcome, StopPipeline};
pub use crate::core::payload::{Payload, ResultData, Serialized};
pub use crate::core::result::{HandlingResult, HandlingStatus};

// Stage contracts and stock stages
pub use crate::stages::{
  handler_fn, ChannelPublisher, Deserializer, DummySerde, FnHandler, Handler, JsonSerde, Publisher,
  RequestIdJsonDeserializer, Serializer,
};

// The executor, its builder and its callbacks
pub use crate::executor::{Executor, ExecutorBuilder, ExecutorCallbacks, NoopCallbacks};

pub use crate::listener::{ChannelSubscriber, Listener, MessageCallback, Subscriber, SubscriberWithAck, Subscription};

pub use crate::config::{AckMode, ListenerConfig, RequestIdFields};

pub use crate::error::{MissiveError, MissiveResult, NoResultCause};
