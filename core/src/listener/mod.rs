// missive/src/listener/mod.rs

//! Feeds an executor from a subscription and acknowledges messages early or late.

pub mod acking;
pub mod subscriber;

pub use acking::Listener;
pub use subscriber::{ChannelSubscriber, MessageCallback, Subscriber, SubscriberWithAck, Subscription};
