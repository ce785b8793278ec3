// missive/src/stages/publisher.rs

use crate::core::result::HandlingResult;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Delivers a handling result to its destination (a topic, a queue, a reply channel).
///
/// An executor without a publisher has no publish stage.
#[async_trait]
pub trait Publisher: Send + Sync {
  async fn publish_result(&self, result: &HandlingResult) -> anyhow::Result<()>;
}

/// Publishes every result into an in-process channel.
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
  sender: mpsc::UnboundedSender<HandlingResult>,
}

impl ChannelPublisher {
  pub fn new(sender: mpsc::UnboundedSender<HandlingResult>) -> Self {
    Self { sender }
  }

  /// Creates a publisher together with the receiving end of its channel.
  pub fn channel() -> (Self, mpsc::UnboundedReceiver<HandlingResult>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Self::new(sender), receiver)
  }
}

#[async_trait]
impl Publisher for ChannelPublisher {
  async fn publish_result(&self, result: &HandlingResult) -> anyhow::Result<()> {
    self
      .sender
      .send(result.clone())
      .map_err(|_| anyhow::anyhow!("publishing channel is closed"))
  }
}
