// missive/src/listener/subscriber.rs

use crate::error::MissiveError;
use async_trait::async_trait;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{event, Level};

/// Invoked by a subscriber once per delivered message.
pub type MessageCallback<M> = Arc<dyn Fn(M) -> BoxFuture<'static, ()> + Send + Sync>;

/// Handle to a running subscription. Resolves when the subscription ends.
pub type Subscription = JoinHandle<anyhow::Result<()>>;

/// A message source.
#[async_trait]
pub trait Subscriber<M>: Send + Sync
where
  M: Send + 'static,
{
  /// Starts delivering messages to `callback` in the background.
  async fn subscribe(&self, callback: MessageCallback<M>) -> anyhow::Result<Subscription>;
}

/// A message source that expects every delivered message to be acknowledged.
#[async_trait]
pub trait SubscriberWithAck<M>: Subscriber<M>
where
  M: Send + 'static,
{
  async fn ack(&self, message: &M) -> anyhow::Result<()>;
}

/// In-process subscriber fed through a `tokio::sync::mpsc` channel.
///
/// Messages are delivered one at a time, in send order. The subscription ends once every
/// sender is dropped. Acknowledged messages are buffered until drained with
/// [`ChannelSubscriber::take_acked`].
pub struct ChannelSubscriber<M> {
  receiver: Mutex<Option<mpsc::Receiver<M>>>,
  acked: Mutex<Vec<M>>,
  acked_total: AtomicUsize,
}

impl<M> ChannelSubscriber<M>
where
  M: Clone + Send + Sync + 'static,
{
  /// Creates a subscriber and the sender feeding it.
  pub fn channel(buffer: usize) -> (mpsc::Sender<M>, Self) {
    let (sender, receiver) = mpsc::channel(buffer);
    let subscriber = Self {
      receiver: Mutex::new(Some(receiver)),
      acked: Mutex::new(Vec::new()),
      acked_total: AtomicUsize::new(0),
    };
    (sender, subscriber)
  }

  /// Drains the messages acknowledged since the last call, in acknowledgment order.
  pub fn take_acked(&self) -> Vec<M> {
    std::mem::take(&mut *self.acked.lock())
  }

  /// Number of messages acknowledged over the subscriber's lifetime.
  pub fn acked_count(&self) -> usize {
    self.acked_total.load(Ordering::Relaxed)
  }
}

#[async_trait]
impl<M> Subscriber<M> for ChannelSubscriber<M>
where
  M: Clone + Send + Sync + 'static,
{
  async fn subscribe(&self, callback: MessageCallback<M>) -> anyhow::Result<Subscription> {
    let mut receiver = self.receiver.lock().take().ok_or(MissiveError::AlreadySubscribed)?;
    event!(Level::DEBUG, "Channel subscription started.");
    Ok(tokio::spawn(async move {
      while let Some(message) = receiver.recv().await {
        callback(message).await;
      }
      event!(Level::DEBUG, "All senders dropped, channel subscription ending.");
      Ok(())
    }))
  }
}

#[async_trait]
impl<M> SubscriberWithAck<M> for ChannelSubscriber<M>
where
  M: Clone + Send + Sync + 'static,
{
  async fn ack(&self, message: &M) -> anyhow::Result<()> {
    self.acked.lock().push(message.clone());
    self.acked_total.fetch_add(1, Ordering::Relaxed);
    Ok(())
  }
}
