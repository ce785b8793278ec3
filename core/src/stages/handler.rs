// missive/src/stages/handler.rs

//! Defines the `Handler` contract and the closure-backed `FnHandler`.

use crate::core::payload::{Payload, ResultData};
use crate::core::result::HandlingResult;
use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, Level};

/// User-supplied business logic of a pipeline.
///
/// `handle` does the work; `on_handling_failed` is its fallback and is only invoked when
/// `handle` fails. The executor always goes through [`Handler::invoke`].
#[async_trait]
pub trait Handler: Send + Sync {
  async fn handle(&self, message: &Payload) -> anyhow::Result<ResultData>;

  /// Produces the data of a failed `HandlingResult`. The default re-raises `error`,
  /// which makes the run fatal.
  async fn on_handling_failed(&self, message: &Payload, error: anyhow::Error) -> anyhow::Result<ResultData> {
    let _ = message;
    Err(error)
  }

  /// Runs `handle`, falling back to `on_handling_failed` if it fails.
  ///
  /// Errors from `handle` never escape this method. Errors from the fallback do.
  async fn invoke(&self, message: &Payload) -> anyhow::Result<HandlingResult> {
    match self.handle(message).await {
      Ok(data) => Ok(HandlingResult::ok(data)),
      Err(error) => {
        event!(Level::WARN, error = %error, "Handler failed, invoking its fallback.");
        let data = self.on_handling_failed(message, error).await?;
        Ok(HandlingResult::err(data))
      }
    }
  }
}

/// A [`Handler`] backed by an async closure. Its fallback re-raises.
///
/// The closure receives an owned copy of the parsed message so the returned future does not
/// borrow from the executor.
pub struct FnHandler<F, Fut, R> {
  f: F,
  _phantom: PhantomData<fn() -> (Fut, R)>,
}

impl<F, Fut, R> FnHandler<F, Fut, R>
where
  F: Fn(Payload) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
  R: Into<ResultData> + Send + 'static,
{
  pub fn new(f: F) -> Self {
    Self { f, _phantom: PhantomData }
  }
}

/// Shorthand for [`FnHandler::new`].
///
/// ```
/// use missive::{handler_fn, Payload};
/// use serde_json::json;
///
/// let handler = handler_fn(|message: Payload| async move {
///   let mut out = Payload::new();
///   out.insert("echo".into(), json!(message.len()));
///   Ok::<_, anyhow::Error>(out)
/// });
/// # let _ = handler;
/// ```
pub fn handler_fn<F, Fut, R>(f: F) -> FnHandler<F, Fut, R>
where
  F: Fn(Payload) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
  R: Into<ResultData> + Send + 'static,
{
  FnHandler::new(f)
}

#[async_trait]
impl<F, Fut, R> Handler for FnHandler<F, Fut, R>
where
  F: Fn(Payload) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
  R: Into<ResultData> + Send + 'static,
{
  async fn handle(&self, message: &Payload) -> anyhow::Result<ResultData> {
    (self.f)(message.clone()).await.map(Into::into)
  }
}

#[async_trait]
impl<H> Handler for Arc<H>
where
  H: Handler + ?Sized,
{
  async fn handle(&self, message: &Payload) -> anyhow::Result<ResultData> {
    (**self).handle(message).await
  }

  async fn on_handling_failed(&self, message: &Payload, error: anyhow::Error) -> anyhow::Result<ResultData> {
    (**self).on_handling_failed(message, error).await
  }

  async fn invoke(&self, message: &Payload) -> anyhow::Result<HandlingResult> {
    (**self).invoke(message).await
  }
}
