// missive/src/executor/execution.rs

//! Contains `Executor::run()` and `Executor::run_for_result()`, which drive a message through
//! deserialize → handle → serialize → publish and fire the lifecycle callbacks.
//!
//! `StopPipeline` travels on the `Err` side of every stage helper and is caught exactly once,
//! at the top of the two entry points.

use crate::core::control::{RunOutcome, StopPipeline};
use crate::core::payload::{Payload, Serialized};
use crate::core::result::HandlingResult;
use crate::error::{MissiveError, MissiveResult, NoResultCause};
use crate::executor::definition::Executor;
use crate::stages::serialize_result;
use crate::stages::Publisher;
use tracing::{event, instrument, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
  /// `run`: publish when possible.
  Publish,
  /// `run_for_result`: hand the serialized output back instead.
  Fetch,
}

enum Deserialized {
  Parsed(Payload),
  /// Deserialization failed but the deserializer produced an error payload.
  ErrorResult(HandlingResult),
  Fatal(MissiveError),
}

/// What a run that reached FINISHED leaves behind.
struct Completion<O> {
  serialized: Option<Serialized<O>>,
  error: Option<MissiveError>,
}

impl<O> Completion<O> {
  fn fatal(error: MissiveError) -> Self {
    Self {
      serialized: None,
      error: Some(error),
    }
  }
}

impl<M, O> Executor<M, O>
where
  M: Send + Sync + 'static,
  O: Send + Sync + 'static,
{
  /// Runs the full pipeline, publishing the result if a publisher is configured.
  ///
  /// Never fails: stage errors are reported through the callbacks and summarized in the
  /// returned [`RunOutcome`].
  #[instrument(
    name = "Executor::run",
    skip_all,
    fields(
      message_type = %std::any::type_name::<M>(),
      output_type = %std::any::type_name::<O>(),
      publisher_present = self.publisher.is_some(),
    )
  )]
  pub async fn run<'m>(&self, message: impl Into<Option<&'m M>>) -> RunOutcome
  where
    M: 'm,
  {
    let message = message.into();
    event!(Level::DEBUG, message_present = message.is_some(), "Pipeline run starting.");

    match self.drive(message, Mode::Publish).await {
      Ok(completion) => {
        event!(
          Level::DEBUG,
          failed = completion.error.is_some(),
          "Pipeline run finished."
        );
        RunOutcome::Finished {
          error: completion.error,
        }
      }
      Err(stop) => RunOutcome::Stopped {
        reason: self.stopped(message, stop).await,
      },
    }
  }

  /// Runs the pipeline without publishing and returns the serialized output.
  ///
  /// Fails with [`MissiveError::FetchedNoResult`] when the run was stopped, failed fatally,
  /// or ended without serialized output.
  #[instrument(
    name = "Executor::run_for_result",
    skip_all,
    fields(
      message_type = %std::any::type_name::<M>(),
      output_type = %std::any::type_name::<O>(),
    ),
    err(Display)
  )]
  pub async fn run_for_result<'m>(&self, message: impl Into<Option<&'m M>>) -> MissiveResult<Serialized<O>>
  where
    M: 'm,
  {
    let message = message.into();
    event!(Level::DEBUG, message_present = message.is_some(), "Pipeline fetch starting.");

    let cause = match self.drive(message, Mode::Fetch).await {
      Ok(Completion {
        serialized: Some(serialized),
        ..
      }) => return Ok(serialized),
      Ok(Completion { error: Some(error), .. }) => NoResultCause::Failed(Box::new(error)),
      Ok(_) => NoResultCause::Empty,
      Err(stop) => NoResultCause::Stopped {
        reason: self.stopped(message, stop).await,
      },
    };
    Err(MissiveError::FetchedNoResult { cause })
  }

  async fn drive(&self, message: Option<&M>, mode: Mode) -> Result<Completion<O>, StopPipeline> {
    self.callbacks.on_received(message).await?;

    let result = match self.deserialize_stage(message).await? {
      Deserialized::Parsed(parsed) => match self.handle_stage(message, &parsed).await? {
        Ok(result) => result,
        Err(error) => return self.finish(message, Completion::fatal(error)).await,
      },
      Deserialized::ErrorResult(result) => result,
      Deserialized::Fatal(error) => return self.finish(message, Completion::fatal(error)).await,
    };

    let serialized = self.serialize_stage(message, &result).await?;

    let mut error = None;
    if mode == Mode::Publish {
      match (self.publisher.as_deref(), serialized.as_ref()) {
        (Some(publisher), Some(_)) => error = self.publish_stage(message, publisher, &result).await?,
        (Some(_), None) => event!(Level::DEBUG, "Nothing was serialized, skipping publish."),
        (None, _) => event!(Level::TRACE, "No publisher configured."),
      }
    }

    self.finish(message, Completion { serialized, error }).await
  }

  async fn deserialize_stage(&self, message: Option<&M>) -> Result<Deserialized, StopPipeline> {
    let Some(raw) = message else {
      event!(Level::DEBUG, "No message given, using an empty payload.");
      let parsed = Payload::new();
      self.callbacks.on_deserialized(None, &parsed).await?;
      return Ok(Deserialized::Parsed(parsed));
    };

    match self.deserializer.deserialize(raw) {
      Ok(parsed) => {
        event!(Level::DEBUG, fields = parsed.len(), "Message deserialized.");
        self.callbacks.on_deserialized(message, &parsed).await?;
        Ok(Deserialized::Parsed(parsed))
      }
      Err(source) => {
        let error = MissiveError::Deserialization { source };
        event!(Level::WARN, error = %error, "Message deserialization failed.");
        self.callbacks.on_deserialization_failed(message, &error).await?;

        match self.deserializer.build_error_result(raw, error) {
          Ok(payload) => {
            event!(Level::DEBUG, "Error result built, skipping the handler.");
            Ok(Deserialized::ErrorResult(HandlingResult::err(payload)))
          }
          Err(source) => {
            let error = MissiveError::ErrorResult { source };
            event!(Level::ERROR, error = %error, "No error result could be built.");
            Ok(Deserialized::Fatal(error))
          }
        }
      }
    }
  }

  async fn handle_stage(
    &self,
    message: Option<&M>,
    parsed: &Payload,
  ) -> Result<Result<HandlingResult, MissiveError>, StopPipeline> {
    match self.handler.invoke(parsed).await {
      Ok(result) => {
        event!(Level::DEBUG, status = %result.status(), "Message handled.");
        self.callbacks.on_handled(message, parsed, &result).await?;
        Ok(Ok(result))
      }
      Err(source) => {
        let error = MissiveError::Handling { source };
        event!(Level::ERROR, error = %error, "Handler and its fallback both failed.");
        self.callbacks.on_handling_failed(message, parsed, &error).await?;
        Ok(Err(error))
      }
    }
  }

  async fn serialize_stage(
    &self,
    message: Option<&M>,
    result: &HandlingResult,
  ) -> Result<Option<Serialized<O>>, StopPipeline> {
    match serialize_result(self.serializer.as_ref(), result.data()) {
      Ok(serialized) => {
        event!(Level::DEBUG, items = result.data().payload_count(), "Result serialized.");
        self.callbacks.on_serialized(message, result, serialized.as_ref()).await?;
        Ok(serialized)
      }
      Err(error) => {
        event!(Level::WARN, error = %error, "Result serialization failed.");
        self.callbacks.on_serialization_failed(message, result, &error).await?;
        Ok(None)
      }
    }
  }

  async fn publish_stage(
    &self,
    message: Option<&M>,
    publisher: &dyn Publisher,
    result: &HandlingResult,
  ) -> Result<Option<MissiveError>, StopPipeline> {
    match publisher.publish_result(result).await {
      Ok(()) => {
        event!(Level::DEBUG, status = %result.status(), "Result published.");
        self.callbacks.on_published(message, result).await?;
        Ok(None)
      }
      Err(source) => {
        let error = MissiveError::Publishing { source };
        event!(Level::ERROR, error = %error, "Result publishing failed.");
        self.callbacks.on_publishing_failed(message, result, &error).await?;
        Ok(Some(error))
      }
    }
  }

  async fn finish(&self, message: Option<&M>, completion: Completion<O>) -> Result<Completion<O>, StopPipeline> {
    self.callbacks.on_finished(message, completion.error.as_ref()).await?;
    Ok(completion)
  }

  async fn stopped(&self, message: Option<&M>, stop: StopPipeline) -> String {
    event!(Level::INFO, reason = %stop.reason, "Pipeline stopped by a callback.");
    self.callbacks.on_stopped(message, &stop.reason).await;
    stop.reason
  }
}
