//! Command pipeline — the `submit_command` entry point.
//!
//! interpret → validate → dispatch (concurrently, all awaited) → present.

use std::sync::Arc;

use futures::future::join_all;

use arthur_domain::command::{Command, Utterance};
use arthur_domain::debounce::DeviceStatus;
use arthur_domain::dispatch::DispatchOutcome;
use arthur_domain::error::report;
use arthur_domain::id::InvocationId;
use arthur_domain::result::PipelineResult;
use arthur_domain::user::UserId;

use crate::ports::{Clock, DeviceStateStore, EventPublisher, LanguageModel};
use crate::services::debounce::DebounceGuard;
use crate::services::dispatcher::DeviceDispatcher;
use crate::services::interpreter::CommandInterpreter;
use crate::services::presenter::ResponsePresenter;
use crate::services::validator::ActionValidator;

/// Wires the interpreter, validator, dispatcher and presenter together.
pub struct CommandPipeline<M, S, P, C> {
    interpreter: CommandInterpreter<M>,
    validator: ActionValidator,
    dispatcher: DeviceDispatcher<S, P, C>,
    presenter: ResponsePresenter,
}

impl<M, S, P, C> CommandPipeline<M, S, P, C>
where
    M: LanguageModel + Send + Sync,
    S: DeviceStateStore + Send + Sync,
    P: EventPublisher + Send + Sync,
    C: Clock + Send + Sync,
{
    pub fn new(interpreter: CommandInterpreter<M>, dispatcher: DeviceDispatcher<S, P, C>) -> Self {
        Self {
            interpreter,
            validator: ActionValidator,
            dispatcher,
            presenter: ResponsePresenter,
        }
    }

    /// Handle one user utterance end to end.
    ///
    /// Never fails: a model failure becomes an apology, and per-command
    /// problems are listed in [`PipelineResult::failures`].
    #[tracing::instrument(skip_all, fields(invocation = %InvocationId::new(), user = %user))]
    pub async fn submit_command(&self, utterance: &Utterance, user: &UserId) -> PipelineResult {
        let interpretation = match self.interpreter.interpret(utterance).await {
            Ok(interpretation) => interpretation,
            Err(err) => {
                tracing::warn!(error = %report(&err), "interpretation failed");
                return self.presenter.apologize();
            }
        };

        let validations = self.validator.validate(&interpretation.commands);
        let outcomes = join_all(
            validations
                .iter()
                .map(|validation| self.dispatcher.dispatch(user, validation)),
        )
        .await;

        let result = self.presenter.present(&interpretation, &outcomes);
        tracing::info!(
            commands = outcomes.len(),
            controlled = result.devices_controlled.len(),
            failed = result.failures.len(),
            "command handled"
        );
        result
    }

    /// Apply one device/action pair without the language model.
    ///
    /// Goes through the same validation and cool-down as a model-produced
    /// command.
    #[tracing::instrument(skip(self), fields(invocation = %InvocationId::new(), user = %user))]
    pub async fn actuate(&self, user: &UserId, device: &str, action: &str) -> DispatchOutcome {
        let validation = self.validator.check(&Command::new(device, action));
        self.dispatcher.dispatch(user, &validation).await
    }

    /// Busy/idle signal for each of `user`'s devices.
    pub fn device_status(&self, user: &UserId) -> Vec<DeviceStatus> {
        self.guard().statuses(user, self.dispatcher.clock().now())
    }

    pub fn guard(&self) -> &DebounceGuard {
        self.dispatcher.guard()
    }
}

/// Builds a pipeline sharing one [`DebounceGuard`] across all invocations.
pub fn build<M, S, P, C>(
    model: M,
    store: S,
    publisher: P,
    clock: C,
    guard: Arc<DebounceGuard>,
) -> CommandPipeline<M, S, P, C>
where
    M: LanguageModel + Send + Sync,
    S: DeviceStateStore + Send + Sync,
    P: EventPublisher + Send + Sync,
    C: Clock + Send + Sync,
{
    CommandPipeline::new(
        CommandInterpreter::new(model),
        DeviceDispatcher::new(store, guard, publisher, clock),
    )
}
