//! Device dispatcher — turns one validated command into one state write.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use arthur_domain::command::Actuation;
use arthur_domain::dispatch::{DispatchFailure, DispatchOutcome};
use arthur_domain::error::report;
use arthur_domain::event::{Event, EventType};
use arthur_domain::state::StateLayout;
use arthur_domain::user::UserId;

use crate::ports::{Clock, DeviceStateStore, EventPublisher};
use crate::services::debounce::DebounceGuard;
use crate::services::validator::Validation;

/// Default bound on a single state-store write.
pub const DEFAULT_WRITE_TIMEOUT: StdDuration = StdDuration::from_secs(10);

/// Dispatches commands to the remote state store, honouring cool-downs.
///
/// Every call yields exactly one [`DispatchOutcome`]; failures are recorded
/// there and never propagated, so sibling commands are unaffected.
pub struct DeviceDispatcher<S, P, C> {
    store: S,
    guard: Arc<DebounceGuard>,
    layout: StateLayout,
    publisher: P,
    clock: C,
    write_timeout: StdDuration,
}

impl<S, P, C> DeviceDispatcher<S, P, C>
where
    S: DeviceStateStore + Send + Sync,
    P: EventPublisher + Send + Sync,
    C: Clock + Send + Sync,
{
    pub fn new(store: S, guard: Arc<DebounceGuard>, publisher: P, clock: C) -> Self {
        Self {
            store,
            guard,
            layout: StateLayout::default(),
            publisher,
            clock,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_layout(mut self, layout: StateLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, write_timeout: StdDuration) -> Self {
        self.write_timeout = write_timeout;
        self
    }

    /// The guard shared with the busy/idle signal.
    pub fn guard(&self) -> &DebounceGuard {
        &self.guard
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Dispatch one validated command for `user`.
    #[tracing::instrument(skip(self, validation), fields(command = %validation.command))]
    pub async fn dispatch(&self, user: &UserId, validation: &Validation) -> DispatchOutcome {
        let command = validation.command.clone();
        let Some(actuation) = validation.actuation().copied() else {
            tracing::debug!("skipping unsupported command");
            return DispatchOutcome::failure(command, &DispatchFailure::Unsupported);
        };

        let _permit = self.guard.serialize(user, actuation.device).await;
        if !self
            .guard
            .try_acquire(user, actuation.device, self.clock.now())
        {
            tracing::info!(device = %actuation.device, "device busy, command dropped");
            return DispatchOutcome::failure(command, &DispatchFailure::Busy);
        }

        match self.write(user, actuation).await {
            Ok(()) => {
                if let Some(cooldown) = self.guard.cooldown(actuation.device) {
                    self.guard
                        .release(user, actuation.device, self.clock.now(), cooldown);
                }
                tracing::info!(
                    device = %actuation.device,
                    action = %actuation.action,
                    code = %actuation.code,
                    "device actuated"
                );
                self.emit(EventType::DeviceActuated, user, actuation, None)
                    .await;
                DispatchOutcome::success(command)
            }
            Err(failure) => {
                tracing::warn!(device = %actuation.device, error = %failure, "actuation failed");
                self.emit(EventType::ActuationFailed, user, actuation, Some(&failure))
                    .await;
                DispatchOutcome::failure(command, &failure)
            }
        }
    }

    async fn write(&self, user: &UserId, actuation: Actuation) -> Result<(), DispatchFailure> {
        let path = self.layout.path(user, actuation.device);
        match tokio::time::timeout(self.write_timeout, self.store.write(&path, actuation.code))
            .await
        {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(DispatchFailure::Write(report(&err))),
            Err(_) => Err(DispatchFailure::Write(format!(
                "state store write timed out after {} ms",
                self.write_timeout.as_millis()
            ))),
        }
    }

    async fn emit(
        &self,
        event_type: EventType,
        user: &UserId,
        actuation: Actuation,
        failure: Option<&DispatchFailure>,
    ) {
        let mut data = serde_json::json!({
            "action": actuation.action,
            "code": actuation.code,
        });
        if let Some(failure) = failure {
            data["error"] = serde_json::Value::String(failure.to_string());
        }
        let event = Event::new(event_type, user.clone(), actuation.device, data);
        // Event delivery is best-effort.
        let _ = self.publisher.publish(event).await;
    }
}
