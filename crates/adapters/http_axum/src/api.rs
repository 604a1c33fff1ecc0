//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod commands;
#[allow(clippy::missing_errors_doc)]
pub mod devices;
pub mod sse;

use axum::Router;
use axum::routing::{get, post};

use arthur_app::ports::{Clock, DeviceStateStore, EventPublisher, LanguageModel};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<M, S, P, C>() -> Router<AppState<M, S, P, C>>
where
    M: LanguageModel + Send + Sync + 'static,
    S: DeviceStateStore + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/commands", post(commands::submit::<M, S, P, C>))
        .route(
            "/users/{user_id}/devices",
            get(devices::status::<M, S, P, C>),
        )
        .route(
            "/users/{user_id}/devices/{device}",
            post(devices::actuate::<M, S, P, C>),
        )
        .route("/events/stream", get(sse::stream::<M, S, P, C>))
}
