//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use arthur_app::ports::{Clock, DeviceStateStore, EventPublisher, LanguageModel};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// API routes live under `/api`. A [`TraceLayer`] logs each request and
/// response at `DEBUG` level.
pub fn build<M, S, P, C>(state: AppState<M, S, P, C>) -> Router
where
    M: LanguageModel + Send + Sync + 'static,
    S: DeviceStateStore + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
