//! Per-user device endpoints.
//!
//! - `GET /api/users/{user_id}/devices` — busy/idle signal per device.
//! - `POST /api/users/{user_id}/devices/{device}` — direct actuation.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use arthur_app::ports::{Clock, DeviceStateStore, EventPublisher, LanguageModel};
use arthur_domain::debounce::DeviceStatus;
use arthur_domain::dispatch::DispatchOutcome;
use arthur_domain::user::UserId;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ActuateRequest {
    pub action: String,
}

/// Used by the UI to grey out controls still inside their cool-down.
pub async fn status<M, S, P, C>(
    State(state): State<AppState<M, S, P, C>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<DeviceStatus>>, ApiError>
where
    M: LanguageModel + Send + Sync + 'static,
    S: DeviceStateStore + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let user = UserId::parse(&user_id)?;
    Ok(Json(state.pipeline.device_status(&user)))
}

/// Apply `action` to `device`, bypassing the language model.
///
/// A rejected or busy device is still `200`; the outcome says why.
pub async fn actuate<M, S, P, C>(
    State(state): State<AppState<M, S, P, C>>,
    Path((user_id, device)): Path<(String, String)>,
    Json(req): Json<ActuateRequest>,
) -> Result<Json<DispatchOutcome>, ApiError>
where
    M: LanguageModel + Send + Sync + 'static,
    S: DeviceStateStore + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let user = UserId::parse(&user_id)?;
    let outcome = state.pipeline.actuate(&user, &device, &req.action).await;
    Ok(Json(outcome))
}
