//! Server-Sent Events (SSE) stream of actuation events.

use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use serde::Deserialize;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use arthur_domain::user::UserId;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct StreamQuery {
    /// Only forward events of this user.
    pub user_id: Option<String>,
}

/// `GET /api/events/stream` — actuation events as SSE `data:` frames.
///
/// The stream continues until the client disconnects or the bus closes.
/// Lagging subscribers skip the events they missed.
pub async fn stream<M, S, P, C>(
    State(state): State<AppState<M, S, P, C>>,
    Query(query): Query<StreamQuery>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>, ApiError>
where
    M: Send + Sync + 'static,
    S: Send + Sync + 'static,
    P: Send + Sync + 'static,
    C: Send + Sync + 'static,
{
    let user = query.user_id.as_deref().map(UserId::parse).transpose()?;
    let event_rx = state.event_bus.subscribe();
    let event_stream = BroadcastStream::new(event_rx).filter_map(move |result| match result {
        Ok(event) => {
            if user.as_ref().is_some_and(|user| *user != event.user_id) {
                return None;
            }
            match serde_json::to_string(&event) {
                Ok(json) => Some(Ok(Event::default().event("actuation").data(json))),
                Err(err) => {
                    tracing::warn!(%err, "failed to serialize event for SSE stream");
                    None
                }
            }
        }
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "SSE subscriber lagged, some events were dropped");
            None
        }
    });

    Ok(Sse::new(event_stream).keep_alive(KeepAlive::default()))
}
