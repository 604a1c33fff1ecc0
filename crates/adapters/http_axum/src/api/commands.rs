//! `POST /api/commands` — the pipeline entry point.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use arthur_app::ports::{Clock, DeviceStateStore, EventPublisher, LanguageModel};
use arthur_domain::command::Utterance;
use arthur_domain::result::PipelineResult;
use arthur_domain::user::UserId;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SubmitCommandRequest {
    pub utterance: String,
    pub user_id: String,
}

/// Interpret and apply one utterance.
///
/// Always `200` once the request is well-formed: model and device failures
/// are part of the returned [`PipelineResult`].
pub async fn submit<M, S, P, C>(
    State(state): State<AppState<M, S, P, C>>,
    Json(req): Json<SubmitCommandRequest>,
) -> Result<Json<PipelineResult>, ApiError>
where
    M: LanguageModel + Send + Sync + 'static,
    S: DeviceStateStore + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let user = UserId::parse(&req.user_id)?;
    let utterance = Utterance::parse(&req.utterance)?;
    let result = state.pipeline.submit_command(&utterance, &user).await;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::router::build;
    use crate::testing::{body_json, test_state};

    fn post(body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/commands")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn should_return_pipeline_result() {
        let (state, store, _) = test_state();
        let app = build(state);

        let response = app
            .oneshot(post(&serde_json::json!({
                "utterance": "lock the door",
                "user_id": "abc123",
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["summary"], "The door is locked.");
        assert_eq!(json["devices_controlled"], serde_json::json!(["lock"]));
        assert_eq!(json["failures"], serde_json::json!([]));
        assert_eq!(store.written(), vec![("UsersData/abc123/lock/state".to_string(), 1)]);
    }

    #[tokio::test]
    async fn should_return_apology_with_ok_status_when_model_fails() {
        let (state, _, _) = test_state();
        let app = build(state);

        let response = app
            .oneshot(post(&serde_json::json!({
                "utterance": "make me a sandwich",
                "user_id": "abc123",
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["summary"], "Sorry, I'm having trouble understanding that.");
    }

    #[tokio::test]
    async fn should_reject_blank_utterance() {
        let (state, store, _) = test_state();
        let app = build(state);

        let response = app
            .oneshot(post(&serde_json::json!({
                "utterance": "   ",
                "user_id": "abc123",
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "utterance must not be empty");
        assert!(store.written().is_empty());
    }

    #[tokio::test]
    async fn should_reject_user_id_with_path_separator() {
        let (state, _, _) = test_state();
        let app = build(state);

        let response = app
            .oneshot(post(&serde_json::json!({
                "utterance": "lock the door",
                "user_id": "abc/123",
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
