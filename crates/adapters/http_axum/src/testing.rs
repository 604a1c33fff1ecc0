//! Stubs shared by the handler tests.

use std::future::Future;
use std::sync::{Arc, Mutex};

use axum::response::Response;

use arthur_app::event_bus::InProcessEventBus;
use arthur_app::ports::{DeviceStateStore, LanguageModel, ModelRequest, SystemClock};
use arthur_app::services::debounce::DebounceGuard;
use arthur_app::services::pipeline;
use arthur_domain::error::{ArthurError, InterpretationError};
use arthur_domain::state::{StateCode, StatePath};

use crate::state::AppState;

pub struct StubModel;

impl LanguageModel for StubModel {
    fn generate(
        &self,
        request: ModelRequest<'_>,
    ) -> impl Future<Output = Result<String, InterpretationError>> + Send {
        let reply = if request.utterance == "lock the door" {
            Ok("```json\n{\"devices_controlled\":[\"lock\"],\"action\":[\"lock\"]}\n```\nThe door is locked."
                .to_string())
        } else {
            Err(InterpretationError::Timeout)
        };
        async { reply }
    }
}

#[derive(Default)]
pub struct RecordingStore {
    writes: Mutex<Vec<(String, u8)>>,
}

impl RecordingStore {
    pub fn written(&self) -> Vec<(String, u8)> {
        self.writes.lock().unwrap().clone()
    }
}

impl DeviceStateStore for RecordingStore {
    fn write(
        &self,
        path: &StatePath,
        code: StateCode,
    ) -> impl Future<Output = Result<(), ArthurError>> + Send {
        self.writes
            .lock()
            .unwrap()
            .push((path.to_string(), code.value()));
        async { Ok(()) }
    }
}

pub type TestState = AppState<StubModel, Arc<RecordingStore>, Arc<InProcessEventBus>, SystemClock>;

pub fn test_state() -> (TestState, Arc<RecordingStore>, Arc<InProcessEventBus>) {
    let store = Arc::new(RecordingStore::default());
    let bus = Arc::new(InProcessEventBus::new(16));
    let pipeline = pipeline::build(
        StubModel,
        Arc::clone(&store),
        Arc::clone(&bus),
        SystemClock,
        Arc::new(DebounceGuard::with_defaults()),
    );
    (AppState::new(pipeline, Arc::clone(&bus)), store, bus)
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
