//! Runtime-selected adapters.
//!
//! The pipeline is generic over its ports; these enums let the daemon pick
//! a concrete adapter from configuration while keeping one pipeline type.

use std::future::Future;

use arthur_adapter_firebase::FirebaseStateStore;
use arthur_adapter_gemini::GeminiModel;
use arthur_adapter_storage_sqlite_sqlx::SqliteStateStore;
use arthur_adapter_virtual::{ScriptedLanguageModel, VirtualStateStore};
use arthur_app::ports::{DeviceStateStore, LanguageModel, ModelRequest};
use arthur_domain::error::{ArthurError, InterpretationError};
use arthur_domain::state::{StateCode, StatePath};

pub enum ModelBackend {
    Gemini(GeminiModel),
    Virtual(ScriptedLanguageModel),
}

impl LanguageModel for ModelBackend {
    fn generate(
        &self,
        request: ModelRequest<'_>,
    ) -> impl Future<Output = Result<String, InterpretationError>> + Send {
        async move {
            match self {
                Self::Gemini(model) => model.generate(request).await,
                Self::Virtual(model) => model.generate(request).await,
            }
        }
    }
}

pub enum StateBackend {
    Firebase(FirebaseStateStore),
    Sqlite(SqliteStateStore),
    Virtual(VirtualStateStore),
}

impl DeviceStateStore for StateBackend {
    fn write(
        &self,
        path: &StatePath,
        code: StateCode,
    ) -> impl Future<Output = Result<(), ArthurError>> + Send {
        async move {
            match self {
                Self::Firebase(store) => store.write(path, code).await,
                Self::Sqlite(store) => store.write(path, code).await,
                Self::Virtual(store) => store.write(path, code).await,
            }
        }
    }
}
