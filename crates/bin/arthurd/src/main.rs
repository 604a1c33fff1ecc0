//! # arthurd — arthur daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Initialize logging
//! - Construct the configured language-model and state-store adapters
//! - Construct the pipeline services, injecting adapters via port traits
//! - Build the axum router, injecting the pipeline
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod backend;
mod config;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use arthur_adapter_firebase::FirebaseStateStore;
use arthur_adapter_gemini::GeminiModel;
use arthur_adapter_http_axum::state::AppState;
use arthur_adapter_storage_sqlite_sqlx::SqliteStateStore;
use arthur_adapter_virtual::{ScriptedLanguageModel, VirtualStateStore};
use arthur_app::event_bus::InProcessEventBus;
use arthur_app::ports::SystemClock;
use arthur_app::services::debounce::DebounceGuard;
use arthur_app::services::dispatcher::DeviceDispatcher;
use arthur_app::services::interpreter::CommandInterpreter;
use arthur_app::services::pipeline::CommandPipeline;
use arthur_domain::device::DeviceKind;

use crate::backend::{ModelBackend, StateBackend};
use crate::config::{Config, ModelBackendKind, StoreBackendKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let model = model_backend(&config)?;
    let store = state_backend(&config).await?;

    let guard = DeviceKind::ALL
        .into_iter()
        .fold(DebounceGuard::with_defaults(), |guard, device| {
            guard.with_cooldown(device, config.debounce.cooldown(device))
        });

    let event_bus = Arc::new(InProcessEventBus::new(256));

    let dispatcher = DeviceDispatcher::new(
        store,
        Arc::new(guard),
        Arc::clone(&event_bus),
        SystemClock,
    )
    .with_layout(config.dispatch.layout())
    .with_timeout(config.dispatch.write_timeout());
    let pipeline = CommandPipeline::new(CommandInterpreter::new(model), dispatcher);

    let app = arthur_adapter_http_axum::router::build(AppState::new(pipeline, event_bus));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "arthurd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("arthurd stopped");
    Ok(())
}

fn model_backend(config: &Config) -> anyhow::Result<ModelBackend> {
    match config.model.backend {
        ModelBackendKind::Gemini => {
            let model = GeminiModel::new(config.model.gemini.clone())
                .context("failed to create gemini client")?;
            tracing::info!(model = %config.model.gemini.model, "using gemini model");
            Ok(ModelBackend::Gemini(model))
        }
        ModelBackendKind::Virtual => {
            tracing::info!("using scripted model");
            Ok(ModelBackend::Virtual(ScriptedLanguageModel::default()))
        }
    }
}

async fn state_backend(config: &Config) -> anyhow::Result<StateBackend> {
    match config.state_store.backend {
        StoreBackendKind::Firebase => {
            let store = FirebaseStateStore::new(config.state_store.firebase.clone())
                .context("failed to create firebase client")?;
            tracing::info!("using firebase state store");
            Ok(StateBackend::Firebase(store))
        }
        StoreBackendKind::Sqlite => {
            let db = arthur_adapter_storage_sqlite_sqlx::Config {
                database_url: config.state_store.sqlite.url.clone(),
            }
            .build()
            .await
            .context("failed to open sqlite state store")?;
            tracing::info!(url = %config.state_store.sqlite.url, "using sqlite state store");
            Ok(StateBackend::Sqlite(SqliteStateStore::new(db.pool().clone())))
        }
        StoreBackendKind::Virtual => {
            tracing::info!("using virtual state store");
            Ok(StateBackend::Virtual(VirtualStateStore::default()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
