//! Shared application state for axum handlers.

use std::sync::Arc;

use arthur_app::event_bus::InProcessEventBus;
use arthur_app::services::pipeline::CommandPipeline;

/// Application state shared across all axum handlers.
///
/// Generic over the pipeline's model, store, publisher and clock to avoid
/// dynamic dispatch. `Clone` is implemented manually so only the `Arc`
/// wrappers are cloned.
pub struct AppState<M, S, P, C> {
    pub pipeline: Arc<CommandPipeline<M, S, P, C>>,
    /// Bus the SSE endpoint subscribes to.
    pub event_bus: Arc<InProcessEventBus>,
}

impl<M, S, P, C> Clone for AppState<M, S, P, C> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            event_bus: Arc::clone(&self.event_bus),
        }
    }
}

impl<M, S, P, C> AppState<M, S, P, C> {
    pub fn new(pipeline: CommandPipeline<M, S, P, C>, event_bus: Arc<InProcessEventBus>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            event_bus,
        }
    }
}
