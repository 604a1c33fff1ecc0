//! Event bus port — publish/subscribe for actuation events.

use std::future::Future;

use arthur_domain::error::ArthurError;
use arthur_domain::event::Event;

/// Publishes domain events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), ArthurError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), ArthurError>> + Send {
        (**self).publish(event)
    }
}
