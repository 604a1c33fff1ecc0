//! Virtual state store — keeps written codes in memory.

use std::collections::{BTreeMap, HashSet};
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use arthur_app::ports::DeviceStateStore;
use arthur_domain::error::ArthurError;
use arthur_domain::state::{StateCode, StatePath};

/// Errors injected by [`VirtualStateStore`].
#[derive(Debug, thiserror::Error)]
pub enum VirtualStoreError {
    #[error("write rejected for node {0}")]
    Rejected(String),
}

impl From<VirtualStoreError> for ArthurError {
    fn from(err: VirtualStoreError) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// In-memory device-state store.
///
/// Nodes (the `{node}` segment of `{root}/{user}/{node}/state`) can be made
/// to fail or to respond slowly.
#[derive(Debug, Default)]
pub struct VirtualStateStore {
    states: Mutex<BTreeMap<String, StateCode>>,
    failing: Mutex<HashSet<String>>,
    latency: Option<Duration>,
}

impl VirtualStateStore {
    /// Delay every write by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Reject writes to `node` until [`Self::restore`] is called.
    pub fn fail_node(&self, node: impl Into<String>) {
        lock(&self.failing).insert(node.into());
    }

    pub fn restore(&self, node: &str) {
        lock(&self.failing).remove(node);
    }

    /// Code last written at `path`.
    #[must_use]
    pub fn get(&self, path: &StatePath) -> Option<StateCode> {
        lock(&self.states).get(path.as_str()).copied()
    }

    /// Every stored `(path, code)` pair, sorted by path.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(String, StateCode)> {
        lock(&self.states)
            .iter()
            .map(|(path, code)| (path.clone(), *code))
            .collect()
    }

    fn node_of(path: &str) -> Option<&str> {
        let mut segments = path.rsplit('/');
        match (segments.next(), segments.next()) {
            (Some("state"), Some(node)) => Some(node),
            _ => None,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl DeviceStateStore for VirtualStateStore {
    fn write(
        &self,
        path: &StatePath,
        code: StateCode,
    ) -> impl Future<Output = Result<(), ArthurError>> + Send {
        let path = path.to_string();
        let latency = self.latency;
        async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            if let Some(node) = Self::node_of(&path)
                && lock(&self.failing).contains(node)
            {
                return Err(VirtualStoreError::Rejected(node.to_string()).into());
            }
            tracing::debug!(%path, %code, "virtual state written");
            lock(&self.states).insert(path, code);
            Ok(())
        }
    }
}
