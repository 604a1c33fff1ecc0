//! Device state store port — the remote store the hardware watches.

use std::future::Future;

use arthur_domain::error::ArthurError;
use arthur_domain::state::{StateCode, StatePath};

/// Shared key/value store holding one integer state per (user, device).
///
/// Writes are independent and last-write-wins; no transactions or locking
/// are expected from implementations.
pub trait DeviceStateStore {
    /// Write `code` at `path`, resolving once the store acknowledged it.
    fn write(
        &self,
        path: &StatePath,
        code: StateCode,
    ) -> impl Future<Output = Result<(), ArthurError>> + Send;
}

impl<T: DeviceStateStore + Send + Sync> DeviceStateStore for std::sync::Arc<T> {
    fn write(
        &self,
        path: &StatePath,
        code: StateCode,
    ) -> impl Future<Output = Result<(), ArthurError>> + Send {
        (**self).write(path, code)
    }
}
