//! Debounce guard — per (user, device) cool-down windows.
//!
//! The entry table is process-wide and shared by concurrent pipeline runs.
//! Expiry is lazy: an entry simply stops counting once `busy_until` passes.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OwnedMutexGuard;

use arthur_domain::capability;
use arthur_domain::debounce::{DebounceEntry, DeviceStatus};
use arthur_domain::device::DeviceKind;
use arthur_domain::time::{Duration, Timestamp};
use arthur_domain::user::UserId;

type Key = (UserId, DeviceKind);
type LockTable = Mutex<HashMap<Key, Arc<tokio::sync::Mutex<()>>>>;

/// Exclusive right to run acquire → write → release for one key.
///
/// Dropping the permit lets the next dispatch for the same key proceed,
/// and forgets the key's lock once nobody else is waiting on it.
#[derive(Debug)]
pub struct KeyPermit {
    key: Key,
    locks: Arc<LockTable>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyPermit {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Only the table itself still refers to the lock.
        if locks
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.key);
        }
    }
}

/// Tracks cool-down windows after successful actuations.
#[derive(Debug)]
pub struct DebounceGuard {
    cooldowns: BTreeMap<DeviceKind, Duration>,
    entries: Mutex<HashMap<Key, DebounceEntry>>,
    locks: Arc<LockTable>,
}

impl Default for DebounceGuard {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl DebounceGuard {
    /// A guard using the cool-downs of the capability table.
    #[must_use]
    pub fn with_defaults() -> Self {
        let cooldowns = DeviceKind::ALL
            .into_iter()
            .filter_map(|device| capability::default_cooldown(device).map(|d| (device, d)))
            .collect();
        Self {
            cooldowns,
            entries: Mutex::new(HashMap::new()),
            locks: Arc::default(),
        }
    }

    /// Override the cool-down of `device`. `None` makes it always acquirable.
    #[must_use]
    pub fn with_cooldown(mut self, device: DeviceKind, cooldown: Option<Duration>) -> Self {
        match cooldown {
            Some(duration) if duration > Duration::zero() => {
                self.cooldowns.insert(device, duration);
            }
            _ => {
                self.cooldowns.remove(&device);
            }
        }
        self
    }

    /// Cool-down configured for `device`, if any.
    #[must_use]
    pub fn cooldown(&self, device: DeviceKind) -> Option<Duration> {
        self.cooldowns.get(&device).copied()
    }

    /// Whether `user` may actuate `device` at `now`.
    ///
    /// Never creates an entry; see [`Self::release`].
    pub fn try_acquire(&self, user: &UserId, device: DeviceKind, now: Timestamp) -> bool {
        if self.cooldown(device).is_none() {
            return true;
        }
        !self.is_busy(user, device, now)
    }

    /// Start (or restart) the window for `(user, device)`.
    pub fn release(&self, user: &UserId, device: DeviceKind, now: Timestamp, duration: Duration) {
        let entry = DebounceEntry::new(user.clone(), device, now, duration);
        tracing::debug!(%user, %device, busy_until = %entry.busy_until, "cool-down started");
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((user.clone(), device), entry);
    }

    /// End of the active window, if `device` is busy for `user` at `now`.
    #[must_use]
    pub fn busy_until(
        &self,
        user: &UserId,
        device: DeviceKind,
        now: Timestamp,
    ) -> Option<Timestamp> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&(user.clone(), device))
            .filter(|entry| entry.is_active(now))
            .map(|entry| entry.busy_until)
    }

    #[must_use]
    pub fn is_busy(&self, user: &UserId, device: DeviceKind, now: Timestamp) -> bool {
        self.busy_until(user, device, now).is_some()
    }

    /// Busy signal for every device of `user`, in [`DeviceKind::ALL`] order.
    #[must_use]
    pub fn statuses(&self, user: &UserId, now: Timestamp) -> Vec<DeviceStatus> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        DeviceKind::ALL
            .into_iter()
            .map(|device| {
                DeviceStatus::from_entry(device, entries.get(&(user.clone(), device)), now)
            })
            .collect()
    }

    /// Wait for exclusive access to the `(user, device)` key.
    pub async fn serialize(&self, user: &UserId, device: DeviceKind) -> KeyPermit {
        let key = (user.clone(), device);
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(key.clone()).or_default())
        };
        KeyPermit {
            key,
            locks: Arc::clone(&self.locks),
            guard: Some(lock.lock_owned().await),
        }
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
