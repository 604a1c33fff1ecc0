//! `SQLite` implementation of [`DeviceStateStore`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use arthur_app::ports::DeviceStateStore;
use arthur_domain::error::ArthurError;
use arthur_domain::state::{StateCode, StatePath};
use arthur_domain::time::{Timestamp, now};

use crate::error::StorageError;

/// Last value written at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredState {
    pub code: StateCode,
    pub updated_at: Timestamp,
}

struct Wrapper(StoredState);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let code: i64 = row.try_get("code")?;
        let updated_at: Timestamp = row.try_get("updated_at")?;
        let code = u8::try_from(code).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        Ok(Self(StoredState {
            code: StateCode::new(code),
            updated_at,
        }))
    }
}

const UPSERT: &str = "INSERT INTO device_states (path, code, updated_at) VALUES (?, ?, ?) \
     ON CONFLICT(path) DO UPDATE SET code = excluded.code, updated_at = excluded.updated_at";
const SELECT_BY_PATH: &str = "SELECT code, updated_at FROM device_states WHERE path = ?";

/// `SQLite`-backed device-state store. Last write wins per path.
#[derive(Clone)]
pub struct SqliteStateStore {
    pool: SqlitePool,
}

impl SqliteStateStore {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read the state stored at `path`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the query fails or the row is corrupt.
    pub async fn read(&self, path: &StatePath) -> Result<Option<StoredState>, StorageError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_PATH)
            .bind(path.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| match err {
                sqlx::Error::Decode(reason) => StorageError::Corrupt {
                    path: path.to_string(),
                    reason: reason.to_string(),
                },
                other => StorageError::Database(other),
            })?;
        Ok(row.map(|wrapper| wrapper.0))
    }
}

impl DeviceStateStore for SqliteStateStore {
    fn write(
        &self,
        path: &StatePath,
        code: StateCode,
    ) -> impl Future<Output = Result<(), ArthurError>> + Send {
        let pool = self.pool.clone();
        let path = path.to_string();
        async move {
            sqlx::query(UPSERT)
                .bind(&path)
                .bind(i64::from(code.value()))
                .bind(now())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;
            tracing::debug!(%path, %code, "state stored");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use arthur_domain::device::DeviceKind;
    use arthur_domain::state::StateLayout;
    use arthur_domain::user::UserId;

    async fn setup() -> SqliteStateStore {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteStateStore::new(db.pool().clone())
    }

    fn lock_path() -> StatePath {
        StateLayout::default().path(&UserId::parse("abc123").unwrap(), DeviceKind::Lock)
    }

    #[tokio::test]
    async fn should_return_none_for_unwritten_path() {
        let store = setup().await;
        assert_eq!(store.read(&lock_path()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn should_read_back_written_code() {
        let store = setup().await;
        store.write(&lock_path(), StateCode::new(1)).await.unwrap();

        let stored = store.read(&lock_path()).await.unwrap().unwrap();
        assert_eq!(stored.code, StateCode::new(1));
    }

    #[tokio::test]
    async fn should_keep_last_write() {
        let store = setup().await;
        store.write(&lock_path(), StateCode::new(1)).await.unwrap();
        store.write(&lock_path(), StateCode::new(2)).await.unwrap();

        let stored = store.read(&lock_path()).await.unwrap().unwrap();
        assert_eq!(stored.code, StateCode::new(2));
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM device_states")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }

    #[tokio::test]
    async fn should_keep_paths_independent() {
        let store = setup().await;
        let user = UserId::parse("abc123").unwrap();
        let layout = StateLayout::default();
        store
            .write(&layout.path(&user, DeviceKind::Blinds), StateCode::new(2))
            .await
            .unwrap();

        assert_eq!(store.read(&lock_path()).await.unwrap(), None);
        let blinds = store
            .read(&layout.path(&user, DeviceKind::Blinds))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(blinds.code, StateCode::new(2));
    }

    #[tokio::test]
    async fn should_report_corrupt_row() {
        let store = setup().await;
        sqlx::query("INSERT INTO device_states (path, code, updated_at) VALUES (?, 900, ?)")
            .bind(lock_path().as_str())
            .bind(now())
            .execute(&store.pool)
            .await
            .unwrap();

        let err = store.read(&lock_path()).await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }
}
