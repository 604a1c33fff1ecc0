//! # arthur-adapter-firebase
//!
//! [`DeviceStateStore`] backed by the Firebase Realtime Database REST API.
//! A write is a `PUT {database_url}/{path}.json` whose body is the bare
//! state code; the hardware listens on the same path.
//!
//! ## Dependency rule
//! Depends on `arthur-app` (for port traits) and `arthur-domain` (for domain types).

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;

use arthur_app::ports::DeviceStateStore;
use arthur_domain::error::ArthurError;
use arthur_domain::state::{StateCode, StatePath};

/// Connection settings for one Realtime Database instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FirebaseConfig {
    /// e.g. `https://my-project-default-rtdb.firebaseio.com`
    pub database_url: String,
    /// Database secret or ID token, sent as the `auth` query parameter.
    pub auth: Option<String>,
    pub timeout_secs: u64,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            auth: None,
            timeout_secs: 10,
        }
    }
}

impl FirebaseConfig {
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FirebaseError {
    #[error("firebase database url is empty")]
    MissingUrl,

    #[error("http client error")]
    Http(#[from] reqwest::Error),

    #[error("firebase rejected the write with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl From<FirebaseError> for ArthurError {
    fn from(err: FirebaseError) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Realtime Database client.
#[derive(Debug, Clone)]
pub struct FirebaseStateStore {
    http: reqwest::Client,
    database_url: String,
    auth: Option<String>,
}

impl FirebaseStateStore {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FirebaseError`] when the URL is blank or the HTTP client
    /// cannot be created.
    pub fn new(config: FirebaseConfig) -> Result<Self, FirebaseError> {
        let database_url = config.database_url.trim().trim_end_matches('/').to_string();
        if database_url.is_empty() {
            return Err(FirebaseError::MissingUrl);
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            database_url,
            auth: config.auth.filter(|auth| !auth.is_empty()),
        })
    }

    fn url(&self, path: &StatePath) -> String {
        format!("{}/{}.json", self.database_url, path.as_str().trim_matches('/'))
    }

    async fn put(&self, path: &StatePath, code: StateCode) -> Result<(), FirebaseError> {
        let mut request = self.http.put(self.url(path)).json(&code.value());
        if let Some(auth) = &self.auth {
            request = request.query(&[("auth", auth)]);
        }
        // The url carries the auth token; keep it out of error messages.
        let response = request
            .send()
            .await
            .map_err(|err| FirebaseError::Http(err.without_url()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FirebaseError::Rejected {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }
        tracing::debug!(%path, %code, "firebase state written");
        Ok(())
    }
}

impl DeviceStateStore for FirebaseStateStore {
    fn write(
        &self,
        path: &StatePath,
        code: StateCode,
    ) -> impl Future<Output = Result<(), ArthurError>> + Send {
        async move { self.put(path, code).await.map_err(ArthurError::from) }
    }
}
