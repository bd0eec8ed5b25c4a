//! Vitrine HTTP Client
//!
//! Session handling and the authenticated request gateway for the Vitrine
//! content backend. Every backend call goes through [`VitrineClient`],
//! which attaches the current session's bearer token and classifies
//! failures; the session itself lives in a [`SessionStore`].
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use vitrine_client::{FileStorage, VitrineClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), vitrine_client::Error> {
//!     let client = VitrineClient::builder("https://api.example.com")
//!         .storage(Arc::new(FileStorage::new("/tmp/vitrine-session.json")))
//!         .build()?;
//!
//!     // Pick up a session left by an earlier run, or log in.
//!     if client.session().restore().is_none() {
//!         client.session().try_login("admin@example.com", "secret").await?;
//!     }
//!
//!     for category in client.list_main_categories().await? {
//!         println!("{} {}", category.category_id, category.name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Failure model
//!
//! - [`VitrineClient::request`] is the raw gateway: non-2xx statuses and
//!   network failures are [`Error::Transport`]; the envelope is returned
//!   verbatim, even when it says `success: false`.
//! - [`VitrineClient::call`] and the typed endpoint methods turn
//!   `success: false` into [`Error::Business`] and log the session out
//!   after repeated credential rejections (see [`RejectionPolicy`]).
//! - Nothing is retried.

mod banners;
mod categories;
mod error;
mod links;
mod rejection;
mod request;
mod session;
pub mod storage;
mod top_data;

pub use error::Error;
pub use rejection::RejectionPolicy;
pub use request::{Body, RequestOptions, Upload, multipart_form};
pub use session::{SessionState, SessionStore};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};

pub use reqwest::Method;

// Re-export core types so callers don't need a direct `vitrine_core` dependency.
pub use vitrine_core;

use std::sync::Arc;
use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use vitrine_core::{Envelope, SessionView};

use crate::rejection::is_rejection;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Path of the login endpoint, relative to the auth origin.
pub const LOGIN_PATH: &str = "/admin/login";

/// Characters left unescaped when an identifier is spliced into a path.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// HTTP client for the Vitrine content backend.
///
/// Cheap to clone; clones share the session store.
#[derive(Debug, Clone)]
pub struct VitrineClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
    rejection_policy: RejectionPolicy,
}

/// Builder for configuring a [`VitrineClient`].
#[derive(Debug)]
pub struct VitrineClientBuilder {
    base_url: String,
    auth_url: Option<String>,
    timeout: Duration,
    client: Option<Client>,
    storage: Option<Arc<dyn SessionStorage>>,
    rejection_policy: RejectionPolicy,
}

impl VitrineClientBuilder {
    /// Create a new builder with the given backend origin.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: trim_origin(base_url.into()),
            auth_url: None,
            timeout: DEFAULT_TIMEOUT,
            client: None,
            storage: None,
            rejection_policy: RejectionPolicy::default(),
        }
    }

    /// Serve the login endpoint from a different origin than the API.
    ///
    /// By default both live on the base URL.
    #[must_use]
    pub fn auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.auth_url = Some(trim_origin(auth_url.into()));
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a custom reqwest Client.
    ///
    /// Useful for configuring TLS, proxies, or other advanced settings.
    #[must_use]
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Where the session is persisted. Defaults to [`MemoryStorage`].
    #[must_use]
    pub fn storage(mut self, storage: Arc<dyn SessionStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// How to react to repeated credential rejections.
    #[must_use]
    pub fn rejection_policy(mut self, policy: RejectionPolicy) -> Self {
        self.rejection_policy = policy;
        self
    }

    /// Build the client. The session starts in [`SessionState::Unknown`];
    /// call [`SessionStore::restore`] once before use.
    pub fn build(self) -> Result<VitrineClient, Error> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Configuration(format!(
                "base URL must be http(s): {}",
                self.base_url
            )));
        }

        let client = match self.client {
            Some(c) => c,
            None => Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| Error::Configuration(e.to_string()))?,
        };

        let auth_origin = self.auth_url.as_deref().unwrap_or(&self.base_url);
        let login_url = format!("{auth_origin}{LOGIN_PATH}");
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStorage::new()));
        let session = SessionStore::new(storage, client.clone(), login_url);

        Ok(VitrineClient {
            client,
            base_url: self.base_url,
            session: Arc::new(session),
            rejection_policy: self.rejection_policy,
        })
    }
}

fn trim_origin(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

impl VitrineClient {
    /// Create a new client with default configuration and in-memory
    /// session storage.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        VitrineClientBuilder::new(base_url).build()
    }

    /// Create a builder for advanced configuration.
    pub fn builder(base_url: impl Into<String>) -> VitrineClientBuilder {
        VitrineClientBuilder::new(base_url)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The session store shared by every clone of this client.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// The current session, or [`Error::Unauthenticated`].
    pub fn require_session(&self) -> Result<SessionView, Error> {
        self.session.current().ok_or(Error::Unauthenticated)
    }

    // =========================================================================
    // Gateway
    // =========================================================================

    /// Issue one call against `<base URL><path>`.
    ///
    /// JSON bodies get `Content-Type: application/json`; multipart bodies
    /// get whatever boundary type the transport generates. The session's
    /// bearer token is attached when logged in and omitted otherwise.
    /// Header overrides in `options` win over both defaults.
    ///
    /// A non-2xx status fails with [`Error::Transport`] without reading the
    /// body. A 2xx body is returned as a verbatim [`Envelope`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> Result<(), vitrine_client::Error> {
    /// use vitrine_client::{RequestOptions, VitrineClient};
    ///
    /// let client = VitrineClient::new("https://api.example.com")?;
    /// let envelope = client.request("/categories/main", RequestOptions::get()).await?;
    /// if !envelope.success {
    ///     println!("backend said no: {:?}", envelope.message);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Envelope, Error> {
        let url = format!("{}{}", self.base_url, path);
        let RequestOptions {
            method,
            body,
            headers: overrides,
        } = options;

        let mut headers = HeaderMap::new();
        if !body.is_multipart() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        if let Some(auth) = self.session.authorization() {
            headers.insert(AUTHORIZATION, auth);
        }
        apply_overrides(&mut headers, overrides)?;

        let mut req = self.client.request(method.clone(), &url);
        req = match body {
            Body::Empty => req,
            Body::Json(value) => {
                let bytes = serde_json::to_vec(&value).map_err(|e| Error::Encoding(e.to_string()))?;
                req.body(bytes)
            }
            Body::Multipart(form) => req.multipart(form),
        };
        // Applied after the body so a multipart boundary header survives
        // unless an override names Content-Type explicitly.
        req = req.headers(headers);

        let response = req.send().await.map_err(|e| {
            debug!(%method, path, error = %e, "gateway call failed");
            Error::from_reqwest(&e)
        })?;

        let status = response.status();
        debug!(%method, path, status = status.as_u16(), "gateway call completed");
        if !status.is_success() {
            return Err(Error::Transport {
                status: Some(status.as_u16()),
                message: format!("{method} {path} returned {status}"),
            });
        }

        response
            .json::<Envelope>()
            .await
            .map_err(|e| Error::Deserialization(e.to_string()))
    }

    /// Gateway call that feeds the credential-rejection policy.
    ///
    /// Only calls made with a session count, and only against the session
    /// they were made with: a login that lands while a call is in flight is
    /// never undone by that call's rejection.
    async fn dispatch(&self, path: &str, options: RequestOptions) -> Result<Envelope, Error> {
        let generation = self
            .session
            .generation()
            .filter(|_| self.rejection_policy.is_enabled());
        let result = self.request(path, options).await;
        if let Some(generation) = generation {
            let rejected = is_rejection(&result);
            if self
                .session
                .record_outcome(generation, rejected, self.rejection_policy)
            {
                warn!(path, "credential rejected repeatedly, dropped session");
            }
        }
        result
    }

    /// Call an endpoint and require a successful envelope with a payload.
    pub async fn call<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, Error> {
        let envelope = self.dispatch(path, options).await?;
        Ok(decode::<T>(envelope)?.into_result()?)
    }

    /// Call an endpoint whose successful payload may be absent.
    pub async fn call_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Option<T>, Error> {
        let envelope = self.dispatch(path, options).await?;
        Ok(decode::<T>(envelope)?.into_optional()?)
    }

    /// Call an endpoint for its side effect; returns the backend message.
    pub async fn call_ack(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Option<String>, Error> {
        let envelope = self.dispatch(path, options).await?;
        Ok(envelope.into_ack()?)
    }
}

fn apply_overrides(
    headers: &mut HeaderMap,
    overrides: Vec<(String, Option<String>)>,
) -> Result<(), Error> {
    for (name, value) in overrides {
        let header = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::Configuration(format!("invalid header name {name:?}: {e}")))?;
        match value {
            Some(value) => {
                let value = HeaderValue::from_str(&value).map_err(|e| {
                    Error::Configuration(format!("invalid value for header {name:?}: {e}"))
                })?;
                headers.insert(header, value);
            }
            None => {
                headers.remove(&header);
            }
        }
    }
    Ok(())
}

/// Decode the payload, skipping it when the envelope already failed.
fn decode<T: DeserializeOwned>(mut envelope: Envelope) -> Result<Envelope<T>, Error> {
    if !envelope.success {
        envelope.data = None;
    }
    envelope
        .decode()
        .map_err(|e| Error::Deserialization(e.to_string()))
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, Error> {
    serde_json::to_value(value).map_err(|e| Error::Encoding(e.to_string()))
}

/// Percent-encode an identifier for use as one path segment.
pub(crate) fn segment(id: &str) -> String {
    utf8_percent_encode(id, PATH_SEGMENT).to_string()
}
