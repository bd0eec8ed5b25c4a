//! The session store: single owner of "who is logged in".
//!
//! In-memory state and persisted storage change together under one write
//! lock, so no caller can observe one updated without the other. The lock
//! is never held across an `.await`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use reqwest::Client;
use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};
use vitrine_core::{BusinessError, Envelope, IdentityRecord, LoginRequest, SessionView};

use crate::storage::{IDENTITY_KEY, REJECTIONS_KEY, SessionStorage, StorageError, TOKEN_KEY};
use crate::{Error, RejectionPolicy};

/// Lifecycle state of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// [`SessionStore::restore`] has not run yet.
    Unknown,
    LoggedOut,
    LoggedIn,
}

struct Session {
    view: SessionView,
    token: SecretString,
    /// Distinguishes this session from any later one in the same store.
    generation: u64,
    /// Consecutive credential rejections, mirrored in [`REJECTIONS_KEY`].
    rejections: u32,
}

enum Slot {
    Unknown,
    LoggedOut,
    LoggedIn(Session),
}

impl Slot {
    fn state(&self) -> SessionState {
        match self {
            Self::Unknown => SessionState::Unknown,
            Self::LoggedOut => SessionState::LoggedOut,
            Self::LoggedIn(_) => SessionState::LoggedIn,
        }
    }
}

/// Owns the authenticated identity and its persistence.
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    http: Client,
    login_url: String,
    slot: RwLock<Slot>,
    generations: AtomicU64,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("login_url", &self.login_url)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create a store in the [`SessionState::Unknown`] state.
    ///
    /// `login_url` is the absolute URL of the login endpoint.
    pub fn new(
        storage: Arc<dyn SessionStorage>,
        http: Client,
        login_url: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            http,
            login_url: login_url.into(),
            slot: RwLock::new(Slot::Unknown),
            generations: AtomicU64::new(0),
        }
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    pub fn state(&self) -> SessionState {
        self.slot.read().state()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::LoggedIn
    }

    /// Read-only projection of the current session, if any.
    pub fn current(&self) -> Option<SessionView> {
        match &*self.slot.read() {
            Slot::LoggedIn(session) => Some(session.view.clone()),
            _ => None,
        }
    }

    /// Rehydrate the session from persisted storage.
    ///
    /// Never fails: anything missing, half-present, or unparsable ends in
    /// [`SessionState::LoggedOut`], and inconsistent entries are cleared.
    pub fn restore(&self) -> Option<SessionView> {
        let mut slot = self.slot.write();

        let token = self.storage.read(TOKEN_KEY);
        let identity = self.storage.read(IDENTITY_KEY);

        let restored = match (token, identity) {
            (Ok(None), Ok(None)) => None,
            (Ok(Some(token)), Ok(Some(identity))) if !token.is_empty() => {
                match serde_json::from_str::<IdentityRecord>(&identity) {
                    Ok(record) => Some(Session {
                        view: SessionView::from(&record),
                        token: SecretString::new(token),
                        generation: self.next_generation(),
                        rejections: self.persisted_rejections(),
                    }),
                    Err(e) => {
                        warn!(error = %e, "persisted identity is not valid JSON, clearing session");
                        self.clear_storage();
                        None
                    }
                }
            }
            (Err(e @ StorageError::Corrupt { .. }), _)
            | (_, Err(e @ StorageError::Corrupt { .. })) => {
                warn!(error = %e, "session storage is corrupt, clearing session");
                self.clear_storage();
                None
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "session storage unreadable, starting logged out");
                None
            }
            _ => {
                warn!("persisted session is incomplete, clearing session");
                self.clear_storage();
                None
            }
        };

        match restored {
            Some(session) => {
                let view = session.view.clone();
                debug!(subject_id = %view.subject_id, role = %view.role, "session restored");
                *slot = Slot::LoggedIn(session);
                Some(view)
            }
            None => {
                *slot = Slot::LoggedOut;
                None
            }
        }
    }

    /// Exchange credentials for a session.
    ///
    /// Returns `true` on success. Every failure (bad credentials, network,
    /// unexpected body, storage) maps to `false` and leaves any prior
    /// session untouched; use [`try_login`](Self::try_login) for the reason.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        match self.try_login(email, password).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "login failed");
                false
            }
        }
    }

    /// Exchange credentials for a session, reporting why it failed.
    ///
    /// The session is persisted synchronously on the calling task. With
    /// [`FileStorage`](crate::FileStorage) that is a small write plus fsync
    /// and rename, which briefly blocks the runtime worker. Embedders on a
    /// latency-sensitive runtime can supply a storage backend that does not
    /// touch the disk.
    pub async fn try_login(&self, email: &str, password: &str) -> Result<SessionView, Error> {
        let request = LoginRequest { email, password };
        debug!(url = %self.login_url, ?request, "sending login request");

        let response = self
            .http
            .post(&self.login_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport {
                status: Some(status.as_u16()),
                message: format!("login endpoint returned {status}"),
            });
        }

        let envelope = response
            .json::<Envelope<IdentityRecord>>()
            .await
            .map_err(|e| Error::Deserialization(e.to_string()))?;
        let identity = envelope.into_result()?;
        if identity.token.is_empty() {
            return Err(BusinessError::MissingData.into());
        }

        let serialized =
            serde_json::to_string(&identity).map_err(|e| Error::Encoding(e.to_string()))?;

        let mut slot = self.slot.write();
        self.storage.write(&[
            (TOKEN_KEY, identity.token.as_str()),
            (IDENTITY_KEY, serialized.as_str()),
        ])?;

        if let Err(e) = self.storage.remove(&[REJECTIONS_KEY]) {
            warn!(error = %e, "failed to reset persisted rejection count");
        }

        let view = SessionView::from(&identity);
        *slot = Slot::LoggedIn(Session {
            view: view.clone(),
            token: SecretString::new(identity.token),
            generation: self.next_generation(),
            rejections: 0,
        });
        info!(subject_id = %view.subject_id, role = %view.role, "logged in");
        Ok(view)
    }

    /// Destroy the session. Safe to call when logged out.
    pub fn logout(&self) {
        let mut slot = self.slot.write();
        self.clear_storage();
        if matches!(*slot, Slot::LoggedIn(_)) {
            info!("logged out");
        }
        *slot = Slot::LoggedOut;
    }

    /// `Authorization` header value for the current session.
    pub(crate) fn authorization(&self) -> Option<HeaderValue> {
        let slot = self.slot.read();
        let Slot::LoggedIn(session) = &*slot else {
            return None;
        };
        let mut value =
            HeaderValue::from_str(&format!("Bearer {}", session.token.expose_secret())).ok()?;
        value.set_sensitive(true);
        Some(value)
    }

    /// Identifies the live session, if any. A later login or restore
    /// yields a different value.
    pub(crate) fn generation(&self) -> Option<u64> {
        match &*self.slot.read() {
            Slot::LoggedIn(session) => Some(session.generation),
            _ => None,
        }
    }

    /// Record whether an authenticated call made under session `generation`
    /// had its credential rejected.
    ///
    /// The count is persisted so it carries across processes sharing the
    /// storage. Returns `true` when the policy threshold is reached and the
    /// session was logged out. Outcomes for a session that has since been
    /// replaced or dropped are ignored.
    pub(crate) fn record_outcome(
        &self,
        generation: u64,
        rejected: bool,
        policy: RejectionPolicy,
    ) -> bool {
        let mut slot = self.slot.write();
        let Slot::LoggedIn(session) = &mut *slot else {
            return false;
        };
        if session.generation != generation {
            debug!("ignoring outcome of a call made under a replaced session");
            return false;
        }

        if !rejected {
            if session.rejections > 0 {
                session.rejections = 0;
                if let Err(e) = self.storage.remove(&[REJECTIONS_KEY]) {
                    warn!(error = %e, "failed to reset persisted rejection count");
                }
            }
            return false;
        }

        session.rejections = session.rejections.saturating_add(1);
        let count = session.rejections;
        if policy.is_exhausted(count) {
            self.clear_storage();
            *slot = Slot::LoggedOut;
            info!(rejections = count, "credential rejected repeatedly, logged out");
            return true;
        }

        let value = count.to_string();
        if let Err(e) = self.storage.write(&[(REJECTIONS_KEY, value.as_str())]) {
            warn!(error = %e, "failed to persist rejection count");
        }
        false
    }

    fn next_generation(&self) -> u64 {
        self.generations.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn persisted_rejections(&self) -> u32 {
        match self.storage.read(REJECTIONS_KEY) {
            Ok(Some(value)) => value.trim().parse().unwrap_or(0),
            Ok(None) => 0,
            Err(e) => {
                warn!(error = %e, "failed to read persisted rejection count");
                0
            }
        }
    }

    fn clear_storage(&self) {
        if let Err(e) = self.storage.remove(&[TOKEN_KEY, IDENTITY_KEY, REJECTIONS_KEY]) {
            warn!(error = %e, "failed to clear persisted session");
        }
    }
}
