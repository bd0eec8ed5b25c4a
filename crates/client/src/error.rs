use std::path::PathBuf;

use thiserror::Error;
use vitrine_core::BusinessError;

use crate::storage::StorageError;

/// Errors returned by the Vitrine client.
#[derive(Debug, Error)]
pub enum Error {
    /// The backend was unreachable, the call was aborted, or it answered
    /// with a non-2xx status.
    #[error("transport error: {message}")]
    Transport {
        /// HTTP status, when the backend answered at all.
        status: Option<u16>,
        message: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("failed to decode response: {0}")]
    Deserialization(String),

    /// The request body could not be encoded.
    #[error("failed to encode request: {0}")]
    Encoding(String),

    /// The envelope was parsed but reported failure.
    #[error(transparent)]
    Business(#[from] BusinessError),

    /// Invalid client configuration or request options.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Persisted session storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// An operation that requires a session ran while logged out.
    #[error("not logged in")]
    Unauthenticated,

    /// A file selected for upload could not be read.
    #[error("failed to read upload {}: {source}", path.display())]
    Upload {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// HTTP status carried by a transport error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether the backend rejected the credential (401 or 403).
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Whether the failure is a business-level `success: false`.
    pub fn is_business(&self) -> bool {
        matches!(self, Self::Business(_))
    }

    pub(crate) fn from_reqwest(err: &reqwest::Error) -> Self {
        Self::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
