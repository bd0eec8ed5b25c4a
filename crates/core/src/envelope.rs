use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::BusinessError;

/// The uniform `{ success, message, data }` shape every backend call returns.
///
/// The envelope is parsed verbatim; `success` is never normalized. Callers
/// that want a typed outcome use [`Envelope::into_result`] and friends,
/// which treat `success == false` as a [`BusinessError`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = serde_json::Value> {
    /// Whether the backend considers the call successful.
    pub success: bool,
    /// Optional human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Endpoint-specific payload; a missing key reads as `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Build a successful envelope carrying `data`.
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Build a failed envelope with a message.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }

    /// Returns `true` when the backend reported success.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Require a successful envelope with a payload.
    ///
    /// `success == false` yields [`BusinessError::Rejected`]; a successful
    /// envelope without `data` yields [`BusinessError::MissingData`].
    pub fn into_result(self) -> Result<T, BusinessError> {
        if !self.success {
            return Err(BusinessError::rejected(self.message));
        }
        self.data.ok_or(BusinessError::MissingData)
    }

    /// Like [`into_result`](Self::into_result), but an absent payload is a
    /// valid "nothing there yet" answer.
    pub fn into_optional(self) -> Result<Option<T>, BusinessError> {
        if !self.success {
            return Err(BusinessError::rejected(self.message));
        }
        Ok(self.data)
    }

    /// Require success and ignore the payload, returning the message if any.
    pub fn into_ack(self) -> Result<Option<String>, BusinessError> {
        if !self.success {
            return Err(BusinessError::rejected(self.message));
        }
        Ok(self.message)
    }
}

impl Envelope<serde_json::Value> {
    /// Reinterpret the raw JSON payload as a concrete type.
    pub fn decode<U: DeserializeOwned>(self) -> Result<Envelope<U>, serde_json::Error> {
        let data = self.data.map(serde_json::from_value).transpose()?;
        Ok(Envelope {
            success: self.success,
            message: self.message,
            data,
        })
    }
}
