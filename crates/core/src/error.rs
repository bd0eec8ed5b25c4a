use thiserror::Error;

/// A call that reached the backend and was answered, but not successfully.
///
/// This is the business-level failure of an envelope; transport failures
/// are a separate concern of the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusinessError {
    /// The envelope carried `success: false`.
    #[error("backend rejected the request: {0}")]
    Rejected(String),

    /// The envelope reported success but carried no payload.
    #[error("backend reported success without a payload")]
    MissingData,
}

impl BusinessError {
    pub(crate) fn rejected(message: Option<String>) -> Self {
        Self::Rejected(message.unwrap_or_else(|| "no message given".to_owned()))
    }
}
