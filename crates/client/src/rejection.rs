//! Reaction to the backend rejecting the session credential.
//!
//! The consecutive-rejection count lives with the session (see
//! [`SessionStore`](crate::SessionStore)) so it survives across processes
//! sharing the same storage.

use std::num::NonZeroU32;

use crate::Error;

/// When to give up on a credential the backend keeps rejecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RejectionPolicy {
    /// Consecutive 401/403 answers on authenticated calls after which the
    /// session is logged out. `None` never logs out automatically.
    pub logout_after: Option<NonZeroU32>,
}

impl RejectionPolicy {
    pub const DEFAULT_THRESHOLD: u32 = 2;

    pub fn disabled() -> Self {
        Self { logout_after: None }
    }

    pub fn after(rejections: u32) -> Self {
        Self {
            logout_after: NonZeroU32::new(rejections),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.logout_after.is_some()
    }

    /// Whether `consecutive` rejections reach the threshold.
    pub fn is_exhausted(&self, consecutive: u32) -> bool {
        self.logout_after
            .is_some_and(|limit| consecutive >= limit.get())
    }
}

impl Default for RejectionPolicy {
    fn default() -> Self {
        Self::after(Self::DEFAULT_THRESHOLD)
    }
}

/// Whether a call outcome is a credential rejection. Every other outcome,
/// including other failures, resets the count.
pub(crate) fn is_rejection<T>(outcome: &Result<T, Error>) -> bool {
    matches!(outcome, Err(e) if e.is_auth_rejection())
}
