use std::fmt;

use serde::{Deserialize, Serialize};

/// Capability tag attached to an authenticated principal.
///
/// Known roles parse case-insensitively; anything else is kept verbatim in
/// [`Role::Other`] so a persisted identity survives a reload unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Moderator,
    Viewer,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Moderator => "moderator",
            Self::Viewer => "viewer",
            Self::Other(s) => s,
        }
    }

    /// Whether this role may manage every screen of the dashboard.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            "moderator" => Self::Moderator,
            "viewer" => Self::Viewer,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity payload returned by the login endpoint and persisted between
/// runs.
///
/// `token` is the opaque bearer credential. It is deliberately left out of
/// the `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub token: String,
}

impl fmt::Debug for IdentityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Read-only projection of the current session.
///
/// This is all that code outside the session store ever sees; the bearer
/// token is not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub subject_id: String,
    pub display_name: String,
    pub email: String,
    pub role: Role,
}

impl SessionView {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&IdentityRecord> for SessionView {
    fn from(identity: &IdentityRecord) -> Self {
        Self {
            subject_id: identity.id.clone(),
            display_name: identity.name.clone(),
            email: identity.email.clone(),
            role: identity.role.clone(),
        }
    }
}

/// Credentials posted to the login endpoint.
#[derive(Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

impl fmt::Debug for LoginRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
