use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role gating administrative actions in the consuming layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    StandardUser,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Inactive,
}

/// A dashboard account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier.
    pub id: String,

    /// Login name; matched case-insensitively during authentication.
    pub username: String,

    pub email: String,

    pub role: UserRole,

    /// Inactive accounts authenticate to the same failure signal as wrong
    /// credentials.
    pub status: UserStatus,

    /// Argon2 PHC-format credential hash. Update payloads that omit a
    /// password leave this untouched.
    pub password_hash: String,

    pub created_at: DateTime<Utc>,

    /// Refreshed by the authentication flow on every successful login.
    pub last_login: Option<DateTime<Utc>>,
}
