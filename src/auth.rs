//! Credential hashing and the authentication flow.
//!
//! Credentials are stored as Argon2 PHC strings and verified with a salted
//! hash comparison. Authentication failure is a `None` result, not an error:
//! wrong password, unknown user, and inactive account are indistinguishable
//! to the caller.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{User, UserStatus};
use crate::repositories::UserRepository;

/// Hash a plaintext password into a PHC-format string with a fresh salt.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ServiceError::AuthError(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC string. Malformed
/// stored hashes verify as false rather than erroring.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Authentication over the users collection.
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    event_sender: Option<EventSender>,
}

impl AuthService {
    pub fn new(users: UserRepository, event_sender: Option<EventSender>) -> Self {
        Self {
            users,
            event_sender,
        }
    }

    /// Authenticate by case-insensitive username and password. Returns the
    /// matched user (with `last_login` refreshed as a side effect) or
    /// `None` for any failure.
    #[instrument(skip(self, password), fields(username = %username))]
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, ServiceError> {
        let candidate = self
            .users
            .find_by_username(username)?
            .filter(|user| verify_password(password, &user.password_hash))
            .filter(|user| user.status == UserStatus::Active);

        let Some(mut user) = candidate else {
            warn!("Authentication failed");
            return Ok(None);
        };

        let now = Utc::now();
        self.users.record_login(&user.id, now)?;
        user.last_login = Some(now);

        info!(user_id = %user.id, "User authenticated");
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(Event::UserAuthenticated {
                user_id: user.id.clone(),
                at: now,
            }) {
                warn!(error = %e, "Failed to send event");
            }
        }
        Ok(Some(user))
    }
}
