use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::auth;
use crate::errors::ServiceError;
use crate::models::{User, UserRole, UserStatus};
use crate::store::KeyValueStore;

use super::{read_collection, write_collection, USER_STORAGE_KEY};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
    pub role: UserRole,
    /// Defaults to `Active` when omitted.
    pub status: Option<UserStatus>,
}

/// Shallow-merge update payload. An omitted password leaves the stored
/// credential hash untouched; it is never cleared by an update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub password: Option<String>,
}

/// Repository for the users collection.
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn KeyValueStore>,
    seed_on_empty: bool,
}

impl UserRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, seed_on_empty: bool) -> Self {
        Self {
            store,
            seed_on_empty,
        }
    }

    pub fn list(&self) -> Result<Vec<User>, ServiceError> {
        match read_collection(self.store.as_ref(), USER_STORAGE_KEY)? {
            Some(users) => Ok(users),
            None if self.seed_on_empty => seed_users(),
            None => Ok(Vec::new()),
        }
    }

    pub fn get(&self, id: &str) -> Result<Option<User>, ServiceError> {
        Ok(self.list()?.into_iter().find(|u| u.id == id))
    }

    /// Case-insensitive username lookup, as used by authentication.
    pub fn find_by_username(&self, username: &str) -> Result<Option<User>, ServiceError> {
        Ok(self
            .list()?
            .into_iter()
            .find(|u| u.username.eq_ignore_ascii_case(username)))
    }

    #[instrument(skip(self, request), fields(username = %request.username))]
    pub fn create(&self, request: CreateUserRequest) -> Result<User, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let mut users = self.list()?;
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: request.username,
            email: request.email,
            role: request.role,
            status: request.status.unwrap_or(UserStatus::Active),
            password_hash: auth::hash_password(&request.password)?,
            created_at: Utc::now(),
            last_login: None,
        };
        users.push(user.clone());
        self.save_all(&users)?;

        info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    /// Shallow-merge `updates` into the stored user. Absent ids are a
    /// no-op. A supplied password is re-hashed; an omitted one is kept.
    #[instrument(skip(self, updates), fields(user_id = %id))]
    pub fn update(&self, id: &str, updates: UpdateUserRequest) -> Result<(), ServiceError> {
        let mut users = self.list()?;
        for user in users.iter_mut() {
            if user.id != id {
                continue;
            }
            if let Some(username) = updates.username {
                user.username = username;
            }
            if let Some(email) = updates.email {
                user.email = email;
            }
            if let Some(role) = updates.role {
                user.role = role;
            }
            if let Some(status) = updates.status {
                user.status = status;
            }
            if let Some(password) = updates.password {
                user.password_hash = auth::hash_password(&password)?;
            }
            break;
        }
        self.save_all(&users)
    }

    /// Remove a user. Absent ids leave the collection unchanged.
    #[instrument(skip(self), fields(user_id = %id))]
    pub fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let mut users = self.list()?;
        users.retain(|u| u.id != id);
        self.save_all(&users)
    }

    /// Stamp a successful login. Used by the authentication flow only.
    pub(crate) fn record_login(&self, id: &str, at: DateTime<Utc>) -> Result<(), ServiceError> {
        let mut users = self.list()?;
        for user in users.iter_mut() {
            if user.id == id {
                user.last_login = Some(at);
                break;
            }
        }
        self.save_all(&users)
    }

    fn save_all(&self, users: &[User]) -> Result<(), ServiceError> {
        write_collection(self.store.as_ref(), USER_STORAGE_KEY, users)
    }
}

/// Bootstrap accounts returned by `list` on a never-written store. Seed
/// credentials are hashed like any other: one admin, one standard user.
fn seed_users() -> Result<Vec<User>, ServiceError> {
    let fixed = |rfc3339: &str| {
        DateTime::parse_from_rfc3339(rfc3339)
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    };

    Ok(vec![
        User {
            id: "admin-1".to_string(),
            username: "Dhruv Jain".to_string(),
            email: "dhruv.jain@nexgen.com".to_string(),
            role: UserRole::Admin,
            status: UserStatus::Active,
            password_hash: auth::hash_password("admindhruv1234")?,
            created_at: fixed("2023-01-01T00:00:00Z"),
            last_login: None,
        },
        User {
            id: "user-1".to_string(),
            username: "John Staff".to_string(),
            email: "john.staff@nexgen.com".to_string(),
            role: UserRole::StandardUser,
            status: UserStatus::Active,
            password_hash: auth::hash_password("password123")?,
            created_at: fixed("2023-05-15T00:00:00Z"),
            last_login: None,
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn repo() -> UserRepository {
        UserRepository::new(Arc::new(MemoryStore::new()), false)
    }

    fn sample_request() -> CreateUserRequest {
        CreateUserRequest {
            username: "Priya Sharma".into(),
            email: "priya.sharma@nexgen.com".into(),
            password: "s3cret-pass".into(),
            role: UserRole::StandardUser,
            status: None,
        }
    }

    #[test]
    fn create_hashes_password_and_defaults_to_active() {
        let repo = repo();
        let user = repo.create(sample_request()).unwrap();

        assert_eq!(user.status, UserStatus::Active);
        assert_ne!(user.password_hash, "s3cret-pass");
        assert!(auth::verify_password("s3cret-pass", &user.password_hash));
    }

    #[test]
    fn create_rejects_invalid_email() {
        let repo = repo();
        let mut request = sample_request();
        request.email = "not-an-email".into();
        assert!(matches!(
            repo.create(request).unwrap_err(),
            ServiceError::ValidationError(_)
        ));
    }

    #[test]
    fn update_without_password_keeps_stored_hash() {
        let repo = repo();
        let user = repo.create(sample_request()).unwrap();

        repo.update(
            &user.id,
            UpdateUserRequest {
                email: Some("priya@nexgen.com".into()),
                ..Default::default()
            },
        )
        .unwrap();

        let updated = repo.get(&user.id).unwrap().unwrap();
        assert_eq!(updated.email, "priya@nexgen.com");
        assert_eq!(updated.password_hash, user.password_hash);
    }

    #[test]
    fn update_with_password_rehashes() {
        let repo = repo();
        let user = repo.create(sample_request()).unwrap();

        repo.update(
            &user.id,
            UpdateUserRequest {
                password: Some("brand-new-pass".into()),
                ..Default::default()
            },
        )
        .unwrap();

        let updated = repo.get(&user.id).unwrap().unwrap();
        assert!(auth::verify_password("brand-new-pass", &updated.password_hash));
        assert!(!auth::verify_password("s3cret-pass", &updated.password_hash));
    }

    #[test]
    fn find_by_username_is_case_insensitive() {
        let repo = repo();
        repo.create(sample_request()).unwrap();
        let found = repo.find_by_username("PRIYA SHARMA").unwrap();
        assert!(found.is_some());
    }

    #[test]
    fn delete_unknown_id_is_a_noop() {
        let repo = repo();
        repo.create(sample_request()).unwrap();
        repo.delete("no-such-id").unwrap();
        assert_eq!(repo.list().unwrap().len(), 1);
    }

    #[test]
    fn seeded_list_contains_admin_and_standard_user() {
        let seeded = UserRepository::new(Arc::new(MemoryStore::new()), true);
        let users = seeded.list().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].role, UserRole::Admin);
        assert_eq!(users[1].role, UserRole::StandardUser);
    }
}
