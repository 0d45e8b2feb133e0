use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by repositories and service operations.
///
/// Repository `update`/`delete` on an absent id is deliberately a silent
/// no-op, not a `NotFound`; callers that need existence checks use the
/// `get`-style lookups instead.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Insufficient stock: {0} has insufficient balance")]
    InsufficientStock(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ServiceError {
    /// Shorthand used by the fulfillment engine when a requested line cannot
    /// be covered by the referenced inventory record.
    pub fn insufficient_stock(item: impl Into<String>) -> Self {
        ServiceError::InsufficientStock(item.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        ServiceError::NotFound(what.into())
    }
}
