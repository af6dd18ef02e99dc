use crate::error::ApiError;
use crate::types::UserId;

/// Outcome of comparing a caller with the owner of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Forbidden,
}

/// Ownership rule: only the identity that owns a record may act on it.
pub fn authorize(subject: UserId, owner: UserId) -> Access {
    if subject == owner {
        Access::Allowed
    } else {
        Access::Forbidden
    }
}

/// `authorize`, turned into the `Forbidden` API error on denial.
pub fn require_owner(subject: UserId, owner: UserId) -> Result<(), ApiError> {
    match authorize(subject, owner) {
        Access::Allowed => Ok(()),
        Access::Forbidden => {
            tracing::debug!("Ownership check failed: user {} is not owner {}", subject, owner);
            Err(ApiError::forbidden("Forbidden"))
        }
    }
}
