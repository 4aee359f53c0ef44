//! User repository trait defining the interface for user data persistence.
//!
//! The relational store lives outside this crate; implementations adapt it
//! (or an in-memory stand-in) to this async interface.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Result of recording a successful sign-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserLogin {
    /// The created or refreshed user
    pub user: User,
    /// Whether the user was created by this call
    pub is_new: bool,
}

/// Repository trait for User entity persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by mobile number
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user registered with this mobile
    /// * `Err(DomainError)` - Storage error occurred
    async fn find_by_mobile(&self, mobile: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by their unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Record a verified sign-in for `mobile`
    ///
    /// Idempotent per mobile: creates the user on first call, otherwise
    /// refreshes `last_login_at` on the existing record.
    ///
    /// # Returns
    /// * `Ok(UserLogin)` - The user and whether it was just created
    /// * `Err(DomainError)` - Storage error occurred
    async fn upsert_login(&self, mobile: &str) -> Result<UserLogin, DomainError>;

    /// Replace a stored user
    ///
    /// # Returns
    /// * `Err(DomainError::NotFound)` - No user with that id
    async fn update(&self, user: User) -> Result<User, DomainError>;
}
