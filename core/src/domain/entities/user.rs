//! User entity representing a resident signed in by mobile number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity representing a registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Verified mobile number (unique)
    pub mobile: String,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the user's last login
    pub last_login_at: Option<DateTime<Utc>>,

    /// Whether the user account may sign in
    pub is_active: bool,
}

impl User {
    /// Creates a new active user
    pub fn new(mobile: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            mobile,
            created_at: Utc::now(),
            last_login_at: None,
            is_active: true,
        }
    }

    /// Updates the last login timestamp
    pub fn record_login(&mut self, at: DateTime<Utc>) {
        self.last_login_at = Some(at);
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }
}
