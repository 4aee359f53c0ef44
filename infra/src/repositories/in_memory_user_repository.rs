//! In-memory implementation of UserRepository
//!
//! Stands in for the relational store. Mobile numbers are unique; a second
//! index maps each mobile to its user id.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use nest_core::domain::entities::user::User;
use nest_core::errors::DomainError;
use nest_core::repositories::{UserLogin, UserRepository};

#[derive(Default)]
struct UserTable {
    by_id: HashMap<Uuid, User>,
    by_mobile: HashMap<String, Uuid>,
}

/// In-memory user repository
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn count(&self) -> usize {
        self.table.read().await.by_id.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_mobile(&self, mobile: &str) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table
            .by_mobile
            .get(mobile)
            .and_then(|id| table.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table.by_id.get(&id).cloned())
    }

    async fn upsert_login(&self, mobile: &str) -> Result<UserLogin, DomainError> {
        let mut table = self.table.write().await;
        let now = Utc::now();

        if let Some(id) = table.by_mobile.get(mobile).copied() {
            let user = table.by_id.get_mut(&id).ok_or_else(|| DomainError::Internal {
                message: format!("User index out of sync for id {}", id),
            })?;
            user.record_login(now);
            return Ok(UserLogin {
                user: user.clone(),
                is_new: false,
            });
        }

        let mut user = User::new(mobile.to_string());
        user.record_login(now);
        table.by_mobile.insert(mobile.to_string(), user.id);
        table.by_id.insert(user.id, user.clone());

        tracing::debug!(user_id = %user.id, event = "user_created", "Created user on first login");

        Ok(UserLogin { user, is_new: true })
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let mut table = self.table.write().await;

        let previous_mobile = match table.by_id.get(&user.id) {
            Some(existing) => existing.mobile.clone(),
            None => {
                return Err(DomainError::NotFound {
                    resource: format!("user {}", user.id),
                })
            }
        };

        if previous_mobile != user.mobile {
            if table.by_mobile.contains_key(&user.mobile) {
                return Err(DomainError::Validation {
                    message: "Mobile number already registered".to_string(),
                });
            }
            table.by_mobile.remove(&previous_mobile);
            table.by_mobile.insert(user.mobile.clone(), user.id);
        }

        table.by_id.insert(user.id, user.clone());
        Ok(user)
    }
}
