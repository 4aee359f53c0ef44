//! Mock implementations for testing authentication service

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;
use crate::repositories::{UserLogin, UserRepository};
use crate::services::otp::NotificationSink;

pub struct MockUserRepository {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_existing_user(user: User) -> Self {
        let repo = Self::new();
        repo.users.lock().unwrap().push(user);
        repo
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_mobile(&self, mobile: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.mobile == mobile).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn upsert_login(&self, mobile: &str) -> Result<UserLogin, DomainError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.mobile == mobile) {
            user.record_login(Utc::now());
            return Ok(UserLogin {
                user: user.clone(),
                is_new: false,
            });
        }

        let mut user = User::new(mobile.to_string());
        user.record_login(Utc::now());
        users.push(user.clone());
        Ok(UserLogin { user, is_new: true })
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(user)
            }
            None => Err(DomainError::NotFound {
                resource: format!("user {}", user.id),
            }),
        }
    }
}

pub struct MockNotificationSink {
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
    pub should_fail: bool,
}

impl MockNotificationSink {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            should_fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }

    /// Last code delivered to `mobile`
    pub fn last_code_for(&self, mobile: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == mobile)
            .map(|(_, code)| code.clone())
    }
}

#[async_trait]
impl NotificationSink for MockNotificationSink {
    async fn send_code(&self, subject: &str, code: &str) -> Result<String, String> {
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), code.to_string()));
        if self.should_fail {
            Err("SMS gateway unavailable".to_string())
        } else {
            Ok(format!("mock-{}", Uuid::new_v4()))
        }
    }
}
