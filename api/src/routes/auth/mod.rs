//! Authentication route handlers
//!
//! - `POST /api/v1/auth/send-otp` issues a one-time code
//! - `POST /api/v1/auth/verify-otp` checks it and signs the user in

pub mod send_otp;
pub mod verify_otp;

use std::sync::Arc;

use nest_core::repositories::UserRepository;
use nest_core::services::{AuthService, NotificationSink};

/// Application state that holds shared services
pub struct AppState<U, N>
where
    U: UserRepository,
    N: NotificationSink,
{
    pub auth_service: Arc<AuthService<U, N>>,
}

impl<U, N> AppState<U, N>
where
    U: UserRepository,
    N: NotificationSink,
{
    pub fn new(auth_service: Arc<AuthService<U, N>>) -> Self {
        Self { auth_service }
    }
}
