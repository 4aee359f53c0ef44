//! Repository interfaces implemented by the infrastructure layer.

pub mod user;

pub use user::{UserLogin, UserRepository};
