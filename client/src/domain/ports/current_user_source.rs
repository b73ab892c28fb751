//! Driven port for reading the authenticated user.
//!
//! Credential issuance lives elsewhere; this port only answers "who am I" for
//! an already established session.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::User;

define_port_error! {
    /// Errors surfaced while loading the current user.
    pub enum CurrentUserSourceError {
        /// No valid session.
        Unauthorized { message: String } =>
            "session is not authenticated: {message}",
        /// Call exceeded the configured timeout.
        Timeout { message: String } =>
            "current user lookup timed out: {message}",
        /// Network transport failed or the source returned an unexpected status.
        Transport { message: String } =>
            "current user lookup failed: {message}",
        /// Response body could not be decoded.
        Decode { message: String } =>
            "current user response decode failed: {message}",
    }
}

/// Port returning the user bound to the current session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CurrentUserSource: Send + Sync {
    /// Return the authenticated user.
    async fn current_user(&self) -> Result<User, CurrentUserSourceError>;
}

/// Fixture source that always answers with the same user.
#[derive(Debug, Clone)]
pub struct FixtureCurrentUserSource {
    user: User,
}

impl FixtureCurrentUserSource {
    /// Serve `user` as the session owner.
    pub fn new(user: User) -> Self {
        Self { user }
    }
}

#[async_trait]
impl CurrentUserSource for FixtureCurrentUserSource {
    async fn current_user(&self) -> Result<User, CurrentUserSourceError> {
        Ok(self.user.clone())
    }
}
