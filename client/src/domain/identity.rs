//! Read-only facts about the authenticated caller.
//!
//! The context is loaded once per session and handed to the lifecycle
//! controller by value. Logging out drops the controller together with its
//! context; nothing mutates it in place.

use super::ports::{CurrentUserSource, CurrentUserSourceError};
use super::{Profile, Role, User, UserId};

/// Snapshot of the current user for the lifetime of one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    user: User,
}

impl IdentityContext {
    /// Wrap an already resolved user.
    pub fn new(user: User) -> Self {
        Self { user }
    }

    /// Ask the session collaborator who the caller is.
    pub async fn load(source: &dyn CurrentUserSource) -> Result<Self, CurrentUserSourceError> {
        let user = source.current_user().await?;
        tracing::debug!(user_id = %user.id(), role = %user.role(), "identity loaded");
        Ok(Self::new(user))
    }

    pub fn user_id(&self) -> UserId {
        self.user.id()
    }

    pub fn role(&self) -> Role {
        self.user.role()
    }

    pub fn profile(&self) -> &Profile {
        self.user.profile()
    }

    pub fn user(&self) -> &User {
        &self.user
    }
}
