//! Driven port for resolving user ids to full user records.

use std::collections::BTreeMap;

use async_trait::async_trait;
use futures_util::future::join_all;

use super::define_port_error;
use crate::domain::{User, UserId};

define_port_error! {
    /// Errors surfaced while looking up a user profile.
    pub enum ProfileLookupError {
        /// No user with the requested id is visible to the caller.
        NotFound { message: String } =>
            "profile not found: {message}",
        /// Caller may not read the profile source.
        Forbidden { message: String } =>
            "profile lookup forbidden: {message}",
        /// Lookup exceeded the configured timeout.
        Timeout { message: String } =>
            "profile lookup timed out: {message}",
        /// Network transport failed or the source returned an unexpected status.
        Transport { message: String } =>
            "profile lookup transport failed: {message}",
        /// Response body could not be decoded.
        Decode { message: String } =>
            "profile lookup decode failed: {message}",
    }
}

/// Per-id outcomes of a batch lookup.
pub type ProfileLookupResults = BTreeMap<UserId, Result<User, ProfileLookupError>>;

/// Port for fetching users by id. Lookups may fail independently per id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    /// Resolve `id` to the user record.
    async fn lookup_user(&self, id: UserId) -> Result<User, ProfileLookupError>;

    /// Resolve every id in `ids` with one outcome per distinct id.
    ///
    /// The default runs [`ProfileLookup::lookup_user`] concurrently. Sources
    /// that can answer many ids from one fetch should override it.
    async fn lookup_users(&self, ids: &[UserId]) -> ProfileLookupResults {
        let lookups = ids
            .iter()
            .map(|&id| async move { (id, self.lookup_user(id).await) });
        join_all(lookups).await.into_iter().collect()
    }
}

/// Fixture lookup backed by a fixed directory of users.
#[derive(Debug, Clone, Default)]
pub struct FixtureProfileLookup {
    users: BTreeMap<UserId, User>,
}

impl FixtureProfileLookup {
    /// Build a lookup that knows exactly `users`.
    pub fn new(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users.into_iter().map(|user| (user.id(), user)).collect(),
        }
    }
}

#[async_trait]
impl ProfileLookup for FixtureProfileLookup {
    async fn lookup_user(&self, id: UserId) -> Result<User, ProfileLookupError> {
        self.users
            .get(&id)
            .cloned()
            .ok_or_else(|| ProfileLookupError::not_found(format!("user {id}")))
    }
}
