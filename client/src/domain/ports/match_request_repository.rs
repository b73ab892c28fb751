//! Driven port for the remote match request authority.
//!
//! The remote side owns request state. This port exposes the six calls the
//! lifecycle controller needs and nothing more; adapters must not cache.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{
    MatchRequest, MatchRequestId, MatchRequestStatus, RequestMessage, Role, UserId,
};

/// Payload for creating a new match request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatchRequest {
    /// Mentor the request is addressed to.
    pub mentor_id: UserId,
    /// Mentee sending the request; always the caller.
    pub mentee_id: UserId,
    /// Trimmed, non-empty introduction.
    pub message: RequestMessage,
}

define_port_error! {
    /// Errors surfaced by match request repository adapters.
    pub enum MatchRequestRepositoryError {
        /// Missing or expired credentials.
        Unauthorized { message: String } =>
            "match request authority rejected credentials: {message}",
        /// Caller is authenticated but not allowed to perform the call.
        Forbidden { message: String } =>
            "match request authority forbade the call: {message}",
        /// Target request does not exist remotely.
        NotFound { message: String } =>
            "match request not found: {message}",
        /// Remote authority refused the operation, e.g. a conflicting status.
        Rejected { message: String } =>
            "match request authority rejected the call: {message}",
        /// Call exceeded the configured timeout.
        Timeout { message: String } =>
            "match request call timed out: {message}",
        /// Network transport failed or the authority returned an unexpected status.
        Transport { message: String } =>
            "match request transport failed: {message}",
        /// Response body could not be decoded.
        Decode { message: String } =>
            "match request response decode failed: {message}",
        /// Authority answered but did not confirm a terminal status.
        Unconfirmed { message: String } =>
            "match request transition not confirmed: {message}",
    }
}

/// Port for reading and mutating match requests at the remote authority.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MatchRequestRepository: Send + Sync {
    /// Create a pending request from the caller to a mentor.
    async fn create_match_request(
        &self,
        request: &NewMatchRequest,
    ) -> Result<MatchRequest, MatchRequestRepositoryError>;

    /// Requests where the caller is the mentor.
    async fn list_incoming(&self) -> Result<Vec<MatchRequest>, MatchRequestRepositoryError>;

    /// Requests where the caller is the mentee.
    async fn list_outgoing(&self) -> Result<Vec<MatchRequest>, MatchRequestRepositoryError>;

    /// Accept a pending request; returns the confirmed request.
    async fn accept_request(
        &self,
        id: MatchRequestId,
    ) -> Result<MatchRequest, MatchRequestRepositoryError>;

    /// Reject a pending request; returns the confirmed request.
    async fn reject_request(
        &self,
        id: MatchRequestId,
    ) -> Result<MatchRequest, MatchRequestRepositoryError>;

    /// Cancel a pending request. The authority returns no body.
    async fn cancel_request(&self, id: MatchRequestId) -> Result<(), MatchRequestRepositoryError>;
}

/// In-memory repository standing in for the remote authority.
///
/// Lists are filtered by `viewer`, and transitions follow the same rules the
/// authority applies: only the owning participant may act, and only on
/// pending requests.
#[derive(Debug)]
pub struct FixtureMatchRequestRepository {
    viewer: UserId,
    store: Mutex<FixtureStore>,
}

#[derive(Debug, Default)]
struct FixtureStore {
    next_id: u64,
    requests: BTreeMap<MatchRequestId, MatchRequest>,
}

impl FixtureMatchRequestRepository {
    /// Seed the fixture with existing requests as seen by `viewer`.
    pub fn new(viewer: UserId, requests: impl IntoIterator<Item = MatchRequest>) -> Self {
        let requests: BTreeMap<_, _> = requests
            .into_iter()
            .map(|request| (request.id(), request))
            .collect();
        let next_id = requests.keys().map(|id| id.get()).max().unwrap_or(0) + 1;
        Self {
            viewer,
            store: Mutex::new(FixtureStore { next_id, requests }),
        }
    }

    /// Current status of a stored request.
    pub fn status_of(&self, id: MatchRequestId) -> Option<MatchRequestStatus> {
        self.lock()
            .requests
            .get(&id)
            .map(MatchRequest::status)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FixtureStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn list_for(&self, role: Role) -> Vec<MatchRequest> {
        self.lock()
            .requests
            .values()
            .filter(|request| request.is_owned_by(self.viewer, role))
            .cloned()
            .collect()
    }

    fn transition(
        &self,
        id: MatchRequestId,
        role: Role,
        next: MatchRequestStatus,
    ) -> Result<MatchRequest, MatchRequestRepositoryError> {
        let mut store = self.lock();
        let request = store
            .requests
            .get_mut(&id)
            .ok_or_else(|| MatchRequestRepositoryError::not_found(format!("request {id}")))?;
        if !request.is_owned_by(self.viewer, role) {
            return Err(MatchRequestRepositoryError::forbidden(format!(
                "user {} does not own request {id}",
                self.viewer
            )));
        }
        request
            .transition(next)
            .map_err(|err| MatchRequestRepositoryError::rejected(err.to_string()))?;
        Ok(request.clone())
    }
}

#[async_trait]
impl MatchRequestRepository for FixtureMatchRequestRepository {
    async fn create_match_request(
        &self,
        request: &NewMatchRequest,
    ) -> Result<MatchRequest, MatchRequestRepositoryError> {
        if request.mentee_id != self.viewer {
            return Err(MatchRequestRepositoryError::forbidden(
                "requests may only be sent on your own behalf",
            ));
        }
        let mut store = self.lock();
        let has_pending = store.requests.values().any(|existing| {
            existing.mentee_id() == request.mentee_id
                && existing.status() == MatchRequestStatus::Pending
        });
        if has_pending {
            return Err(MatchRequestRepositoryError::rejected(
                "You already have a pending request",
            ));
        }
        let id = MatchRequestId::new(store.next_id);
        store.next_id += 1;
        let created = MatchRequest::new(
            id,
            request.mentor_id,
            request.mentee_id,
            request.message.as_ref(),
            MatchRequestStatus::Pending,
        );
        store.requests.insert(id, created.clone());
        Ok(created)
    }

    async fn list_incoming(&self) -> Result<Vec<MatchRequest>, MatchRequestRepositoryError> {
        Ok(self.list_for(Role::Mentor))
    }

    async fn list_outgoing(&self) -> Result<Vec<MatchRequest>, MatchRequestRepositoryError> {
        Ok(self.list_for(Role::Mentee))
    }

    async fn accept_request(
        &self,
        id: MatchRequestId,
    ) -> Result<MatchRequest, MatchRequestRepositoryError> {
        self.transition(id, Role::Mentor, MatchRequestStatus::Accepted)
    }

    async fn reject_request(
        &self,
        id: MatchRequestId,
    ) -> Result<MatchRequest, MatchRequestRepositoryError> {
        self.transition(id, Role::Mentor, MatchRequestStatus::Rejected)
    }

    async fn cancel_request(&self, id: MatchRequestId) -> Result<(), MatchRequestRepositoryError> {
        self.transition(id, Role::Mentee, MatchRequestStatus::Cancelled)
            .map(|_| ())
    }
}
