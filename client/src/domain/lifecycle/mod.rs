//! Request lifecycle controller.
//!
//! The controller owns the caller's request list and mediates every
//! transition. Authorization and transition checks run before any remote
//! call, and a per-id busy flag keeps at most one mutating call in flight for
//! each request. The remote authority stays the source of truth: local status
//! only changes to what a remote response confirms.
//!
//! State sits behind one mutex that is never held across an `.await`, so
//! every completion is applied atomically with respect to the others.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::domain::enrichment::ProfileEnrichmentResolver;
use crate::domain::ports::{
    MatchRequestRepository, MatchRequestRepositoryError, NewMatchRequest, ProfileLookup,
};
use crate::domain::{
    AuthorizationFailure, IdentityContext, LifecycleError, MatchRequest, MatchRequestId,
    MatchRequestStatus, Operation, RequestAction, RequestMessage, Role, TransitionBlock, UserId,
};

mod in_flight;
mod state;

use in_flight::InFlightGuard;
use state::{ControllerState, lock_state};
pub use state::ControllerSnapshot;

/// Port bundle required by the lifecycle controller.
pub struct LifecyclePorts {
    /// Remote authority for match requests.
    pub repository: Arc<dyn MatchRequestRepository>,
    /// Counterpart profile source used for enrichment.
    pub profiles: Arc<dyn ProfileLookup>,
}

impl LifecyclePorts {
    pub fn new(
        repository: Arc<dyn MatchRequestRepository>,
        profiles: Arc<dyn ProfileLookup>,
    ) -> Self {
        Self {
            repository,
            profiles,
        }
    }
}

/// Coordinates refreshes and role-gated transitions for one session.
pub struct RequestLifecycleController {
    identity: IdentityContext,
    repository: Arc<dyn MatchRequestRepository>,
    resolver: ProfileEnrichmentResolver,
    state: Mutex<ControllerState>,
}

impl RequestLifecycleController {
    /// Build a controller for the caller described by `identity`.
    ///
    /// The list starts empty; call [`Self::refresh`] to load it.
    pub fn new(identity: IdentityContext, ports: LifecyclePorts) -> Self {
        Self {
            identity,
            repository: ports.repository,
            resolver: ProfileEnrichmentResolver::new(ports.profiles),
            state: Mutex::new(ControllerState::default()),
        }
    }

    /// Identity the controller acts for.
    pub fn identity(&self) -> &IdentityContext {
        &self.identity
    }

    /// Owned snapshot of the current state.
    pub fn state(&self) -> ControllerSnapshot {
        lock_state(&self.state).snapshot()
    }

    /// Reload the role-appropriate list and its counterpart identities.
    ///
    /// On failure the previous list is kept and `last_error` is set. A
    /// refresh that settles after a newer one has landed is discarded.
    pub async fn refresh(&self) -> Result<(), LifecycleError> {
        let ticket = lock_state(&self.state).issue_ticket();
        let role = self.identity.role();
        debug!(ticket, role = %role, "refreshing match requests");

        let fetched = match role {
            Role::Mentor => self.repository.list_incoming().await,
            Role::Mentee => self.repository.list_outgoing().await,
        };
        let requests = match fetched {
            Ok(requests) => requests,
            Err(source) => {
                let error = LifecycleError::Fetch { source };
                warn!(ticket, error = %error, "refresh failed, keeping previous list");
                let mut state = lock_state(&self.state);
                if !state.is_stale(ticket) {
                    state.last_error = Some(error.clone());
                }
                return Err(error);
            }
        };

        let identities = self.resolver.enrich(&requests, role).await;

        let mut state = lock_state(&self.state);
        if state.is_stale(ticket) {
            debug!(ticket, applied = state.applied_ticket, "discarding stale refresh");
            return Ok(());
        }
        let count = requests.len();
        state.apply_list(ticket, requests, identities);
        info!(ticket, count, "match requests refreshed");
        Ok(())
    }

    /// Send a new request from the calling mentee to `mentor_id`.
    ///
    /// The created request is returned but not inserted locally; it appears
    /// after the next [`Self::refresh`].
    pub async fn create_request(
        &self,
        mentor_id: UserId,
        message: &str,
    ) -> Result<MatchRequest, LifecycleError> {
        let role = self.identity.role();
        if role != Role::Mentee {
            return Err(LifecycleError::wrong_role(Operation::Create, Role::Mentee, role));
        }
        let message = RequestMessage::new(message)?;
        let draft = NewMatchRequest {
            mentor_id,
            mentee_id: self.identity.user_id(),
            message,
        };
        debug!(mentor_id = %mentor_id, "creating match request");

        match self.repository.create_match_request(&draft).await {
            Ok(created) => {
                info!(request_id = %created.id(), mentor_id = %mentor_id, "match request created");
                Ok(created)
            }
            Err(source) => {
                let error = LifecycleError::RemoteCreate { mentor_id, source };
                warn!(error = %error, "match request creation failed");
                Err(error)
            }
        }
    }

    /// Accept a pending incoming request.
    pub async fn accept(&self, id: MatchRequestId) -> Result<MatchRequestStatus, LifecycleError> {
        self.perform(RequestAction::Accept, id).await
    }

    /// Reject a pending incoming request.
    pub async fn reject(&self, id: MatchRequestId) -> Result<MatchRequestStatus, LifecycleError> {
        self.perform(RequestAction::Reject, id).await
    }

    /// Cancel a pending outgoing request.
    pub async fn cancel(&self, id: MatchRequestId) -> Result<MatchRequestStatus, LifecycleError> {
        self.perform(RequestAction::Cancel, id).await
    }

    async fn perform(
        &self,
        action: RequestAction,
        id: MatchRequestId,
    ) -> Result<MatchRequestStatus, LifecycleError> {
        let guard = self.admit(action, id)?;
        debug!(request_id = %id, action = %action, "action admitted");

        let outcome = match action {
            RequestAction::Accept => self.repository.accept_request(id).await.map(|r| r.status()),
            RequestAction::Reject => self.repository.reject_request(id).await.map(|r| r.status()),
            RequestAction::Cancel => self
                .repository
                .cancel_request(id)
                .await
                .map(|()| MatchRequestStatus::Cancelled),
        };

        match outcome.and_then(|status| require_terminal(id, status)) {
            Ok(status) => {
                guard.confirm(status);
                info!(request_id = %id, action = %action, status = %status, "transition confirmed");
                Ok(status)
            }
            Err(source) => {
                let error = LifecycleError::RemoteAction {
                    request_id: id,
                    action,
                    source,
                };
                warn!(request_id = %id, action = %action, error = %error, "remote action failed");
                guard.fail(error.clone());
                Err(error)
            }
        }
    }

    /// Check role, ownership, busy flag, and status, then mark `id` busy.
    ///
    /// Runs in one critical section so two callers cannot both pass.
    fn admit(
        &self,
        action: RequestAction,
        id: MatchRequestId,
    ) -> Result<InFlightGuard<'_>, LifecycleError> {
        let required = action.required_role();
        let role = self.identity.role();
        if role != required {
            return Err(LifecycleError::wrong_role(action, required, role));
        }

        let mut state = lock_state(&self.state);
        let Some(request) = state.requests.iter().find(|request| request.id() == id) else {
            return Err(LifecycleError::Authorization {
                operation: action.into(),
                reason: AuthorizationFailure::UnknownRequest { request_id: id },
            });
        };
        if !request.is_owned_by(self.identity.user_id(), role) {
            return Err(LifecycleError::Authorization {
                operation: action.into(),
                reason: AuthorizationFailure::NotOwner { request_id: id },
            });
        }
        let status = request.status();
        if state.busy.contains(&id) {
            return Err(LifecycleError::blocked(id, action, TransitionBlock::Busy));
        }
        if status.is_terminal() {
            return Err(LifecycleError::blocked(
                id,
                action,
                TransitionBlock::NotPending { status },
            ));
        }

        state.busy.insert(id);
        state.action_errors.remove(&id);
        Ok(InFlightGuard::new(&self.state, id))
    }
}

fn require_terminal(
    id: MatchRequestId,
    status: MatchRequestStatus,
) -> Result<MatchRequestStatus, MatchRequestRepositoryError> {
    if status.is_terminal() {
        Ok(status)
    } else {
        Err(MatchRequestRepositoryError::unconfirmed(format!(
            "request {id} is still {status}"
        )))
    }
}
