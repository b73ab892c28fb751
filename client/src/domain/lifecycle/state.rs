//! Controller-owned state and the snapshot handed to views.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::domain::enrichment::EnrichedIdentities;
use crate::domain::{LifecycleError, MatchRequest, MatchRequestId, MatchRequestStatus};

/// Owned copy of controller state at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerSnapshot {
    /// Current list, incoming for mentors and outgoing for mentees.
    pub requests: Vec<MatchRequest>,
    /// Counterpart identities for the current list generation.
    pub enriched_identities: EnrichedIdentities,
    /// Requests with a mutating call in flight.
    pub busy_ids: BTreeSet<MatchRequestId>,
    /// Set when the latest refresh failed; the list above is then stale.
    pub last_error: Option<LifecycleError>,
    /// Latest remote failure per request id.
    pub action_errors: BTreeMap<MatchRequestId, LifecycleError>,
    /// Refresh ticket of the list above; zero until the first refresh lands.
    pub generation: u64,
}

impl ControllerSnapshot {
    pub fn request(&self, id: MatchRequestId) -> Option<&MatchRequest> {
        self.requests.iter().find(|request| request.id() == id)
    }

    pub fn is_busy(&self, id: MatchRequestId) -> bool {
        self.busy_ids.contains(&id)
    }
}

#[derive(Debug, Default)]
pub(super) struct ControllerState {
    pub(super) requests: Vec<MatchRequest>,
    pub(super) identities: EnrichedIdentities,
    pub(super) busy: BTreeSet<MatchRequestId>,
    pub(super) last_error: Option<LifecycleError>,
    pub(super) action_errors: BTreeMap<MatchRequestId, LifecycleError>,
    pub(super) issued_tickets: u64,
    pub(super) applied_ticket: u64,
    pub(super) confirmed: BTreeMap<MatchRequestId, MatchRequestStatus>,
}

impl ControllerState {
    pub(super) fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            requests: self.requests.clone(),
            enriched_identities: self.identities.clone(),
            busy_ids: self.busy.clone(),
            last_error: self.last_error.clone(),
            action_errors: self.action_errors.clone(),
            generation: self.applied_ticket,
        }
    }

    pub(super) fn issue_ticket(&mut self) -> u64 {
        self.issued_tickets += 1;
        self.issued_tickets
    }

    pub(super) fn is_stale(&self, ticket: u64) -> bool {
        ticket < self.applied_ticket
    }

    /// Replace the list wholesale, keeping confirmed terminal statuses.
    pub(super) fn apply_list(
        &mut self,
        ticket: u64,
        mut requests: Vec<MatchRequest>,
        identities: EnrichedIdentities,
    ) {
        for request in &mut requests {
            let Some(confirmed) = self.confirmed.get(&request.id()).copied() else {
                continue;
            };
            if request.status() != MatchRequestStatus::Pending {
                continue;
            }
            debug!(
                request_id = %request.id(),
                status = %confirmed,
                "keeping confirmed status over stale pending"
            );
            if let Err(error) = request.transition(confirmed) {
                warn!(request_id = %request.id(), error = %error, "confirmed status rejected");
            }
        }
        self.action_errors
            .retain(|id, _| requests.iter().any(|request| request.id() == *id));
        self.requests = requests;
        self.identities = identities;
        self.applied_ticket = ticket;
        self.last_error = None;
    }

    /// Record a status confirmed by the remote authority.
    pub(super) fn confirm(&mut self, id: MatchRequestId, status: MatchRequestStatus) {
        self.confirmed.insert(id, status);
        self.action_errors.remove(&id);
        let Some(request) = self.requests.iter_mut().find(|request| request.id() == id) else {
            return;
        };
        if request.status() == status {
            return;
        }
        if let Err(error) = request.transition(status) {
            warn!(
                request_id = %id,
                error = %error,
                "confirmed status conflicts with listed status"
            );
        }
    }
}

/// Lock controller state, recovering from poisoning.
///
/// Every mutation is a single critical section, so a panicking holder cannot
/// leave the state half-written.
pub(super) fn lock_state(state: &Mutex<ControllerState>) -> MutexGuard<'_, ControllerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
