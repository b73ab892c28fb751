//! Scoped per-request busy marker.

use std::sync::Mutex;

use super::state::{ControllerState, lock_state};
use crate::domain::{LifecycleError, MatchRequestId, MatchRequestStatus};

/// Holds the busy flag for one request id until dropped.
///
/// Release happens in `Drop`, so the flag is cleared on success, on failure,
/// and when the owning future is dropped mid-call.
pub(super) struct InFlightGuard<'a> {
    state: &'a Mutex<ControllerState>,
    id: MatchRequestId,
}

impl<'a> InFlightGuard<'a> {
    /// Wrap an id the caller has already inserted into the busy set.
    pub(super) fn new(state: &'a Mutex<ControllerState>, id: MatchRequestId) -> Self {
        Self { state, id }
    }

    /// Apply the status the remote authority confirmed, then release.
    pub(super) fn confirm(self, status: MatchRequestStatus) {
        let mut state = lock_state(self.state);
        state.confirm(self.id, status);
        state.busy.remove(&self.id);
    }

    /// Record a remote failure for this id, then release.
    pub(super) fn fail(self, error: LifecycleError) {
        let mut state = lock_state(self.state);
        state.action_errors.insert(self.id, error);
        state.busy.remove(&self.id);
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        lock_state(self.state).busy.remove(&self.id);
    }
}
