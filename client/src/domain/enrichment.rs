//! Profile enrichment for request counterparts.
//!
//! Distinct counterpart ids are looked up as one batch. A failed lookup never
//! fails the batch: the id gets a placeholder, so the returned mapping is
//! total over its input.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::warn;

use super::ports::ProfileLookup;
use super::{DisplayIdentity, MatchRequest, Role, UserId};

/// Identities keyed by counterpart id for one list generation.
pub type EnrichedIdentities = BTreeMap<UserId, DisplayIdentity>;

/// Resolves counterpart ids to display identities.
#[derive(Clone)]
pub struct ProfileEnrichmentResolver {
    lookup: Arc<dyn ProfileLookup>,
}

impl ProfileEnrichmentResolver {
    pub fn new(lookup: Arc<dyn ProfileLookup>) -> Self {
        Self { lookup }
    }

    /// Distinct ids of the users on the other side of `requests`.
    pub fn counterpart_ids(requests: &[MatchRequest], caller_role: Role) -> Vec<UserId> {
        let counterpart = caller_role.counterpart();
        let mut seen = BTreeSet::new();
        requests
            .iter()
            .map(|request| request.participant(counterpart))
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Resolve every id in `ids`, all of which hold `role`.
    ///
    /// Distinct ids go to the lookup port as one batch.
    pub async fn resolve(&self, ids: &[UserId], role: Role) -> EnrichedIdentities {
        let distinct: Vec<UserId> = ids
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if distinct.is_empty() {
            return EnrichedIdentities::new();
        }
        let mut outcomes = self.lookup.lookup_users(&distinct).await;
        distinct
            .into_iter()
            .map(|id| {
                let identity = match outcomes.remove(&id) {
                    Some(Ok(user)) if user.role() == role => DisplayIdentity::from_user(&user),
                    Some(Ok(user)) => {
                        warn!(
                            user_id = %id,
                            expected = %role,
                            actual = %user.role(),
                            "counterpart role mismatch, using placeholder"
                        );
                        DisplayIdentity::placeholder(id, role)
                    }
                    Some(Err(error)) => {
                        warn!(
                            user_id = %id,
                            error = %error,
                            "profile lookup failed, using placeholder"
                        );
                        DisplayIdentity::placeholder(id, role)
                    }
                    None => {
                        warn!(user_id = %id, "profile lookup skipped id, using placeholder");
                        DisplayIdentity::placeholder(id, role)
                    }
                };
                (id, identity)
            })
            .collect()
    }

    /// Resolve the counterparts of `requests` as seen by a caller in `caller_role`.
    pub async fn enrich(&self, requests: &[MatchRequest], caller_role: Role) -> EnrichedIdentities {
        let ids = Self::counterpart_ids(requests, caller_role);
        self.resolve(&ids, caller_role.counterpart()).await
    }
}

#[cfg(test)]
#[path = "enrichment_tests.rs"]
mod tests;
