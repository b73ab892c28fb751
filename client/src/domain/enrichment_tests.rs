//! Tests for counterpart profile enrichment.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rstest::{fixture, rstest};
use tokio::sync::Barrier;

use super::*;
use crate::domain::ports::{
    FixtureProfileLookup, MockProfileLookup, ProfileLookup, ProfileLookupError,
    ProfileLookupResults,
};
use crate::domain::{MatchRequestId, MatchRequestStatus, User};

fn mentee(id: u64) -> User {
    User::mentee(UserId::new(id), format!("mentee{id}@example.com"), format!("Mentee Real {id}"))
        .expect("valid mentee")
}

fn incoming(id: u64, mentee_id: u64) -> MatchRequest {
    MatchRequest::new(
        MatchRequestId::new(id),
        UserId::new(5),
        UserId::new(mentee_id),
        "hello",
        MatchRequestStatus::Pending,
    )
}

#[fixture]
fn directory_without_seven() -> ProfileEnrichmentResolver {
    ProfileEnrichmentResolver::new(Arc::new(FixtureProfileLookup::new([mentee(3), mentee(9)])))
}

#[rstest]
#[tokio::test]
async fn failed_lookup_degrades_to_placeholder(directory_without_seven: ProfileEnrichmentResolver) {
    let ids = [3, 7, 3, 9].map(UserId::new);

    let identities = directory_without_seven.resolve(&ids, Role::Mentee).await;

    let keys: Vec<u64> = identities.keys().map(|id| id.get()).collect();
    assert_eq!(keys, vec![3, 7, 9]);
    assert_eq!(
        identities[&UserId::new(7)],
        DisplayIdentity::placeholder(UserId::new(7), Role::Mentee)
    );
    assert!(identities[&UserId::new(3)].resolved);
    assert_eq!(identities[&UserId::new(3)].name, "Mentee Real 3");
    assert!(identities[&UserId::new(9)].resolved);
}

#[rstest]
#[tokio::test]
async fn distinct_ids_are_looked_up_as_one_batch() {
    let mut lookup = MockProfileLookup::new();
    lookup.expect_lookup_user().times(0);
    lookup
        .expect_lookup_users()
        .withf(|ids| ids.to_vec() == vec![UserId::new(3), UserId::new(9)])
        .times(1)
        .returning(|ids| {
            ids.iter()
                .map(|&id| (id, Ok(mentee(id.get()))))
                .collect::<ProfileLookupResults>()
        });
    let resolver = ProfileEnrichmentResolver::new(Arc::new(lookup));

    let identities = resolver.resolve(&[3, 9, 3, 3].map(UserId::new), Role::Mentee).await;
    assert_eq!(identities.len(), 2);
    assert!(identities.values().all(|identity| identity.resolved));
}

#[rstest]
#[tokio::test]
async fn ids_missing_from_the_batch_get_placeholders() {
    let mut lookup = MockProfileLookup::new();
    lookup
        .expect_lookup_users()
        .times(1)
        .returning(|_| ProfileLookupResults::from([(UserId::new(3), Ok(mentee(3)))]));
    let resolver = ProfileEnrichmentResolver::new(Arc::new(lookup));

    let identities = resolver.resolve(&[3, 9].map(UserId::new), Role::Mentee).await;
    assert!(identities[&UserId::new(3)].resolved);
    assert_eq!(
        identities[&UserId::new(9)],
        DisplayIdentity::placeholder(UserId::new(9), Role::Mentee)
    );
}

#[rstest]
#[tokio::test]
async fn empty_input_skips_the_lookup() {
    let mut lookup = MockProfileLookup::new();
    lookup.expect_lookup_users().times(0);
    let resolver = ProfileEnrichmentResolver::new(Arc::new(lookup));

    assert!(resolver.resolve(&[], Role::Mentor).await.is_empty());
}

#[rstest]
#[tokio::test]
async fn wrong_role_is_treated_as_unresolved() {
    let mentor = User::mentor(UserId::new(4), "m4@example.com", "Grace", Vec::new()).expect("mentor");
    let resolver = ProfileEnrichmentResolver::new(Arc::new(FixtureProfileLookup::new([mentor])));

    let identities = resolver.resolve(&[UserId::new(4)], Role::Mentee).await;
    assert!(!identities[&UserId::new(4)].resolved);
    assert_eq!(identities[&UserId::new(4)].name, "Mentee 4");
}

#[rstest]
fn counterpart_ids_follow_caller_role() {
    let requests = [incoming(1, 2), incoming(2, 8), incoming(3, 2)];

    let mentee_ids = ProfileEnrichmentResolver::counterpart_ids(&requests, Role::Mentor);
    assert_eq!(mentee_ids, vec![UserId::new(2), UserId::new(8)]);

    let mentor_ids = ProfileEnrichmentResolver::counterpart_ids(&requests, Role::Mentee);
    assert_eq!(mentor_ids, vec![UserId::new(5)]);
}

#[rstest]
#[tokio::test]
async fn empty_list_resolves_to_empty_mapping(directory_without_seven: ProfileEnrichmentResolver) {
    let identities = directory_without_seven.enrich(&[], Role::Mentor).await;
    assert!(identities.is_empty());
}

struct RendezvousLookup {
    barrier: Barrier,
}

#[async_trait]
impl ProfileLookup for RendezvousLookup {
    async fn lookup_user(&self, id: UserId) -> Result<User, ProfileLookupError> {
        // Completes only once every lookup is in flight at the same time.
        self.barrier.wait().await;
        Ok(mentee(id.get()))
    }
}

#[rstest]
#[tokio::test]
async fn lookups_run_concurrently() {
    let resolver = ProfileEnrichmentResolver::new(Arc::new(RendezvousLookup {
        barrier: Barrier::new(3),
    }));

    let identities = tokio::time::timeout(
        Duration::from_secs(5),
        resolver.resolve(&[2, 8, 11].map(UserId::new), Role::Mentee),
    )
    .await
    .expect("lookups must not run one at a time");

    assert!(identities.values().all(|identity| identity.resolved));
}
