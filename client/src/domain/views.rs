//! Role-gated projections of controller state.
//!
//! Views never mutate state. They show only requests the caller owns, offer
//! actions only on pending requests, and mark actions disabled while the
//! request is busy. The controller re-checks all of this on every action.

use serde::Serialize;

use super::{
    ControllerSnapshot, DisplayIdentity, IdentityContext, MatchRequest, MatchRequestId,
    MatchRequestStatus, RequestAction, Role,
};

/// One action offered on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardAction {
    pub action: RequestAction,
    /// False while another action on the same request is in flight.
    pub enabled: bool,
}

/// A rendered request row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestCard {
    pub request_id: MatchRequestId,
    pub counterpart: DisplayIdentity,
    pub message: String,
    pub status: MatchRequestStatus,
    pub status_label: &'static str,
    pub busy: bool,
    pub actions: Vec<CardAction>,
    /// Latest remote failure for this request, for display.
    pub action_error: Option<String>,
}

/// Incoming requests for a mentor, with accept and reject on pending rows.
///
/// Returns an empty list for a mentee.
pub fn mentor_incoming_view(
    identity: &IdentityContext,
    snapshot: &ControllerSnapshot,
) -> Vec<RequestCard> {
    project(identity, snapshot, Role::Mentor)
}

/// Outgoing requests for a mentee, with cancel on pending rows.
///
/// Returns an empty list for a mentor.
pub fn mentee_outgoing_view(
    identity: &IdentityContext,
    snapshot: &ControllerSnapshot,
) -> Vec<RequestCard> {
    project(identity, snapshot, Role::Mentee)
}

fn project(identity: &IdentityContext, snapshot: &ControllerSnapshot, role: Role) -> Vec<RequestCard> {
    if identity.role() != role {
        return Vec::new();
    }
    snapshot
        .requests
        .iter()
        .filter(|request| request.is_owned_by(identity.user_id(), role))
        .map(|request| card(request, snapshot, role))
        .collect()
}

fn card(request: &MatchRequest, snapshot: &ControllerSnapshot, role: Role) -> RequestCard {
    let counterpart_role = role.counterpart();
    let counterpart_id = request.participant(counterpart_role);
    let counterpart = snapshot
        .enriched_identities
        .get(&counterpart_id)
        .cloned()
        .unwrap_or_else(|| DisplayIdentity::placeholder(counterpart_id, counterpart_role));
    let busy = snapshot.is_busy(request.id());
    let actions = if request.status() == MatchRequestStatus::Pending {
        RequestAction::available_to(role)
            .iter()
            .map(|action| CardAction {
                action: *action,
                enabled: !busy,
            })
            .collect()
    } else {
        Vec::new()
    };

    RequestCard {
        request_id: request.id(),
        counterpart,
        message: request.message().to_owned(),
        status: request.status(),
        status_label: request.status().label(),
        busy,
        actions,
        action_error: snapshot
            .action_errors
            .get(&request.id())
            .map(ToString::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{User, UserId};
    use rstest::{fixture, rstest};

    fn request(id: u64, mentor: u64, mentee: u64, status: MatchRequestStatus) -> MatchRequest {
        MatchRequest::new(
            MatchRequestId::new(id),
            UserId::new(mentor),
            UserId::new(mentee),
            format!("message {id}"),
            status,
        )
    }

    #[fixture]
    fn mentor() -> IdentityContext {
        IdentityContext::new(
            User::mentor(UserId::new(5), "m5@example.com", "Grace", Vec::new()).expect("mentor"),
        )
    }

    #[fixture]
    fn mentee() -> IdentityContext {
        IdentityContext::new(User::mentee(UserId::new(2), "e2@example.com", "Ada").expect("mentee"))
    }

    #[fixture]
    fn snapshot() -> ControllerSnapshot {
        let mut snapshot = ControllerSnapshot {
            requests: vec![
                request(1, 5, 2, MatchRequestStatus::Pending),
                request(2, 5, 8, MatchRequestStatus::Accepted),
                request(3, 6, 2, MatchRequestStatus::Pending),
            ],
            ..ControllerSnapshot::default()
        };
        let ada = User::mentee(UserId::new(2), "e2@example.com", "Ada").expect("mentee");
        snapshot
            .enriched_identities
            .insert(UserId::new(2), DisplayIdentity::from_user(&ada));
        snapshot
    }

    #[rstest]
    fn mentor_sees_only_owned_requests(mentor: IdentityContext, snapshot: ControllerSnapshot) {
        let cards = mentor_incoming_view(&mentor, &snapshot);
        let ids: Vec<u64> = cards.iter().map(|card| card.request_id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[rstest]
    fn pending_cards_offer_role_actions(mentor: IdentityContext, snapshot: ControllerSnapshot) {
        let cards = mentor_incoming_view(&mentor, &snapshot);
        let pending = cards.first().expect("pending card");
        let offered: Vec<_> = pending.actions.iter().map(|a| (a.action, a.enabled)).collect();
        assert_eq!(
            offered,
            vec![(RequestAction::Accept, true), (RequestAction::Reject, true)]
        );
        assert_eq!(pending.status_label, "PENDING");
        assert_eq!(pending.counterpart.name, "Ada");
    }

    #[rstest]
    fn terminal_cards_show_status_only(mentor: IdentityContext, snapshot: ControllerSnapshot) {
        let cards = mentor_incoming_view(&mentor, &snapshot);
        let accepted = cards.get(1).expect("accepted card");
        assert!(accepted.actions.is_empty());
        assert_eq!(accepted.status_label, "ACCEPTED");
        assert_eq!(accepted.counterpart.name, "Mentee 8");
        assert!(!accepted.counterpart.resolved);
    }

    #[rstest]
    fn busy_cards_keep_actions_disabled(mentor: IdentityContext, mut snapshot: ControllerSnapshot) {
        snapshot.busy_ids.insert(MatchRequestId::new(1));
        let cards = mentor_incoming_view(&mentor, &snapshot);
        let busy = cards.first().expect("busy card");
        assert!(busy.busy);
        assert_eq!(busy.actions.len(), 2);
        assert!(busy.actions.iter().all(|action| !action.enabled));
    }

    #[rstest]
    fn mentee_view_offers_cancel(mentee: IdentityContext, snapshot: ControllerSnapshot) {
        let cards = mentee_outgoing_view(&mentee, &snapshot);
        let ids: Vec<u64> = cards.iter().map(|card| card.request_id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(cards.iter().all(|card| {
            card.actions
                == vec![CardAction {
                    action: RequestAction::Cancel,
                    enabled: true,
                }]
        }));
        assert_eq!(cards.first().map(|card| card.counterpart.name.as_str()), Some("Mentor 5"));
    }

    #[rstest]
    fn wrong_role_projection_is_empty(
        mentor: IdentityContext,
        mentee: IdentityContext,
        snapshot: ControllerSnapshot,
    ) {
        assert!(mentee_outgoing_view(&mentor, &snapshot).is_empty());
        assert!(mentor_incoming_view(&mentee, &snapshot).is_empty());
    }
}
