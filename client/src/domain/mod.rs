//! Domain types and services for match request coordination.
//!
//! Purpose: model users and match requests, enforce the role-gated request
//! lifecycle, and derive role-specific views. Nothing here knows about HTTP,
//! configuration, or the command line; those live behind [`ports`].
//!
//! Public surface:
//! - [`RequestLifecycleController`]: refresh, create, accept, reject, cancel.
//! - [`ProfileEnrichmentResolver`]: counterpart ids to display identities.
//! - [`views`]: mentor-incoming and mentee-outgoing projections.
//! - [`LifecycleError`] / [`ErrorCode`]: the error taxonomy.

pub mod display_identity;
pub mod enrichment;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod match_request;
pub mod ports;
pub mod user;
pub mod views;

pub use self::display_identity::DisplayIdentity;
pub use self::enrichment::{EnrichedIdentities, ProfileEnrichmentResolver};
pub use self::error::{AuthorizationFailure, ErrorCode, LifecycleError, Operation, TransitionBlock};
pub use self::identity::IdentityContext;
pub use self::lifecycle::{ControllerSnapshot, LifecyclePorts, RequestLifecycleController};
pub use self::match_request::{
    MatchRequest, MatchRequestId, MatchRequestStatus, MatchRequestValidationError, RequestAction,
    RequestMessage,
};
pub use self::user::{
    Email, MenteeProfile, MentorProfile, Profile, Role, User, UserId, UserValidationError,
};
pub use self::views::{CardAction, RequestCard, mentee_outgoing_view, mentor_incoming_view};
