//! Match request model and its status machine.
//!
//! Status is monotone: a request starts `pending` and moves at most once, to
//! one of the three terminal statuses. Mentors drive `pending -> accepted` and
//! `pending -> rejected`; mentees drive `pending -> cancelled`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Role, UserId};

/// Validation errors raised while building match request values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchRequestValidationError {
    EmptyMessage,
    IllegalTransition {
        from: MatchRequestStatus,
        to: MatchRequestStatus,
    },
}

impl fmt::Display for MatchRequestValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "request message must not be empty"),
            Self::IllegalTransition { from, to } => {
                write!(f, "match request cannot move from {from} to {to}")
            }
        }
    }
}

impl std::error::Error for MatchRequestValidationError {}

/// Identifier assigned to a match request by the remote authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchRequestId(u64);

impl MatchRequestId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Access the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for MatchRequestId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for MatchRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a match request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchRequestStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl MatchRequestStatus {
    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether `self -> next` is one of the three legal edges.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(self, Self::Pending) && next.is_terminal()
    }

    /// Lower-case wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Upper-case badge label used by the request views.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for MatchRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three mutating actions a caller may take on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestAction {
    Accept,
    Reject,
    Cancel,
}

impl RequestAction {
    /// Role allowed to perform the action.
    #[must_use]
    pub const fn required_role(self) -> Role {
        match self {
            Self::Accept | Self::Reject => Role::Mentor,
            Self::Cancel => Role::Mentee,
        }
    }

    /// Status the remote authority is expected to confirm.
    #[must_use]
    pub const fn nominal_outcome(self) -> MatchRequestStatus {
        match self {
            Self::Accept => MatchRequestStatus::Accepted,
            Self::Reject => MatchRequestStatus::Rejected,
            Self::Cancel => MatchRequestStatus::Cancelled,
        }
    }

    /// Actions a given role may offer on a pending request.
    #[must_use]
    pub const fn available_to(role: Role) -> &'static [Self] {
        match role {
            Role::Mentor => &[Self::Accept, Self::Reject],
            Role::Mentee => &[Self::Cancel],
        }
    }

    /// Lower-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
        }
    }
}

impl fmt::Display for RequestAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Introductory message attached to a new request.
///
/// Stored trimmed; never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMessage(String);

impl RequestMessage {
    /// Trim and validate a message.
    pub fn new(message: impl AsRef<str>) -> Result<Self, MatchRequestValidationError> {
        let trimmed = message.as_ref().trim();
        if trimmed.is_empty() {
            return Err(MatchRequestValidationError::EmptyMessage);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for RequestMessage {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<RequestMessage> for String {
    fn from(value: RequestMessage) -> Self {
        value.0
    }
}

/// A proposed mentoring relationship from a mentee to a mentor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    id: MatchRequestId,
    mentor_id: UserId,
    mentee_id: UserId,
    // Outgoing listings omit the message.
    #[serde(default)]
    message: String,
    status: MatchRequestStatus,
}

impl MatchRequest {
    /// Build a request value as reported by the remote authority.
    #[must_use]
    pub fn new(
        id: MatchRequestId,
        mentor_id: UserId,
        mentee_id: UserId,
        message: impl Into<String>,
        status: MatchRequestStatus,
    ) -> Self {
        Self {
            id,
            mentor_id,
            mentee_id,
            message: message.into(),
            status,
        }
    }

    #[must_use]
    pub const fn id(&self) -> MatchRequestId {
        self.id
    }

    #[must_use]
    pub const fn mentor_id(&self) -> UserId {
        self.mentor_id
    }

    #[must_use]
    pub const fn mentee_id(&self) -> UserId {
        self.mentee_id
    }

    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    #[must_use]
    pub const fn status(&self) -> MatchRequestStatus {
        self.status
    }

    /// The participant holding `role` on this request.
    #[must_use]
    pub const fn participant(&self, role: Role) -> UserId {
        match role {
            Role::Mentor => self.mentor_id,
            Role::Mentee => self.mentee_id,
        }
    }

    /// Whether `user` participates in the request under `role`.
    #[must_use]
    pub fn is_owned_by(&self, user: UserId, role: Role) -> bool {
        self.participant(role) == user
    }

    /// Move the request along a legal edge of the status machine.
    pub fn transition(&mut self, next: MatchRequestStatus) -> Result<(), MatchRequestValidationError> {
        if !self.status.can_transition_to(next) {
            return Err(MatchRequestValidationError::IllegalTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}
