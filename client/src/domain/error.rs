//! Lifecycle error taxonomy.
//!
//! Validation, authorization, and transition failures are raised before any
//! remote call. Fetch and remote-action failures wrap the repository error
//! that settled the call, scoped to the whole list or to one request id.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ports::MatchRequestRepositoryError;
use super::{
    MatchRequestId, MatchRequestStatus, MatchRequestValidationError, RequestAction, Role, UserId,
};

/// Stable machine-readable code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed input such as an empty message.
    Validation,
    /// Wrong role, or the caller does not own the request.
    Authorization,
    /// The request is not pending or already has an action in flight.
    InvalidTransition,
    /// Loading the request list failed.
    Fetch,
    /// A mutating remote call failed.
    RemoteAction,
}

/// Operations subject to role gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Action(RequestAction),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("create"),
            Self::Action(action) => write!(f, "{action}"),
        }
    }
}

impl From<RequestAction> for Operation {
    fn from(value: RequestAction) -> Self {
        Self::Action(value)
    }
}

/// Why an operation was refused on authorization grounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationFailure {
    /// Caller holds the other role.
    WrongRole { required: Role, actual: Role },
    /// The request exists but names someone else in the caller's role.
    NotOwner { request_id: MatchRequestId },
    /// The request is not in the caller's current list.
    UnknownRequest { request_id: MatchRequestId },
}

impl fmt::Display for AuthorizationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongRole { required, actual } => {
                write!(f, "requires role {required}, caller is {actual}")
            }
            Self::NotOwner { request_id } => {
                write!(f, "caller does not own request {request_id}")
            }
            Self::UnknownRequest { request_id } => {
                write!(f, "request {request_id} is not in the caller's list")
            }
        }
    }
}

/// Why a transition was refused locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionBlock {
    /// Another action on the same id has not settled.
    Busy,
    /// The request already left `pending`.
    NotPending { status: MatchRequestStatus },
}

impl fmt::Display for TransitionBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => f.write_str("an action is already in flight"),
            Self::NotPending { status } => write!(f, "request is already {status}"),
        }
    }
}

/// Errors returned by the request lifecycle controller.
///
/// # Examples
/// ```
/// use mentorship_client::domain::{ErrorCode, LifecycleError, MatchRequestValidationError};
///
/// let err = LifecycleError::from(MatchRequestValidationError::EmptyMessage);
/// assert_eq!(err.code(), ErrorCode::Validation);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("invalid input: {0}")]
    Validation(#[from] MatchRequestValidationError),
    #[error("{operation} not permitted: {reason}")]
    Authorization {
        operation: Operation,
        reason: AuthorizationFailure,
    },
    #[error("cannot {action} request {request_id}: {reason}")]
    InvalidTransition {
        request_id: MatchRequestId,
        action: RequestAction,
        reason: TransitionBlock,
    },
    #[error("failed to load match requests: {source}")]
    Fetch {
        #[source]
        source: MatchRequestRepositoryError,
    },
    #[error("{action} on request {request_id} failed: {source}")]
    RemoteAction {
        request_id: MatchRequestId,
        action: RequestAction,
        #[source]
        source: MatchRequestRepositoryError,
    },
    #[error("request to mentor {mentor_id} failed: {source}")]
    RemoteCreate {
        mentor_id: UserId,
        #[source]
        source: MatchRequestRepositoryError,
    },
}

impl LifecycleError {
    /// Stable code for the failure category.
    ///
    /// A failed create is a remote action like any other mutation.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::Validation,
            Self::Authorization { .. } => ErrorCode::Authorization,
            Self::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            Self::Fetch { .. } => ErrorCode::Fetch,
            Self::RemoteAction { .. } | Self::RemoteCreate { .. } => ErrorCode::RemoteAction,
        }
    }

    /// Request id the failure is scoped to, if any.
    pub fn request_id(&self) -> Option<MatchRequestId> {
        match self {
            Self::InvalidTransition { request_id, .. } | Self::RemoteAction { request_id, .. } => {
                Some(*request_id)
            }
            Self::Authorization {
                reason:
                    AuthorizationFailure::NotOwner { request_id }
                    | AuthorizationFailure::UnknownRequest { request_id },
                ..
            } => Some(*request_id),
            _ => None,
        }
    }

    pub(crate) fn wrong_role(operation: impl Into<Operation>, required: Role, actual: Role) -> Self {
        Self::Authorization {
            operation: operation.into(),
            reason: AuthorizationFailure::WrongRole { required, actual },
        }
    }

    pub(crate) fn blocked(
        request_id: MatchRequestId,
        action: RequestAction,
        reason: TransitionBlock,
    ) -> Self {
        Self::InvalidTransition {
            request_id,
            action,
            reason,
        }
    }
}
