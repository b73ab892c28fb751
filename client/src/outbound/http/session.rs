//! HTTP adapter for the current user port.

use async_trait::async_trait;

use super::client::{ApiClient, ApiError, ApiErrorKind};
use crate::domain::User;
use crate::domain::ports::{CurrentUserSource, CurrentUserSourceError};

/// Current user source backed by `GET /me`.
#[derive(Debug, Clone)]
pub struct HttpCurrentUserSource {
    api: ApiClient,
}

impl HttpCurrentUserSource {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl From<ApiError> for CurrentUserSourceError {
    fn from(error: ApiError) -> Self {
        let ApiError { kind, message } = error;
        match kind {
            ApiErrorKind::Unauthorized | ApiErrorKind::Forbidden => Self::unauthorized(message),
            ApiErrorKind::Timeout => Self::timeout(message),
            ApiErrorKind::Decode => Self::decode(message),
            ApiErrorKind::NotFound | ApiErrorKind::Rejected | ApiErrorKind::Transport => {
                Self::transport(message)
            }
        }
    }
}

#[async_trait]
impl CurrentUserSource for HttpCurrentUserSource {
    async fn current_user(&self) -> Result<User, CurrentUserSourceError> {
        Ok(self.api.get_json(&["me"]).await?)
    }
}
