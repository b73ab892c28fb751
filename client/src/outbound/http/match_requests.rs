//! HTTP adapter for the match request repository port.

use async_trait::async_trait;

use super::client::{ApiClient, ApiError, ApiErrorKind};
use super::dto::CreateMatchRequestBody;
use crate::domain::ports::{MatchRequestRepository, MatchRequestRepositoryError, NewMatchRequest};
use crate::domain::{MatchRequest, MatchRequestId};

const MATCH_REQUESTS: &str = "match-requests";

/// Repository adapter backed by the `/match-requests` endpoints.
#[derive(Debug, Clone)]
pub struct HttpMatchRequestRepository {
    api: ApiClient,
}

impl HttpMatchRequestRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl From<ApiError> for MatchRequestRepositoryError {
    fn from(error: ApiError) -> Self {
        let ApiError { kind, message } = error;
        match kind {
            ApiErrorKind::Unauthorized => Self::unauthorized(message),
            ApiErrorKind::Forbidden => Self::forbidden(message),
            ApiErrorKind::NotFound => Self::not_found(message),
            ApiErrorKind::Rejected => Self::rejected(message),
            ApiErrorKind::Timeout => Self::timeout(message),
            ApiErrorKind::Transport => Self::transport(message),
            ApiErrorKind::Decode => Self::decode(message),
        }
    }
}

#[async_trait]
impl MatchRequestRepository for HttpMatchRequestRepository {
    async fn create_match_request(
        &self,
        request: &NewMatchRequest,
    ) -> Result<MatchRequest, MatchRequestRepositoryError> {
        let body = CreateMatchRequestBody::from(request);
        Ok(self.api.post_json(&[MATCH_REQUESTS], &body).await?)
    }

    async fn list_incoming(&self) -> Result<Vec<MatchRequest>, MatchRequestRepositoryError> {
        Ok(self.api.get_json(&[MATCH_REQUESTS, "incoming"]).await?)
    }

    async fn list_outgoing(&self) -> Result<Vec<MatchRequest>, MatchRequestRepositoryError> {
        Ok(self.api.get_json(&[MATCH_REQUESTS, "outgoing"]).await?)
    }

    async fn accept_request(
        &self,
        id: MatchRequestId,
    ) -> Result<MatchRequest, MatchRequestRepositoryError> {
        let id = id.to_string();
        Ok(self.api.put_json(&[MATCH_REQUESTS, id.as_str(), "accept"]).await?)
    }

    async fn reject_request(
        &self,
        id: MatchRequestId,
    ) -> Result<MatchRequest, MatchRequestRepositoryError> {
        let id = id.to_string();
        Ok(self.api.put_json(&[MATCH_REQUESTS, id.as_str(), "reject"]).await?)
    }

    async fn cancel_request(&self, id: MatchRequestId) -> Result<(), MatchRequestRepositoryError> {
        let id = id.to_string();
        Ok(self.api.delete(&[MATCH_REQUESTS, id.as_str()]).await?)
    }
}
