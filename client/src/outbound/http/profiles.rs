//! HTTP adapter for the profile lookup port.
//!
//! The API has no per-id user endpoint. Lookups read the mentor directory and
//! pick the matching entry, so only mentors can be resolved, and only by
//! callers allowed to read the directory (mentees).
//!
//! Entries are decoded one at a time. A malformed sibling fails only its own
//! id, and a batch lookup costs a single directory fetch.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::client::{ApiClient, ApiError, ApiErrorKind};
use crate::domain::ports::{ProfileLookup, ProfileLookupError, ProfileLookupResults};
use crate::domain::{User, UserId};

/// Profile lookup backed by `GET /mentors`.
#[derive(Debug, Clone)]
pub struct HttpMentorDirectory {
    api: ApiClient,
}

impl HttpMentorDirectory {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    async fn fetch_directory(&self) -> Result<Vec<Value>, ProfileLookupError> {
        Ok(self.api.get_json(&["mentors"]).await?)
    }
}

fn select_mentor(entries: &[Value], id: UserId) -> Result<User, ProfileLookupError> {
    let entry = entries
        .iter()
        .find(|entry| entry.get("id").and_then(Value::as_u64) == Some(id.get()))
        .ok_or_else(|| {
            ProfileLookupError::not_found(format!("user {id} is not in the mentor directory"))
        })?;
    User::deserialize(entry)
        .map_err(|error| ProfileLookupError::decode(format!("directory entry {id}: {error}")))
}

impl From<ApiError> for ProfileLookupError {
    fn from(error: ApiError) -> Self {
        let ApiError { kind, message } = error;
        match kind {
            ApiErrorKind::NotFound => Self::not_found(message),
            ApiErrorKind::Unauthorized | ApiErrorKind::Forbidden => Self::forbidden(message),
            ApiErrorKind::Timeout => Self::timeout(message),
            ApiErrorKind::Decode => Self::decode(message),
            ApiErrorKind::Rejected | ApiErrorKind::Transport => Self::transport(message),
        }
    }
}

#[async_trait]
impl ProfileLookup for HttpMentorDirectory {
    async fn lookup_user(&self, id: UserId) -> Result<User, ProfileLookupError> {
        let entries = self.fetch_directory().await?;
        select_mentor(&entries, id)
    }

    async fn lookup_users(&self, ids: &[UserId]) -> ProfileLookupResults {
        match self.fetch_directory().await {
            Ok(entries) => ids
                .iter()
                .map(|&id| (id, select_mentor(&entries, id)))
                .collect(),
            Err(error) => ids.iter().map(|&id| (id, Err(error.clone()))).collect(),
        }
    }
}
