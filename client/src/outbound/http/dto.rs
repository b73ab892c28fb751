//! Request bodies sent to the matching API.
//!
//! Responses decode straight into domain types, which carry their own serde
//! contracts; only outbound payloads need a transport shape.

use serde::Serialize;

use crate::domain::ports::NewMatchRequest;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateMatchRequestBody<'a> {
    pub(super) mentor_id: u64,
    pub(super) mentee_id: u64,
    pub(super) message: &'a str,
}

impl<'a> From<&'a NewMatchRequest> for CreateMatchRequestBody<'a> {
    fn from(value: &'a NewMatchRequest) -> Self {
        Self {
            mentor_id: value.mentor_id.get(),
            mentee_id: value.mentee_id.get(),
            message: value.message.as_ref(),
        }
    }
}
