//! Reqwest-backed adapters for the matching API.

mod client;
mod dto;
mod match_requests;
mod profiles;
mod session;

pub use client::{ApiClient, ApiToken, HttpClientConfig};
pub use match_requests::HttpMatchRequestRepository;
pub use profiles::HttpMentorDirectory;
pub use session::HttpCurrentUserSource;
