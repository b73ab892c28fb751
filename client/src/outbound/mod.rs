//! Outbound adapters implementing domain ports.
//!
//! Adapters are thin translators between domain types and the matching API's
//! wire format. They contain no lifecycle rules.

pub mod http;
