//! Driven ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod current_user_source;
mod match_request_repository;
mod profile_lookup;

#[cfg(test)]
pub use current_user_source::MockCurrentUserSource;
pub use current_user_source::{
    CurrentUserSource, CurrentUserSourceError, FixtureCurrentUserSource,
};
#[cfg(test)]
pub use match_request_repository::MockMatchRequestRepository;
pub use match_request_repository::{
    FixtureMatchRequestRepository, MatchRequestRepository, MatchRequestRepositoryError,
    NewMatchRequest,
};
#[cfg(test)]
pub use profile_lookup::MockProfileLookup;
pub use profile_lookup::{
    FixtureProfileLookup, ProfileLookup, ProfileLookupError, ProfileLookupResults,
};
