//! Mentorship match request client.
//!
//! Coordinates the role-gated lifecycle of match requests between mentees and
//! mentors against a remote matching API. The crate follows a hexagonal
//! layout: [`domain`] holds the lifecycle rules and driven ports, [`outbound`]
//! implements those ports over HTTP, and [`config`] turns layered settings
//! into adapter configuration.

pub mod config;
pub mod domain;
pub mod outbound;

pub use config::{ClientSettings, ConfigError, SettingsOverrides};
