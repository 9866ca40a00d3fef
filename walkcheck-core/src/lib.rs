//! Core library for the `walkcheck` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Weather providers that normalize their payloads into one `Observation`
//! - Unit conversions and display formatting
//! - The walking advisory and packing checklist derived from an observation
//! - Query handling with input validation and stale-response discarding
//!
//! It is used by `walkcheck-cli`, but can also be reused by other frontends.

pub mod advisory;
pub mod checklist;
pub mod config;
pub mod display;
pub mod error;
pub mod model;
pub mod provider;
pub mod query;
pub mod report;
pub mod sink;
pub mod units;

pub use advisory::{Advisory, AdvisoryCategory};
pub use checklist::{Checklist, ChecklistEntry};
pub use config::{Config, ProviderConfig};
pub use display::DisplayFields;
pub use error::{FetchError, QueryError};
pub use model::Observation;
pub use provider::{ProviderId, WeatherProvider};
pub use query::{QueryContext, QueryOutcome};
pub use report::WeatherReport;
pub use sink::{ErrorNotice, PresentationSink};
