//! Kion API client for the Kion Terraform provider
//!
//! - [`kion`] - Authenticated REST client, shared envelopes, labels, list reads
//! - [`filter`] - `filter` block matching for data sources
//! - [`associations`] - Owner id diffing for updates
//! - [`schema`] - Conversions between API models and schema values
//! - [`config`] - Provider configuration
//! - [`logging`] - Tracing subscriber setup

pub mod associations;
pub mod config;
pub mod filter;
pub mod kion;
pub mod logging;
pub mod schema;

pub use associations::{determine_associations, Associations};
pub use config::ProviderConfig;
pub use filter::{Filter, FilterError, FilterSpec, Filterable};
pub use kion::client::KionClient;
pub use kion::error::{ConfigError, RequestError};
pub use kion::models::Creation;
