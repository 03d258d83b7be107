//! Kion API interaction module
//!
//! This module provides the core functionality for talking to a Kion
//! installation: the authenticated HTTP client, shared response envelopes,
//! label associations and filtered list reads.
//!
//! # Module Structure
//!
//! - [`client`] - Main Kion client with the verb operations
//! - [`http`] - Transport, bearer auth and status classification
//! - [`error`] - Request and configuration errors
//! - [`models`] - Envelopes shared across endpoints
//! - [`labels`] - Label reads and writes for label-capable resources
//! - [`fetcher`] - List reads with post-filtering
//!
//! # Example
//!
//! ```ignore
//! use kion_client::kion::client::KionClient;
//! use kion_client::kion::models::ListResponse;
//!
//! async fn example() -> Result<(), kion_client::RequestError> {
//!     let client = KionClient::new("https://kion.example.com", "app_1_XXXX", "/api", false);
//!     let webhooks: ListResponse<serde_json::Value> = client.get("/v3/webhook").await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod labels;
pub mod models;
