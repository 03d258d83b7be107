//! Error types for Kion API calls
//!
//! Every failure carries the HTTP status code it was observed with. Requests
//! that never reached the server (connection, TLS, timeout) and requests that
//! failed before any I/O report status `0`.

use thiserror::Error;

/// Errors returned by [`KionClient`](super::client::KionClient) operations.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request never completed a round trip.
    #[error("{method} {url} failed: {source}")]
    Transport {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("url: {url}, method: {method}, status: {status}, body: {body}")]
    Http {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    /// The response arrived but its body could not be read.
    #[error("failed to read response body (status {status}): {source}")]
    Body {
        status: u16,
        #[source]
        source: reqwest::Error,
    },

    /// The response body is not valid JSON for the expected shape.
    #[error("could not unmarshal response body: {body}")]
    Decode {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The request URL could not be assembled.
    #[error("invalid request url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The request value could not be encoded as JSON.
    #[error("could not encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

impl RequestError {
    /// Status code associated with the failure, `0` if the server was never reached.
    pub fn status_code(&self) -> u16 {
        match self {
            RequestError::Transport { .. }
            | RequestError::InvalidUrl { .. }
            | RequestError::Encode(_) => 0,
            RequestError::Http { status, .. }
            | RequestError::Body { status, .. }
            | RequestError::Decode { status, .. } => *status,
        }
    }

    /// True when the server reported the object as gone.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == 404
    }
}

/// Errors raised while assembling a client from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting `{0}`")]
    Missing(&'static str),

    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: &'static str, value: String },

    #[error("The URL is not valid: {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP transport: {0}")]
    Transport(#[source] reqwest::Error),
}
