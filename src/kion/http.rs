//! HTTP transport for Kion REST API calls

use super::error::{ConfigError, RequestError};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// A completed round trip with a success status
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP client wrapper holding the transport and the bearer token
#[derive(Clone)]
pub struct KionHttpClient {
    client: Client,
    token: String,
}

impl std::fmt::Debug for KionHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KionHttpClient")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl KionHttpClient {
    /// Create a new HTTP client
    pub fn new(token: &str, skip_ssl_validation: bool) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .user_agent(concat!("kion-client/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(skip_ssl_validation)
            .build()
            .map_err(ConfigError::Transport)?;

        Ok(Self {
            client,
            token: token.to_string(),
        })
    }

    /// Perform one authenticated round trip.
    ///
    /// Any 2xx status is a success. Everything else becomes
    /// [`RequestError::Http`] carrying the status and raw body.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse, RequestError> {
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), url)
            .bearer_auth(&self.token);

        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|source| RequestError::Transport {
                method: method.to_string(),
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|source| RequestError::Body {
            status: status.as_u16(),
            source,
        })?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        if !status.is_success() {
            tracing::error!(
                "API error: {} {} - {} - {}",
                method,
                url,
                status,
                sanitize_for_log(&body)
            );
            return Err(RequestError::Http {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }
}
