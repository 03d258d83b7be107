//! Kion Client
//!
//! Main client for the Kion REST API. Holds the normalised base URL and the
//! authenticated transport; every operation takes a path suffix that is
//! appended verbatim to the base URL.

use super::error::{ConfigError, RequestError};
use super::http::{KionHttpClient, RawResponse};
use super::models::Creation;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use url::Url;

/// Main Kion client
#[derive(Clone, Debug)]
pub struct KionClient {
    host_url: String,
    http: KionHttpClient,
}

impl KionClient {
    /// Create a new Kion client.
    ///
    /// # Panics
    ///
    /// Panics when `kion_url` cannot be parsed. A provider configured with a
    /// bad URL has nothing useful to do, so this is treated as a startup
    /// failure. Use [`KionClient::try_new`] to handle it instead.
    pub fn new(kion_url: &str, api_key: &str, api_path: &str, skip_ssl_validation: bool) -> Self {
        match Self::try_new(kion_url, api_key, api_path, skip_ssl_validation) {
            Ok(client) => client,
            Err(err) => {
                tracing::error!("{}", err);
                panic!("{}", err);
            }
        }
    }

    /// Create a new Kion client, reporting an unparseable URL as an error
    pub fn try_new(
        kion_url: &str,
        api_key: &str,
        api_path: &str,
        skip_ssl_validation: bool,
    ) -> Result<Self, ConfigError> {
        let host_url = join_api_path(kion_url, api_path).map_err(|source| {
            ConfigError::InvalidUrl {
                url: kion_url.to_string(),
                source,
            }
        })?;

        let http = KionHttpClient::new(api_key, skip_ssl_validation)?;

        tracing::debug!("Kion client targeting {}", host_url);

        Ok(Self { host_url, http })
    }

    /// Effective base URL, API path included, without a trailing slash
    pub fn host_url(&self) -> &str {
        &self.host_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.host_url, path)
    }

    /// GET an element from Kion and decode it
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestError> {
        let response = self.http.send(Method::GET, &self.url(path), None).await?;
        decode(response)
    }

    /// GET with query parameters; a parameter replaces any same-named one already in `path`
    pub async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &HashMap<String, String>,
    ) -> Result<T, RequestError> {
        let url = with_params(&self.url(path), params)?;
        let response = self.http.send(Method::GET, &url, None).await?;
        decode(response)
    }

    /// POST a new element and return the creation envelope
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Creation, RequestError> {
        self.post_with_response(path, body).await
    }

    /// POST and decode an arbitrary response shape
    pub async fn post_with_response<B, T>(&self, path: &str, body: &B) -> Result<T, RequestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode(body)?;
        let response = self
            .http
            .send(Method::POST, &self.url(path), Some(body))
            .await?;
        decode(response)
    }

    /// PATCH an element, ignoring the response body
    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), RequestError> {
        let body = encode(body)?;
        self.http
            .send(Method::PATCH, &self.url(path), Some(body))
            .await?;
        Ok(())
    }

    /// PUT an element, ignoring the response body
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), RequestError> {
        let body = encode(body)?;
        self.http
            .send(Method::PUT, &self.url(path), Some(body))
            .await?;
        Ok(())
    }

    /// DELETE an element
    pub async fn delete(&self, path: &str) -> Result<(), RequestError> {
        self.http.send(Method::DELETE, &self.url(path), None).await?;
        Ok(())
    }

    /// DELETE with a JSON body, e.g. removing owners from an object
    pub async fn delete_with_body<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), RequestError> {
        let body = encode(body)?;
        self.http
            .send(Method::DELETE, &self.url(path), Some(body))
            .await?;
        Ok(())
    }

    /// DELETE with an optional body, decoding the response
    pub async fn delete_with_response<B, T>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, RequestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = body.map(encode).transpose()?;
        let response = self
            .http
            .send(Method::DELETE, &self.url(path), body)
            .await?;
        decode(response)
    }
}

/// Join the API path onto the URL's own path with exactly one slash between
/// segments and none at the end.
fn join_api_path(kion_url: &str, api_path: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(kion_url)?;

    let segments: Vec<&str> = url
        .path()
        .split('/')
        .chain(api_path.split('/'))
        .filter(|s| !s.is_empty())
        .collect();
    let path = if segments.is_empty() {
        String::new()
    } else {
        format!("/{}", segments.join("/"))
    };
    url.set_path(&path);

    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn with_params(url: &str, params: &HashMap<String, String>) -> Result<String, RequestError> {
    let mut parsed = Url::parse(url).map_err(|source| RequestError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, _)| !params.contains_key(k.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    {
        let mut query = parsed.query_pairs_mut();
        query.clear();
        query.extend_pairs(kept.iter());
        query.extend_pairs(params.iter());
    }
    if parsed.query() == Some("") {
        parsed.set_query(None);
    }

    Ok(parsed.to_string())
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Vec<u8>, RequestError> {
    serde_json::to_vec(body).map_err(RequestError::Encode)
}

fn decode<T: DeserializeOwned>(response: RawResponse) -> Result<T, RequestError> {
    let text = if response.body.trim().is_empty() {
        "null"
    } else {
        response.body.as_str()
    };

    serde_json::from_str(text).map_err(|source| RequestError::Decode {
        status: response.status,
        body: response.body.clone(),
        source,
    })
}
