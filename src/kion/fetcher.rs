//! List Fetcher
//!
//! Reads a list endpoint and post-filters the records the way data sources do.

use super::client::KionClient;
use crate::filter::Filterable;
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Fetch a list endpoint and keep the records matching `filterable`.
///
/// `response_path` is the dotted path of the array inside the response
/// (`"data"` for most v3 endpoints, `"data.items"` for paginated v4 ones);
/// an empty path means the response is the array itself.
pub async fn fetch_filtered(
    client: &KionClient,
    path: &str,
    params: &HashMap<String, String>,
    response_path: &str,
    filterable: &Filterable,
) -> Result<Vec<Map<String, Value>>> {
    let response: Value = if params.is_empty() {
        client.get::<Value>(path).await
    } else {
        client.get_with_params::<Value>(path, params).await
    }
    .with_context(|| format!("Unable to read {}", path))?;

    let records = extract_items(&response, response_path);
    let total = records.len();

    let kept = filterable
        .apply(records)
        .with_context(|| format!("Unable to filter {}", path))?;

    tracing::debug!("{}: kept {} of {} records", path, kept.len(), total);

    Ok(kept)
}

/// Pull the object records out of a response along a dotted path
pub fn extract_items(response: &Value, path: &str) -> Vec<Map<String, Value>> {
    let mut current = response;

    if !path.is_empty() {
        for part in path.split('.') {
            current = match current.get(part) {
                Some(v) => v,
                None => return vec![],
            };
        }
    }

    current
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_object().cloned())
                .collect()
        })
        .unwrap_or_default()
}
