//! Label associations
//!
//! Only a fixed set of Kion resource types accept labels. Calls for any
//! other type are refused before touching the network.

use super::client::KionClient;
use super::error::RequestError;
use super::models::{AssociateLabel, AssociateLabels, AssociatedLabelsResponse};
use std::collections::BTreeMap;
use thiserror::Error;

/// Resource types whose `/labels` endpoint exists
pub const SUPPORTED_LABEL_RESOURCE_TYPES: &[&str] =
    &["account", "cloud-rule", "funding-source", "ou", "project"];

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("unsupported resource type for labels: {0}")]
    UnsupportedResourceType(String),

    #[error(transparent)]
    Request(#[from] RequestError),
}

pub fn is_supported_resource_type(resource_type: &str) -> bool {
    SUPPORTED_LABEL_RESOURCE_TYPES.contains(&resource_type)
}

fn labels_path(resource_type: &str, resource_id: &str) -> Result<String, LabelError> {
    if !is_supported_resource_type(resource_type) {
        return Err(LabelError::UnsupportedResourceType(resource_type.to_string()));
    }
    Ok(format!("/v3/{}/{}/labels", resource_type, resource_id))
}

/// Replace the labels on a resource
pub async fn put_app_label_ids(
    client: &KionClient,
    labels: Vec<AssociateLabel>,
    resource_type: &str,
    resource_id: &str,
) -> Result<(), LabelError> {
    let path = labels_path(resource_type, resource_id)?;
    client.put(&path, &AssociateLabels { labels }).await?;
    Ok(())
}

/// Read the labels on a resource as a key -> value map
pub async fn read_resource_labels(
    client: &KionClient,
    resource_type: &str,
    resource_id: &str,
) -> Result<BTreeMap<String, String>, LabelError> {
    let path = labels_path(resource_type, resource_id)?;
    let response: AssociatedLabelsResponse = client.get(&path).await?;

    Ok(response
        .data
        .into_iter()
        .map(|label| (label.key, label.value))
        .collect())
}
