//! Shared Kion API envelopes
//!
//! Endpoint-specific models live with the resources that use them. These are
//! the shapes that recur across most of the API.

use serde::{Deserialize, Serialize};

/// Response to a record creation: `{"record_id": 12, "status": 201}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creation {
    #[serde(default)]
    pub record_id: i64,
    #[serde(default)]
    pub status: u16,
}

/// Reference to another object by id, e.g. an owner user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectWithId {
    pub id: i64,
}

/// Cloud tag as the API spells it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(rename = "tag_key")]
    pub key: String,
    #[serde(rename = "tag_value")]
    pub value: String,
}

/// Label key/value attached to a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociateLabel {
    pub key: String,
    pub value: String,
}

/// Body of `PUT /v3/{type}/{id}/labels`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociateLabels {
    pub labels: Vec<AssociateLabel>,
}

/// A label as returned by `GET /v3/{type}/{id}/labels`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociatedLabel {
    #[serde(default)]
    pub id: i64,
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Response of `GET /v3/{type}/{id}/labels`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociatedLabelsResponse {
    #[serde(default)]
    pub data: Vec<AssociatedLabel>,
    #[serde(default)]
    pub status: u16,
}

/// Generic `{"data": [...], "status": 200}` list envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub status: u16,
}
