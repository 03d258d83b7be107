//! Conversions between API models and the provider's schema values
//!
//! "Inflate" turns API shapes into schema values, "flatten" goes the other
//! way.

use crate::kion::models::{AssociateLabel, ObjectWithId, Tag};
use anyhow::{bail, Context, Result};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// `[{id: 1}, {id: 2}]` -> schema list of `{"id": n}` blocks
pub fn inflate_object_with_id(objects: &[ObjectWithId]) -> Vec<Value> {
    objects.iter().map(|o| json!({ "id": o.id })).collect()
}

/// `[1, 2]` -> schema list of `{"id": n}` blocks
pub fn inflate_array_of_ids(ids: &[i64]) -> Vec<Value> {
    ids.iter().map(|id| json!({ "id": id })).collect()
}

pub fn inflate_tags(tags: &[Tag]) -> BTreeMap<String, String> {
    tags.iter()
        .map(|t| (t.key.clone(), t.value.clone()))
        .collect()
}

pub fn flatten_tags(tags: &BTreeMap<String, String>) -> Vec<Tag> {
    tags.iter()
        .map(|(key, value)| Tag {
            key: key.clone(),
            value: value.clone(),
        })
        .collect()
}

pub fn flatten_associate_labels(labels: &BTreeMap<String, String>) -> Vec<AssociateLabel> {
    labels
        .iter()
        .map(|(key, value)| AssociateLabel {
            key: key.clone(),
            value: value.clone(),
        })
        .collect()
}

/// Drop empty strings
pub fn filter_string_array<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| {
            let s: &str = item.as_ref();
            (!s.is_empty()).then(|| s.to_string())
        })
        .collect()
}

/// Split a composite import id such as `12-34` into its integer parts
pub fn parse_resource_id(resource_id: &str, names: &[&str]) -> Result<Vec<i64>> {
    let parts: Vec<&str> = resource_id.split('-').collect();
    if parts.len() != names.len() {
        bail!(
            "invalid resource ID format, expected {} with {} parts",
            names.join("-"),
            names.len()
        );
    }

    parts
        .iter()
        .zip(names)
        .map(|(part, name)| {
            part.parse::<i64>()
                .with_context(|| format!("invalid {}, must be an integer", name))
        })
        .collect()
}

/// First of `fields` whose value differs between the two blocks
pub fn fields_changed<'a>(
    old: &Map<String, Value>,
    new: &Map<String, Value>,
    fields: &[&'a str],
) -> Option<&'a str> {
    fields
        .iter()
        .copied()
        .find(|field| old.get(*field) != new.get(*field))
}

/// Custom variable value types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvType {
    String,
    List,
    Map,
}

impl std::str::FromStr for CvType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "string" => Ok(CvType::String),
            "list" => Ok(CvType::List),
            "map" => Ok(CvType::Map),
            other => bail!("unsupported custom variable type: {}", other),
        }
    }
}

/// Wrap a configured custom variable value as the API expects: `{"value": ...}`.
///
/// Strings are taken literally; lists and maps are given as JSON text.
pub fn normalize_cv_value(value: &str, cv_type: CvType) -> Result<String> {
    let inner = match cv_type {
        CvType::String => Value::String(value.to_string()),
        CvType::List => {
            let parsed: Value = serde_json::from_str(value)
                .with_context(|| format!("invalid JSON for type list: {}", value))?;
            if !parsed.is_array() {
                bail!("expected a JSON list, got: {}", value);
            }
            parsed
        }
        CvType::Map => {
            let parsed: Value = serde_json::from_str(value)
                .with_context(|| format!("invalid JSON for type map: {}", value))?;
            if !parsed.is_object() {
                bail!("expected a JSON object, got: {}", value);
            }
            parsed
        }
    };

    Ok(serde_json::to_string(&json!({ "value": inner }))?)
}

/// Render a custom variable value from the API back into its configured form
pub fn pack_cv_value(value: &Value, cv_type: CvType) -> Result<String> {
    match (cv_type, value) {
        (_, Value::Null) => Ok(String::new()),
        (CvType::String, Value::String(s)) => Ok(s.clone()),
        (CvType::List, Value::Array(_)) | (CvType::Map, Value::Object(_)) => {
            Ok(serde_json::to_string(value)?)
        }
        (CvType::List, Value::String(s)) => {
            serde_json::from_str::<Vec<Value>>(s).context("invalid list JSON")?;
            Ok(s.clone())
        }
        (CvType::Map, Value::String(s)) => {
            serde_json::from_str::<Map<String, Value>>(s).context("invalid map JSON")?;
            Ok(s.clone())
        }
        (cv_type, other) => bail!("expected {:?} value, got: {}", cv_type, other),
    }
}
