//! List filtering for data sources
//!
//! A data source lists every object of a kind and keeps the ones matching its
//! `filter` blocks. Each block names a dotted field path and a list of
//! acceptable values:
//!
//! ```hcl
//! filter {
//!   name   = "owner_users.id"
//!   values = ["3", "7"]
//! }
//! ```
//!
//! A record must satisfy every block (AND); a block is satisfied when any of
//! its values matches (OR). When a path crosses an array of objects, any
//! element matching is enough.

use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Filter configuration errors. A record that simply does not match is not an error.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("filter not found: {key}")]
    KeyNotFound { key: String },

    #[error("filter key ({key}) references an array instead of a field: {value}")]
    ArrayAtLeaf { key: String, value: String },

    #[error("invalid regular expression '{pattern}' for '{key}' filter")]
    InvalidRegex {
        key: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// One `filter` block as the provider schema declares it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FilterSpec {
    pub name: String,
    pub values: Vec<String>,
    #[serde(default)]
    pub regex: bool,
}

/// A single filter criterion
#[derive(Debug, Clone)]
pub struct Filter {
    key: String,
    keys: Vec<String>,
    values: Vec<Value>,
    regex: bool,
    // One entry per value, compiled up front; errors surface on first compare.
    patterns: Vec<Result<Regex, regex::Error>>,
}

impl Filter {
    pub fn new(key: &str, values: Vec<Value>, regex: bool) -> Self {
        let patterns = if regex {
            values.iter().map(|v| Regex::new(&render(v))).collect()
        } else {
            Vec::new()
        };

        Self {
            key: key.to_string(),
            keys: key.split('.').map(str::to_string).collect(),
            values,
            regex,
            patterns,
        }
    }

    /// True if any of the filter's values matches the record
    pub fn matches(&self, record: &Map<String, Value>) -> Result<bool, FilterError> {
        for candidate in &self.values {
            if self.deep_match(&self.keys, record, candidate)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Walk `record` along `keys` and compare the value found with `candidate`.
    ///
    /// Intermediate segments only descend into arrays of objects; any other
    /// intermediate value is a non-match. The final segment must not be an
    /// array.
    pub fn deep_match(
        &self,
        keys: &[String],
        record: &Map<String, Value>,
        candidate: &Value,
    ) -> Result<bool, FilterError> {
        let Some((head, rest)) = keys.split_first() else {
            return Ok(false);
        };

        let Some(value) = record.get(head) else {
            return Err(FilterError::KeyNotFound { key: head.clone() });
        };

        if rest.is_empty() {
            return self.compare(value, candidate);
        }

        match value {
            Value::Array(items) => {
                for item in items {
                    let Value::Object(nested) = item else {
                        continue;
                    };
                    if self.deep_match(rest, nested, candidate)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    fn compare(&self, value: &Value, candidate: &Value) -> Result<bool, FilterError> {
        if value.is_array() {
            return Err(FilterError::ArrayAtLeaf {
                key: self.key.clone(),
                value: render(value),
            });
        }

        if self.regex {
            let adhoc;
            let compiled = match self
                .values
                .iter()
                .position(|v| v == candidate)
                .and_then(|i| self.patterns.get(i))
            {
                Some(compiled) => compiled,
                None => {
                    adhoc = Regex::new(&render(candidate));
                    &adhoc
                }
            };
            let re = compiled
                .as_ref()
                .map_err(|source| FilterError::InvalidRegex {
                    key: self.key.clone(),
                    pattern: render(candidate),
                    source: source.clone(),
                })?;
            return Ok(re.is_match(&render(value)));
        }

        Ok(render(value) == render(candidate))
    }
}

/// Default string form used for comparisons, so `5` and `"5"` compare equal.
///
/// Whole floats below `1e21` drop the fractional part (`100.0` renders as
/// `100`), so amounts decoded as floats still match integer filter values.
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "<nil>".to_string(),
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// The set of filters configured on a data source
#[derive(Debug, Clone, Default)]
pub struct Filterable {
    filters: Vec<Filter>,
}

impl Filterable {
    pub fn new(specs: Vec<FilterSpec>) -> Self {
        let filters = specs
            .into_iter()
            .map(|spec| {
                let values = spec.values.into_iter().map(Value::String).collect();
                Filter::new(&spec.name, values, spec.regex)
            })
            .collect();
        Self { filters }
    }

    /// Matches every record
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from raw `filter` blocks as handed over by the host.
    pub fn from_blocks(blocks: &[Value]) -> Result<Self, serde_json::Error> {
        let specs = blocks
            .iter()
            .map(|block| FilterSpec::deserialize(block))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(specs))
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// True if the record satisfies every filter. No filters matches everything.
    pub fn matches(&self, record: &Map<String, Value>) -> Result<bool, FilterError> {
        for filter in &self.filters {
            if !filter.matches(record)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Keep the matching records, preserving order
    pub fn apply(
        &self,
        records: Vec<Map<String, Value>>,
    ) -> Result<Vec<Map<String, Value>>, FilterError> {
        let mut kept = Vec::with_capacity(records.len());
        for record in records {
            if self.matches(&record)? {
                kept.push(record);
            }
        }
        Ok(kept)
    }
}
