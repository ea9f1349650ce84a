//! Structured condition documents for validation rules.
//!
//! Rule conditions are user-authored JSON interpreted by an external rule
//! engine that this crate does not implement. The only contract enforced
//! here is syntactic: a condition must be well-formed structured data.
//! Representing documents as a tagged variant (rather than an open-ended
//! dynamic map) lets a future evaluation engine pattern-match safely.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// One node of a condition document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    /// JSON `null`
    Null,
    /// Boolean node
    Bool(bool),
    /// Numeric node; stored as `f64`
    Number(f64),
    /// String node
    String(String),
    /// Ordered list of nodes
    Array(Vec<ConditionValue>),
    /// Keyed mapping of nodes
    Object(BTreeMap<String, ConditionValue>),
}

/// Error raised for malformed condition text
#[derive(Debug, Error)]
pub enum ConditionError {
    /// The submitted text is not valid JSON
    #[error("Conditions must be valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl ConditionValue {
    /// Parse a condition document from user-entered JSON text.
    ///
    /// Rejection happens before any rule state is touched; callers only
    /// store the parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError::InvalidJson`] for malformed input
    pub fn parse(text: &str) -> Result<Self, ConditionError> {
        Ok(serde_json::from_str(text)?)
    }

    /// The value under `key`, when this node is an object
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConditionValue> {
        match self {
            Self::Object(fields) => fields.get(key),
            _ => None,
        }
    }

    /// The string payload, when this node is a string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// The numeric payload, when this node is a number
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }
}

/// Convenience for building object documents in fixtures and tests
impl FromIterator<(String, ConditionValue)> for ConditionValue {
    fn from_iter<I: IntoIterator<Item = (String, ConditionValue)>>(iter: I) -> Self {
        Self::Object(iter.into_iter().collect())
    }
}
