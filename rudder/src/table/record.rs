//! Records and row identity.
//!
//! A record is an opaque JSON object owned by the view; the table holds a
//! copy and never mutates fields. Values are addressed by dot-paths
//! (`"stats.sent"`); a missing intermediate segment resolves to nothing
//! rather than failing.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Stable identity of a record across re-derivations.
pub type RowKey = String;

/// An opaque record displayed as a table row.
#[derive(Debug, Clone, PartialEq)]
pub struct Record(Value);

impl Record {
    /// Wrap a JSON value. Non-object values are legal but resolve no paths.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The underlying JSON value.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Resolve a dot-path against this record.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut current = &self.0;
        for segment in path.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Resolve a dot-path to display text.
    ///
    /// `None` when the path is missing or the value is null; numbers and
    /// booleans are stringified.
    pub fn get_text(&self, path: &str) -> Option<String> {
        match self.get_path(path)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Resolve this record's identity.
    ///
    /// Tries each configured key field in order; when none resolves, falls
    /// back to a content hash of the whole record. `serde_json` maps iterate
    /// in sorted key order, so the hash is deterministic for a given record
    /// content.
    pub fn key(&self, key_fields: &[String]) -> RowKey {
        for field in key_fields {
            if let Some(text) = self.get_text(field) {
                return text;
            }
        }
        let mut hasher = Sha256::new();
        hasher.update(self.0.to_string().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Whether identity came from a key field rather than the hash fallback.
    pub fn has_key_field(&self, key_fields: &[String]) -> bool {
        key_fields.iter().any(|f| self.get_text(f).is_some())
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}
