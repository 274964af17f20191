//! Fixed-schema key checks for the settings file and log lines.
//!
//! Both records are flat JSON objects whose key set must match a known list
//! exactly. The stores verify the raw object before decoding it into the
//! typed record, and verify the encoded object again before writing.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Keys present in the schema but not the object, and the reverse
#[derive(Debug, Default, PartialEq, Eq)]
pub struct KeyMismatch {
    pub missing: BTreeSet<String>,
    pub extra: BTreeSet<String>,
}

impl KeyMismatch {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

/// Compare an object's keys against the expected schema
///
/// Returns `None` when the key sets are identical.
pub fn diff_keys(expected: &[&str], object: &Map<String, Value>) -> Option<KeyMismatch> {
    let mismatch = KeyMismatch {
        missing: expected
            .iter()
            .filter(|key| !object.contains_key(**key))
            .map(|key| key.to_string())
            .collect(),
        extra: object
            .keys()
            .filter(|key| !expected.contains(&key.as_str()))
            .cloned()
            .collect(),
    };

    if mismatch.is_empty() {
        None
    } else {
        Some(mismatch)
    }
}
