//! Parsing of the `nodeNames` placement annotation
//!
//! The annotation value is a literal comma-separated list of node names.
//! Entries are kept exactly as written: no trimming, no deduplication, and
//! empty entries survive (`"a,,b"` has three entries).

use k8s_openapi::api::core::v1::Pod;
use std::collections::BTreeMap;
use std::fmt;

/// Split the annotation `key` into its entries
///
/// Returns `None` when the key is absent, which means "no constraint".
pub fn parse<'a>(
    annotations: Option<&'a BTreeMap<String, String>>,
    key: &str,
) -> Option<Vec<&'a str>> {
    annotations
        .and_then(|a| a.get(key))
        .map(|value| value.split(',').collect())
}

/// Ordered list of node names a pod may be placed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    entries: Vec<String>,
}

impl AllowList {
    /// Read the allow-list from a pod's annotations
    pub fn from_pod(pod: &Pod, key: &str) -> Option<Self> {
        parse(pod.metadata.annotations.as_ref(), key).map(|entries| Self {
            entries: entries.into_iter().map(str::to_string).collect(),
        })
    }

    /// Whether `node_name` occurs anywhere in the list
    pub fn contains(&self, node_name: &str) -> bool {
        self.entries.iter().any(|e| e == node_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for AllowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.entries)
    }
}
