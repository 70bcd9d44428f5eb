//! Key space operations (`/v2/keys`).

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::requests::{Body, Expected, RequestSpec};

const KEYS_ROOT: [&str; 2] = ["v2", "keys"];

/// A node in the key space; directories carry children in `nodes`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub dir: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
    #[serde(default)]
    pub created_index: u64,
    #[serde(default)]
    pub modified_index: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<Node>,
}

impl Node {
    /// Depth-first search for a descendant by full key.
    pub fn find(&self, key: &str) -> Option<&Node> {
        if self.key == key {
            return Some(self);
        }
        self.nodes.iter().find_map(|child| child.find(key))
    }
}

/// Result of any key space operation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEvent {
    pub action: String,
    pub node: Node,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_node: Option<Node>,
}

impl KeyEvent {
    pub fn value(&self) -> Option<&str> {
        self.node.value.as_deref()
    }
}

/// `/foo//bar/` → `["v2", "keys", "foo", "bar"]`; the root key keeps a trailing slash.
pub(crate) fn key_segments(key: &str) -> Vec<String> {
    let mut segments: Vec<String> = KEYS_ROOT.iter().map(|s| s.to_string()).collect();
    let parts: Vec<String> = key
        .split('/')
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();
    if parts.is_empty() {
        segments.push(String::new());
    } else {
        segments.extend(parts);
    }
    segments
}

fn form(value: Option<&str>, ttl: Option<u64>, dir: bool) -> Body {
    let mut fields = Vec::new();
    if let Some(value) = value {
        fields.push(("value", value.to_string()));
    }
    if let Some(ttl) = ttl {
        fields.push(("ttl", ttl.to_string()));
    }
    if dir {
        fields.push(("dir", "true".to_string()));
    }
    Body::Form(fields)
}

fn expect(spec: RequestSpec, expected: &Expected) -> RequestSpec {
    match expected {
        Expected::Index(index) => spec.query("prevIndex", index),
        Expected::Value(value) => spec.query("prevValue", value),
    }
}

pub(crate) fn get(key: &str, recursive: bool, sorted: bool, quorum: bool) -> RequestSpec {
    RequestSpec::new(Method::GET, key_segments(key))
        .query_if(recursive, "recursive", true)
        .query_if(sorted, "sorted", true)
        .query_if(quorum, "quorum", true)
}

pub(crate) fn set(key: &str, value: &str, ttl: Option<u64>, prev_exist: Option<bool>) -> RequestSpec {
    let spec = RequestSpec::new(Method::PUT, key_segments(key));
    let spec = match prev_exist {
        Some(exists) => spec.query("prevExist", exists),
        None => spec,
    };
    spec.body(form(Some(value), ttl, false))
}

/// Create (`exists == false`) or update (`exists == true`) a directory.
pub(crate) fn dir(key: &str, ttl: Option<u64>, exists: bool) -> RequestSpec {
    RequestSpec::new(Method::PUT, key_segments(key))
        .query("prevExist", exists)
        .body(form(None, ttl, true))
}

pub(crate) fn enqueue(dir: &str, value: &str, ttl: Option<u64>) -> RequestSpec {
    RequestSpec::new(Method::POST, key_segments(dir)).body(form(Some(value), ttl, false))
}

pub(crate) fn delete(key: &str, dir: bool, recursive: bool) -> RequestSpec {
    RequestSpec::new(Method::DELETE, key_segments(key))
        .query_if(dir, "dir", true)
        .query_if(recursive, "recursive", true)
}

pub(crate) fn compare_and_swap(key: &str, value: &str, expected: &Expected, ttl: Option<u64>) -> RequestSpec {
    expect(RequestSpec::new(Method::PUT, key_segments(key)), expected).body(form(Some(value), ttl, false))
}

pub(crate) fn compare_and_delete(key: &str, expected: &Expected) -> RequestSpec {
    expect(RequestSpec::new(Method::DELETE, key_segments(key)), expected)
}

pub(crate) fn watch(key: &str, recursive: bool, wait_index: Option<u64>) -> RequestSpec {
    let spec = RequestSpec::new(Method::GET, key_segments(key))
        .query("wait", true)
        .query_if(recursive, "recursive", true);
    match wait_index {
        Some(index) => spec.query("waitIndex", index),
        None => spec,
    }
}
