//! Operation catalogue.
//!
//! # Responsibilities
//! - One tagged variant per store/cluster operation
//! - Render each operation to a transport-neutral `RequestSpec`
//! - Declare which operations are safe to replay on another endpoint
//!
//! # Data Flow
//! ```text
//! Operation → RequestSpec { method, segments, query, body }
//!           → transport joins segments onto the selected endpoint
//! ```

pub mod keys;
pub mod members;
pub mod version;

use reqwest::Method;

pub use keys::{KeyEvent, Node};
pub use members::{Member, MemberList};
pub use version::VersionInfo;

/// Precondition for compare-and-swap / compare-and-delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    /// The node's current `modifiedIndex`.
    Index(u64),
    /// The node's current value.
    Value(String),
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Form(Vec<(&'static str, String)>),
    Json(serde_json::Value),
}

/// Rendered request, relative to an endpoint root.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Vec<(&'static str, String)>,
    pub body: Body,
}

impl RequestSpec {
    pub(crate) fn new(method: Method, segments: Vec<String>) -> Self {
        Self {
            method,
            segments,
            query: Vec::new(),
            body: Body::Empty,
        }
    }

    pub(crate) fn query(mut self, name: &'static str, value: impl ToString) -> Self {
        self.query.push((name, value.to_string()));
        self
    }

    pub(crate) fn query_if(self, cond: bool, name: &'static str, value: impl ToString) -> Self {
        if cond {
            self.query(name, value)
        } else {
            self
        }
    }

    pub(crate) fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Path relative to the endpoint root, e.g. `v2/keys/foo`.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }
}

/// Every operation the client can issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Version,
    Get {
        key: String,
        recursive: bool,
        sorted: bool,
        quorum: bool,
    },
    /// Create or replace a value. `prev_exist` pins create-only or update-only.
    Set {
        key: String,
        value: String,
        ttl: Option<u64>,
        prev_exist: Option<bool>,
    },
    CreateDir {
        key: String,
        ttl: Option<u64>,
    },
    UpdateDir {
        key: String,
        ttl: Option<u64>,
    },
    /// POST a value under an auto-generated, in-order key.
    Enqueue {
        dir: String,
        value: String,
        ttl: Option<u64>,
    },
    Delete {
        key: String,
        dir: bool,
        recursive: bool,
    },
    CompareAndSwap {
        key: String,
        value: String,
        expected: Expected,
        ttl: Option<u64>,
    },
    CompareAndDelete {
        key: String,
        expected: Expected,
    },
    Watch {
        key: String,
        recursive: bool,
        wait_index: Option<u64>,
    },
    ListMembers,
    CreateMember {
        peer_urls: Vec<String>,
    },
    DeleteMember {
        id: String,
    },
    UpdateMemberPeerUrls {
        id: String,
        peer_urls: Vec<String>,
    },
    Leader,
}

impl Operation {
    pub fn get(key: impl Into<String>) -> Self {
        Operation::Get {
            key: key.into(),
            recursive: false,
            sorted: false,
            quorum: false,
        }
    }

    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Operation::Set {
            key: key.into(),
            value: value.into(),
            ttl: None,
            prev_exist: None,
        }
    }

    pub fn delete(key: impl Into<String>) -> Self {
        Operation::Delete {
            key: key.into(),
            dir: false,
            recursive: false,
        }
    }

    pub fn watch(key: impl Into<String>) -> Self {
        Operation::Watch {
            key: key.into(),
            recursive: false,
            wait_index: None,
        }
    }

    /// Stable label for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Version => "version",
            Operation::Get { .. } => "get",
            Operation::Set { .. } => "set",
            Operation::CreateDir { .. } => "create_dir",
            Operation::UpdateDir { .. } => "update_dir",
            Operation::Enqueue { .. } => "enqueue",
            Operation::Delete { .. } => "delete",
            Operation::CompareAndSwap { .. } => "compare_and_swap",
            Operation::CompareAndDelete { .. } => "compare_and_delete",
            Operation::Watch { .. } => "watch",
            Operation::ListMembers => "list_members",
            Operation::CreateMember { .. } => "create_member",
            Operation::DeleteMember { .. } => "delete_member",
            Operation::UpdateMemberPeerUrls { .. } => "update_member",
            Operation::Leader => "leader",
        }
    }

    /// Whether replaying the request on another endpoint cannot change the outcome.
    pub fn is_idempotent(&self) -> bool {
        match self {
            Operation::Version
            | Operation::Get { .. }
            | Operation::Watch { .. }
            | Operation::ListMembers
            | Operation::Leader
            | Operation::UpdateMemberPeerUrls { .. } => true,
            Operation::Set { prev_exist, .. } => prev_exist.is_none(),
            Operation::CreateDir { .. }
            | Operation::UpdateDir { .. }
            | Operation::Enqueue { .. }
            | Operation::Delete { .. }
            | Operation::CompareAndSwap { .. }
            | Operation::CompareAndDelete { .. }
            | Operation::CreateMember { .. }
            | Operation::DeleteMember { .. } => false,
        }
    }

    /// Watches block until a change; they are exempt from the request timeout.
    pub fn is_long_poll(&self) -> bool {
        matches!(self, Operation::Watch { .. })
    }

    pub fn render(&self) -> RequestSpec {
        match self {
            Operation::Version => version::render(),
            Operation::Get {
                key,
                recursive,
                sorted,
                quorum,
            } => keys::get(key, *recursive, *sorted, *quorum),
            Operation::Set {
                key,
                value,
                ttl,
                prev_exist,
            } => keys::set(key, value, *ttl, *prev_exist),
            Operation::CreateDir { key, ttl } => keys::dir(key, *ttl, false),
            Operation::UpdateDir { key, ttl } => keys::dir(key, *ttl, true),
            Operation::Enqueue { dir, value, ttl } => keys::enqueue(dir, value, *ttl),
            Operation::Delete { key, dir, recursive } => keys::delete(key, *dir, *recursive),
            Operation::CompareAndSwap {
                key,
                value,
                expected,
                ttl,
            } => keys::compare_and_swap(key, value, expected, *ttl),
            Operation::CompareAndDelete { key, expected } => keys::compare_and_delete(key, expected),
            Operation::Watch {
                key,
                recursive,
                wait_index,
            } => keys::watch(key, *recursive, *wait_index),
            Operation::ListMembers => members::list(),
            Operation::CreateMember { peer_urls } => members::create(peer_urls),
            Operation::DeleteMember { id } => members::delete(id),
            Operation::UpdateMemberPeerUrls { id, peer_urls } => members::update_peer_urls(id, peer_urls),
            Operation::Leader => members::leader(),
        }
    }
}
