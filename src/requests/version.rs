//! Version endpoint payload.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::requests::RequestSpec;

/// Path segment of the version endpoint, relative to a member's root.
pub const VERSION_PATH: &str = "version";

pub(crate) fn render() -> RequestSpec {
    RequestSpec::new(Method::GET, vec![VERSION_PATH.to_string()])
}

/// Server and cluster versions reported by a member.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct VersionInfo {
    #[serde(rename = "etcdserver", default)]
    pub server: String,
    #[serde(rename = "etcdcluster", default)]
    pub cluster: String,
}
