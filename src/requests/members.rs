//! Cluster membership operations (`/v2/members`).

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::requests::{Body, RequestSpec};

const MEMBERS_ROOT: [&str; 2] = ["v2", "members"];

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Member {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "peerURLs", default)]
    pub peer_urls: Vec<String>,
    #[serde(rename = "clientURLs", default)]
    pub client_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct MemberList {
    #[serde(default)]
    pub members: Vec<Member>,
}

impl MemberList {
    pub fn by_id(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }
}

fn segments(tail: Option<&str>) -> Vec<String> {
    let mut segments: Vec<String> = MEMBERS_ROOT.iter().map(|s| s.to_string()).collect();
    if let Some(tail) = tail {
        segments.push(tail.to_string());
    }
    segments
}

pub(crate) fn list() -> RequestSpec {
    RequestSpec::new(Method::GET, segments(None))
}

pub(crate) fn create(peer_urls: &[String]) -> RequestSpec {
    RequestSpec::new(Method::POST, segments(None)).body(Body::Json(json!({ "peerURLs": peer_urls })))
}

pub(crate) fn delete(id: &str) -> RequestSpec {
    RequestSpec::new(Method::DELETE, segments(Some(id)))
}

pub(crate) fn update_peer_urls(id: &str, peer_urls: &[String]) -> RequestSpec {
    RequestSpec::new(Method::PUT, segments(Some(id))).body(Body::Json(json!({ "peerURLs": peer_urls })))
}

pub(crate) fn leader() -> RequestSpec {
    RequestSpec::new(Method::GET, segments(Some("leader")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::Operation;

    #[test]
    fn test_create_member_posts_json() {
        let spec = Operation::CreateMember {
            peer_urls: vec!["http://10.0.0.4:2380".into()],
        }
        .render();
        assert_eq!(spec.method, Method::POST);
        assert_eq!(spec.path(), "v2/members");
        assert_eq!(spec.body, Body::Json(json!({"peerURLs": ["http://10.0.0.4:2380"]})));
    }

    #[test]
    fn test_member_paths() {
        let delete = Operation::DeleteMember { id: "272e204152".into() }.render();
        assert_eq!(delete.method, Method::DELETE);
        assert_eq!(delete.path(), "v2/members/272e204152");

        let update = Operation::UpdateMemberPeerUrls {
            id: "272e204152".into(),
            peer_urls: vec![],
        }
        .render();
        assert_eq!(update.method, Method::PUT);

        assert_eq!(Operation::Leader.render().path(), "v2/members/leader");
        assert_eq!(Operation::ListMembers.render().method, Method::GET);
    }

    #[test]
    fn test_decode_member_list() {
        let body = r#"{"members":[{"id":"ce2a822cea30bfca","name":"default","peerURLs":["http://localhost:2380"],"clientURLs":["http://localhost:2379"]}]}"#;
        let list: MemberList = serde_json::from_str(body).unwrap();
        let member = list.by_name("default").unwrap();
        assert_eq!(member.id, "ce2a822cea30bfca");
        assert_eq!(member.client_urls, vec!["http://localhost:2379"]);
        assert!(list.by_id("nope").is_none());
    }
}
