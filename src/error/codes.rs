//! Cluster error codes.
//!
//! The store reports domain failures as a numeric `errorCode` in the JSON
//! body. Each known code is a named variant; anything outside the table is
//! kept verbatim in `Unknown`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A store-reported error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Command errors
    KeyNotFound,
    TestFailed,
    NotFile,
    NoMorePeer,
    NotDirectory,
    NodeExists,
    KeyIsPreserved,
    RootReadOnly,
    DirectoryNotEmpty,
    ExistingPeerAddress,
    Unauthorized,

    // Post form errors
    ValueRequired,
    PreviousValueRequired,
    TtlNotANumber,
    IndexNotANumber,
    ValueOrTtlRequired,
    TimeoutNotANumber,
    NameRequired,
    IndexOrValueRequired,
    IndexValueMutex,
    InvalidField,
    InvalidForm,
    RefreshValue,
    RefreshTtlRequired,

    // Raft errors
    RaftInternal,
    LeaderElect,

    // Watch errors
    WatcherCleared,
    EventIndexCleared,

    // Standby errors
    StandbyInternal,
    InvalidActiveSize,
    InvalidRemoveDelay,

    // Client-side
    ClientInternal,

    /// A code the table does not know about.
    Unknown(i64),
}

const TABLE: &[(i64, ErrorCode)] = &[
    (100, ErrorCode::KeyNotFound),
    (101, ErrorCode::TestFailed),
    (102, ErrorCode::NotFile),
    (103, ErrorCode::NoMorePeer),
    (104, ErrorCode::NotDirectory),
    (105, ErrorCode::NodeExists),
    (106, ErrorCode::KeyIsPreserved),
    (107, ErrorCode::RootReadOnly),
    (108, ErrorCode::DirectoryNotEmpty),
    (109, ErrorCode::ExistingPeerAddress),
    (110, ErrorCode::Unauthorized),
    (200, ErrorCode::ValueRequired),
    (201, ErrorCode::PreviousValueRequired),
    (202, ErrorCode::TtlNotANumber),
    (203, ErrorCode::IndexNotANumber),
    (204, ErrorCode::ValueOrTtlRequired),
    (205, ErrorCode::TimeoutNotANumber),
    (206, ErrorCode::NameRequired),
    (207, ErrorCode::IndexOrValueRequired),
    (208, ErrorCode::IndexValueMutex),
    (209, ErrorCode::InvalidField),
    (210, ErrorCode::InvalidForm),
    (211, ErrorCode::RefreshValue),
    (212, ErrorCode::RefreshTtlRequired),
    (300, ErrorCode::RaftInternal),
    (301, ErrorCode::LeaderElect),
    (400, ErrorCode::WatcherCleared),
    (401, ErrorCode::EventIndexCleared),
    (500, ErrorCode::StandbyInternal),
    (501, ErrorCode::InvalidActiveSize),
    (502, ErrorCode::InvalidRemoveDelay),
    (1000, ErrorCode::ClientInternal),
];

impl ErrorCode {
    /// Map a raw code to its variant.
    pub fn from_raw(raw: i64) -> Self {
        TABLE
            .iter()
            .find(|(code, _)| *code == raw)
            .map(|(_, variant)| *variant)
            .unwrap_or(ErrorCode::Unknown(raw))
    }

    /// The numeric code as sent on the wire.
    pub fn raw(&self) -> i64 {
        if let ErrorCode::Unknown(raw) = self {
            return *raw;
        }
        TABLE
            .iter()
            .find(|(_, variant)| variant == self)
            .map(|(code, _)| *code)
            .unwrap_or_default()
    }

    /// Code implied by an HTTP status when the body carries none.
    ///
    /// Only statuses with a single unambiguous meaning are mapped.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            409 => Some(ErrorCode::ExistingPeerAddress),
            _ => None,
        }
    }

    /// Codes the cluster emits for transient leadership or raft trouble.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ErrorCode::RaftInternal | ErrorCode::LeaderElect | ErrorCode::StandbyInternal
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::KeyNotFound => "key_not_found",
            ErrorCode::TestFailed => "test_failed",
            ErrorCode::NotFile => "not_file",
            ErrorCode::NoMorePeer => "no_more_peer",
            ErrorCode::NotDirectory => "not_directory",
            ErrorCode::NodeExists => "node_exists",
            ErrorCode::KeyIsPreserved => "key_is_preserved",
            ErrorCode::RootReadOnly => "root_read_only",
            ErrorCode::DirectoryNotEmpty => "directory_not_empty",
            ErrorCode::ExistingPeerAddress => "existing_peer_address",
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::ValueRequired => "value_required",
            ErrorCode::PreviousValueRequired => "previous_value_required",
            ErrorCode::TtlNotANumber => "ttl_not_a_number",
            ErrorCode::IndexNotANumber => "index_not_a_number",
            ErrorCode::ValueOrTtlRequired => "value_or_ttl_required",
            ErrorCode::TimeoutNotANumber => "timeout_not_a_number",
            ErrorCode::NameRequired => "name_required",
            ErrorCode::IndexOrValueRequired => "index_or_value_required",
            ErrorCode::IndexValueMutex => "index_value_mutex",
            ErrorCode::InvalidField => "invalid_field",
            ErrorCode::InvalidForm => "invalid_form",
            ErrorCode::RefreshValue => "refresh_value",
            ErrorCode::RefreshTtlRequired => "refresh_ttl_required",
            ErrorCode::RaftInternal => "raft_internal",
            ErrorCode::LeaderElect => "leader_elect",
            ErrorCode::WatcherCleared => "watcher_cleared",
            ErrorCode::EventIndexCleared => "event_index_cleared",
            ErrorCode::StandbyInternal => "standby_internal",
            ErrorCode::InvalidActiveSize => "invalid_active_size",
            ErrorCode::InvalidRemoveDelay => "invalid_remove_delay",
            ErrorCode::ClientInternal => "client_internal",
            ErrorCode::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.raw())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.raw())
    }
}

/// Accepts an integer or a numeric string; anything else is treated as absent.
pub(crate) fn deserialize_optional_code<'de, D>(deserializer: D) -> Result<Option<ErrorCode>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64().map(ErrorCode::from_raw),
        Some(serde_json::Value::String(s)) => s.trim().parse::<i64>().ok().map(ErrorCode::from_raw),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_round_trip() {
        for (raw, variant) in TABLE {
            assert_eq!(ErrorCode::from_raw(*raw), *variant);
            assert_eq!(variant.raw(), *raw);
        }
    }

    #[test]
    fn test_unknown_code_is_preserved() {
        let code = ErrorCode::from_raw(999);
        assert_eq!(code, ErrorCode::Unknown(999));
        assert_eq!(code.raw(), 999);
    }

    #[test]
    fn test_status_fallback() {
        assert_eq!(ErrorCode::from_status(409), Some(ErrorCode::ExistingPeerAddress));
        assert_eq!(ErrorCode::from_status(500), None);
    }

    #[test]
    fn test_code_from_string_or_number() {
        #[derive(Deserialize)]
        struct Body {
            #[serde(default, deserialize_with = "deserialize_optional_code")]
            code: Option<ErrorCode>,
        }

        let b: Body = serde_json::from_str(r#"{"code": 105}"#).unwrap();
        assert_eq!(b.code, Some(ErrorCode::NodeExists));

        let b: Body = serde_json::from_str(r#"{"code": "401"}"#).unwrap();
        assert_eq!(b.code, Some(ErrorCode::EventIndexCleared));

        let b: Body = serde_json::from_str(r#"{"code": "abc"}"#).unwrap();
        assert_eq!(b.code, None);

        let b: Body = serde_json::from_str(r#"{"code": null}"#).unwrap();
        assert_eq!(b.code, None);
    }
}
