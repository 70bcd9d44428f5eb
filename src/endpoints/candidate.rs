//! Candidate endpoint addresses.
//!
//! A candidate is a cheap handle around a shared `Url`. Cloning keeps the
//! same allocation, so an `Endpoint` built from a candidate can be checked
//! against the caller's original with [`Candidate::same_as`].

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use url::Url;

/// Errors raised while parsing a candidate address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CandidateError {
    #[error("invalid endpoint address '{address}': {reason}")]
    Invalid { address: String, reason: String },

    #[error("unsupported scheme '{scheme}' in '{address}' (expected http or https)")]
    UnsupportedScheme { address: String, scheme: String },
}

/// An endpoint address supplied by the caller, not yet verified.
#[derive(Clone)]
pub struct Candidate {
    url: Arc<Url>,
}

impl Candidate {
    /// Parse an `http://` or `https://` address.
    pub fn parse(address: &str) -> Result<Self, CandidateError> {
        let url = Url::parse(address.trim()).map_err(|e| CandidateError::Invalid {
            address: address.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_url(url)
    }

    /// Wrap an already parsed URL.
    pub fn from_url(url: Url) -> Result<Self, CandidateError> {
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(CandidateError::UnsupportedScheme {
                    address: url.to_string(),
                    scheme: other.to_string(),
                })
            }
        }
        if url.cannot_be_a_base() || url.host().is_none() {
            return Err(CandidateError::Invalid {
                address: url.to_string(),
                reason: "missing host".to_string(),
            });
        }
        Ok(Self { url: Arc::new(url) })
    }

    /// Parse a list of addresses, failing on the first invalid one.
    pub fn parse_all<I, S>(addresses: I) -> Result<Vec<Self>, CandidateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        addresses.into_iter().map(|a| Self::parse(a.as_ref())).collect()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// True when both handles point at the same caller-supplied address,
    /// not merely an equal one.
    pub fn same_as(&self, other: &Candidate) -> bool {
        Arc::ptr_eq(&self.url, &other.url)
    }

    /// Build a URL below this address from path segments.
    ///
    /// Any path already present on the address is kept as a prefix.
    pub fn join_segments<'a, I>(&self, segments: I) -> Url
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = (*self.url).clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.url.as_str() == other.url.as_str()
    }
}

impl Eq for Candidate {}

impl Hash for Candidate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.url.as_str().hash(state);
    }
}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Candidate").field(&self.url.as_str()).finish()
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl FromStr for Candidate {
    type Err = CandidateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_identity() {
        let a = Candidate::parse("http://127.0.0.1:2379").unwrap();
        let b = Candidate::parse("http://127.0.0.1:2379").unwrap();
        let a2 = a.clone();

        assert_eq!(a, b);
        assert!(!a.same_as(&b));
        assert!(a.same_as(&a2));
    }

    #[test]
    fn test_rejects_bad_addresses() {
        assert!(matches!(
            Candidate::parse("ftp://127.0.0.1:2379"),
            Err(CandidateError::UnsupportedScheme { .. })
        ));
        assert!(matches!(Candidate::parse("not a url"), Err(CandidateError::Invalid { .. })));
        assert!(Candidate::parse_all(["http://a:1", "http://b:2"]).is_ok());
        assert!(Candidate::parse_all(["http://a:1", "mailto:x@y"]).is_err());
    }

    #[test]
    fn test_join_segments() {
        let c = Candidate::parse("http://127.0.0.1:2379").unwrap();
        assert_eq!(c.join_segments(["version"]).as_str(), "http://127.0.0.1:2379/version");

        let prefixed = Candidate::parse("http://proxy:80/etcd/").unwrap();
        assert_eq!(
            prefixed.join_segments(["v2", "keys", "a"]).as_str(),
            "http://proxy:80/etcd/v2/keys/a"
        );
    }
}
