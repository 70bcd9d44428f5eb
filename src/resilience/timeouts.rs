//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap probe and request futures with a deadline
//! - Turn an elapsed deadline into a classified `Timeout` error
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; the wrapped future is dropped on expiry
//! - Timeout errors are distinct from connectivity errors

use std::future::Future;
use std::time::Duration;

use tokio::time;

use crate::error::EtcdError;

/// Run `fut` for at most `limit`.
pub async fn with_timeout<F, T>(endpoint: &str, limit: Duration, fut: F) -> Result<T, EtcdError>
where
    F: Future<Output = T>,
{
    time::timeout(limit, fut)
        .await
        .map_err(|_| EtcdError::timeout(endpoint, Some(limit)))
}
