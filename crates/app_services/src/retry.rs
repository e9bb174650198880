//! Reload-and-retry on stale concurrency stamps

use std::future::Future;

use tracing::warn;

use crate::error::ServiceError;

/// Runs `operation` again while it fails with a concurrency conflict, at most
/// `retries` extra times
///
/// Each attempt must load the aggregate afresh; other errors return at once.
pub(crate) async fn retry_on_conflict<T, F, Fut>(retries: u32, mut operation: F) -> Result<T, ServiceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ServiceError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Err(error) if error.is_concurrency_conflict() && attempt < retries => {
                attempt += 1;
                warn!(attempt, retries, %error, "Concurrency conflict, reloading");
            }
            result => return result,
        }
    }
}
