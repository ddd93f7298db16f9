use std::future::Future;
use std::time::Duration;

use crate::error::ApiError;

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_millis(200);

/// Runs an upstream call up to three times with exponential backoff.
///
/// The media host and the notifier are the only collaborators wrapped in this;
/// store writes are never retried.
pub async fn with_retry<T, F, Fut>(what: &str, mut call: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut delay = INITIAL_BACKOFF;
    let mut attempt = 1;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < MAX_ATTEMPTS => {
                tracing::warn!(what, attempt, error = %err, "Upstream call failed, retrying");
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
            Err(err) => {
                tracing::error!(what, attempt, error = %err, "Upstream call failed, giving up");
                return Err(err);
            }
        }
    }
}
