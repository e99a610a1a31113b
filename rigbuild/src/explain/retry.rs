//! Single-retry policy shared by the network providers.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::explain::provider::ExplainError;

pub const MAX_RETRIES: u32 = 1;
pub const RETRY_DELAY_MS: u64 = 500;
const MAX_RETRY_DELAY_MS: u64 = 10_000;

fn delay_for(error: &ExplainError) -> Duration {
    let ms = match error {
        ExplainError::RateLimited { retry_after } => {
            retry_after.saturating_mul(1000).max(RETRY_DELAY_MS)
        }
        _ => RETRY_DELAY_MS,
    };
    Duration::from_millis(ms.min(MAX_RETRY_DELAY_MS))
}

/// Time one provider may spend on an explanation: every attempt at
/// `request_timeout` plus the pause before the retry.
pub fn attempt_deadline(request_timeout: Duration) -> Duration {
    request_timeout * (MAX_RETRIES + 1) + Duration::from_millis(RETRY_DELAY_MS)
}

/// Run `attempt`, retrying once after a short pause if it fails transiently.
pub async fn with_retry<T, F, Fut>(provider: &str, mut attempt: F) -> Result<T, ExplainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ExplainError>>,
{
    let mut retries = 0;
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && retries < MAX_RETRIES => {
                retries += 1;
                let delay = delay_for(&e);
                tracing::warn!(
                    "{} request failed: {}. Retrying in {}ms (attempt {}/{})",
                    provider,
                    e,
                    delay.as_millis(),
                    retries,
                    MAX_RETRIES
                );
                sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
