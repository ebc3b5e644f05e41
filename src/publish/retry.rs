//! Bounded retry with exponential backoff for the upload call.

use std::future::Future;

use tokio::time::Duration;

use crate::error::Result;

/// Retry an async operation a bounded number of times.
///
/// `max_attempts` counts the first try; with 3 attempts the operation
/// runs at most three times. Backoff doubles per failure starting from
/// `base_delay`. The last error is surfaced when every attempt fails.
pub async fn retry_with_backoff<F, T, Fut>(
    mut operation: F,
    max_attempts: u32,
    base_delay: Duration,
    operation_name: &str,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    log::info!("{operation_name} succeeded on attempt {attempt}");
                }
                return Ok(value);
            }
            Err(e) if attempt < max_attempts => {
                let wait = base_delay * 2u32.saturating_pow(attempt - 1);
                log::warn!(
                    "{operation_name} failed (attempt {attempt}/{max_attempts}): {e}, retrying in {:.1}s",
                    wait.as_secs_f64()
                );
                tokio::time::sleep(wait).await;
            }
            Err(e) => {
                log::error!("{operation_name} failed after {attempt} attempt(s)");
                return Err(e);
            }
        }
    }
}
