//! Bounded-retry combinator with a fixed inter-attempt delay.
//!
//! The OCR backend fails often enough under load that every page call is
//! wrapped in [`with_attempts`]. The policy is deliberately simple: a fixed
//! attempt budget and a fixed delay — no jitter, no exponential backoff, and
//! nothing cached between attempts. The combinator returns the final
//! `Result` instead of re-raising mid-loop, so callers see exactly one
//! success or the last error once the budget is spent.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Run `op` up to `max_attempts` times (total, not retries), sleeping `delay`
/// between attempts.
///
/// `op` receives the 1-based attempt number. The first `Ok` wins; once the
/// budget is exhausted the last error is returned.
///
/// `max_attempts` of 0 is treated as 1 — the operation always runs at least
/// once.
pub async fn with_attempts<T, E, F, Fut>(
    max_attempts: u32,
    delay: Duration,
    mut op: F,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_attempts => {
                warn!("Attempt {attempt}/{max_attempts} failed, giving up: {e}");
                return Err(e);
            }
            Err(e) => {
                warn!(
                    "Attempt {attempt}/{max_attempts} failed, retrying in {:?}: {e}",
                    delay
                );
            }
        }

        sleep(delay).await;
        attempt += 1;
    }
}
