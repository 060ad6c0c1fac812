//! Re-submission of unprocessed batch items with exponential back-off and jitter.
//!
//! Only items the store reported as unprocessed are retried. A failing write
//! call is an invocation-level error and is returned immediately.

use std::time::Duration;

use shelfsync_core::CanonicalProduct;
use shelfsync_db::{DbError, ProductStore, UnprocessedItem};

const MAX_DELAY_MS: u64 = 30_000;

/// Delay before retry `attempt` (1-based): `base × 2^(attempt-1)`, capped,
/// then scaled by a random factor in `[0.75, 1.25)`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub(crate) fn backoff_delay_ms(backoff_base_ms: u64, attempt: u32) -> u64 {
    let computed = backoff_base_ms.saturating_mul(1u64 << attempt.saturating_sub(1).min(10));
    let capped = computed.min(MAX_DELAY_MS);
    (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64
}

/// Writes `items` and re-submits whatever comes back unprocessed, up to
/// `max_retries` more times.
///
/// Returns the dead-letter items: those still unprocessed once the retry
/// budget is spent.
///
/// # Errors
///
/// Returns [`DbError`] if any write call itself fails.
pub(crate) async fn write_with_retry(
    store: &dyn ProductStore,
    items: Vec<CanonicalProduct>,
    max_retries: u32,
    backoff_base_ms: u64,
) -> Result<Vec<UnprocessedItem>, DbError> {
    let mut pending = items;
    let mut attempt = 0u32;
    loop {
        let outcome = store.batch_write(pending).await?;
        if outcome.is_complete() {
            return Ok(Vec::new());
        }
        if attempt >= max_retries {
            tracing::warn!(
                attempts = attempt + 1,
                dead_letter = outcome.unprocessed.len(),
                "retry budget spent; items left unprocessed"
            );
            return Ok(outcome.unprocessed);
        }

        attempt += 1;
        let delay_ms = backoff_delay_ms(backoff_base_ms, attempt);
        tracing::warn!(
            attempt,
            max_retries,
            delay_ms,
            unprocessed = outcome.unprocessed.len(),
            "batch write partially applied; retrying after back-off"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        pending = outcome.unprocessed.into_iter().map(|u| u.product).collect();
    }
}
