//! Retry with exponential backoff and jitter for transient backend errors.
//!
//! Only rate limiting and transport failures are retried; a 404, a
//! rejection or a malformed body comes back the same way every time.
//! Requests that change state on the backend are replayed only when the
//! first attempt cannot have reached it.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Upper bound on any single backoff sleep.
const MAX_DELAY_MS: u64 = 60_000;

/// Whether a request may safely be sent more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Replay {
    /// Reads, and writes that overwrite the same state.
    Idempotent,
    /// Creates and votes: a duplicate would be a second record or vote.
    NonIdempotent,
}

/// Returns `true` for errors worth retrying under `replay`.
///
/// A 429 means the backend refused the request, so it is always safe to
/// resend. A timeout or a 5xx may follow a committed write, so those are
/// retried for idempotent requests only; a connect failure never reached
/// the backend at all.
pub(crate) fn is_retriable(err: &ClientError, replay: Replay) -> bool {
    match err {
        ClientError::RateLimited { .. } => true,
        ClientError::Http(e) => match replay {
            Replay::Idempotent => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().is_some_and(|s| s.is_server_error())
            }
            Replay::NonIdempotent => e.is_connect(),
        },
        _ => false,
    }
}

/// Sleep before retry number `attempt` (1-based): `backoff_base_ms *
/// 2^(attempt-1)` capped at 60 s, then +-25 % jitter. A rate-limited
/// response waits at least its `Retry-After`, under the same cap.
pub(crate) fn backoff_delay_ms(err: &ClientError, attempt: u32, backoff_base_ms: u64) -> u64 {
    let computed = backoff_base_ms.saturating_mul(1u64 << attempt.saturating_sub(1).min(10));
    let capped = computed.min(MAX_DELAY_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;

    match err {
        ClientError::RateLimited { retry_after_secs } => jittered
            .max(retry_after_secs.saturating_mul(1_000))
            .min(MAX_DELAY_MS),
        _ => jittered,
    }
}

/// Executes `operation`, retrying transient failures up to `max_retries`
/// additional times. Non-retriable errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    replay: Replay,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err, replay) || attempt >= max_retries {
            return Err(err);
        }

        attempt += 1;
        let delay_ms = backoff_delay_ms(&err, attempt, backoff_base_ms);
        tracing::warn!(
            attempt,
            max_retries,
            delay_ms,
            ?replay,
            error = %err,
            "transient backend error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}
