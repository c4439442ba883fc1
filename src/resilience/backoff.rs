//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Delay before retry number `attempt` (1-based).
///
/// Doubles from `base` per attempt, capped at `max`, plus up to 10% jitter.
/// Attempt 0 never waits.
pub fn calculate_backoff(attempt: u32, base: Duration, max: Duration) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let base_ms = base.as_millis() as u64;
    let max_ms = max.as_millis() as u64;

    let factor = 2u64.saturating_pow(attempt - 1);
    let capped_ms = base_ms.saturating_mul(factor).min(max_ms);

    let jitter_range = capped_ms / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_ms + jitter)
}
