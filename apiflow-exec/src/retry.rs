use std::time::Duration;

/// Delay before a released job becomes available again.
///
/// Exponential in the attempt number (`base * 2^(attempt-1)`, capped at `max`) with full jitter.
/// `attempt` is 1-based.
pub fn backoff_delay(base: Duration, max: Duration, attempt: u32, rand_u64: impl Fn() -> u64) -> Duration {
    let exp = attempt.saturating_sub(1).min(30) as i32;
    let raw = (base.as_millis() as f64) * 2f64.powi(exp);
    let raw_ms = raw.min(max.as_millis() as f64).max(0.0) as u64;

    let jitter_ms = if raw_ms == 0 { 0 } else { rand_u64() % (raw_ms + 1) };
    Duration::from_millis(jitter_ms)
}
