//! Exponential backoff with optional jitter.

use rand::Rng;
use std::time::Duration;

/// Calculate the exponential backoff delay for the `attempt`-th retry
/// (1-based): `base_ms * 2^(attempt - 1)`, capped at `max_ms`, plus up to
/// `jitter_ratio` of the delay at random.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64, jitter_ratio: f64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    let jitter_range = (capped_delay as f64 * jitter_ratio.clamp(0.0, 1.0)) as u64;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(calculate_backoff(1, 1000, 30_000, 0.0), Duration::from_secs(1));
        assert_eq!(calculate_backoff(2, 1000, 30_000, 0.0), Duration::from_secs(2));
        assert_eq!(calculate_backoff(3, 1000, 30_000, 0.0), Duration::from_secs(4));
    }

    #[test]
    fn test_backoff_cap_and_zero() {
        assert_eq!(calculate_backoff(0, 1000, 30_000, 0.0), Duration::ZERO);
        assert_eq!(calculate_backoff(10, 100, 1000, 0.0), Duration::from_millis(1000));
        assert_eq!(calculate_backoff(64, 100, 1000, 0.0), Duration::from_millis(1000));
    }

    #[test]
    fn test_jitter_bounds() {
        for _ in 0..50 {
            let d = calculate_backoff(2, 1000, 30_000, 0.1);
            assert!(d >= Duration::from_millis(2000));
            assert!(d < Duration::from_millis(2200));
        }
    }
}
