//! Time-based identifiers for fallback records and notification subscribers.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Hands out millisecond timestamps, bumped past the previous value when two
/// requests land in the same millisecond.
///
/// Unique within one generator only; two processes (or two generators) can
/// produce the same token.
#[derive(Debug, Default)]
pub struct TimeTokens {
    last: AtomicU64,
}

impl TimeTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next token, strictly greater than every token issued before it.
    pub fn next(&self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_strictly_increase() {
        let tokens = TimeTokens::new();
        let issued: Vec<u64> = (0..1000).map(|_| tokens.next()).collect();
        assert!(issued.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_tokens_track_wall_clock() {
        let before = Utc::now().timestamp_millis() as u64;
        let token = TimeTokens::new().next();
        assert!(token >= before);
    }
}
