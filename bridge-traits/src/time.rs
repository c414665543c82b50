//! Time Abstraction
//!
//! Injectable time source so job runs can take a single `now` snapshot and
//! tests can pin the clock.

use chrono::{DateTime, Utc};

/// Time source trait
///
/// A job run reads the clock exactly once and threads that snapshot through
/// every window comparison, keeping the rolling window consistent across the
/// whole scan.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::time::Clock;
///
/// fn snapshot(clock: &dyn Clock) -> chrono::DateTime<chrono::Utc> {
///     clock.now()
/// }
/// ```
pub trait Clock: Send + Sync {
    /// Get current UTC time
    fn now(&self) -> DateTime<Utc>;
}

/// System clock implementation using actual system time
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
