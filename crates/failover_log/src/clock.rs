//! Wall-clock time for log timestamps.
//!
//! [`FileSink`](crate::FileSink) stamps every line with the time reported by a
//! [`Clock`]. [`SystemClock`] reads the local wall clock; `MockClock` (behind
//! the `test-utils` feature) is set by hand for deterministic output.

use chrono::{Local, NaiveDateTime};

// ─────────────────────────────────────────────────────────────────────────────
// Clock Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for providing the current local time.
///
/// ```
/// use chrono::NaiveDate;
/// use failover_log::Clock;
///
/// /// A clock stuck at midnight.
/// struct Midnight;
///
/// impl Clock for Midnight {
///     fn now(&self) -> chrono::NaiveDateTime {
///         NaiveDate::from_ymd_opt(2025, 1, 1)
///             .and_then(|d| d.and_hms_opt(0, 0, 0))
///             .unwrap_or_default()
///     }
/// }
/// ```
pub trait Clock: Send + Sync + 'static {
    /// Returns the current local date and time.
    fn now(&self) -> NaiveDateTime;
}

/// Local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Formats a timestamp the way log lines carry it.
#[must_use]
pub fn format_timestamp(time: NaiveDateTime) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// MockClock for Testing
// ─────────────────────────────────────────────────────────────────────────────

/// Clock with controllable time.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockClock {
    current: parking_lot::RwLock<NaiveDateTime>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockClock {
    /// Creates a mock clock set to `start`.
    #[must_use]
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            current: parking_lot::RwLock::new(start),
        }
    }

    /// Advances the clock.
    pub fn advance(&self, delta: chrono::TimeDelta) {
        let mut current = self.current.write();
        *current += delta;
    }

    /// Sets the clock.
    pub fn set(&self, time: NaiveDateTime) {
        *self.current.write() = time;
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Clock for MockClock {
    fn now(&self) -> NaiveDateTime {
        *self.current.read()
    }
}
