//! Identifiers for documents sent to the embedding endpoint.
//!
//! Ids keep the familiar shape of a millisecond Unix timestamp rendered as a string, but are issued
//! monotonically: when two requests land in the same millisecond the second one gets the next
//! integer instead of a duplicate.
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
pub struct DocumentIds {
    last: AtomicU64,
    clock: fn() -> i64,
}

fn wall_clock_millis() -> i64 {
    Utc::now().timestamp_millis()
}

impl Default for DocumentIds {
    fn default() -> Self {
        Self::with_clock(wall_clock_millis)
    }
}

impl DocumentIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom millisecond clock (fixed clocks make ids predictable in tests).
    pub fn with_clock(clock: fn() -> i64) -> Self {
        Self {
            last: AtomicU64::new(0),
            clock,
        }
    }

    pub fn next_id(&self) -> String {
        let now = u64::try_from((self.clock)()).unwrap_or(0);
        let (Ok(previous) | Err(previous)) =
            self.last
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                    Some(now.max(last + 1))
                });
        now.max(previous + 1).to_string()
    }
}
