//! Clock injection for the engines.
//!
//! Post ordering depends on `date_posted`, so tests drive a mock clock instead
//! of racing the wall clock.

use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use chrono::{DateTime, Duration, TimeZone, Utc};

/// Trait for providing the current time to the engines.
pub trait TimeProvider: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// System time provider that uses the actual system clock.
#[derive(Clone, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Mock time provider for testing that allows manual time control.
///
/// Millisecond resolution matches the resolution of the stored index scores.
#[derive(Clone)]
pub struct MockTimeProvider {
    current_millis: Arc<AtomicI64>,
}

impl MockTimeProvider {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current_millis: Arc::new(AtomicI64::new(start.timestamp_millis())),
        }
    }

    pub fn advance(&self, duration: Duration) {
        self.current_millis
            .fetch_add(duration.num_milliseconds(), Ordering::SeqCst);
    }

    pub fn set_time(&self, time: DateTime<Utc>) {
        self.current_millis.store(time.timestamp_millis(), Ordering::SeqCst);
    }
}

impl Default for MockTimeProvider {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl TimeProvider for MockTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        let millis = self.current_millis.load(Ordering::SeqCst);
        Utc.timestamp_millis_opt(millis).single().unwrap_or_default()
    }
}

/// Human readable age of a timestamp, in the style of "5 minutes ago".
pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    if elapsed < Duration::zero() {
        return "in the future".to_string();
    }

    let seconds = elapsed.num_seconds();
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if seconds < 45 {
        "a few seconds ago".to_string()
    } else if seconds < 90 {
        "a minute ago".to_string()
    } else if minutes < 45 {
        format!("{} minutes ago", minutes.max(2))
    } else if minutes < 90 {
        "an hour ago".to_string()
    } else if hours < 22 {
        format!("{} hours ago", hours.max(2))
    } else if hours < 36 {
        "a day ago".to_string()
    } else if days < 26 {
        format!("{days} days ago")
    } else if days < 45 {
        "a month ago".to_string()
    } else if days < 320 {
        format!("{} months ago", (days / 30).max(2))
    } else if days < 548 {
        "a year ago".to_string()
    } else {
        format!("{} years ago", (days / 365).max(2))
    }
}
