use chrono::{DateTime, NaiveDate, Utc};
use std::sync::RwLock;

/// Time source injected into the application services. Domain methods take
/// plain `now`/`today` values so entity behavior stays deterministic; this
/// trait is where those values come from.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now_utc().date_naive()
    }
}

/// Wall clock used by the running application.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Pinned clock for tests. `set` and `advance` move it explicitly.
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn advance(&self, delta: chrono::TimeDelta) {
        let mut now = self.now.write().unwrap_or_else(|e| e.into_inner());
        *now += delta;
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}
