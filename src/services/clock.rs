//! Time source for date-dependent rules
//!
//! Goal deadlines are checked against "today"; injecting the clock keeps
//! those checks deterministic in tests.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Access to the current time
pub trait Clock: Send + Sync {
    /// The current UTC timestamp
    fn now(&self) -> DateTime<Utc>;

    /// The current UTC date
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Real-time clock backed by the system UTC time source
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given date (midnight UTC)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.today.and_time(NaiveTime::MIN).and_utc()
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}
