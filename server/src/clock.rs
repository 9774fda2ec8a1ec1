//! Wall-clock access for token classification.
//!
//! Handlers never call `Utc::now()` directly; they go through a [`Clock`]
//! held in application state so tests can pin "now" to a fixed instant.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClockError {
    #[error("system clock reads before the UNIX epoch")]
    BeforeEpoch,

    #[error("system clock reading is out of range")]
    OutOfRange,
}

pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Result<DateTime<Utc>, ClockError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<DateTime<Utc>, ClockError> {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| ClockError::BeforeEpoch)?;
        let secs = i64::try_from(since_epoch.as_secs()).map_err(|_| ClockError::OutOfRange)?;

        DateTime::from_timestamp(secs, since_epoch.subsec_nanos()).ok_or(ClockError::OutOfRange)
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> Result<DateTime<Utc>, ClockError> {
        Ok(self.0)
    }
}

/// The venue's local wall-clock, which is what booked slot times refer to.
#[derive(Debug, Clone, Copy)]
pub struct VenueTime {
    offset: FixedOffset,
}

impl VenueTime {
    /// Returns `None` when the offset is not strictly within ±24h.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(|offset| Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.offset).naive_local()
    }

    pub fn now(&self, clock: &dyn Clock) -> Result<NaiveDateTime, ClockError> {
        clock.now().map(|instant| self.local(instant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn test_system_clock_is_after_epoch() {
        let now = SystemClock.now().unwrap();
        assert!(now.timestamp() > 0);
    }

    #[test]
    fn test_fixed_clock_never_advances() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 1, 3, 0, 0).unwrap();
        let clock = FixedClock(instant);
        assert_eq!(clock.now().unwrap(), instant);
        assert_eq!(clock.now().unwrap(), instant);
    }

    #[test]
    fn test_venue_time_applies_offset() {
        let ist = VenueTime::from_offset_minutes(330).unwrap();
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 3, 0, 0).unwrap());
        let expected = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(ist.now(&clock).unwrap(), expected);
    }

    #[test]
    fn test_venue_time_rejects_out_of_range_offset() {
        assert!(VenueTime::from_offset_minutes(24 * 60).is_none());
        assert!(VenueTime::from_offset_minutes(-24 * 60).is_none());
        assert!(VenueTime::from_offset_minutes(i32::MAX).is_none());
        assert!(VenueTime::from_offset_minutes(0).is_some());
    }
}
