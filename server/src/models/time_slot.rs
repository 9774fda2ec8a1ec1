use std::fmt;

use chrono::NaiveTime;
use thiserror::Error;

const SEPARATOR: &str = " - ";
const CLOCK_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeSlotError {
    #[error("time slot '{0}' is missing the ' - ' separator")]
    MissingSeparator(String),

    #[error("'{0}' is not a valid HH:MM clock time")]
    InvalidTime(String),

    #[error("time slot must end after it starts")]
    EmptyInterval,
}

/// A half-open `[start, end)` window within a single day, written as
/// `"HH:MM - HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn parse(raw: &str) -> Result<Self, TimeSlotError> {
        let (start, end) = split(raw)?;
        let start = parse_clock(start)?;
        let end = parse_clock(end)?;

        if start >= end {
            return Err(TimeSlotError::EmptyInterval);
        }

        Ok(Self { start, end })
    }

    /// Parses only the closing clock time, leniently: the second `" - "`
    /// field, of which only the hour and minute fields are read. Stored
    /// tokens like `"08:00 - 09:00 - 10:00"` or `"08:00 - 09:00:30"` still
    /// end at 09:00.
    pub fn parse_end(raw: &str) -> Result<NaiveTime, TimeSlotError> {
        let end = raw
            .split(SEPARATOR)
            .nth(1)
            .ok_or_else(|| TimeSlotError::MissingSeparator(raw.to_string()))?
            .trim();

        let mut fields = end.split(':').map(|f| f.trim().parse::<u32>());
        match (fields.next(), fields.next()) {
            (Some(Ok(hour)), Some(Ok(minute))) => NaiveTime::from_hms_opt(hour, minute, 0)
                .ok_or_else(|| TimeSlotError::InvalidTime(end.to_string())),
            _ => Err(TimeSlotError::InvalidTime(end.to_string())),
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.start.format(CLOCK_FORMAT),
            SEPARATOR,
            self.end.format(CLOCK_FORMAT)
        )
    }
}

fn split(raw: &str) -> Result<(&str, &str), TimeSlotError> {
    raw.split_once(SEPARATOR)
        .ok_or_else(|| TimeSlotError::MissingSeparator(raw.to_string()))
}

fn parse_clock(component: &str) -> Result<NaiveTime, TimeSlotError> {
    let trimmed = component.trim();
    NaiveTime::parse_from_str(trimmed, CLOCK_FORMAT)
        .map_err(|_| TimeSlotError::InvalidTime(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_canonical_slot() {
        let slot = TimeSlot::parse("08:00 - 09:30").unwrap();
        assert_eq!(slot.start, hm(8, 0));
        assert_eq!(slot.end, hm(9, 30));
        assert_eq!(slot.to_string(), "08:00 - 09:30");
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        assert_eq!(
            TimeSlot::parse("garbage"),
            Err(TimeSlotError::MissingSeparator("garbage".to_string()))
        );
        assert!(TimeSlot::parse_end("08:00-09:00").is_err());
    }

    #[test]
    fn test_parse_rejects_non_numeric_components() {
        assert_eq!(
            TimeSlot::parse("08:00 - nine"),
            Err(TimeSlotError::InvalidTime("nine".to_string()))
        );
        assert!(TimeSlot::parse("25:00 - 26:00").is_err());
    }

    #[test]
    fn test_parse_rejects_inverted_or_empty_interval() {
        assert_eq!(
            TimeSlot::parse("10:00 - 09:00"),
            Err(TimeSlotError::EmptyInterval)
        );
        assert_eq!(
            TimeSlot::parse("10:00 - 10:00"),
            Err(TimeSlotError::EmptyInterval)
        );
    }

    #[test]
    fn test_parse_end_ignores_start_component() {
        assert_eq!(TimeSlot::parse_end("?? - 17:45").unwrap(), hm(17, 45));
        assert!(TimeSlot::parse_end("08:00 - ").is_err());
    }

    #[test]
    fn test_parse_end_reads_second_field_hour_and_minute_only() {
        assert_eq!(
            TimeSlot::parse_end("08:00 - 09:00 - 10:00").unwrap(),
            hm(9, 0)
        );
        assert_eq!(TimeSlot::parse_end("08:00 - 09:00:30").unwrap(), hm(9, 0));
        assert_eq!(TimeSlot::parse_end("8:00 - 9:5").unwrap(), hm(9, 5));
        assert!(TimeSlot::parse_end("08:00 - 9").is_err());
        assert!(TimeSlot::parse_end("08:00 - 24:00").is_err());
    }

    #[test]
    fn test_parse_stays_strict_for_bookings() {
        assert!(TimeSlot::parse("08:00 - 09:00 - 10:00").is_err());
        assert!(TimeSlot::parse("08:00 - 09:00:30").is_err());
    }
}
