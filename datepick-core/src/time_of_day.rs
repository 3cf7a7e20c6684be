//! Wall-clock time of day, exchanged as `"HH:MM"` strings.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{DatePickError, DatePickResult};

/// Hour and minute composited onto selected dates when time selection is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { hour: 0, minute: 0 };

    pub fn new(hour: u8, minute: u8) -> DatePickResult<Self> {
        if hour > 23 || minute > 59 {
            return Err(DatePickError::InvalidTime(format!("{hour}:{minute}")));
        }
        Ok(TimeOfDay { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Read the hour and minute of a timestamp, dropping seconds.
    pub fn of(datetime: &NaiveDateTime) -> Self {
        TimeOfDay {
            hour: datetime.hour() as u8,
            minute: datetime.minute() as u8,
        }
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour.into(), self.minute.into(), 0).unwrap_or(NaiveTime::MIN)
    }

    /// Place this time onto the calendar day of `date`.
    pub fn on(self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.to_naive_time())
    }
}

impl FromStr for TimeOfDay {
    type Err = DatePickError;

    fn from_str(s: &str) -> DatePickResult<Self> {
        let invalid = || DatePickError::InvalidTime(s.to_string());

        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(invalid());
        }
        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;

        TimeOfDay::new(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = DatePickError;

    fn try_from(value: String) -> DatePickResult<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let time: TimeOfDay = "14:30".parse().unwrap();
        assert_eq!(time.hour(), 14);
        assert_eq!(time.minute(), 30);
        assert_eq!(time.to_string(), "14:30");

        let early: TimeOfDay = "7:05".parse().unwrap();
        assert_eq!(early.to_string(), "07:05");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "1430", "24:00", "12:60", "ab:cd", "12:5", "123:00"] {
            assert!(bad.parse::<TimeOfDay>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_on_composites_onto_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let time = TimeOfDay::new(9, 45).unwrap();
        let at = time.on(day);

        assert_eq!(at.date(), day);
        assert_eq!(TimeOfDay::of(&at), time);
    }

    #[test]
    fn test_serde_uses_string_form() {
        let time = TimeOfDay::new(8, 0).unwrap();
        let json = serde_json::to_string(&time).unwrap();
        assert_eq!(json, "\"08:00\"");
        let back: TimeOfDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, time);
    }
}
