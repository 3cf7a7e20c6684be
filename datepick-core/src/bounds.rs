//! Inclusive day-granularity date bounds.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Inclusive `[min, max]` bounds. `None` means unbounded in that direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Option<NaiveDate>,
    pub max: Option<NaiveDate>,
}

impl Bounds {
    /// Build bounds, swapping an inverted pair.
    pub fn new(min: Option<NaiveDate>, max: Option<NaiveDate>) -> Self {
        match (min, max) {
            (Some(lo), Some(hi)) if lo > hi => {
                warn!("min date {lo} is after max date {hi}; swapping");
                Bounds {
                    min: Some(hi),
                    max: Some(lo),
                }
            }
            _ => Bounds { min, max },
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.min.is_none_or(|min| day >= min) && self.max.is_none_or(|max| day <= max)
    }

    /// Move `day` onto the nearest bound when it falls outside.
    pub fn clamp(&self, day: NaiveDate) -> NaiveDate {
        let day = match self.min {
            Some(min) if day < min => min,
            _ => day,
        };
        match self.max {
            Some(max) if day > max => max,
            _ => day,
        }
    }

    /// Whether any day of the given month lies within bounds.
    pub fn overlaps_month(&self, year: i32, month: u32) -> bool {
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return false;
        };
        let last = crate::navigation::end_of_month(first);
        self.min.is_none_or(|min| last >= min) && self.max.is_none_or(|max| first <= max)
    }

    pub fn min_year(&self) -> Option<i32> {
        self.min.map(|d| d.year())
    }

    pub fn max_year(&self) -> Option<i32> {
        self.max.map(|d| d.year())
    }
}
