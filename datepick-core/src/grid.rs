//! Month grid generation.
//!
//! Every month renders as 6 weeks of 7 days starting on the configured
//! week-start day. Leading and trailing days from adjacent months fill the
//! grid and are flagged as outside the current month.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;
use tracing::trace;

use crate::bounds::Bounds;
use crate::callback::CallbackWith;
use crate::constants::{DAYS_PER_WEEK, GRID_WEEKS};
use crate::locale::PickerLocale;
use crate::navigation::start_of_month;

/// Returns true for days that must not be selected.
pub type UnavailablePredicate = CallbackWith<NaiveDate, bool>;

/// One cell of the month grid. Derived; recomputed rather than mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// Day of month, e.g. `"7"`.
    pub label: String,
    pub is_today: bool,
    pub is_current_month: bool,
    pub is_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub weeks: Vec<Vec<CalendarDay>>,
    pub weekday_labels: Vec<String>,
}

impl MonthGrid {
    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.weeks.iter().flatten()
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.days().next().map(|d| d.date)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.days().last().map(|d| d.date)
    }

    pub fn find(&self, date: NaiveDate) -> Option<&CalendarDay> {
        self.days().find(|d| d.date == date)
    }
}

/// Inputs to [`generate_month`] other than the view month itself.
pub struct GridOptions<'a> {
    pub locale: &'a PickerLocale,
    pub week_starts_on: Weekday,
    pub bounds: Bounds,
    pub is_unavailable: Option<&'a UnavailablePredicate>,
    pub today: NaiveDate,
}

impl GridOptions<'_> {
    fn is_disabled(&self, date: NaiveDate) -> bool {
        !self.bounds.contains(date) || self.is_unavailable.is_some_and(|p| p.call(date))
    }
}

/// First cell of the grid for the month containing `view_date`.
pub fn grid_start(view_date: NaiveDate, week_starts_on: Weekday) -> NaiveDate {
    let first = start_of_month(view_date);
    let weekday = first.weekday().num_days_from_sunday();
    let offset = (weekday + 7 - week_starts_on.num_days_from_sunday()) % 7;
    first - Duration::days(offset.into())
}

pub fn generate_month(view_date: NaiveDate, options: &GridOptions<'_>) -> MonthGrid {
    let month_start = start_of_month(view_date);
    let mut cursor = grid_start(view_date, options.week_starts_on);
    trace!(month = %month_start, start = %cursor, "generating month grid");

    let mut weeks = Vec::with_capacity(GRID_WEEKS);
    for _ in 0..GRID_WEEKS {
        let mut week = Vec::with_capacity(DAYS_PER_WEEK);
        for _ in 0..DAYS_PER_WEEK {
            week.push(CalendarDay {
                date: cursor,
                label: cursor.day().to_string(),
                is_today: cursor == options.today,
                is_current_month: cursor.month() == month_start.month()
                    && cursor.year() == month_start.year(),
                is_disabled: options.is_disabled(cursor),
            });
            cursor += Duration::days(1);
        }
        weeks.push(week);
    }

    let mut weekday = options.week_starts_on;
    let weekday_labels = (0..DAYS_PER_WEEK)
        .map(|_| {
            let label = options.locale.weekday_short(weekday);
            weekday = weekday.succ();
            label
        })
        .collect();

    MonthGrid {
        weeks,
        weekday_labels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn options(locale: &PickerLocale, week_starts_on: Weekday) -> GridOptions<'_> {
        GridOptions {
            locale,
            week_starts_on,
            bounds: Bounds::default(),
            is_unavailable: None,
            today: d(2024, 3, 15),
        }
    }

    #[test]
    fn test_march_2024_sunday_start() {
        let locale = PickerLocale::default();
        let grid = generate_month(d(2024, 3, 20), &options(&locale, Weekday::Sun));

        // March 1st 2024 was a Friday.
        assert_eq!(grid.first_day(), Some(d(2024, 2, 25)));
        assert_eq!(grid.last_day(), Some(d(2024, 4, 6)));
        assert_eq!(grid.weekday_labels, ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]);

        let first = grid.find(d(2024, 3, 1)).unwrap();
        assert!(first.is_current_month);
        assert_eq!(first.label, "1");
        assert!(!grid.find(d(2024, 2, 29)).unwrap().is_current_month);
        assert!(grid.find(d(2024, 3, 15)).unwrap().is_today);
        assert_eq!(grid.days().filter(|d| d.is_today).count(), 1);
    }

    #[test]
    fn test_monday_start_labels_and_offset() {
        let locale = PickerLocale::default();
        let grid = generate_month(d(2024, 9, 1), &options(&locale, Weekday::Mon));

        // September 1st 2024 was a Sunday, so six leading August days.
        assert_eq!(grid.first_day(), Some(d(2024, 8, 26)));
        assert_eq!(grid.weekday_labels[0], "Mon");
        assert_eq!(grid.weekday_labels[6], "Sun");
    }

    #[test]
    fn test_month_starting_on_week_start_has_no_leading_days() {
        let locale = PickerLocale::default();
        // September 1st 2024 was a Sunday.
        let grid = generate_month(d(2024, 9, 15), &options(&locale, Weekday::Sun));
        assert_eq!(grid.first_day(), Some(d(2024, 9, 1)));
    }

    #[test]
    fn test_bounds_and_availability_disable_days() {
        let locale = PickerLocale::default();
        let weekends = UnavailablePredicate::new(|date: NaiveDate| {
            matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
        });
        let opts = GridOptions {
            bounds: Bounds::new(Some(d(2024, 3, 5)), Some(d(2024, 3, 25))),
            is_unavailable: Some(&weekends),
            ..options(&locale, Weekday::Sun)
        };
        let grid = generate_month(d(2024, 3, 1), &opts);

        assert!(grid.find(d(2024, 3, 4)).unwrap().is_disabled);
        assert!(!grid.find(d(2024, 3, 5)).unwrap().is_disabled);
        assert!(!grid.find(d(2024, 3, 25)).unwrap().is_disabled);
        assert!(grid.find(d(2024, 3, 26)).unwrap().is_disabled);
        // 2024-03-09 was a Saturday.
        assert!(grid.find(d(2024, 3, 9)).unwrap().is_disabled);
    }

    proptest! {
        #[test]
        fn grid_is_six_contiguous_weeks(
            year in 1900i32..2200,
            month in 1u32..=12,
            day in 1u32..=28,
            week_start in 0u8..7,
        ) {
            let locale = PickerLocale::default();
            let week_starts_on = crate::navigation::weekday_from_offset(week_start);
            let view = d(year, month, day);
            let grid = generate_month(view, &options(&locale, week_starts_on));

            prop_assert_eq!(grid.weeks.len(), GRID_WEEKS);
            prop_assert!(grid.weeks.iter().all(|w| w.len() == DAYS_PER_WEEK));

            let dates: Vec<_> = grid.days().map(|c| c.date).collect();
            prop_assert_eq!(dates.len(), 42);
            prop_assert_eq!(dates.iter().collect::<HashSet<_>>().len(), 42);
            for pair in dates.windows(2) {
                prop_assert_eq!(pair[1] - pair[0], Duration::days(1));
            }
            prop_assert_eq!(dates[0].weekday(), week_starts_on);

            let in_month = grid.days().filter(|c| c.is_current_month).count();
            prop_assert_eq!(in_month as u32, crate::navigation::end_of_month(view).day());
        }
    }
}
