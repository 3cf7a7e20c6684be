//! Selection data model and its pure transitions.
//!
//! Dates are wall-clock [`NaiveDateTime`]s. The time of day is only
//! meaningful when time selection is enabled; otherwise every committed
//! date sits at midnight. All comparisons here are day-granularity.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bounds::Bounds;
use crate::grid::UnavailablePredicate;
use crate::time_of_day::TimeOfDay;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    #[default]
    Single,
    Range,
}

/// A possibly incomplete range. `start` without `end` means a range is mid-selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        DateRange {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn starting(start: NaiveDateTime) -> Self {
        DateRange {
            start: Some(start),
            end: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Only `start` is set.
    pub fn is_open(&self) -> bool {
        self.start.is_some() && self.end.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    Empty,
    Single(NaiveDateTime),
    Range(DateRange),
}

impl Selection {
    /// The cleared value for a mode.
    pub fn empty_for(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Single => Selection::Empty,
            SelectionMode::Range => Selection::Range(DateRange::default()),
        }
    }

    pub fn has_value(&self) -> bool {
        match self {
            Selection::Empty => false,
            Selection::Single(_) => true,
            Selection::Range(range) => !range.is_empty(),
        }
    }

    pub fn range(&self) -> Option<&DateRange> {
        match self {
            Selection::Range(range) => Some(range),
            _ => None,
        }
    }

    /// Day used to decide which month is visible: a range's `end` if
    /// present, else its `start`, else the single date.
    pub fn anchor(&self) -> Option<NaiveDate> {
        match self {
            Selection::Empty => None,
            Selection::Single(date) => Some(date.date()),
            Selection::Range(range) => range.end.or(range.start).map(|d| d.date()),
        }
    }

    pub fn is_selected(&self, day: NaiveDate) -> bool {
        match self {
            Selection::Empty => false,
            Selection::Single(date) => date.date() == day,
            Selection::Range(range) => [range.start, range.end]
                .into_iter()
                .flatten()
                .any(|d| d.date() == day),
        }
    }

    /// Inclusive containment; false unless a range is complete.
    pub fn is_in_range(&self, day: NaiveDate) -> bool {
        match self {
            Selection::Range(DateRange {
                start: Some(start),
                end: Some(end),
            }) => start.date() <= day && day <= end.date(),
            _ => false,
        }
    }

    /// Rewrite the hour and minute of every date present.
    pub fn with_time(&self, time: TimeOfDay) -> Selection {
        let retime = |d: NaiveDateTime| time.on(d.date());
        match *self {
            Selection::Empty => Selection::Empty,
            Selection::Single(date) => Selection::Single(retime(date)),
            Selection::Range(range) => Selection::Range(DateRange {
                start: range.start.map(retime),
                end: range.end.map(retime),
            }),
        }
    }
}

/// Rules applied by [`select_day`].
pub struct SelectionPolicy<'a> {
    pub mode: SelectionMode,
    pub bounds: Bounds,
    pub allow_same_day: bool,
    /// Time composited onto picked days; `None` leaves them at midnight.
    pub time: Option<TimeOfDay>,
    pub is_unavailable: Option<&'a UnavailablePredicate>,
}

impl SelectionPolicy<'_> {
    fn compose(&self, day: NaiveDate) -> NaiveDateTime {
        self.time.unwrap_or(TimeOfDay::MIDNIGHT).on(day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selected {
    pub selection: Selection,
    /// A single date was picked or a range was closed; `close_on_select` applies.
    pub complete: bool,
}

/// Apply a day pick to the current selection.
///
/// `day` is clamped into bounds first. Returns `None` when the clamped day
/// is unavailable, in which case nothing changes.
pub fn select_day(current: &Selection, day: NaiveDate, policy: &SelectionPolicy<'_>) -> Option<Selected> {
    let day = policy.bounds.clamp(day);
    if policy.is_unavailable.is_some_and(|p| p.call(day)) {
        warn!(%day, "ignoring selection of unavailable day");
        return None;
    }

    let picked = policy.compose(day);
    let selected = match policy.mode {
        SelectionMode::Single => Selected {
            selection: Selection::Single(picked),
            complete: true,
        },
        SelectionMode::Range => match current {
            Selection::Range(DateRange {
                start: Some(start),
                end: None,
            }) => {
                if start.date() == day && !policy.allow_same_day {
                    debug!(%day, "same-day range not allowed; restarting range");
                    Selected {
                        selection: Selection::Range(DateRange::starting(picked)),
                        complete: false,
                    }
                } else {
                    let (start, end) = if day < start.date() {
                        (picked, *start)
                    } else {
                        (*start, picked)
                    };
                    Selected {
                        selection: Selection::Range(DateRange::new(start, end)),
                        complete: true,
                    }
                }
            }
            _ => Selected {
                selection: Selection::Range(DateRange::starting(picked)),
                complete: false,
            },
        },
    };
    Some(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn midnight(date: NaiveDate) -> NaiveDateTime {
        TimeOfDay::MIDNIGHT.on(date)
    }

    fn policy(mode: SelectionMode) -> SelectionPolicy<'static> {
        SelectionPolicy {
            mode,
            bounds: Bounds::default(),
            allow_same_day: true,
            time: None,
            is_unavailable: None,
        }
    }

    fn pick(current: &Selection, day: NaiveDate, policy: &SelectionPolicy<'_>) -> Selected {
        select_day(current, day, policy).expect("day should be selectable")
    }

    #[test]
    fn test_single_pick_is_complete_at_midnight() {
        let selected = pick(&Selection::Empty, d(2024, 3, 15), &policy(SelectionMode::Single));
        assert_eq!(selected.selection, Selection::Single(midnight(d(2024, 3, 15))));
        assert!(selected.complete);
    }

    #[test]
    fn test_range_state_machine() {
        let p = policy(SelectionMode::Range);
        let empty = Selection::empty_for(SelectionMode::Range);

        let first = pick(&empty, d(2024, 3, 30), &p);
        assert!(!first.complete);
        assert_eq!(first.selection, Selection::Range(DateRange::starting(midnight(d(2024, 3, 30)))));

        let second = pick(&first.selection, d(2024, 4, 2), &p);
        assert!(second.complete);
        assert_eq!(
            second.selection,
            Selection::Range(DateRange::new(midnight(d(2024, 3, 30)), midnight(d(2024, 4, 2))))
        );

        // A third pick starts over.
        let third = pick(&second.selection, d(2024, 5, 1), &p);
        assert_eq!(third.selection, Selection::Range(DateRange::starting(midnight(d(2024, 5, 1)))));
    }

    #[test]
    fn test_reverse_pick_is_reordered() {
        let p = policy(SelectionMode::Range);
        let first = pick(&Selection::Empty, d(2024, 4, 2), &p);
        let second = pick(&first.selection, d(2024, 3, 30), &p);

        let range = second.selection.range().copied().unwrap();
        assert_eq!(range.start, Some(midnight(d(2024, 3, 30))));
        assert_eq!(range.end, Some(midnight(d(2024, 4, 2))));
    }

    #[test]
    fn test_same_day_policy() {
        let allowed = policy(SelectionMode::Range);
        let first = pick(&Selection::Empty, d(2024, 6, 1), &allowed);
        let second = pick(&first.selection, d(2024, 6, 1), &allowed);
        assert!(second.complete);
        assert_eq!(
            second.selection,
            Selection::Range(DateRange::new(midnight(d(2024, 6, 1)), midnight(d(2024, 6, 1))))
        );

        let disallowed = SelectionPolicy {
            allow_same_day: false,
            ..policy(SelectionMode::Range)
        };
        let again = pick(&first.selection, d(2024, 6, 1), &disallowed);
        assert!(!again.complete);
        assert_eq!(again.selection, Selection::Range(DateRange::starting(midnight(d(2024, 6, 1)))));
    }

    #[test]
    fn test_out_of_bounds_pick_is_clamped() {
        let p = SelectionPolicy {
            bounds: Bounds::new(Some(d(2024, 1, 10)), Some(d(2024, 1, 20))),
            ..policy(SelectionMode::Single)
        };
        let before = pick(&Selection::Empty, d(2023, 12, 25), &p);
        assert_eq!(before.selection, Selection::Single(midnight(d(2024, 1, 10))));
        let after = pick(&Selection::Empty, d(2024, 2, 1), &p);
        assert_eq!(after.selection, Selection::Single(midnight(d(2024, 1, 20))));
    }

    #[test]
    fn test_unavailable_pick_is_ignored() {
        let never = UnavailablePredicate::new(|day: NaiveDate| day == NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        let p = SelectionPolicy {
            is_unavailable: Some(&never),
            ..policy(SelectionMode::Single)
        };
        assert!(select_day(&Selection::Empty, d(2024, 3, 15), &p).is_none());
        assert!(select_day(&Selection::Empty, d(2024, 3, 16), &p).is_some());
    }

    #[test]
    fn test_time_is_composited_onto_picks() {
        let time = TimeOfDay::new(9, 15).unwrap();
        let p = SelectionPolicy {
            time: Some(time),
            ..policy(SelectionMode::Range)
        };
        let first = pick(&Selection::Empty, d(2024, 3, 1), &p);
        let second = pick(&first.selection, d(2024, 3, 3), &p);
        let range = second.selection.range().copied().unwrap();
        assert_eq!(range.start, Some(time.on(d(2024, 3, 1))));
        assert_eq!(range.end, Some(time.on(d(2024, 3, 3))));
    }

    #[test]
    fn test_queries() {
        let range = Selection::Range(DateRange::new(midnight(d(2024, 3, 30)), midnight(d(2024, 4, 2))));
        assert!(range.is_in_range(d(2024, 3, 31)));
        assert!(range.is_in_range(d(2024, 3, 30)));
        assert!(range.is_in_range(d(2024, 4, 2)));
        assert!(!range.is_in_range(d(2024, 3, 29)));
        assert!(range.is_selected(d(2024, 4, 2)));
        assert!(!range.is_selected(d(2024, 3, 31)));
        assert_eq!(range.anchor(), Some(d(2024, 4, 2)));

        let open = Selection::Range(DateRange::starting(midnight(d(2024, 3, 30))));
        assert!(!open.is_in_range(d(2024, 3, 30)));
        assert!(open.is_selected(d(2024, 3, 30)));
        assert_eq!(open.anchor(), Some(d(2024, 3, 30)));

        let single = Selection::Single(TimeOfDay::new(23, 59).unwrap().on(d(2024, 1, 1)));
        assert!(single.is_selected(d(2024, 1, 1)));
        assert!(!single.is_in_range(d(2024, 1, 1)));
        assert!(!Selection::Empty.has_value());
        assert!(!Selection::empty_for(SelectionMode::Range).has_value());
    }

    #[test]
    fn test_selection_serializes_with_kind_tag() {
        let selection = Selection::Single(midnight(d(2024, 3, 15)));
        let json = serde_json::to_value(selection).unwrap();
        assert_eq!(json["kind"], "single");
        assert_eq!(json["value"], "2024-03-15T00:00:00");
    }

    fn arb_day() -> impl Strategy<Value = NaiveDate> {
        (0i64..20_000).prop_map(|n| d(1980, 1, 1) + chrono::Duration::days(n))
    }

    proptest! {
        #[test]
        fn range_is_ordered_regardless_of_pick_order(a in arb_day(), b in arb_day()) {
            prop_assume!(a != b);
            let p = policy(SelectionMode::Range);
            let first = pick(&Selection::Empty, a, &p);
            let second = pick(&first.selection, b, &p);
            let range = second.selection.range().copied().unwrap();
            prop_assert!(second.complete);
            prop_assert!(range.start.unwrap() <= range.end.unwrap());
        }

        #[test]
        fn clamping_matches_nearest_bound(day in arb_day(), lo in arb_day(), len in 0i64..400) {
            let hi = lo + chrono::Duration::days(len);
            let p = SelectionPolicy {
                bounds: Bounds::new(Some(lo), Some(hi)),
                ..policy(SelectionMode::Single)
            };
            let expected = day.clamp(lo, hi);
            let picked = pick(&Selection::Empty, day, &p);
            let nearest = pick(&Selection::Empty, expected, &p);
            prop_assert_eq!(picked.selection, nearest.selection);
            prop_assert_eq!(picked.selection, Selection::Single(midnight(expected)));
        }
    }
}
