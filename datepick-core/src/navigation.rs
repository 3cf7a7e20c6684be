//! Month arithmetic and keyboard traversal over calendar days.

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

const SUNDAY_FIRST: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Map a week-start offset (0 = Sunday .. 6 = Saturday) to a weekday.
/// Offsets past 6 wrap.
pub fn weekday_from_offset(offset: u8) -> Weekday {
    SUNDAY_FIRST[usize::from(offset % 7)]
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    start_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Shift by whole months. The day of month is kept when it exists in the
/// target month and otherwise clamped to that month's last day.
pub fn shift_month(date: NaiveDate, delta: i32) -> NaiveDate {
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    shifted.unwrap_or(date)
}

/// Set the zero-based month, keeping year and (where valid) day.
pub fn with_month0(date: NaiveDate, month0: u32) -> NaiveDate {
    let month0 = month0 % 12;
    shift_month(date, month0 as i32 - date.month0() as i32)
}

/// Set the year, keeping month and (where valid) day. Feb 29 becomes Feb 28.
/// Years chrono cannot represent leave the date unchanged.
pub fn with_year(date: NaiveDate, year: i32) -> NaiveDate {
    match year.checked_sub(date.year()).and_then(|delta| delta.checked_mul(12)) {
        Some(delta) => shift_month(date, delta),
        None => date,
    }
}

/// First day of the displayed week containing `date`.
pub fn start_of_week(date: NaiveDate, week_starts_on: Weekday) -> NaiveDate {
    let offset = (date.weekday().num_days_from_sunday() + 7 - week_starts_on.num_days_from_sunday()) % 7;
    date - Duration::days(offset.into())
}

pub fn end_of_week(date: NaiveDate, week_starts_on: Weekday) -> NaiveDate {
    start_of_week(date, week_starts_on) + Duration::days(6)
}

/// Whether two dates fall in the same month of the same year.
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    PageUp,
    PageDown,
    Home,
    End,
    Enter,
    Space,
    Escape,
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value.
    pub fn from_name(name: &str) -> Option<Key> {
        let key = match name {
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "PageUp" => Key::PageUp,
            "PageDown" => Key::PageDown,
            "Home" => Key::Home,
            "End" => Key::End,
            "Enter" => Key::Enter,
            " " | "Space" | "Spacebar" => Key::Space,
            "Escape" | "Esc" => Key::Escape,
            _ => return None,
        };
        Some(key)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
}

/// A key press as seen by a slot's keydown handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        KeyInput {
            key,
            modifiers: Modifiers::default(),
        }
    }

    /// The same key with the secondary (year-step) modifier held.
    pub fn with_shift(key: Key) -> Self {
        KeyInput {
            key,
            modifiers: Modifiers {
                shift: true,
                ..Modifiers::default()
            },
        }
    }
}

impl From<Key> for KeyInput {
    fn from(key: Key) -> Self {
        KeyInput::new(key)
    }
}

/// Outcome of a key press on the focused day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Focus moves to this day.
    Move(NaiveDate),
    /// Commit the focused day as a selection.
    Select,
    /// Close the widget.
    Dismiss,
}

pub fn traverse(focused: NaiveDate, input: KeyInput, week_starts_on: Weekday) -> Traversal {
    let page = if input.modifiers.shift { 12 } else { 1 };
    let target = match input.key {
        Key::ArrowRight => focused + Duration::days(1),
        Key::ArrowLeft => focused - Duration::days(1),
        Key::ArrowDown => focused + Duration::days(7),
        Key::ArrowUp => focused - Duration::days(7),
        Key::PageDown => shift_month(focused, page),
        Key::PageUp => shift_month(focused, -page),
        Key::Home => start_of_week(focused, week_starts_on),
        Key::End => end_of_week(focused, week_starts_on),
        Key::Enter | Key::Space => return Traversal::Select,
        Key::Escape => return Traversal::Dismiss,
    };
    Traversal::Move(target)
}
