//! The date picker engine.
//!
//! [`DatePicker`] owns one widget's state: selection, time of day,
//! visibility, view month and keyboard focus. Every operation finishes by
//! re-deriving view state from the committed selection, so a snapshot never
//! pairs a selection with a stale view month.

use chrono::{Datelike, Local, NaiveDate, Weekday};
use serde::Serialize;
use tracing::{debug, warn};

use crate::bounds::Bounds;
use crate::callback::CallbackWith;
use crate::config::{DatePickerConfig, DatePickerOptions};
use crate::controllable::Controllable;
use crate::disclosure::{Disclosure, Region};
use crate::grid::{CalendarDay, GridOptions, MonthGrid, UnavailablePredicate, generate_month};
use crate::locale::PickerLocale;
use crate::navigation::{
    KeyInput, Traversal, end_of_month, same_month, shift_month, start_of_month, traverse,
    weekday_from_offset, with_month0, with_year,
};
use crate::selection::{Selection, SelectionMode, SelectionPolicy, select_day};
use crate::time_of_day::TimeOfDay;

/// An element the renderer should move keyboard focus to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "target", content = "date", rename_all = "snake_case")]
pub enum FocusTarget {
    Day(NaiveDate),
    Trigger,
}

/// Entry of the month selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthOption {
    /// Zero-based month index.
    pub index: u32,
    pub label: String,
    pub disabled: bool,
}

/// Read-only snapshot of everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatePickerState {
    pub id: String,
    pub is_open: bool,
    pub mode: SelectionMode,
    pub selection: Selection,
    pub time: Option<TimeOfDay>,
    pub locale: String,
    pub bounds: Bounds,
    pub week_starts_on: u8,
    /// Zero-based.
    pub view_month: u32,
    pub view_year: i32,
    pub focused_date: NaiveDate,
    pub weeks: Vec<Vec<CalendarDay>>,
    pub weekday_labels: Vec<String>,
    pub has_selection: bool,
    pub display_value: String,
}

pub struct DatePicker {
    config: DatePickerConfig,
    mode: SelectionMode,
    bounds: Bounds,
    locale: PickerLocale,
    week_starts_on: Weekday,
    is_unavailable: Option<UnavailablePredicate>,
    today: NaiveDate,

    selection: Controllable<Selection>,
    time: Controllable<Option<TimeOfDay>>,
    disclosure: Disclosure,

    view_date: NaiveDate,
    focused_date: NaiveDate,
    grid: MonthGrid,

    /// Anchor seen by the last resync; a difference means the selection moved.
    observed_anchor: Option<NaiveDate>,
    was_open: bool,
    focus_request: Option<FocusTarget>,
}

impl DatePicker {
    pub fn new(options: DatePickerOptions) -> Self {
        let DatePickerOptions {
            config,
            value,
            default_value,
            on_change,
            open,
            on_open_change,
            on_open,
            on_close,
            time,
            on_time_change,
            is_unavailable,
            today,
        } = options;

        let mode = config.mode();
        let bounds = config.bounds();
        let locale = PickerLocale::resolve_or_default(&config.locale);
        let week_starts_on = weekday_from_offset(config.week_starts_on);
        let today = today.unwrap_or_else(|| Local::now().date_naive());

        let initial = default_value
            .map(|v| coerce(v, mode))
            .unwrap_or_else(|| Selection::empty_for(mode));
        let selection = Controllable::new(value.map(|v| coerce(v, mode)), initial, on_change);
        let time = Controllable::new(time.map(Some), config.default_time, on_time_change);
        let disclosure = Disclosure::new(open, config.default_open, on_open_change, on_open, on_close);

        let anchor = selection.get().anchor();
        let view_date = start_of_month(anchor.or(config.initial_month).unwrap_or(today));
        let focused_date = match anchor {
            Some(anchor) => anchor,
            None if same_month(today, view_date) => today,
            None => view_date,
        };

        let mut picker = DatePicker {
            mode,
            bounds,
            locale,
            week_starts_on,
            is_unavailable,
            today,
            selection,
            time,
            was_open: false,
            disclosure,
            view_date,
            focused_date,
            grid: MonthGrid {
                weeks: Vec::new(),
                weekday_labels: Vec::new(),
            },
            observed_anchor: anchor,
            focus_request: None,
            config,
        };
        picker.regenerate_grid();
        picker.commit();
        picker
    }

    pub fn config(&self) -> &DatePickerConfig {
        &self.config
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn selection(&self) -> &Selection {
        self.selection.get()
    }

    pub fn time(&self) -> Option<TimeOfDay> {
        *self.time.get()
    }

    pub fn is_open(&self) -> bool {
        self.disclosure.is_open()
    }

    pub fn view_date(&self) -> NaiveDate {
        self.view_date
    }

    pub fn focused_date(&self) -> NaiveDate {
        self.focused_date
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn locale(&self) -> &PickerLocale {
        &self.locale
    }

    pub fn week_starts_on(&self) -> Weekday {
        self.week_starts_on
    }

    pub fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    pub fn has_selection(&self) -> bool {
        self.selection.get().has_value()
    }

    pub fn is_selected(&self, day: NaiveDate) -> bool {
        self.selection.get().is_selected(day)
    }

    pub fn is_in_range(&self, day: NaiveDate) -> bool {
        self.selection.get().is_in_range(day)
    }

    pub fn is_disabled(&self, day: NaiveDate) -> bool {
        !self.bounds.contains(day) || self.is_unavailable.as_ref().is_some_and(|p| p.call(day))
    }

    pub fn snapshot(&self) -> DatePickerState {
        DatePickerState {
            id: self.config.id.clone(),
            is_open: self.is_open(),
            mode: self.mode,
            selection: *self.selection.get(),
            time: self.time(),
            locale: self.locale.tag().to_string(),
            bounds: self.bounds,
            week_starts_on: self.week_starts_on.num_days_from_sunday() as u8,
            view_month: self.view_date.month0(),
            view_year: self.view_date.year(),
            focused_date: self.focused_date,
            weeks: self.grid.weeks.clone(),
            weekday_labels: self.grid.weekday_labels.clone(),
            has_selection: self.has_selection(),
            display_value: self.display_value(),
        }
    }

    // Visibility

    pub fn open(&mut self) {
        self.disclosure.open();
        self.commit();
    }

    pub fn close(&mut self) {
        self.disclosure.close();
        self.commit();
    }

    pub fn toggle(&mut self) {
        self.disclosure.toggle();
        self.commit();
    }

    /// Report a pointer or focus interaction. Outside interactions dismiss
    /// the panel without moving focus.
    pub fn handle_interaction(&mut self, region: Region) {
        self.disclosure.handle_interaction(region);
        self.commit();
    }

    /// Escape inside the content closes the panel and returns focus to the trigger.
    pub fn handle_escape(&mut self) {
        if !self.is_open() {
            return;
        }
        self.disclosure.close();
        self.request_focus(FocusTarget::Trigger);
        self.commit();
    }

    /// Focus landed on the text input.
    pub fn handle_input_focus(&mut self) {
        if self.config.open_on_focus {
            self.open();
        }
    }

    // Selection

    pub fn select_day(&mut self, day: NaiveDate) {
        let policy = SelectionPolicy {
            mode: self.mode,
            bounds: self.bounds,
            allow_same_day: self.config.allow_same_date_selection,
            time: self.active_time(),
            is_unavailable: self.is_unavailable.as_ref(),
        };
        let Some(selected) = select_day(self.selection.get(), day, &policy) else {
            return;
        };

        debug!(selection = ?selected.selection, complete = selected.complete, "selection committed");
        self.selection.set(selected.selection);
        if selected.complete && self.config.close_on_select {
            self.disclosure.close();
        }
        self.commit();
    }

    pub fn select_today(&mut self) {
        self.select_day(self.today);
    }

    /// Reset the selection. Visibility is untouched.
    pub fn clear(&mut self) {
        debug!("selection cleared");
        self.selection.set(Selection::empty_for(self.mode));
        self.commit();
    }

    /// Store a `"HH:MM"` time and re-apply it to the current selection.
    ///
    /// An empty string clears the time. Malformed input is ignored.
    pub fn set_time(&mut self, value: &str) {
        let time = if value.trim().is_empty() {
            None
        } else {
            match value.parse::<TimeOfDay>() {
                Ok(time) => Some(time),
                Err(e) => {
                    warn!("{e}; keeping the previous time");
                    return;
                }
            }
        };

        self.time.set(time);
        if let Some(time) = time
            && self.config.enable_time
            && self.has_selection()
        {
            let retimed = self.selection.get().with_time(time);
            debug!(%time, "re-applying time to selection");
            self.selection.set(retimed);
        }
        self.commit();
    }

    // Navigation

    pub fn goto_previous_month(&mut self) {
        self.set_view(shift_month(self.view_date, -1));
    }

    pub fn goto_next_month(&mut self) {
        self.set_view(shift_month(self.view_date, 1));
    }

    /// Jump to a zero-based month of the current view year.
    pub fn goto_month(&mut self, month0: u32) {
        self.set_view(with_month0(self.view_date, month0));
    }

    pub fn goto_year(&mut self, year: i32) {
        self.set_view(with_year(self.view_date, year));
    }

    pub fn goto_today(&mut self) {
        self.focused_date = self.today;
        self.set_view(self.today);
    }

    pub fn can_goto_previous_month(&self) -> bool {
        let previous = shift_month(self.view_date, -1);
        self.bounds.overlaps_month(previous.year(), previous.month())
    }

    pub fn can_goto_next_month(&self) -> bool {
        let next = shift_month(self.view_date, 1);
        self.bounds.overlaps_month(next.year(), next.month())
    }

    /// Move focus to `day`, following it with the view month.
    pub fn focus_day(&mut self, day: NaiveDate) {
        let day = self.bounds.clamp(day);
        self.focused_date = day;
        if !same_month(day, self.view_date) {
            self.view_date = start_of_month(day);
            debug!(view = %self.view_date, "view follows focus");
        }
        self.commit();
    }

    /// Keydown inside the grid.
    pub fn handle_key(&mut self, input: KeyInput) {
        match traverse(self.focused_date, input, self.week_starts_on) {
            Traversal::Move(day) => {
                self.focus_day(day);
                self.request_focus(FocusTarget::Day(self.focused_date));
            }
            Traversal::Select => self.select_day(self.focused_date),
            Traversal::Dismiss => self.handle_escape(),
        }
    }

    /// Take the pending programmatic focus move, if any.
    pub fn take_focus_request(&mut self) -> Option<FocusTarget> {
        self.focus_request.take()
    }

    // Supplementary queries

    /// The selection rendered as text for the input.
    pub fn display_value(&self) -> String {
        let fmt = self.value_format();
        let format = |d| self.locale.format(d, &fmt);
        match self.selection.get() {
            Selection::Empty => String::new(),
            Selection::Single(date) => format(*date),
            Selection::Range(range) => match (range.start, range.end) {
                (None, None) => String::new(),
                (Some(start), None) => format!("{}{}", format(start), self.config.range_separator),
                (None, Some(end)) => format!("{}{}", self.config.range_separator, format(end)),
                (Some(start), Some(end)) => {
                    format!("{}{}{}", format(start), self.config.range_separator, format(end))
                }
            },
        }
    }

    /// Localized label for the visible month, e.g. `March 2024`.
    pub fn view_label(&self) -> String {
        self.locale.format_date(self.view_date, "%B %Y")
    }

    pub fn month_options(&self) -> Vec<MonthOption> {
        let year = self.view_date.year();
        (0..12)
            .map(|index| MonthOption {
                index,
                label: self.locale.month_long(index),
                disabled: !self.bounds.overlaps_month(year, index + 1),
            })
            .collect()
    }

    pub fn year_options(&self) -> Vec<i32> {
        let year = self.view_date.year();
        let span = self.config.year_span.max(0);
        let first = self
            .bounds
            .min_year()
            .unwrap_or_else(|| year.saturating_sub(span).max(NaiveDate::MIN.year()));
        let last = self
            .bounds
            .max_year()
            .unwrap_or_else(|| year.saturating_add(span).min(NaiveDate::MAX.year()));
        (first..=last).collect()
    }

    // Prop sync

    /// Re-supply the consumer-owned selection (or release control with `None`).
    pub fn set_controlled_value(&mut self, value: Option<Selection>) {
        let mode = self.mode;
        self.selection.sync_controlled(value.map(|v| coerce(v, mode)));
        self.commit();
    }

    pub fn set_controlled_open(&mut self, open: Option<bool>) {
        self.disclosure.sync_controlled(open);
        self.commit();
    }

    pub fn set_controlled_time(&mut self, time: Option<TimeOfDay>) {
        self.time.sync_controlled(time.map(Some));
        self.commit();
    }

    pub fn set_on_change(&mut self, on_change: Option<CallbackWith<Selection>>) {
        self.selection.set_on_change(on_change);
    }

    pub fn set_on_time_change(&mut self, on_time_change: Option<CallbackWith<Option<TimeOfDay>>>) {
        self.time.set_on_change(on_time_change);
    }

    fn active_time(&self) -> Option<TimeOfDay> {
        if self.config.enable_time {
            self.time()
        } else {
            None
        }
    }

    fn value_format(&self) -> String {
        if self.config.enable_time {
            format!("{} {}", self.config.date_format, self.config.time_format)
        } else {
            self.config.date_format.clone()
        }
    }

    fn set_view(&mut self, date: NaiveDate) {
        self.view_date = start_of_month(date);
        if !same_month(self.focused_date, self.view_date) {
            let last = end_of_month(self.view_date).day();
            self.focused_date = self
                .view_date
                .with_day(self.focused_date.day().min(last))
                .unwrap_or(self.view_date);
        }
        debug!(view = %self.view_date, "view month changed");
        self.commit();
    }

    fn request_focus(&mut self, target: FocusTarget) {
        debug!(?target, "focus requested");
        self.focus_request = Some(target);
    }

    fn regenerate_grid(&mut self) {
        let options = GridOptions {
            locale: &self.locale,
            week_starts_on: self.week_starts_on,
            bounds: self.bounds,
            is_unavailable: self.is_unavailable.as_ref(),
            today: self.today,
        };
        self.grid = generate_month(self.view_date, &options);
    }

    /// Derive view state from committed state. Runs after every mutation.
    fn commit(&mut self) {
        let anchor = self.selection.get().anchor();
        if anchor != self.observed_anchor {
            self.observed_anchor = anchor;
            if let Some(anchor) = anchor {
                debug!(%anchor, "selection anchor moved; resyncing view");
                self.view_date = start_of_month(anchor);
                self.focused_date = anchor;
            }
        }

        let open = self.disclosure.is_open();
        if open && !self.was_open {
            self.request_focus(FocusTarget::Day(self.focused_date));
        }
        self.was_open = open;

        let grid_month = self.grid.days().find(|d| d.is_current_month).map(|d| d.date);
        if grid_month.is_none_or(|first| !same_month(first, self.view_date)) {
            self.regenerate_grid();
        }
    }
}

/// Treat a value whose shape does not match the mode as absent.
fn coerce(value: Selection, mode: SelectionMode) -> Selection {
    match (mode, value) {
        (SelectionMode::Single, Selection::Range(_)) => Selection::Empty,
        (SelectionMode::Range, Selection::Single(_) | Selection::Empty) => {
            Selection::empty_for(SelectionMode::Range)
        }
        (_, value) => value,
    }
}
