//! Prop-getter bags for every visual slot.
//!
//! A bag holds the attributes and event handlers a slot applies verbatim to
//! its element. Handlers hold a weak engine handle and report
//! [`crate::error::DatePickError::EngineDropped`] once the widget is gone.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::warn;

use crate::callback::CallbackWith;
use crate::context::DatePickerContext;
use crate::disclosure::Region;
use crate::engine::DatePicker;
use crate::error::DatePickResult;
use crate::navigation::{Key, KeyInput};
use crate::selection::{DateRange, Selection, SelectionMode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Str(String),
    Bool(bool),
    Int(i64),
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Click,
    KeyDown,
    Focus,
    Change,
    PointerDownOutside,
}

/// An event delivered to a bag's handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Click,
    KeyDown(KeyInput),
    Focus,
    /// New text of an input or select element.
    Change(String),
    PointerDownOutside,
}

impl UiEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            UiEvent::Click => EventKind::Click,
            UiEvent::KeyDown(_) => EventKind::KeyDown,
            UiEvent::Focus => EventKind::Focus,
            UiEvent::Change(_) => EventKind::Change,
            UiEvent::PointerDownOutside => EventKind::PointerDownOutside,
        }
    }
}

pub type EventHandler = CallbackWith<UiEvent, DatePickResult<()>>;

#[derive(Clone, Default, Serialize)]
pub struct PropBag {
    attrs: BTreeMap<&'static str, AttrValue>,
    #[serde(skip)]
    handlers: BTreeMap<EventKind, EventHandler>,
}

impl PropBag {
    fn attr(mut self, name: &'static str, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name, value.into());
        self
    }

    fn attr_opt(self, name: &'static str, value: Option<impl Into<AttrValue>>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    fn on(mut self, kind: EventKind, handler: EventHandler) -> Self {
        self.handlers.insert(kind, handler);
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.attrs.get(name) {
            Some(AttrValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.attrs.get(name) {
            Some(AttrValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&'static str, &AttrValue)> {
        self.attrs.iter().map(|(k, v)| (*k, v))
    }

    pub fn handles(&self, kind: EventKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Deliver an event. Returns `Ok(false)` when the slot has no handler for it.
    pub fn dispatch(&self, event: UiEvent) -> DatePickResult<bool> {
        match self.handlers.get(&event.kind()) {
            Some(handler) => handler.call(event).map(|_| true),
            None => Ok(false),
        }
    }
}

impl std::fmt::Debug for PropBag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropBag")
            .field("attrs", &self.attrs)
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn data_state(open: bool) -> &'static str {
    if open { "open" } else { "closed" }
}

fn element_id(picker: &DatePicker, suffix: &str) -> String {
    format!("{}-{}", picker.config().id, suffix)
}

fn day_id(picker: &DatePicker, day: NaiveDate) -> String {
    element_id(picker, &format!("day-{}", day.format("%Y-%m-%d")))
}

impl DatePickerContext {
    fn handler(&self, f: impl Fn(&mut DatePicker, UiEvent) + 'static) -> EventHandler {
        let weak = self.downgrade();
        CallbackWith::new(move |event| weak.update(|picker| f(picker, event)))
    }

    pub fn root_props(&self) -> DatePickResult<PropBag> {
        self.read(|p| {
            PropBag::default()
                .attr("id", p.config().id.clone())
                .attr("data-state", data_state(p.is_open()))
                .attr(
                    "data-mode",
                    match p.mode() {
                        SelectionMode::Single => "single",
                        SelectionMode::Range => "range",
                    },
                )
                .attr("data-has-value", p.has_selection())
        })
        .map(|bag| {
            bag.on(
                EventKind::PointerDownOutside,
                self.handler(|p, _| p.handle_interaction(Region::Outside)),
            )
        })
    }

    /// The surface wrapping the text input and trigger.
    pub fn control_props(&self) -> DatePickResult<PropBag> {
        self.read(|p| {
            PropBag::default()
                .attr("id", element_id(p, "control"))
                .attr("role", "group")
                .attr("data-state", data_state(p.is_open()))
        })
        .map(|bag| bag.on(EventKind::Click, self.handler(|p, _| p.open())))
    }

    pub fn input_props(&self) -> DatePickResult<PropBag> {
        self.read(|p| {
            PropBag::default()
                .attr("id", element_id(p, "input"))
                .attr("type", "text")
                .attr("readonly", true)
                .attr("value", p.display_value())
                .attr_opt("placeholder", p.config().placeholder.clone())
                .attr("aria-haspopup", "dialog")
                .attr("aria-expanded", p.is_open())
                .attr("aria-controls", element_id(p, "content"))
        })
        .map(|bag| {
            bag.on(EventKind::Focus, self.handler(|p, _| p.handle_input_focus()))
                .on(EventKind::Click, self.handler(|p, _| p.open()))
                .on(
                    EventKind::KeyDown,
                    self.handler(|p, event| {
                        if let UiEvent::KeyDown(input) = event {
                            match input.key {
                                Key::ArrowDown | Key::Enter => p.open(),
                                Key::Escape => p.close(),
                                _ => {}
                            }
                        }
                    }),
                )
        })
    }

    /// The open/close button.
    pub fn trigger_props(&self) -> DatePickResult<PropBag> {
        self.read(|p| {
            let label = if p.is_open() { "Close calendar" } else { "Open calendar" };
            PropBag::default()
                .attr("id", element_id(p, "trigger"))
                .attr("type", "button")
                .attr("aria-label", label)
                .attr("aria-haspopup", "dialog")
                .attr("aria-expanded", p.is_open())
                .attr("aria-controls", element_id(p, "content"))
                .attr("data-state", data_state(p.is_open()))
        })
        .map(|bag| bag.on(EventKind::Click, self.handler(|p, _| p.toggle())))
    }

    /// The popover panel.
    pub fn content_props(&self) -> DatePickResult<PropBag> {
        self.read(|p| {
            PropBag::default()
                .attr("id", element_id(p, "content"))
                .attr("role", "dialog")
                .attr("aria-modal", false)
                .attr("aria-labelledby", element_id(p, "grid-label"))
                .attr("data-state", data_state(p.is_open()))
                .attr("hidden", !p.is_open())
        })
        .map(|bag| {
            bag.on(
                EventKind::KeyDown,
                self.handler(|p, event| {
                    if let UiEvent::KeyDown(input) = event
                        && input.key == Key::Escape
                    {
                        p.handle_escape();
                    }
                }),
            )
        })
    }

    pub fn grid_props(&self) -> DatePickResult<PropBag> {
        self.read(|p| {
            PropBag::default()
                .attr("id", element_id(p, "grid"))
                .attr("role", "grid")
                .attr("aria-label", p.view_label())
                .attr("aria-multiselectable", p.mode() == SelectionMode::Range)
                .attr("aria-activedescendant", day_id(p, p.focused_date()))
        })
        .map(|bag| {
            bag.on(
                EventKind::KeyDown,
                self.handler(|p, event| {
                    if let UiEvent::KeyDown(input) = event {
                        p.handle_key(input);
                    }
                }),
            )
        })
    }

    pub fn day_props(&self, day: NaiveDate) -> DatePickResult<PropBag> {
        let (bag, disabled) = self.read(|p| {
            let selection = p.selection();
            let (range_start, range_end) = match selection {
                Selection::Range(DateRange { start, end }) => (
                    start.is_some_and(|s| s.date() == day),
                    end.is_some_and(|e| e.date() == day),
                ),
                _ => (false, false),
            };
            let disabled = p.is_disabled(day);
            let selected = p.is_selected(day);
            let focused = p.focused_date() == day;
            let outside = day.year() != p.view_date().year() || day.month() != p.view_date().month();

            let bag = PropBag::default()
                .attr("id", day_id(p, day))
                .attr("role", "gridcell")
                .attr("aria-label", p.locale().format_date(day, "%A, %B %-d, %Y"))
                .attr("aria-selected", selected)
                .attr("aria-disabled", disabled)
                .attr("disabled", disabled)
                .attr("tabindex", if focused { 0i64 } else { -1 })
                .attr("data-date", day.format("%Y-%m-%d").to_string())
                .attr("data-selected", selected)
                .attr("data-in-range", p.is_in_range(day))
                .attr("data-range-start", range_start)
                .attr("data-range-end", range_end)
                .attr("data-today", day == p.today())
                .attr("data-outside-month", outside)
                .attr("data-focused", focused);
            (bag, disabled)
        })?;

        let bag = bag.on(EventKind::Focus, self.handler(move |p, _| p.focus_day(day)));
        if disabled {
            return Ok(bag);
        }
        Ok(bag.on(EventKind::Click, self.handler(move |p, _| p.select_day(day))))
    }

    pub fn previous_month_props(&self) -> DatePickResult<PropBag> {
        self.read(|p| {
            PropBag::default()
                .attr("type", "button")
                .attr("aria-label", "Previous month")
                .attr("disabled", !p.can_goto_previous_month())
        })
        .map(|bag| bag.on(EventKind::Click, self.handler(|p, _| p.goto_previous_month())))
    }

    pub fn next_month_props(&self) -> DatePickResult<PropBag> {
        self.read(|p| {
            PropBag::default()
                .attr("type", "button")
                .attr("aria-label", "Next month")
                .attr("disabled", !p.can_goto_next_month())
        })
        .map(|bag| bag.on(EventKind::Click, self.handler(|p, _| p.goto_next_month())))
    }

    /// Select element; its options come from [`DatePicker::month_options`].
    pub fn month_select_props(&self) -> DatePickResult<PropBag> {
        self.read(|p| {
            PropBag::default()
                .attr("id", element_id(p, "month"))
                .attr("aria-label", "Month")
                .attr("value", i64::from(p.view_date().month0()))
        })
        .map(|bag| {
            bag.on(
                EventKind::Change,
                self.handler(|p, event| {
                    if let UiEvent::Change(value) = event {
                        match value.trim().parse::<u32>() {
                            Ok(month0) if month0 < 12 => p.goto_month(month0),
                            _ => warn!(%value, "ignoring invalid month selection"),
                        }
                    }
                }),
            )
        })
    }

    /// Select element; its options come from [`DatePicker::year_options`].
    pub fn year_select_props(&self) -> DatePickResult<PropBag> {
        self.read(|p| {
            PropBag::default()
                .attr("id", element_id(p, "year"))
                .attr("aria-label", "Year")
                .attr("value", i64::from(p.view_date().year()))
        })
        .map(|bag| {
            bag.on(
                EventKind::Change,
                self.handler(|p, event| {
                    if let UiEvent::Change(value) = event {
                        match value.trim().parse::<i32>() {
                            Ok(year) if (NaiveDate::MIN.year()..=NaiveDate::MAX.year()).contains(&year) => {
                                p.goto_year(year)
                            }
                            _ => warn!(%value, "ignoring invalid year selection"),
                        }
                    }
                }),
            )
        })
    }

    pub fn time_input_props(&self) -> DatePickResult<PropBag> {
        self.read(|p| {
            PropBag::default()
                .attr("id", element_id(p, "time"))
                .attr("type", "time")
                .attr("aria-label", "Time")
                .attr("value", p.time().map(|t| t.to_string()).unwrap_or_default())
                .attr("disabled", !p.config().enable_time)
        })
        .map(|bag| {
            bag.on(
                EventKind::Change,
                self.handler(|p, event| {
                    if let UiEvent::Change(value) = event {
                        p.set_time(&value);
                    }
                }),
            )
        })
    }

    /// Container of the footer action buttons.
    pub fn footer_props(&self) -> DatePickResult<PropBag> {
        self.read(|p| {
            PropBag::default()
                .attr("id", element_id(p, "footer"))
                .attr("role", "group")
        })
    }

    pub fn clear_button_props(&self) -> DatePickResult<PropBag> {
        self.read(|p| {
            PropBag::default()
                .attr("type", "button")
                .attr("aria-label", "Clear selection")
                .attr("disabled", !p.has_selection())
        })
        .map(|bag| bag.on(EventKind::Click, self.handler(|p, _| p.clear())))
    }

    pub fn today_button_props(&self) -> DatePickResult<PropBag> {
        self.read(|p| {
            PropBag::default()
                .attr("type", "button")
                .attr("aria-label", "Select today")
                .attr("disabled", p.is_disabled(p.today()))
        })
        .map(|bag| bag.on(EventKind::Click, self.handler(|p, _| p.select_today())))
    }
}
