//! Construction-time configuration.
//!
//! [`DatePickerConfig`] is plain data and can live in a TOML file.
//! [`DatePickerOptions`] wraps it with the parts that cannot be serialized:
//! controlled values, callbacks and the availability predicate.

use std::path::Path;

use chrono::NaiveDate;
use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::callback::{Callback, CallbackWith};
use crate::constants::{
    DEFAULT_DATE_FORMAT, DEFAULT_LOCALE, DEFAULT_PICKER_ID, DEFAULT_RANGE_SEPARATOR,
    DEFAULT_TIME_FORMAT, DEFAULT_YEAR_SPAN,
};
use crate::error::{DatePickError, DatePickResult};
use crate::grid::UnavailablePredicate;
use crate::selection::{Selection, SelectionMode};
use crate::time_of_day::TimeOfDay;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatePickerConfig {
    /// Prefix for every element id the prop bags emit.
    pub id: String,
    pub range: bool,
    pub close_on_select: bool,
    pub open_on_focus: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_date: Option<NaiveDate>,
    pub locale: String,
    /// 0 = Sunday .. 6 = Saturday.
    pub week_starts_on: u8,
    pub allow_same_date_selection: bool,
    /// Month shown first when nothing is selected. Defaults to today.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_month: Option<NaiveDate>,
    pub default_open: bool,
    pub enable_time: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_time: Option<TimeOfDay>,
    pub date_format: String,
    pub time_format: String,
    pub range_separator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Years listed either side of the view year when unbounded.
    pub year_span: i32,
}

impl Default for DatePickerConfig {
    fn default() -> Self {
        DatePickerConfig {
            id: DEFAULT_PICKER_ID.to_string(),
            range: false,
            close_on_select: true,
            open_on_focus: true,
            min_date: None,
            max_date: None,
            locale: DEFAULT_LOCALE.to_string(),
            week_starts_on: 0,
            allow_same_date_selection: true,
            initial_month: None,
            default_open: false,
            enable_time: false,
            default_time: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            range_separator: DEFAULT_RANGE_SEPARATOR.to_string(),
            placeholder: None,
            year_span: DEFAULT_YEAR_SPAN,
        }
    }
}

impl DatePickerConfig {
    /// Load config from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> DatePickResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .build()
            .map_err(|e| DatePickError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| DatePickError::Config(e.to_string()))
    }

    pub fn from_toml_str(content: &str) -> DatePickResult<Self> {
        toml::from_str(content).map_err(|e| DatePickError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> DatePickResult<String> {
        toml::to_string_pretty(self).map_err(|e| DatePickError::Config(e.to_string()))
    }

    pub fn mode(&self) -> SelectionMode {
        if self.range {
            SelectionMode::Range
        } else {
            SelectionMode::Single
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.min_date, self.max_date)
    }
}

/// Everything needed to build a [`crate::DatePicker`].
#[derive(Default)]
pub struct DatePickerOptions {
    pub config: DatePickerConfig,
    /// Consumer-owned selection. When set, the engine mirrors it.
    pub value: Option<Selection>,
    pub default_value: Option<Selection>,
    pub on_change: Option<CallbackWith<Selection>>,
    pub open: Option<bool>,
    pub on_open_change: Option<CallbackWith<bool>>,
    pub on_open: Option<Callback>,
    pub on_close: Option<Callback>,
    pub time: Option<TimeOfDay>,
    pub on_time_change: Option<CallbackWith<Option<TimeOfDay>>>,
    pub is_unavailable: Option<UnavailablePredicate>,
    /// Overrides the local calendar date used for "today".
    pub today: Option<NaiveDate>,
}

impl DatePickerOptions {
    pub fn new(config: DatePickerConfig) -> Self {
        DatePickerOptions {
            config,
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: Selection) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_default_value(mut self, value: Selection) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_on_change(mut self, on_change: impl Fn(Selection) + 'static) -> Self {
        self.on_change = Some(CallbackWith::new(on_change));
        self
    }

    pub fn with_open(mut self, open: bool) -> Self {
        self.open = Some(open);
        self
    }

    pub fn with_on_open_change(mut self, on_open_change: impl Fn(bool) + 'static) -> Self {
        self.on_open_change = Some(CallbackWith::new(on_open_change));
        self
    }

    pub fn with_on_open(mut self, on_open: impl Fn() + 'static) -> Self {
        self.on_open = Some(Callback::new(on_open));
        self
    }

    pub fn with_on_close(mut self, on_close: impl Fn() + 'static) -> Self {
        self.on_close = Some(Callback::new(on_close));
        self
    }

    pub fn with_time(mut self, time: TimeOfDay) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_on_time_change(
        mut self,
        on_time_change: impl Fn(Option<TimeOfDay>) + 'static,
    ) -> Self {
        self.on_time_change = Some(CallbackWith::new(on_time_change));
        self
    }

    pub fn with_unavailable(mut self, is_unavailable: impl Fn(NaiveDate) -> bool + 'static) -> Self {
        self.is_unavailable = Some(UnavailablePredicate::new(is_unavailable));
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }
}
