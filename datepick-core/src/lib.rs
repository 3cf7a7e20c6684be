//! Headless date picker engine.
//!
//! This crate holds the state behind a date-selection widget and nothing
//! that draws it:
//! - `engine` owns selection, time of day, visibility, view month and focus
//! - `grid` computes the 6×7 month grid
//! - `props` exposes per-slot attribute and handler bags for a renderer
//! - `context` shares one engine between the slots of a widget

pub mod bounds;
pub mod callback;
pub mod config;
pub mod constants;
pub mod context;
pub mod controllable;
pub mod disclosure;
pub mod engine;
pub mod error;
pub mod grid;
pub mod locale;
pub mod navigation;
pub mod props;
pub mod selection;
pub mod time_of_day;

pub use config::{DatePickerConfig, DatePickerOptions};
pub use context::{DatePickerContext, DatePickerProvider};
pub use disclosure::Region;
pub use engine::{DatePicker, DatePickerState, FocusTarget, MonthOption};
pub use error::{DatePickError, DatePickResult};
pub use grid::{CalendarDay, MonthGrid, generate_month};
pub use navigation::{Key, KeyInput, Modifiers};
pub use props::{AttrValue, EventKind, PropBag, UiEvent};
pub use selection::{DateRange, Selection, SelectionMode};
pub use time_of_day::TimeOfDay;
