/// Number of week rows in every generated month grid.
pub const GRID_WEEKS: usize = 6;

pub const DAYS_PER_WEEK: usize = 7;

/// Locale tag that resolves to the POSIX locale.
pub const DEFAULT_LOCALE: &str = "default";

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M";
pub const DEFAULT_RANGE_SEPARATOR: &str = " – ";

/// Years listed on each side of the view year when no bound limits the year selector.
pub const DEFAULT_YEAR_SPAN: i32 = 10;

pub const DEFAULT_PICKER_ID: &str = "datepicker";
