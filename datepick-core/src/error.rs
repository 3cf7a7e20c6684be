//! Error types for the date picker engine.

use thiserror::Error;

/// Errors that can occur in date picker operations.
#[derive(Error, Debug)]
pub enum DatePickError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid time '{0}'. Expected HH:MM")]
    InvalidTime(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Unknown locale: {0}")]
    UnknownLocale(String),

    #[error("No date picker engine provided for this widget")]
    MissingContext,

    #[error("Date picker engine was dropped before the handler ran")]
    EngineDropped,

    #[error("Date picker engine is busy; callbacks must not re-enter it")]
    EngineBusy,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for date picker operations.
pub type DatePickResult<T> = Result<T, DatePickError>;
