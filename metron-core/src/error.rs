//! Errors surfaced by formatters and parsers
//!
//! All of them are caller mistakes or bad input: they are returned as
//! values, never panic, and leave the formatter configuration untouched.

use crate::NumberError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
    pub const MISSING_REQUIRED: &str = "MISSING_REQUIRED";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
}

/// Error returned by measurement formatting, parsing and configuration
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "code", content = "detail", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeasureError {
    /// Malformed configuration input (locale tag, pattern, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A companion object the operation needs was not supplied
    #[error("Missing required argument: {0}")]
    MissingRequired(String),

    /// The text has no recognizable numeric prefix
    #[error("Parse error: no number found in '{0}'")]
    ParseError(String),

    /// The number parsed but the unit part is not a known symbol
    #[error("Unknown unit in '{0}'")]
    UnknownUnit(String),
}

impl MeasureError {
    pub fn invalid_argument(details: impl Into<String>) -> Self {
        Self::InvalidArgument(details.into())
    }

    pub fn missing_required(what: impl Into<String>) -> Self {
        Self::MissingRequired(what.into())
    }

    pub fn parse_error(text: impl Into<String>) -> Self {
        Self::ParseError(text.into())
    }

    pub fn unknown_unit(text: impl Into<String>) -> Self {
        Self::UnknownUnit(text.into())
    }

    /// Machine-readable code, one of [`codes`]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => codes::INVALID_ARGUMENT,
            Self::MissingRequired(_) => codes::MISSING_REQUIRED,
            Self::ParseError(_) => codes::PARSE_ERROR,
            Self::UnknownUnit(_) => codes::UNKNOWN_UNIT,
        }
    }
}

impl From<NumberError> for MeasureError {
    fn from(err: NumberError) -> Self {
        match err {
            NumberError::ParseError(s) => Self::parse_error(s),
            other => Self::invalid_argument(other.to_string()),
        }
    }
}
