//! Construction errors for format patterns.
//!
//! These are schema-authoring defects. They are raised when a column is
//! compiled, never while values are being parsed.

use csvw_model::Datatype;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    // === Number Format Errors ===
    /// Pattern has no run of digit placeholders and separators.
    #[error("invalid number format {pattern:?}: no numeric part")]
    NoNumericPart { pattern: String },

    /// Generated matcher was rejected, usually for being too large.
    #[error("invalid number format {pattern:?}: {message}")]
    NumberPattern { pattern: String, message: String },

    // === Date Format Errors ===
    /// Pattern uses a date field symbol that is not supported.
    #[error("unrecognised date field symbol {symbol:?} in date format {pattern:?}")]
    UnrecognisedSymbol { pattern: String, symbol: String },

    /// Generated matcher was rejected, e.g. a field appears twice.
    #[error("invalid date format {pattern:?}: {message}")]
    DatePattern { pattern: String, message: String },

    /// No pattern was given and the datatype has no default format.
    #[error("datatype {datatype} has no default date format")]
    NoDefaultDateFormat { datatype: Datatype },
}

impl FormatError {
    /// True for errors raised by the number pattern compiler.
    pub fn is_number_format(&self) -> bool {
        matches!(self, Self::NoNumericPart { .. } | Self::NumberPattern { .. })
    }

    /// True for errors raised by the date pattern compiler.
    pub fn is_date_format(&self) -> bool {
        !self.is_number_format()
    }
}

pub type Result<T> = std::result::Result<T, FormatError>;
