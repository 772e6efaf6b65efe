//! Column compilation errors.
//!
//! Every variant names the column it was raised for. All of them are raised
//! while a schema is loaded, before any row is read.

use csvw_format::FormatError;
use csvw_model::{Datatype, ModelError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColumnError {
    // === Descriptor Errors ===
    /// Facets are inconsistent with each other or with the base datatype.
    #[error("{column}: {source}")]
    Descriptor {
        column: String,
        #[source]
        source: ModelError,
    },

    // === Format Errors ===
    /// Number or date pattern could not be compiled.
    #[error("{column}: {source}")]
    Format {
        column: String,
        #[source]
        source: FormatError,
    },

    /// Regular-expression format of a textual column is invalid or too large.
    #[error("{column}: invalid format regex {pattern:?}: {message}")]
    Regex {
        column: String,
        pattern: String,
        message: String,
    },

    /// Boolean format is not two literals separated by `|`.
    #[error("{column}: boolean format {pattern:?} must be two values separated by '|'")]
    BooleanFormat { column: String, pattern: String },

    // === Bound Errors ===
    /// A range facet is not a value of the column datatype.
    #[error("{column}: {facet} {bound:?} is not a valid {datatype}")]
    InvalidBound {
        column: String,
        facet: &'static str,
        bound: String,
        datatype: Datatype,
    },

    /// Lower bound lies above the upper bound.
    #[error("{column}: lower bound {min} is greater than upper bound {max}")]
    BoundsOutOfOrder {
        column: String,
        min: String,
        max: String,
    },
}

impl ColumnError {
    /// Label of the column the error was raised for.
    pub fn column(&self) -> &str {
        match self {
            Self::Descriptor { column, .. }
            | Self::Format { column, .. }
            | Self::Regex { column, .. }
            | Self::BooleanFormat { column, .. }
            | Self::InvalidBound { column, .. }
            | Self::BoundsOutOfOrder { column, .. } => column,
        }
    }
}

pub type Result<T> = std::result::Result<T, ColumnError>;
