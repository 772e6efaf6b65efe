//! Error types for the CSVW model.

use thiserror::Error;

use crate::datatype::Datatype;

/// Errors raised while building or checking schema descriptors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    // === Datatype Errors ===
    /// Datatype name or URI is not one of the supported datatypes.
    #[error("unknown datatype: {name}")]
    UnknownDatatype { name: String },

    // === Facet Errors ===
    /// Two facets that exclude each other are both present.
    #[error("{datatype}: {first} and {second} cannot both be set")]
    ConflictingFacets {
        datatype: Datatype,
        first: &'static str,
        second: &'static str,
    },

    /// `length` is smaller than `minLength`.
    #[error("{datatype}: length {length} is less than minLength {min_length}")]
    LengthBelowMinLength {
        datatype: Datatype,
        length: usize,
        min_length: usize,
    },

    /// `length` is larger than `maxLength`.
    #[error("{datatype}: length {length} is greater than maxLength {max_length}")]
    LengthAboveMaxLength {
        datatype: Datatype,
        length: usize,
        max_length: usize,
    },

    /// `minLength` is larger than `maxLength`.
    #[error("{datatype}: minLength {min_length} is greater than maxLength {max_length}")]
    MinLengthAboveMaxLength {
        datatype: Datatype,
        min_length: usize,
        max_length: usize,
    },

    /// Facet does not apply to the base datatype.
    #[error("{facet} is not allowed on datatype {datatype}")]
    FacetNotAllowed {
        facet: &'static str,
        datatype: Datatype,
    },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
