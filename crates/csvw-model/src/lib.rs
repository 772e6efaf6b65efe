//! CSVW datatype model.
//!
//! Shared types for the validation engine:
//!
//! - **Datatypes**: the closed [`Datatype`] enumeration over the supported
//!   XSD, RDF and CSVW type URIs
//! - **Descriptors**: [`DatatypeDescriptor`] and [`Column`], deserialized from
//!   CSVW metadata JSON
//! - **Values**: typed cell values produced by parsing
//! - **Diagnostics**: structured findings and the per-run collector
//!
//! # Example
//!
//! ```ignore
//! use csvw_model::{Column, Datatype, DatatypeDescriptor};
//!
//! let column = Column::new(1, DatatypeDescriptor::new(Datatype::String).with_min_length(3))
//!     .with_required(true);
//! column.datatype.validate()?;
//! ```

mod datatype;
mod descriptor;
mod diagnostic;
mod error;
mod value;

// === Error Types ===
pub use error::{ModelError, Result};

// === Datatypes ===
pub use datatype::{CSVW_NS, Datatype, RDF_NS, XSD_NS};

// === Descriptors ===
pub use descriptor::{Column, DatatypeDescriptor, FacetBound, FormatSpec};

// === Values ===
pub use value::{CellValue, Number, ParsedValue, Temporal, TemporalKind, TemporalPoint, Value};

// === Diagnostics ===
pub use diagnostic::{
    Category, Constraint, Diagnostic, DiagnosticCollector, DiagnosticKind, Severity,
};
