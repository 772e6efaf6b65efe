//! Datatype registry and cell validation for CSVW table schemas.
//!
//! - [`registry`]: one value parser per [`Datatype`](csvw_model::Datatype),
//!   delegating to the number and date format compilers
//! - [`ColumnValidator`]: null handling, list splitting, datatype parsing and
//!   facet checks for the cells of one column
//! - [`TableValidator`]: all columns of a schema, plus row-shape warnings
//!
//! Columns are compiled once when the schema is loaded. Schema defects are
//! [`ColumnError`]s; data defects are recorded as diagnostics and never stop
//! validation.
//!
//! # Example
//!
//! ```ignore
//! use csvw_model::{Column, Datatype, DatatypeDescriptor, DiagnosticCollector};
//! use csvw_validate::ColumnValidator;
//!
//! let column = Column::new(1, DatatypeDescriptor::new(Datatype::String).with_min_length(3))
//!     .with_required(true);
//! let validator = ColumnValidator::new(column)?;
//!
//! let mut collector = DiagnosticCollector::new();
//! validator.validate(Some("ab"), Some(1), &mut collector);
//! assert_eq!(collector.error_count(), 1);
//! ```

mod checks;
mod column;
mod error;
pub mod registry;
mod table;

// === Error Types ===
pub use error::{ColumnError, Result};

// === Validators ===
pub use column::ColumnValidator;
pub use registry::CompiledFormat;
pub use table::TableValidator;
