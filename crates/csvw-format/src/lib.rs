//! Format pattern compilers for CSVW datatypes.
//!
//! - [`NumberFormat`]: LDML-style number patterns such as `#,##0.00` with
//!   configurable grouping and decimal separators
//! - [`DateFormat`]: date and time patterns such as `dd/MM/yyyy HH:mm`, plus
//!   the default lexical format of every temporal datatype
//!
//! Both compile a pattern once into an anchored regular expression and then
//! parse any number of values against it. Pattern defects surface as
//! [`FormatError`] at compile time; values that do not match simply parse to
//! `None`.
//!
//! # Example
//!
//! ```ignore
//! use csvw_format::{DateFormat, NumberFormat};
//! use csvw_model::Datatype;
//!
//! let number = NumberFormat::new(Some("#,##0.##"))?;
//! assert!(number.parse("1,234.5").is_some());
//!
//! let date = DateFormat::new(Some("dd/MM/yyyy"), Datatype::Date)?;
//! assert_eq!(date.parse("22/03/2015").map(|d| d.lexical), Some("2015-03-22".into()));
//! ```

mod date;
mod error;
mod fragment;
mod number;

// === Error Types ===
pub use error::{FormatError, Result};

// === Compilers ===
pub use date::DateFormat;
pub use fragment::Fragment;
pub use number::NumberFormat;
