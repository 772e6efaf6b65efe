//! Library components of the `csvw-check` command.

pub mod check;
pub mod logging;
pub mod schema;
