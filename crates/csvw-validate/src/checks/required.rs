//! Required facet.

use csvw_model::{Constraint, Diagnostic, DiagnosticKind};

use super::Cell;

/// A required column must not be missing or empty.
pub(crate) fn check(cell: &Cell<'_>, required: bool, missing: bool) -> Option<Diagnostic> {
    (required && missing).then(|| cell.error(DiagnosticKind::MissingValue, Constraint::Required))
}
