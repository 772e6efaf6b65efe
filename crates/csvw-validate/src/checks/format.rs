//! Format regex of textual columns.

use csvw_model::{Constraint, Diagnostic, DiagnosticKind};
use regex::Regex;

use super::Cell;

/// The regex is searched, not anchored: it must match somewhere in `text`,
/// the lexical form of the cell content.
pub(crate) fn check(cell: &Cell<'_>, text: &str, regex: Option<&Regex>) -> Option<Diagnostic> {
    let regex = regex?;
    if regex.is_match(text) {
        return None;
    }
    Some(cell.error(
        DiagnosticKind::Format,
        Constraint::Format(regex.as_str().to_string()),
    ))
}
