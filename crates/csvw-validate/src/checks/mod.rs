//! Facet checks.
//!
//! Each module checks one facet of a successfully parsed token. Checks are
//! independent: every failing check contributes its own diagnostic.

pub(crate) mod format;
pub(crate) mod length;
pub(crate) mod range;
pub(crate) mod required;

use csvw_model::{Constraint, Diagnostic, DiagnosticKind, Value};

use crate::column::ColumnValidator;
use crate::registry;

pub(crate) use range::Bounds;

/// Position and raw text of the token under check.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cell<'a> {
    pub row: Option<usize>,
    pub column: usize,
    pub content: &'a str,
}

impl<'a> Cell<'a> {
    pub fn new(row: Option<usize>, column: usize, content: &'a str) -> Self {
        Self {
            row,
            column,
            content,
        }
    }

    /// Error diagnostic for this cell.
    pub fn error(&self, kind: DiagnosticKind, constraint: Constraint) -> Diagnostic {
        Diagnostic::error(kind)
            .at(self.row, Some(self.column))
            .with_content(self.content)
            .with_constraint(constraint)
    }
}

/// Run every facet check on a parsed token.
pub(crate) fn run_all(validator: &ColumnValidator, cell: &Cell<'_>, value: &Value) -> Vec<Diagnostic> {
    let column = validator.column();
    let text = registry::lexical_form(column.datatype.base, cell.content);
    let mut diagnostics = Vec::new();

    // 1. Required
    diagnostics.extend(required::check(cell, column.required, cell.content.is_empty()));

    // 2. Format regex (textual columns only)
    diagnostics.extend(format::check(cell, text, validator.format().regex()));

    // 3. Length facets
    diagnostics.extend(length::check(cell, text, &column.datatype));

    // 4. Value range facets
    diagnostics.extend(range::check(cell, validator.bounds(), value));

    diagnostics
}
