//! Per-column cell validation.

use csvw_model::{
    CellValue, Column, Constraint, Datatype, Diagnostic, DiagnosticCollector, DiagnosticKind,
    ParsedValue, Value,
};
use tracing::{debug, trace};

use crate::checks::{self, Bounds, Cell};
use crate::error::{ColumnError, Result};
use crate::registry::{self, CompiledFormat};

/// A column compiled for validation.
///
/// Holds the column descriptor together with its compiled format and typed
/// range bounds. It is immutable after construction and can be shared across
/// threads.
#[derive(Debug, Clone)]
pub struct ColumnValidator {
    column: Column,
    format: CompiledFormat,
    bounds: Bounds,
}

impl ColumnValidator {
    /// Compile `column`.
    ///
    /// # Errors
    ///
    /// Fails when the descriptor facets are inconsistent, when the format
    /// pattern cannot be compiled, or when a range bound is not a value of
    /// the column datatype.
    pub fn new(column: Column) -> Result<Self> {
        column
            .datatype
            .validate()
            .map_err(|source| ColumnError::Descriptor {
                column: column.label(),
                source,
            })?;
        let format = CompiledFormat::compile(&column)?;
        let bounds = Bounds::compile(&column)?;
        debug!(
            column = %column.label(),
            datatype = %column.datatype.base,
            format = column.datatype.pattern(),
            separator = column.separator.as_deref(),
            required = column.required,
            "compiled column"
        );
        Ok(Self {
            column,
            format,
            bounds,
        })
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn datatype(&self) -> Datatype {
        self.column.datatype.base
    }

    pub fn format(&self) -> &CompiledFormat {
        &self.format
    }

    pub(crate) fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Parse a single token with the column datatype and format.
    pub fn parse(&self, token: &str) -> std::result::Result<Value, DiagnosticKind> {
        registry::parse(self.datatype(), token, &self.format)
    }

    /// Validate one cell.
    ///
    /// An absent or empty value takes the column default. A value equal to
    /// one of the null literals is null and only the required facet applies.
    /// Otherwise the value is split on the separator and every token is
    /// parsed and checked; failures are recorded in `collector` and the
    /// token becomes [`ParsedValue::Invalid`].
    pub fn validate(
        &self,
        value: Option<&str>,
        row: Option<usize>,
        collector: &mut DiagnosticCollector,
    ) -> CellValue {
        let value = value
            .filter(|value| !value.is_empty())
            .or(self.column.default.as_deref())
            .unwrap_or_default();

        if self.column.is_null(value) {
            let cell = Cell::new(row, self.column.number, value);
            if let Some(diagnostic) = checks::required::check(&cell, self.column.required, true) {
                collector.push(diagnostic);
            }
            trace!(column = self.column.number, ?row, "null cell");
            return CellValue::Null;
        }

        match &self.column.separator {
            Some(separator) => CellValue::List(
                value
                    .split(separator.as_str())
                    .map(|token| self.validate_token(token, row, collector))
                    .collect(),
            ),
            None => CellValue::Single(self.validate_token(value, row, collector)),
        }
    }

    fn validate_token(
        &self,
        token: &str,
        row: Option<usize>,
        collector: &mut DiagnosticCollector,
    ) -> ParsedValue {
        let cell = Cell::new(row, self.column.number, token);
        let value = match self.parse(token) {
            Ok(value) => value,
            Err(kind) => {
                trace!(column = cell.column, ?row, %kind, "value not in datatype");
                collector.push(
                    Diagnostic::error(kind)
                        .at(row, Some(cell.column))
                        .with_content(token)
                        .with_constraint(Constraint::Datatype(self.column.datatype.clone())),
                );
                return ParsedValue::Invalid(token.to_string());
            }
        };

        let diagnostics = checks::run_all(self, &cell, &value);
        if diagnostics.is_empty() {
            trace!(column = cell.column, ?row, "valid value");
            return ParsedValue::Valid(value);
        }
        trace!(
            column = cell.column,
            ?row,
            failures = diagnostics.len(),
            "facet checks failed"
        );
        for diagnostic in diagnostics {
            collector.push(diagnostic);
        }
        ParsedValue::Invalid(token.to_string())
    }
}
