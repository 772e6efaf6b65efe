//! Row validation across all columns of a table schema.

use csvw_model::{CellValue, Column, Constraint, Diagnostic, DiagnosticCollector, DiagnosticKind};
use tracing::{debug, warn};

use crate::column::ColumnValidator;
use crate::error::Result;

/// Compiled columns of a table, in schema order.
#[derive(Debug, Clone)]
pub struct TableValidator {
    columns: Vec<ColumnValidator>,
}

impl TableValidator {
    /// Compile every column.
    ///
    /// Columns without a number are numbered by position, starting at 1.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let columns = columns
            .into_iter()
            .enumerate()
            .map(|(index, mut column)| {
                if column.number == 0 {
                    column.number = index + 1;
                }
                ColumnValidator::new(column)
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(columns = columns.len(), "compiled table schema");
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[ColumnValidator] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Validate one row of cells.
    ///
    /// A short row is reported once as `missing_column` and its absent cells
    /// are validated as empty. Surplus cells are reported as `extra_column`
    /// and otherwise ignored.
    pub fn validate_row(
        &self,
        row: usize,
        cells: &[&str],
        collector: &mut DiagnosticCollector,
    ) -> Vec<CellValue> {
        let expected = self.columns.len();
        if cells.len() < expected {
            warn!(row, expected, found = cells.len(), "row is missing columns");
            collector.push(
                Diagnostic::warning(DiagnosticKind::MissingColumn)
                    .at(Some(row), Some(cells.len() + 1))
                    .with_constraint(Constraint::Columns(expected)),
            );
        } else if cells.len() > expected {
            warn!(row, expected, found = cells.len(), "row has extra columns");
            collector.push(
                Diagnostic::warning(DiagnosticKind::ExtraColumn)
                    .at(Some(row), Some(expected + 1))
                    .with_content(cells[expected..].join(","))
                    .with_constraint(Constraint::Columns(expected)),
            );
        }

        self.columns
            .iter()
            .enumerate()
            .map(|(index, column)| column.validate(cells.get(index).copied(), Some(row), collector))
            .collect()
    }
}
