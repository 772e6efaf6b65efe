//! CSV checking against a compiled table schema.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csvw_model::{CellValue, Datatype, DiagnosticCollector};
use csvw_validate::TableValidator;
use tracing::{debug, info, info_span, trace};

use crate::logging::redact_value;

/// How the CSV input is read.
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// First record is a header row and is not validated.
    pub header: bool,
    pub delimiter: u8,
    /// Stop after this many data rows.
    pub max_rows: Option<usize>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            header: true,
            delimiter: b',',
            max_rows: None,
        }
    }
}

/// Per-column cell outcome counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSummary {
    pub label: String,
    pub datatype: Datatype,
    pub valid: usize,
    pub invalid: usize,
    pub null: usize,
}

impl ColumnSummary {
    fn record(&mut self, value: &CellValue) {
        if value.is_null() {
            self.null += 1;
        } else if value.is_valid() {
            self.valid += 1;
        } else {
            self.invalid += 1;
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
    pub diagnostics: DiagnosticCollector,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_valid()
    }
}

/// Validate every data row read from `reader`.
///
/// Data rows are numbered from 1; a header row is not counted.
pub fn validate_reader<R: Read>(
    reader: R,
    table: &TableValidator,
    options: &ValidationOptions,
) -> Result<ValidationReport> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(options.header)
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(reader);

    let mut columns: Vec<ColumnSummary> = table
        .columns()
        .iter()
        .map(|column| ColumnSummary {
            label: column.column().label(),
            datatype: column.datatype(),
            valid: 0,
            invalid: 0,
            null: 0,
        })
        .collect();
    let mut diagnostics = DiagnosticCollector::new();
    let mut rows = 0;

    for (index, record) in csv_reader.records().enumerate() {
        if options.max_rows.is_some_and(|max| index >= max) {
            debug!(max_rows = index, "row limit reached");
            break;
        }
        let row = index + 1;
        let record = record.with_context(|| format!("read CSV row {row}"))?;
        let cells: Vec<&str> = record.iter().collect();
        trace!(row, cells = ?cells.iter().map(|cell| redact_value(cell)).collect::<Vec<_>>(), "row");

        let values = table.validate_row(row, &cells, &mut diagnostics);
        for (summary, value) in columns.iter_mut().zip(&values) {
            summary.record(value);
        }
        rows = row;
    }

    info!(
        rows,
        errors = diagnostics.error_count(),
        warnings = diagnostics.warning_count(),
        "validation finished"
    );
    Ok(ValidationReport {
        rows,
        columns,
        diagnostics,
    })
}

/// Validate the CSV file at `path`.
pub fn validate_file(
    path: &Path,
    table: &TableValidator,
    options: &ValidationOptions,
) -> Result<ValidationReport> {
    let span = info_span!("check", file = %path.display());
    let _guard = span.enter();
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    validate_reader(file, table, options)
}
