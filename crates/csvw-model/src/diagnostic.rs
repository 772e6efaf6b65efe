//! Structured validation diagnostics and the per-run collector.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::datatype::Datatype;
use crate::descriptor::{DatatypeDescriptor, FacetBound};

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticKind {
    // === Facet Failures ===
    MissingValue,
    MinLength,
    MaxLength,
    Length,
    Format,
    MinInclusive,
    MaxInclusive,
    MinExclusive,
    MaxExclusive,

    // === Datatype Failures ===
    /// Value is not in the lexical or value space of the datatype.
    InvalidValue(Datatype),

    // === Row Shape ===
    MissingColumn,
    ExtraColumn,
}

impl DiagnosticKind {
    /// Stable machine-readable code, e.g. `min_length` or `invalid_unsignedByte`.
    pub fn code(&self) -> Cow<'static, str> {
        let code = match self {
            Self::MissingValue => "missing_value",
            Self::MinLength => "min_length",
            Self::MaxLength => "max_length",
            Self::Length => "length",
            Self::Format => "format",
            Self::MinInclusive => "min_inclusive",
            Self::MaxInclusive => "max_inclusive",
            Self::MinExclusive => "min_exclusive",
            Self::MaxExclusive => "max_exclusive",
            Self::InvalidValue(datatype) => {
                return Cow::Owned(format!("invalid_{}", datatype.name()));
            }
            Self::MissingColumn => "missing_column",
            Self::ExtraColumn => "extra_column",
        };
        Cow::Borrowed(code)
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

impl Serialize for DiagnosticKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Schema,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// The constraint a diagnostic was raised against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Constraint {
    Required,
    Length(usize),
    MinLength(usize),
    MaxLength(usize),
    Format(String),
    MinInclusive(FacetBound),
    MaxInclusive(FacetBound),
    MinExclusive(FacetBound),
    MaxExclusive(FacetBound),
    Datatype(DatatypeDescriptor),
    /// Number of columns declared by the schema.
    Columns(usize),
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub category: Category,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraint>,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind) -> Self {
        Self::new(kind, Severity::Error)
    }

    pub fn warning(kind: DiagnosticKind) -> Self {
        Self::new(kind, Severity::Warning)
    }

    fn new(kind: DiagnosticKind, severity: Severity) -> Self {
        Self {
            kind,
            category: Category::Schema,
            severity,
            row: None,
            column: None,
            content: None,
            constraints: None,
        }
    }

    pub fn at(mut self, row: Option<usize>, column: Option<usize>) -> Self {
        self.row = row;
        self.column = column;
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints = Some(constraint);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        match (self.row, self.column) {
            (Some(row), Some(column)) => write!(f, " at row {row}, column {column}")?,
            (Some(row), None) => write!(f, " at row {row}")?,
            (None, Some(column)) => write!(f, " in column {column}")?,
            (None, None) => {}
        }
        if let Some(content) = &self.content {
            write!(f, ": {content:?}")?;
        }
        Ok(())
    }
}

/// Append-only sink for the diagnostics of one validation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiagnosticCollector {
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.errors.push(diagnostic),
            Severity::Warning => self.warnings.push(diagnostic),
        }
    }

    /// Move every diagnostic of `other` into this collector.
    pub fn extend(&mut self, other: DiagnosticCollector) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Errors followed by warnings.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter().chain(self.warnings.iter())
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// A run is valid when it produced no errors. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Occurrences per diagnostic code.
    pub fn count_by_kind(&self) -> BTreeMap<DiagnosticKind, usize> {
        let mut counts = BTreeMap::new();
        for diagnostic in self.iter() {
            *counts.entry(diagnostic.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Forget everything collected so far.
    pub fn reset(&mut self) {
        self.errors.clear();
        self.warnings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datatype_codes_use_local_name() {
        assert_eq!(
            DiagnosticKind::InvalidValue(Datatype::UnsignedByte).code(),
            "invalid_unsignedByte"
        );
        assert_eq!(
            DiagnosticKind::InvalidValue(Datatype::DateTime).code(),
            "invalid_dateTime"
        );
        assert_eq!(DiagnosticKind::MinLength.code(), "min_length");
    }

    #[test]
    fn collector_routes_by_severity_and_resets() {
        let mut collector = DiagnosticCollector::new();
        collector.push(Diagnostic::error(DiagnosticKind::Format).at(Some(2), Some(1)));
        collector.push(Diagnostic::warning(DiagnosticKind::ExtraColumn).at(Some(2), None));
        assert_eq!(collector.error_count(), 1);
        assert_eq!(collector.warning_count(), 1);
        assert!(!collector.is_valid());

        collector.reset();
        assert!(collector.is_empty());
        assert!(collector.is_valid());
    }

    #[test]
    fn display_includes_position_and_content() {
        let diagnostic = Diagnostic::error(DiagnosticKind::MinLength)
            .at(Some(3), Some(2))
            .with_content("ab");
        assert_eq!(diagnostic.to_string(), "min_length at row 3, column 2: \"ab\"");
    }
}
