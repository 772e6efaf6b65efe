//! Value range facets.
//!
//! Bounds are converted to typed values once, when the column is compiled.
//! Numbers compare numerically and temporal values by their UTC instant.

use std::cmp::Ordering;

use csvw_format::{DateFormat, NumberFormat};
use csvw_model::{Column, Constraint, Diagnostic, DiagnosticKind, FacetBound, Value};

use super::Cell;
use crate::error::{ColumnError, Result};

/// A declared bound with its typed value.
#[derive(Debug, Clone)]
pub(crate) struct Bound {
    declared: FacetBound,
    value: Value,
}

/// Typed range facets of a column.
#[derive(Debug, Clone, Default)]
pub(crate) struct Bounds {
    min_inclusive: Option<Bound>,
    max_inclusive: Option<Bound>,
    min_exclusive: Option<Bound>,
    max_exclusive: Option<Bound>,
}

impl Bounds {
    pub fn compile(column: &Column) -> Result<Self> {
        let descriptor = &column.datatype;
        let bounds = Self {
            min_inclusive: typed_bound(column, "minInclusive", descriptor.min_inclusive.as_ref())?,
            max_inclusive: typed_bound(column, "maxInclusive", descriptor.max_inclusive.as_ref())?,
            min_exclusive: typed_bound(column, "minExclusive", descriptor.min_exclusive.as_ref())?,
            max_exclusive: typed_bound(column, "maxExclusive", descriptor.max_exclusive.as_ref())?,
        };

        let lower = bounds.min_inclusive.as_ref().or(bounds.min_exclusive.as_ref());
        let upper = bounds.max_inclusive.as_ref().or(bounds.max_exclusive.as_ref());
        if let (Some(lower), Some(upper)) = (lower, upper)
            && compare(&lower.value, &upper.value) == Some(Ordering::Greater)
        {
            return Err(ColumnError::BoundsOutOfOrder {
                column: column.label(),
                min: lower.declared.to_string(),
                max: upper.declared.to_string(),
            });
        }
        Ok(bounds)
    }

    pub fn is_empty(&self) -> bool {
        self.min_inclusive.is_none()
            && self.max_inclusive.is_none()
            && self.min_exclusive.is_none()
            && self.max_exclusive.is_none()
    }
}

fn typed_bound(
    column: &Column,
    facet: &'static str,
    bound: Option<&FacetBound>,
) -> Result<Option<Bound>> {
    let Some(bound) = bound else {
        return Ok(None);
    };
    let datatype = column.datatype.base;
    let text = bound.to_string();
    let value = if datatype.is_temporal() {
        DateFormat::new(None, datatype)
            .ok()
            .and_then(|format| format.parse(&text))
            .map(Value::Temporal)
    } else {
        NumberFormat::plain(None).parse(&text).map(Value::Number)
    };
    match value {
        Some(value) => Ok(Some(Bound {
            declared: bound.clone(),
            value,
        })),
        None => Err(ColumnError::InvalidBound {
            column: column.label(),
            facet,
            bound: text,
            datatype,
        }),
    }
}

/// Order of two values of the same family; `None` when incomparable.
pub(crate) fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => left.partial_cmp(right),
        (Value::Temporal(left), Value::Temporal(right)) => left.partial_cmp(right),
        _ => None,
    }
}

pub(crate) fn check(cell: &Cell<'_>, bounds: &Bounds, value: &Value) -> Vec<Diagnostic> {
    if bounds.is_empty() {
        return Vec::new();
    }
    let mut diagnostics = Vec::new();
    let mut test = |bound: &Option<Bound>,
                    kind: DiagnosticKind,
                    constraint: fn(FacetBound) -> Constraint,
                    violated: fn(Ordering) -> bool| {
        if let Some(bound) = bound
            && compare(value, &bound.value).is_some_and(violated)
        {
            diagnostics.push(cell.error(kind, constraint(bound.declared.clone())));
        }
    };

    test(
        &bounds.min_inclusive,
        DiagnosticKind::MinInclusive,
        Constraint::MinInclusive,
        |order| order == Ordering::Less,
    );
    test(
        &bounds.max_inclusive,
        DiagnosticKind::MaxInclusive,
        Constraint::MaxInclusive,
        |order| order == Ordering::Greater,
    );
    test(
        &bounds.min_exclusive,
        DiagnosticKind::MinExclusive,
        Constraint::MinExclusive,
        |order| order != Ordering::Greater,
    );
    test(
        &bounds.max_exclusive,
        DiagnosticKind::MaxExclusive,
        Constraint::MaxExclusive,
        |order| order != Ordering::Less,
    );
    diagnostics
}
