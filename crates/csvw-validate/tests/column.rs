//! Cell validation through compiled columns.

use csvw_model::{
    CellValue, Column, Datatype, DatatypeDescriptor, DiagnosticCollector, DiagnosticKind,
    FormatSpec, Number, ParsedValue, Value,
};
use csvw_validate::{ColumnError, ColumnValidator};

fn validator(column: Column) -> ColumnValidator {
    ColumnValidator::new(column).expect("column compiles")
}

fn kinds(collector: &DiagnosticCollector) -> Vec<String> {
    collector.iter().map(|d| d.kind.to_string()).collect()
}

// === Facet Ordering ===

#[test]
fn short_required_value_reports_only_min_length() {
    let validator = validator(
        Column::new(1, DatatypeDescriptor::new(Datatype::String).with_min_length(3))
            .with_required(true),
    );
    let mut collector = DiagnosticCollector::new();
    let value = validator.validate(Some("ab"), Some(2), &mut collector);

    assert_eq!(value, CellValue::Single(ParsedValue::Invalid("ab".to_string())));
    assert_eq!(kinds(&collector), ["min_length"]);
    let diagnostic = &collector.errors()[0];
    assert_eq!(diagnostic.row, Some(2));
    assert_eq!(diagnostic.column, Some(1));
    assert_eq!(diagnostic.content.as_deref(), Some("ab"));
}

#[test]
fn every_failing_facet_is_reported() {
    let validator = validator(Column::new(
        3,
        DatatypeDescriptor::new(Datatype::String)
            .with_pattern("^[0-9]+$")
            .with_length(4)
            .with_max_length(4),
    ));
    let mut collector = DiagnosticCollector::new();
    validator.validate(Some("abcdef"), Some(1), &mut collector);
    assert_eq!(kinds(&collector), ["format", "length", "max_length"]);
}

#[test]
fn length_is_measured_on_the_trimmed_token() {
    let token = validator(Column::new(
        1,
        DatatypeDescriptor::new(Datatype::Token)
            .with_pattern("^ab$")
            .with_max_length(2),
    ));
    let mut collector = DiagnosticCollector::new();
    let value = token.validate(Some(" ab "), Some(1), &mut collector);
    assert_eq!(
        value,
        CellValue::Single(ParsedValue::Valid(Value::String("ab".to_string())))
    );
    assert!(collector.is_empty(), "{:?}", kinds(&collector));

    let hex = validator(Column::new(
        2,
        DatatypeDescriptor::new(Datatype::HexBinary).with_length(2),
    ));
    hex.validate(Some(" 0FB7 "), Some(1), &mut collector);
    assert!(collector.is_empty());

    let string = validator(Column::new(
        3,
        DatatypeDescriptor::new(Datatype::String).with_max_length(2),
    ));
    string.validate(Some(" ab "), Some(1), &mut collector);
    assert_eq!(kinds(&collector), ["max_length"]);
}

#[test]
fn wide_integer_bounds_compare_exactly() {
    let validator = validator(Column::new(
        1,
        DatatypeDescriptor::new(Datatype::Integer)
            .with_min_inclusive("100000000000000000000000000000000000000000"),
    ));
    let mut collector = DiagnosticCollector::new();
    validator.validate(
        Some("100000000000000000000000000000000000000001"),
        Some(1),
        &mut collector,
    );
    assert!(collector.is_empty());
    validator.validate(
        Some("99999999999999999999999999999999999999999"),
        Some(2),
        &mut collector,
    );
    assert_eq!(kinds(&collector), ["min_inclusive"]);
}

#[test]
fn format_regex_is_searched_not_anchored() {
    let validator = validator(Column::new(
        1,
        DatatypeDescriptor::new(Datatype::String).with_pattern("[0-9]{3}"),
    ));
    let mut collector = DiagnosticCollector::new();
    let value = validator.validate(Some("abc123def"), Some(1), &mut collector);
    assert!(value.is_valid());
    assert!(collector.is_empty());
}

// === Nulls and Defaults ===

#[test]
fn missing_required_value() {
    let validator = validator(
        Column::new(1, DatatypeDescriptor::new(Datatype::Integer)).with_required(true),
    );
    let mut collector = DiagnosticCollector::new();
    assert_eq!(validator.validate(Some(""), Some(1), &mut collector), CellValue::Null);
    assert_eq!(kinds(&collector), ["missing_value"]);
}

#[test]
fn optional_null_is_silent() {
    let validator = validator(Column::new(1, DatatypeDescriptor::new(Datatype::Date)));
    let mut collector = DiagnosticCollector::new();
    assert_eq!(validator.validate(None, Some(1), &mut collector), CellValue::Null);
    assert!(collector.is_empty());
}

#[test]
fn whole_cell_null_suppresses_splitting() {
    let validator = validator(
        Column::new(1, DatatypeDescriptor::new(Datatype::Integer))
            .with_separator(" ")
            .with_nulls(["n/a"]),
    );
    let mut collector = DiagnosticCollector::new();
    assert_eq!(validator.validate(Some("n/a"), Some(1), &mut collector), CellValue::Null);

    let value = validator.validate(Some("1 n/a"), Some(2), &mut collector);
    assert_eq!(
        value,
        CellValue::List(vec![
            ParsedValue::Valid(Value::Number(Number::Integer(1))),
            ParsedValue::Invalid("n/a".to_string()),
        ])
    );
    assert_eq!(kinds(&collector), ["invalid_integer"]);
}

// === Lists ===

#[test]
fn separator_splits_into_tokens() {
    let validator = validator(
        Column::new(1, DatatypeDescriptor::new(Datatype::UnsignedByte).with_max_inclusive(100))
            .with_separator(";"),
    );
    let mut collector = DiagnosticCollector::new();
    let value = validator.validate(Some("1;200;x"), Some(4), &mut collector);

    let CellValue::List(values) = value else {
        panic!("expected a list, got {value:?}");
    };
    assert_eq!(values.len(), 3);
    assert!(values[0].is_valid());
    assert!(!values[1].is_valid());
    assert!(!values[2].is_valid());
    assert_eq!(kinds(&collector), ["max_inclusive", "invalid_unsignedByte"]);
}

// === Datatype Failures ===

#[test]
fn datatype_failure_carries_descriptor() {
    let validator = validator(Column::new(
        2,
        DatatypeDescriptor::new(Datatype::Short).with_min_inclusive(0),
    ));
    let mut collector = DiagnosticCollector::new();
    validator.validate(Some("40000"), Some(9), &mut collector);
    insta::assert_json_snapshot!(collector.errors(), @r#"
    [
      {
        "kind": "invalid_short",
        "category": "schema",
        "severity": "error",
        "row": 9,
        "column": 2,
        "content": "40000",
        "constraints": {
          "datatype": {
            "base": "short",
            "minInclusive": 0
          }
        }
      }
    ]
    "#);
}

#[test]
fn unsigned_byte_column_boundaries() {
    let validator = validator(Column::new(1, DatatypeDescriptor::new(Datatype::UnsignedByte)));
    let mut collector = DiagnosticCollector::new();
    for value in ["0", "255"] {
        assert!(validator.validate(Some(value), Some(1), &mut collector).is_valid());
    }
    for value in ["256", "-1"] {
        assert!(!validator.validate(Some(value), Some(1), &mut collector).is_valid());
    }
    assert_eq!(collector.error_count(), 2);
}

#[test]
fn temporal_range_compares_instants() {
    let validator = validator(Column::new(
        1,
        DatatypeDescriptor::new(Datatype::DateTime).with_min_exclusive("2015-01-01T00:00:00Z"),
    ));
    let mut collector = DiagnosticCollector::new();
    assert!(
        !validator
            .validate(Some("2015-01-01T01:00:00+01:00"), Some(1), &mut collector)
            .is_valid()
    );
    assert!(
        validator
            .validate(Some("2015-01-01T01:00:00Z"), Some(2), &mut collector)
            .is_valid()
    );
    assert_eq!(kinds(&collector), ["min_exclusive"]);
}

#[test]
fn numeric_format_object_sets_separators() {
    let validator = validator(Column::new(
        1,
        DatatypeDescriptor::new(Datatype::Decimal).with_format(FormatSpec::Numeric {
            pattern: Some("#.##0,0#".to_string()),
            group_char: Some('.'),
            decimal_char: Some(','),
        }),
    ));
    let mut collector = DiagnosticCollector::new();
    assert_eq!(
        validator.validate(Some("1.234,5"), Some(1), &mut collector),
        CellValue::Single(ParsedValue::Valid(Value::Number(Number::Float(1234.5))))
    );
}

#[test]
fn empty_string_is_handled_for_every_datatype() {
    for datatype in Datatype::ALL {
        let validator = validator(
            Column::new(1, DatatypeDescriptor::new(datatype)).with_nulls(Vec::<String>::new()),
        );
        let mut collector = DiagnosticCollector::new();
        let value = validator.validate(Some(""), Some(1), &mut collector);
        let CellValue::Single(parsed) = value else {
            panic!("{datatype}: expected a single value");
        };
        assert_eq!(parsed.is_valid(), collector.is_empty(), "{datatype}");
        assert!(
            collector
                .iter()
                .all(|d| d.kind == DiagnosticKind::InvalidValue(datatype)),
            "{datatype}"
        );
    }
}

// === Construction Errors ===

#[test]
fn inconsistent_descriptor_is_rejected() {
    let column = Column::new(
        1,
        DatatypeDescriptor::new(Datatype::String)
            .with_length(2)
            .with_min_length(5),
    )
    .with_name("code");
    let error = ColumnValidator::new(column).unwrap_err();
    assert!(matches!(error, ColumnError::Descriptor { .. }));
    assert_eq!(error.column(), "code");
}

#[test]
fn boolean_format_needs_two_literals() {
    let column = Column::new(1, DatatypeDescriptor::new(Datatype::Boolean).with_pattern("yes"));
    assert!(matches!(
        ColumnValidator::new(column),
        Err(ColumnError::BooleanFormat { .. })
    ));
}

#[test]
fn bad_number_pattern_is_rejected_at_compile_time() {
    let column = Column::new(1, DatatypeDescriptor::new(Datatype::Decimal).with_pattern("abc"));
    let error = ColumnValidator::new(column).unwrap_err();
    assert!(matches!(error, ColumnError::Format { .. }));
}

#[test]
fn bad_regex_is_rejected_at_compile_time() {
    let column = Column::new(1, DatatypeDescriptor::new(Datatype::String).with_pattern("(["));
    assert!(matches!(
        ColumnValidator::new(column),
        Err(ColumnError::Regex { .. })
    ));
}
