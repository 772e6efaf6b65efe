//! CSV checking through the library entry points.

use csvw_cli::check::{ValidationOptions, validate_reader};
use csvw_cli::schema::parse_schema;
use csvw_model::{Datatype, DiagnosticKind};
use csvw_validate::TableValidator;

const SCHEMA: &str = r#"{
    "columns": [
        {"name": "id", "datatype": "integer", "required": true},
        {"name": "score", "datatype": {"base": "decimal", "minInclusive": 0, "maxInclusive": 100}},
        {"name": "tags", "datatype": "NMTOKEN", "separator": " "}
    ]
}"#;

fn table() -> TableValidator {
    TableValidator::new(parse_schema(SCHEMA).expect("schema parses")).expect("schema compiles")
}

#[test]
fn bare_and_metadata_schemas_agree() {
    let metadata = format!(r#"{{"url": "scores.csv", "tableSchema": {SCHEMA}}}"#);
    let bare = parse_schema(SCHEMA).expect("bare schema");
    let wrapped = parse_schema(&metadata).expect("metadata schema");
    assert_eq!(bare, wrapped);
    assert_eq!(bare[2].separator.as_deref(), Some(" "));
}

#[test]
fn schema_errors_carry_context() {
    let error = parse_schema(r#"{"columns": [{"datatype": "integr"}]}"#).unwrap_err();
    assert!(error.to_string().contains("invalid table schema"));

    let error = parse_schema("not json").unwrap_err();
    assert_eq!(error.to_string(), "schema is not valid JSON");
}

#[test]
fn header_row_is_skipped() {
    let csv = "id,score,tags\n1,99.5,a b\n2,,c\n";
    let report = validate_reader(csv.as_bytes(), &table(), &ValidationOptions::default())
        .expect("csv reads");

    assert_eq!(report.rows, 2);
    assert!(!report.has_errors());
    assert_eq!(report.columns[0].valid, 2);
    assert_eq!(report.columns[1].valid, 1);
    assert_eq!(report.columns[1].null, 1);
    assert_eq!(report.columns[2].label, "tags");
}

#[test]
fn failures_are_located_by_row_and_column() {
    let csv = "id;score;tags\nx;50;a\n3;101;b\n;7;c\n";
    let options = ValidationOptions {
        delimiter: b';',
        ..ValidationOptions::default()
    };
    let report = validate_reader(csv.as_bytes(), &table(), &options).expect("csv reads");

    assert!(report.has_errors());
    let errors: Vec<_> = report
        .diagnostics
        .errors()
        .iter()
        .map(|diagnostic| (diagnostic.kind, diagnostic.row, diagnostic.column))
        .collect();
    assert_eq!(
        errors,
        [
            (DiagnosticKind::InvalidValue(Datatype::Integer), Some(1), Some(1)),
            (DiagnosticKind::MaxInclusive, Some(2), Some(2)),
            (DiagnosticKind::MissingValue, Some(3), Some(1)),
        ]
    );
    assert_eq!(report.columns[0].invalid, 1);
    assert_eq!(report.columns[0].null, 1);
    assert_eq!(report.columns[1].invalid, 1);
}

#[test]
fn headerless_input_and_row_limit() {
    let csv = "1,1,a\n2,2,b\n3,3,c\n";
    let options = ValidationOptions {
        header: false,
        max_rows: Some(2),
        ..ValidationOptions::default()
    };
    let report = validate_reader(csv.as_bytes(), &table(), &options).expect("csv reads");
    assert_eq!(report.rows, 2);
    assert_eq!(report.columns[0].valid, 2);
}

#[test]
fn ragged_rows_produce_warnings() {
    let csv = "id,score,tags\n1,2\n3,4,d,extra\n";
    let report = validate_reader(csv.as_bytes(), &table(), &ValidationOptions::default())
        .expect("csv reads");

    assert!(!report.has_errors());
    let warnings: Vec<_> = report
        .diagnostics
        .warnings()
        .iter()
        .map(|diagnostic| diagnostic.to_string())
        .collect();
    insta::assert_debug_snapshot!(warnings, @r#"
    [
        "missing_column at row 1, column 3",
        "extra_column at row 2, column 4: \"extra\"",
    ]
    "#);
}
