//! Tests for csvw-model types.

use csvw_model::{
    Column, Constraint, Datatype, DatatypeDescriptor, Diagnostic, DiagnosticCollector,
    DiagnosticKind, FacetBound, FormatSpec,
};

#[test]
fn column_deserializes_from_metadata_json() {
    let json = r##"{
        "number": 2,
        "name": "price",
        "datatype": {
            "base": "decimal",
            "format": { "pattern": "#,##0.00", "groupChar": ",", "decimalChar": "." },
            "minimum": 0
        },
        "null": "NA",
        "required": true
    }"##;
    let column: Column = serde_json::from_str(json).expect("deserialize column");
    assert_eq!(column.number, 2);
    assert_eq!(column.name.as_deref(), Some("price"));
    assert_eq!(column.datatype.base, Datatype::Decimal);
    assert_eq!(column.datatype.pattern(), Some("#,##0.00"));
    assert_eq!(
        column.datatype.format.as_ref().and_then(FormatSpec::group_char),
        Some(',')
    );
    assert_eq!(column.datatype.min_inclusive, Some(FacetBound::from(0)));
    assert_eq!(column.nulls, vec!["NA".to_string()]);
    assert!(column.required);
    assert!(!column.ordered);
}

#[test]
fn column_accepts_datatype_name_shorthand() {
    let json = r#"{ "datatype": "http://www.w3.org/2001/XMLSchema#gYear", "separator": " " }"#;
    let column: Column = serde_json::from_str(json).expect("deserialize column");
    assert_eq!(column.datatype, DatatypeDescriptor::new(Datatype::GYear));
    assert_eq!(column.separator.as_deref(), Some(" "));
    assert_eq!(column.nulls, vec![String::new()]);
}

#[test]
fn unknown_datatype_fails_to_deserialize() {
    let json = r#"{ "datatype": "currency" }"#;
    let error = serde_json::from_str::<Column>(json).unwrap_err();
    assert!(error.to_string().contains("currency"), "{error}");
}

#[test]
fn date_format_stays_a_plain_pattern() {
    let json = r#"{ "base": "date", "format": "dd/MM/yyyy", "maxInclusive": "2020-12-31" }"#;
    let descriptor: DatatypeDescriptor = serde_json::from_str(json).expect("deserialize");
    assert_eq!(
        descriptor.format,
        Some(FormatSpec::Pattern("dd/MM/yyyy".to_string()))
    );
    assert_eq!(
        descriptor.max_inclusive,
        Some(FacetBound::Text("2020-12-31".to_string()))
    );
    assert!(descriptor.validate().is_ok());
}

#[test]
fn diagnostics_serialize_with_codes() {
    let mut collector = DiagnosticCollector::new();
    collector.push(
        Diagnostic::error(DiagnosticKind::InvalidValue(Datatype::Short))
            .at(Some(4), Some(1))
            .with_content("40000")
            .with_constraint(Constraint::Datatype(DatatypeDescriptor::new(
                Datatype::Short,
            ))),
    );
    insta::assert_json_snapshot!(collector.errors(), @r#"
    [
      {
        "kind": "invalid_short",
        "category": "schema",
        "severity": "error",
        "row": 4,
        "column": 1,
        "content": "40000",
        "constraints": {
          "datatype": {
            "base": "short"
          }
        }
      }
    ]
    "#);
}

#[test]
fn count_by_kind_groups_codes() {
    let mut collector = DiagnosticCollector::new();
    collector.push(Diagnostic::error(DiagnosticKind::MinLength));
    collector.push(Diagnostic::error(DiagnosticKind::MinLength));
    collector.push(Diagnostic::warning(DiagnosticKind::MissingColumn));
    let counts = collector.count_by_kind();
    assert_eq!(counts.get(&DiagnosticKind::MinLength), Some(&2));
    assert_eq!(counts.get(&DiagnosticKind::MissingColumn), Some(&1));
}
