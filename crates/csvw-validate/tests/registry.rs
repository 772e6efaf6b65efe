//! Value parsing per datatype.

use csvw_model::{Column, Datatype, DatatypeDescriptor, DiagnosticKind, Number, Value};
use csvw_validate::CompiledFormat;
use csvw_validate::registry::parse;
use proptest::prelude::*;

fn parse_default(datatype: Datatype, value: &str) -> Result<Value, DiagnosticKind> {
    parse(datatype, value, &CompiledFormat::None)
}

fn accepts(datatype: Datatype, value: &str) -> bool {
    parse_default(datatype, value).is_ok()
}

fn compiled(descriptor: DatatypeDescriptor) -> CompiledFormat {
    CompiledFormat::compile(&Column::new(1, descriptor)).expect("format compiles")
}

// === Textual Types ===

#[test]
fn string_family_lexical_spaces() {
    assert!(accepts(Datatype::String, " padded\tvalue "));
    assert!(accepts(Datatype::AnyAtomicType, "anything"));
    assert!(accepts(Datatype::NormalizedString, "one line"));
    assert!(!accepts(Datatype::NormalizedString, "two\nlines"));
    assert!(accepts(Datatype::Token, "a b"));
    assert!(!accepts(Datatype::Token, "a  b"));
    assert!(accepts(Datatype::Language, "en-GB"));
    assert!(!accepts(Datatype::Language, "english language"));
    assert!(accepts(Datatype::Name, "_x.1"));
    assert!(!accepts(Datatype::Name, "1x"));
    assert!(accepts(Datatype::NmToken, "1x"));
    assert!(accepts(Datatype::QName, "xsd:string"));
    assert!(!accepts(Datatype::QName, "a:b:c"));
    assert!(accepts(Datatype::AnyUri, "http://example.org/a?b=1#c"));
    assert!(!accepts(Datatype::AnyUri, "£123"));
}

#[test]
fn binary_alphabets() {
    assert!(accepts(Datatype::Base64Binary, "AQID"));
    assert!(accepts(Datatype::Base64Binary, "AQI="));
    assert!(!accepts(Datatype::Base64Binary, "AQI"));
    assert!(accepts(Datatype::HexBinary, "0fB7"));
    assert!(!accepts(Datatype::HexBinary, "0fB"));
    assert!(!accepts(Datatype::HexBinary, "zz"));
}

// === Booleans ===

#[test]
fn boolean_defaults_and_custom_literals() {
    assert_eq!(parse_default(Datatype::Boolean, "1"), Ok(Value::Boolean(true)));
    assert_eq!(parse_default(Datatype::Boolean, "false"), Ok(Value::Boolean(false)));
    assert!(!accepts(Datatype::Boolean, "yes"));

    let format = compiled(DatatypeDescriptor::new(Datatype::Boolean).with_pattern("Y|N"));
    assert_eq!(parse(Datatype::Boolean, "Y", &format), Ok(Value::Boolean(true)));
    assert_eq!(parse(Datatype::Boolean, "N", &format), Ok(Value::Boolean(false)));
    assert!(parse(Datatype::Boolean, "true", &format).is_err());
}

// === Numbers ===

#[test]
fn decimal_rejects_exponents_and_special_values() {
    assert_eq!(
        parse_default(Datatype::Decimal, "-1.25"),
        Ok(Value::Number(Number::Float(-1.25)))
    );
    for value in ["1E3", "1e3", "NaN", "INF", "-INF"] {
        assert_eq!(
            parse_default(Datatype::Decimal, value),
            Err(DiagnosticKind::InvalidValue(Datatype::Decimal)),
            "{value}"
        );
    }
}

#[test]
fn decimal_affixes_may_contain_exponent_letters() {
    let euros = compiled(DatatypeDescriptor::new(Datatype::Decimal).with_pattern("0.00 EUR"));
    assert_eq!(
        parse(Datatype::Decimal, "12.50 EUR", &euros),
        Ok(Value::Number(Number::Float(12.5)))
    );
    assert!(parse(Datatype::Decimal, "12.5 EUR", &euros).is_err());

    let each = compiled(DatatypeDescriptor::new(Datatype::Decimal).with_pattern("0 each"));
    assert_eq!(
        parse(Datatype::Decimal, "3 each", &each),
        Ok(Value::Number(Number::Integer(3)))
    );

    let scientific = compiled(DatatypeDescriptor::new(Datatype::Decimal).with_pattern("0.0E0"));
    assert_eq!(
        parse(Datatype::Decimal, "1.5E3", &scientific),
        Err(DiagnosticKind::InvalidValue(Datatype::Decimal))
    );
}

#[test]
fn double_accepts_exponents_and_special_values() {
    assert_eq!(
        parse_default(Datatype::Double, "1E3"),
        Ok(Value::Number(Number::Float(1000.0)))
    );
    assert!(accepts(Datatype::Double, "INF"));
    assert!(accepts(Datatype::Float, "NaN"));
}

#[test]
fn integer_types_apply_fixed_bounds() {
    let cases = [
        (Datatype::Short, "-32768", true),
        (Datatype::Short, "32768", false),
        (Datatype::Int, "2147483647", true),
        (Datatype::Int, "2147483648", false),
        (Datatype::Long, "-9223372036854775809", false),
        (Datatype::UnsignedLong, "18446744073709551615", true),
        (Datatype::UnsignedShort, "-1", false),
        (Datatype::NonNegativeInteger, "0", true),
        (Datatype::NonPositiveInteger, "1", false),
        (Datatype::Integer, "1.5", false),
        (Datatype::Integer, "99999999999999999999", true),
    ];
    for (datatype, value, valid) in cases {
        assert_eq!(accepts(datatype, value), valid, "{datatype} {value}");
    }
}

#[test]
fn unbounded_integer_types_accept_any_width() {
    let wide = "1234567890123456789012345678901234567890";
    let parsed = parse_default(Datatype::Integer, wide).expect("wide integer");
    assert_eq!(parsed.to_string(), wide);
    assert!(matches!(parsed, Value::Number(Number::BigInteger(_))));

    assert!(accepts(Datatype::NonNegativeInteger, wide));
    assert!(accepts(Datatype::PositiveInteger, &format!("+{wide}")));
    assert!(accepts(Datatype::NegativeInteger, &format!("-{wide}")));
    assert!(accepts(Datatype::NonPositiveInteger, &format!("-{wide}")));
    assert!(!accepts(Datatype::NonPositiveInteger, wide));
    assert!(!accepts(Datatype::NegativeInteger, wide));
    assert!(!accepts(Datatype::UnsignedLong, wide));
    assert!(!accepts(Datatype::Long, &format!("-{wide}")));
}

#[test]
fn unsigned_byte_boundaries() {
    assert!(accepts(Datatype::UnsignedByte, "0"));
    assert!(accepts(Datatype::UnsignedByte, "255"));
    assert_eq!(
        parse_default(Datatype::UnsignedByte, "256"),
        Err(DiagnosticKind::InvalidValue(Datatype::UnsignedByte))
    );
    assert!(!accepts(Datatype::UnsignedByte, "-1"));
}

#[test]
fn integer_patterns_use_number_format() {
    let format = compiled(DatatypeDescriptor::new(Datatype::Int).with_pattern("#,##0"));
    assert_eq!(
        parse(Datatype::Int, "1,234", &format),
        Ok(Value::Number(Number::Integer(1234)))
    );
    assert!(parse(Datatype::Int, "1234", &format).is_err());
}

// === Temporal Types ===

#[test]
fn temporal_types_use_default_formats() {
    assert!(accepts(Datatype::Date, "2015-03-22"));
    assert!(!accepts(Datatype::Date, "2015-02-30"));
    assert!(accepts(Datatype::DateTime, "2015-03-22T10:00:00"));
    assert!(!accepts(Datatype::DateTimeStamp, "2015-03-22T10:00:00"));
    assert!(accepts(Datatype::GYear, "2015"));
    assert!(accepts(Datatype::Time, " 10:00:00 "));
}

#[test]
fn temporal_pattern_from_descriptor() {
    let format = compiled(DatatypeDescriptor::new(Datatype::Date).with_pattern("dd/MM/yyyy"));
    let value = parse(Datatype::Date, "22/03/2015", &format).expect("valid date");
    assert_eq!(value.to_string(), "2015-03-22");
}

// === Durations ===

#[test]
fn duration_types() {
    assert!(accepts(Datatype::Duration, "P1Y2M3DT4H5M6S"));
    assert!(!accepts(Datatype::Duration, "P"));
    assert!(!accepts(Datatype::Duration, "PT"));
    assert!(accepts(Datatype::DayTimeDuration, "P3DT4H"));
    assert!(!accepts(Datatype::DayTimeDuration, "P1M"));
    assert!(accepts(Datatype::YearMonthDuration, "P1Y6M"));
    assert!(!accepts(Datatype::YearMonthDuration, "PT1H"));
}

// === Properties ===

#[test]
fn empty_string_never_panics_for_any_datatype() {
    for datatype in Datatype::ALL {
        let outcome = parse_default(datatype, "");
        if let Err(kind) = outcome {
            assert_eq!(kind, DiagnosticKind::InvalidValue(datatype));
        }
    }
}

proptest! {
    #[test]
    fn registry_never_panics(index in 0..Datatype::ALL.len(), value in "\\PC{0,16}") {
        let datatype = Datatype::ALL[index];
        if let Err(kind) = parse_default(datatype, &value) {
            prop_assert_eq!(kind, DiagnosticKind::InvalidValue(datatype));
        }
    }

    #[test]
    fn unsigned_byte_accepts_exactly_its_range(value in -1000i32..1000) {
        let accepted = accepts(Datatype::UnsignedByte, &value.to_string());
        prop_assert_eq!(accepted, (0..=255).contains(&value));
    }
}
