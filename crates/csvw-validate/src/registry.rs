//! Datatype registry: one value parser per supported datatype.
//!
//! Dispatch is an exhaustive `match` over [`Datatype`], so every datatype
//! has exactly one parser. Parsers never fail hard: a value outside the
//! lexical or value space yields [`DiagnosticKind::InvalidValue`].

use std::collections::HashMap;
use std::sync::LazyLock;

use csvw_format::{DateFormat, NumberFormat};
use csvw_model::{Column, Datatype, DiagnosticKind, FormatSpec, Number, Value};
use regex::{Regex, RegexBuilder};

use crate::error::{ColumnError, Result};

/// Upper bound on the compiled size of a user-supplied format regex.
const REGEX_SIZE_LIMIT: usize = 1 << 20;

// === Lexical Space Matchers ===

static LANGUAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z]{1,8}(?:-[a-zA-Z0-9]{1,8})*$").expect("Invalid language regex")
});

static NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[:_A-Za-z][-.:_A-Za-z0-9]*$").expect("Invalid Name regex")
});

static NMTOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-.:_A-Za-z0-9]+$").expect("Invalid NMTOKEN regex"));

static QNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[_A-Za-z][-._A-Za-z0-9]*:)?[_A-Za-z][-._A-Za-z0-9]*$")
        .expect("Invalid QName regex")
});

static ANY_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9\-._~:/?#\[\]@!$&'()*+,;=%]*$").expect("Invalid anyURI regex")
});

static BASE64: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=)?$")
        .expect("Invalid base64Binary regex")
});

static HEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[0-9a-fA-F]{2})*$").expect("Invalid hexBinary regex"));

static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^-?P(?:[0-9]+Y)?(?:[0-9]+M)?(?:[0-9]+D)?(?:T(?:[0-9]+H)?(?:[0-9]+M)?(?:[0-9]+(?:\.[0-9]+)?S)?)?$",
    )
    .expect("Invalid duration regex")
});

static DAY_TIME_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?P(?:[0-9]+D)?(?:T(?:[0-9]+H)?(?:[0-9]+M)?(?:[0-9]+(?:\.[0-9]+)?S)?)?$")
        .expect("Invalid dayTimeDuration regex")
});

static YEAR_MONTH_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?P(?:[0-9]+Y)?(?:[0-9]+M)?$").expect("Invalid yearMonthDuration regex")
});

// === Fallback Formats ===

static PLAIN_NUMBER: LazyLock<NumberFormat> = LazyLock::new(|| NumberFormat::plain(None));

static PLAIN_INTEGER: LazyLock<NumberFormat> = LazyLock::new(|| NumberFormat::plain(Some(true)));

static DEFAULT_DATES: LazyLock<HashMap<Datatype, DateFormat>> = LazyLock::new(|| {
    Datatype::ALL
        .into_iter()
        .filter(|datatype| datatype.is_temporal())
        .map(|datatype| {
            let format = DateFormat::new(None, datatype).expect("Invalid default date regex");
            (datatype, format)
        })
        .collect()
});

// === Compiled Formats ===

/// The format of a column, compiled for its datatype family.
#[derive(Debug, Clone, Default)]
pub enum CompiledFormat {
    /// No format: every parser falls back to the datatype's default.
    #[default]
    None,
    /// Regular expression searched in textual values.
    Regex(Regex),
    /// Exact literals for `true` and `false`.
    Boolean {
        true_literal: String,
        false_literal: String,
    },
    Number(NumberFormat),
    Date(DateFormat),
}

impl CompiledFormat {
    /// Compile the format of `column` according to its base datatype.
    ///
    /// Numeric and temporal columns always get a compiled format, even
    /// without a pattern, so that separators and defaults are resolved once.
    pub fn compile(column: &Column) -> Result<Self> {
        let descriptor = &column.datatype;
        let datatype = descriptor.base;
        let format = descriptor.format.as_ref();
        let pattern = format.and_then(FormatSpec::pattern);
        let format_error = |source| ColumnError::Format {
            column: column.label(),
            source,
        };

        if datatype.is_numeric() {
            let integer = datatype.is_integer_family().then_some(true);
            let number = NumberFormat::compile(
                pattern,
                format.and_then(FormatSpec::group_char),
                format.and_then(FormatSpec::decimal_char),
                integer,
            )
            .map_err(format_error)?;
            return Ok(Self::Number(number));
        }
        if datatype.is_temporal() {
            let date = DateFormat::new(pattern, datatype).map_err(format_error)?;
            return Ok(Self::Date(date));
        }

        let Some(pattern) = pattern else {
            return Ok(Self::None);
        };
        if datatype == Datatype::Boolean {
            return match pattern.split('|').collect::<Vec<_>>().as_slice() {
                [true_literal, false_literal] => Ok(Self::Boolean {
                    true_literal: (*true_literal).to_string(),
                    false_literal: (*false_literal).to_string(),
                }),
                _ => Err(ColumnError::BooleanFormat {
                    column: column.label(),
                    pattern: pattern.to_string(),
                }),
            };
        }
        RegexBuilder::new(pattern)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
            .map(Self::Regex)
            .map_err(|error| ColumnError::Regex {
                column: column.label(),
                pattern: pattern.to_string(),
                message: error.to_string(),
            })
    }

    /// The format regex of a textual column.
    pub fn regex(&self) -> Option<&Regex> {
        match self {
            Self::Regex(regex) => Some(regex),
            _ => None,
        }
    }

    pub fn number(&self) -> Option<&NumberFormat> {
        match self {
            Self::Number(number) => Some(number),
            _ => None,
        }
    }

    pub fn date(&self) -> Option<&DateFormat> {
        match self {
            Self::Date(date) => Some(date),
            _ => None,
        }
    }
}

// === Parsing ===

/// Parse the [`lexical_form`] of `value` as `datatype`.
pub fn parse(
    datatype: Datatype,
    value: &str,
    format: &CompiledFormat,
) -> std::result::Result<Value, DiagnosticKind> {
    let invalid = DiagnosticKind::InvalidValue(datatype);
    let value = lexical_form(datatype, value);
    let lexical = |accepted: bool| {
        if accepted {
            Ok(Value::String(value.to_string()))
        } else {
            Err(invalid)
        }
    };

    match datatype {
        Datatype::AnyAtomicType
        | Datatype::String
        | Datatype::XmlLiteral
        | Datatype::Html
        | Datatype::Json => lexical(true),
        Datatype::NormalizedString => lexical(is_normalized(value)),
        Datatype::Token => lexical(is_token(value)),
        Datatype::Language => lexical(LANGUAGE.is_match(value)),
        Datatype::Name => lexical(NAME.is_match(value)),
        Datatype::NmToken => lexical(NMTOKEN.is_match(value)),
        Datatype::QName => lexical(QNAME.is_match(value)),
        Datatype::AnyUri => lexical(ANY_URI.is_match(value)),
        Datatype::Base64Binary => lexical(BASE64.is_match(value)),
        Datatype::HexBinary => lexical(HEX.is_match(value)),

        Datatype::Boolean => parse_boolean(value, format).ok_or(invalid),

        Datatype::Decimal => {
            let number = number_format(format, false);
            if !admits_decimal(number, value) {
                return Err(invalid);
            }
            number.parse(value).map(Value::Number).ok_or(invalid)
        }
        Datatype::Double | Datatype::Float => number_format(format, false)
            .parse(value)
            .map(Value::Number)
            .ok_or(invalid),

        Datatype::Integer
        | Datatype::Long
        | Datatype::Int
        | Datatype::Short
        | Datatype::Byte
        | Datatype::NonNegativeInteger
        | Datatype::PositiveInteger
        | Datatype::UnsignedLong
        | Datatype::UnsignedInt
        | Datatype::UnsignedShort
        | Datatype::UnsignedByte
        | Datatype::NonPositiveInteger
        | Datatype::NegativeInteger => parse_integer(datatype, value, format).ok_or(invalid),

        Datatype::Date
        | Datatype::DateTime
        | Datatype::DateTimeStamp
        | Datatype::Time
        | Datatype::GDay
        | Datatype::GMonth
        | Datatype::GMonthDay
        | Datatype::GYear
        | Datatype::GYearMonth => {
            let date = match format.date() {
                Some(date) => date,
                None => DEFAULT_DATES.get(&datatype).ok_or(invalid)?,
            };
            date.parse(value).map(Value::Temporal).ok_or(invalid)
        }

        Datatype::Duration => parse_duration(&DURATION, value).ok_or(invalid),
        Datatype::DayTimeDuration => parse_duration(&DAY_TIME_DURATION, value).ok_or(invalid),
        Datatype::YearMonthDuration => {
            parse_duration(&YEAR_MONTH_DURATION, value).ok_or(invalid)
        }
    }
}

/// The text a value of `datatype` is parsed and measured from: trimmed,
/// except for datatypes whose value is the literal text.
pub fn lexical_form(datatype: Datatype, value: &str) -> &str {
    if preserves_whitespace(datatype) {
        value
    } else {
        value.trim()
    }
}

fn preserves_whitespace(datatype: Datatype) -> bool {
    matches!(
        datatype,
        Datatype::AnyAtomicType
            | Datatype::String
            | Datatype::NormalizedString
            | Datatype::XmlLiteral
            | Datatype::Html
            | Datatype::Json
    )
}

fn is_normalized(value: &str) -> bool {
    !value.contains(['\r', '\n', '\t'])
}

fn is_token(value: &str) -> bool {
    is_normalized(value)
        && !value.starts_with(' ')
        && !value.ends_with(' ')
        && !value.contains("  ")
}

fn parse_boolean(value: &str, format: &CompiledFormat) -> Option<Value> {
    let flag = match format {
        CompiledFormat::Boolean {
            true_literal,
            false_literal,
        } => {
            if value == true_literal {
                true
            } else if value == false_literal {
                false
            } else {
                return None;
            }
        }
        _ => match value {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => return None,
        },
    };
    Some(Value::Boolean(flag))
}

fn number_format(format: &CompiledFormat, integer: bool) -> &NumberFormat {
    match format.number() {
        Some(number) => number,
        None if integer => &*PLAIN_INTEGER,
        None => &*PLAIN_NUMBER,
    }
}

/// Decimals have no exponent form and no special values. A pattern only
/// matches an exponent when it declares one; the affixes are literal text.
fn admits_decimal(number: &NumberFormat, value: &str) -> bool {
    if number.pattern().is_some() {
        number.max_exponent() == 0
    } else {
        !value.contains(['e', 'E']) && !matches!(value, "NaN" | "INF" | "-INF")
    }
}

/// Integer parse followed by the fixed bounds of the datatype.
///
/// Unbounded types accept integers of any width.
fn parse_integer(datatype: Datatype, value: &str, format: &CompiledFormat) -> Option<Value> {
    let integer = number_format(format, true).parse(value)?.to_integer()?;
    if let Some((min, max)) = datatype.integer_bounds()
        && (min.is_some_and(|min| integer < Number::Integer(min))
            || max.is_some_and(|max| integer > Number::Integer(max)))
    {
        return None;
    }
    Some(Value::Number(integer))
}

/// A duration needs at least one component and no dangling `T`.
fn parse_duration(matcher: &Regex, value: &str) -> Option<Value> {
    if !matcher.is_match(value) || value.ends_with(['P', 'T']) {
        return None;
    }
    Some(Value::Duration(value.to_string()))
}
