//! Typed cell values.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};
use serde::{Serialize, Serializer};

/// A parsed numeric value.
///
/// Integers that do not fit in `i128` are kept exactly as [`BigInt`];
/// [`Number::from`] picks the narrowest variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i128),
    #[serde(serialize_with = "serialize_display")]
    BigInteger(BigInt),
    Float(f64),
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Integer(value) => *value as f64,
            Self::BigInteger(value) => value.to_f64().unwrap_or(f64::NAN),
            Self::Float(value) => *value,
        }
    }

    /// The same number as an exact integer, when it has no fractional part.
    pub fn to_integer(&self) -> Option<Number> {
        match self {
            Self::Integer(_) | Self::BigInteger(_) => Some(self.clone()),
            Self::Float(value) if value.is_finite() && value.fract() == 0.0 => {
                BigInt::from_f64(*value).map(Self::from)
            }
            Self::Float(_) => None,
        }
    }

    fn to_big_integer(&self) -> Option<BigInt> {
        match self {
            Self::Integer(value) => Some(BigInt::from(*value)),
            Self::BigInteger(value) => Some(value.clone()),
            Self::Float(_) => None,
        }
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        match i128::try_from(&value) {
            Ok(narrow) => Self::Integer(narrow),
            Err(_) => Self::BigInteger(value),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::BigInteger(_), _) | (_, Self::BigInteger(_)) => {
                match (self.to_big_integer(), other.to_big_integer()) {
                    (Some(a), Some(b)) => Some(a.cmp(&b)),
                    _ => self.as_f64().partial_cmp(&other.as_f64()),
                }
            }
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::BigInteger(value) => write!(f, "{value}"),
            Self::Float(value) if value.is_nan() => f.write_str("NaN"),
            Self::Float(value) if value.is_infinite() => {
                f.write_str(if *value > 0.0 { "INF" } else { "-INF" })
            }
            Self::Float(value) => write!(f, "{value}"),
        }
    }
}

fn serialize_display<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Which calendar fields a temporal value is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TemporalKind {
    /// Year, month and day.
    Date,
    /// Full date plus a time of day.
    DateTime,
    /// Time of day only.
    Time,
    /// Any other subset, such as a year or a month-day.
    Partial,
}

/// Point on the timeline backing a temporal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalPoint {
    Date(NaiveDate),
    Local(NaiveDateTime),
    Zoned(DateTime<FixedOffset>),
}

impl TemporalPoint {
    /// UTC-normalized instant used to order values; naive points are taken as UTC.
    pub fn instant(&self) -> NaiveDateTime {
        match self {
            Self::Date(date) => date.and_time(NaiveTime::MIN),
            Self::Local(datetime) => *datetime,
            Self::Zoned(datetime) => datetime.naive_utc(),
        }
    }
}

/// A parsed date, time, date-time or Gregorian partial value.
#[derive(Debug, Clone, PartialEq)]
pub struct Temporal {
    pub kind: TemporalKind,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    /// Seconds including any fractional part.
    pub second: Option<f64>,
    /// Offset normalized to `+HH:MM`.
    pub timezone: Option<String>,
    pub point: TemporalPoint,
    /// Canonical lexical form.
    pub lexical: String,
}

impl Temporal {
    pub fn instant(&self) -> NaiveDateTime {
        self.point.instant()
    }
}

impl PartialOrd for Temporal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.instant().cmp(&other.instant()))
    }
}

impl fmt::Display for Temporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lexical)
    }
}

impl Serialize for Temporal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.lexical)
    }
}

/// A successfully parsed value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Boolean(bool),
    Number(Number),
    Temporal(Temporal),
    /// Duration in its lexical form.
    Duration(String),
}

impl Value {
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(number) => Some(number),
            _ => None,
        }
    }

    pub fn as_temporal(&self) -> Option<&Temporal> {
        match self {
            Self::Temporal(temporal) => Some(temporal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) | Self::Duration(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(text) | Self::Duration(text) => f.write_str(text),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Number(number) => write!(f, "{number}"),
            Self::Temporal(temporal) => write!(f, "{temporal}"),
        }
    }
}

/// Outcome of parsing one token.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "camelCase")]
pub enum ParsedValue {
    Valid(Value),
    /// The raw token that failed to parse or failed a facet.
    Invalid(String),
}

impl ParsedValue {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Invalid(_) => None,
        }
    }
}

/// Outcome of validating one cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Single(ParsedValue),
    List(Vec<ParsedValue>),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True when no token of the cell is invalid.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Single(parsed) => parsed.is_valid(),
            Self::List(values) => values.iter().all(ParsedValue::is_valid),
        }
    }

    pub fn values(&self) -> &[ParsedValue] {
        match self {
            Self::Null => &[],
            Self::Single(parsed) => std::slice::from_ref(parsed),
            Self::List(values) => values,
        }
    }
}
