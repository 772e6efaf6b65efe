//! The closed set of CSVW base datatypes.
//!
//! Every datatype a column may declare is a variant of [`Datatype`]. Names are
//! resolved once, when a schema is loaded, so the rest of the engine matches on
//! the enum instead of comparing URI strings.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ModelError;

/// XML Schema namespace.
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";
/// RDF namespace (XMLLiteral, HTML).
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// CSVW namespace (JSON).
pub const CSVW_NS: &str = "http://www.w3.org/ns/csvw#";

/// A supported base datatype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Datatype {
    AnyAtomicType,
    AnyUri,
    Base64Binary,
    Boolean,
    Date,
    DateTime,
    DateTimeStamp,
    Decimal,
    Integer,
    Long,
    Int,
    Short,
    Byte,
    NonNegativeInteger,
    PositiveInteger,
    UnsignedLong,
    UnsignedInt,
    UnsignedShort,
    UnsignedByte,
    NonPositiveInteger,
    NegativeInteger,
    Double,
    Duration,
    DayTimeDuration,
    YearMonthDuration,
    Float,
    GDay,
    GMonth,
    GMonthDay,
    GYear,
    GYearMonth,
    HexBinary,
    QName,
    #[default]
    String,
    NormalizedString,
    Token,
    Language,
    Name,
    NmToken,
    Time,
    XmlLiteral,
    Html,
    Json,
}

/// CSVW built-in aliases that do not match a local name.
const ALIASES: &[(&str, Datatype)] = &[
    ("number", Datatype::Double),
    ("binary", Datatype::Base64Binary),
    ("datetime", Datatype::DateTime),
    ("any", Datatype::AnyAtomicType),
    ("xml", Datatype::XmlLiteral),
    ("html", Datatype::Html),
    ("json", Datatype::Json),
];

static BY_NAME: LazyLock<HashMap<&'static str, Datatype>> = LazyLock::new(|| {
    let mut map = HashMap::with_capacity(Datatype::ALL.len() * 2 + ALIASES.len());
    for datatype in Datatype::ALL {
        map.insert(datatype.uri(), datatype);
        map.insert(datatype.name(), datatype);
    }
    for (alias, datatype) in ALIASES {
        map.insert(*alias, *datatype);
    }
    map
});

impl Datatype {
    /// Every supported datatype.
    pub const ALL: [Datatype; 43] = [
        Self::AnyAtomicType,
        Self::AnyUri,
        Self::Base64Binary,
        Self::Boolean,
        Self::Date,
        Self::DateTime,
        Self::DateTimeStamp,
        Self::Decimal,
        Self::Integer,
        Self::Long,
        Self::Int,
        Self::Short,
        Self::Byte,
        Self::NonNegativeInteger,
        Self::PositiveInteger,
        Self::UnsignedLong,
        Self::UnsignedInt,
        Self::UnsignedShort,
        Self::UnsignedByte,
        Self::NonPositiveInteger,
        Self::NegativeInteger,
        Self::Double,
        Self::Duration,
        Self::DayTimeDuration,
        Self::YearMonthDuration,
        Self::Float,
        Self::GDay,
        Self::GMonth,
        Self::GMonthDay,
        Self::GYear,
        Self::GYearMonth,
        Self::HexBinary,
        Self::QName,
        Self::String,
        Self::NormalizedString,
        Self::Token,
        Self::Language,
        Self::Name,
        Self::NmToken,
        Self::Time,
        Self::XmlLiteral,
        Self::Html,
        Self::Json,
    ];

    /// Absolute URI of the datatype.
    pub fn uri(self) -> &'static str {
        match self {
            Self::AnyAtomicType => "http://www.w3.org/2001/XMLSchema#anyAtomicType",
            Self::AnyUri => "http://www.w3.org/2001/XMLSchema#anyURI",
            Self::Base64Binary => "http://www.w3.org/2001/XMLSchema#base64Binary",
            Self::Boolean => "http://www.w3.org/2001/XMLSchema#boolean",
            Self::Date => "http://www.w3.org/2001/XMLSchema#date",
            Self::DateTime => "http://www.w3.org/2001/XMLSchema#dateTime",
            Self::DateTimeStamp => "http://www.w3.org/2001/XMLSchema#dateTimeStamp",
            Self::Decimal => "http://www.w3.org/2001/XMLSchema#decimal",
            Self::Integer => "http://www.w3.org/2001/XMLSchema#integer",
            Self::Long => "http://www.w3.org/2001/XMLSchema#long",
            Self::Int => "http://www.w3.org/2001/XMLSchema#int",
            Self::Short => "http://www.w3.org/2001/XMLSchema#short",
            Self::Byte => "http://www.w3.org/2001/XMLSchema#byte",
            Self::NonNegativeInteger => "http://www.w3.org/2001/XMLSchema#nonNegativeInteger",
            Self::PositiveInteger => "http://www.w3.org/2001/XMLSchema#positiveInteger",
            Self::UnsignedLong => "http://www.w3.org/2001/XMLSchema#unsignedLong",
            Self::UnsignedInt => "http://www.w3.org/2001/XMLSchema#unsignedInt",
            Self::UnsignedShort => "http://www.w3.org/2001/XMLSchema#unsignedShort",
            Self::UnsignedByte => "http://www.w3.org/2001/XMLSchema#unsignedByte",
            Self::NonPositiveInteger => "http://www.w3.org/2001/XMLSchema#nonPositiveInteger",
            Self::NegativeInteger => "http://www.w3.org/2001/XMLSchema#negativeInteger",
            Self::Double => "http://www.w3.org/2001/XMLSchema#double",
            Self::Duration => "http://www.w3.org/2001/XMLSchema#duration",
            Self::DayTimeDuration => "http://www.w3.org/2001/XMLSchema#dayTimeDuration",
            Self::YearMonthDuration => "http://www.w3.org/2001/XMLSchema#yearMonthDuration",
            Self::Float => "http://www.w3.org/2001/XMLSchema#float",
            Self::GDay => "http://www.w3.org/2001/XMLSchema#gDay",
            Self::GMonth => "http://www.w3.org/2001/XMLSchema#gMonth",
            Self::GMonthDay => "http://www.w3.org/2001/XMLSchema#gMonthDay",
            Self::GYear => "http://www.w3.org/2001/XMLSchema#gYear",
            Self::GYearMonth => "http://www.w3.org/2001/XMLSchema#gYearMonth",
            Self::HexBinary => "http://www.w3.org/2001/XMLSchema#hexBinary",
            Self::QName => "http://www.w3.org/2001/XMLSchema#QName",
            Self::String => "http://www.w3.org/2001/XMLSchema#string",
            Self::NormalizedString => "http://www.w3.org/2001/XMLSchema#normalizedString",
            Self::Token => "http://www.w3.org/2001/XMLSchema#token",
            Self::Language => "http://www.w3.org/2001/XMLSchema#language",
            Self::Name => "http://www.w3.org/2001/XMLSchema#Name",
            Self::NmToken => "http://www.w3.org/2001/XMLSchema#NMTOKEN",
            Self::Time => "http://www.w3.org/2001/XMLSchema#time",
            Self::XmlLiteral => "http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral",
            Self::Html => "http://www.w3.org/1999/02/22-rdf-syntax-ns#HTML",
            Self::Json => "http://www.w3.org/ns/csvw#JSON",
        }
    }

    /// Local name of the datatype, e.g. `unsignedByte`.
    pub fn name(self) -> &'static str {
        let uri = self.uri();
        match uri.rsplit_once('#') {
            Some((_, local)) => local,
            None => uri,
        }
    }

    /// Textual types whose lexical form is the value itself.
    pub fn is_string_family(self) -> bool {
        matches!(
            self,
            Self::String
                | Self::NormalizedString
                | Self::Token
                | Self::Language
                | Self::Name
                | Self::NmToken
                | Self::AnyUri
                | Self::QName
                | Self::XmlLiteral
                | Self::Html
                | Self::Json
        )
    }

    pub fn is_binary(self) -> bool {
        matches!(self, Self::Base64Binary | Self::HexBinary)
    }

    /// Integer and all of its restrictions.
    pub fn is_integer_family(self) -> bool {
        matches!(
            self,
            Self::Integer
                | Self::Long
                | Self::Int
                | Self::Short
                | Self::Byte
                | Self::NonNegativeInteger
                | Self::PositiveInteger
                | Self::UnsignedLong
                | Self::UnsignedInt
                | Self::UnsignedShort
                | Self::UnsignedByte
                | Self::NonPositiveInteger
                | Self::NegativeInteger
        )
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer_family() || matches!(self, Self::Decimal | Self::Double | Self::Float)
    }

    /// Date, time and the Gregorian partial types.
    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            Self::Date
                | Self::DateTime
                | Self::DateTimeStamp
                | Self::Time
                | Self::GDay
                | Self::GMonth
                | Self::GMonthDay
                | Self::GYear
                | Self::GYearMonth
        )
    }

    pub fn is_duration(self) -> bool {
        matches!(
            self,
            Self::Duration | Self::DayTimeDuration | Self::YearMonthDuration
        )
    }

    /// Length facets apply to textual and binary values.
    pub fn allows_length_facets(self) -> bool {
        self.is_string_family() || self.is_binary()
    }

    /// Range facets apply to ordered value spaces.
    pub fn allows_range_facets(self) -> bool {
        self.is_numeric() || self.is_temporal()
    }

    /// Fixed inclusive bounds of an integer restriction.
    ///
    /// Returns `None` for datatypes outside the integer family. Either side of
    /// the pair is `None` when the value space is unbounded in that direction.
    pub fn integer_bounds(self) -> Option<(Option<i128>, Option<i128>)> {
        let bounds = match self {
            Self::Integer => (None, None),
            Self::Long => (Some(i128::from(i64::MIN)), Some(i128::from(i64::MAX))),
            Self::Int => (Some(i128::from(i32::MIN)), Some(i128::from(i32::MAX))),
            Self::Short => (Some(i128::from(i16::MIN)), Some(i128::from(i16::MAX))),
            Self::Byte => (Some(i128::from(i8::MIN)), Some(i128::from(i8::MAX))),
            Self::UnsignedLong => (Some(0), Some(i128::from(u64::MAX))),
            Self::UnsignedInt => (Some(0), Some(i128::from(u32::MAX))),
            Self::UnsignedShort => (Some(0), Some(i128::from(u16::MAX))),
            Self::UnsignedByte => (Some(0), Some(i128::from(u8::MAX))),
            Self::NonNegativeInteger => (Some(0), None),
            Self::PositiveInteger => (Some(1), None),
            Self::NonPositiveInteger => (None, Some(0)),
            Self::NegativeInteger => (None, Some(-1)),
            _ => return None,
        };
        Some(bounds)
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Datatype {
    type Err = ModelError;

    /// Resolves an absolute URI, a local name or a CSVW alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BY_NAME
            .get(s.trim())
            .copied()
            .ok_or_else(|| ModelError::UnknownDatatype {
                name: s.to_string(),
            })
    }
}

impl Serialize for Datatype {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Datatype {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_datatype_round_trips_through_uri_and_name() {
        for datatype in Datatype::ALL {
            assert_eq!(datatype.uri().parse::<Datatype>(), Ok(datatype));
            assert_eq!(datatype.name().parse::<Datatype>(), Ok(datatype));
        }
    }

    #[test]
    fn uris_live_in_known_namespaces() {
        for datatype in Datatype::ALL {
            let uri = datatype.uri();
            assert!(
                uri.starts_with(XSD_NS) || uri.starts_with(RDF_NS) || uri.starts_with(CSVW_NS),
                "{uri}"
            );
        }
    }

    #[test]
    fn aliases_resolve() {
        assert_eq!("number".parse::<Datatype>(), Ok(Datatype::Double));
        assert_eq!("binary".parse::<Datatype>(), Ok(Datatype::Base64Binary));
        assert_eq!("datetime".parse::<Datatype>(), Ok(Datatype::DateTime));
        assert_eq!("any".parse::<Datatype>(), Ok(Datatype::AnyAtomicType));
        assert_eq!("json".parse::<Datatype>(), Ok(Datatype::Json));
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "xsd:wibble".parse::<Datatype>().unwrap_err();
        assert_eq!(
            err,
            ModelError::UnknownDatatype {
                name: "xsd:wibble".to_string()
            }
        );
    }

    #[test]
    fn unsigned_byte_upper_bound_is_255() {
        assert_eq!(
            Datatype::UnsignedByte.integer_bounds(),
            Some((Some(0), Some(255)))
        );
    }

    #[test]
    fn families_do_not_overlap() {
        for datatype in Datatype::ALL {
            let families = [
                datatype.is_string_family(),
                datatype.is_binary(),
                datatype.is_numeric(),
                datatype.is_temporal(),
                datatype.is_duration(),
            ];
            assert!(families.iter().filter(|f| **f).count() <= 1, "{datatype}");
        }
    }
}
