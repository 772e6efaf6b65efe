//! Normalized datatype and column descriptors.
//!
//! These are the inputs of the validation engine. They deserialize from the
//! CSVW metadata JSON shape (camelCase keys) and are immutable once a schema
//! has been loaded.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::datatype::Datatype;
use crate::error::{ModelError, Result};

/// A lexical format attached to a datatype.
///
/// How the pattern string is read depends on the base datatype: a regular
/// expression for textual types, `true|false` literals for booleans, a number
/// pattern for numeric types and a date pattern for temporal types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormatSpec {
    Pattern(String),
    #[serde(rename_all = "camelCase")]
    Numeric {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        group_char: Option<char>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        decimal_char: Option<char>,
    },
}

impl FormatSpec {
    pub fn pattern(&self) -> Option<&str> {
        match self {
            Self::Pattern(pattern) => Some(pattern),
            Self::Numeric { pattern, .. } => pattern.as_deref(),
        }
    }

    pub fn group_char(&self) -> Option<char> {
        match self {
            Self::Pattern(_) => None,
            Self::Numeric { group_char, .. } => *group_char,
        }
    }

    pub fn decimal_char(&self) -> Option<char> {
        match self {
            Self::Pattern(_) => None,
            Self::Numeric { decimal_char, .. } => *decimal_char,
        }
    }
}

/// Bound value of a range facet, as written in metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacetBound {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for FacetBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for FacetBound {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for FacetBound {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Base datatype plus format and facets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatatypeDescriptor {
    #[serde(default)]
    pub base: Datatype,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, alias = "minimum", skip_serializing_if = "Option::is_none")]
    pub min_inclusive: Option<FacetBound>,
    #[serde(default, alias = "maximum", skip_serializing_if = "Option::is_none")]
    pub max_inclusive: Option<FacetBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_exclusive: Option<FacetBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_exclusive: Option<FacetBound>,
}

impl DatatypeDescriptor {
    pub fn new(base: Datatype) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: FormatSpec) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_pattern(self, pattern: impl Into<String>) -> Self {
        self.with_format(FormatSpec::Pattern(pattern.into()))
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_min_inclusive(mut self, bound: impl Into<FacetBound>) -> Self {
        self.min_inclusive = Some(bound.into());
        self
    }

    pub fn with_max_inclusive(mut self, bound: impl Into<FacetBound>) -> Self {
        self.max_inclusive = Some(bound.into());
        self
    }

    pub fn with_min_exclusive(mut self, bound: impl Into<FacetBound>) -> Self {
        self.min_exclusive = Some(bound.into());
        self
    }

    pub fn with_max_exclusive(mut self, bound: impl Into<FacetBound>) -> Self {
        self.max_exclusive = Some(bound.into());
        self
    }

    /// Format pattern string, if any.
    pub fn pattern(&self) -> Option<&str> {
        self.format.as_ref().and_then(FormatSpec::pattern)
    }

    pub fn has_length_facets(&self) -> bool {
        self.length.is_some() || self.min_length.is_some() || self.max_length.is_some()
    }

    pub fn has_range_facets(&self) -> bool {
        self.min_inclusive.is_some()
            || self.max_inclusive.is_some()
            || self.min_exclusive.is_some()
            || self.max_exclusive.is_some()
    }

    /// Check that the facets are consistent with each other and with the base.
    ///
    /// Bound ordering (`min <= max`) needs typed values and is checked when the
    /// column is compiled.
    pub fn validate(&self) -> Result<()> {
        let datatype = self.base;
        if self.min_inclusive.is_some() && self.min_exclusive.is_some() {
            return Err(ModelError::ConflictingFacets {
                datatype,
                first: "minInclusive",
                second: "minExclusive",
            });
        }
        if self.max_inclusive.is_some() && self.max_exclusive.is_some() {
            return Err(ModelError::ConflictingFacets {
                datatype,
                first: "maxInclusive",
                second: "maxExclusive",
            });
        }
        if self.has_length_facets() && !datatype.allows_length_facets() {
            return Err(ModelError::FacetNotAllowed {
                facet: first_length_facet(self),
                datatype,
            });
        }
        if self.has_range_facets() && !datatype.allows_range_facets() {
            return Err(ModelError::FacetNotAllowed {
                facet: first_range_facet(self),
                datatype,
            });
        }
        if let Some(length) = self.length {
            if let Some(min_length) = self.min_length
                && length < min_length
            {
                return Err(ModelError::LengthBelowMinLength {
                    datatype,
                    length,
                    min_length,
                });
            }
            if let Some(max_length) = self.max_length
                && length > max_length
            {
                return Err(ModelError::LengthAboveMaxLength {
                    datatype,
                    length,
                    max_length,
                });
            }
        }
        if let (Some(min_length), Some(max_length)) = (self.min_length, self.max_length)
            && min_length > max_length
        {
            return Err(ModelError::MinLengthAboveMaxLength {
                datatype,
                min_length,
                max_length,
            });
        }
        Ok(())
    }
}

fn first_length_facet(descriptor: &DatatypeDescriptor) -> &'static str {
    if descriptor.length.is_some() {
        "length"
    } else if descriptor.min_length.is_some() {
        "minLength"
    } else {
        "maxLength"
    }
}

fn first_range_facet(descriptor: &DatatypeDescriptor) -> &'static str {
    if descriptor.min_inclusive.is_some() {
        "minInclusive"
    } else if descriptor.max_inclusive.is_some() {
        "maxInclusive"
    } else if descriptor.min_exclusive.is_some() {
        "minExclusive"
    } else {
        "maxExclusive"
    }
}

/// A column of the table schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// 1-based position of the column.
    #[serde(default)]
    pub number: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "datatype_or_name")]
    pub datatype: DatatypeDescriptor,
    /// Literals that stand for a missing value.
    #[serde(
        default = "default_nulls",
        rename = "null",
        deserialize_with = "one_or_many"
    )]
    pub nulls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub ordered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl Column {
    pub fn new(number: usize, datatype: DatatypeDescriptor) -> Self {
        Self {
            number,
            name: None,
            datatype,
            nulls: default_nulls(),
            separator: None,
            required: false,
            ordered: false,
            default: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_nulls<I, S>(mut self, nulls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nulls = nulls.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_ordered(mut self, ordered: bool) -> Self {
        self.ordered = ordered;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Name for messages: the declared name, else `column N`.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("column {}", self.number),
        }
    }

    pub fn is_null(&self, value: &str) -> bool {
        self.nulls.iter().any(|null| null == value)
    }
}

fn default_nulls() -> Vec<String> {
    vec![String::new()]
}

struct DatatypeVisitor;

impl<'de> Visitor<'de> for DatatypeVisitor {
    type Value = DatatypeDescriptor;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a datatype name or a datatype description object")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Self::Value, E> {
        let base = value.parse::<Datatype>().map_err(E::custom)?;
        Ok(DatatypeDescriptor::new(base))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> std::result::Result<Self::Value, A::Error> {
        DatatypeDescriptor::deserialize(de::value::MapAccessDeserializer::new(map))
    }
}

fn datatype_or_name<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<DatatypeDescriptor, D::Error> {
    deserializer.deserialize_any(DatatypeVisitor)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<String>, D::Error> {
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inclusive_and_exclusive_minimum_conflict() {
        let descriptor = DatatypeDescriptor::new(Datatype::Integer)
            .with_min_inclusive(1)
            .with_min_exclusive(0);
        assert!(matches!(
            descriptor.validate(),
            Err(ModelError::ConflictingFacets {
                first: "minInclusive",
                ..
            })
        ));
    }

    #[test]
    fn length_must_sit_between_min_and_max() {
        let below = DatatypeDescriptor::new(Datatype::String)
            .with_length(2)
            .with_min_length(3);
        assert!(matches!(
            below.validate(),
            Err(ModelError::LengthBelowMinLength { .. })
        ));

        let above = DatatypeDescriptor::new(Datatype::String)
            .with_length(5)
            .with_max_length(4);
        assert!(matches!(
            above.validate(),
            Err(ModelError::LengthAboveMaxLength { .. })
        ));

        let inverted = DatatypeDescriptor::new(Datatype::String)
            .with_min_length(5)
            .with_max_length(4);
        assert!(matches!(
            inverted.validate(),
            Err(ModelError::MinLengthAboveMaxLength { .. })
        ));
    }

    #[test]
    fn length_facets_need_textual_base() {
        let descriptor = DatatypeDescriptor::new(Datatype::Integer).with_max_length(3);
        assert_eq!(
            descriptor.validate(),
            Err(ModelError::FacetNotAllowed {
                facet: "maxLength",
                datatype: Datatype::Integer,
            })
        );
        assert!(
            DatatypeDescriptor::new(Datatype::HexBinary)
                .with_length(4)
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn range_facets_need_ordered_base() {
        let descriptor = DatatypeDescriptor::new(Datatype::String).with_min_inclusive("a");
        assert!(matches!(
            descriptor.validate(),
            Err(ModelError::FacetNotAllowed {
                facet: "minInclusive",
                ..
            })
        ));
        assert!(
            DatatypeDescriptor::new(Datatype::Date)
                .with_min_inclusive("2015-01-01")
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn nulls_default_to_empty_string() {
        let column = Column::new(1, DatatypeDescriptor::default());
        assert!(column.is_null(""));
        assert!(!column.is_null("NA"));
        assert_eq!(column.label(), "column 1");
    }
}
