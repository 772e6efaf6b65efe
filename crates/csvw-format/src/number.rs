//! Number format patterns.
//!
//! A pattern such as `#,##0.00` is split into a literal prefix, a numeric part
//! and a literal suffix. The numeric part is compiled into a [`Fragment`] tree
//! with explicit digit-group structure, rendered once into an anchored
//! [`Regex`].
//!
//! # Example
//!
//! ```ignore
//! use csvw_format::NumberFormat;
//!
//! let format = NumberFormat::new(Some("#,##0.##"))?;
//! assert!(format.is_match("1,234.5"));
//! assert_eq!(format.parse("1,234.5"), Some(Number::Float(1234.5)));
//! ```

use std::sync::LazyLock;

use csvw_model::Number;
use num_bigint::BigInt;
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::error::{FormatError, Result};
use crate::fragment::Fragment;

/// Compiled matchers above this size are rejected at construction.
pub(crate) const MATCHER_SIZE_LIMIT: usize = 1 << 20;

/// Default grouping separator when a pattern is given.
const DEFAULT_GROUPING: char = ',';
const DEFAULT_DECIMAL: char = '.';

static PLAIN_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[-+]?[0-9]+(?:\.[0-9]+)?(?:[Ee][-+]?[0-9]+)?[%‰]?|NaN|INF|-INF)$")
        .expect("Invalid plain number regex")
});

static PLAIN_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?[0-9]+[%‰]?$").expect("Invalid plain integer regex"));

/// A compiled number format.
#[derive(Debug, Clone)]
pub struct NumberFormat {
    pattern: Option<String>,
    grouping_separator: Option<char>,
    decimal_separator: char,
    integer: Option<bool>,
    prefix: String,
    numeric_part: String,
    suffix: String,
    primary_grouping_size: usize,
    secondary_grouping_size: usize,
    fractional_grouping_size: usize,
    max_exponent: usize,
    matcher: Regex,
}

/// Digit counts derived from the numeric part of a pattern.
#[derive(Debug, Default)]
struct DigitCounts {
    min_integer: usize,
    min_fraction: usize,
    max_fraction: usize,
    min_exponent: usize,
    max_exponent: usize,
}

impl NumberFormat {
    /// Compile `pattern` with the default separators.
    pub fn new(pattern: Option<&str>) -> Result<Self> {
        Self::compile(pattern, None, None, None)
    }

    /// The no-pattern format: plain signed decimals, exponents and the
    /// `NaN`/`INF`/`-INF` literals.
    pub fn plain(integer: Option<bool>) -> Self {
        Self::plain_with_separators(None, None, integer)
    }

    /// The no-pattern format with custom separators.
    pub fn plain_with_separators(
        grouping: Option<char>,
        decimal: Option<char>,
        integer: Option<bool>,
    ) -> Self {
        let matcher = if integer == Some(true) {
            PLAIN_INTEGER.clone()
        } else {
            PLAIN_NUMBER.clone()
        };
        Self {
            pattern: None,
            grouping_separator: grouping,
            decimal_separator: decimal.unwrap_or(DEFAULT_DECIMAL),
            integer,
            prefix: String::new(),
            numeric_part: String::new(),
            suffix: String::new(),
            primary_grouping_size: 0,
            secondary_grouping_size: 0,
            fractional_grouping_size: 0,
            max_exponent: 0,
            matcher,
        }
    }

    /// Compile a number format.
    ///
    /// When `integer` is `None` it is inferred: a pattern without a decimal
    /// separator only admits integers, no pattern decides per value.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::NoNumericPart`] if the pattern has no run of
    /// `0`, `#` and separator characters, and [`FormatError::NumberPattern`]
    /// if the generated matcher cannot be built.
    pub fn compile(
        pattern: Option<&str>,
        grouping: Option<char>,
        decimal: Option<char>,
        integer: Option<bool>,
    ) -> Result<Self> {
        let Some(pattern) = pattern else {
            return Ok(Self::plain_with_separators(grouping, decimal, integer));
        };
        let decimal = decimal.unwrap_or(DEFAULT_DECIMAL);
        let grouping = grouping.unwrap_or(DEFAULT_GROUPING);
        let integer = integer.unwrap_or_else(|| !pattern.contains(decimal));

        let (prefix, numeric_part, suffix) = split_pattern(pattern, grouping, decimal)
            .ok_or_else(|| FormatError::NoNumericPart {
                pattern: pattern.to_string(),
            })?;

        let (mantissa, exponent) = numeric_part
            .split_once(['E', 'e'])
            .unwrap_or((numeric_part, ""));
        let (integer_part, fraction_part) =
            mantissa.split_once(decimal).unwrap_or((mantissa, ""));
        let (sign, integer_part) = match integer_part.chars().next() {
            Some(c @ ('+' | '-')) => (Some(c), &integer_part[1..]),
            _ => (None, integer_part),
        };

        let counts = DigitCounts {
            min_integer: count_chars(integer_part, |c| c != grouping && c != '#'),
            min_fraction: count_chars(fraction_part, |c| c != grouping && c != '#'),
            max_fraction: count_chars(fraction_part, |c| c != grouping),
            min_exponent: count_chars(exponent, |c| c != '#'),
            max_exponent: exponent.chars().count(),
        };

        let integer_groups: Vec<usize> = integer_part
            .split(grouping)
            .skip(1)
            .map(|group| group.chars().count())
            .collect();
        let primary_grouping_size = integer_groups.last().copied().unwrap_or(0);
        let secondary_grouping_size = match integer_groups.len() {
            0 | 1 => primary_grouping_size,
            n => integer_groups[n - 2],
        };
        let fraction_groups: Vec<&str> = fraction_part.split(grouping).collect();
        let fractional_grouping_size = if fraction_groups.len() > 1 {
            fraction_groups[0].chars().count()
        } else {
            0
        };

        let sign_fragment = match sign {
            Some(c) => Fragment::literal(c.to_string()),
            None => Fragment::optional(Fragment::Raw("[-+]")),
        };
        let numeric = Fragment::seq(vec![
            sign_fragment,
            integer_fragment(
                counts.min_integer,
                primary_grouping_size,
                secondary_grouping_size,
                grouping,
            ),
            fraction_fragment(
                counts.min_fraction,
                counts.max_fraction,
                fractional_grouping_size,
                grouping,
                decimal,
            ),
            exponent_fragment(counts.min_exponent, counts.max_exponent),
        ]);
        let matcher = Fragment::seq(vec![
            Fragment::capture("prefix", Fragment::literal(prefix)),
            Fragment::capture("numeric", numeric),
            Fragment::capture("suffix", Fragment::literal(suffix)),
        ]);
        let source = matcher.anchored();
        let matcher = RegexBuilder::new(&source)
            .size_limit(MATCHER_SIZE_LIMIT)
            .build()
            .map_err(|error| FormatError::NumberPattern {
                pattern: pattern.to_string(),
                message: error.to_string(),
            })?;

        debug!(
            pattern,
            prefix,
            numeric_part,
            suffix,
            integer,
            primary = primary_grouping_size,
            secondary = secondary_grouping_size,
            fractional = fractional_grouping_size,
            "compiled number format"
        );

        Ok(Self {
            pattern: Some(pattern.to_string()),
            grouping_separator: Some(grouping),
            decimal_separator: decimal,
            integer: Some(integer),
            prefix: prefix.to_string(),
            numeric_part: numeric_part.to_string(),
            suffix: suffix.to_string(),
            primary_grouping_size,
            secondary_grouping_size,
            fractional_grouping_size,
            max_exponent: counts.max_exponent,
            matcher,
        })
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn grouping_separator(&self) -> Option<char> {
        self.grouping_separator
    }

    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    /// `Some(true)` when only integers are admitted, `None` when decided per value.
    pub fn integer(&self) -> Option<bool> {
        self.integer
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn numeric_part(&self) -> &str {
        &self.numeric_part
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn primary_grouping_size(&self) -> usize {
        self.primary_grouping_size
    }

    pub fn secondary_grouping_size(&self) -> usize {
        self.secondary_grouping_size
    }

    pub fn fractional_grouping_size(&self) -> usize {
        self.fractional_grouping_size
    }

    /// Most exponent digits the pattern admits; 0 when it has no exponent.
    pub fn max_exponent(&self) -> usize {
        self.max_exponent
    }

    /// Source of the compiled matcher.
    pub fn matcher(&self) -> &str {
        self.matcher.as_str()
    }

    /// Full-string test against the compiled matcher.
    pub fn is_match(&self, value: &str) -> bool {
        self.matcher.is_match(value)
    }

    /// Parse `value`, returning `None` when it does not fit the format.
    pub fn parse(&self, value: &str) -> Option<Number> {
        if self.pattern.is_some() {
            self.parse_patterned(value)
        } else {
            self.parse_plain(value)
        }
    }

    fn parse_plain(&self, value: &str) -> Option<Number> {
        if let Some(grouping) = self.grouping_separator {
            let doubled: String = [grouping, grouping].iter().collect();
            if value.starts_with(grouping) || value.contains(doubled.as_str()) {
                return None;
            }
        }
        let normalized = self.normalize(value);
        if !self.matcher.is_match(&normalized) {
            return None;
        }
        match normalized.as_str() {
            "NaN" => return Some(Number::Float(f64::NAN)),
            "INF" => return Some(Number::Float(f64::INFINITY)),
            "-INF" => return Some(Number::Float(f64::NEG_INFINITY)),
            _ => {}
        }
        if let Some(digits) = normalized.strip_suffix('%') {
            return scaled(digits, 100.0);
        }
        if let Some(digits) = normalized.strip_suffix('‰') {
            return scaled(digits, 1000.0);
        }
        let integer = self
            .integer
            .unwrap_or_else(|| !normalized.contains(['.', 'e', 'E']));
        parse_number(&normalized, integer)
    }

    fn parse_patterned(&self, value: &str) -> Option<Number> {
        let captures = self.matcher.captures(value)?;
        let numeric = self.normalize(captures.name("numeric")?.as_str());
        if self.has_affix('%') {
            return scaled(&numeric, 100.0);
        }
        if self.has_affix('‰') {
            return scaled(&numeric, 1000.0);
        }
        parse_number(&numeric, self.integer == Some(true))
    }

    fn has_affix(&self, symbol: char) -> bool {
        self.prefix.contains(symbol) || self.suffix.contains(symbol)
    }

    /// Drop grouping separators and map the decimal separator to `.`.
    fn normalize(&self, text: &str) -> String {
        text.chars()
            .filter(|c| Some(*c) != self.grouping_separator)
            .map(|c| if c == self.decimal_separator { '.' } else { c })
            .collect()
    }
}

fn count_chars(text: &str, predicate: impl Fn(char) -> bool) -> usize {
    text.chars().filter(|c| predicate(*c)).count()
}

fn scaled(digits: &str, divisor: f64) -> Option<Number> {
    digits
        .parse::<f64>()
        .ok()
        .map(|value| Number::Float(value / divisor))
}

fn parse_number(text: &str, integer: bool) -> Option<Number> {
    if integer {
        if let Ok(value) = text.parse::<i128>() {
            return Some(Number::Integer(value));
        }
        // Wider than i128: keep every digit.
        let digits = text.strip_prefix('+').unwrap_or(text);
        if let Ok(value) = digits.parse::<BigInt>() {
            return Some(Number::from(value));
        }
    }
    text.parse::<f64>().ok().map(Number::Float)
}

/// Split a pattern into prefix, numeric part and suffix.
///
/// The numeric part is the leftmost run of `0`, `#`, `E`, `e` and separator
/// characters that contains at least one digit placeholder, optionally led by
/// a sign.
fn split_pattern(pattern: &str, grouping: char, decimal: char) -> Option<(&str, &str, &str)> {
    let is_numeric = |c: char| matches!(c, '0' | '#' | 'E' | 'e') || c == grouping || c == decimal;
    let chars: Vec<(usize, char)> = pattern.char_indices().collect();
    let mut index = 0;
    while index < chars.len() {
        let (_, c) = chars[index];
        let signed = matches!(c, '+' | '-')
            && chars
                .get(index + 1)
                .is_some_and(|(_, next)| is_numeric(*next));
        if !signed && !is_numeric(c) {
            index += 1;
            continue;
        }
        let mut end = index + 1;
        while end < chars.len() && is_numeric(chars[end].1) {
            end += 1;
        }
        let has_placeholder = chars[index..end]
            .iter()
            .any(|(_, c)| matches!(c, '0' | '#'));
        if has_placeholder {
            let start = chars[index].0;
            let stop = chars.get(end).map_or(pattern.len(), |(offset, _)| *offset);
            return Some((&pattern[..start], &pattern[start..stop], &pattern[stop..]));
        }
        index = end;
    }
    None
}

/// Integer digits with optional digit grouping.
///
/// Without grouping this is simply `min` or more digits. With grouping the
/// rightmost group has exactly `primary` digits, every group to its left has
/// `secondary` digits and the leading group has between one and `secondary`
/// digits. Enough groups are required to hold `min` digits.
fn integer_fragment(min: usize, primary: usize, secondary: usize, grouping: char) -> Fragment {
    if primary == 0 {
        return Fragment::digits(min, None);
    }
    let secondary = if secondary == 0 { primary } else { secondary };
    let group = |width: usize| {
        Fragment::seq(vec![
            Fragment::literal(grouping.to_string()),
            Fragment::exactly(width),
        ])
    };

    let mut options = Vec::new();
    if min <= primary {
        options.push(Fragment::digits(min, Some(primary)));
    }
    // Digits that must appear left of the last separator.
    let remaining = min.saturating_sub(primary);
    let full_groups = if remaining == 0 {
        0
    } else {
        (remaining - 1) / secondary
    };
    let leading_min = (remaining - full_groups * secondary).max(1);
    let leading = Fragment::alt(vec![
        Fragment::seq(vec![
            Fragment::digits(1, Some(secondary)),
            Fragment::repeat(group(secondary), 1, None),
        ]),
        Fragment::digits(leading_min, Some(secondary)),
    ]);
    options.push(Fragment::seq(vec![
        leading,
        Fragment::repeat(group(secondary), full_groups, Some(full_groups)),
        group(primary),
    ]));
    Fragment::alt(options)
}

/// Fractional digits: `min` required, up to `max` in total.
///
/// Each optional digit nests inside the previous one, so a value may stop at
/// any digit boundary. With fractional grouping a separator precedes every
/// group after the first.
fn fraction_fragment(
    min: usize,
    max: usize,
    grouping_size: usize,
    grouping: char,
    decimal: char,
) -> Fragment {
    if max == 0 {
        return Fragment::empty();
    }
    let digit_at = |position: usize| {
        if grouping_size > 0 && position > 1 && (position - 1) % grouping_size == 0 {
            Fragment::seq(vec![
                Fragment::literal(grouping.to_string()),
                Fragment::exactly(1),
            ])
        } else {
            Fragment::exactly(1)
        }
    };

    let required = min.max(1);
    let mut tail: Option<Fragment> = None;
    for position in (required + 1..=max).rev() {
        let mut parts = vec![digit_at(position)];
        parts.extend(tail.take());
        tail = Some(Fragment::optional(Fragment::seq(parts)));
    }
    let mut parts = vec![Fragment::literal(decimal.to_string())];
    parts.extend((1..=required).map(digit_at));
    parts.extend(tail);
    let clause = Fragment::seq(parts);
    if min == 0 {
        Fragment::optional(clause)
    } else {
        clause
    }
}

fn exponent_fragment(min: usize, max: usize) -> Fragment {
    if max == 0 {
        return Fragment::empty();
    }
    Fragment::seq(vec![Fragment::literal("E"), Fragment::digits(min, Some(max))])
}
