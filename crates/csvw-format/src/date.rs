//! Date and time format patterns.
//!
//! A [`DateFormat`] is either a per-datatype default matcher, one of the fixed
//! literal pattern tables, or a matcher assembled token by token from a
//! pattern such as `dd/MM/yyyy HH:mm:ss.SSS XXX`.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime};
use csvw_model::{Datatype, Temporal, TemporalKind, TemporalPoint};
use regex::{Captures, Regex, RegexBuilder};
use tracing::debug;

use crate::error::{FormatError, Result};
use crate::fragment::Fragment;
use crate::number::MATCHER_SIZE_LIMIT;

// === Field Fragments ===

const YEAR: &str = "-?(?:[1-9][0-9]{3,}|0[0-9]{3})";
const MONTH_2: &str = "0[1-9]|1[0-2]";
const MONTH_1: &str = "[1-9]|1[0-2]";
const DAY_2: &str = "0[1-9]|[12][0-9]|3[01]";
const DAY_1: &str = "[1-9]|[12][0-9]|3[01]";
const HOUR: &str = "[01][0-9]|2[0-3]";
const MINUTE: &str = "[0-5][0-9]";
const SECOND: &str = "[0-5][0-9]";
const TZ_X: &str = "Z|[-+](?:(?:0[0-9]|1[0-3])(?:[0-5][0-9])?|14(?:00)?)";
const TZ_XX: &str = "Z|[-+](?:(?:0[0-9]|1[0-3])[0-5][0-9]|1400)";
const TZ_XXX: &str = "Z|[-+](?:(?:0[0-9]|1[0-3]):[0-5][0-9]|14:00)";
const TZ_LOWER_X: &str = "[-+](?:(?:0[0-9]|1[0-3])(?:[0-5][0-9])?|14(?:00)?)";
const TZ_LOWER_XX: &str = "[-+](?:(?:0[0-9]|1[0-3])[0-5][0-9]|1400)";
const TZ_LOWER_XXX: &str = "[-+](?:(?:0[0-9]|1[0-3]):[0-5][0-9]|14:00)";

/// Letters reserved for date fields; any unsupported use is an error.
const FIELD_SYMBOLS: &str = "GyYuUrQqMLlwWdDFgEecahHKkjJmsSAzZOvVXx";

fn field(name: &'static str, expr: &'static str) -> Fragment {
    Fragment::capture(name, Fragment::Raw(expr))
}

/// Seconds with up to `max_fraction` fractional digits (`None` for unbounded).
fn second_field(max_fraction: Option<usize>) -> Fragment {
    let fraction = match max_fraction {
        Some(0) => Fragment::empty(),
        max => Fragment::optional(Fragment::seq(vec![
            Fragment::literal("."),
            Fragment::digits(1, max),
        ])),
    };
    Fragment::capture(
        "second",
        Fragment::seq(vec![Fragment::Raw(SECOND), fraction]),
    )
}

fn optional_timezone() -> Fragment {
    Fragment::optional(field("timezone", TZ_XXX))
}

// === Lookup Tables ===

/// A matcher with the kind of value it produces.
#[derive(Debug, Clone)]
struct Matcher {
    kind: TemporalKind,
    regex: Regex,
}

fn build_table(kind: TemporalKind, patterns: &[&'static str]) -> HashMap<&'static str, Matcher> {
    patterns
        .iter()
        .map(|pattern| {
            let tokens = tokenize(pattern).expect("Invalid date table pattern");
            let regex = Regex::new(&tokens.fragment.anchored()).expect("Invalid date table regex");
            (*pattern, Matcher { kind, regex })
        })
        .collect()
}

static DATE_PATTERNS: LazyLock<HashMap<&'static str, Matcher>> = LazyLock::new(|| {
    build_table(
        TemporalKind::Date,
        &[
            "yyyy-MM-dd",
            "yyyyMMdd",
            "dd-MM-yyyy",
            "d-M-yyyy",
            "MM-dd-yyyy",
            "M-d-yyyy",
            "dd/MM/yyyy",
            "d/M/yyyy",
            "MM/dd/yyyy",
            "M/d/yyyy",
            "dd.MM.yyyy",
            "d.M.yyyy",
            "MM.dd.yyyy",
            "M.d.yyyy",
        ],
    )
});

static TIME_PATTERNS: LazyLock<HashMap<&'static str, Matcher>> = LazyLock::new(|| {
    build_table(
        TemporalKind::Time,
        &["HH:mm:ss", "HHmmss", "HH:mm", "HHmm"],
    )
});

static DATE_TIME_PATTERNS: LazyLock<HashMap<&'static str, Matcher>> = LazyLock::new(|| {
    build_table(
        TemporalKind::DateTime,
        &["yyyy-MM-ddTHH:mm:ss", "yyyy-MM-ddTHH:mm"],
    )
});

static DEFAULT_FORMATS: LazyLock<HashMap<Datatype, Matcher>> = LazyLock::new(|| {
    let date = || {
        vec![
            field("year", YEAR),
            Fragment::literal("-"),
            field("month", MONTH_2),
            Fragment::literal("-"),
            field("day", DAY_2),
        ]
    };
    let time = || {
        vec![
            field("hour", HOUR),
            Fragment::literal(":"),
            field("minute", MINUTE),
            Fragment::literal(":"),
            second_field(None),
        ]
    };
    let date_time = || {
        let mut parts = date();
        parts.push(Fragment::literal("T"));
        parts.extend(time());
        parts
    };
    let with_timezone = |mut parts: Vec<Fragment>, required: bool| {
        parts.push(if required {
            field("timezone", TZ_XXX)
        } else {
            optional_timezone()
        });
        Fragment::seq(parts)
    };

    let entries = [
        (Datatype::Date, TemporalKind::Date, with_timezone(date(), false)),
        (
            Datatype::DateTime,
            TemporalKind::DateTime,
            with_timezone(date_time(), false),
        ),
        (
            Datatype::DateTimeStamp,
            TemporalKind::DateTime,
            with_timezone(date_time(), true),
        ),
        (
            Datatype::GDay,
            TemporalKind::Partial,
            with_timezone(vec![Fragment::literal("---"), field("day", DAY_2)], false),
        ),
        (
            Datatype::GMonth,
            TemporalKind::Partial,
            with_timezone(vec![Fragment::literal("--"), field("month", MONTH_2)], false),
        ),
        (
            Datatype::GMonthDay,
            TemporalKind::Partial,
            with_timezone(
                vec![
                    Fragment::literal("--"),
                    field("month", MONTH_2),
                    Fragment::literal("-"),
                    field("day", DAY_2),
                ],
                false,
            ),
        ),
        (
            Datatype::GYear,
            TemporalKind::Partial,
            with_timezone(vec![field("year", YEAR)], false),
        ),
        (
            Datatype::GYearMonth,
            TemporalKind::Partial,
            with_timezone(
                vec![
                    field("year", YEAR),
                    Fragment::literal("-"),
                    field("month", MONTH_2),
                ],
                false,
            ),
        ),
        (Datatype::Time, TemporalKind::Time, with_timezone(time(), false)),
    ];
    entries
        .into_iter()
        .map(|(datatype, kind, fragment)| {
            let regex = Regex::new(&fragment.anchored()).expect("Invalid default date regex");
            (datatype, Matcher { kind, regex })
        })
        .collect()
});

// === Token Substitution ===

/// Result of tokenizing a free-form pattern.
struct Tokens {
    fragment: Fragment,
    has_year: bool,
    has_month: bool,
    has_day: bool,
    has_hour: bool,
}

impl Tokens {
    fn kind(&self) -> TemporalKind {
        match (self.has_year && self.has_month && self.has_day, self.has_hour) {
            (true, true) => TemporalKind::DateTime,
            (true, false) => TemporalKind::Date,
            (false, true) if !self.has_year && !self.has_month && !self.has_day => {
                TemporalKind::Time
            }
            _ => TemporalKind::Partial,
        }
    }
}

/// Replace each date field token with its fragment; everything else is literal.
fn tokenize(pattern: &str) -> Result<Tokens> {
    let unrecognised = |symbol: String| FormatError::UnrecognisedSymbol {
        pattern: pattern.to_string(),
        symbol,
    };
    let chars: Vec<char> = pattern.chars().collect();
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut tokens = Tokens {
        fragment: Fragment::empty(),
        has_year: false,
        has_month: false,
        has_day: false,
        has_hour: false,
    };

    let mut index = 0;
    while index < chars.len() {
        let symbol = chars[index];
        if !FIELD_SYMBOLS.contains(symbol) {
            literal.push(symbol);
            index += 1;
            continue;
        }
        let run = chars[index..]
            .iter()
            .take_while(|c| **c == symbol)
            .count();
        let token: String = chars[index..index + run].iter().collect();
        index += run;

        let fragment = match (symbol, run) {
            ('y', 4) => {
                tokens.has_year = true;
                field("year", YEAR)
            }
            ('M', 2) => {
                tokens.has_month = true;
                field("month", MONTH_2)
            }
            ('M', 1) => {
                tokens.has_month = true;
                field("month", MONTH_1)
            }
            ('d', 2) => {
                tokens.has_day = true;
                field("day", DAY_2)
            }
            ('d', 1) => {
                tokens.has_day = true;
                field("day", DAY_1)
            }
            ('H', 2) => {
                tokens.has_hour = true;
                field("hour", HOUR)
            }
            ('m', 2) => field("minute", MINUTE),
            ('s', 2) => {
                // `ss.SSS` bounds the fractional digits to the number of `S`.
                let fraction = if chars.get(index) == Some(&'.') {
                    chars[index + 1..].iter().take_while(|c| **c == 'S').count()
                } else {
                    0
                };
                if fraction > 0 {
                    index += fraction + 1;
                }
                second_field(Some(fraction))
            }
            ('X', 1) => field("timezone", TZ_X),
            ('X', 2) => field("timezone", TZ_XX),
            ('X', 3) => field("timezone", TZ_XXX),
            ('x', 1) => field("timezone", TZ_LOWER_X),
            ('x', 2) => field("timezone", TZ_LOWER_XX),
            ('x', 3) => field("timezone", TZ_LOWER_XXX),
            _ => return Err(unrecognised(token)),
        };
        if !literal.is_empty() {
            parts.push(Fragment::literal(std::mem::take(&mut literal)));
        }
        parts.push(fragment);
    }
    if !literal.is_empty() {
        parts.push(Fragment::literal(literal));
    }
    tokens.fragment = Fragment::seq(parts);
    Ok(tokens)
}

// === DateFormat ===

/// A compiled date/time format.
#[derive(Debug, Clone)]
pub struct DateFormat {
    pattern: Option<String>,
    kind: TemporalKind,
    matcher: Regex,
    fields: Vec<String>,
}

impl DateFormat {
    /// Compile `pattern`, or select the default format of `datatype`.
    ///
    /// # Errors
    ///
    /// Fails when the pattern uses an unsupported field symbol, when a field
    /// appears twice, or when no pattern is given and `datatype` has no
    /// default format.
    pub fn new(pattern: Option<&str>, datatype: Datatype) -> Result<Self> {
        let Some(pattern) = pattern else {
            let matcher = DEFAULT_FORMATS
                .get(&datatype)
                .ok_or(FormatError::NoDefaultDateFormat { datatype })?;
            return Ok(Self::from_matcher(None, matcher.clone()));
        };

        let table_entry = DATE_PATTERNS
            .get(pattern)
            .or_else(|| TIME_PATTERNS.get(pattern))
            .or_else(|| DATE_TIME_PATTERNS.get(pattern));
        if let Some(matcher) = table_entry {
            return Ok(Self::from_matcher(Some(pattern), matcher.clone()));
        }

        let tokens = tokenize(pattern)?;
        let kind = tokens.kind();
        let regex = RegexBuilder::new(&tokens.fragment.anchored())
            .size_limit(MATCHER_SIZE_LIMIT)
            .build()
            .map_err(|error| FormatError::DatePattern {
                pattern: pattern.to_string(),
                message: error.to_string(),
            })?;
        Ok(Self::from_matcher(Some(pattern), Matcher { kind, regex }))
    }

    fn from_matcher(pattern: Option<&str>, matcher: Matcher) -> Self {
        let fields: Vec<String> = matcher
            .regex
            .capture_names()
            .flatten()
            .map(str::to_string)
            .collect();
        debug!(
            pattern = pattern.unwrap_or("<default>"),
            kind = ?matcher.kind,
            fields = ?fields,
            "compiled date format"
        );
        Self {
            pattern: pattern.map(str::to_string),
            kind: matcher.kind,
            matcher: matcher.regex,
            fields,
        }
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Kind of value this format produces.
    pub fn kind(&self) -> TemporalKind {
        self.kind
    }

    /// Names of the fields the matcher captures.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn matcher(&self) -> &str {
        self.matcher.as_str()
    }

    /// Full-string test against the compiled matcher.
    pub fn is_match(&self, value: &str) -> bool {
        self.matcher.is_match(value)
    }

    /// Parse `value` into a temporal record.
    ///
    /// Returns `None` when the value does not match or names a date that does
    /// not exist, such as 30 February.
    pub fn parse(&self, value: &str) -> Option<Temporal> {
        let captures = self.matcher.captures(value)?;
        let year = capture_number::<i32>(&captures, "year")?;
        let month = capture_number::<u32>(&captures, "month")?;
        let day = capture_number::<u32>(&captures, "day")?;
        let hour = capture_number::<u32>(&captures, "hour")?;
        let minute = capture_number::<u32>(&captures, "minute")?;
        let second_text = captures.name("second").map(|m| m.as_str());
        let second = match second_text {
            Some(text) => Some(text.parse::<f64>().ok()?),
            None => None,
        };
        let timezone = captures
            .name("timezone")
            .map(|m| normalize_timezone(m.as_str()));
        let offset = match &timezone {
            Some(tz) => Some(parse_offset(tz)?),
            None => None,
        };
        let (whole_seconds, nanos) = match second_text {
            Some(text) => split_seconds(text)?,
            None => (0, 0),
        };

        let point = match self.kind {
            TemporalKind::Date => {
                let date = NaiveDate::from_ymd_opt(year?, month?, day?)?;
                match offset {
                    Some(offset) => TemporalPoint::Zoned(
                        date.and_hms_opt(0, 0, 0)?
                            .and_local_timezone(offset)
                            .single()?,
                    ),
                    None => TemporalPoint::Date(date),
                }
            }
            TemporalKind::DateTime => {
                let datetime = NaiveDate::from_ymd_opt(year?, month?, day?)?.and_hms_nano_opt(
                    hour?,
                    minute.unwrap_or(0),
                    whole_seconds,
                    nanos,
                )?;
                match offset {
                    Some(offset) => {
                        TemporalPoint::Zoned(datetime.and_local_timezone(offset).single()?)
                    }
                    None => TemporalPoint::Local(datetime),
                }
            }
            TemporalKind::Time | TemporalKind::Partial => {
                let carrier: NaiveDateTime = NaiveDate::from_ymd_opt(
                    year.unwrap_or(0),
                    month.unwrap_or(1),
                    day.unwrap_or(1),
                )?
                .and_hms_nano_opt(hour.unwrap_or(0), minute.unwrap_or(0), whole_seconds, nanos)?;
                let offset = offset.unwrap_or(FixedOffset::east_opt(0)?);
                TemporalPoint::Zoned(carrier.and_local_timezone(offset).single()?)
            }
        };

        let mut temporal = Temporal {
            kind: self.kind,
            year,
            month,
            day,
            hour,
            minute,
            second,
            timezone,
            point,
            lexical: String::new(),
        };
        temporal.lexical = canonical_lexical(&temporal);
        Some(temporal)
    }
}

/// Parse an optional numeric capture.
///
/// The outer `Option` is `None` when the capture is present but does not fit
/// the target type; the inner one when the field was not captured.
fn capture_number<T: std::str::FromStr>(captures: &Captures<'_>, name: &str) -> Option<Option<T>> {
    match captures.name(name) {
        Some(m) => m.as_str().parse::<T>().ok().map(Some),
        None => Some(None),
    }
}

/// `Z` becomes `+00:00`; `+HH` and `+HHMM` gain their minutes and colon.
fn normalize_timezone(raw: &str) -> String {
    if raw == "Z" {
        return "+00:00".to_string();
    }
    match raw.len() {
        3 => format!("{raw}:00"),
        5 if !raw.contains(':') => format!("{}:{}", &raw[..3], &raw[3..]),
        _ => raw.to_string(),
    }
}

fn parse_offset(timezone: &str) -> Option<FixedOffset> {
    let sign = match timezone.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let (hours, minutes) = timezone[1..].split_once(':')?;
    let seconds = hours.parse::<i32>().ok()? * 3600 + minutes.parse::<i32>().ok()? * 60;
    FixedOffset::east_opt(sign * seconds)
}

/// Whole seconds and nanoseconds from `ss` or `ss.fff`.
fn split_seconds(text: &str) -> Option<(u32, u32)> {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    let whole = whole.parse::<u32>().ok()?;
    let digits: String = fraction.chars().chain(std::iter::repeat('0')).take(9).collect();
    let nanos = digits.parse::<u32>().ok()?;
    Some((whole, nanos))
}

fn pad_year(year: i32) -> String {
    if year < 0 {
        format!("-{:04}", year.unsigned_abs())
    } else {
        format!("{year:04}")
    }
}

/// Seconds in fixed-point form with a two-digit integer part.
fn pad_second(second: f64) -> String {
    if second.fract() == 0.0 {
        format!("{:02}", second as u32)
    } else {
        let text = second.to_string();
        if second < 10.0 { format!("0{text}") } else { text }
    }
}

/// Canonical lexical form, picked by which fields are present.
fn canonical_lexical(value: &Temporal) -> String {
    let timezone = match value.timezone.as_deref() {
        Some("+00:00") => "Z",
        Some(tz) => tz,
        None => "",
    };
    let two = |n: u32| format!("{n:02}");
    let hour = two(value.hour.unwrap_or(0));
    let minute = two(value.minute.unwrap_or(0));
    let second = pad_second(value.second.unwrap_or(0.0));

    match (value.year, value.month, value.day) {
        (Some(year), Some(month), Some(day)) if value.hour.is_some() => format!(
            "{}-{}-{}T{hour}:{minute}:{second}{timezone}",
            pad_year(year),
            two(month),
            two(day)
        ),
        (Some(year), Some(month), Some(day)) => {
            format!("{}-{}-{}{timezone}", pad_year(year), two(month), two(day))
        }
        (Some(year), Some(month), None) => format!("{}-{}{timezone}", pad_year(year), two(month)),
        (Some(year), None, _) => format!("{}{timezone}", pad_year(year)),
        (None, Some(month), Some(day)) => format!("--{}-{}{timezone}", two(month), two(day)),
        (None, Some(month), None) => format!("--{}{timezone}", two(month)),
        (None, None, Some(day)) => format!("---{}{timezone}", two(day)),
        (None, None, None) => format!("{hour}:{minute}:{second}{timezone}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timezones_normalize_to_hours_and_minutes() {
        assert_eq!(normalize_timezone("Z"), "+00:00");
        assert_eq!(normalize_timezone("+05"), "+05:00");
        assert_eq!(normalize_timezone("-0530"), "-05:30");
        assert_eq!(normalize_timezone("+14:00"), "+14:00");
    }

    #[test]
    fn seconds_split_into_nanos() {
        assert_eq!(split_seconds("56"), Some((56, 0)));
        assert_eq!(split_seconds("56.78"), Some((56, 780_000_000)));
        assert_eq!(split_seconds("07.123456789"), Some((7, 123_456_789)));
    }

    #[test]
    fn seconds_render_fixed_point() {
        assert_eq!(pad_second(56.0), "56");
        assert_eq!(pad_second(56.78), "56.78");
        assert_eq!(pad_second(7.5), "07.5");
        assert_eq!(pad_second(0.0), "00");
    }

    #[test]
    fn years_pad_to_four_digits() {
        assert_eq!(pad_year(15), "0015");
        assert_eq!(pad_year(2015), "2015");
        assert_eq!(pad_year(-44), "-0044");
        assert_eq!(pad_year(12345), "12345");
    }

    #[test]
    fn tokenizer_escapes_literal_text() {
        let tokens = tokenize("dd.MM.yyyy").expect("tokenize");
        assert!(tokens.fragment.render().contains(r"\."));
        assert_eq!(tokens.kind(), TemporalKind::Date);
    }

    #[test]
    fn tokenizer_infers_kind() {
        let kind = |pattern| tokenize(pattern).expect("tokenize").kind();
        assert_eq!(kind("M/d/yyyy HH:mm"), TemporalKind::DateTime);
        assert_eq!(kind("HH:mm:ss.SSS"), TemporalKind::Time);
        assert_eq!(kind("yyyy-MM"), TemporalKind::Partial);
        assert_eq!(kind("--MM-dd"), TemporalKind::Partial);
    }

    #[test]
    fn tokenizer_rejects_unsupported_symbols() {
        assert!(matches!(
            tokenize("yy-MM-dd"),
            Err(FormatError::UnrecognisedSymbol { symbol, .. }) if symbol == "yy"
        ));
        assert!(matches!(
            tokenize("EEE, dd MMM"),
            Err(FormatError::UnrecognisedSymbol { .. })
        ));
    }

    #[test]
    fn every_temporal_datatype_has_a_default() {
        for datatype in Datatype::ALL.into_iter().filter(|d| d.is_temporal()) {
            assert!(DEFAULT_FORMATS.contains_key(&datatype), "{datatype}");
        }
    }
}
