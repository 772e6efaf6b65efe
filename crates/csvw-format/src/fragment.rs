//! Structured regular-expression fragments.
//!
//! Format compilers describe their matchers as a [`Fragment`] tree and render
//! it once. Grouping is decided by the tree shape, so alternatives and
//! repetitions never depend on string splicing.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Text matched verbatim.
    Literal(String),
    /// Between `min` and `max` ASCII digits; `max: None` is unbounded.
    Digits { min: usize, max: Option<usize> },
    /// A self-contained expression, rendered as written.
    Raw(&'static str),
    Seq(Vec<Fragment>),
    Alt(Vec<Fragment>),
    Optional(Box<Fragment>),
    Repeat {
        inner: Box<Fragment>,
        min: usize,
        max: Option<usize>,
    },
    Capture {
        name: &'static str,
        inner: Box<Fragment>,
    },
}

impl Fragment {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    pub fn digits(min: usize, max: Option<usize>) -> Self {
        Self::Digits { min, max }
    }

    pub fn exactly(count: usize) -> Self {
        Self::Digits {
            min: count,
            max: Some(count),
        }
    }

    pub fn seq(parts: Vec<Fragment>) -> Self {
        Self::Seq(parts)
    }

    pub fn alt(options: Vec<Fragment>) -> Self {
        Self::Alt(options)
    }

    pub fn optional(inner: Fragment) -> Self {
        Self::Optional(Box::new(inner))
    }

    pub fn repeat(inner: Fragment, min: usize, max: Option<usize>) -> Self {
        Self::Repeat {
            inner: Box::new(inner),
            min,
            max,
        }
    }

    pub fn capture(name: &'static str, inner: Fragment) -> Self {
        Self::Capture {
            name,
            inner: Box::new(inner),
        }
    }

    /// An empty sequence matches the empty string.
    pub fn empty() -> Self {
        Self::Seq(Vec::new())
    }

    /// Render as `regex` crate syntax.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    /// Whole-string matcher: `^...$`.
    pub fn anchored(&self) -> String {
        format!("^{}$", self.render())
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Self::Literal(text) => out.push_str(&regex::escape(text)),
            Self::Digits { min, max } => {
                if *max == Some(0) {
                    return;
                }
                out.push_str("[0-9]");
                out.push_str(&quantifier(*min, *max));
            }
            Self::Raw(expr) => out.push_str(expr),
            Self::Seq(parts) => {
                for part in parts {
                    part.write_to(out);
                }
            }
            Self::Alt(options) => {
                out.push_str("(?:");
                for (index, option) in options.iter().enumerate() {
                    if index > 0 {
                        out.push('|');
                    }
                    option.write_to(out);
                }
                out.push(')');
            }
            Self::Optional(inner) => {
                inner.write_atom(out);
                out.push('?');
            }
            Self::Repeat { inner, min, max } => {
                if *max == Some(0) {
                    return;
                }
                inner.write_atom(out);
                out.push_str(&quantifier(*min, *max));
            }
            Self::Capture { name, inner } => {
                out.push_str("(?<");
                out.push_str(name);
                out.push('>');
                inner.write_to(out);
                out.push(')');
            }
        }
    }

    /// Write so that a following quantifier applies to the whole fragment.
    fn write_atom(&self, out: &mut String) {
        if self.is_atom() {
            self.write_to(out);
        } else {
            out.push_str("(?:");
            self.write_to(out);
            out.push(')');
        }
    }

    fn is_atom(&self) -> bool {
        match self {
            Self::Literal(text) => text.chars().count() == 1,
            Self::Digits { min: 1, max: Some(1) } => true,
            Self::Alt(_) | Self::Capture { .. } => true,
            _ => false,
        }
    }
}

fn quantifier(min: usize, max: Option<usize>) -> String {
    match (min, max) {
        (1, Some(1)) => String::new(),
        (0, Some(1)) => "?".to_string(),
        (0, None) => "*".to_string(),
        (1, None) => "+".to_string(),
        (min, None) => format!("{{{min},}}"),
        (min, Some(max)) if min == max => format!("{{{min}}}"),
        (min, Some(max)) => format!("{{{min},{max}}}"),
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
