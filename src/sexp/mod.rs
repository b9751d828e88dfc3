// src/sexp/mod.rs

//! S-expression data model and reader
//!
//! ELPA archives publish their index (`archive-contents`) as a single
//! printed Emacs Lisp datum. This module reads that text into a [`Sexp`]
//! tree. Only the reader syntax that actually appears in package archives is
//! supported: lists, vectors, dotted pairs, strings, numbers, symbols,
//! `;` comments and the `'` quote prefix.
//!
//! # Example
//!
//! ```
//! use gs_elpa::sexp::{self, Sexp};
//!
//! let feed = sexp::parse("(1 (foo . [(1 2) nil \"Foo mode\" single]))").unwrap();
//! assert_eq!(feed.car(), Some(&Sexp::Int(1)));
//! ```

mod parser;

pub use parser::{MAX_DEPTH, parse};

use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// A parsed S-expression
#[derive(Debug, Clone, PartialEq)]
pub enum Sexp {
    Int(i64),
    /// Integer outside the `i64` range, kept as canonical decimal text
    BigInt(String),
    Float(f64),
    Str(String),
    Symbol(String),
    /// Proper list `(a b c)`
    List(Vec<Sexp>),
    /// Vector `[a b c]`
    Vector(Vec<Sexp>),
    /// Improper list `(a b . c)`; the tail is never a list or nil
    Dotted(Vec<Sexp>, Box<Sexp>),
}

impl Sexp {
    /// Convenience constructor for symbols
    pub fn symbol(name: impl Into<String>) -> Self {
        Sexp::Symbol(name.into())
    }

    /// Convenience constructor for strings
    pub fn string(value: impl Into<String>) -> Self {
        Sexp::Str(value.into())
    }

    /// True for the symbol `nil` and the empty list
    pub fn is_nil(&self) -> bool {
        match self {
            Sexp::Symbol(name) => name == "nil",
            Sexp::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// True for strings, symbols and numbers
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            Sexp::Int(_) | Sexp::BigInt(_) | Sexp::Float(_) | Sexp::Str(_) | Sexp::Symbol(_)
        )
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Sexp::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Decimal text of an integer of any size
    pub fn as_integer_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Sexp::Int(n) => Some(Cow::Owned(n.to_string())),
            Sexp::BigInt(digits) => Some(Cow::Borrowed(digits.as_str())),
            _ => None,
        }
    }

    /// Text form of an atom
    ///
    /// Strings and symbols are returned as-is, numbers in their printed
    /// form. Compound values have no text form.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Sexp::Str(s) | Sexp::Symbol(s) => Some(Cow::Borrowed(s.as_str())),
            Sexp::Int(_) | Sexp::BigInt(_) => self.as_integer_text(),
            Sexp::Float(_) => Some(Cow::Owned(self.to_string())),
            _ => None,
        }
    }

    /// Elements of a list or vector; nil yields an empty slice
    pub fn as_items(&self) -> Option<&[Sexp]> {
        match self {
            Sexp::List(items) | Sexp::Vector(items) => Some(items),
            Sexp::Symbol(name) if name == "nil" => Some(&[]),
            _ => None,
        }
    }

    /// First element of a list, vector or dotted list
    pub fn car(&self) -> Option<&Sexp> {
        match self {
            Sexp::List(items) | Sexp::Vector(items) | Sexp::Dotted(items, _) => items.first(),
            _ => None,
        }
    }

    /// Remaining elements of a proper list after the first
    pub fn cdr(&self) -> Option<&[Sexp]> {
        match self {
            Sexp::List(items) if !items.is_empty() => Some(&items[1..]),
            _ => None,
        }
    }
}

impl fmt::Display for Sexp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sexp::Int(n) => write!(f, "{n}"),
            Sexp::BigInt(digits) => f.write_str(digits),
            Sexp::Float(x) => {
                if x.fract() == 0.0 && x.is_finite() {
                    write!(f, "{x:.1}")
                } else {
                    write!(f, "{x}")
                }
            }
            Sexp::Str(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        _ => write!(f, "{c}")?,
                    }
                }
                f.write_str("\"")
            }
            Sexp::Symbol(name) => f.write_str(name),
            Sexp::List(items) => write_seq(f, "(", items, None, ")"),
            Sexp::Vector(items) => write_seq(f, "[", items, None, "]"),
            Sexp::Dotted(items, tail) => write_seq(f, "(", items, Some(tail), ")"),
        }
    }
}

fn write_seq(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    items: &[Sexp],
    tail: Option<&Sexp>,
    close: &str,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    if let Some(tail) = tail {
        write!(f, " . {tail}")?;
    }
    f.write_str(close)
}

/// Error produced by the reader, positioned at the offending character
#[derive(Error, Debug, Clone, PartialEq)]
#[error("line {line}, column {column}: {kind}")]
pub struct SexpError {
    /// 1-based line number
    pub line: usize,
    /// 1-based column number
    pub column: usize,
    pub kind: SexpErrorKind,
}

/// What went wrong while reading
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SexpErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("unexpected '{0}'")]
    Unexpected(char),

    #[error("unterminated string")]
    UnterminatedString,

    #[error("misplaced dot")]
    MisplacedDot,

    #[error("trailing input starting with '{0}'")]
    TrailingInput(char),

    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),

    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),
}
