// src/sexp/parser.rs

//! Recursive-descent reader for Emacs Lisp printed data

use std::str::Chars;

use super::{Sexp, SexpError, SexpErrorKind};

/// Deepest list, vector or quote nesting the reader accepts
pub const MAX_DEPTH: usize = 512;

/// Read exactly one datum from `input`
///
/// Leading and trailing whitespace and comments are ignored; anything else
/// after the datum is an error.
pub fn parse(input: &str) -> Result<Sexp, SexpError> {
    let mut reader = Reader::new(input);
    let datum = reader.read_datum()?;
    reader.skip_whitespace();
    match reader.peek() {
        None => Ok(datum),
        Some(c) => Err(reader.error(SexpErrorKind::TrailingInput(c))),
    }
}

/// Characters that end an atom
fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | '"' | ';' | '\'')
}

struct Reader<'a> {
    chars: Chars<'a>,
    line: usize,
    column: usize,
    depth: usize,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars(),
            line: 1,
            column: 1,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, kind: SexpErrorKind) -> SexpError {
        SexpError {
            line: self.line,
            column: self.column,
            kind,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c == ';' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    /// A lone `.` followed by a delimiter separates the tail of a dotted list
    fn at_dot(&self) -> bool {
        self.peek() == Some('.') && self.peek_second().is_none_or(is_delimiter)
    }

    /// Run `read` one nesting level deeper, failing past [`MAX_DEPTH`]
    fn nested<F>(&mut self, read: F) -> Result<Sexp, SexpError>
    where
        F: FnOnce(&mut Self) -> Result<Sexp, SexpError>,
    {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(SexpErrorKind::TooDeep(MAX_DEPTH)));
        }
        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        result
    }

    fn read_datum(&mut self) -> Result<Sexp, SexpError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(self.error(SexpErrorKind::UnexpectedEof)),
            Some('(') => {
                self.bump();
                self.nested(Self::read_list)
            }
            Some('[') => {
                self.bump();
                self.nested(Self::read_vector)
            }
            Some('"') => {
                self.bump();
                self.read_string()
            }
            Some('\'') => {
                self.bump();
                self.nested(|reader| {
                    let quoted = reader.read_datum()?;
                    Ok(Sexp::List(vec![Sexp::symbol("quote"), quoted]))
                })
            }
            Some(c @ (')' | ']')) => Err(self.error(SexpErrorKind::Unexpected(c))),
            Some(_) => {
                if self.at_dot() {
                    return Err(self.error(SexpErrorKind::MisplacedDot));
                }
                Ok(self.read_atom())
            }
        }
    }

    fn read_list(&mut self) -> Result<Sexp, SexpError> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(self.error(SexpErrorKind::UnexpectedEof)),
                Some(')') => {
                    self.bump();
                    return Ok(Sexp::List(items));
                }
                Some(']') => return Err(self.error(SexpErrorKind::Unexpected(']'))),
                Some(_) if self.at_dot() => {
                    if items.is_empty() {
                        return Err(self.error(SexpErrorKind::MisplacedDot));
                    }
                    self.bump();
                    let tail = self.read_datum()?;
                    self.skip_whitespace();
                    match self.peek() {
                        Some(')') => {
                            self.bump();
                        }
                        Some(c) => return Err(self.error(SexpErrorKind::Unexpected(c))),
                        None => return Err(self.error(SexpErrorKind::UnexpectedEof)),
                    }
                    return Ok(join_tail(items, tail));
                }
                Some(_) => items.push(self.read_datum()?),
            }
        }
    }

    fn read_vector(&mut self) -> Result<Sexp, SexpError> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(self.error(SexpErrorKind::UnexpectedEof)),
                Some(']') => {
                    self.bump();
                    return Ok(Sexp::Vector(items));
                }
                Some(')') => return Err(self.error(SexpErrorKind::Unexpected(')'))),
                Some(_) => items.push(self.read_datum()?),
            }
        }
    }

    /// Read a string body after the opening quote
    ///
    /// Decodes the character escapes of the Emacs reader: control letters,
    /// `\xN...` (any number of hex digits), `\uNNNN`, `\UNNNNNNNN` and up to
    /// three octal digits. Named escapes (`\N{...}`) are not decoded; the
    /// backslash is dropped and the name is kept as text.
    fn read_string(&mut self) -> Result<Sexp, SexpError> {
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error(SexpErrorKind::UnterminatedString)),
                Some('"') => return Ok(Sexp::Str(value)),
                Some('\\') => match self.bump() {
                    None => return Err(self.error(SexpErrorKind::UnterminatedString)),
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('e') => value.push('\u{1b}'),
                    Some('a') => value.push('\u{7}'),
                    Some('b') => value.push('\u{8}'),
                    Some('f') => value.push('\u{c}'),
                    Some('v') => value.push('\u{b}'),
                    Some('d') => value.push('\u{7f}'),
                    Some('s') => value.push(' '),
                    Some('x') => value.push(self.read_code_point('x', 16, 1, usize::MAX)?),
                    Some('u') => value.push(self.read_code_point('u', 16, 4, 4)?),
                    Some('U') => value.push(self.read_code_point('U', 16, 8, 8)?),
                    Some(c @ '0'..='7') => {
                        let rest = self.read_digits(8, 2);
                        let code = rest
                            .iter()
                            .fold(Some(c as u32 - '0' as u32), |acc, d| {
                                acc.map(|n| n * 8 + d)
                            });
                        value.push(self.code_point(c, code)?);
                    }
                    // escaped newline and escaped space are both ignored
                    Some('\n') | Some(' ') => {}
                    Some(c) => value.push(c),
                },
                Some(c) => value.push(c),
            }
        }
    }

    /// Consume up to `max` digits of `radix`, returning their values
    fn read_digits(&mut self, radix: u32, max: usize) -> Vec<u32> {
        let mut digits = Vec::new();
        while digits.len() < max {
            match self.peek().and_then(|c| c.to_digit(radix)) {
                Some(d) => {
                    self.bump();
                    digits.push(d);
                }
                None => break,
            }
        }
        digits
    }

    /// Read the digits of a numeric escape introduced by `escape`
    fn read_code_point(
        &mut self,
        escape: char,
        radix: u32,
        min: usize,
        max: usize,
    ) -> Result<char, SexpError> {
        let digits = self.read_digits(radix, max);
        if digits.len() < min {
            return Err(self.error(SexpErrorKind::InvalidEscape(escape)));
        }
        let code = digits
            .iter()
            .try_fold(0u32, |acc, d| acc.checked_mul(radix)?.checked_add(*d));
        self.code_point(escape, code)
    }

    fn code_point(&self, escape: char, code: Option<u32>) -> Result<char, SexpError> {
        code.and_then(char::from_u32)
            .ok_or_else(|| self.error(SexpErrorKind::InvalidEscape(escape)))
    }

    fn read_atom(&mut self) -> Sexp {
        let mut token = String::new();
        let mut escaped = false;
        while let Some(c) = self.peek() {
            if is_delimiter(c) {
                break;
            }
            self.bump();
            if c == '\\' {
                if let Some(next) = self.bump() {
                    token.push(next);
                    escaped = true;
                }
            } else {
                token.push(c);
            }
        }

        if escaped {
            return Sexp::Symbol(token);
        }
        parse_number(&token).unwrap_or(Sexp::Symbol(token))
    }
}

/// Splice a dotted tail back into proper-list form where possible
///
/// `(a . (b c))` reads as `(a b c)` and `(a . nil)` as `(a)`.
fn join_tail(mut items: Vec<Sexp>, tail: Sexp) -> Sexp {
    match tail {
        Sexp::List(rest) => {
            items.extend(rest);
            Sexp::List(items)
        }
        Sexp::Dotted(rest, tail) => {
            items.extend(rest);
            Sexp::Dotted(items, tail)
        }
        Sexp::Symbol(ref name) if name == "nil" => Sexp::List(items),
        tail => Sexp::Dotted(items, Box::new(tail)),
    }
}

/// Interpret a token as an integer or float, following the Lisp reader
///
/// `1.` is an integer; `.5`, `1.5` and `1e3` are floats. Tokens that merely
/// start like numbers (`1+`, `-`, `+inf`) stay symbols. Integers too large
/// for `i64` are kept exactly as [`Sexp::BigInt`].
fn parse_number(token: &str) -> Option<Sexp> {
    let unsigned = token.strip_prefix(['+', '-']).unwrap_or(token);
    let first = unsigned.chars().next()?;
    if !(first.is_ascii_digit() || first == '.') {
        return None;
    }
    if !unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }

    let integer = token.strip_suffix('.').unwrap_or(token);
    if let Ok(n) = integer.trim_start_matches('+').parse::<i64>() {
        return Some(Sexp::Int(n));
    }
    if let Some(digits) = big_integer(integer) {
        return Some(Sexp::BigInt(digits));
    }
    token.parse::<f64>().ok().map(Sexp::Float)
}

/// Canonical decimal text of an integer token, without `+` or leading zeros
fn big_integer(token: &str) -> Option<String> {
    let (negative, magnitude) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };
    if magnitude.is_empty() || !magnitude.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let magnitude = magnitude.trim_start_matches('0');
    Some(match (negative, magnitude.is_empty()) {
        (_, true) => "0".to_string(),
        (true, false) => format!("-{magnitude}"),
        (false, false) => magnitude.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str) -> Sexp {
        Sexp::symbol(name)
    }

    #[test]
    fn test_parse_integers() {
        assert_eq!(parse("42").unwrap(), Sexp::Int(42));
        assert_eq!(parse("-1").unwrap(), Sexp::Int(-1));
        assert_eq!(parse("+7").unwrap(), Sexp::Int(7));
        assert_eq!(parse("3.").unwrap(), Sexp::Int(3));
    }

    #[test]
    fn test_parse_big_integers() {
        assert_eq!(
            parse("99999999999999999999").unwrap(),
            Sexp::BigInt("99999999999999999999".to_string())
        );
        assert_eq!(
            parse("+0099999999999999999999.").unwrap(),
            Sexp::BigInt("99999999999999999999".to_string())
        );
        assert_eq!(
            parse("-99999999999999999999").unwrap(),
            Sexp::BigInt("-99999999999999999999".to_string())
        );
        // exponent forms stay floats whatever their size
        assert_eq!(parse("1e30").unwrap(), Sexp::Float(1e30));
    }

    #[test]
    fn test_parse_floats() {
        assert_eq!(parse("1.5").unwrap(), Sexp::Float(1.5));
        assert_eq!(parse(".5").unwrap(), Sexp::Float(0.5));
        assert_eq!(parse("1e3").unwrap(), Sexp::Float(1000.0));
    }

    #[test]
    fn test_number_like_symbols() {
        assert_eq!(parse("1+").unwrap(), sym("1+"));
        assert_eq!(parse("-").unwrap(), sym("-"));
        assert_eq!(parse("+inf").unwrap(), sym("+inf"));
        assert_eq!(parse("nan").unwrap(), sym("nan"));
    }

    #[test]
    fn test_parse_symbols() {
        assert_eq!(parse("single").unwrap(), sym("single"));
        assert_eq!(parse(":url").unwrap(), sym(":url"));
        assert_eq!(parse("c\\+\\+-mode").unwrap(), sym("c++-mode"));
        // an escaped digit run is a symbol, not a number
        assert_eq!(parse("\\123").unwrap(), sym("123"));
    }

    #[test]
    fn test_parse_strings() {
        assert_eq!(parse(r#""plain""#).unwrap(), Sexp::string("plain"));
        assert_eq!(
            parse(r#""say \"hi\"\n""#).unwrap(),
            Sexp::string("say \"hi\"\n")
        );
        assert_eq!(
            parse("\"line one \\\ncontinued\"").unwrap(),
            Sexp::string("line one continued")
        );
        assert_eq!(parse(r#""a\\b""#).unwrap(), Sexp::string("a\\b"));
    }

    #[test]
    fn test_parse_numeric_string_escapes() {
        assert_eq!(parse(r#""\x41BC""#).unwrap(), Sexp::string("\u{41bc}"));
        assert_eq!(parse(r#""\x41\ BC""#).unwrap(), Sexp::string("ABC"));
        assert_eq!(parse(r#""caf\u00e9""#).unwrap(), Sexp::string("café"));
        assert_eq!(parse(r#""\U0001F600!""#).unwrap(), Sexp::string("\u{1f600}!"));
        assert_eq!(parse(r#""\101\0429""#).unwrap(), Sexp::string("A\u{22}9"));
        assert_eq!(parse(r#""a\sb\d""#).unwrap(), Sexp::string("a b\u{7f}"));
    }

    #[test]
    fn test_invalid_string_escapes() {
        assert_eq!(
            parse(r#""\xZZ""#).unwrap_err().kind,
            SexpErrorKind::InvalidEscape('x')
        );
        assert_eq!(
            parse(r#""\u12""#).unwrap_err().kind,
            SexpErrorKind::InvalidEscape('u')
        );
        assert_eq!(
            parse(r#""\UFFFFFFFF""#).unwrap_err().kind,
            SexpErrorKind::InvalidEscape('U')
        );
        assert_eq!(
            parse(r#""\xd800""#).unwrap_err().kind,
            SexpErrorKind::InvalidEscape('x')
        );
    }

    #[test]
    fn test_parse_lists_and_vectors() {
        assert_eq!(
            parse("(1 2 (3))").unwrap(),
            Sexp::List(vec![
                Sexp::Int(1),
                Sexp::Int(2),
                Sexp::List(vec![Sexp::Int(3)])
            ])
        );
        assert_eq!(
            parse("[a \"b\" ()]").unwrap(),
            Sexp::Vector(vec![sym("a"), Sexp::string("b"), Sexp::List(vec![])])
        );
    }

    #[test]
    fn test_parse_dotted_pairs() {
        assert_eq!(
            parse("(:url . \"https://example.org\")").unwrap(),
            Sexp::Dotted(vec![sym(":url")], Box::new(Sexp::string("https://example.org")))
        );
        assert_eq!(
            parse("(a . (b c))").unwrap(),
            Sexp::List(vec![sym("a"), sym("b"), sym("c")])
        );
        assert_eq!(parse("(a . nil)").unwrap(), Sexp::List(vec![sym("a")]));
        // a dot inside a symbol is not a separator
        assert_eq!(
            parse("(a.b .c)").unwrap(),
            Sexp::List(vec![sym("a.b"), sym(".c")])
        );
    }

    #[test]
    fn test_parse_quote_and_comments() {
        assert_eq!(
            parse("; header\n'(x) ; trailing").unwrap(),
            Sexp::List(vec![sym("quote"), Sexp::List(vec![sym("x")])])
        );
    }

    #[test]
    fn test_parse_archive_entry() {
        let text = r#"(1
 (ace-window .
   [(0 10 0)
    ((avy (0 5 0)))
    "Quickly switch windows." single
    ((:url . "https://github.com/abo-abo/ace-window")
     (:keywords "window" "location"))]))"#;
        let feed = parse(text).unwrap();
        let entries = feed.cdr().unwrap();
        assert_eq!(entries.len(), 1);
        match &entries[0] {
            Sexp::Dotted(head, info) => {
                assert_eq!(head, &vec![sym("ace-window")]);
                assert_eq!(info.as_items().map(|i| i.len()), Some(5));
            }
            other => panic!("expected dotted entry, got {other}"),
        }
    }

    #[test]
    fn test_error_unterminated_list() {
        let err = parse("(1 (foo").unwrap_err();
        assert_eq!(err.kind, SexpErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_error_unterminated_string() {
        let err = parse("\"open").unwrap_err();
        assert_eq!(err.kind, SexpErrorKind::UnterminatedString);
    }

    #[test]
    fn test_error_position() {
        let err = parse("(1\n  ])").unwrap_err();
        assert_eq!(err.kind, SexpErrorKind::Unexpected(']'));
        assert_eq!((err.line, err.column), (2, 3));
    }

    #[test]
    fn test_error_misplaced_dot() {
        assert_eq!(parse("( . a)").unwrap_err().kind, SexpErrorKind::MisplacedDot);
        assert_eq!(parse("(a . b c)").unwrap_err().kind, SexpErrorKind::Unexpected('c'));
    }

    #[test]
    fn test_error_trailing_input() {
        assert_eq!(parse("(1) 2").unwrap_err().kind, SexpErrorKind::TrailingInput('2'));
    }

    #[test]
    fn test_nesting_limit() {
        let err = parse(&"(".repeat(100_000)).unwrap_err();
        assert_eq!(err.kind, SexpErrorKind::TooDeep(MAX_DEPTH));

        let deep = format!("(1 {}{})", "[".repeat(200_000), "]".repeat(200_000));
        assert_eq!(parse(&deep).unwrap_err().kind, SexpErrorKind::TooDeep(MAX_DEPTH));

        let quotes = format!("{}x", "'".repeat(100_000));
        assert_eq!(parse(&quotes).unwrap_err().kind, SexpErrorKind::TooDeep(MAX_DEPTH));
    }

    #[test]
    fn test_nesting_at_limit() {
        let text = format!("{}{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(parse(&text).is_ok());

        let text = format!("{}{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(parse(&text).unwrap_err().kind, SexpErrorKind::TooDeep(MAX_DEPTH));
    }

    #[test]
    fn test_error_empty_input() {
        assert_eq!(parse("  ; only a comment").unwrap_err().kind, SexpErrorKind::UnexpectedEof);
    }
}
