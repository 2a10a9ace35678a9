//! Format string tokenizer.
//!
//! Placeholder grammar, in order:
//!
//! ```text
//! %[N$ | (path)][+][0 | 'c][-][width][.precision]conversion
//! ```
//!
//! `N` starts with `1-9`, `c` is any character but `$`, and `conversion` is one
//! of `b c d e f o s u x X`. `%%` is a literal percent sign.
//!
//! Widths above [`MAX_WIDTH`] and precisions above [`MAX_PRECISION`] are
//! rejected as syntax errors. 100 digits is also the most `toFixed` and
//! `toExponential` accept.

use super::error::FormatError;
use super::types::{
    Argument,
    Conversion,
    FormatInstruction,
    PadChar,
    PathSegment,
    Placeholder,
};

/// Largest accepted field width.
pub const MAX_WIDTH: usize = 1024;

/// Largest accepted precision.
pub const MAX_PRECISION: usize = 100;

/// Character cursor over a string slice, tracking the byte offset.
struct Cursor<'a> {
    /// Text being scanned
    text: &'a str,
    /// Byte offset of the next character
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Cursor at the start of `text`.
    const fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Unconsumed input.
    fn rest(&self) -> &'a str {
        self.text.get(self.pos..).unwrap_or_default()
    }

    /// Next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes one character.
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes `expected` if it comes next.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consumes a run of ASCII digits; `None` when there is none.
    fn digits(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let len = rest.bytes().take_while(u8::is_ascii_digit).count();
        if len == 0 {
            return None;
        }
        self.pos += len;
        rest.get(..len)
    }

    /// Whether all input is consumed.
    fn is_done(&self) -> bool {
        self.pos >= self.text.len()
    }
}

/// Which placeholder styles a format string has used so far.
#[derive(Debug, Default, Clone, Copy)]
struct Styles {
    /// `%(path)s` seen
    named: bool,
    /// `%s` or `%1$s` seen
    positional: bool,
}

/// Parses `format` into instructions without consulting any cache.
///
/// # Errors
/// - [`FormatError::Syntax`] for a `%` that does not start a valid placeholder,
///   including one whose width or precision is over the limit
/// - [`FormatError::MixedPlaceholderStyle`] when named and positional placeholders meet
pub fn parse_format(format: &str) -> Result<Vec<FormatInstruction>, FormatError> {
    let mut instructions = Vec::new();
    let mut literal = String::new();
    let mut styles = Styles::default();
    let mut cursor = Cursor::new(format);

    while let Some(c) = cursor.bump() {
        if c != '%' {
            literal.push(c);
            continue;
        }
        let offset = cursor.pos - 1;
        if cursor.eat('%') {
            literal.push('%');
            continue;
        }

        let placeholder = parse_placeholder(&mut cursor).ok_or(FormatError::Syntax { offset })?;
        if placeholder.argument.is_named() {
            styles.named = true;
        } else {
            styles.positional = true;
        }
        if styles.named && styles.positional {
            return Err(FormatError::MixedPlaceholderStyle);
        }

        if !literal.is_empty() {
            instructions.push(FormatInstruction::Literal(std::mem::take(&mut literal)));
        }
        instructions.push(FormatInstruction::Placeholder(placeholder));
    }

    if !literal.is_empty() {
        instructions.push(FormatInstruction::Literal(literal));
    }
    Ok(instructions)
}

/// Parses everything after the leading `%`.
fn parse_placeholder(cursor: &mut Cursor<'_>) -> Option<Placeholder> {
    let argument = if let Some(index) = explicit_index(cursor) {
        Argument::Index(index)
    } else if cursor.eat('(') {
        let rest = cursor.rest();
        let close = rest.find(')')?;
        let path = parse_path(rest.get(..close)?)?;
        cursor.pos += close + 1;
        Argument::Path(path)
    } else {
        Argument::Next
    };

    let sign = cursor.eat('+');

    let pad = if cursor.eat('0') {
        Some(PadChar::Zero)
    } else if cursor.eat('\'') {
        match cursor.bump()? {
            '$' => return None,
            c => Some(PadChar::Custom(c)),
        }
    } else {
        None
    };

    let left_align = cursor.eat('-');

    let width = match cursor.digits() {
        Some(digits) => Some(bounded(digits, MAX_WIDTH)?),
        None => None,
    };

    let precision =
        if cursor.eat('.') { Some(bounded(cursor.digits()?, MAX_PRECISION)?) } else { None };

    let conversion = Conversion::from_code(cursor.bump()?)?;

    Some(Placeholder { argument, conversion, sign, pad, left_align, width, precision })
}

/// Decimal `digits` when they do not exceed `max`.
fn bounded(digits: &str, max: usize) -> Option<usize> {
    digits.parse().ok().filter(|value| *value <= max)
}

/// `N$` with `N >= 1`. Rewinds when the digits are not followed by `$`.
fn explicit_index(cursor: &mut Cursor<'_>) -> Option<usize> {
    if !matches!(cursor.peek(), Some('1'..='9')) {
        return None;
    }
    let start = cursor.pos;
    let index = cursor.digits().and_then(|digits| digits.parse().ok());
    match index {
        Some(index) if cursor.eat('$') => Some(index),
        _ => {
            cursor.pos = start;
            None
        }
    }
}

/// `name(.name | [digits])*`, identifiers being `[A-Za-z_][A-Za-z0-9_]*`.
fn parse_path(text: &str) -> Option<Vec<PathSegment>> {
    let mut cursor = Cursor::new(text);
    let mut segments = vec![PathSegment::Key(identifier(&mut cursor)?)];

    while !cursor.is_done() {
        if cursor.eat('.') {
            segments.push(PathSegment::Key(identifier(&mut cursor)?));
        } else if cursor.eat('[') {
            let index = cursor.digits()?.parse().ok()?;
            if !cursor.eat(']') {
                return None;
            }
            segments.push(PathSegment::Index(index));
        } else {
            return None;
        }
    }

    Some(segments)
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn identifier(cursor: &mut Cursor<'_>) -> Option<String> {
    let rest = cursor.rest();
    let mut chars = rest.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_') {
        return None;
    }
    let len = 1 + chars.take_while(|c| c.is_ascii_alphanumeric() || *c == '_').count();
    cursor.pos += len;
    rest.get(..len).map(str::to_string)
}
