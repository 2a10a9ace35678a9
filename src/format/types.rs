//! Parsed representation of a format string.

use std::fmt;

/// One parsed unit of a format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatInstruction {
    /// Text emitted verbatim (`%%` is already folded into a single `%`).
    Literal(String),
    /// A `%` placeholder.
    Placeholder(Placeholder),
}

/// A `%...` placeholder descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub argument: Argument,
    pub conversion: Conversion,
    /// `+`: prefix non-negative `d`/`e`/`f` values with a plus sign.
    pub sign: bool,
    /// `0` or `'c`. `None` pads with spaces.
    pub pad: Option<PadChar>,
    /// `-`: padding goes after the value.
    pub left_align: bool,
    pub width: Option<usize>,
    pub precision: Option<usize>,
}

impl Placeholder {
    /// Placeholder with no flags, width or precision.
    #[must_use]
    pub const fn new(argument: Argument, conversion: Conversion) -> Self {
        Self {
            argument,
            conversion,
            sign: false,
            pad: None,
            left_align: false,
            width: None,
            precision: None,
        }
    }

    /// Character used to fill up to `width`.
    #[must_use]
    pub const fn pad_char(&self) -> char {
        match self.pad {
            Some(PadChar::Zero) => '0',
            Some(PadChar::Custom(c)) => c,
            None => ' ',
        }
    }
}

/// Where a placeholder takes its value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// `%s`: the next unconsumed argument.
    Next,
    /// `%2$s`: a fixed, 1-based argument index.
    Index(usize),
    /// `%(user.names[0])s`: a path walked from the current argument.
    Path(Vec<PathSegment>),
}

impl Argument {
    /// Named-path placeholders cannot share a format string with positional ones.
    #[must_use]
    pub const fn is_named(&self) -> bool {
        matches!(self, Self::Path(_))
    }
}

/// One step of a named path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// `.name` (or the leading identifier).
    Key(String),
    /// `[3]`
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Padding character selected by the pad flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadChar {
    /// `0`
    Zero,
    /// `'c`
    Custom(char),
}

/// Conversion code ending a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    /// `b`
    Binary,
    /// `c`
    Char,
    /// `d`
    Decimal,
    /// `e`
    Exponential,
    /// `f`
    Fixed,
    /// `o`
    Octal,
    /// `s`
    String,
    /// `u`
    Unsigned,
    /// `x`
    LowerHex,
    /// `X`
    UpperHex,
}

impl Conversion {
    /// Maps a conversion code to its conversion.
    #[must_use]
    pub const fn from_code(code: char) -> Option<Self> {
        Some(match code {
            'b' => Self::Binary,
            'c' => Self::Char,
            'd' => Self::Decimal,
            'e' => Self::Exponential,
            'f' => Self::Fixed,
            'o' => Self::Octal,
            's' => Self::String,
            'u' => Self::Unsigned,
            'x' => Self::LowerHex,
            'X' => Self::UpperHex,
            _ => return None,
        })
    }

    /// Conversion character as written after the flags.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Binary => 'b',
            Self::Char => 'c',
            Self::Decimal => 'd',
            Self::Exponential => 'e',
            Self::Fixed => 'f',
            Self::Octal => 'o',
            Self::String => 's',
            Self::Unsigned => 'u',
            Self::LowerHex => 'x',
            Self::UpperHex => 'X',
        }
    }

    /// Every conversion except `s` needs a numeric argument.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        !matches!(self, Self::String)
    }

    /// Conversions that honor the `+` flag.
    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::Decimal | Self::Exponential | Self::Fixed)
    }
}
