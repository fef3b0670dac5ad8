//! CSS Token types per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
//!
//! "The output of the tokenization step is a stream of zero or more of the
//! following tokens: `<ident-token>`, `<function-token>`, `<at-keyword-token>`,
//! `<hash-token>`, `<string-token>`, `<bad-string-token>`, `<url-token>`,
//! `<bad-url-token>`, `<delim-token>`, `<number-token>`, `<percentage-token>`,
//! `<dimension-token>`, `<unicode-range-token>`, `<whitespace-token>`,
//! `<CDO-token>`, `<CDC-token>`, `<colon-token>`, `<semicolon-token>`,
//! `<comma-token>`, `<[-token>`, `<]-token>`, `<(-token>`, `<)-token>`, `<{-token>`,
//! and `<}-token>`."
//!
//! Unterminated strings are reported as errors and produce no token, so there
//! is no `<bad-string-token>` variant. Unicode ranges tokenize as idents and
//! numbers. The match tokens of CSS Syntax Level 3's first edition
//! (`~=`, `|=`, `^=`, `$=`, `*=`, `||`) are kept as single tokens because the
//! selector grammar relies on them.

use core::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use strum_macros::{Display, IntoStaticStr};

use super::serialize::{escape_hash, escape_ident, escape_string, format_number};
use crate::error::Position;

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// "A `<hash-token>` with the type flag set to 'id'... or 'unrestricted'."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum HashType {
    /// "id" - the hash token's value is a valid identifier
    Id,
    /// "unrestricted" - the hash token's value is not a valid identifier
    Unrestricted,
}

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// "A `<number-token>` has a type flag set to either 'integer' or 'number'."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum NumericType {
    /// "integer" - the number is an integer
    Integer,
    /// "number" - the number has a decimal point or exponent
    Number,
}

/// The `tokenType` discriminant shared by tokens and parse-tree nodes.
///
/// The string forms are the ones the validator's diagnostics and JSON
/// fixtures use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum TokenType {
    /// `IDENT`
    #[strum(serialize = "IDENT")]
    Ident,
    /// `FUNCTION_TOKEN`
    #[strum(serialize = "FUNCTION_TOKEN")]
    Function,
    /// `AT-KEYWORD`
    #[strum(serialize = "AT-KEYWORD")]
    AtKeyword,
    /// `HASH`
    #[strum(serialize = "HASH")]
    Hash,
    /// `STRING`
    #[strum(serialize = "STRING")]
    String,
    /// `URL`
    #[strum(serialize = "URL")]
    Url,
    /// `BAD_URL`
    #[strum(serialize = "BAD_URL")]
    BadUrl,
    /// `DELIM`
    #[strum(serialize = "DELIM")]
    Delim,
    /// `NUMBER`
    #[strum(serialize = "NUMBER")]
    Number,
    /// `PERCENTAGE`
    #[strum(serialize = "PERCENTAGE")]
    Percentage,
    /// `DIMENSION`
    #[strum(serialize = "DIMENSION")]
    Dimension,
    /// INCLUDE-MATCH, `~=`
    #[strum(serialize = "~=")]
    IncludeMatch,
    /// DASH-MATCH, `|=`
    #[strum(serialize = "|=")]
    DashMatch,
    /// PREFIX-MATCH, `^=`
    #[strum(serialize = "^=")]
    PrefixMatch,
    /// SUFFIX-MATCH, `$=`
    #[strum(serialize = "$=")]
    SuffixMatch,
    /// SUBSTRING-MATCH, `*=`
    #[strum(serialize = "*=")]
    SubstringMatch,
    /// COLUMN, `||`
    #[strum(serialize = "||")]
    Column,
    /// `WHITESPACE`
    #[strum(serialize = "WHITESPACE")]
    Whitespace,
    /// `CDO`
    #[strum(serialize = "CDO")]
    CDO,
    /// `CDC`
    #[strum(serialize = "CDC")]
    CDC,
    /// `:`
    #[strum(serialize = ":")]
    Colon,
    /// `;`
    #[strum(serialize = ";")]
    Semicolon,
    /// `,`
    #[strum(serialize = ",")]
    Comma,
    /// `[`
    #[strum(serialize = "[")]
    LeftBracket,
    /// `]`
    #[strum(serialize = "]")]
    RightBracket,
    /// `(`
    #[strum(serialize = "(")]
    LeftParen,
    /// `)`
    #[strum(serialize = ")")]
    RightParen,
    /// `{`
    #[strum(serialize = "{")]
    LeftBrace,
    /// `}`
    #[strum(serialize = "}")]
    RightBrace,
    /// `EOF_TOKEN`
    #[strum(serialize = "EOF_TOKEN")]
    EOF,
    /// `ERROR`, used when serialising diagnostics.
    #[strum(serialize = "ERROR")]
    Error,
    /// `STYLESHEET` node.
    #[strum(serialize = "STYLESHEET")]
    Stylesheet,
    /// `AT_RULE` node.
    #[strum(serialize = "AT_RULE")]
    AtRule,
    /// `QUALIFIED_RULE` node.
    #[strum(serialize = "QUALIFIED_RULE")]
    QualifiedRule,
    /// `DECLARATION` node.
    #[strum(serialize = "DECLARATION")]
    Declaration,
    /// `PARSED_CSS_URL`, produced by URL extraction.
    #[strum(serialize = "PARSED_CSS_URL")]
    ParsedCssUrl,
}

impl Serialize for TokenType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let name: &'static str = self.into();
        serializer.serialize_str(name)
    }
}

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// CSS tokens as defined by the CSS Syntax Module Level 3 specification.
/// Each variant corresponds to a token type in the spec's railroad diagrams.
#[derive(Debug, Clone, PartialEq)]
pub enum CSSToken {
    /// "`<ident-token>`"
    /// "has a value composed of one or more code points"
    Ident(String),

    /// "`<function-token>`"
    /// "has a value composed of one or more code points, followed by U+0028 LEFT PARENTHESIS"
    Function(String),

    /// "`<at-keyword-token>`"
    /// "has a value composed of one or more code points, preceded by U+0040 COMMERCIAL AT (@)"
    AtKeyword(String),

    /// "`<hash-token>`"
    /// "has a value composed of one or more code points, preceded by U+0023 NUMBER SIGN (#)"
    /// "has a type flag set to either 'id' or 'unrestricted'"
    Hash {
        /// "a value composed of one or more code points"
        value: String,
        /// "a type flag set to either 'id' or 'unrestricted'"
        hash_type: HashType,
    },

    /// "`<string-token>`"
    /// "has a value composed of zero or more code points"
    String(String),

    /// "`<url-token>`"
    /// "has a value composed of zero or more code points"
    Url(String),

    /// "`<bad-url-token>`"
    /// "represents a parsing error"
    BadUrl,

    /// "`<delim-token>`"
    /// "has a value composed of a single code point"
    Delim(char),

    /// "`<number-token>`"
    /// "has a numeric value, and a type flag set to either 'integer' or 'number'"
    Number {
        /// "a numeric value"
        value: f64,
        /// The source text the value was converted from.
        repr: String,
        /// "a type flag set to either 'integer' or 'number'"
        numeric_type: NumericType,
    },

    /// "`<percentage-token>`"
    /// "has a numeric value"
    Percentage {
        /// "a numeric value"
        value: f64,
        /// The source text of the number, without the `%`.
        repr: String,
    },

    /// "`<dimension-token>`"
    /// "has a numeric value, a type flag, and a unit"
    Dimension {
        /// "a numeric value"
        value: f64,
        /// The source text of the number, without the unit.
        repr: String,
        /// "a type flag set to either 'integer' or 'number'"
        numeric_type: NumericType,
        /// "a unit"
        unit: String,
    },

    /// `~=`
    IncludeMatch,

    /// `|=`
    DashMatch,

    /// `^=`
    PrefixMatch,

    /// `$=`
    SuffixMatch,

    /// `*=`
    SubstringMatch,

    /// `||`
    Column,

    /// "`<whitespace-token>`"
    /// "represents one or more whitespace code points"
    Whitespace,

    /// "`<CDO-token>`"
    /// "represents the character sequence U+003C U+0021 U+002D U+002D (<!--)"
    CDO,

    /// "`<CDC-token>`"
    /// "represents the character sequence U+002D U+002D U+003E (-->)"
    CDC,

    /// "`<colon-token>`"
    /// "represents U+003A COLON (:)"
    Colon,

    /// "`<semicolon-token>`"
    /// "represents U+003B SEMICOLON (;)"
    Semicolon,

    /// "`<comma-token>`"
    /// "represents U+002C COMMA (,)"
    Comma,

    /// `<[-token>`
    /// "represents U+005B LEFT SQUARE BRACKET ([)"
    LeftBracket,

    /// `<]-token>`
    /// "represents U+005D RIGHT SQUARE BRACKET (])"
    RightBracket,

    /// `<(-token>`
    /// "represents U+0028 LEFT PARENTHESIS (()"
    LeftParen,

    /// `<)-token>`
    /// "represents U+0029 RIGHT PARENTHESIS ())"
    RightParen,

    /// `<{-token>`
    /// "represents U+007B LEFT CURLY BRACKET ({)"
    LeftBrace,

    /// `<}-token>`
    /// "represents U+007D RIGHT CURLY BRACKET (})"
    RightBrace,

    /// End of file - signals end of input
    EOF,
}

impl CSSToken {
    /// Create a new ident token.
    #[must_use]
    pub fn ident(value: impl Into<String>) -> Self {
        Self::Ident(value.into())
    }

    /// Create a new function token.
    #[must_use]
    pub fn function(name: impl Into<String>) -> Self {
        Self::Function(name.into())
    }

    /// Create a new at-keyword token.
    #[must_use]
    pub fn at_keyword(value: impl Into<String>) -> Self {
        Self::AtKeyword(value.into())
    }

    /// Create a new hash token with id type.
    #[must_use]
    pub fn hash_id(value: impl Into<String>) -> Self {
        Self::Hash {
            value: value.into(),
            hash_type: HashType::Id,
        }
    }

    /// Create a new hash token with unrestricted type.
    #[must_use]
    pub fn hash_unrestricted(value: impl Into<String>) -> Self {
        Self::Hash {
            value: value.into(),
            hash_type: HashType::Unrestricted,
        }
    }

    /// Create a new string token.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Create a new URL token.
    #[must_use]
    pub fn url(value: impl Into<String>) -> Self {
        Self::Url(value.into())
    }

    /// Create a new delim token.
    #[must_use]
    pub const fn delim(c: char) -> Self {
        Self::Delim(c)
    }

    /// The `tokenType` discriminant of this token.
    #[must_use]
    pub const fn token_type(&self) -> TokenType {
        match self {
            Self::Ident(_) => TokenType::Ident,
            Self::Function(_) => TokenType::Function,
            Self::AtKeyword(_) => TokenType::AtKeyword,
            Self::Hash { .. } => TokenType::Hash,
            Self::String(_) => TokenType::String,
            Self::Url(_) => TokenType::Url,
            Self::BadUrl => TokenType::BadUrl,
            Self::Delim(_) => TokenType::Delim,
            Self::Number { .. } => TokenType::Number,
            Self::Percentage { .. } => TokenType::Percentage,
            Self::Dimension { .. } => TokenType::Dimension,
            Self::IncludeMatch => TokenType::IncludeMatch,
            Self::DashMatch => TokenType::DashMatch,
            Self::PrefixMatch => TokenType::PrefixMatch,
            Self::SuffixMatch => TokenType::SuffixMatch,
            Self::SubstringMatch => TokenType::SubstringMatch,
            Self::Column => TokenType::Column,
            Self::Whitespace => TokenType::Whitespace,
            Self::CDO => TokenType::CDO,
            Self::CDC => TokenType::CDC,
            Self::Colon => TokenType::Colon,
            Self::Semicolon => TokenType::Semicolon,
            Self::Comma => TokenType::Comma,
            Self::LeftBracket => TokenType::LeftBracket,
            Self::RightBracket => TokenType::RightBracket,
            Self::LeftParen => TokenType::LeftParen,
            Self::RightParen => TokenType::RightParen,
            Self::LeftBrace => TokenType::LeftBrace,
            Self::RightBrace => TokenType::RightBrace,
            Self::EOF => TokenType::EOF,
        }
    }

    /// The string payload of ident, function, at-keyword, hash, string and
    /// url tokens.
    #[must_use]
    pub fn string_value(&self) -> Option<&str> {
        match self {
            Self::Ident(v)
            | Self::Function(v)
            | Self::AtKeyword(v)
            | Self::String(v)
            | Self::Url(v)
            | Self::Hash { value: v, .. } => Some(v),
            _ => None,
        }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EOF)
    }

    /// Returns true if this is a whitespace token.
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace)
    }

    /// Returns true if this is a delim token holding `c`.
    #[must_use]
    pub fn is_delim(&self, c: char) -> bool {
        matches!(self, Self::Delim(d) if *d == c)
    }

    /// Returns true if this is an ident token whose value is an ASCII
    /// case-insensitive match for `name`.
    #[must_use]
    pub fn is_ident_ignoring_case(&self, name: &str) -> bool {
        matches!(self, Self::Ident(v) if v.eq_ignore_ascii_case(name))
    }

    /// [§ 9 Serialization](https://www.w3.org/TR/css-syntax-3/#serialization)
    ///
    /// CSS source text for this token. Re-tokenizing the result yields a
    /// token of the same kind and value.
    #[must_use]
    pub fn to_source(&self) -> String {
        match self {
            Self::Ident(v) => escape_ident(v),
            Self::Function(v) => format!("{}(", escape_ident(v)),
            Self::AtKeyword(v) => format!("@{}", escape_ident(v)),
            Self::Hash {
                value,
                hash_type: HashType::Id,
            } => format!("#{}", escape_ident(value)),
            Self::Hash {
                value,
                hash_type: HashType::Unrestricted,
            } => format!("#{}", escape_hash(value)),
            Self::String(v) => format!("\"{}\"", escape_string(v)),
            Self::Url(v) => format!("url(\"{}\")", escape_string(v)),
            Self::Delim('\\') => "\\\n".to_string(),
            Self::Delim(c) => c.to_string(),
            Self::Number { repr, .. } => repr.clone(),
            Self::Percentage { repr, .. } => format!("{repr}%"),
            Self::Dimension { repr, unit, .. } => {
                let unit = escape_ident(unit);
                // A unit like `e3` would read back as an exponent.
                let mut chars = unit.chars();
                let ambiguous = chars.next().is_some_and(|c| c.eq_ignore_ascii_case(&'e'))
                    && chars.next().is_some_and(|c| c == '-' || c.is_ascii_digit());
                if ambiguous {
                    format!("{repr}\\65 {}", &unit[1..])
                } else {
                    format!("{repr}{unit}")
                }
            }
            Self::Whitespace => " ".to_string(),
            Self::CDO => "<!--".to_string(),
            Self::CDC => "-->".to_string(),
            Self::EOF => String::new(),
            other => other.token_type().to_string(),
        }
    }
}

/// Debug-style rendering used by the validator's token dumps:
/// `IDENT(foo) WS { ... EOF_TOKEN`.
impl fmt::Display for CSSToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(v) => write!(f, "IDENT({v})"),
            Self::Function(v) => write!(f, "FUNCTION_TOKEN({v})"),
            Self::AtKeyword(v) => write!(f, "AT({v})"),
            Self::Hash { value, .. } => write!(f, "HASH({value})"),
            Self::String(v) => write!(f, "\"{}\"", escape_string(v)),
            Self::Url(v) => write!(f, "URL({v})"),
            Self::Delim(c) => write!(f, "DELIM({c})"),
            Self::Number {
                value,
                numeric_type: NumericType::Integer,
                ..
            } => write!(f, "INT({})", format_number(*value)),
            Self::Number { value, .. } => write!(f, "NUMBER({})", format_number(*value)),
            Self::Percentage { value, .. } => write!(f, "PERCENTAGE({})", format_number(*value)),
            Self::Dimension { value, unit, .. } => {
                write!(f, "DIM({},{unit})", format_number(*value))
            }
            Self::Whitespace => write!(f, "WS"),
            other => write!(f, "{}", other.token_type()),
        }
    }
}

/// A token together with the position of its first code point.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What was scanned.
    pub kind: CSSToken,
    /// Where it starts.
    pub position: Position,
}

impl Token {
    /// Create a token.
    #[must_use]
    pub const fn new(kind: CSSToken, position: Position) -> Self {
        Self { kind, position }
    }

    /// An EOF token at `position`. The parser uses these to terminate
    /// preludes, values and extracted blocks.
    #[must_use]
    pub const fn eof_at(position: Position) -> Self {
        Self::new(CSSToken::EOF, position)
    }

    /// The `tokenType` discriminant.
    #[must_use]
    pub const fn token_type(&self) -> TokenType {
        self.kind.token_type()
    }

    /// Line of the first code point.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.position.line
    }

    /// Column of the first code point.
    #[must_use]
    pub const fn col(&self) -> u32 {
        self.position.col
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        self.kind.is_eof()
    }

    /// Returns true if this is a whitespace token.
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        self.kind.is_whitespace()
    }

    /// Returns true if this is a delim token holding `c`.
    #[must_use]
    pub fn is_delim(&self, c: char) -> bool {
        self.kind.is_delim(c)
    }

    /// CSS source text for this token.
    #[must_use]
    pub fn to_source(&self) -> String {
        self.kind.to_source()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

/// JSON value for a numeric payload. Integral values are written without a
/// fraction, the way JavaScript prints them.
enum JsonNumber {
    Int(i64),
    Float(f64),
}

impl JsonNumber {
    #[allow(clippy::cast_possible_truncation)]
    fn new(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
            Self::Int(value as i64)
        } else {
            Self::Float(value)
        }
    }
}

impl Serialize for JsonNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
        }
    }
}

/// Serialises as the validator's token JSON: `line`, `col`, `tokenType`
/// and the type-specific payload.
impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("line", &self.position.line)?;
        map.serialize_entry("col", &self.position.col)?;
        map.serialize_entry("tokenType", &self.token_type())?;
        match &self.kind {
            CSSToken::Ident(v)
            | CSSToken::Function(v)
            | CSSToken::AtKeyword(v)
            | CSSToken::String(v)
            | CSSToken::Url(v) => map.serialize_entry("value", v)?,
            CSSToken::Hash { value, hash_type } => {
                map.serialize_entry("type", &hash_type.to_string())?;
                map.serialize_entry("value", value)?;
            }
            CSSToken::Delim(c) => map.serialize_entry("value", &c.to_string())?,
            CSSToken::Number {
                value,
                repr,
                numeric_type,
            } => {
                map.serialize_entry("type", &numeric_type.to_string())?;
                map.serialize_entry("value", &JsonNumber::new(*value))?;
                map.serialize_entry("repr", repr)?;
            }
            CSSToken::Percentage { value, repr } => {
                map.serialize_entry("value", &JsonNumber::new(*value))?;
                map.serialize_entry("repr", repr)?;
            }
            CSSToken::Dimension {
                value,
                repr,
                numeric_type,
                unit,
            } => {
                map.serialize_entry("type", &numeric_type.to_string())?;
                map.serialize_entry("value", &JsonNumber::new(*value))?;
                map.serialize_entry("repr", repr)?;
                map.serialize_entry("unit", unit)?;
            }
            _ => {}
        }
        map.end()
    }
}
