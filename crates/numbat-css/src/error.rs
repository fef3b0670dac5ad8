//! Diagnostics produced by the tokenizer, the stylesheet parser and the
//! selector parser.
//!
//! Nothing in this crate returns `Err` for malformed CSS. Every problem is
//! appended to a caller-owned `Vec<CssError>` and parsing continues with a
//! best-effort result, so callers can report all problems at once.

use serde::ser::{Serialize, SerializeMap, Serializer};
use strum_macros::{Display, EnumString};
use thiserror::Error;

/// A source position: 1-based line, 0-based column (in code points of the
/// normalised input).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct Position {
    /// Line number, starting at the caller-supplied start line.
    pub line: u32,
    /// Column number, counted in code points.
    pub col: u32,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

/// The stage that detected an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, serde::Serialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    /// Lexical problems: unterminated strings and comments, stray
    /// backslashes, bad urls.
    Tokenization,
    /// Structural problems in rules and declarations.
    Parsing,
    /// Problems in selector preludes.
    Selectors,
}

/// A recoverable syntax error with its source position.
///
/// Displays as `:LINE:COL TYPE - message`, the format the validator prints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(":{}:{} {} - {}", .position.line, .position.col, .error_type, .msg)]
pub struct CssError {
    /// Where the problem was detected.
    pub position: Position,
    /// Which stage detected it.
    pub error_type: ErrorType,
    /// Human-readable description.
    pub msg: String,
    /// Extra context for message templating, e.g. `["style", "media"]`.
    pub params: Vec<String>,
}

/// Context name carried by every parser and selector error.
pub(crate) const STYLE_CONTEXT: &str = "style";

impl CssError {
    /// Create an error without params.
    #[must_use]
    pub fn new(error_type: ErrorType, position: Position, msg: impl Into<String>) -> Self {
        Self {
            position,
            error_type,
            msg: msg.into(),
            params: Vec::new(),
        }
    }

    /// A TOKENIZATION error.
    #[must_use]
    pub fn tokenization(position: Position, msg: impl Into<String>) -> Self {
        Self::new(ErrorType::Tokenization, position, msg)
    }

    /// A PARSING error in the `style` context.
    #[must_use]
    pub fn parsing(position: Position, msg: impl Into<String>) -> Self {
        Self::new(ErrorType::Parsing, position, msg).with_params([STYLE_CONTEXT])
    }

    /// A SELECTORS error in the `style` context.
    #[must_use]
    pub fn selectors(position: Position, msg: impl Into<String>) -> Self {
        Self::new(ErrorType::Selectors, position, msg).with_params([STYLE_CONTEXT])
    }

    /// Replace the params.
    #[must_use]
    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }
}

impl Serialize for CssError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(6))?;
        map.serialize_entry("line", &self.position.line)?;
        map.serialize_entry("col", &self.position.col)?;
        map.serialize_entry("tokenType", "ERROR")?;
        map.serialize_entry("errorType", &self.error_type)?;
        map.serialize_entry("msg", &self.msg)?;
        map.serialize_entry("params", &self.params)?;
        map.end()
    }
}

/// Render errors one per line, in the order they were recorded.
#[must_use]
pub fn errors_to_string(errors: &[CssError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let error = CssError::tokenization(Position::new(1, 1), "unterminated string");
        assert_eq!(error.to_string(), ":1:1 TOKENIZATION - unterminated string");
    }

    #[test]
    fn test_parsing_errors_carry_style_context() {
        let error = CssError::parsing(Position::new(2, 5), "Incomplete declaration");
        assert_eq!(error.params, vec!["style".to_string()]);
        assert_eq!(error.to_string(), ":2:5 PARSING - Incomplete declaration");
    }

    #[test]
    fn test_error_type_round_trips_through_strum() {
        assert_eq!("SELECTORS".parse::<ErrorType>(), Ok(ErrorType::Selectors));
        assert_eq!(ErrorType::Tokenization.to_string(), "TOKENIZATION");
    }

    #[test]
    fn test_errors_to_string_joins_lines() {
        let errors = vec![
            CssError::selectors(Position::new(1, 8), "no selector found"),
            CssError::selectors(Position::new(1, 8), "unparsed input remains"),
        ];
        assert_eq!(
            errors_to_string(&errors),
            ":1:8 SELECTORS - no selector found\n:1:8 SELECTORS - unparsed input remains"
        );
    }
}
