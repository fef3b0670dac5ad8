use log::{debug, trace};

use super::token::{CSSToken, HashType, NumericType, Token};
use crate::error::{CssError, Position};

/// Maximum code point value allowed in CSS.
const MAX_ALLOWED_CODE_POINT: u32 = 0x0010_FFFF;

/// [§ 3.3 Preprocessing the input stream](https://www.w3.org/TR/css-syntax-3/#input-preprocessing)
///
/// "Replace any U+000D CARRIAGE RETURN (CR) code points, U+000C FORM FEED (FF)
/// code points, or pairs of U+000D CARRIAGE RETURN (CR) followed by U+000A
/// LINE FEED (LF) in input by a single U+000A LINE FEED (LF) code point."
///
/// "Replace any U+0000 NULL or surrogate code points in input with
/// U+FFFD REPLACEMENT CHARACTER."
fn preprocess(input: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                let _ = chars.next_if_eq(&'\n');
                out.push('\n');
            }
            '\x0C' => out.push('\n'),
            '\0' => out.push(char::REPLACEMENT_CHARACTER),
            c => out.push(c),
        }
    }
    out
}

/// [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
///
/// CSS tokenizer following the CSS Syntax Module Level 3 specification,
/// extended with the match tokens the selector grammar needs. Every token
/// records the line and column of its first code point; lexical problems are
/// collected as [`CssError`]s and tokenization always runs to the end.
pub struct CSSTokenizer {
    /// The preprocessed input
    input: Vec<char>,
    /// Line of each code point in `input`
    line_by_pos: Vec<u32>,
    /// Column of each code point in `input`
    col_by_pos: Vec<u32>,
    /// Where the first code point sits
    start: Position,
    /// Just past the last code point, where the EOF token goes
    end: Position,
    /// Index of the next code point to consume
    position: usize,
    /// Collected tokens
    tokens: Vec<Token>,
    /// Collected TOKENIZATION errors
    errors: Vec<CssError>,
}

impl CSSTokenizer {
    /// Create a new CSS tokenizer for `input` whose first code point is at
    /// `line`/`col`.
    #[must_use]
    pub fn new(input: &str, line: u32, col: u32) -> Self {
        let input = preprocess(input);
        let mut line_by_pos = Vec::with_capacity(input.len());
        let mut col_by_pos = Vec::with_capacity(input.len());
        let (mut current_line, mut current_col) = (line, col);
        for &c in &input {
            line_by_pos.push(current_line);
            col_by_pos.push(current_col);
            if c == '\n' {
                current_line += 1;
                current_col = 0;
            } else {
                current_col += 1;
            }
        }
        Self {
            input,
            line_by_pos,
            col_by_pos,
            start: Position::new(line, col),
            end: Position::new(current_line, current_col),
            position: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    ///
    /// "This section describes how to consume a token from a stream of code points.
    /// It will return a single token of any type."
    ///
    /// Tokenizes the whole input. The token list always ends with exactly one
    /// EOF token.
    pub fn run(&mut self) {
        loop {
            // "Consume comments."
            self.consume_comments();

            // "Consume the next input code point."
            let Some(c) = self.consume() else {
                break;
            };
            let mark = self.mark();
            if let Some(kind) = self.consume_token(c, mark) {
                trace!("{kind} at {}:{}", mark.line, mark.col);
                self.tokens.push(Token::new(kind, mark));
            }
        }
        self.tokens.push(Token::eof_at(self.end));
        debug!(
            "tokenized {} code points into {} tokens with {} errors",
            self.input.len(),
            self.tokens.len(),
            self.errors.len()
        );
    }

    /// Return the collected tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Return the collected tokens and errors.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Token>, Vec<CssError>) {
        (self.tokens, self.errors)
    }

    /// Return a reference to the collected tokens.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Return a reference to the collected errors.
    #[must_use]
    pub fn errors(&self) -> &[CssError] {
        &self.errors
    }

    /// Position of the code point consumed last, or the start position if
    /// nothing has been consumed yet.
    fn mark(&self) -> Position {
        match self.position.checked_sub(1) {
            Some(pos) if pos < self.input.len() => {
                Position::new(self.line_by_pos[pos], self.col_by_pos[pos])
            }
            Some(_) => self.end,
            None => self.start,
        }
    }

    fn error(&mut self, position: Position, msg: &str) {
        debug!("tokenization error at {}:{}: {msg}", position.line, position.col);
        self.errors.push(CssError::tokenization(position, msg));
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    ///
    /// Dispatches on the code point `c` that was just consumed. Returns
    /// `None` when the construct only produced an error.
    fn consume_token(&mut self, c: char, mark: Position) -> Option<CSSToken> {
        let token = match c {
            // "whitespace"
            // "Consume as much whitespace as possible. Return a <whitespace-token>."
            c if is_whitespace(c) => {
                self.consume_whitespace();
                CSSToken::Whitespace
            }

            // "U+0022 QUOTATION MARK (")"
            // "U+0027 APOSTROPHE (')"
            // "Consume a string token and return it."
            '"' | '\'' => return self.consume_string_token(c, mark),

            // "U+0023 NUMBER SIGN (#)"
            '#' => {
                // "If the next input code point is an ident code point or the next
                // two input code points are a valid escape..."
                if self.peek().is_some_and(is_ident_code_point)
                    || is_valid_escape(self.peek(), self.peek_at(1))
                {
                    // "If the next 3 input code points would start an ident sequence,
                    // set the <hash-token>'s type flag to 'id'."
                    let hash_type =
                        if would_start_ident_sequence(self.peek(), self.peek_at(1), self.peek_at(2)) {
                            HashType::Id
                        } else {
                            HashType::Unrestricted
                        };
                    let value = self.consume_ident_sequence();
                    CSSToken::Hash { value, hash_type }
                } else {
                    CSSToken::Delim('#')
                }
            }

            '$' => self.match_or_delim(c, CSSToken::SuffixMatch),
            '*' => self.match_or_delim(c, CSSToken::SubstringMatch),
            '^' => self.match_or_delim(c, CSSToken::PrefixMatch),
            '~' => self.match_or_delim(c, CSSToken::IncludeMatch),
            '|' => {
                if self.peek() == Some('|') {
                    let _ = self.consume();
                    CSSToken::Column
                } else {
                    self.match_or_delim(c, CSSToken::DashMatch)
                }
            }

            '(' => CSSToken::LeftParen,
            ')' => CSSToken::RightParen,

            // "U+002B PLUS SIGN (+)"
            // "U+002E FULL STOP (.)"
            '+' | '.' => {
                // "If the input stream starts with a number..."
                if would_start_number(Some(c), self.peek(), self.peek_at(1)) {
                    self.reconsume();
                    self.consume_numeric_token()
                } else {
                    CSSToken::Delim(c)
                }
            }

            ',' => CSSToken::Comma,

            // "U+002D HYPHEN-MINUS (-)"
            '-' => {
                if would_start_number(Some(c), self.peek(), self.peek_at(1)) {
                    self.reconsume();
                    self.consume_numeric_token()
                }
                // "Otherwise, if the next 2 input code points are U+002D U+003E (->)..."
                else if self.peek() == Some('-') && self.peek_at(1) == Some('>') {
                    self.position += 2;
                    CSSToken::CDC
                }
                // "Otherwise, if the input stream starts with an ident sequence..."
                else if would_start_ident_sequence(Some(c), self.peek(), self.peek_at(1)) {
                    self.reconsume();
                    self.consume_ident_like_token(mark)
                } else {
                    CSSToken::Delim('-')
                }
            }

            ':' => CSSToken::Colon,
            ';' => CSSToken::Semicolon,

            // "U+003C LESS-THAN SIGN (<)"
            '<' => {
                // "If the next 3 input code points are U+0021 U+002D U+002D (!--)..."
                if self.peek() == Some('!')
                    && self.peek_at(1) == Some('-')
                    && self.peek_at(2) == Some('-')
                {
                    self.position += 3;
                    CSSToken::CDO
                } else {
                    CSSToken::Delim('<')
                }
            }

            // "U+0040 COMMERCIAL AT (@)"
            '@' => {
                if would_start_ident_sequence(self.peek(), self.peek_at(1), self.peek_at(2)) {
                    CSSToken::AtKeyword(self.consume_ident_sequence())
                } else {
                    CSSToken::Delim('@')
                }
            }

            '[' => CSSToken::LeftBracket,

            // "U+005C REVERSE SOLIDUS (\)"
            '\\' => {
                if is_valid_escape(Some('\\'), self.peek()) {
                    self.reconsume();
                    self.consume_ident_like_token(mark)
                } else {
                    // "This is a parse error. Return a <delim-token> with its value
                    // set to the current input code point."
                    self.error(mark, "stray trailing backslash");
                    CSSToken::Delim('\\')
                }
            }

            ']' => CSSToken::RightBracket,
            '{' => CSSToken::LeftBrace,
            '}' => CSSToken::RightBrace,

            // "digit"
            c if c.is_ascii_digit() => {
                self.reconsume();
                self.consume_numeric_token()
            }

            // "ident-start code point"
            c if is_ident_start_code_point(c) => {
                self.reconsume();
                self.consume_ident_like_token(mark)
            }

            // "anything else"
            c => CSSToken::Delim(c),
        };
        Some(token)
    }

    /// `c` followed by `=` becomes `token`; a lone `c` is a delim.
    fn match_or_delim(&mut self, c: char, token: CSSToken) -> CSSToken {
        if self.peek() == Some('=') {
            let _ = self.consume();
            token
        } else {
            CSSToken::Delim(c)
        }
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    ///
    /// "If the next two input code points are U+002F SOLIDUS (/) followed by
    /// U+002A ASTERISK (*), consume them and all following code points up to
    /// and including the first U+002A ASTERISK (*) followed by U+002F SOLIDUS (/),
    /// or up to an EOF code point."
    fn consume_comments(&mut self) {
        let mark = self.mark();
        while self.peek() == Some('/') && self.peek_at(1) == Some('*') {
            self.position += 2;
            loop {
                match self.consume() {
                    Some('*') if self.peek() == Some('/') => {
                        let _ = self.consume();
                        break;
                    }
                    Some(_) => {}
                    None => {
                        self.error(mark, "unterminated comment");
                        return;
                    }
                }
            }
        }
    }

    /// Consume whitespace characters.
    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            let _ = self.consume();
        }
    }

    /// [§ 4.3.4 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    ///
    /// An unescaped newline ends the string with an error and no token; the
    /// newline is left for the next token.
    fn consume_string_token(&mut self, ending_code_point: char, mark: Position) -> Option<CSSToken> {
        let mut value = String::new();
        loop {
            match self.consume() {
                // "ending code point" / "EOF"
                Some(c) if c == ending_code_point => return Some(CSSToken::String(value)),
                None => return Some(CSSToken::String(value)),

                // "newline"
                // "This is a parse error. Reconsume the current input code point..."
                Some('\n') => {
                    self.reconsume();
                    self.error(mark, "unterminated string");
                    return None;
                }

                // "U+005C REVERSE SOLIDUS (\)"
                Some('\\') => match self.peek() {
                    // "If the next input code point is EOF, do nothing."
                    None => {}
                    // "Otherwise, if the next input code point is a newline, consume it."
                    Some('\n') => {
                        let _ = self.consume();
                    }
                    Some(_) => value.push(self.consume_escaped_code_point()),
                },

                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.3 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric_token(&mut self) -> CSSToken {
        let (value, repr, numeric_type) = self.consume_number();

        // "If the next 3 input code points would start an ident sequence..."
        if would_start_ident_sequence(self.peek(), self.peek_at(1), self.peek_at(2)) {
            let unit = self.consume_ident_sequence();
            CSSToken::Dimension {
                value,
                repr,
                numeric_type,
                unit,
            }
        }
        // "Otherwise, if the next input code point is U+0025 PERCENTAGE SIGN (%)..."
        else if self.peek() == Some('%') {
            let _ = self.consume();
            CSSToken::Percentage { value, repr }
        } else {
            CSSToken::Number {
                value,
                repr,
                numeric_type,
            }
        }
    }

    /// [§ 4.3.4 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like_token(&mut self, mark: Position) -> CSSToken {
        let string = self.consume_ident_sequence();

        if string.eq_ignore_ascii_case("url") && self.peek() == Some('(') {
            let _ = self.consume();
            // "While the next two input code points are whitespace, consume the
            // next input code point."
            while self.peek().is_some_and(is_whitespace) && self.peek_at(1).is_some_and(is_whitespace) {
                let _ = self.consume();
            }
            // "If the next one or two input code points are U+0022 QUOTATION MARK,
            // U+0027 APOSTROPHE, or whitespace followed by U+0022 QUOTATION MARK or
            // U+0027 APOSTROPHE, then create a <function-token>..."
            let quoted = match self.peek() {
                Some('"' | '\'') => true,
                Some(c) if is_whitespace(c) => matches!(self.peek_at(1), Some('"' | '\'')),
                _ => false,
            };
            if quoted {
                CSSToken::Function(string)
            } else {
                self.consume_url_token(mark)
            }
        } else if self.peek() == Some('(') {
            let _ = self.consume();
            CSSToken::Function(string)
        } else {
            CSSToken::Ident(string)
        }
    }

    /// [§ 4.3.6 Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token)
    fn consume_url_token(&mut self, mark: Position) -> CSSToken {
        let mut value = String::new();
        self.consume_whitespace();

        loop {
            match self.consume() {
                // "U+0029 RIGHT PARENTHESIS ())" / "EOF"
                Some(')') | None => return CSSToken::Url(value),

                // "whitespace"
                Some(c) if is_whitespace(c) => {
                    self.consume_whitespace();
                    return match self.peek() {
                        Some(')') => {
                            let _ = self.consume();
                            CSSToken::Url(value)
                        }
                        None => CSSToken::Url(value),
                        Some(_) => self.bad_url(mark),
                    };
                }

                // "U+0022 QUOTATION MARK ("), U+0027 APOSTROPHE ('), U+0028 LEFT
                // PARENTHESIS (() or non-printable code point"
                Some(c) if matches!(c, '"' | '\'' | '(') || is_non_printable(c) => {
                    return self.bad_url(mark);
                }

                // "U+005C REVERSE SOLIDUS (\)"
                Some('\\') => {
                    if is_valid_escape(Some('\\'), self.peek()) {
                        value.push(self.consume_escaped_code_point());
                    } else {
                        return self.bad_url(mark);
                    }
                }

                Some(c) => value.push(c),
            }
        }
    }

    fn bad_url(&mut self, mark: Position) -> CSSToken {
        self.consume_bad_url_remnants();
        self.error(mark, "bad url");
        CSSToken::BadUrl
    }

    /// [§ 4.3.14 Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    fn consume_bad_url_remnants(&mut self) {
        loop {
            match self.consume() {
                Some(')') | None => return,
                Some('\\') if is_valid_escape(Some('\\'), self.peek()) => {
                    let _ = self.consume_escaped_code_point();
                }
                Some(_) => {}
            }
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident_sequence(&mut self) -> String {
        let mut result = String::new();
        loop {
            match self.consume() {
                Some(c) if is_ident_code_point(c) => result.push(c),
                Some('\\') if is_valid_escape(Some('\\'), self.peek()) => {
                    result.push(self.consume_escaped_code_point());
                }
                Some(_) => {
                    self.reconsume();
                    return result;
                }
                None => return result,
            }
        }
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    ///
    /// Returns the value, the source text it was converted from, and the
    /// type flag.
    fn consume_number(&mut self) -> (f64, String, NumericType) {
        let mut numeric_type = NumericType::Integer;
        let mut repr = String::new();

        if let Some(sign @ ('+' | '-')) = self.peek() {
            let _ = self.consume();
            repr.push(sign);
        }
        self.consume_digits(&mut repr);

        // "If the next 2 input code points are U+002E FULL STOP (.) followed by a digit..."
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            let _ = self.consume();
            repr.push('.');
            numeric_type = NumericType::Number;
            self.consume_digits(&mut repr);
        }

        // "If the next 2 or 3 input code points are U+0045 LATIN CAPITAL LETTER E (E)
        // or U+0065 LATIN SMALL LETTER E (e), optionally followed by U+002D HYPHEN-MINUS (-)
        // or U+002B PLUS SIGN (+), followed by a digit..."
        if let Some(e @ ('e' | 'E')) = self.peek() {
            let sign = self.peek_at(1).filter(|c| matches!(*c, '+' | '-'));
            let digit_offset = if sign.is_some() { 2 } else { 1 };
            if self.peek_at(digit_offset).is_some_and(|c| c.is_ascii_digit()) {
                let _ = self.consume();
                repr.push(e);
                if let Some(sign) = sign {
                    let _ = self.consume();
                    repr.push(sign);
                }
                numeric_type = NumericType::Number;
                self.consume_digits(&mut repr);
            }
        }

        // "Convert repr to a number, and set the value to the returned value."
        let value = repr.parse().unwrap_or(0.0);
        (value, repr, numeric_type)
    }

    fn consume_digits(&mut self, repr: &mut String) {
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            let _ = self.consume();
            repr.push(c);
        }
    }

    /// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// Called with the backslash already consumed.
    fn consume_escaped_code_point(&mut self) -> char {
        match self.consume() {
            // "hex digit"
            Some(c) if c.is_ascii_hexdigit() => {
                let mut code_point = c.to_digit(16).unwrap_or(0);
                // "Consume as many hex digits as possible, but no more than 5."
                for _ in 0..5 {
                    match self.peek().and_then(|c| c.to_digit(16)) {
                        Some(digit) => {
                            let _ = self.consume();
                            code_point = code_point * 16 + digit;
                        }
                        None => break,
                    }
                }
                // "If the next input code point is whitespace, consume it as well."
                if self.peek().is_some_and(is_whitespace) {
                    let _ = self.consume();
                }
                // "If this number is zero, or is for a surrogate, or is greater than
                // the maximum allowed code point, return U+FFFD REPLACEMENT CHARACTER."
                if code_point == 0 || code_point > MAX_ALLOWED_CODE_POINT {
                    char::REPLACEMENT_CHARACTER
                } else {
                    char::from_u32(code_point).unwrap_or(char::REPLACEMENT_CHARACTER)
                }
            }
            // "EOF"
            // "This is a parse error. Return U+FFFD REPLACEMENT CHARACTER."
            None => char::REPLACEMENT_CHARACTER,
            // "anything else"
            Some(c) => c,
        }
    }

    /// Consume and return the next character.
    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    /// Put back the last consumed character.
    fn reconsume(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    /// Peek at the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    /// Peek at a character at an offset from current position.
    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}

/// Tokenize `text`, whose first code point sits at `line`/`col`.
/// TOKENIZATION errors are appended to `errors`.
pub fn tokenize(text: &str, line: u32, col: u32, errors: &mut Vec<CssError>) -> Vec<Token> {
    let mut tokenizer = CSSTokenizer::new(text, line, col);
    tokenizer.run();
    let (tokens, new_errors) = tokenizer.into_parts();
    errors.extend(new_errors);
    tokens
}

/// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
fn is_valid_escape(first: Option<char>, second: Option<char>) -> bool {
    // "If the first code point is not U+005C REVERSE SOLIDUS (\), return false."
    // "Otherwise, if the second code point is a newline, return false."
    first == Some('\\') && second != Some('\n')
}

/// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
fn would_start_ident_sequence(first: Option<char>, second: Option<char>, third: Option<char>) -> bool {
    match first {
        // "If the second code point is an ident-start code point or a U+002D
        // HYPHEN-MINUS, or the second and third code points are a valid escape,
        // return true."
        Some('-') => {
            second.is_some_and(is_ident_start_code_point)
                || second == Some('-')
                || is_valid_escape(second, third)
        }
        Some(c) if is_ident_start_code_point(c) => true,
        Some('\\') => is_valid_escape(first, second),
        _ => false,
    }
}

/// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
fn would_start_number(first: Option<char>, second: Option<char>, third: Option<char>) -> bool {
    let is_digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
    match first {
        Some('+' | '-') => is_digit(second) || (second == Some('.') && is_digit(third)),
        Some('.') => is_digit(second),
        c => is_digit(c),
    }
}

/// [§ 4.2 Definitions - whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
///
/// "A newline, U+0009 CHARACTER TABULATION, or U+0020 SPACE."
const fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ')
}

/// [§ 4.2 Definitions - non-printable code point](https://www.w3.org/TR/css-syntax-3/#non-printable-code-point)
const fn is_non_printable(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{E}'..='\u{1F}' | '\u{7F}')
}

/// [§ 4.2 Definitions - ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
///
/// "A letter, a non-ASCII code point, or U+005F LOW LINE (_)."
const fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.2 Definitions - ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
///
/// "An ident-start code point, a digit, or U+002D HYPHEN-MINUS (-)."
const fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<CSSToken> {
        let mut errors = Vec::new();
        tokenize(input, 1, 0, &mut errors)
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_preprocess_newlines() {
        assert_eq!(preprocess("a\r\nb\rc\x0Cd\0"), vec!['a', '\n', 'b', '\n', 'c', '\n', 'd', '\u{FFFD}']);
    }

    #[test]
    fn test_escape_out_of_range() {
        assert_eq!(kinds("\\110000"), vec![CSSToken::ident("\u{FFFD}"), CSSToken::EOF]);
        assert_eq!(kinds("\\0 x"), vec![CSSToken::ident("\u{FFFD}x"), CSSToken::EOF]);
        assert_eq!(kinds("\\d800"), vec![CSSToken::ident("\u{FFFD}"), CSSToken::EOF]);
    }

    #[test]
    fn test_escape_consumes_one_whitespace() {
        assert_eq!(
            kinds("\\41  b"),
            vec![CSSToken::ident("A"), CSSToken::Whitespace, CSSToken::ident("b"), CSSToken::EOF]
        );
    }

    #[test]
    fn test_would_start_number() {
        assert!(would_start_number(Some('+'), Some('.'), Some('5')));
        assert!(!would_start_number(Some('+'), Some('.'), Some('a')));
        assert!(would_start_number(Some('7'), None, None));
        assert!(!would_start_number(Some('.'), None, None));
    }

    #[test]
    fn test_mark_before_anything_consumed() {
        let tokenizer = CSSTokenizer::new("abc", 4, 2);
        assert_eq!(tokenizer.mark(), Position::new(4, 2));
    }
}
