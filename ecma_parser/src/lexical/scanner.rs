//! ECMAScript scanner
//!
//! Converts source text into a sequence of spanned tokens in one forward
//! pass. Context-sensitive forms (regex vs. division, template resumption)
//! are resolved through the `ScanContext` consulted before each read; the
//! scanner itself never backtracks. Trivia (whitespace, line terminators,
//! comments) is emitted as tokens so the downstream stream can answer
//! line-break queries for automatic semicolon insertion.

use crate::config::constants::compile_time::lexical::MAX_TOKEN_COUNT;
use crate::config::{Feature, FeatureSet};
use crate::grammar::keywords::classify_word;
use crate::lexical::context::{BraceKind, ScanContext};
use crate::logging::codes;
use crate::tokens::token::{Punctuator, Token};
use crate::tokens::token_stream::{SpannedToken, TokenStream};
use crate::utils::{is_line_terminator, Position, Span, Spanned};
use crate::{log_debug, log_error, log_success};

/// Lexical errors. Every variant carries the byte offset of the malformed
/// form.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("Unexpected character '{character}' at line {line}, column {column}")]
    UnexpectedCharacter {
        character: char,
        offset: usize,
        line: u32,
        column: u32,
    },

    #[error("Unterminated string literal")]
    UnterminatedString { offset: usize },

    #[error("Unterminated template literal")]
    UnterminatedTemplate { offset: usize },

    #[error("Unterminated regular expression")]
    UnterminatedRegex { offset: usize },

    #[error("Unterminated block comment")]
    UnterminatedComment { offset: usize },

    #[error("Invalid numeric literal '{raw}'")]
    InvalidNumber { raw: String, offset: usize },

    #[error("Invalid escape sequence")]
    InvalidEscape { offset: usize },

    #[error("Invalid regular expression flag '{flag}'")]
    InvalidRegexFlag { flag: char, offset: usize },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize },
}

impl LexerError {
    /// Byte offset of the first malformed character
    pub fn offset(&self) -> usize {
        match self {
            Self::UnexpectedCharacter { offset, .. }
            | Self::UnterminatedString { offset }
            | Self::UnterminatedTemplate { offset }
            | Self::UnterminatedRegex { offset }
            | Self::UnterminatedComment { offset }
            | Self::InvalidNumber { offset, .. }
            | Self::InvalidEscape { offset }
            | Self::InvalidRegexFlag { offset, .. } => *offset,
            Self::TooManyTokens { .. } => 0,
        }
    }

    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            Self::UnexpectedCharacter { .. } => codes::lexical::UNEXPECTED_CHARACTER,
            Self::UnterminatedString { .. } => codes::lexical::UNTERMINATED_STRING,
            Self::UnterminatedTemplate { .. } => codes::lexical::UNTERMINATED_TEMPLATE,
            Self::UnterminatedRegex { .. } => codes::lexical::UNTERMINATED_REGEX,
            Self::UnterminatedComment { .. } => codes::lexical::UNTERMINATED_COMMENT,
            Self::InvalidNumber { .. } => codes::lexical::INVALID_NUMBER,
            Self::InvalidEscape { .. } => codes::lexical::INVALID_ESCAPE,
            Self::InvalidRegexFlag { .. } => codes::lexical::INVALID_REGEX_FLAG,
            Self::TooManyTokens { .. } => codes::lexical::TOKEN_LIMIT,
        }
    }
}

/// Whitespace outside of line terminators (incl. NBSP and BOM)
fn is_js_whitespace(ch: char) -> bool {
    matches!(ch, '\t' | '\u{000B}' | '\u{000C}' | ' ' | '\u{00A0}' | '\u{FEFF}')
        || (ch.is_whitespace() && !is_line_terminator(ch))
}

/// Valid first character of an identifier name
pub fn is_identifier_start(ch: char) -> bool {
    ch == '$' || ch == '_' || ch.is_alphabetic()
}

/// Valid continuation character of an identifier name
pub fn is_identifier_part(ch: char) -> bool {
    ch == '$' || ch == '_' || ch.is_alphanumeric() || matches!(ch, '\u{200C}' | '\u{200D}')
}

/// Punctuator table ordered longest-first for maximal munch.
const PUNCTUATORS: &[(&str, Punctuator)] = &[
    (">>>=", Punctuator::URShiftAssign),
    ("===", Punctuator::EqEqEq),
    ("!==", Punctuator::NotEqEq),
    (">>>", Punctuator::URShift),
    ("<<=", Punctuator::LShiftAssign),
    (">>=", Punctuator::RShiftAssign),
    ("...", Punctuator::Ellipsis),
    ("=>", Punctuator::Arrow),
    ("==", Punctuator::EqEq),
    ("!=", Punctuator::NotEq),
    ("<=", Punctuator::LtEq),
    (">=", Punctuator::GtEq),
    ("&&", Punctuator::AmpAmp),
    ("||", Punctuator::PipePipe),
    ("++", Punctuator::PlusPlus),
    ("--", Punctuator::MinusMinus),
    ("<<", Punctuator::LShift),
    (">>", Punctuator::RShift),
    ("+=", Punctuator::PlusAssign),
    ("-=", Punctuator::MinusAssign),
    ("*=", Punctuator::StarAssign),
    ("/=", Punctuator::SlashAssign),
    ("%=", Punctuator::PercentAssign),
    ("&=", Punctuator::AmpAssign),
    ("|=", Punctuator::PipeAssign),
    ("^=", Punctuator::CaretAssign),
    ("{", Punctuator::LBrace),
    ("}", Punctuator::RBrace),
    ("(", Punctuator::LParen),
    (")", Punctuator::RParen),
    ("[", Punctuator::LBracket),
    ("]", Punctuator::RBracket),
    (";", Punctuator::Semicolon),
    (",", Punctuator::Comma),
    (".", Punctuator::Dot),
    (":", Punctuator::Colon),
    ("?", Punctuator::Question),
    ("<", Punctuator::Lt),
    (">", Punctuator::Gt),
    ("+", Punctuator::Plus),
    ("-", Punctuator::Minus),
    ("*", Punctuator::Star),
    ("/", Punctuator::Slash),
    ("%", Punctuator::Percent),
    ("&", Punctuator::Amp),
    ("|", Punctuator::Pipe),
    ("^", Punctuator::Caret),
    ("!", Punctuator::Bang),
    ("~", Punctuator::Tilde),
    ("=", Punctuator::Assign),
];

/// Essential scanning metrics
#[derive(Debug, Default, Clone)]
pub struct ScannerMetrics {
    pub total_tokens: usize,
    pub keyword_tokens: usize,
    pub identifier_tokens: usize,
    pub punctuator_tokens: usize,
    pub string_tokens: usize,
    pub numeric_tokens: usize,
    pub regex_tokens: usize,
    pub template_tokens: usize,
    pub comment_tokens: usize,
}

impl ScannerMetrics {
    fn record_token(&mut self, token: &Token) {
        self.total_tokens += 1;
        match token {
            Token::Keyword(_) => self.keyword_tokens += 1,
            Token::Identifier(_) => self.identifier_tokens += 1,
            Token::Punctuator(_) => self.punctuator_tokens += 1,
            Token::StringLiteral { .. } => self.string_tokens += 1,
            Token::NumericLiteral { .. } => self.numeric_tokens += 1,
            Token::RegularExpression { .. } => self.regex_tokens += 1,
            Token::Template { .. } => self.template_tokens += 1,
            Token::LineComment(_) | Token::BlockComment(_) => self.comment_tokens += 1,
            _ => {}
        }
    }
}

/// Single-pass scanner over one source text. State is call-local; nothing
/// survives across invocations.
pub struct Scanner<'src> {
    source: &'src str,
    pos: Position,
    features: FeatureSet,
    context: ScanContext,
    metrics: ScannerMetrics,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str, features: FeatureSet) -> Self {
        Self {
            source,
            pos: Position::start(),
            features,
            context: ScanContext::new(),
            metrics: ScannerMetrics::default(),
        }
    }

    /// Get current metrics
    pub fn metrics(&self) -> &ScannerMetrics {
        &self.metrics
    }

    // === CHARACTER CURSOR ===

    fn rest(&self) -> &'src str {
        &self.source[self.pos.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos = self.pos.advance(ch);
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the `\n` of a CRLF pair without counting a second line
    fn eat_lf_after_cr(&mut self) {
        if self.peek() == Some('\n') {
            self.pos = Position::new(self.pos.offset + 1, self.pos.line, self.pos.column);
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    fn slice_from(&self, start: Position) -> &'src str {
        &self.source[start.offset..self.pos.offset]
    }

    fn unexpected_char(&self, character: char) -> LexerError {
        LexerError::UnexpectedCharacter {
            character,
            offset: self.pos.offset,
            line: self.pos.line,
            column: self.pos.column,
        }
    }

    // === TOKEN READ ===

    /// Scan the next token. Returns an `Eof` token at (and past) the end
    /// of input.
    pub fn next_token(&mut self) -> Result<SpannedToken, LexerError> {
        let start = self.pos;
        let Some(ch) = self.peek() else {
            return Ok(Spanned::new(Token::Eof, Span::new(start, start)));
        };

        let token = if is_line_terminator(ch) {
            self.bump();
            if ch == '\r' {
                self.eat_lf_after_cr();
            }
            Token::LineTerminator
        } else if is_js_whitespace(ch) {
            while matches!(self.peek(), Some(c) if is_js_whitespace(c)) {
                self.bump();
            }
            Token::Whitespace
        } else if ch == '/' {
            match self.peek_at(1) {
                Some('/') => self.scan_line_comment(),
                Some('*') => self.scan_block_comment()?,
                _ if self.context.expect_operand() => self.scan_regex()?,
                _ => self.scan_punctuator(ch)?,
            }
        } else if ch == '"' || ch == '\'' {
            self.scan_string(ch)?
        } else if ch == '`' {
            if self.features.is_enabled(Feature::TemplateStrings) {
                self.scan_template(true)?
            } else {
                return Err(self.unexpected_char(ch));
            }
        } else if ch == '}' && self.context.in_substitution() {
            self.scan_template(false)?
        } else if ch.is_ascii_digit()
            || (ch == '.' && matches!(self.peek_at(1), Some(c) if c.is_ascii_digit()))
        {
            self.scan_number()?
        } else if is_identifier_start(ch) || ch == '\\' {
            self.scan_identifier()?
        } else {
            self.scan_punctuator(ch)?
        };

        match &token {
            Token::Punctuator(Punctuator::LBrace) => self.context.push_brace(BraceKind::Block),
            Token::Punctuator(Punctuator::RBrace) => {
                self.context.pop_brace();
            }
            _ => {}
        }

        self.context.note_token(&token);
        self.metrics.record_token(&token);
        Ok(Spanned::new(token, Span::new(start, self.pos)))
    }

    // === COMMENTS ===

    fn scan_line_comment(&mut self) -> Token {
        self.bump();
        self.bump();
        let content_start = self.pos;
        while matches!(self.peek(), Some(c) if !is_line_terminator(c)) {
            self.bump();
        }
        Token::LineComment(self.slice_from(content_start).to_string())
    }

    fn scan_block_comment(&mut self) -> Result<Token, LexerError> {
        let start = self.pos;
        self.bump();
        self.bump();
        let content_start = self.pos;
        loop {
            if self.starts_with("*/") {
                let content = self.slice_from(content_start).to_string();
                self.bump();
                self.bump();
                return Ok(Token::BlockComment(content));
            }
            if self.bump().is_none() {
                return Err(LexerError::UnterminatedComment {
                    offset: start.offset,
                });
            }
        }
    }

    // === STRING LITERALS ===

    fn scan_string(&mut self, quote: char) -> Result<Token, LexerError> {
        let start = self.pos;
        self.bump();
        let mut cooked = String::new();
        let mut octal = false;

        loop {
            match self.peek() {
                None => {
                    return Err(LexerError::UnterminatedString {
                        offset: start.offset,
                    })
                }
                Some(c) if is_line_terminator(c) => {
                    return Err(LexerError::UnterminatedString {
                        offset: start.offset,
                    })
                }
                Some(c) if c == quote => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    self.scan_escape(&mut cooked, &mut octal, start)?;
                }
                Some(c) => {
                    cooked.push(c);
                    self.bump();
                }
            }
        }

        Ok(Token::StringLiteral {
            raw: self.slice_from(start).to_string(),
            cooked,
            octal,
        })
    }

    /// Scan one escape sequence after the backslash has been consumed
    fn scan_escape(
        &mut self,
        cooked: &mut String,
        octal: &mut bool,
        literal_start: Position,
    ) -> Result<(), LexerError> {
        let Some(ch) = self.peek() else {
            return Err(LexerError::UnterminatedString {
                offset: literal_start.offset,
            });
        };

        match ch {
            c if is_line_terminator(c) => {
                // Line continuation: contributes nothing to the value
                self.bump();
                if c == '\r' {
                    self.eat_lf_after_cr();
                }
            }
            'n' => {
                self.bump();
                cooked.push('\n');
            }
            't' => {
                self.bump();
                cooked.push('\t');
            }
            'r' => {
                self.bump();
                cooked.push('\r');
            }
            'b' => {
                self.bump();
                cooked.push('\u{0008}');
            }
            'f' => {
                self.bump();
                cooked.push('\u{000C}');
            }
            'v' => {
                self.bump();
                cooked.push('\u{000B}');
            }
            'x' => {
                let escape_offset = self.pos.offset;
                self.bump();
                let value = self.scan_hex_digits(2, escape_offset)?;
                cooked.push(char::from_u32(value).unwrap_or('\u{FFFD}'));
            }
            'u' => {
                let escape_offset = self.pos.offset;
                self.bump();
                let value = self.scan_hex_digits(4, escape_offset)?;
                cooked.push(char::from_u32(value).unwrap_or('\u{FFFD}'));
            }
            '0' if !matches!(self.peek_at(1), Some(c) if c.is_ascii_digit()) => {
                self.bump();
                cooked.push('\0');
            }
            '0'..='7' => {
                // Legacy octal escape, up to three digits, value below 256
                *octal = true;
                let mut value = 0u32;
                let mut digits = 0;
                while digits < 3 {
                    match self.peek() {
                        Some(c @ '0'..='7') if value * 8 + c.to_digit(8).unwrap() < 256 => {
                            value = value * 8 + c.to_digit(8).unwrap();
                            self.bump();
                            digits += 1;
                        }
                        _ => break,
                    }
                }
                cooked.push(char::from_u32(value).unwrap_or('\u{FFFD}'));
            }
            c => {
                self.bump();
                cooked.push(c);
            }
        }
        Ok(())
    }

    fn scan_hex_digits(&mut self, count: usize, escape_offset: usize) -> Result<u32, LexerError> {
        let mut value = 0u32;
        for _ in 0..count {
            match self.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    value = value * 16 + c.to_digit(16).unwrap();
                    self.bump();
                }
                _ => {
                    return Err(LexerError::InvalidEscape {
                        offset: escape_offset,
                    })
                }
            }
        }
        Ok(value)
    }

    // === TEMPLATE LITERALS ===

    /// Scan one template piece. `head` pieces start at a backtick, the
    /// rest start at the `}` that closes a substitution.
    fn scan_template(&mut self, head: bool) -> Result<Token, LexerError> {
        let start = self.pos;
        self.bump();
        if !head {
            self.context.pop_brace();
        }

        let mut cooked = String::new();
        let mut ignored_octal = false;
        let tail;

        loop {
            match self.peek() {
                None => {
                    return Err(LexerError::UnterminatedTemplate {
                        offset: start.offset,
                    })
                }
                Some('`') => {
                    self.bump();
                    tail = true;
                    break;
                }
                Some('$') if self.peek_at(1) == Some('{') => {
                    self.bump();
                    self.bump();
                    self.context.push_brace(BraceKind::Substitution);
                    tail = false;
                    break;
                }
                Some('\\') => {
                    self.bump();
                    self.scan_escape(&mut cooked, &mut ignored_octal, start)?;
                }
                Some('\r') => {
                    // Cooked value normalizes CRLF to LF
                    self.bump();
                    self.eat_lf_after_cr();
                    cooked.push('\n');
                }
                Some(c) => {
                    self.bump();
                    cooked.push(c);
                }
            }
        }

        Ok(Token::Template {
            raw: self.slice_from(start).to_string(),
            cooked,
            head,
            tail,
        })
    }

    // === REGULAR EXPRESSIONS ===

    fn scan_regex(&mut self) -> Result<Token, LexerError> {
        let start = self.pos;
        self.bump();
        let body_start = self.pos;
        let mut in_class = false;

        loop {
            match self.peek() {
                None => {
                    return Err(LexerError::UnterminatedRegex {
                        offset: start.offset,
                    })
                }
                Some(c) if is_line_terminator(c) => {
                    return Err(LexerError::UnterminatedRegex {
                        offset: start.offset,
                    })
                }
                Some('\\') => {
                    self.bump();
                    match self.peek() {
                        None => {
                            return Err(LexerError::UnterminatedRegex {
                                offset: start.offset,
                            })
                        }
                        Some(c) if is_line_terminator(c) => {
                            return Err(LexerError::UnterminatedRegex {
                                offset: start.offset,
                            })
                        }
                        Some(_) => {
                            self.bump();
                        }
                    }
                }
                Some('[') => {
                    in_class = true;
                    self.bump();
                }
                Some(']') => {
                    in_class = false;
                    self.bump();
                }
                Some('/') if !in_class => break,
                Some(_) => {
                    self.bump();
                }
            }
        }

        let pattern = self.source[body_start.offset..self.pos.offset].to_string();
        self.bump();

        let mut flags = String::new();
        while let Some(c) = self.peek() {
            if !is_identifier_part(c) {
                break;
            }
            let flag_offset = self.pos.offset;
            self.bump();
            let recognized = match c {
                'g' | 'i' | 'm' => true,
                'u' => self.features.is_enabled(Feature::RegexUFlag),
                'y' => self.features.is_enabled(Feature::RegexYFlag),
                _ => false,
            };
            if !recognized || flags.contains(c) {
                return Err(LexerError::InvalidRegexFlag {
                    flag: c,
                    offset: flag_offset,
                });
            }
            flags.push(c);
        }

        Ok(Token::RegularExpression {
            raw: self.slice_from(start).to_string(),
            pattern,
            flags,
        })
    }

    // === NUMERIC LITERALS ===

    fn scan_number(&mut self) -> Result<Token, LexerError> {
        let start = self.pos;
        let mut octal = false;

        let value = if self.peek() == Some('0') && matches!(self.peek_at(1), Some('x' | 'X')) {
            self.bump();
            self.bump();
            self.scan_radix_digits(start, 16)?
        } else if self.peek() == Some('0')
            && matches!(self.peek_at(1), Some('b' | 'B'))
            && self.features.is_enabled(Feature::BinaryLiterals)
        {
            self.bump();
            self.bump();
            self.scan_radix_digits(start, 2)?
        } else if self.peek() == Some('0')
            && matches!(self.peek_at(1), Some('o' | 'O'))
            && self.features.is_enabled(Feature::OctalLiterals)
        {
            self.bump();
            self.bump();
            self.scan_radix_digits(start, 8)?
        } else if self.peek() == Some('0')
            && matches!(self.peek_at(1), Some(c) if c.is_ascii_digit())
        {
            // Legacy octal (or non-octal decimal like 08), strict-illegal
            octal = true;
            self.bump();
            let mut all_octal = true;
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    if c > '7' {
                        all_octal = false;
                    }
                    self.bump();
                } else {
                    break;
                }
            }
            let digits = self.slice_from(start);
            if all_octal {
                digits[1..]
                    .chars()
                    .fold(0.0, |acc, c| acc * 8.0 + c.to_digit(8).unwrap() as f64)
            } else {
                digits
                    .parse::<f64>()
                    .map_err(|_| self.invalid_number(start))?
            }
        } else {
            self.scan_decimal(start)?
        };

        // An identifier or digit directly after a numeric literal is
        // always malformed
        if matches!(self.peek(), Some(c) if is_identifier_start(c) || c.is_ascii_digit()) {
            self.bump();
            return Err(self.invalid_number(start));
        }

        Ok(Token::NumericLiteral {
            raw: self.slice_from(start).to_string(),
            value,
            octal,
        })
    }

    fn scan_radix_digits(&mut self, start: Position, radix: u32) -> Result<f64, LexerError> {
        let digits_start = self.pos.offset;
        while matches!(self.peek(), Some(c) if c.to_digit(radix).is_some()) {
            self.bump();
        }
        if self.pos.offset == digits_start {
            self.bump();
            return Err(self.invalid_number(start));
        }
        Ok(self.source[digits_start..self.pos.offset]
            .chars()
            .fold(0.0, |acc, c| {
                acc * radix as f64 + c.to_digit(radix).unwrap() as f64
            }))
    }

    fn scan_decimal(&mut self, start: Position) -> Result<f64, LexerError> {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        if self.peek() == Some('.') {
            self.bump();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            let exponent_start = self.pos.offset;
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
            if self.pos.offset == exponent_start {
                return Err(self.invalid_number(start));
            }
        }
        self.slice_from(start)
            .parse::<f64>()
            .map_err(|_| self.invalid_number(start))
    }

    fn invalid_number(&self, start: Position) -> LexerError {
        LexerError::InvalidNumber {
            raw: self.slice_from(start).to_string(),
            offset: start.offset,
        }
    }

    // === IDENTIFIERS AND WORDS ===

    fn scan_identifier(&mut self) -> Result<Token, LexerError> {
        let mut name = String::new();
        let mut had_escape = false;

        match self.peek() {
            Some('\\') => {
                let decoded = self.scan_identifier_escape()?;
                if !is_identifier_start(decoded) {
                    return Err(LexerError::InvalidEscape {
                        offset: self.pos.offset,
                    });
                }
                name.push(decoded);
                had_escape = true;
            }
            Some(c) => {
                name.push(c);
                self.bump();
            }
            None => return Err(self.unexpected_char('\0')),
        }

        loop {
            match self.peek() {
                Some('\\') => {
                    let decoded = self.scan_identifier_escape()?;
                    if !is_identifier_part(decoded) {
                        return Err(LexerError::InvalidEscape {
                            offset: self.pos.offset,
                        });
                    }
                    name.push(decoded);
                    had_escape = true;
                }
                Some(c) if is_identifier_part(c) => {
                    name.push(c);
                    self.bump();
                }
                _ => break,
            }
        }

        let token = match name.as_str() {
            "true" => Token::BooleanLiteral(true),
            "false" => Token::BooleanLiteral(false),
            "null" => Token::NullLiteral,
            _ => match classify_word(&name, &self.features) {
                Some(keyword) if !had_escape => Token::Keyword(keyword),
                _ => Token::Identifier(name),
            },
        };
        Ok(token)
    }

    fn scan_identifier_escape(&mut self) -> Result<char, LexerError> {
        let escape_offset = self.pos.offset;
        self.bump();
        if !self.eat('u') {
            return Err(LexerError::InvalidEscape {
                offset: escape_offset,
            });
        }
        let value = self.scan_hex_digits(4, escape_offset)?;
        char::from_u32(value).ok_or(LexerError::InvalidEscape {
            offset: escape_offset,
        })
    }

    // === PUNCTUATORS ===

    fn scan_punctuator(&mut self, ch: char) -> Result<Token, LexerError> {
        for (text, punctuator) in PUNCTUATORS {
            if self.starts_with(text) {
                self.pos = self.pos.advance_bytes(text.len());
                return Ok(Token::Punctuator(*punctuator));
            }
        }
        Err(self.unexpected_char(ch))
    }
}

/// Run the scanner to completion over one source text.
pub fn tokenize_source(source: &str, features: FeatureSet) -> Result<TokenStream, LexerError> {
    log_debug!("Starting lexical analysis",
        "source_bytes" => source.len(),
        "max_tokens_allowed" => MAX_TOKEN_COUNT
    );

    let mut scanner = Scanner::new(source, features);
    let mut tokens = Vec::new();

    loop {
        if tokens.len() >= MAX_TOKEN_COUNT {
            let error = LexerError::TooManyTokens {
                count: tokens.len(),
            };
            log_error!(error.error_code(), "Token limit exceeded",
                "token_count" => tokens.len(),
                "limit" => MAX_TOKEN_COUNT
            );
            return Err(error);
        }

        let spanned = match scanner.next_token() {
            Ok(spanned) => spanned,
            Err(error) => {
                log_error!(error.error_code(), "Lexical analysis failed",
                    "offset" => error.offset(),
                    "detail" => error
                );
                return Err(error);
            }
        };
        let at_end = matches!(spanned.value, Token::Eof);
        tokens.push(spanned);
        if at_end {
            break;
        }
    }

    let metrics = scanner.metrics();
    log_success!(codes::success::TOKENIZATION_COMPLETE,
        "Lexical analysis completed",
        "token_count" => tokens.len(),
        "keywords" => metrics.keyword_tokens,
        "identifiers" => metrics.identifier_tokens,
        "punctuators" => metrics.punctuator_tokens,
        "comments" => metrics.comment_tokens
    );

    Ok(TokenStream::new(tokens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EcmaFeatures, EcmaVersion, ParserOptions};
    use crate::grammar::keywords::Keyword;
    use assert_matches::assert_matches;

    fn features(configure: impl FnOnce(&mut EcmaFeatures)) -> FeatureSet {
        let mut flags = EcmaFeatures::default();
        configure(&mut flags);
        FeatureSet::resolve(EcmaVersion::Es5, flags)
    }

    fn significant(source: &str, features: FeatureSet) -> Vec<Token> {
        let stream = tokenize_source(source, features).expect("tokenize failed");
        stream
            .all_tokens()
            .iter()
            .filter(|t| t.value.is_significant() && !matches!(t.value, Token::Eof))
            .map(|t| t.value.clone())
            .collect()
    }

    #[test]
    fn test_var_declaration_tokens() {
        let tokens = significant("var answer = 42;", FeatureSet::es5());
        assert_eq!(tokens.len(), 5);
        assert_matches!(&tokens[0], Token::Keyword(Keyword::Var));
        assert_matches!(&tokens[1], Token::Identifier(name) if name == "answer");
        assert_matches!(&tokens[2], Token::Punctuator(Punctuator::Assign));
        assert_matches!(&tokens[3], Token::NumericLiteral { value, .. } if *value == 42.0);
        assert_matches!(&tokens[4], Token::Punctuator(Punctuator::Semicolon));
    }

    #[test]
    fn test_spans_are_monotonic_and_in_bounds() {
        let source = "var a = 1 + 2;\nvar b = a / 2;";
        let stream = tokenize_source(source, FeatureSet::es5()).unwrap();
        let mut previous_end = 0;
        for spanned in stream.all_tokens() {
            assert!(spanned.span.start.offset >= previous_end);
            assert!(spanned.span.end.offset <= source.len());
            previous_end = spanned.span.end.offset;
        }
    }

    #[test]
    fn test_regex_after_paren_is_a_single_literal() {
        let tokens = significant("(/foo/).test(bar);", FeatureSet::es5());
        assert_matches!(&tokens[0], Token::Punctuator(Punctuator::LParen));
        assert_matches!(
            &tokens[1],
            Token::RegularExpression { pattern, flags, .. }
                if pattern == "foo" && flags.is_empty()
        );
        assert_matches!(&tokens[2], Token::Punctuator(Punctuator::RParen));
    }

    #[test]
    fn test_slash_after_identifier_is_division() {
        let tokens = significant("a / b / c", FeatureSet::es5());
        assert_eq!(
            tokens
                .iter()
                .filter(|t| t.is_punctuator(Punctuator::Slash))
                .count(),
            2
        );
    }

    #[test]
    fn test_regex_after_return_keyword() {
        let tokens = significant("return /x/;", FeatureSet::es5());
        assert_matches!(&tokens[1], Token::RegularExpression { pattern, .. } if pattern == "x");
    }

    #[test]
    fn test_regex_char_class_may_contain_slash() {
        let tokens = significant("var re = /[/]/;", FeatureSet::es5());
        assert_matches!(&tokens[3], Token::RegularExpression { pattern, .. } if pattern == "[/]");
    }

    #[test]
    fn test_regex_u_flag_rejected_without_feature() {
        let error = tokenize_source("var foo = /foo/u;", FeatureSet::es5()).unwrap_err();
        assert_matches!(error, LexerError::InvalidRegexFlag { flag: 'u', .. });
        assert!(error.to_string().contains("Invalid regular expression flag"));
    }

    #[test]
    fn test_regex_y_flag_rejected_without_feature() {
        let error = tokenize_source("var foo = /foo/y;", FeatureSet::es5()).unwrap_err();
        assert_matches!(error, LexerError::InvalidRegexFlag { flag: 'y', .. });
        assert!(error.to_string().contains("Invalid regular expression flag"));
    }

    #[test]
    fn test_regex_u_flag_accepted_with_feature() {
        let set = features(|f| f.regex_u_flag = true);
        let tokens = significant("var foo = /foo/u;", set);
        assert_matches!(&tokens[3], Token::RegularExpression { flags, .. } if flags == "u");
    }

    #[test]
    fn test_regex_y_flag_accepted_with_feature() {
        let set = features(|f| f.regex_y_flag = true);
        let tokens = significant("var foo = /foo/y;", set);
        assert_matches!(&tokens[3], Token::RegularExpression { flags, .. } if flags == "y");
    }

    #[test]
    fn test_duplicate_regex_flag_rejected() {
        let error = tokenize_source("var r = /a/gg;", FeatureSet::es5()).unwrap_err();
        assert_matches!(error, LexerError::InvalidRegexFlag { flag: 'g', .. });
    }

    #[test]
    fn test_let_is_identifier_without_block_bindings() {
        let tokens = significant("let foo = bar;", FeatureSet::es5());
        assert_matches!(&tokens[0], Token::Identifier(name) if name == "let");
    }

    #[test]
    fn test_let_is_keyword_with_block_bindings() {
        let set = features(|f| f.block_bindings = true);
        let tokens = significant("let foo = bar;", set);
        assert_matches!(&tokens[0], Token::Keyword(Keyword::Let));
    }

    #[test]
    fn test_numeric_forms() {
        let tokens = significant("0x1F 3.14 1e3 2e-2 017 089", FeatureSet::es5());
        assert_matches!(&tokens[0], Token::NumericLiteral { value, octal: false, .. } if *value == 31.0);
        assert_matches!(&tokens[1], Token::NumericLiteral { value, .. } if *value == 3.14);
        assert_matches!(&tokens[2], Token::NumericLiteral { value, .. } if *value == 1000.0);
        assert_matches!(&tokens[3], Token::NumericLiteral { value, .. } if *value == 0.02);
        assert_matches!(&tokens[4], Token::NumericLiteral { value, octal: true, .. } if *value == 15.0);
        assert_matches!(&tokens[5], Token::NumericLiteral { value, octal: true, .. } if *value == 89.0);
    }

    #[test]
    fn test_binary_literal_gated() {
        let error = tokenize_source("var x = 0b101;", FeatureSet::es5()).unwrap_err();
        assert_matches!(error, LexerError::InvalidNumber { .. });

        let set = features(|f| f.binary_literals = true);
        let tokens = significant("var x = 0b101;", set);
        assert_matches!(&tokens[3], Token::NumericLiteral { value, .. } if *value == 5.0);
    }

    #[test]
    fn test_octal_literal_gated() {
        let set = features(|f| f.octal_literals = true);
        let tokens = significant("var x = 0o17;", set);
        assert_matches!(&tokens[3], Token::NumericLiteral { value, octal: false, .. } if *value == 15.0);
    }

    #[test]
    fn test_identifier_adjacent_to_number_is_invalid() {
        let error = tokenize_source("var x = 3in;", FeatureSet::es5()).unwrap_err();
        assert_matches!(error, LexerError::InvalidNumber { .. });
    }

    #[test]
    fn test_malformed_exponent_is_invalid() {
        let error = tokenize_source("var x = 1e;", FeatureSet::es5()).unwrap_err();
        assert_matches!(error, LexerError::InvalidNumber { .. });
    }

    #[test]
    fn test_string_escapes() {
        let tokens = significant(r#"var s = 'a\n\t\x41B`';"#, FeatureSet::es5());
        assert_matches!(
            &tokens[3],
            Token::StringLiteral { cooked, octal: false, .. } if cooked == "a\n\tAB`"
        );
    }

    #[test]
    fn test_string_line_continuation() {
        let tokens = significant("var s = 'a\\\nb';", FeatureSet::es5());
        assert_matches!(&tokens[3], Token::StringLiteral { cooked, .. } if cooked == "ab");
    }

    #[test]
    fn test_string_octal_escape_flagged() {
        let tokens = significant(r"var s = '\101';", FeatureSet::es5());
        assert_matches!(
            &tokens[3],
            Token::StringLiteral { cooked, octal: true, .. } if cooked == "A"
        );
    }

    #[test]
    fn test_unterminated_string() {
        let error = tokenize_source("var s = 'oops", FeatureSet::es5()).unwrap_err();
        assert_matches!(error, LexerError::UnterminatedString { offset: 8 });
    }

    #[test]
    fn test_unterminated_string_at_newline() {
        let error = tokenize_source("var s = 'oops\n';", FeatureSet::es5()).unwrap_err();
        assert_matches!(error, LexerError::UnterminatedString { .. });
    }

    #[test]
    fn test_comments() {
        let stream =
            tokenize_source("a; // trailing\n/* block */ b;", FeatureSet::es5()).unwrap();
        let comments: Vec<_> = stream
            .all_tokens()
            .iter()
            .filter(|t| t.value.is_comment())
            .collect();
        assert_eq!(comments.len(), 2);
        assert_matches!(&comments[0].value, Token::LineComment(text) if text == " trailing");
        assert_matches!(&comments[1].value, Token::BlockComment(text) if text == " block ");
    }

    #[test]
    fn test_unterminated_block_comment() {
        let error = tokenize_source("a; /* never closed", FeatureSet::es5()).unwrap_err();
        assert_matches!(error, LexerError::UnterminatedComment { offset: 3 });
    }

    #[test]
    fn test_template_pieces_and_substitution() {
        let set = features(|f| f.template_strings = true);
        let tokens = significant("`a${x}b`", set);
        assert_matches!(
            &tokens[0],
            Token::Template { cooked, head: true, tail: false, .. } if cooked == "a"
        );
        assert_matches!(&tokens[1], Token::Identifier(name) if name == "x");
        assert_matches!(
            &tokens[2],
            Token::Template { cooked, head: false, tail: true, .. } if cooked == "b"
        );
    }

    #[test]
    fn test_template_nested_braces() {
        let set = features(|f| f.template_strings = true);
        let tokens = significant("`${ {a: 1} }`", set);
        // The inner object braces must scan as ordinary punctuators
        assert!(tokens
            .iter()
            .any(|t| t.is_punctuator(Punctuator::LBrace)));
        assert_matches!(
            tokens.last().unwrap(),
            Token::Template { tail: true, .. }
        );
    }

    #[test]
    fn test_backtick_rejected_without_templates() {
        let error = tokenize_source("var x = `nope`;", FeatureSet::es5()).unwrap_err();
        assert_matches!(error, LexerError::UnexpectedCharacter { character: '`', .. });
    }

    #[test]
    fn test_maximal_munch_punctuators() {
        let tokens = significant("a >>>= b === c", FeatureSet::es5());
        assert_matches!(&tokens[1], Token::Punctuator(Punctuator::URShiftAssign));
        assert_matches!(&tokens[3], Token::Punctuator(Punctuator::EqEqEq));
    }

    #[test]
    fn test_identifier_unicode_escape() {
        let tokens = significant("var \\u0061bc = 1;", FeatureSet::es5());
        assert_matches!(&tokens[1], Token::Identifier(name) if name == "abc");
    }

    #[test]
    fn test_invalid_identifier_escape() {
        // the escape decodes to a space, which cannot start an identifier
        let error = tokenize_source("var \\u0020x = 1;", FeatureSet::es5()).unwrap_err();
        assert_matches!(error, LexerError::InvalidEscape { .. });
    }

    #[test]
    fn test_unexpected_character() {
        let error = tokenize_source("var a = 1 # 2;", FeatureSet::es5()).unwrap_err();
        assert_matches!(
            error,
            LexerError::UnexpectedCharacter { character: '#', line: 1, column: 11, .. }
        );
    }

    #[test]
    fn test_crlf_is_one_line_terminator() {
        let stream = tokenize_source("a\r\nb", FeatureSet::es5()).unwrap();
        let terminators = stream
            .all_tokens()
            .iter()
            .filter(|t| matches!(t.value, Token::LineTerminator))
            .count();
        assert_eq!(terminators, 1);
        let last = stream.all_tokens().last().unwrap();
        assert_eq!(last.span.end.line, 2);
    }

    #[test]
    fn test_idempotent_tokenization() {
        let options = ParserOptions::default();
        let first = tokenize_source("var a = /x/g;", options.features()).unwrap();
        let second = tokenize_source("var a = /x/g;", options.features()).unwrap();
        assert_eq!(first.all_tokens(), second.all_tokens());
    }
}
