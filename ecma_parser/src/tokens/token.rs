//! Token model for the ECMAScript scanner
//!
//! Every lexical unit the scanner can produce is a `Token` variant,
//! including whitespace, line terminators, and comments. Trivia is emitted
//! as real tokens and filtered by the `TokenStream`: the interleaved line
//! terminators are what automatic semicolon insertion keys off.
use crate::grammar::keywords::Keyword;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Regular-expression literal metadata exposed on tokens and `Literal`
/// nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexInfo {
    pub pattern: String,
    pub flags: String,
}

/// ECMAScript punctuators, scanned with maximal munch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Punctuator {
    // Brackets and separators
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    Colon,
    Question,
    Arrow,

    // Comparison
    Lt,
    Gt,
    LtEq,
    GtEq,
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,

    // Bitwise and logical
    LShift,
    RShift,
    URShift,
    Amp,
    Pipe,
    Caret,
    Bang,
    Tilde,
    AmpAmp,
    PipePipe,

    // Assignment
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    LShiftAssign,
    RShiftAssign,
    URShiftAssign,
    AmpAssign,
    PipeAssign,
    CaretAssign,
}

impl Punctuator {
    /// Get the exact source spelling of this punctuator
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Semicolon => ";",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Ellipsis => "...",
            Self::Colon => ":",
            Self::Question => "?",
            Self::Arrow => "=>",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::EqEq => "==",
            Self::NotEq => "!=",
            Self::EqEqEq => "===",
            Self::NotEqEq => "!==",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::PlusPlus => "++",
            Self::MinusMinus => "--",
            Self::LShift => "<<",
            Self::RShift => ">>",
            Self::URShift => ">>>",
            Self::Amp => "&",
            Self::Pipe => "|",
            Self::Caret => "^",
            Self::Bang => "!",
            Self::Tilde => "~",
            Self::AmpAmp => "&&",
            Self::PipePipe => "||",
            Self::Assign => "=",
            Self::PlusAssign => "+=",
            Self::MinusAssign => "-=",
            Self::StarAssign => "*=",
            Self::SlashAssign => "/=",
            Self::PercentAssign => "%=",
            Self::LShiftAssign => "<<=",
            Self::RShiftAssign => ">>=",
            Self::URShiftAssign => ">>>=",
            Self::AmpAssign => "&=",
            Self::PipeAssign => "|=",
            Self::CaretAssign => "^=",
        }
    }

    /// Check if this punctuator is an assignment operator
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            Self::Assign
                | Self::PlusAssign
                | Self::MinusAssign
                | Self::StarAssign
                | Self::SlashAssign
                | Self::PercentAssign
                | Self::LShiftAssign
                | Self::RShiftAssign
                | Self::URShiftAssign
                | Self::AmpAssign
                | Self::PipeAssign
                | Self::CaretAssign
        )
    }
}

/// A single lexical unit produced by the scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    // === WORDS ===
    Keyword(Keyword),
    Identifier(String),

    // === LITERALS ===
    BooleanLiteral(bool),
    NullLiteral,
    /// Numeric literal; `raw` is the exact source slice, `octal` marks the
    /// legacy `0NN` form rejected under strict mode
    NumericLiteral {
        raw: String,
        value: f64,
        octal: bool,
    },
    /// String literal; `cooked` has escape sequences applied, `octal`
    /// marks legacy octal escapes rejected under strict mode
    StringLiteral {
        raw: String,
        cooked: String,
        octal: bool,
    },
    /// Regular-expression literal with validated flags
    RegularExpression {
        raw: String,
        pattern: String,
        flags: String,
    },
    /// One piece of a template literal; `head` marks the piece opened by a
    /// backtick, `tail` the piece closed by one
    Template {
        raw: String,
        cooked: String,
        head: bool,
        tail: bool,
    },

    // === PUNCTUATION ===
    Punctuator(Punctuator),

    // === TRIVIA ===
    LineComment(String),
    BlockComment(String),
    Whitespace,
    LineTerminator,

    /// End of input marker
    Eof,
}

impl Token {
    /// Check if this token is trivia (skipped by the parser)
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::LineTerminator | Self::LineComment(_) | Self::BlockComment(_)
        )
    }

    /// Check if this token participates in parsing
    pub fn is_significant(&self) -> bool {
        !self.is_trivia()
    }

    /// Check if this token is a comment
    pub fn is_comment(&self) -> bool {
        matches!(self, Self::LineComment(_) | Self::BlockComment(_))
    }

    /// Check if this token is a literal value
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::BooleanLiteral(_)
                | Self::NullLiteral
                | Self::NumericLiteral { .. }
                | Self::StringLiteral { .. }
                | Self::RegularExpression { .. }
        )
    }

    /// Check if this token is a specific punctuator
    pub fn is_punctuator(&self, punctuator: Punctuator) -> bool {
        matches!(self, Self::Punctuator(p) if *p == punctuator)
    }

    /// Check if this token matches a specific keyword
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Self::Keyword(kw) if *kw == keyword)
    }

    /// Check if this token is the identifier with the given name
    pub fn is_identifier_with_name(&self, name: &str) -> bool {
        matches!(self, Self::Identifier(id) if id == name)
    }

    /// Get keyword if this token is a keyword
    pub fn as_keyword(&self) -> Option<Keyword> {
        match self {
            Self::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    /// Get punctuator if this token is a punctuator
    pub fn as_punctuator(&self) -> Option<Punctuator> {
        match self {
            Self::Punctuator(p) => Some(*p),
            _ => None,
        }
    }

    /// Get identifier name if this token is an identifier
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Self::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// The token text as it appears in source (raw slice for literals)
    pub fn source_text(&self) -> String {
        match self {
            Self::Keyword(kw) => kw.as_str().to_string(),
            Self::Identifier(name) => name.clone(),
            Self::BooleanLiteral(true) => "true".to_string(),
            Self::BooleanLiteral(false) => "false".to_string(),
            Self::NullLiteral => "null".to_string(),
            Self::NumericLiteral { raw, .. } => raw.clone(),
            Self::StringLiteral { raw, .. } => raw.clone(),
            Self::RegularExpression { raw, .. } => raw.clone(),
            Self::Template { raw, .. } => raw.clone(),
            Self::Punctuator(p) => p.as_str().to_string(),
            Self::LineComment(text) => text.clone(),
            Self::BlockComment(text) => text.clone(),
            Self::Whitespace => " ".to_string(),
            Self::LineTerminator => "\n".to_string(),
            Self::Eof => "<end>".to_string(),
        }
    }

    /// Get the public classification of this token
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::Keyword(_) => TokenKind::Keyword,
            Self::Identifier(_) => TokenKind::Identifier,
            Self::BooleanLiteral(_) => TokenKind::BooleanLiteral,
            Self::NullLiteral => TokenKind::NullLiteral,
            Self::NumericLiteral { .. } => TokenKind::NumericLiteral,
            Self::StringLiteral { .. } => TokenKind::StringLiteral,
            Self::RegularExpression { .. } => TokenKind::RegularExpressionLiteral,
            Self::Template { .. } => TokenKind::TemplateElement,
            Self::Punctuator(_) => TokenKind::Punctuator,
            Self::LineComment(_) => TokenKind::LineComment,
            Self::BlockComment(_) => TokenKind::BlockComment,
            Self::Whitespace | Self::LineTerminator => TokenKind::Whitespace,
            Self::Eof => TokenKind::Eof,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source_text())
    }
}

/// Public token classification used in tokenize output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Punctuator,
    StringLiteral,
    NumericLiteral,
    BooleanLiteral,
    NullLiteral,
    RegularExpressionLiteral,
    TemplateElement,
    LineComment,
    BlockComment,
    Whitespace,
    #[serde(rename = "EOF")]
    Eof,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identifier => "Identifier",
            Self::Keyword => "Keyword",
            Self::Punctuator => "Punctuator",
            Self::StringLiteral => "StringLiteral",
            Self::NumericLiteral => "NumericLiteral",
            Self::BooleanLiteral => "BooleanLiteral",
            Self::NullLiteral => "NullLiteral",
            Self::RegularExpressionLiteral => "RegularExpressionLiteral",
            Self::TemplateElement => "TemplateElement",
            Self::LineComment => "LineComment",
            Self::BlockComment => "BlockComment",
            Self::Whitespace => "Whitespace",
            Self::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivia_classification() {
        assert!(Token::Whitespace.is_trivia());
        assert!(Token::LineTerminator.is_trivia());
        assert!(Token::LineComment("x".to_string()).is_trivia());
        assert!(Token::BlockComment("x".to_string()).is_trivia());
        assert!(!Token::Eof.is_trivia());
        assert!(Token::Identifier("a".to_string()).is_significant());
    }

    #[test]
    fn test_punctuator_spelling_round_trip() {
        assert_eq!(Punctuator::URShiftAssign.as_str(), ">>>=");
        assert_eq!(Punctuator::Arrow.as_str(), "=>");
        assert_eq!(Punctuator::Ellipsis.as_str(), "...");
    }

    #[test]
    fn test_assignment_punctuators() {
        assert!(Punctuator::Assign.is_assignment());
        assert!(Punctuator::URShiftAssign.is_assignment());
        assert!(!Punctuator::EqEq.is_assignment());
        assert!(!Punctuator::Arrow.is_assignment());
    }

    #[test]
    fn test_source_text_uses_raw_slices() {
        let token = Token::StringLiteral {
            raw: "'a\\nb'".to_string(),
            cooked: "a\nb".to_string(),
            octal: false,
        };
        assert_eq!(token.source_text(), "'a\\nb'");

        let token = Token::NumericLiteral {
            raw: "0x10".to_string(),
            value: 16.0,
            octal: false,
        };
        assert_eq!(token.source_text(), "0x10");
    }

    #[test]
    fn test_kind_serialization_names() {
        let json = serde_json::to_string(&TokenKind::RegularExpressionLiteral).unwrap();
        assert_eq!(json, "\"RegularExpressionLiteral\"");
        let json = serde_json::to_string(&TokenKind::Eof).unwrap();
        assert_eq!(json, "\"EOF\"");
    }
}
