//! Syntax errors produced during token-to-tree transformation
//!
//! The first error aborts the parse; nothing is retried and no partial
//! tree survives. Every variant that can point at a token carries its
//! span, and "unexpected token" errors carry the offending lexeme so the
//! caller sees `Unexpected token <literal>` for feature-gated constructs
//! used while the flag is off.

use crate::logging::{codes, Code};
use crate::utils::Span;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Unexpected token {found}")]
    UnexpectedToken { found: String, span: Span },

    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEndOfInput { expected: String },

    #[error("Expected {expected}, found '{found}'")]
    Expected {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Illegal newline after throw")]
    IllegalNewlineAfterThrow { span: Span },

    #[error("Illegal return statement")]
    IllegalReturn { span: Span },

    #[error("Illegal break statement")]
    IllegalBreak { span: Span },

    #[error("Illegal continue statement")]
    IllegalContinue { span: Span },

    #[error("Undefined label '{name}'")]
    UndefinedLabel { name: String, span: Span },

    #[error("Label '{name}' has already been declared")]
    DuplicateLabel { name: String, span: Span },

    #[error("Invalid left-hand side in assignment")]
    InvalidAssignmentTarget { span: Span },

    #[error("More than one default clause in switch statement")]
    MultipleDefaults { span: Span },

    #[error("{message}")]
    StrictViolation { message: String, span: Span },

    #[error("Maximum parser recursion depth exceeded")]
    MaxRecursionDepth { span: Span },
}

impl SyntaxError {
    /// Create unexpected token error carrying the offending lexeme
    pub fn unexpected_token(found: &str, span: Span) -> Self {
        Self::UnexpectedToken {
            found: found.to_string(),
            span,
        }
    }

    /// Create unexpected end of input error
    pub fn unexpected_end_of_input(expected: &str) -> Self {
        Self::UnexpectedEndOfInput {
            expected: expected.to_string(),
        }
    }

    /// Create expectation failure error
    pub fn expected(expected: &str, found: &str, span: Span) -> Self {
        Self::Expected {
            expected: expected.to_string(),
            found: found.to_string(),
            span,
        }
    }

    /// Create strict mode violation error
    pub fn strict_violation(message: &str, span: Span) -> Self {
        Self::StrictViolation {
            message: message.to_string(),
            span,
        }
    }

    /// Get error code for the logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedToken { .. } => codes::syntax::UNEXPECTED_TOKEN,
            Self::UnexpectedEndOfInput { .. } => codes::syntax::UNEXPECTED_EOF,
            Self::Expected { .. } => codes::syntax::EXPECTED_TOKEN,
            Self::IllegalNewlineAfterThrow { .. } => codes::syntax::RESTRICTED_PRODUCTION,
            Self::IllegalReturn { .. }
            | Self::IllegalBreak { .. }
            | Self::IllegalContinue { .. } => codes::syntax::ILLEGAL_JUMP,
            Self::UndefinedLabel { .. } => codes::syntax::UNDEFINED_LABEL,
            Self::DuplicateLabel { .. } => codes::syntax::DUPLICATE_LABEL,
            Self::InvalidAssignmentTarget { .. } => codes::syntax::INVALID_ASSIGNMENT,
            Self::MultipleDefaults { .. } => codes::syntax::GRAMMAR_VIOLATION,
            Self::StrictViolation { .. } => codes::syntax::STRICT_VIOLATION,
            Self::MaxRecursionDepth { .. } => codes::syntax::RECURSION_LIMIT,
        }
    }

    /// Get span if available
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::Expected { span, .. }
            | Self::IllegalNewlineAfterThrow { span }
            | Self::IllegalReturn { span }
            | Self::IllegalBreak { span }
            | Self::IllegalContinue { span }
            | Self::UndefinedLabel { span, .. }
            | Self::DuplicateLabel { span, .. }
            | Self::InvalidAssignmentTarget { span }
            | Self::MultipleDefaults { span }
            | Self::StrictViolation { span, .. }
            | Self::MaxRecursionDepth { span } => Some(*span),
            Self::UnexpectedEndOfInput { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    fn span() -> Span {
        Span::new(Position::new(4, 1, 5), Position::new(7, 1, 8))
    }

    #[test]
    fn test_unexpected_token_message_carries_lexeme() {
        let error = SyntaxError::unexpected_token("...", span());
        assert_eq!(error.to_string(), "Unexpected token ...");
    }

    #[test]
    fn test_span_extraction() {
        let error = SyntaxError::expected(";", "var", span());
        assert_eq!(error.span(), Some(span()));
        assert_eq!(error.span().unwrap().start.column, 5);

        let error = SyntaxError::unexpected_end_of_input(";");
        assert_eq!(error.span(), None);
    }

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            SyntaxError::unexpected_token("x", span()).error_code(),
            codes::syntax::UNEXPECTED_TOKEN
        );
        assert_eq!(
            SyntaxError::MaxRecursionDepth { span: span() }.error_code(),
            codes::syntax::RECURSION_LIMIT
        );
    }
}
