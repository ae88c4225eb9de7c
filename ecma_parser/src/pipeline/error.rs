//! Umbrella error for the tokenize/parse entry points

use crate::lexical::LexerError;
use crate::logging::Code;
use crate::syntax::SyntaxError;

/// First error encountered in source order, lexical or syntactic. The
/// entry points abort on it; no partial result is produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lexical(#[from] LexerError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl ParseError {
    /// Byte offset of the error, when one is attached
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Lexical(error) => Some(error.offset()),
            Self::Syntax(error) => error.span().map(|span| span.start.offset),
        }
    }

    /// Logging code of the underlying error
    pub fn error_code(&self) -> Code {
        match self {
            Self::Lexical(error) => error.error_code(),
            Self::Syntax(error) => error.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{Position, Span};

    #[test]
    fn test_message_passthrough() {
        let error = ParseError::from(LexerError::InvalidRegexFlag {
            flag: 'u',
            offset: 15,
        });
        assert!(error
            .to_string()
            .contains("Invalid regular expression flag"));
        assert_eq!(error.offset(), Some(15));
    }

    #[test]
    fn test_syntax_offset() {
        let span = Span::new(Position::new(6, 1, 7), Position::new(9, 1, 10));
        let error = ParseError::from(SyntaxError::unexpected_token("var", span));
        assert_eq!(error.offset(), Some(6));
    }
}
