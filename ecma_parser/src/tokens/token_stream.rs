//! Span-accurate token stream for the parser
//!
//! The stream keeps every scanned token (trivia included) with its original
//! span, and overlays an index of significant tokens for parsing. Keeping
//! the trivia around is what lets automatic semicolon insertion ask "was
//! there a line terminator before this token?" without re-reading source.

use crate::config::constants::compile_time::syntax::MAX_LOOKAHEAD_TOKENS;
use crate::tokens::token::{Punctuator, Token};
use crate::utils::{Span, Spanned};

/// A token with span information
pub type SpannedToken = Spanned<Token>;

/// Token stream maintaining precise source locations across the filtered
/// view the parser consumes.
#[derive(Debug, Clone)]
pub struct TokenStream {
    /// All tokens (including trivia) with original spans
    all_tokens: Vec<SpannedToken>,
    /// Indices into all_tokens for significant tokens
    significant_indices: Vec<usize>,
    /// Current position in significant_indices
    position: usize,
}

impl TokenStream {
    /// Create a new token stream with automatic trivia filtering
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        let significant_indices = tokens
            .iter()
            .enumerate()
            .filter(|(_, spanned)| spanned.value.is_significant())
            .map(|(i, _)| i)
            .collect();
        Self {
            all_tokens: tokens,
            significant_indices,
            position: 0,
        }
    }

    // === CORE NAVIGATION ===

    /// Get the current significant token with its span
    pub fn current(&self) -> Option<&SpannedToken> {
        self.significant_indices
            .get(self.position)
            .and_then(|&original_index| self.all_tokens.get(original_index))
    }

    /// Get the current token value (without span)
    pub fn current_token(&self) -> Option<&Token> {
        self.current().map(|spanned| &spanned.value)
    }

    /// Get the span of the current token
    pub fn current_span(&self) -> Option<Span> {
        self.current().map(|spanned| spanned.span)
    }

    /// Peek ahead by n significant positions without advancing
    /// (`peek_ahead(0)` is the current token). Bounded lookahead.
    pub fn peek_ahead(&self, n: usize) -> Option<&SpannedToken> {
        let n = n.min(MAX_LOOKAHEAD_TOKENS);
        self.significant_indices
            .get(self.position + n)
            .and_then(|&original_index| self.all_tokens.get(original_index))
    }

    /// Advance to the next significant token
    pub fn advance(&mut self) -> Option<&SpannedToken> {
        if self.position < self.significant_indices.len() {
            self.position += 1;
        }
        self.current()
    }

    /// Check if the current token is EOF (or past the end)
    pub fn is_at_end(&self) -> bool {
        match self.current_token() {
            Some(Token::Eof) | None => true,
            _ => false,
        }
    }

    /// Get the number of significant tokens
    pub fn len(&self) -> usize {
        self.significant_indices.len()
    }

    /// Check if the stream has no significant tokens
    pub fn is_empty(&self) -> bool {
        self.significant_indices.is_empty()
    }

    /// Get the current significant position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Save current position for backtracking
    pub fn save_position(&self) -> usize {
        self.position
    }

    /// Restore a previously saved position
    pub fn restore_position(&mut self, position: usize) {
        self.position = position.min(self.significant_indices.len());
    }

    // === LINE TERMINATOR QUERIES (ASI) ===

    /// Check whether a line terminator occurs in the trivia gap before the
    /// significant token at `position`. Block comments spanning a line
    /// count as line terminators.
    pub fn newline_before(&self, position: usize) -> bool {
        let Some(&end_index) = self.significant_indices.get(position) else {
            // Past the last significant token: examine trailing trivia
            let start_index = self
                .significant_indices
                .last()
                .map(|&i| i + 1)
                .unwrap_or(0);
            return self.gap_has_newline(start_index, self.all_tokens.len());
        };

        let start_index = if position == 0 {
            0
        } else {
            self.significant_indices[position - 1] + 1
        };
        self.gap_has_newline(start_index, end_index)
    }

    /// Check whether a line terminator precedes the current token
    pub fn newline_before_current(&self) -> bool {
        self.newline_before(self.position)
    }

    fn gap_has_newline(&self, start_index: usize, end_index: usize) -> bool {
        self.all_tokens[start_index..end_index]
            .iter()
            .any(|spanned| match &spanned.value {
                Token::LineTerminator => true,
                Token::BlockComment(text) => {
                    text.contains(['\n', '\r', '\u{2028}', '\u{2029}'])
                }
                _ => false,
            })
    }

    // === SPAN ACCURACY ===

    /// Get span at a specific significant position
    pub fn span_at_position(&self, position: usize) -> Option<Span> {
        self.significant_indices
            .get(position)
            .and_then(|&original_index| self.all_tokens.get(original_index))
            .map(|spanned| spanned.span)
    }

    /// Get span covering a range of significant token positions
    pub fn span_range(&self, start_pos: usize, end_pos: usize) -> Span {
        let start_span = self.span_at_position(start_pos);
        let end_span = self.span_at_position(end_pos);

        match (start_span, end_span) {
            (Some(start), Some(end)) => start.merge(end),
            (Some(start), None) => start,
            (None, Some(end)) => end,
            (None, None) => Span::dummy(),
        }
    }

    // === CONVENIENCE MATCHERS ===

    /// Check if the current token is the given punctuator
    pub fn at_punctuator(&self, punctuator: Punctuator) -> bool {
        self.current_token()
            .map(|token| token.is_punctuator(punctuator))
            .unwrap_or(false)
    }

    // === FULL-SEQUENCE ACCESS (entry-point output) ===

    /// All tokens including trivia, in source order
    pub fn all_tokens(&self) -> &[SpannedToken] {
        &self.all_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::keywords::Keyword;
    use crate::utils::Position;

    fn spanned(token: Token, start: usize, end: usize) -> SpannedToken {
        Spanned::new(
            token,
            Span::new(Position::new(start, 1, 1), Position::new(end, 1, 1)),
        )
    }

    fn sample_stream() -> TokenStream {
        TokenStream::new(vec![
            spanned(Token::Keyword(Keyword::Var), 0, 3),
            spanned(Token::Whitespace, 3, 4),
            spanned(Token::Identifier("a".to_string()), 4, 5),
            spanned(Token::LineTerminator, 5, 6),
            spanned(Token::Identifier("b".to_string()), 6, 7),
            spanned(Token::Eof, 7, 7),
        ])
    }

    #[test]
    fn test_trivia_is_filtered_from_significant_view() {
        let stream = sample_stream();
        assert_eq!(stream.len(), 4);
        assert!(matches!(
            stream.current_token(),
            Some(Token::Keyword(Keyword::Var))
        ));
    }

    #[test]
    fn test_advance_and_peek() {
        let mut stream = sample_stream();
        assert!(matches!(
            stream.peek_ahead(1).map(|t| &t.value),
            Some(Token::Identifier(name)) if name == "a"
        ));
        stream.advance();
        assert!(matches!(
            stream.current_token(),
            Some(Token::Identifier(name)) if name == "a"
        ));
    }

    #[test]
    fn test_newline_before() {
        let stream = sample_stream();
        // positions: 0=var 1=a 2=b 3=eof
        assert!(!stream.newline_before(0));
        assert!(!stream.newline_before(1));
        assert!(stream.newline_before(2));
        assert!(!stream.newline_before(3));
    }

    #[test]
    fn test_multiline_block_comment_counts_as_newline() {
        let stream = TokenStream::new(vec![
            spanned(Token::Identifier("a".to_string()), 0, 1),
            spanned(Token::BlockComment(" x\n y ".to_string()), 1, 8),
            spanned(Token::Identifier("b".to_string()), 8, 9),
            spanned(Token::Eof, 9, 9),
        ]);
        assert!(stream.newline_before(1));
    }

    #[test]
    fn test_single_line_block_comment_is_not_newline() {
        let stream = TokenStream::new(vec![
            spanned(Token::Identifier("a".to_string()), 0, 1),
            spanned(Token::BlockComment(" x ".to_string()), 1, 6),
            spanned(Token::Identifier("b".to_string()), 6, 7),
            spanned(Token::Eof, 7, 7),
        ]);
        assert!(!stream.newline_before(1));
    }

    #[test]
    fn test_save_and_restore_position() {
        let mut stream = sample_stream();
        let saved = stream.save_position();
        stream.advance();
        stream.advance();
        assert_eq!(stream.position(), 2);
        stream.restore_position(saved);
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_is_at_end_on_eof() {
        let mut stream = sample_stream();
        assert!(!stream.is_at_end());
        stream.advance();
        stream.advance();
        stream.advance();
        assert!(stream.is_at_end());
    }
}
