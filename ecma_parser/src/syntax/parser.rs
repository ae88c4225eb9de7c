//! Parser driver
//!
//! `ScriptParser` owns the token stream, the resolved feature set, and the
//! per-parse state: a stack of scope frames (strict flag, generator flag,
//! labels, iteration/switch depth), the recursion guard, and the span of
//! the most recently consumed token used to close node metadata. It
//! implements the `Parser` trait the grammar builders program against.
//! All state is created at parse start and discarded at parse end.

use crate::config::constants::compile_time::syntax::{MAX_PARSE_DEPTH, MAX_SCOPE_DEPTH};
use crate::config::FeatureSet;
use crate::grammar::ast::nodes::{Node, NodeMeta};
use crate::grammar::builders::{self, Parser, ParserCheckpoint};
use crate::grammar::keywords::Keyword;
use crate::logging::codes;
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::tokens::token::{Punctuator, Token};
use crate::tokens::token_stream::{SpannedToken, TokenStream};
use crate::utils::{Position, Span};
use crate::{log_debug, log_error, log_success};

/// One entry of the scope stack. A frame is pushed per function body (and
/// one for the program itself) and popped when that scope's parse
/// completes, restoring the enclosing strictness.
#[derive(Debug, Clone)]
struct ScopeFrame {
    strict: bool,
    generator: bool,
    is_function: bool,
    labels: Vec<String>,
    iteration_depth: u32,
    switch_depth: u32,
}

impl ScopeFrame {
    fn program() -> Self {
        Self {
            strict: false,
            generator: false,
            is_function: false,
            labels: Vec::new(),
            iteration_depth: 0,
            switch_depth: 0,
        }
    }

    fn function(strict: bool, generator: bool) -> Self {
        Self {
            strict,
            generator,
            is_function: true,
            labels: Vec::new(),
            iteration_depth: 0,
            switch_depth: 0,
        }
    }
}

/// Recursive-descent parser over a scanned token stream.
pub struct ScriptParser {
    tokens: TokenStream,
    features: FeatureSet,
    attach_loc: bool,
    attach_range: bool,
    scopes: Vec<ScopeFrame>,
    parse_depth: usize,
    last_consumed: Span,
    source_span: Span,
}

impl ScriptParser {
    pub fn new(
        tokens: TokenStream,
        features: FeatureSet,
        attach_loc: bool,
        attach_range: bool,
    ) -> Self {
        let source_span = tokens
            .all_tokens()
            .last()
            .map(|eof| Span::new(Position::start(), eof.span.end))
            .unwrap_or_else(Span::dummy);

        Self {
            tokens,
            features,
            attach_loc,
            attach_range,
            scopes: vec![ScopeFrame::program()],
            parse_depth: 0,
            last_consumed: Span::dummy(),
            source_span,
        }
    }

    /// Parse the token stream into a Program node
    pub fn parse_program(&mut self) -> SyntaxResult<Node> {
        log_debug!("Starting syntax analysis", "tokens" => self.tokens.len());

        match builders::parse_program(self) {
            Ok(program) => {
                log_success!(codes::success::PARSE_COMPLETE,
                    "Syntax analysis completed",
                    "final_position" => self.tokens.position()
                );
                Ok(program)
            }
            Err(error) => {
                log_error!(error.error_code(), "Syntax analysis failed",
                    "detail" => error,
                    "position" => self.tokens.position()
                );
                Err(error)
            }
        }
    }

    fn scope(&self) -> &ScopeFrame {
        self.scopes.last().expect("scope stack never empty")
    }

    fn scope_mut(&mut self) -> &mut ScopeFrame {
        self.scopes.last_mut().expect("scope stack never empty")
    }
}

impl Parser for ScriptParser {
    // === NAVIGATION ===

    fn current(&self) -> Option<&SpannedToken> {
        self.tokens.current()
    }

    fn current_token(&self) -> Option<&Token> {
        self.tokens.current_token()
    }

    fn peek_token(&self, n: usize) -> Option<&Token> {
        self.tokens.peek_ahead(n).map(|spanned| &spanned.value)
    }

    fn advance(&mut self) {
        if let Some(span) = self.tokens.current_span() {
            self.last_consumed = span;
        }
        self.tokens.advance();
    }

    fn current_span(&self) -> Span {
        self.tokens.current_span().unwrap_or_else(Span::dummy)
    }

    fn last_span(&self) -> Span {
        self.last_consumed
    }

    fn at_end(&self) -> bool {
        self.tokens.is_at_end()
    }

    // === LINE TERMINATOR QUERIES ===

    fn newline_before_current(&self) -> bool {
        self.tokens.newline_before_current()
    }

    fn newline_before_token(&self, n: usize) -> bool {
        self.tokens.newline_before(self.tokens.position() + n)
    }

    // === CONFIGURATION ===

    fn features(&self) -> &FeatureSet {
        &self.features
    }

    // === EXPECTATIONS ===

    fn expect_punctuator(&mut self, punctuator: Punctuator) -> SyntaxResult<Span> {
        match self.tokens.current_token() {
            Some(Token::Punctuator(actual)) if *actual == punctuator => {
                let span = self.current_span();
                self.advance();
                Ok(span)
            }
            Some(Token::Eof) | None => {
                Err(SyntaxError::unexpected_end_of_input(punctuator.as_str()))
            }
            Some(token) => Err(SyntaxError::expected(
                punctuator.as_str(),
                &token.source_text(),
                self.current_span(),
            )),
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> SyntaxResult<Span> {
        match self.tokens.current_token() {
            Some(Token::Keyword(actual)) if *actual == keyword => {
                let span = self.current_span();
                self.advance();
                Ok(span)
            }
            Some(Token::Eof) | None => Err(SyntaxError::unexpected_end_of_input(keyword.as_str())),
            Some(token) => Err(SyntaxError::expected(
                keyword.as_str(),
                &token.source_text(),
                self.current_span(),
            )),
        }
    }

    fn eat_punctuator(&mut self, punctuator: Punctuator) -> bool {
        if self.at_punctuator(punctuator) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.at_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn at_punctuator(&self, punctuator: Punctuator) -> bool {
        matches!(self.tokens.current_token(), Some(token) if token.is_punctuator(punctuator))
    }

    fn at_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.tokens.current_token(), Some(token) if token.is_keyword(keyword))
    }

    fn consume_semicolon(&mut self) -> SyntaxResult<()> {
        if self.eat_punctuator(Punctuator::Semicolon) {
            return Ok(());
        }
        match self.tokens.current_token() {
            Some(Token::Punctuator(Punctuator::RBrace)) | Some(Token::Eof) | None => Ok(()),
            _ if self.tokens.newline_before_current() => Ok(()),
            Some(token) => Err(SyntaxError::expected(
                ";",
                &token.source_text(),
                self.current_span(),
            )),
        }
    }

    // === NODE METADATA ===

    fn node_meta(&self, start: Span) -> NodeMeta {
        let end = if self.last_consumed.end.offset >= start.start.offset {
            self.last_consumed.end
        } else {
            start.end
        };
        let span = Span::new(start.start, end);
        NodeMeta {
            range: self.attach_range.then(|| span.as_range()),
            loc: self.attach_loc.then(|| span.as_location()),
        }
    }

    fn full_meta(&self) -> NodeMeta {
        NodeMeta {
            range: self.attach_range.then(|| self.source_span.as_range()),
            loc: self.attach_loc.then(|| self.source_span.as_location()),
        }
    }

    // === ERRORS ===

    fn unexpected(&self) -> SyntaxError {
        match self.tokens.current_token() {
            Some(Token::Eof) | None => SyntaxError::unexpected_end_of_input("token"),
            Some(token) => SyntaxError::unexpected_token(&token.source_text(), self.current_span()),
        }
    }

    // === SCOPE STATE ===

    fn strict(&self) -> bool {
        self.scope().strict
    }

    fn set_strict(&mut self, on: bool) {
        self.scope_mut().strict = on;
    }

    fn in_function(&self) -> bool {
        self.scope().is_function
    }

    fn in_generator(&self) -> bool {
        self.scope().generator
    }

    fn in_iteration(&self) -> bool {
        self.scope().iteration_depth > 0
    }

    fn in_switch(&self) -> bool {
        self.scope().switch_depth > 0
    }

    fn enter_function_scope(&mut self, generator: bool) -> SyntaxResult<()> {
        if self.scopes.len() >= MAX_SCOPE_DEPTH {
            return Err(SyntaxError::MaxRecursionDepth {
                span: self.current_span(),
            });
        }
        let strict = self.strict();
        self.scopes.push(ScopeFrame::function(strict, generator));
        Ok(())
    }

    fn exit_function_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    fn enter_iteration(&mut self) {
        self.scope_mut().iteration_depth += 1;
    }

    fn exit_iteration(&mut self) {
        let scope = self.scope_mut();
        scope.iteration_depth = scope.iteration_depth.saturating_sub(1);
    }

    fn enter_switch(&mut self) {
        self.scope_mut().switch_depth += 1;
    }

    fn exit_switch(&mut self) {
        let scope = self.scope_mut();
        scope.switch_depth = scope.switch_depth.saturating_sub(1);
    }

    fn push_label(&mut self, name: &str, span: Span) -> SyntaxResult<()> {
        if self.scope().labels.iter().any(|label| label == name) {
            return Err(SyntaxError::DuplicateLabel {
                name: name.to_string(),
                span,
            });
        }
        self.scope_mut().labels.push(name.to_string());
        Ok(())
    }

    fn pop_label(&mut self) {
        self.scope_mut().labels.pop();
    }

    fn has_label(&self, name: &str) -> bool {
        self.scope().labels.iter().any(|label| label == name)
    }

    // === RECURSION GUARD AND BACKTRACKING ===

    fn enter_production(&mut self) -> SyntaxResult<()> {
        if self.parse_depth >= MAX_PARSE_DEPTH {
            return Err(SyntaxError::MaxRecursionDepth {
                span: self.current_span(),
            });
        }
        self.parse_depth += 1;
        Ok(())
    }

    fn exit_production(&mut self) {
        self.parse_depth = self.parse_depth.saturating_sub(1);
    }

    fn save_checkpoint(&self) -> ParserCheckpoint {
        ParserCheckpoint {
            position: self.tokens.save_position(),
            scope_depth: self.scopes.len(),
            parse_depth: self.parse_depth,
            last_span: self.last_consumed,
        }
    }

    fn restore_checkpoint(&mut self, checkpoint: ParserCheckpoint) {
        self.tokens.restore_position(checkpoint.position);
        self.scopes.truncate(checkpoint.scope_depth.max(1));
        self.parse_depth = checkpoint.parse_depth;
        self.last_consumed = checkpoint.last_span;
    }
}
