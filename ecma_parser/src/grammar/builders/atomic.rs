//! Parser trait and atomic recognizers shared by the grammar builders
//!
//! Builders are free functions over this trait, one per grammar
//! production. The trait is the seam between the token-level machinery
//! (stream navigation, spans, scope state, the recursion guard) and the
//! grammar itself, so recognizers stay focused on the productions.

use crate::config::FeatureSet;
use crate::grammar::ast::nodes::{Node, NodeMeta};
use crate::grammar::keywords::{is_restricted_word, is_strict_mode_reserved, Keyword};
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::tokens::token::{Punctuator, Token};
use crate::tokens::token_stream::SpannedToken;
use crate::utils::Span;

/// Saved parser state for the one backtracking site (arrow-function
/// parameter lists). Restoring truncates any scopes entered during the
/// attempt.
#[derive(Debug, Clone, Copy)]
pub struct ParserCheckpoint {
    pub position: usize,
    pub scope_depth: usize,
    pub parse_depth: usize,
    pub last_span: Span,
}

/// Interface the grammar builders program against.
pub trait Parser {
    // === NAVIGATION ===
    fn current(&self) -> Option<&SpannedToken>;
    fn current_token(&self) -> Option<&Token>;
    fn peek_token(&self, n: usize) -> Option<&Token>;
    fn advance(&mut self);
    fn current_span(&self) -> Span;
    fn last_span(&self) -> Span;
    fn at_end(&self) -> bool;

    // === LINE TERMINATOR QUERIES ===
    fn newline_before_current(&self) -> bool;
    fn newline_before_token(&self, n: usize) -> bool;

    // === CONFIGURATION ===
    fn features(&self) -> &FeatureSet;

    // === EXPECTATIONS ===
    fn expect_punctuator(&mut self, punctuator: Punctuator) -> SyntaxResult<Span>;
    fn expect_keyword(&mut self, keyword: Keyword) -> SyntaxResult<Span>;
    fn eat_punctuator(&mut self, punctuator: Punctuator) -> bool;
    fn eat_keyword(&mut self, keyword: Keyword) -> bool;
    fn at_punctuator(&self, punctuator: Punctuator) -> bool;
    fn at_keyword(&self, keyword: Keyword) -> bool;

    /// Consume a statement terminator, applying automatic semicolon
    /// insertion: a missing `;` is accepted before `}`, before a line
    /// terminator, and at end of input.
    fn consume_semicolon(&mut self) -> SyntaxResult<()>;

    // === NODE METADATA ===
    fn node_meta(&self, start: Span) -> NodeMeta;
    /// Metadata spanning the entire source (the Program node)
    fn full_meta(&self) -> NodeMeta;

    // === ERRORS ===
    fn unexpected(&self) -> SyntaxError;

    // === SCOPE STATE ===
    fn strict(&self) -> bool;
    fn set_strict(&mut self, on: bool);
    fn in_function(&self) -> bool;
    fn in_generator(&self) -> bool;
    fn in_iteration(&self) -> bool;
    fn in_switch(&self) -> bool;
    fn enter_function_scope(&mut self, generator: bool) -> SyntaxResult<()>;
    fn exit_function_scope(&mut self);
    fn enter_iteration(&mut self);
    fn exit_iteration(&mut self);
    fn enter_switch(&mut self);
    fn exit_switch(&mut self);
    fn push_label(&mut self, name: &str, span: Span) -> SyntaxResult<()>;
    fn pop_label(&mut self);
    fn has_label(&self, name: &str) -> bool;

    // === RECURSION GUARD AND BACKTRACKING ===
    fn enter_production(&mut self) -> SyntaxResult<()>;
    fn exit_production(&mut self);
    fn save_checkpoint(&self) -> ParserCheckpoint;
    fn restore_checkpoint(&mut self, checkpoint: ParserCheckpoint);
}

// === ATOMIC RECOGNIZERS ===

/// Parse an identifier reference. `yield` is an ordinary identifier
/// outside generators in sloppy mode even when the generators feature
/// put it in the keyword table.
pub fn parse_identifier_node(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let span = parser.current_span();
    match parser.current_token() {
        Some(Token::Identifier(name)) => {
            let name = name.clone();
            parser.advance();
            Ok(Node::Identifier {
                name,
                meta: parser.node_meta(span),
            })
        }
        Some(Token::Keyword(Keyword::Yield)) if !parser.in_generator() && !parser.strict() => {
            parser.advance();
            Ok(Node::Identifier {
                name: "yield".to_string(),
                meta: parser.node_meta(span),
            })
        }
        _ => Err(parser.unexpected()),
    }
}

/// Parse an identifier in binding position, enforcing the strict-mode
/// restrictions on `eval`/`arguments` and reserved words.
pub fn parse_binding_identifier(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let span = parser.current_span();
    let node = parse_identifier_node(parser)?;
    if parser.strict() {
        if let Some(name) = node.identifier_name() {
            check_strict_binding_name(name, span)?;
        }
    }
    Ok(node)
}

/// Reject `eval`/`arguments` and strict-reserved words as binding names
pub fn check_strict_binding_name(name: &str, span: Span) -> SyntaxResult<()> {
    if is_restricted_word(name) {
        return Err(SyntaxError::strict_violation(
            &format!("Binding '{}' in strict mode", name),
            span,
        ));
    }
    if is_strict_mode_reserved(name) {
        return Err(SyntaxError::strict_violation(
            &format!("Use of reserved word '{}' in strict mode", name),
            span,
        ));
    }
    Ok(())
}

/// Parse an IdentifierName (property position after `.`), where reserved
/// words are ordinary names.
pub fn parse_identifier_name(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let span = parser.current_span();
    let name = match parser.current_token() {
        Some(Token::Identifier(name)) => name.clone(),
        Some(Token::Keyword(keyword)) => keyword.as_str().to_string(),
        Some(Token::BooleanLiteral(true)) => "true".to_string(),
        Some(Token::BooleanLiteral(false)) => "false".to_string(),
        Some(Token::NullLiteral) => "null".to_string(),
        _ => return Err(parser.unexpected()),
    };
    parser.advance();
    Ok(Node::Identifier {
        name,
        meta: parser.node_meta(span),
    })
}

/// Check whether a token can begin an expression. Regex/division is
/// already resolved at scan time, so a slash never reaches this point.
pub fn token_starts_expression(token: &Token) -> bool {
    match token {
        Token::Identifier(_)
        | Token::BooleanLiteral(_)
        | Token::NullLiteral
        | Token::NumericLiteral { .. }
        | Token::StringLiteral { .. }
        | Token::RegularExpression { .. }
        | Token::Template { head: true, .. } => true,
        Token::Keyword(keyword) => matches!(
            keyword,
            Keyword::This
                | Keyword::Function
                | Keyword::New
                | Keyword::Typeof
                | Keyword::Delete
                | Keyword::Void
                | Keyword::Yield
        ),
        Token::Punctuator(punctuator) => matches!(
            punctuator,
            Punctuator::LParen
                | Punctuator::LBracket
                | Punctuator::LBrace
                | Punctuator::Plus
                | Punctuator::Minus
                | Punctuator::Bang
                | Punctuator::Tilde
                | Punctuator::PlusPlus
                | Punctuator::MinusMinus
        ),
        _ => false,
    }
}
