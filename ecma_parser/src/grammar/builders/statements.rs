//! Statement and declaration recognizers
//!
//! One function per statement production. Statement termination runs
//! through `Parser::consume_semicolon`, which applies the automatic
//! semicolon insertion rules; the restricted productions (`return`,
//! `break`, `continue`, `throw`) additionally check for a line terminator
//! directly after their keyword.

use crate::config::Feature;
use crate::grammar::ast::nodes::*;
use crate::grammar::builders::atomic::{parse_identifier_node, Parser};
use crate::grammar::builders::functions::{self, parse_binding_pattern};
use crate::grammar::builders::expressions::{
    self, parse_assignment_expression, parse_expression,
};
use crate::grammar::keywords::Keyword;
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::tokens::token::{Punctuator, Token};

/// Parse a whole program: directive prologue, then statements to EOF
pub fn parse_program(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let mut body = parse_directive_prologue(parser)?;
    while !parser.at_end() {
        body.push(parse_statement(parser)?);
    }
    Ok(Node::Program {
        body,
        meta: parser.full_meta(),
    })
}

/// Parse the directive prologue of a program or function body. A literal
/// `"use strict"` directive flips the current scope to strict; an octal
/// escape in an earlier directive then becomes an error.
pub fn parse_directive_prologue(parser: &mut dyn Parser) -> SyntaxResult<Vec<Node>> {
    let mut statements = Vec::new();
    let mut pending_octal = None;

    loop {
        let (token_octal, token_span) = match parser.current_token() {
            Some(Token::StringLiteral { octal, .. }) => (*octal, parser.current_span()),
            _ => break,
        };

        let statement = parse_statement(parser)?;
        let directive = directive_of(&statement);
        statements.push(statement);

        match directive {
            Some(raw) => {
                if &raw[1..raw.len() - 1] == "use strict" {
                    if let Some(span) = pending_octal {
                        return Err(SyntaxError::strict_violation(
                            "Octal escape sequences are not allowed in strict mode",
                            span,
                        ));
                    }
                    parser.set_strict(true);
                } else if token_octal && pending_octal.is_none() {
                    pending_octal = Some(token_span);
                }
            }
            None => break,
        }
    }
    Ok(statements)
}

/// The raw text of a directive statement (an expression statement whose
/// expression is a plain string literal), if it is one
fn directive_of(statement: &Node) -> Option<String> {
    let Node::ExpressionStatement { expression, .. } = statement else {
        return None;
    };
    let Node::Literal {
        value: LiteralValue::String(_),
        raw,
        ..
    } = expression.as_ref()
    else {
        return None;
    };
    Some(raw.clone())
}

/// Parse a single statement
pub fn parse_statement(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    parser.enter_production()?;
    let result = parse_statement_inner(parser);
    parser.exit_production();
    result
}

fn parse_statement_inner(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    match parser.current_token() {
        None | Some(Token::Eof) => Err(SyntaxError::unexpected_end_of_input("statement")),

        Some(Token::Punctuator(Punctuator::LBrace)) => parse_block(parser),

        Some(Token::Punctuator(Punctuator::Semicolon)) => {
            let start = parser.current_span();
            parser.advance();
            Ok(Node::EmptyStatement {
                meta: parser.node_meta(start),
            })
        }

        Some(Token::Keyword(keyword)) => match keyword {
            Keyword::Var => parse_variable_statement(parser, DeclarationKind::Var),
            Keyword::Let => parse_variable_statement(parser, DeclarationKind::Let),
            Keyword::Const => {
                if parser.features().is_enabled(Feature::BlockBindings) {
                    parse_variable_statement(parser, DeclarationKind::Const)
                } else {
                    Err(parser.unexpected())
                }
            }
            Keyword::Function => functions::parse_function_declaration(parser),
            Keyword::If => parse_if_statement(parser),
            Keyword::Do => parse_do_while_statement(parser),
            Keyword::While => parse_while_statement(parser),
            Keyword::For => parse_for_statement(parser),
            Keyword::Continue => parse_continue_statement(parser),
            Keyword::Break => parse_break_statement(parser),
            Keyword::Return => parse_return_statement(parser),
            Keyword::With => parse_with_statement(parser),
            Keyword::Switch => parse_switch_statement(parser),
            Keyword::Throw => parse_throw_statement(parser),
            Keyword::Try => parse_try_statement(parser),
            Keyword::Debugger => parse_debugger_statement(parser),
            _ => parse_expression_statement(parser),
        },

        Some(Token::Identifier(_))
            if matches!(parser.peek_token(1), Some(t) if t.is_punctuator(Punctuator::Colon)) =>
        {
            parse_labeled_statement(parser)
        }

        _ => parse_expression_statement(parser),
    }
}

/// Parse `{ StatementList }`
pub fn parse_block(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    parser.expect_punctuator(Punctuator::LBrace)?;
    let mut body = Vec::new();
    while !parser.at_punctuator(Punctuator::RBrace) && !parser.at_end() {
        body.push(parse_statement(parser)?);
    }
    parser.expect_punctuator(Punctuator::RBrace)?;
    Ok(Node::BlockStatement {
        body,
        meta: parser.node_meta(start),
    })
}

fn parse_expression_statement(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    let expression = parse_expression(parser, true)?;
    parser.consume_semicolon()?;
    Ok(Node::ExpressionStatement {
        expression: Box::new(expression),
        meta: parser.node_meta(start),
    })
}

// === DECLARATIONS ===

fn parse_variable_statement(
    parser: &mut dyn Parser,
    kind: DeclarationKind,
) -> SyntaxResult<Node> {
    let start = parser.current_span();
    parser.advance();
    let declarations = parse_declaration_list(parser, kind, true, false)?;
    parser.consume_semicolon()?;
    Ok(Node::VariableDeclaration {
        declarations,
        kind,
        meta: parser.node_meta(start),
    })
}

/// Parse one or more declarators. `const` and destructuring patterns
/// require an initializer outside for-in/for-of heads.
fn parse_declaration_list(
    parser: &mut dyn Parser,
    kind: DeclarationKind,
    allow_in: bool,
    for_head: bool,
) -> SyntaxResult<Vec<Node>> {
    let mut declarations = Vec::new();
    loop {
        let start = parser.current_span();
        let id = parse_binding_pattern(parser)?;
        let is_pattern = !id.is_identifier();

        let init = if parser.eat_punctuator(Punctuator::Assign) {
            Some(Box::new(parse_assignment_expression(parser, allow_in)?))
        } else if !for_head && (kind == DeclarationKind::Const || is_pattern) {
            let found = parser
                .current_token()
                .map(|t| t.source_text())
                .unwrap_or_else(|| "<end>".to_string());
            return Err(SyntaxError::expected("=", &found, parser.current_span()));
        } else {
            None
        };

        declarations.push(Node::VariableDeclarator {
            id: Box::new(id),
            init,
            meta: parser.node_meta(start),
        });

        if !parser.eat_punctuator(Punctuator::Comma) {
            break;
        }
    }
    Ok(declarations)
}

// === CONTROL FLOW ===

fn parse_if_statement(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    parser.expect_keyword(Keyword::If)?;
    parser.expect_punctuator(Punctuator::LParen)?;
    let test = parse_expression(parser, true)?;
    parser.expect_punctuator(Punctuator::RParen)?;
    let consequent = parse_statement(parser)?;
    let alternate = if parser.eat_keyword(Keyword::Else) {
        Some(Box::new(parse_statement(parser)?))
    } else {
        None
    };
    Ok(Node::IfStatement {
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate,
        meta: parser.node_meta(start),
    })
}

fn parse_iteration_body(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    parser.enter_iteration();
    let result = parse_statement(parser);
    parser.exit_iteration();
    result
}

fn parse_do_while_statement(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    parser.expect_keyword(Keyword::Do)?;
    let body = parse_iteration_body(parser)?;
    parser.expect_keyword(Keyword::While)?;
    parser.expect_punctuator(Punctuator::LParen)?;
    let test = parse_expression(parser, true)?;
    parser.expect_punctuator(Punctuator::RParen)?;
    // The closing semicolon of do-while is optional
    parser.eat_punctuator(Punctuator::Semicolon);
    Ok(Node::DoWhileStatement {
        body: Box::new(body),
        test: Box::new(test),
        meta: parser.node_meta(start),
    })
}

fn parse_while_statement(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    parser.expect_keyword(Keyword::While)?;
    parser.expect_punctuator(Punctuator::LParen)?;
    let test = parse_expression(parser, true)?;
    parser.expect_punctuator(Punctuator::RParen)?;
    let body = parse_iteration_body(parser)?;
    Ok(Node::WhileStatement {
        test: Box::new(test),
        body: Box::new(body),
        meta: parser.node_meta(start),
    })
}

fn declaration_kind_of(parser: &dyn Parser) -> Option<DeclarationKind> {
    match parser.current_token() {
        Some(Token::Keyword(Keyword::Var)) => Some(DeclarationKind::Var),
        Some(Token::Keyword(Keyword::Let)) => Some(DeclarationKind::Let),
        Some(Token::Keyword(Keyword::Const))
            if parser.features().is_enabled(Feature::BlockBindings) =>
        {
            Some(DeclarationKind::Const)
        }
        _ => None,
    }
}

fn at_of_identifier(parser: &dyn Parser) -> bool {
    matches!(parser.current_token(), Some(Token::Identifier(name)) if name == "of")
}

fn parse_for_statement(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    parser.expect_keyword(Keyword::For)?;
    parser.expect_punctuator(Punctuator::LParen)?;

    let mut init: Option<Box<Node>> = None;

    if parser.at_punctuator(Punctuator::Semicolon) {
        parser.advance();
    } else if let Some(kind) = declaration_kind_of(parser) {
        let declaration_start = parser.current_span();
        parser.advance();
        let declarations = parse_declaration_list(parser, kind, false, true)?;
        let single = declarations.len() == 1;
        let declaration = Node::VariableDeclaration {
            declarations,
            kind,
            meta: parser.node_meta(declaration_start),
        };

        if parser.at_keyword(Keyword::In) {
            if !single {
                return Err(parser.unexpected());
            }
            parser.advance();
            let right = parse_expression(parser, true)?;
            parser.expect_punctuator(Punctuator::RParen)?;
            let body = parse_iteration_body(parser)?;
            return Ok(Node::ForInStatement {
                left: Box::new(declaration),
                right: Box::new(right),
                body: Box::new(body),
                meta: parser.node_meta(start),
            });
        }

        if parser.features().is_enabled(Feature::ForOf) && at_of_identifier(parser) {
            if !single || declarator_has_init(&declaration) {
                return Err(parser.unexpected());
            }
            parser.advance();
            let right = parse_assignment_expression(parser, true)?;
            parser.expect_punctuator(Punctuator::RParen)?;
            let body = parse_iteration_body(parser)?;
            return Ok(Node::ForOfStatement {
                left: Box::new(declaration),
                right: Box::new(right),
                body: Box::new(body),
                meta: parser.node_meta(start),
            });
        }

        init = Some(Box::new(declaration));
        parser.expect_punctuator(Punctuator::Semicolon)?;
    } else {
        let expr = parse_expression(parser, false)?;

        if parser.at_keyword(Keyword::In) {
            let left = expressions::reinterpret_for_target(parser, expr)?;
            parser.advance();
            let right = parse_expression(parser, true)?;
            parser.expect_punctuator(Punctuator::RParen)?;
            let body = parse_iteration_body(parser)?;
            return Ok(Node::ForInStatement {
                left: Box::new(left),
                right: Box::new(right),
                body: Box::new(body),
                meta: parser.node_meta(start),
            });
        }

        if parser.features().is_enabled(Feature::ForOf) && at_of_identifier(parser) {
            let left = expressions::reinterpret_for_target(parser, expr)?;
            parser.advance();
            let right = parse_assignment_expression(parser, true)?;
            parser.expect_punctuator(Punctuator::RParen)?;
            let body = parse_iteration_body(parser)?;
            return Ok(Node::ForOfStatement {
                left: Box::new(left),
                right: Box::new(right),
                body: Box::new(body),
                meta: parser.node_meta(start),
            });
        }

        init = Some(Box::new(expr));
        parser.expect_punctuator(Punctuator::Semicolon)?;
    }

    let test = if parser.at_punctuator(Punctuator::Semicolon) {
        None
    } else {
        Some(Box::new(parse_expression(parser, true)?))
    };
    parser.expect_punctuator(Punctuator::Semicolon)?;

    let update = if parser.at_punctuator(Punctuator::RParen) {
        None
    } else {
        Some(Box::new(parse_expression(parser, true)?))
    };
    parser.expect_punctuator(Punctuator::RParen)?;

    let body = parse_iteration_body(parser)?;
    Ok(Node::ForStatement {
        init,
        test,
        update,
        body: Box::new(body),
        meta: parser.node_meta(start),
    })
}

fn declarator_has_init(declaration: &Node) -> bool {
    match declaration {
        Node::VariableDeclaration { declarations, .. } => declarations
            .iter()
            .any(|d| matches!(d, Node::VariableDeclarator { init: Some(_), .. })),
        _ => false,
    }
}

// === JUMPS ===

fn parse_continue_statement(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    parser.expect_keyword(Keyword::Continue)?;

    let mut label = None;
    if !parser.newline_before_current() {
        if let Some(Token::Identifier(name)) = parser.current_token() {
            let name = name.clone();
            let span = parser.current_span();
            if !parser.has_label(&name) {
                return Err(SyntaxError::UndefinedLabel { name, span });
            }
            label = Some(Box::new(parse_identifier_node(parser)?));
        }
    }
    parser.consume_semicolon()?;

    if !parser.in_iteration() {
        return Err(SyntaxError::IllegalContinue { span: start });
    }
    Ok(Node::ContinueStatement {
        label,
        meta: parser.node_meta(start),
    })
}

fn parse_break_statement(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    parser.expect_keyword(Keyword::Break)?;

    let mut label = None;
    if !parser.newline_before_current() {
        if let Some(Token::Identifier(name)) = parser.current_token() {
            let name = name.clone();
            let span = parser.current_span();
            if !parser.has_label(&name) {
                return Err(SyntaxError::UndefinedLabel { name, span });
            }
            label = Some(Box::new(parse_identifier_node(parser)?));
        }
    }
    parser.consume_semicolon()?;

    if label.is_none() && !parser.in_iteration() && !parser.in_switch() {
        return Err(SyntaxError::IllegalBreak { span: start });
    }
    Ok(Node::BreakStatement {
        label,
        meta: parser.node_meta(start),
    })
}

fn parse_return_statement(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    parser.expect_keyword(Keyword::Return)?;

    if !parser.in_function() && !parser.features().is_enabled(Feature::GlobalReturn) {
        return Err(SyntaxError::IllegalReturn { span: start });
    }

    // Restricted production: a line terminator right after `return`
    // always ends the statement
    let argument = if parser.at_punctuator(Punctuator::Semicolon)
        || parser.at_punctuator(Punctuator::RBrace)
        || parser.at_end()
        || parser.newline_before_current()
    {
        None
    } else {
        Some(Box::new(parse_expression(parser, true)?))
    };
    parser.consume_semicolon()?;

    Ok(Node::ReturnStatement {
        argument,
        meta: parser.node_meta(start),
    })
}

// === OTHER STATEMENTS ===

fn parse_with_statement(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    if parser.strict() {
        return Err(SyntaxError::strict_violation(
            "Strict mode code may not include a with statement",
            start,
        ));
    }
    parser.expect_keyword(Keyword::With)?;
    parser.expect_punctuator(Punctuator::LParen)?;
    let object = parse_expression(parser, true)?;
    parser.expect_punctuator(Punctuator::RParen)?;
    let body = parse_statement(parser)?;
    Ok(Node::WithStatement {
        object: Box::new(object),
        body: Box::new(body),
        meta: parser.node_meta(start),
    })
}

fn parse_switch_statement(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    parser.expect_keyword(Keyword::Switch)?;
    parser.expect_punctuator(Punctuator::LParen)?;
    let discriminant = parse_expression(parser, true)?;
    parser.expect_punctuator(Punctuator::RParen)?;
    parser.expect_punctuator(Punctuator::LBrace)?;

    parser.enter_switch();
    let cases = parse_switch_cases(parser);
    parser.exit_switch();
    let cases = cases?;

    parser.expect_punctuator(Punctuator::RBrace)?;
    Ok(Node::SwitchStatement {
        discriminant: Box::new(discriminant),
        cases,
        meta: parser.node_meta(start),
    })
}

fn parse_switch_cases(parser: &mut dyn Parser) -> SyntaxResult<Vec<Node>> {
    let mut cases = Vec::new();
    let mut seen_default = false;

    while !parser.at_punctuator(Punctuator::RBrace) && !parser.at_end() {
        let case_start = parser.current_span();
        let test = if parser.eat_keyword(Keyword::Case) {
            Some(Box::new(parse_expression(parser, true)?))
        } else if parser.at_keyword(Keyword::Default) {
            if seen_default {
                return Err(SyntaxError::MultipleDefaults { span: case_start });
            }
            seen_default = true;
            parser.advance();
            None
        } else {
            return Err(parser.unexpected());
        };
        parser.expect_punctuator(Punctuator::Colon)?;

        let mut consequent = Vec::new();
        while !parser.at_keyword(Keyword::Case)
            && !parser.at_keyword(Keyword::Default)
            && !parser.at_punctuator(Punctuator::RBrace)
            && !parser.at_end()
        {
            consequent.push(parse_statement(parser)?);
        }

        cases.push(Node::SwitchCase {
            test,
            consequent,
            meta: parser.node_meta(case_start),
        });
    }
    Ok(cases)
}

fn parse_throw_statement(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    parser.expect_keyword(Keyword::Throw)?;

    if parser.newline_before_current() {
        return Err(SyntaxError::IllegalNewlineAfterThrow { span: start });
    }
    let argument = parse_expression(parser, true)?;
    parser.consume_semicolon()?;

    Ok(Node::ThrowStatement {
        argument: Box::new(argument),
        meta: parser.node_meta(start),
    })
}

fn parse_try_statement(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    parser.expect_keyword(Keyword::Try)?;
    let block = parse_block(parser)?;

    let handler = if parser.at_keyword(Keyword::Catch) {
        let handler_start = parser.current_span();
        parser.advance();
        parser.expect_punctuator(Punctuator::LParen)?;
        let param = parse_binding_pattern(parser)?;
        parser.expect_punctuator(Punctuator::RParen)?;
        let body = parse_block(parser)?;
        Some(Box::new(Node::CatchClause {
            param: Box::new(param),
            body: Box::new(body),
            meta: parser.node_meta(handler_start),
        }))
    } else {
        None
    };

    let finalizer = if parser.eat_keyword(Keyword::Finally) {
        Some(Box::new(parse_block(parser)?))
    } else {
        None
    };

    if handler.is_none() && finalizer.is_none() {
        let found = parser
            .current_token()
            .map(|t| t.source_text())
            .unwrap_or_else(|| "<end>".to_string());
        return Err(SyntaxError::expected(
            "catch or finally",
            &found,
            parser.current_span(),
        ));
    }

    Ok(Node::TryStatement {
        block: Box::new(block),
        handler,
        finalizer,
        meta: parser.node_meta(start),
    })
}

fn parse_labeled_statement(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    let label_span = parser.current_span();
    let label = parse_identifier_node(parser)?;
    let name = label.identifier_name().unwrap_or_default().to_string();
    parser.expect_punctuator(Punctuator::Colon)?;

    parser.push_label(&name, label_span)?;
    let body = parse_statement(parser);
    parser.pop_label();
    let body = body?;

    Ok(Node::LabeledStatement {
        label: Box::new(label),
        body: Box::new(body),
        meta: parser.node_meta(start),
    })
}

fn parse_debugger_statement(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    parser.expect_keyword(Keyword::Debugger)?;
    parser.consume_semicolon()?;
    Ok(Node::DebuggerStatement {
        meta: parser.node_meta(start),
    })
}
