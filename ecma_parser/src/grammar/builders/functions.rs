//! Function, generator, arrow, and binding-pattern recognizers
//!
//! Function bodies carry their own scope frame: the strict flag may flip
//! when a "use strict" directive prologue is found, generators set the
//! generator flag for yield legality, and parameter names are re-validated
//! once the body's strictness is known (a sloppy header can still declare
//! a strict function).

use crate::config::Feature;
use crate::grammar::ast::nodes::{Node, PropertyKind};
use crate::grammar::builders::atomic::{
    check_strict_binding_name, parse_binding_identifier, Parser,
};
use crate::grammar::builders::{expressions, statements};
use crate::grammar::keywords::Keyword;
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::tokens::token::{Punctuator, Token};
use crate::utils::Span;

/// Parse a function declaration (`function` already current)
pub fn parse_function_declaration(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    parser.expect_keyword(Keyword::Function)?;
    let generator = parse_generator_star(parser)?;

    let id_span = parser.current_span();
    let id = parse_binding_identifier(parser)?;
    let params = parse_params(parser)?;
    let (body, became_strict) = parse_function_body(parser, generator)?;

    if became_strict {
        validate_strict_function(&id, Some(id_span), &params, start)?;
    }

    Ok(Node::FunctionDeclaration {
        id: Box::new(id),
        params,
        body: Box::new(body),
        generator,
        meta: parser.node_meta(start),
    })
}

/// Parse a function expression (`function` current, name optional)
pub fn parse_function_expression(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    parser.expect_keyword(Keyword::Function)?;
    let generator = parse_generator_star(parser)?;

    let id = if matches!(parser.current_token(), Some(Token::Identifier(_)))
        || (parser.at_keyword(Keyword::Yield) && !parser.in_generator() && !parser.strict())
    {
        Some(parse_binding_identifier(parser)?)
    } else {
        None
    };

    let params = parse_params(parser)?;
    let (body, became_strict) = parse_function_body(parser, generator)?;

    if became_strict {
        let placeholder = Node::Identifier {
            name: String::new(),
            meta: Default::default(),
        };
        validate_strict_function(id.as_ref().unwrap_or(&placeholder), None, &params, start)?;
    }

    Ok(Node::FunctionExpression {
        id: id.map(Box::new),
        params,
        body: Box::new(body),
        generator,
        meta: parser.node_meta(start),
    })
}

/// Accessor body in an object literal: parameters were parsed by the
/// caller, the body starts at `{`
pub fn parse_property_function(
    parser: &mut dyn Parser,
    params: Vec<Node>,
    start: Span,
) -> SyntaxResult<Node> {
    let (body, became_strict) = parse_function_body(parser, false)?;
    if became_strict {
        validate_strict_params(&params, start)?;
    }
    Ok(Node::FunctionExpression {
        id: None,
        params,
        body: Box::new(body),
        generator: false,
        meta: parser.node_meta(start),
    })
}

/// Eat a generator `*` marker; outside the generators feature it is an
/// unexpected token
fn parse_generator_star(parser: &mut dyn Parser) -> SyntaxResult<bool> {
    if !parser.at_punctuator(Punctuator::Star) {
        return Ok(false);
    }
    if !parser.features().is_enabled(Feature::Generators) {
        return Err(parser.unexpected());
    }
    parser.advance();
    Ok(true)
}

/// Parse a parenthesized formal parameter list
pub fn parse_params(parser: &mut dyn Parser) -> SyntaxResult<Vec<Node>> {
    parser.expect_punctuator(Punctuator::LParen)?;
    let mut params = Vec::new();

    if !parser.at_punctuator(Punctuator::RParen) {
        loop {
            if parser.at_punctuator(Punctuator::Ellipsis) {
                if !parser.features().is_enabled(Feature::RestParams) {
                    return Err(parser.unexpected());
                }
                let rest_start = parser.current_span();
                parser.advance();
                let argument = parse_binding_identifier(parser)?;
                params.push(Node::RestElement {
                    argument: Box::new(argument),
                    meta: parser.node_meta(rest_start),
                });
                // Rest must be the final parameter
                break;
            }

            let param_start = parser.current_span();
            let mut param = parse_binding_pattern(parser)?;
            if parser.at_punctuator(Punctuator::Assign)
                && parser.features().is_enabled(Feature::DefaultParams)
            {
                parser.advance();
                let right = expressions::parse_assignment_expression(parser, true)?;
                param = Node::AssignmentPattern {
                    left: Box::new(param),
                    right: Box::new(right),
                    meta: parser.node_meta(param_start),
                };
            }
            params.push(param);

            if !parser.eat_punctuator(Punctuator::Comma) {
                break;
            }
        }
    }

    parser.expect_punctuator(Punctuator::RParen)?;
    Ok(params)
}

/// Parse a binding target: identifier, or destructuring pattern when the
/// feature is on
pub fn parse_binding_pattern(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    parser.enter_production()?;
    let result = parse_binding_pattern_inner(parser);
    parser.exit_production();
    result
}

fn parse_binding_pattern_inner(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let destructuring = parser.features().is_enabled(Feature::Destructuring);
    match parser.current_token() {
        Some(Token::Punctuator(Punctuator::LBracket)) if destructuring => {
            parse_array_pattern(parser)
        }
        Some(Token::Punctuator(Punctuator::LBrace)) if destructuring => {
            parse_object_pattern(parser)
        }
        _ => parse_binding_identifier(parser),
    }
}

fn parse_array_pattern(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    parser.expect_punctuator(Punctuator::LBracket)?;
    let mut elements: Vec<Option<Node>> = Vec::new();

    while !parser.at_punctuator(Punctuator::RBracket) {
        if parser.at_punctuator(Punctuator::Comma) {
            parser.advance();
            elements.push(None);
            continue;
        }

        if parser.at_punctuator(Punctuator::Ellipsis) {
            let rest_start = parser.current_span();
            parser.advance();
            let argument = parse_binding_pattern(parser)?;
            elements.push(Some(Node::RestElement {
                argument: Box::new(argument),
                meta: parser.node_meta(rest_start),
            }));
            break;
        }

        let element = parse_pattern_with_default(parser)?;
        elements.push(Some(element));

        if !parser.at_punctuator(Punctuator::RBracket) {
            parser.expect_punctuator(Punctuator::Comma)?;
        }
    }

    parser.expect_punctuator(Punctuator::RBracket)?;
    Ok(Node::ArrayPattern {
        elements,
        meta: parser.node_meta(start),
    })
}

fn parse_object_pattern(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    parser.expect_punctuator(Punctuator::LBrace)?;
    let mut properties = Vec::new();

    while !parser.at_punctuator(Punctuator::RBrace) {
        let property_start = parser.current_span();
        let (key, key_is_identifier) = expressions::parse_property_key(parser)?;

        let (value, shorthand) = if parser.eat_punctuator(Punctuator::Colon) {
            (parse_pattern_with_default(parser)?, false)
        } else if key_is_identifier {
            if parser.strict() {
                if let Some(name) = key.identifier_name() {
                    check_strict_binding_name(name, property_start)?;
                }
            }
            let mut value = key.clone();
            if parser.at_punctuator(Punctuator::Assign)
                && parser.features().is_enabled(Feature::DefaultParams)
            {
                parser.advance();
                let right = expressions::parse_assignment_expression(parser, true)?;
                value = Node::AssignmentPattern {
                    left: Box::new(value),
                    right: Box::new(right),
                    meta: parser.node_meta(property_start),
                };
            }
            (value, true)
        } else {
            let found = parser
                .current_token()
                .map(|t| t.source_text())
                .unwrap_or_else(|| "<end>".to_string());
            return Err(SyntaxError::expected(":", &found, parser.current_span()));
        };

        properties.push(Node::Property {
            key: Box::new(key),
            value: Box::new(value),
            kind: PropertyKind::Init,
            shorthand,
            computed: false,
            meta: parser.node_meta(property_start),
        });

        if !parser.at_punctuator(Punctuator::RBrace) {
            parser.expect_punctuator(Punctuator::Comma)?;
        }
    }

    parser.expect_punctuator(Punctuator::RBrace)?;
    Ok(Node::ObjectPattern {
        properties,
        meta: parser.node_meta(start),
    })
}

fn parse_pattern_with_default(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    let pattern = parse_binding_pattern(parser)?;
    if parser.at_punctuator(Punctuator::Assign)
        && parser.features().is_enabled(Feature::DefaultParams)
    {
        parser.advance();
        let right = expressions::parse_assignment_expression(parser, true)?;
        return Ok(Node::AssignmentPattern {
            left: Box::new(pattern),
            right: Box::new(right),
            meta: parser.node_meta(start),
        });
    }
    Ok(pattern)
}

/// Parse `{ ... }` as a function body inside a fresh scope frame.
/// Returns the block and whether that scope ended strict.
fn parse_function_body(parser: &mut dyn Parser, generator: bool) -> SyntaxResult<(Node, bool)> {
    parser.enter_function_scope(generator)?;
    let result = parse_function_body_inner(parser);
    let became_strict = parser.strict();
    parser.exit_function_scope();
    Ok((result?, became_strict))
}

fn parse_function_body_inner(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    parser.expect_punctuator(Punctuator::LBrace)?;
    let mut body = statements::parse_directive_prologue(parser)?;
    while !parser.at_punctuator(Punctuator::RBrace) && !parser.at_end() {
        body.push(statements::parse_statement(parser)?);
    }
    parser.expect_punctuator(Punctuator::RBrace)?;
    Ok(Node::BlockStatement {
        body,
        meta: parser.node_meta(start),
    })
}

// === ARROW FUNCTIONS ===

/// Attempt the parenthesized arrow parameter cover parse. The caller
/// rewinds on failure.
pub fn try_parse_arrow_params(parser: &mut dyn Parser) -> SyntaxResult<Vec<Node>> {
    let params = parse_params(parser)?;
    // An arrow is only an arrow if `=>` follows on the same line
    if parser.newline_before_current() {
        return Err(SyntaxError::unexpected_token("=>", parser.current_span()));
    }
    parser.expect_punctuator(Punctuator::Arrow)?;
    Ok(params)
}

/// Parse an arrow function body; `=>` has been consumed
pub fn parse_arrow_tail(
    parser: &mut dyn Parser,
    params: Vec<Node>,
    start: Span,
) -> SyntaxResult<Node> {
    parser.enter_function_scope(false)?;
    let result = if parser.at_punctuator(Punctuator::LBrace) {
        parse_function_body_inner(parser).map(|block| (block, false))
    } else {
        expressions::parse_assignment_expression(parser, true).map(|expr| (expr, true))
    };
    let became_strict = parser.strict();
    parser.exit_function_scope();
    let (body, expression) = result?;

    if became_strict {
        validate_strict_params(&params, start)?;
    }

    Ok(Node::ArrowFunctionExpression {
        params,
        body: Box::new(body),
        expression,
        meta: parser.node_meta(start),
    })
}

// === STRICT-MODE PARAMETER VALIDATION ===

fn collect_binding_names(node: &Node, names: &mut Vec<String>) {
    match node {
        Node::Identifier { name, .. } => names.push(name.clone()),
        Node::ArrayPattern { elements, .. } => {
            for element in elements.iter().flatten() {
                collect_binding_names(element, names);
            }
        }
        Node::ObjectPattern { properties, .. } => {
            for property in properties {
                if let Node::Property { value, .. } = property {
                    collect_binding_names(value, names);
                }
            }
        }
        Node::AssignmentPattern { left, .. } => collect_binding_names(left, names),
        Node::RestElement { argument, .. } => collect_binding_names(argument, names),
        _ => {}
    }
}

/// Parameter rules for functions whose body turned out strict: no
/// restricted or reserved names, no duplicates
pub fn validate_strict_params(params: &[Node], span: Span) -> SyntaxResult<()> {
    let mut names = Vec::new();
    for param in params {
        collect_binding_names(param, &mut names);
    }

    for name in &names {
        check_strict_binding_name(name, span)?;
    }
    for (i, name) in names.iter().enumerate() {
        if names[..i].contains(name) {
            return Err(SyntaxError::strict_violation(
                "Strict mode function may not have duplicate parameter names",
                span,
            ));
        }
    }
    Ok(())
}

fn validate_strict_function(
    id: &Node,
    id_span: Option<Span>,
    params: &[Node],
    start: Span,
) -> SyntaxResult<()> {
    if let Some(name) = id.identifier_name() {
        if !name.is_empty() {
            check_strict_binding_name(name, id_span.unwrap_or(start))?;
        }
    }
    validate_strict_params(params, start)
}
