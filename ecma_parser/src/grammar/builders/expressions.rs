//! Expression recognizers
//!
//! Classic recursive-descent over the expression precedence ladder:
//! sequence, assignment, conditional, binary/logical via precedence
//! climbing, unary, postfix, left-hand-side chains, and primaries. The
//! `in` operator is threaded through an `allow_in` flag so for-statement
//! heads parse their init without capturing the `in` of a for-in.

use crate::config::Feature;
use crate::grammar::ast::nodes::*;
use crate::grammar::builders::atomic::{
    parse_identifier_name, parse_identifier_node, token_starts_expression, Parser,
};
use crate::grammar::builders::functions;
use crate::grammar::keywords::{is_restricted_word, Keyword};
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::tokens::token::{Punctuator, RegexInfo, Token};

/// Parse a full expression (sequence of assignment expressions)
pub fn parse_expression(parser: &mut dyn Parser, allow_in: bool) -> SyntaxResult<Node> {
    let start = parser.current_span();
    let first = parse_assignment_expression(parser, allow_in)?;
    if !parser.at_punctuator(Punctuator::Comma) {
        return Ok(first);
    }

    let mut expressions = vec![first];
    while parser.eat_punctuator(Punctuator::Comma) {
        expressions.push(parse_assignment_expression(parser, allow_in)?);
    }
    Ok(Node::SequenceExpression {
        expressions,
        meta: parser.node_meta(start),
    })
}

/// Parse an assignment expression, including yield expressions and arrow
/// functions when their features are enabled
pub fn parse_assignment_expression(
    parser: &mut dyn Parser,
    allow_in: bool,
) -> SyntaxResult<Node> {
    parser.enter_production()?;
    let result = parse_assignment_inner(parser, allow_in);
    parser.exit_production();
    result
}

fn parse_assignment_inner(parser: &mut dyn Parser, allow_in: bool) -> SyntaxResult<Node> {
    if parser.features().is_enabled(Feature::Generators)
        && parser.in_generator()
        && parser.at_keyword(Keyword::Yield)
    {
        return parse_yield_expression(parser, allow_in);
    }

    if parser.features().is_enabled(Feature::ArrowFunctions) {
        // Single-parameter form: Identifier => Body, with the
        // [no LineTerminator here] restriction before the arrow
        if matches!(parser.current_token(), Some(Token::Identifier(_)))
            && matches!(parser.peek_token(1), Some(t) if t.is_punctuator(Punctuator::Arrow))
            && !parser.newline_before_token(1)
        {
            let start = parser.current_span();
            let param = parse_identifier_node(parser)?;
            parser.expect_punctuator(Punctuator::Arrow)?;
            return functions::parse_arrow_tail(parser, vec![param], start);
        }

        // Parenthesized parameter list: backtrack to an ordinary
        // parenthesized expression when the cover parse fails
        if parser.at_punctuator(Punctuator::LParen) {
            let start = parser.current_span();
            let checkpoint = parser.save_checkpoint();
            match functions::try_parse_arrow_params(parser) {
                Ok(params) => return functions::parse_arrow_tail(parser, params, start),
                Err(_) => parser.restore_checkpoint(checkpoint),
            }
        }
    }

    let start = parser.current_span();
    let expr = parse_conditional_expression(parser, allow_in)?;

    let Some(punctuator) = parser.current_token().and_then(|t| t.as_punctuator()) else {
        return Ok(expr);
    };
    if !punctuator.is_assignment() {
        return Ok(expr);
    }

    let operator = assignment_operator_of(punctuator);
    let left = if operator == AssignmentOperator::Assign {
        reinterpret_as_pattern(parser, expr)?
    } else {
        check_simple_assignment_target(parser, expr)?
    };
    parser.advance();
    let right = parse_assignment_expression(parser, allow_in)?;
    Ok(Node::AssignmentExpression {
        operator,
        left: Box::new(left),
        right: Box::new(right),
        meta: parser.node_meta(start),
    })
}

fn assignment_operator_of(punctuator: Punctuator) -> AssignmentOperator {
    match punctuator {
        Punctuator::Assign => AssignmentOperator::Assign,
        Punctuator::PlusAssign => AssignmentOperator::AddAssign,
        Punctuator::MinusAssign => AssignmentOperator::SubtractAssign,
        Punctuator::StarAssign => AssignmentOperator::MultiplyAssign,
        Punctuator::SlashAssign => AssignmentOperator::DivideAssign,
        Punctuator::PercentAssign => AssignmentOperator::ModuloAssign,
        Punctuator::LShiftAssign => AssignmentOperator::LeftShiftAssign,
        Punctuator::RShiftAssign => AssignmentOperator::RightShiftAssign,
        Punctuator::URShiftAssign => AssignmentOperator::UnsignedRightShiftAssign,
        Punctuator::AmpAssign => AssignmentOperator::BitAndAssign,
        Punctuator::PipeAssign => AssignmentOperator::BitOrAssign,
        Punctuator::CaretAssign => AssignmentOperator::BitXorAssign,
        // is_assignment() gates every call site
        _ => AssignmentOperator::Assign,
    }
}

fn parse_yield_expression(parser: &mut dyn Parser, allow_in: bool) -> SyntaxResult<Node> {
    let start = parser.current_span();
    parser.expect_keyword(Keyword::Yield)?;

    let mut delegate = false;
    let mut argument = None;
    // yield has a [no LineTerminator here] restriction on its argument
    if !parser.newline_before_current() {
        delegate = parser.eat_punctuator(Punctuator::Star);
        let has_argument = delegate
            || matches!(parser.current_token(), Some(t) if token_starts_expression(t));
        if has_argument {
            argument = Some(Box::new(parse_assignment_expression(parser, allow_in)?));
        }
    }

    Ok(Node::YieldExpression {
        argument,
        delegate,
        meta: parser.node_meta(start),
    })
}

fn parse_conditional_expression(parser: &mut dyn Parser, allow_in: bool) -> SyntaxResult<Node> {
    let start = parser.current_span();
    let expr = parse_binary_expression(parser, 0, allow_in)?;
    if !parser.eat_punctuator(Punctuator::Question) {
        return Ok(expr);
    }

    let consequent = parse_assignment_expression(parser, true)?;
    parser.expect_punctuator(Punctuator::Colon)?;
    let alternate = parse_assignment_expression(parser, allow_in)?;
    Ok(Node::ConditionalExpression {
        test: Box::new(expr),
        consequent: Box::new(consequent),
        alternate: Box::new(alternate),
        meta: parser.node_meta(start),
    })
}

enum BinOp {
    Logical(LogicalOperator),
    Binary(BinaryOperator),
}

/// Operator precedence table. `in` only binds when allowed by the
/// surrounding production.
fn binary_operator_of(token: &Token, allow_in: bool) -> Option<(u8, BinOp)> {
    let (precedence, op) = match token {
        Token::Keyword(Keyword::In) if allow_in => (7, BinOp::Binary(BinaryOperator::In)),
        Token::Keyword(Keyword::Instanceof) => (7, BinOp::Binary(BinaryOperator::Instanceof)),
        Token::Punctuator(punctuator) => match punctuator {
            Punctuator::PipePipe => (1, BinOp::Logical(LogicalOperator::Or)),
            Punctuator::AmpAmp => (2, BinOp::Logical(LogicalOperator::And)),
            Punctuator::Pipe => (3, BinOp::Binary(BinaryOperator::BitOr)),
            Punctuator::Caret => (4, BinOp::Binary(BinaryOperator::BitXor)),
            Punctuator::Amp => (5, BinOp::Binary(BinaryOperator::BitAnd)),
            Punctuator::EqEq => (6, BinOp::Binary(BinaryOperator::Equals)),
            Punctuator::NotEq => (6, BinOp::Binary(BinaryOperator::NotEquals)),
            Punctuator::EqEqEq => (6, BinOp::Binary(BinaryOperator::StrictEquals)),
            Punctuator::NotEqEq => (6, BinOp::Binary(BinaryOperator::StrictNotEquals)),
            Punctuator::Lt => (7, BinOp::Binary(BinaryOperator::LessThan)),
            Punctuator::Gt => (7, BinOp::Binary(BinaryOperator::GreaterThan)),
            Punctuator::LtEq => (7, BinOp::Binary(BinaryOperator::LessThanOrEqual)),
            Punctuator::GtEq => (7, BinOp::Binary(BinaryOperator::GreaterThanOrEqual)),
            Punctuator::LShift => (8, BinOp::Binary(BinaryOperator::LeftShift)),
            Punctuator::RShift => (8, BinOp::Binary(BinaryOperator::RightShift)),
            Punctuator::URShift => (8, BinOp::Binary(BinaryOperator::UnsignedRightShift)),
            Punctuator::Plus => (9, BinOp::Binary(BinaryOperator::Add)),
            Punctuator::Minus => (9, BinOp::Binary(BinaryOperator::Subtract)),
            Punctuator::Star => (10, BinOp::Binary(BinaryOperator::Multiply)),
            Punctuator::Slash => (10, BinOp::Binary(BinaryOperator::Divide)),
            Punctuator::Percent => (10, BinOp::Binary(BinaryOperator::Modulo)),
            _ => return None,
        },
        _ => return None,
    };
    Some((precedence, op))
}

fn parse_binary_expression(
    parser: &mut dyn Parser,
    parent_precedence: u8,
    allow_in: bool,
) -> SyntaxResult<Node> {
    let start = parser.current_span();
    let mut left = parse_unary_expression(parser)?;

    loop {
        let Some((precedence, op)) = parser
            .current_token()
            .and_then(|t| binary_operator_of(t, allow_in))
        else {
            break;
        };
        if precedence <= parent_precedence {
            break;
        }
        parser.advance();
        let right = parse_binary_expression(parser, precedence, allow_in)?;
        left = match op {
            BinOp::Logical(operator) => Node::LogicalExpression {
                operator,
                left: Box::new(left),
                right: Box::new(right),
                meta: parser.node_meta(start),
            },
            BinOp::Binary(operator) => Node::BinaryExpression {
                operator,
                left: Box::new(left),
                right: Box::new(right),
                meta: parser.node_meta(start),
            },
        };
    }
    Ok(left)
}

fn parse_unary_expression(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    parser.enter_production()?;
    let result = parse_unary_inner(parser);
    parser.exit_production();
    result
}

fn parse_unary_inner(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();

    if let Some(operator) = update_operator_of(parser.current_token()) {
        parser.advance();
        let argument = parse_unary_expression(parser)?;
        check_update_target(parser, &argument)?;
        return Ok(Node::UpdateExpression {
            operator,
            argument: Box::new(argument),
            prefix: true,
            meta: parser.node_meta(start),
        });
    }

    if let Some(operator) = unary_operator_of(parser.current_token()) {
        parser.advance();
        let argument = parse_unary_expression(parser)?;
        if operator == UnaryOperator::Delete
            && parser.strict()
            && argument.is_identifier()
        {
            return Err(SyntaxError::strict_violation(
                "Delete of an unqualified identifier in strict mode",
                parser.last_span(),
            ));
        }
        return Ok(Node::UnaryExpression {
            operator,
            argument: Box::new(argument),
            prefix: true,
            meta: parser.node_meta(start),
        });
    }

    parse_postfix_expression(parser)
}

fn update_operator_of(token: Option<&Token>) -> Option<UpdateOperator> {
    match token {
        Some(Token::Punctuator(Punctuator::PlusPlus)) => Some(UpdateOperator::Increment),
        Some(Token::Punctuator(Punctuator::MinusMinus)) => Some(UpdateOperator::Decrement),
        _ => None,
    }
}

fn unary_operator_of(token: Option<&Token>) -> Option<UnaryOperator> {
    match token {
        Some(Token::Punctuator(Punctuator::Plus)) => Some(UnaryOperator::Plus),
        Some(Token::Punctuator(Punctuator::Minus)) => Some(UnaryOperator::Minus),
        Some(Token::Punctuator(Punctuator::Bang)) => Some(UnaryOperator::Not),
        Some(Token::Punctuator(Punctuator::Tilde)) => Some(UnaryOperator::BitNot),
        Some(Token::Keyword(Keyword::Typeof)) => Some(UnaryOperator::Typeof),
        Some(Token::Keyword(Keyword::Void)) => Some(UnaryOperator::Void),
        Some(Token::Keyword(Keyword::Delete)) => Some(UnaryOperator::Delete),
        _ => None,
    }
}

fn parse_postfix_expression(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    let expr = parse_lhs_expression(parser, true)?;

    // Postfix ++/-- is a restricted production: a line terminator before
    // the operator ends the expression instead
    if !parser.newline_before_current() {
        if let Some(operator) = update_operator_of(parser.current_token()) {
            check_update_target(parser, &expr)?;
            parser.advance();
            return Ok(Node::UpdateExpression {
                operator,
                argument: Box::new(expr),
                prefix: false,
                meta: parser.node_meta(start),
            });
        }
    }
    Ok(expr)
}

fn check_update_target(parser: &dyn Parser, node: &Node) -> SyntaxResult<()> {
    match node {
        Node::Identifier { name, .. } => {
            if parser.strict() && is_restricted_word(name) {
                return Err(SyntaxError::strict_violation(
                    &format!("Assignment to '{}' in strict mode", name),
                    parser.last_span(),
                ));
            }
            Ok(())
        }
        Node::MemberExpression { .. } => Ok(()),
        _ => Err(SyntaxError::InvalidAssignmentTarget {
            span: parser.last_span(),
        }),
    }
}

/// Parse a left-hand-side expression: primary/new plus member, call, and
/// tagged-template tails
pub fn parse_lhs_expression(parser: &mut dyn Parser, allow_call: bool) -> SyntaxResult<Node> {
    let start = parser.current_span();
    let mut expr = if parser.at_keyword(Keyword::New) {
        parse_new_expression(parser)?
    } else {
        parse_primary_expression(parser)?
    };

    loop {
        if parser.at_punctuator(Punctuator::Dot) {
            parser.advance();
            let property = parse_identifier_name(parser)?;
            expr = Node::MemberExpression {
                object: Box::new(expr),
                property: Box::new(property),
                computed: false,
                meta: parser.node_meta(start),
            };
        } else if parser.at_punctuator(Punctuator::LBracket) {
            parser.advance();
            let property = parse_expression(parser, true)?;
            parser.expect_punctuator(Punctuator::RBracket)?;
            expr = Node::MemberExpression {
                object: Box::new(expr),
                property: Box::new(property),
                computed: true,
                meta: parser.node_meta(start),
            };
        } else if allow_call && parser.at_punctuator(Punctuator::LParen) {
            let arguments = parse_arguments(parser)?;
            expr = Node::CallExpression {
                callee: Box::new(expr),
                arguments,
                meta: parser.node_meta(start),
            };
        } else if parser.features().is_enabled(Feature::TemplateStrings)
            && matches!(parser.current_token(), Some(Token::Template { head: true, .. }))
        {
            let quasi = parse_template_literal(parser)?;
            expr = Node::TaggedTemplateExpression {
                tag: Box::new(expr),
                quasi: Box::new(quasi),
                meta: parser.node_meta(start),
            };
        } else {
            break;
        }
    }
    Ok(expr)
}

fn parse_new_expression(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    parser.enter_production()?;
    let result = parse_new_inner(parser);
    parser.exit_production();
    result
}

fn parse_new_inner(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    parser.expect_keyword(Keyword::New)?;
    let callee = parse_lhs_expression(parser, false)?;
    let arguments = if parser.at_punctuator(Punctuator::LParen) {
        parse_arguments(parser)?
    } else {
        Vec::new()
    };
    Ok(Node::NewExpression {
        callee: Box::new(callee),
        arguments,
        meta: parser.node_meta(start),
    })
}

fn parse_arguments(parser: &mut dyn Parser) -> SyntaxResult<Vec<Node>> {
    parser.expect_punctuator(Punctuator::LParen)?;
    let mut arguments = Vec::new();

    if !parser.at_punctuator(Punctuator::RParen) {
        loop {
            if parser.features().is_enabled(Feature::Spread)
                && parser.at_punctuator(Punctuator::Ellipsis)
            {
                let start = parser.current_span();
                parser.advance();
                let argument = parse_assignment_expression(parser, true)?;
                arguments.push(Node::SpreadElement {
                    argument: Box::new(argument),
                    meta: parser.node_meta(start),
                });
            } else {
                arguments.push(parse_assignment_expression(parser, true)?);
            }
            if !parser.eat_punctuator(Punctuator::Comma) {
                break;
            }
        }
    }

    parser.expect_punctuator(Punctuator::RParen)?;
    Ok(arguments)
}

fn parse_primary_expression(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    let Some(token) = parser.current_token() else {
        return Err(parser.unexpected());
    };

    match token.clone() {
        Token::Identifier(_) | Token::Keyword(Keyword::Yield) => parse_identifier_node(parser),

        Token::NumericLiteral { raw, value, octal } => {
            if octal && parser.strict() {
                return Err(SyntaxError::strict_violation(
                    "Octal literals are not allowed in strict mode",
                    start,
                ));
            }
            parser.advance();
            Ok(Node::Literal {
                value: LiteralValue::Number(value),
                raw,
                regex: None,
                meta: parser.node_meta(start),
            })
        }

        Token::StringLiteral { raw, cooked, octal } => {
            if octal && parser.strict() {
                return Err(SyntaxError::strict_violation(
                    "Octal escape sequences are not allowed in strict mode",
                    start,
                ));
            }
            parser.advance();
            Ok(Node::Literal {
                value: LiteralValue::String(cooked),
                raw,
                regex: None,
                meta: parser.node_meta(start),
            })
        }

        Token::BooleanLiteral(value) => {
            parser.advance();
            Ok(Node::Literal {
                value: LiteralValue::Boolean(value),
                raw: if value { "true" } else { "false" }.to_string(),
                regex: None,
                meta: parser.node_meta(start),
            })
        }

        Token::NullLiteral => {
            parser.advance();
            Ok(Node::Literal {
                value: LiteralValue::Null,
                raw: "null".to_string(),
                regex: None,
                meta: parser.node_meta(start),
            })
        }

        Token::RegularExpression {
            raw,
            pattern,
            flags,
        } => {
            parser.advance();
            Ok(Node::Literal {
                value: LiteralValue::Null,
                raw,
                regex: Some(RegexInfo { pattern, flags }),
                meta: parser.node_meta(start),
            })
        }

        Token::Template { head: true, .. } => parse_template_literal(parser),

        Token::Keyword(Keyword::This) => {
            parser.advance();
            Ok(Node::ThisExpression {
                meta: parser.node_meta(start),
            })
        }

        Token::Keyword(Keyword::Function) => functions::parse_function_expression(parser),

        Token::Punctuator(Punctuator::LParen) => {
            parser.advance();
            let expr = parse_expression(parser, true)?;
            parser.expect_punctuator(Punctuator::RParen)?;
            Ok(expr)
        }

        Token::Punctuator(Punctuator::LBracket) => parse_array_initializer(parser),
        Token::Punctuator(Punctuator::LBrace) => parse_object_initializer(parser),

        _ => Err(parser.unexpected()),
    }
}

fn parse_array_initializer(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    parser.expect_punctuator(Punctuator::LBracket)?;
    let mut elements: Vec<Option<Node>> = Vec::new();

    while !parser.at_punctuator(Punctuator::RBracket) {
        if parser.at_punctuator(Punctuator::Comma) {
            // Elision
            parser.advance();
            elements.push(None);
            continue;
        }

        let element = if parser.features().is_enabled(Feature::Spread)
            && parser.at_punctuator(Punctuator::Ellipsis)
        {
            let spread_start = parser.current_span();
            parser.advance();
            let argument = parse_assignment_expression(parser, true)?;
            Node::SpreadElement {
                argument: Box::new(argument),
                meta: parser.node_meta(spread_start),
            }
        } else {
            parse_assignment_expression(parser, true)?
        };
        elements.push(Some(element));

        if !parser.at_punctuator(Punctuator::RBracket) {
            parser.expect_punctuator(Punctuator::Comma)?;
        }
    }

    parser.expect_punctuator(Punctuator::RBracket)?;
    Ok(Node::ArrayExpression {
        elements,
        meta: parser.node_meta(start),
    })
}

fn parse_object_initializer(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    parser.expect_punctuator(Punctuator::LBrace)?;
    let mut properties = Vec::new();

    while !parser.at_punctuator(Punctuator::RBrace) {
        properties.push(parse_object_property(parser)?);
        if !parser.at_punctuator(Punctuator::RBrace) {
            parser.expect_punctuator(Punctuator::Comma)?;
        }
    }

    parser.expect_punctuator(Punctuator::RBrace)?;
    Ok(Node::ObjectExpression {
        properties,
        meta: parser.node_meta(start),
    })
}

fn is_property_key_token(token: &Token) -> bool {
    matches!(
        token,
        Token::Identifier(_)
            | Token::Keyword(_)
            | Token::BooleanLiteral(_)
            | Token::NullLiteral
            | Token::StringLiteral { .. }
            | Token::NumericLiteral { .. }
    )
}

fn parse_object_property(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();

    // get/set accessors: a `get`/`set` name directly followed by a
    // property key
    if let Some(Token::Identifier(name)) = parser.current_token() {
        if (name == "get" || name == "set")
            && matches!(parser.peek_token(1), Some(t) if is_property_key_token(t))
        {
            let kind = if name == "get" {
                PropertyKind::Get
            } else {
                PropertyKind::Set
            };
            parser.advance();
            let (key, _) = parse_property_key(parser)?;

            parser.expect_punctuator(Punctuator::LParen)?;
            let params = if kind == PropertyKind::Set {
                vec![functions::parse_binding_pattern(parser)?]
            } else {
                Vec::new()
            };
            parser.expect_punctuator(Punctuator::RParen)?;

            let value = functions::parse_property_function(parser, params, start)?;
            return Ok(Node::Property {
                key: Box::new(key),
                value: Box::new(value),
                kind,
                shorthand: false,
                computed: false,
                meta: parser.node_meta(start),
            });
        }
    }

    let (key, key_is_identifier) = parse_property_key(parser)?;

    if parser.eat_punctuator(Punctuator::Colon) {
        let value = parse_assignment_expression(parser, true)?;
        return Ok(Node::Property {
            key: Box::new(key),
            value: Box::new(value),
            kind: PropertyKind::Init,
            shorthand: false,
            computed: false,
            meta: parser.node_meta(start),
        });
    }

    // Shorthand properties only participate via destructuring patterns
    if key_is_identifier && parser.features().is_enabled(Feature::Destructuring) {
        let value = key.clone();
        return Ok(Node::Property {
            key: Box::new(key),
            value: Box::new(value),
            kind: PropertyKind::Init,
            shorthand: true,
            computed: false,
            meta: parser.node_meta(start),
        });
    }

    let found = parser
        .current_token()
        .map(|t| t.source_text())
        .unwrap_or_else(|| "<end>".to_string());
    Err(SyntaxError::expected(":", &found, parser.current_span()))
}

/// Parse a property key; the bool is true when the key is a plain
/// identifier usable in shorthand position.
pub fn parse_property_key(parser: &mut dyn Parser) -> SyntaxResult<(Node, bool)> {
    let start = parser.current_span();
    match parser.current_token().cloned() {
        Some(Token::Identifier(_)) => Ok((parse_identifier_name(parser)?, true)),
        Some(Token::Keyword(_)) | Some(Token::BooleanLiteral(_)) | Some(Token::NullLiteral) => {
            Ok((parse_identifier_name(parser)?, false))
        }
        Some(Token::StringLiteral { raw, cooked, octal }) => {
            if octal && parser.strict() {
                return Err(SyntaxError::strict_violation(
                    "Octal escape sequences are not allowed in strict mode",
                    start,
                ));
            }
            parser.advance();
            Ok((
                Node::Literal {
                    value: LiteralValue::String(cooked),
                    raw,
                    regex: None,
                    meta: parser.node_meta(start),
                },
                false,
            ))
        }
        Some(Token::NumericLiteral { raw, value, octal }) => {
            if octal && parser.strict() {
                return Err(SyntaxError::strict_violation(
                    "Octal literals are not allowed in strict mode",
                    start,
                ));
            }
            parser.advance();
            Ok((
                Node::Literal {
                    value: LiteralValue::Number(value),
                    raw,
                    regex: None,
                    meta: parser.node_meta(start),
                },
                false,
            ))
        }
        _ => Err(parser.unexpected()),
    }
}

/// Parse a template literal from its head piece through the tail
pub fn parse_template_literal(parser: &mut dyn Parser) -> SyntaxResult<Node> {
    let start = parser.current_span();
    let mut quasis = Vec::new();
    let mut expressions = Vec::new();

    loop {
        let Some(Token::Template {
            raw,
            cooked,
            head,
            tail,
        }) = parser.current_token().cloned()
        else {
            return Err(parser.unexpected());
        };

        let element_span = parser.current_span();
        parser.advance();
        quasis.push(Node::TemplateElement {
            value: TemplateValue {
                cooked,
                raw: template_inner_raw(&raw, head, tail),
            },
            tail,
            meta: parser.node_meta(element_span),
        });

        if tail {
            break;
        }
        expressions.push(parse_expression(parser, true)?);
    }

    Ok(Node::TemplateLiteral {
        quasis,
        expressions,
        meta: parser.node_meta(start),
    })
}

/// Strip the piece delimiters (`` ` ``, `}`, `${`) from a raw template
/// token slice
fn template_inner_raw(raw: &str, _head: bool, tail: bool) -> String {
    let without_open = &raw[1..];
    let trimmed = if tail {
        &without_open[..without_open.len() - 1]
    } else {
        &without_open[..without_open.len() - 2]
    };
    trimmed.to_string()
}

// === ASSIGNMENT TARGETS AND PATTERN REINTERPRETATION ===

/// Validate a simple (non-destructuring) assignment target
pub fn check_simple_assignment_target(
    parser: &dyn Parser,
    node: Node,
) -> SyntaxResult<Node> {
    match &node {
        Node::Identifier { name, .. } => {
            if parser.strict() && is_restricted_word(name) {
                return Err(SyntaxError::strict_violation(
                    &format!("Assignment to '{}' in strict mode", name),
                    parser.last_span(),
                ));
            }
            Ok(node)
        }
        Node::MemberExpression { .. } => Ok(node),
        _ => Err(SyntaxError::InvalidAssignmentTarget {
            span: parser.last_span(),
        }),
    }
}

/// Reinterpret an already-parsed expression as an assignment target,
/// converting array/object literals into destructuring patterns when the
/// feature allows it.
pub fn reinterpret_as_pattern(parser: &dyn Parser, node: Node) -> SyntaxResult<Node> {
    let destructuring = parser.features().is_enabled(Feature::Destructuring);
    match node {
        Node::Identifier { .. } | Node::MemberExpression { .. } => {
            check_simple_assignment_target(parser, node)
        }

        Node::ArrayPattern { .. }
        | Node::ObjectPattern { .. }
        | Node::AssignmentPattern { .. }
        | Node::RestElement { .. } => Ok(node),

        Node::ArrayExpression { elements, meta } if destructuring => {
            let elements = elements
                .into_iter()
                .map(|element| {
                    element
                        .map(|node| match node {
                            Node::SpreadElement { argument, meta } => {
                                Ok(Node::RestElement {
                                    argument: Box::new(reinterpret_as_pattern(
                                        parser, *argument,
                                    )?),
                                    meta,
                                })
                            }
                            other => reinterpret_as_pattern(parser, other),
                        })
                        .transpose()
                })
                .collect::<SyntaxResult<Vec<_>>>()?;
            Ok(Node::ArrayPattern { elements, meta })
        }

        Node::ObjectExpression { properties, meta } if destructuring => {
            let properties = properties
                .into_iter()
                .map(|property| match property {
                    Node::Property {
                        key,
                        value,
                        kind: PropertyKind::Init,
                        shorthand,
                        computed,
                        meta,
                    } => Ok(Node::Property {
                        key,
                        value: Box::new(reinterpret_as_pattern(parser, *value)?),
                        kind: PropertyKind::Init,
                        shorthand,
                        computed,
                        meta,
                    }),
                    _ => Err(SyntaxError::InvalidAssignmentTarget {
                        span: parser.last_span(),
                    }),
                })
                .collect::<SyntaxResult<Vec<_>>>()?;
            Ok(Node::ObjectPattern { properties, meta })
        }

        Node::AssignmentExpression {
            operator: AssignmentOperator::Assign,
            left,
            right,
            meta,
        } if destructuring => Ok(Node::AssignmentPattern {
            left,
            right,
            meta,
        }),

        _ => Err(SyntaxError::InvalidAssignmentTarget {
            span: parser.last_span(),
        }),
    }
}

/// Validate the left side of a for-in/for-of head
pub fn reinterpret_for_target(parser: &dyn Parser, node: Node) -> SyntaxResult<Node> {
    reinterpret_as_pattern(parser, node)
}
