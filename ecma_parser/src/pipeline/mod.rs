//! Public entry points: `tokenize` and `parse`
//!
//! Both accept the same options surface and run the same scanner;
//! `tokenize` stops there while `parse` feeds the stream into the parser.
//! Identical input and options always yield deep-equal output, across
//! runs and platforms: nothing here reads ambient state.

mod error;
pub mod output;

pub use error::ParseError;
pub use output::TokenRecord;

use crate::config::ParserOptions;
use crate::grammar::ast::nodes::Node;
use crate::lexical;
use crate::syntax;

/// Result of a `parse` call: the tree, plus the token/comment sequences
/// when the corresponding options request them as a side channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub program: Node,
    pub tokens: Option<Vec<TokenRecord>>,
    pub comments: Option<Vec<TokenRecord>>,
}

/// Tokenize source text to completion. The first malformed lexical form
/// aborts with an error; no partial token list is produced.
pub fn tokenize(source: &str, options: &ParserOptions) -> Result<Vec<TokenRecord>, ParseError> {
    let features = options.features();
    let stream = lexical::tokenize_source(source, features)?;
    Ok(output::token_records(&stream, options))
}

/// Parse source text into a Program node. The first lexical or syntax
/// error aborts; no partial tree is produced.
pub fn parse(source: &str, options: &ParserOptions) -> Result<ParseResult, ParseError> {
    let features = options.features();
    let stream = lexical::tokenize_source(source, features)?;

    // The token side channel never carries comments; those have their own
    let token_options = ParserOptions {
        comment: false,
        ..*options
    };
    let tokens = options
        .tokens
        .then(|| output::token_records(&stream, &token_options));
    let comments = options
        .comment
        .then(|| output::comment_records(&stream, options));

    let program = syntax::parse_token_stream(stream, features, options.loc, options.range)?;
    Ok(ParseResult {
        program,
        tokens,
        comments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenKind;
    use serde_json::json;

    fn options_json(json: &str) -> ParserOptions {
        ParserOptions::from_json(json).expect("invalid test options")
    }

    #[test]
    fn test_u_flag_rejected_in_es5_mode() {
        let error = tokenize("var foo = /foo/u;", &ParserOptions::default()).unwrap_err();
        assert!(error.to_string().contains("Invalid regular expression flag"));
    }

    #[test]
    fn test_y_flag_rejected_in_es5_mode() {
        let error = tokenize("var foo = /foo/y;", &ParserOptions::default()).unwrap_err();
        assert!(error.to_string().contains("Invalid regular expression flag"));
    }

    #[test]
    fn test_tokens_with_u_flag_enabled() {
        let options = options_json(r#"{"ecmaFeatures": {"regexUFlag": true}, "loc": true, "range": true}"#);
        let tokens = tokenize("var foo = /foo/u;", &options).unwrap();
        let regex = tokens
            .iter()
            .find(|t| t.kind == TokenKind::RegularExpressionLiteral)
            .expect("regex token missing");
        assert_eq!(regex.value, "/foo/u");
        assert_eq!(regex.regex.as_ref().unwrap().flags, "u");
        assert_eq!(regex.range, Some([10, 16]));
    }

    #[test]
    fn test_tokens_with_y_flag_enabled() {
        let options = options_json(r#"{"ecmaFeatures": {"regexYFlag": true}}"#);
        let tokens = tokenize("var foo = /foo/y;", &options).unwrap();
        let regex = tokens
            .iter()
            .find(|t| t.kind == TokenKind::RegularExpressionLiteral)
            .unwrap();
        assert_eq!(regex.regex.as_ref().unwrap().flags, "y");
    }

    #[test]
    fn test_let_token_sequence_golden() {
        let options = options_json(
            r#"{"ecmaFeatures": {"blockBindings": true}, "loc": true, "range": true}"#,
        );
        let tokens = tokenize("let foo = bar;", &options).unwrap();
        let expected = json!([
            {
                "type": "Keyword",
                "value": "let",
                "range": [0, 3],
                "loc": { "start": { "line": 1, "column": 0 }, "end": { "line": 1, "column": 3 } }
            },
            {
                "type": "Identifier",
                "value": "foo",
                "range": [4, 7],
                "loc": { "start": { "line": 1, "column": 4 }, "end": { "line": 1, "column": 7 } }
            },
            {
                "type": "Punctuator",
                "value": "=",
                "range": [8, 9],
                "loc": { "start": { "line": 1, "column": 8 }, "end": { "line": 1, "column": 9 } }
            },
            {
                "type": "Identifier",
                "value": "bar",
                "range": [10, 13],
                "loc": { "start": { "line": 1, "column": 10 }, "end": { "line": 1, "column": 13 } }
            },
            {
                "type": "Punctuator",
                "value": ";",
                "range": [13, 14],
                "loc": { "start": { "line": 1, "column": 13 }, "end": { "line": 1, "column": 14 } }
            }
        ]);
        assert_eq!(serde_json::to_value(&tokens).unwrap(), expected);
    }

    #[test]
    fn test_let_is_identifier_token_without_flag() {
        let tokens = tokenize("let foo = bar;", &ParserOptions::default()).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].value, "let");
    }

    #[test]
    fn test_const_token_sequence() {
        let options = options_json(r#"{"ecmaFeatures": {"blockBindings": true}}"#);
        let tokens = tokenize("const foo = bar;", &options).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[0].value, "const");
    }

    #[test]
    fn test_regex_in_parens_is_single_token() {
        let tokens = tokenize("(/foo/).test(bar);", &ParserOptions::default()).unwrap();
        let regexes: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::RegularExpressionLiteral)
            .collect();
        assert_eq!(regexes.len(), 1);
        assert_eq!(regexes[0].value, "/foo/");
        assert!(!tokens.iter().any(|t| t.value == "/" ));
    }

    #[test]
    fn test_comments_excluded_by_default_included_on_request() {
        let source = "a; // note\nb;";
        let without = tokenize(source, &ParserOptions::default()).unwrap();
        assert!(!without.iter().any(|t| t.kind == TokenKind::LineComment));

        let options = options_json(r#"{"comment": true}"#);
        let with = tokenize(source, &options).unwrap();
        let comment = with
            .iter()
            .find(|t| t.kind == TokenKind::LineComment)
            .expect("comment token missing");
        assert_eq!(comment.value, " note");
    }

    #[test]
    fn test_no_metadata_unless_requested() {
        let tokens = tokenize("var a = 1;", &ParserOptions::default()).unwrap();
        assert!(tokens.iter().all(|t| t.range.is_none() && t.loc.is_none()));

        let json = serde_json::to_value(&tokens).unwrap();
        for token in json.as_array().unwrap() {
            assert!(token.get("range").is_none());
            assert!(token.get("loc").is_none());
        }
    }

    #[test]
    fn test_parse_token_side_channel_matches_tokenize() {
        let options = options_json(r#"{"tokens": true, "range": true}"#);
        let result = parse("var a = b + c;", &options).unwrap();
        let tokens = result.tokens.expect("token side channel missing");
        let direct = tokenize("var a = b + c;", &options).unwrap();
        assert_eq!(tokens, direct);
    }

    #[test]
    fn test_parse_collects_comments_on_request() {
        let options = options_json(r#"{"comment": true, "tokens": true}"#);
        let result = parse("/* head */ var a = 1; // tail", &options).unwrap();
        let comments = result.comments.expect("comments missing");
        assert_eq!(comments.len(), 2);
        // The token side channel stays comment-free
        let tokens = result.tokens.unwrap();
        assert!(!tokens
            .iter()
            .any(|t| matches!(t.kind, TokenKind::LineComment | TokenKind::BlockComment)));
    }

    #[test]
    fn test_parse_without_side_channels() {
        let result = parse("var a = 1;", &ParserOptions::default()).unwrap();
        assert!(result.tokens.is_none());
        assert!(result.comments.is_none());
    }

    #[test]
    fn test_deterministic_deep_equal_output() {
        let options = options_json(r#"{"loc": true, "range": true, "tokens": true}"#);
        let source = "for (var i = 0; i < n; i++) { f(i); }";
        let first = parse(source, &options).unwrap();
        let second = parse(source, &options).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_value(&first.program).unwrap(),
            serde_json::to_value(&second.program).unwrap()
        );
    }

    fn range_of(value: &serde_json::Value) -> Option<(usize, usize)> {
        let range = value.get("range")?.as_array()?;
        Some((range[0].as_u64()? as usize, range[1].as_u64()? as usize))
    }

    fn check_containment(value: &serde_json::Value, parent: Option<(usize, usize)>) {
        match value {
            serde_json::Value::Object(object) => {
                let own = range_of(value);
                if let (Some((parent_start, parent_end)), Some((start, end))) = (parent, own) {
                    assert!(
                        parent_start <= start && end <= parent_end,
                        "child range [{}, {}] escapes parent [{}, {}]",
                        start,
                        end,
                        parent_start,
                        parent_end
                    );
                }
                let next = own.or(parent);
                for (key, child) in object {
                    if key != "range" && key != "loc" {
                        check_containment(child, next);
                    }
                }
            }
            serde_json::Value::Array(items) => {
                for item in items {
                    check_containment(item, parent);
                }
            }
            _ => {}
        }
    }

    #[test]
    fn test_node_ranges_contain_children() {
        let options = options_json(r#"{"range": true, "loc": true}"#);
        let source = "function f(a) { if (a) { return a * 2; } return 0; }\nvar x = f(21);";
        let result = parse(source, &options).unwrap();
        let json = serde_json::to_value(&result.program).unwrap();

        let program_range = range_of(&json).unwrap();
        assert_eq!(program_range, (0, source.len()));
        check_containment(&json, None);
    }

    #[test]
    fn test_token_ranges_are_monotonic_and_bounded() {
        let options = options_json(r#"{"range": true, "loc": true}"#);
        let source = "var a = 1;\nvar b = a / 2; // done";
        let tokens = tokenize(source, &options).unwrap();
        let mut previous_end = 0;
        let mut previous_line = 1;
        for token in &tokens {
            let [start, end] = token.range.unwrap();
            assert!(start <= end && end <= source.len());
            assert!(start >= previous_end);
            previous_end = end;

            let loc = token.loc.unwrap();
            assert!(loc.start.line >= previous_line);
            previous_line = loc.start.line;
        }
    }

    #[test]
    fn test_es6_edition_enables_features_at_entry_points() {
        let options = options_json(r#"{"ecmaVersion": 6}"#);
        assert!(parse("let x = 1; const y = [a, b] = c;", &options).is_ok());
        assert!(tokenize("var r = /x/uy;", &options).is_ok());
    }
}
