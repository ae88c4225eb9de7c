//! Error formatting with source positions
//!
//! Pure formatting over an error and the source text it came from: no
//! control flow decisions happen here. `format` resolves the error to a
//! line/column/index triple; `render` additionally produces the
//! caret-underlined source excerpt.

use crate::pipeline::ParseError;
use crate::utils::{Position, SourceMap, Span};
use serde::{Deserialize, Serialize};

/// A formatted error: message plus 1-based line/column and byte index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    pub line: u32,
    pub column: u32,
    pub index: usize,
}

fn resolve_position(error: &ParseError, map: &SourceMap) -> Position {
    match error {
        ParseError::Lexical(lexical) => {
            map.position_at(lexical.offset().min(map.source.len()))
        }
        ParseError::Syntax(syntax) => syntax
            .span()
            .map(|span| span.start)
            .unwrap_or_else(|| map.position_at(map.source.len())),
    }
}

fn resolve_span(error: &ParseError, map: &SourceMap) -> Span {
    match error {
        ParseError::Lexical(_) => {
            let position = resolve_position(error, map);
            Span::new(position, position)
        }
        ParseError::Syntax(syntax) => syntax.span().unwrap_or_else(|| {
            let position = map.position_at(map.source.len());
            Span::new(position, position)
        }),
    }
}

/// Resolve an error against its source text
pub fn format(error: &ParseError, source: &str) -> Diagnostic {
    let map = SourceMap::new(source.to_string());
    let position = resolve_position(error, &map);
    Diagnostic {
        message: error.to_string(),
        line: position.line,
        column: position.column,
        index: position.offset,
    }
}

/// Render an error with a caret-underlined source excerpt
pub fn render(error: &ParseError, source: &str) -> String {
    let map = SourceMap::new(source.to_string());
    let span = resolve_span(error, &map);
    map.format_error(&span, &error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserOptions;
    use crate::pipeline::{parse, tokenize};

    #[test]
    fn test_format_syntax_error() {
        let source = "var = 1;";
        let error = parse(source, &ParserOptions::default()).unwrap_err();
        let diagnostic = format(&error, source);
        assert!(diagnostic.message.contains("Unexpected token ="));
        assert_eq!(diagnostic.line, 1);
        assert_eq!(diagnostic.column, 5);
        assert_eq!(diagnostic.index, 4);
    }

    #[test]
    fn test_format_lexical_error_on_second_line() {
        let source = "var a = 1;\nvar s = 'open";
        let error = tokenize(source, &ParserOptions::default()).unwrap_err();
        let diagnostic = format(&error, source);
        assert_eq!(diagnostic.line, 2);
        assert_eq!(diagnostic.column, 9);
        assert_eq!(diagnostic.index, 19);
    }

    #[test]
    fn test_render_includes_excerpt() {
        let source = "var = 1;";
        let error = parse(source, &ParserOptions::default()).unwrap_err();
        let rendered = render(&error, source);
        assert!(rendered.contains("var = 1;"));
        assert!(rendered.contains("^"));
        assert!(rendered.contains("--> 1:5"));
    }
}
