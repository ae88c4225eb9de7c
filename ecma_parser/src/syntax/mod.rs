//! Syntax analysis: parser driver and error types

pub mod error;
pub mod parser;

pub use error::{SyntaxError, SyntaxResult};
pub use parser::ScriptParser;

use crate::config::FeatureSet;
use crate::grammar::ast::nodes::Node;
use crate::tokens::TokenStream;

/// Parse a token stream into a Program node
pub fn parse_token_stream(
    tokens: TokenStream,
    features: FeatureSet,
    attach_loc: bool,
    attach_range: bool,
) -> SyntaxResult<Node> {
    ScriptParser::new(tokens, features, attach_loc, attach_range).parse_program()
}
