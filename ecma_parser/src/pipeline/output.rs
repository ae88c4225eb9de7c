//! Serialization-ready token records produced by the entry points

use crate::config::ParserOptions;
use crate::tokens::token::{RegexInfo, Token, TokenKind};
use crate::tokens::token_stream::{SpannedToken, TokenStream};
use crate::utils::SourceLocation;
use serde::{Deserialize, Serialize};

/// One token as exposed by `tokenize` (and the `parse` side channel).
/// `value` is the raw source slice; `range`/`loc` appear only when the
/// corresponding option is on; `regex` only on regex literals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[usize; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<RegexInfo>,
}

fn record_of(spanned: &SpannedToken, options: &ParserOptions) -> TokenRecord {
    let token = &spanned.value;
    TokenRecord {
        kind: token.kind(),
        value: token.source_text(),
        range: options.range.then(|| spanned.span.as_range()),
        loc: options.loc.then(|| spanned.span.as_location()),
        regex: match token {
            Token::RegularExpression { pattern, flags, .. } => Some(RegexInfo {
                pattern: pattern.clone(),
                flags: flags.clone(),
            }),
            _ => None,
        },
    }
}

/// All significant tokens in source order; comments included only when
/// the `comment` option requests them, whitespace never.
pub fn token_records(stream: &TokenStream, options: &ParserOptions) -> Vec<TokenRecord> {
    stream
        .all_tokens()
        .iter()
        .filter(|spanned| match &spanned.value {
            Token::Whitespace | Token::LineTerminator | Token::Eof => false,
            Token::LineComment(_) | Token::BlockComment(_) => options.comment,
            _ => true,
        })
        .map(|spanned| record_of(spanned, options))
        .collect()
}

/// Comment tokens only, in source order
pub fn comment_records(stream: &TokenStream, options: &ParserOptions) -> Vec<TokenRecord> {
    stream
        .all_tokens()
        .iter()
        .filter(|spanned| spanned.value.is_comment())
        .map(|spanned| record_of(spanned, options))
        .collect()
}
