//! Token model and span-accurate token stream

pub mod token;
pub mod token_stream;

pub use token::{Punctuator, RegexInfo, Token, TokenKind};
pub use token_stream::{SpannedToken, TokenStream};
