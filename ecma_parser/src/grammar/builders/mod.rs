//! Builder functions for the ECMAScript grammar productions

pub mod atomic;
pub mod expressions;
pub mod functions;
pub mod statements;

pub use atomic::{Parser, ParserCheckpoint};
pub use statements::parse_program;
