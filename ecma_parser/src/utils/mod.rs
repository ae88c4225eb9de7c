//! Shared utilities for source position tracking

pub mod span;

pub use span::{
    is_line_terminator, LineColumn, Position, SourceLocation, SourceMap, Span, Spanned,
};
