//! Lexical analysis: scanner and scan-time disambiguation context

pub mod context;
pub mod scanner;

pub use context::{BraceKind, ScanContext};
pub use scanner::{tokenize_source, LexerError, Scanner, ScannerMetrics};
