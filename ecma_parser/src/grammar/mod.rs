//! Grammar: keyword tables, syntax tree nodes, and production builders

pub mod ast;
pub mod builders;
pub mod keywords;

pub use ast::nodes::Node;
pub use keywords::Keyword;
