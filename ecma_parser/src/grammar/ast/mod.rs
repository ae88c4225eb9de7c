//! Syntax tree node definitions

pub mod nodes;

pub use nodes::{
    AssignmentOperator, BinaryOperator, DeclarationKind, LiteralValue, LogicalOperator, Node,
    NodeMeta, PropertyKind, TemplateValue, UnaryOperator, UpdateOperator,
};
