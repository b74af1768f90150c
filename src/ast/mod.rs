//! Abstract Syntax Tree (AST) definitions for binding templates
//!
//! The tree is a closed set of node kinds (literal, property path, pipe call,
//! conditional, interpolation) matched exhaustively by the evaluator.

#![warn(missing_docs)]

mod dependencies;
mod expression;
mod visitor;

pub use dependencies::*;
pub use expression::*;
pub use visitor::*;
