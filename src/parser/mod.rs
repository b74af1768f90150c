//! Template parser
//!
//! Turns an attribute string such as `"Hello {Binding Name|Trim}!"` into an
//! immutable [`ExpressionNode`]. Parsing is pure: it never looks at runtime
//! data, and filter names are only resolved later by the evaluator.

#![warn(missing_docs)]

pub mod error;
pub mod expression;
pub mod lexer;
pub mod span;
pub mod template;
pub mod tokenizer;

pub use error::{ParseError, ParseResult};
pub use span::Spanned;

use crate::ast::{ExpressionNode, InterpolationPart};
use template::Segment;

/// Parse a template string into an AST
///
/// - an empty template is the empty string constant
/// - brace-free text is a string constant
/// - a template that is exactly one `{ ... }` keeps the expression's native value
/// - anything else is an [`ExpressionNode::Interpolation`]
pub fn parse(template: &str) -> ParseResult<ExpressionNode> {
    let segments = template::split_template(template)?;

    let mut parts = Vec::with_capacity(segments.len());
    for segment in segments {
        parts.push(match segment {
            Segment::Text(text) => InterpolationPart::Text(text),
            Segment::Expression { body, body_start } => InterpolationPart::Expression(
                expression::parse_expression_body(body, body_start)?,
            ),
        });
    }

    Ok(match <[InterpolationPart; 1]>::try_from(parts) {
        Ok([InterpolationPart::Text(text)]) => ExpressionNode::text(text),
        Ok([InterpolationPart::Expression(expression)]) => expression,
        Err(parts) if parts.is_empty() => ExpressionNode::text(""),
        Err(parts) => ExpressionNode::Interpolation(parts),
    })
}
