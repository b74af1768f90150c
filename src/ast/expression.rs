// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Expression AST node definitions

use rust_decimal::Decimal;
use smallvec::SmallVec;
use std::fmt;

/// AST representation of a binding template
///
/// Nodes are immutable once parsed and carry no per-binding state, so a single
/// tree is shared by every proxy bound to the same template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExpressionNode {
    /// Constant value
    Literal(LiteralValue),

    /// Property read rooted at the model or the ambient context
    PropertyPath {
        /// Which half of the binding context the path starts from
        root: PathRoot,
        /// Dotted path segments, never empty
        segments: SmallVec<[String; 4]>,
    },

    /// Filter application (boxed for size optimization)
    PipeCall(Box<PipeCallData>),

    /// Ternary conditional (boxed for size optimization)
    Conditional(Box<ConditionalData>),

    /// Literal text mixed with embedded expressions, always a string
    Interpolation(Vec<InterpolationPart>),
}

/// Root of a property path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathRoot {
    /// `Binding` - the bound model
    Model,
    /// `ContextBinding` - the ambient context
    Context,
}

impl PathRoot {
    /// Template keyword selecting this root
    pub fn keyword(self) -> &'static str {
        match self {
            PathRoot::Model => "Binding",
            PathRoot::Context => "ContextBinding",
        }
    }

    /// Resolve a template keyword
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "Binding" => Some(PathRoot::Model),
            "ContextBinding" => Some(PathRoot::Context),
            _ => None,
        }
    }
}

/// Filter application data
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PipeCallData {
    /// Value flowing into the filter
    pub source: ExpressionNode,
    /// Registry name of the filter (case-sensitive)
    pub filter: String,
    /// Additional operands after `:`
    pub args: SmallVec<[ExpressionNode; 2]>,
}

/// Conditional expression data
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConditionalData {
    /// Condition, coerced through truthiness
    pub condition: ExpressionNode,
    /// Branch taken when the condition is truthy
    pub when_true: ExpressionNode,
    /// Branch taken otherwise
    pub when_false: ExpressionNode,
}

/// A segment of an interpolated template
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InterpolationPart {
    /// Literal text, escapes already resolved
    Text(String),
    /// Embedded expression, stringified on evaluation
    Expression(ExpressionNode),
}

/// Literal values that can appear inside a template
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    /// `null`
    Null,
    /// `true` / `false`
    Boolean(bool),
    /// Integer literal
    Integer(i64),
    /// Decimal literal
    Decimal(Decimal),
    /// Quoted string literal
    String(String),
}

impl ExpressionNode {
    /// Create a string literal node
    pub fn text(value: impl Into<String>) -> Self {
        ExpressionNode::Literal(LiteralValue::String(value.into()))
    }

    /// Create a property path node
    pub fn path<I, S>(root: PathRoot, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ExpressionNode::PropertyPath {
            root,
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a pipe call node
    pub fn pipe(
        source: ExpressionNode,
        filter: impl Into<String>,
        args: impl IntoIterator<Item = ExpressionNode>,
    ) -> Self {
        ExpressionNode::PipeCall(Box::new(PipeCallData {
            source,
            filter: filter.into(),
            args: args.into_iter().collect(),
        }))
    }

    /// Create a conditional node
    pub fn conditional(
        condition: ExpressionNode,
        when_true: ExpressionNode,
        when_false: ExpressionNode,
    ) -> Self {
        ExpressionNode::Conditional(Box::new(ConditionalData {
            condition,
            when_true,
            when_false,
        }))
    }

    /// Check whether the node is a constant
    pub fn is_literal(&self) -> bool {
        matches!(self, ExpressionNode::Literal(_))
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Null => write!(f, "null"),
            LiteralValue::Boolean(b) => write!(f, "{b}"),
            LiteralValue::Integer(i) => write!(f, "{i}"),
            LiteralValue::Decimal(d) => write!(f, "{d}"),
            LiteralValue::String(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
        }
    }
}

impl fmt::Display for ExpressionNode {
    /// Renders the node back in template syntax (without the outer braces).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionNode::Literal(literal) => write!(f, "{literal}"),
            ExpressionNode::PropertyPath { root, segments } => {
                write!(f, "{} {}", root.keyword(), segments.join("."))
            }
            ExpressionNode::PipeCall(data) => {
                write!(f, "{}|{}", data.source, data.filter)?;
                for arg in &data.args {
                    write!(f, ":{}", Parenthesized(arg))?;
                }
                Ok(())
            }
            ExpressionNode::Conditional(data) => write!(
                f,
                "{} ? {} : {}",
                Parenthesized(&data.condition),
                Parenthesized(&data.when_true),
                Parenthesized(&data.when_false)
            ),
            ExpressionNode::Interpolation(parts) => {
                for part in parts {
                    match part {
                        InterpolationPart::Text(text) => {
                            write!(f, "{}", text.replace('{', "\\{").replace('}', "\\}"))?
                        }
                        InterpolationPart::Expression(expr) => write!(f, "{{{expr}}}")?,
                    }
                }
                Ok(())
            }
        }
    }
}

struct Parenthesized<'a>(&'a ExpressionNode);

impl fmt::Display for Parenthesized<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            ExpressionNode::PipeCall(_) | ExpressionNode::Conditional(_) => write!(f, "({})", self.0),
            other => write!(f, "{other}"),
        }
    }
}
