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

//! Visitor pattern for AST traversal

use super::expression::{
    ConditionalData, ExpressionNode, InterpolationPart, LiteralValue, PathRoot, PipeCallData,
};

/// Trait for visiting AST nodes
///
/// Every method defaults to walking into the children, so implementors only
/// override the node kinds they care about.
pub trait Visitor: Sized {
    /// Visit an expression node
    fn visit_expression(&mut self, expr: &ExpressionNode) {
        walk_expression(self, expr)
    }

    /// Visit a literal
    fn visit_literal(&mut self, _literal: &LiteralValue) {}

    /// Visit a property path
    fn visit_property_path(&mut self, _root: PathRoot, _segments: &[String]) {}

    /// Visit a pipe call
    fn visit_pipe_call(&mut self, data: &PipeCallData) {
        self.visit_expression(&data.source);
        for arg in &data.args {
            self.visit_expression(arg);
        }
    }

    /// Visit a conditional expression
    fn visit_conditional(&mut self, data: &ConditionalData) {
        self.visit_expression(&data.condition);
        self.visit_expression(&data.when_true);
        self.visit_expression(&data.when_false);
    }

    /// Visit an interpolation
    fn visit_interpolation(&mut self, parts: &[InterpolationPart]) {
        for part in parts {
            if let InterpolationPart::Expression(expr) = part {
                self.visit_expression(expr);
            }
        }
    }
}

/// Default implementation of walking an expression tree
pub fn walk_expression<V: Visitor>(visitor: &mut V, expr: &ExpressionNode) {
    match expr {
        ExpressionNode::Literal(literal) => visitor.visit_literal(literal),
        ExpressionNode::PropertyPath { root, segments } => {
            visitor.visit_property_path(*root, segments)
        }
        ExpressionNode::PipeCall(data) => visitor.visit_pipe_call(data),
        ExpressionNode::Conditional(data) => visitor.visit_conditional(data),
        ExpressionNode::Interpolation(parts) => visitor.visit_interpolation(parts),
    }
}

/// Collects the names of every filter referenced by an expression
#[derive(Debug, Default)]
pub struct FilterNameCollector {
    /// Filter names in first-use order, without duplicates
    pub names: Vec<String>,
}

impl Visitor for FilterNameCollector {
    fn visit_pipe_call(&mut self, data: &PipeCallData) {
        if !self.names.contains(&data.filter) {
            self.names.push(data.filter.clone());
        }
        self.visit_expression(&data.source);
        for arg in &data.args {
            self.visit_expression(arg);
        }
    }
}
