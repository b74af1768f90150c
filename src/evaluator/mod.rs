//! Expression evaluator
//!
//! Walks an [`ExpressionNode`] against a [`BindingContext`], applying pipe
//! stages through the [`FilterRegistry`]. Evaluation is read-only with
//! respect to the data context.

pub mod error;

pub use error::{EvaluationError, EvaluationResult};

use crate::ast::{ExpressionNode, InterpolationPart, PathRoot};
use crate::binding::BindingContext;
use crate::model::{Culture, FormValue};
use crate::registry::{FilterContext, FilterRegistry};
use smallvec::SmallVec;
use std::sync::Arc;

/// Expression evaluator
#[derive(Debug, Clone)]
pub struct Evaluator {
    registry: Arc<FilterRegistry>,
    culture: Culture,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(FilterRegistry::shared_standard())
    }
}

impl Evaluator {
    /// Create an evaluator over `registry` with the invariant culture
    pub fn new(registry: Arc<FilterRegistry>) -> Self {
        Self {
            registry,
            culture: Culture::invariant(),
        }
    }

    /// Use `culture` for stringification
    pub fn with_culture(mut self, culture: Culture) -> Self {
        self.culture = culture;
        self
    }

    /// Filter registry used for pipe stages
    pub fn registry(&self) -> &Arc<FilterRegistry> {
        &self.registry
    }

    /// Culture used for stringification
    pub fn culture(&self) -> &Culture {
        &self.culture
    }

    /// Evaluate `node`; failures are logged and yield [`FormValue::NoValue`]
    pub fn evaluate(&self, node: &ExpressionNode, context: &BindingContext) -> FormValue {
        match self.try_evaluate(node, context) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("Evaluation of `{node}` failed: {err}");
                FormValue::NoValue
            }
        }
    }

    /// Evaluate `node`, surfacing the first failure
    pub fn try_evaluate(
        &self,
        node: &ExpressionNode,
        context: &BindingContext,
    ) -> EvaluationResult<FormValue> {
        match node {
            ExpressionNode::Literal(literal) => Ok(FormValue::from_literal(literal)),
            ExpressionNode::PropertyPath { root, segments } => {
                Ok(self.resolve_path(*root, segments, context))
            }
            ExpressionNode::PipeCall(data) => {
                let source = self.try_evaluate(&data.source, context)?;
                let mut args: SmallVec<[FormValue; 2]> = SmallVec::with_capacity(data.args.len());
                for arg in &data.args {
                    args.push(self.try_evaluate(arg, context)?);
                }
                self.apply_filter(&data.filter, &source, &args)
            }
            ExpressionNode::Conditional(data) => {
                let branch = if self.try_evaluate(&data.condition, context)?.is_truthy() {
                    &data.when_true
                } else {
                    &data.when_false
                };
                self.try_evaluate(branch, context)
            }
            ExpressionNode::Interpolation(parts) => {
                let mut text = String::new();
                for part in parts {
                    match part {
                        InterpolationPart::Text(literal) => text.push_str(literal),
                        InterpolationPart::Expression(expr) => {
                            text.push_str(&self.culture.format(&self.try_evaluate(expr, context)?));
                        }
                    }
                }
                Ok(FormValue::String(text))
            }
        }
    }

    /// Resolve and invoke a filter by name with the arity check applied
    pub fn apply_filter(
        &self,
        name: &str,
        value: &FormValue,
        args: &[FormValue],
    ) -> EvaluationResult<FormValue> {
        let filter = self
            .registry
            .resolve(name)
            .ok_or_else(|| EvaluationError::UnknownFilter {
                name: name.to_string(),
            })?;
        filter.arity().check(name, args.len())?;
        Ok(filter.apply(value, args, &FilterContext::new(&self.culture))?)
    }

    fn resolve_path(&self, root: PathRoot, segments: &[String], context: &BindingContext) -> FormValue {
        let Some(object) = context.root(root) else {
            return FormValue::NoValue;
        };

        let mut segments = segments.iter();
        let Some(first) = segments.next() else {
            return FormValue::NoValue;
        };
        let mut current = object.read_property(first).unwrap_or(FormValue::NoValue);

        for segment in segments {
            current = match &current {
                FormValue::Object(nested) => {
                    nested.read_property(segment).unwrap_or(FormValue::NoValue)
                }
                _ => return FormValue::NoValue,
            };
        }
        current
    }
}
