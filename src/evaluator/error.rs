// Error types for expression evaluation

use crate::diagnostics::{Diagnostic, DiagnosticBuilder, DiagnosticCode};
use crate::registry::FilterError;
use thiserror::Error;

/// Result type for evaluation operations
pub type EvaluationResult<T> = Result<T, EvaluationError>;

/// Errors that can occur while evaluating an expression
///
/// These never escape [`Evaluator::evaluate`](super::Evaluator::evaluate):
/// they are logged there and the expression degrades to `NoValue`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// The pipe names a filter the registry does not know
    #[error("Unknown filter '{name}'")]
    UnknownFilter {
        /// Filter name
        name: String,
    },

    /// Filter evaluation error
    #[error(transparent)]
    Filter(#[from] FilterError),
}

impl EvaluationError {
    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = match self {
            EvaluationError::UnknownFilter { .. } => DiagnosticCode::UnknownFilter,
            EvaluationError::Filter(FilterError::InvalidArity { .. }) => {
                DiagnosticCode::InvalidArity
            }
            EvaluationError::Filter(_) => DiagnosticCode::FilterFailed,
        };

        DiagnosticBuilder::error(code)
            .with_message(self.to_string())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Arity;

    #[test]
    fn test_diagnostic_codes() {
        let unknown = EvaluationError::UnknownFilter {
            name: "Shout".to_string(),
        };
        assert_eq!(unknown.to_diagnostic().code_string(), "E100");
        assert_eq!(unknown.to_string(), "Unknown filter 'Shout'");

        let arity: EvaluationError = FilterError::InvalidArity {
            name: "Default".to_string(),
            arity: Arity::exactly(1),
            actual: 0,
        }
        .into();
        assert_eq!(arity.to_diagnostic().code_string(), "E101");
    }
}
