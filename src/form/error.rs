//! Form construction errors

use crate::diagnostics::{Diagnostic, DiagnosticBuilder, DiagnosticCode};
use crate::parser::ParseError;
use thiserror::Error;

/// Result type for form compilation
pub type FormResult<T> = Result<T, FormError>;

/// Reasons a form fails to build
///
/// Any error aborts the whole form; no partially bound form is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    /// An attribute template does not parse
    #[error("Invalid {attribute} template for field '{field}' ({template:?}): {source}")]
    Template {
        /// Field key
        field: String,
        /// Attribute holding the template, e.g. `isVisible`
        attribute: String,
        /// Template text
        template: String,
        /// Underlying syntax error
        #[source]
        source: ParseError,
    },

    /// No built-in comparator has this name
    #[error("Unknown comparator '{name}' on field '{field}'")]
    UnknownComparator {
        /// Field key
        field: String,
        /// Requested comparator
        name: String,
    },

    /// Converter filter missing or requires arguments
    #[error("Unknown converter '{name}' on field '{field}'")]
    UnknownConverter {
        /// Field key
        field: String,
        /// Requested filter
        name: String,
    },

    /// Two fields share a key
    #[error("Duplicate field key '{key}'")]
    DuplicateField {
        /// Repeated key
        key: String,
    },

    /// Definition JSON is malformed
    #[error("Invalid form definition: {message}")]
    Definition {
        /// Deserializer message
        message: String,
    },
}

impl FormError {
    /// Convert to a diagnostic; template errors point into the template text
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            FormError::Template {
                template, source, ..
            } => {
                let mut diagnostic = source.to_diagnostic(template);
                diagnostic.message = self.to_string();
                diagnostic
            }
            other => DiagnosticBuilder::error(DiagnosticCode::InvalidDefinition)
                .with_message(other.to_string())
                .build(),
        }
    }
}

impl From<serde_json::Error> for FormError {
    fn from(err: serde_json::Error) -> Self {
        FormError::Definition {
            message: err.to_string(),
        }
    }
}
