//! Diagnostic system for template parsing and evaluation problems
//!
//! Parse errors are fatal at form-construction time and render with a caret
//! under the offending template position. Runtime problems (unknown filters,
//! reactive cycles) are recovered and only surface as warnings.

pub mod diagnostic;
pub mod formatter;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Severity, SourceLocation};
pub use formatter::{DiagnosticFormatter, Format};
