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

//! Core diagnostic types

use std::fmt;

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Warning - may indicate a problem but doesn't prevent execution
    Warning,
    /// Error - prevents successful execution
    Error,
}

/// Diagnostic error codes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    // Template syntax errors
    /// Unexpected token in expression
    UnexpectedToken,
    /// Expected a specific token
    ExpectedToken(String),
    /// Unclosed string literal
    UnclosedString,
    /// Invalid number format
    InvalidNumber,
    /// Unbalanced `{` / `}` in a template
    UnbalancedBrace,
    /// Misplaced `.` in a property path
    InvalidPath,
    /// Missing filter name after `|`
    EmptyFilterName,

    // Runtime errors (recovered)
    /// Filter not present in the registry
    UnknownFilter,
    /// Wrong number of filter arguments
    InvalidArity,
    /// Filter rejected its input
    FilterFailed,

    // Reactive graph
    /// Coalesced recompute passes were cut off
    DependencyCycle,

    // Form construction
    /// Unknown comparator, converter or duplicate field in a definition
    InvalidDefinition,
}

/// Byte range inside a template string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// Start offset (0-based, bytes)
    pub offset: usize,
    /// Length in bytes
    pub length: usize,
}

impl SourceLocation {
    /// Create a location
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Location pointing at a single position
    pub fn point(offset: usize) -> Self {
        Self { offset, length: 1 }
    }
}

/// A diagnostic message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity of the diagnostic
    pub severity: Severity,
    /// Error code
    pub code: DiagnosticCode,
    /// Human-readable message
    pub message: String,
    /// Location inside `source`, when known
    pub location: Option<SourceLocation>,
    /// Template text the diagnostic refers to
    pub source: Option<String>,
    /// Simple contextual help message
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        let help = Self::generate_help(&code);
        Self {
            severity,
            code,
            message: message.into(),
            location: None,
            source: None,
            help,
        }
    }

    fn generate_help(code: &DiagnosticCode) -> Option<String> {
        match code {
            DiagnosticCode::UnknownFilter => {
                Some("Check the filter name spelling; filter names are case-sensitive".to_string())
            }
            DiagnosticCode::UnbalancedBrace => {
                Some("Escape literal braces as \\{ and \\}".to_string())
            }
            DiagnosticCode::InvalidPath => {
                Some("Property paths are identifiers separated by single dots".to_string())
            }
            DiagnosticCode::EmptyFilterName => Some("Write a filter name after '|'".to_string()),
            DiagnosticCode::DependencyCycle => Some(
                "An expression feeds back into its own dependencies; break the loop".to_string(),
            ),
            _ => None,
        }
    }

    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    /// Check if this is a warning
    pub fn is_warning(&self) -> bool {
        matches!(self.severity, Severity::Warning)
    }

    /// Get the diagnostic code as a string
    pub fn code_string(&self) -> String {
        match &self.code {
            DiagnosticCode::UnexpectedToken => "E001".to_string(),
            DiagnosticCode::ExpectedToken(_) => "E002".to_string(),
            DiagnosticCode::UnclosedString => "E003".to_string(),
            DiagnosticCode::InvalidNumber => "E004".to_string(),
            DiagnosticCode::UnbalancedBrace => "E005".to_string(),
            DiagnosticCode::InvalidPath => "E006".to_string(),
            DiagnosticCode::EmptyFilterName => "E007".to_string(),
            DiagnosticCode::UnknownFilter => "E100".to_string(),
            DiagnosticCode::InvalidArity => "E101".to_string(),
            DiagnosticCode::FilterFailed => "E102".to_string(),
            DiagnosticCode::DependencyCycle => "W200".to_string(),
            DiagnosticCode::InvalidDefinition => "E300".to_string(),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code_string(), self.message)
    }
}

/// Builder for diagnostics
#[derive(Debug, Clone)]
pub struct DiagnosticBuilder {
    diagnostic: Diagnostic,
}

impl DiagnosticBuilder {
    /// Start an error diagnostic
    pub fn error(code: DiagnosticCode) -> Self {
        Self::new(code, Severity::Error)
    }

    /// Start a warning diagnostic
    pub fn warning(code: DiagnosticCode) -> Self {
        Self::new(code, Severity::Warning)
    }

    fn new(code: DiagnosticCode, severity: Severity) -> Self {
        Self {
            diagnostic: Diagnostic::new(code, severity, String::new()),
        }
    }

    /// Set the message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.diagnostic.message = message.into();
        self
    }

    /// Set the location
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.diagnostic.location = Some(location);
        self
    }

    /// Attach the template text
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.diagnostic.source = Some(source.into());
        self
    }

    /// Override the help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.diagnostic.help = Some(help.into());
        self
    }

    /// Finish building
    pub fn build(self) -> Diagnostic {
        self.diagnostic
    }
}
