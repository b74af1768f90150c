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

//! Error types for template parsing

use crate::diagnostics::{
    Diagnostic, DiagnosticBuilder, DiagnosticCode, DiagnosticFormatter, Format, SourceLocation,
};
use thiserror::Error;

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Syntax errors in a binding template
///
/// Every variant carries the byte offset into the full template string.
/// Parsing never depends on runtime data, so these are always authoring
/// mistakes and abort form construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `{` without a matching `}`
    #[error("Unclosed '{{' opened at position {position}")]
    UnclosedBrace {
        /// Position of the opening brace
        position: usize,
    },

    /// `}` in literal text
    #[error("Unexpected '}}' at position {position}")]
    UnexpectedCloseBrace {
        /// Position of the stray brace
        position: usize,
    },

    /// `{` inside an expression
    #[error("Nested '{{' at position {position}; use parentheses to group expressions")]
    NestedBrace {
        /// Position of the nested brace
        position: usize,
    },

    /// `{}` with nothing but whitespace inside
    #[error("Empty expression at position {position}")]
    EmptyExpression {
        /// Position of the opening brace
        position: usize,
    },

    /// Unexpected token
    #[error("Unexpected token '{token}' at position {position}")]
    UnexpectedToken {
        /// The unexpected token that was found
        token: String,
        /// Position where the token was found
        position: usize,
    },

    /// Expected token
    #[error("Expected {expected} at position {position}")]
    ExpectedToken {
        /// The expected token description
        expected: String,
        /// Position where the token was expected
        position: usize,
    },

    /// Unexpected end of an expression
    #[error("Unexpected end of expression at position {position}")]
    UnexpectedEndOfInput {
        /// Position where more input was expected
        position: usize,
    },

    /// Unclosed string literal
    #[error("Unclosed string literal starting at position {position}")]
    UnclosedString {
        /// Position of the opening quote
        position: usize,
    },

    /// Number that cannot be represented
    #[error("Invalid number literal '{value}' at position {position}")]
    InvalidNumber {
        /// Literal text
        value: String,
        /// Position of the literal
        position: usize,
    },

    /// Misplaced path separator
    #[error("Invalid property path at position {position}: {message}")]
    InvalidPath {
        /// What is wrong with the path
        message: String,
        /// Position of the offending separator
        position: usize,
    },

    /// `|` not followed by a filter name
    #[error("Missing filter name after '|' at position {position}")]
    EmptyFilterName {
        /// Position where the name was expected
        position: usize,
    },

    /// Identifier in source position that is not a binding keyword
    #[error(
        "Unknown source '{keyword}' at position {position}; expected 'Binding', 'ContextBinding' or a literal"
    )]
    UnknownSource {
        /// The identifier found
        keyword: String,
        /// Position of the identifier
        position: usize,
    },

    /// Character that is not part of the expression language
    #[error("Invalid character '{character}' at position {position}")]
    InvalidCharacter {
        /// The character found
        character: char,
        /// Position of the character
        position: usize,
    },
}

impl ParseError {
    /// Byte offset of the error in the template
    pub fn position(&self) -> usize {
        match self {
            ParseError::UnclosedBrace { position }
            | ParseError::UnexpectedCloseBrace { position }
            | ParseError::NestedBrace { position }
            | ParseError::EmptyExpression { position }
            | ParseError::UnexpectedToken { position, .. }
            | ParseError::ExpectedToken { position, .. }
            | ParseError::UnexpectedEndOfInput { position }
            | ParseError::UnclosedString { position }
            | ParseError::InvalidNumber { position, .. }
            | ParseError::InvalidPath { position, .. }
            | ParseError::EmptyFilterName { position }
            | ParseError::UnknownSource { position, .. }
            | ParseError::InvalidCharacter { position, .. } => *position,
        }
    }

    /// Convert to a diagnostic anchored in `template`
    pub fn to_diagnostic(&self, template: &str) -> Diagnostic {
        let code = match self {
            ParseError::UnclosedBrace { .. }
            | ParseError::UnexpectedCloseBrace { .. }
            | ParseError::NestedBrace { .. } => DiagnosticCode::UnbalancedBrace,
            ParseError::ExpectedToken { expected, .. } => {
                DiagnosticCode::ExpectedToken(expected.clone())
            }
            ParseError::UnclosedString { .. } => DiagnosticCode::UnclosedString,
            ParseError::InvalidNumber { .. } => DiagnosticCode::InvalidNumber,
            ParseError::InvalidPath { .. } => DiagnosticCode::InvalidPath,
            ParseError::EmptyFilterName { .. } => DiagnosticCode::EmptyFilterName,
            _ => DiagnosticCode::UnexpectedToken,
        };

        DiagnosticBuilder::error(code)
            .with_message(self.to_string())
            .with_location(SourceLocation::point(self.position()))
            .with_source(template)
            .build()
    }

    /// Human-readable report with a caret under the offending position
    pub fn render(&self, template: &str) -> String {
        DiagnosticFormatter::new(Format::Text).format(&self.to_diagnostic(template))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_and_diagnostic() {
        let error = ParseError::EmptyFilterName { position: 14 };
        assert_eq!(error.position(), 14);

        let diagnostic = error.to_diagnostic("{Binding Title|}");
        assert_eq!(diagnostic.code, DiagnosticCode::EmptyFilterName);
        assert_eq!(diagnostic.location, Some(SourceLocation::point(14)));
        assert_eq!(diagnostic.source.as_deref(), Some("{Binding Title|}"));
    }

    #[test]
    fn test_render_mentions_template() {
        let rendered = ParseError::UnclosedBrace { position: 0 }.render("{Binding Title");
        assert!(rendered.contains("{Binding Title"));
        assert!(rendered.contains('^'));
    }
}
