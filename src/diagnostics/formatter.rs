//! Formatting diagnostics for different output formats

use super::diagnostic::Diagnostic;

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Human-readable text with a caret under the offending position
    Text,
}

/// Formatter for diagnostics
pub struct DiagnosticFormatter {
    format: Format,
    show_help: bool,
}

impl DiagnosticFormatter {
    /// Create a new formatter
    pub fn new(format: Format) -> Self {
        Self {
            format,
            show_help: true,
        }
    }

    /// Set whether to show help lines
    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    /// Format a diagnostic
    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        match self.format {
            Format::Text => self.format_text(diagnostic),
        }
    }

    fn format_text(&self, diagnostic: &Diagnostic) -> String {
        let mut result = format!(
            "{}: {} [{}]",
            diagnostic.severity,
            diagnostic.message,
            diagnostic.code_string()
        );

        if let Some(source) = &diagnostic.source {
            result.push_str(&format!("\n  | {source}"));
            if let Some(location) = diagnostic.location {
                // Caret column counts characters, offsets are bytes.
                let column = source
                    .get(..location.offset.min(source.len()))
                    .map(|prefix| prefix.chars().count())
                    .unwrap_or(0);
                let width = location.length.max(1);
                result.push_str(&format!(
                    "\n  | {}{}",
                    " ".repeat(column),
                    "^".repeat(width)
                ));
            }
        }

        if self.show_help {
            if let Some(help) = &diagnostic.help {
                result.push_str(&format!("\n  = help: {help}"));
            }
        }

        result
    }
}

impl Default for DiagnosticFormatter {
    fn default() -> Self {
        Self::new(Format::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticBuilder, DiagnosticCode, SourceLocation};

    #[test]
    fn test_text_format_places_caret() {
        let diagnostic = DiagnosticBuilder::error(DiagnosticCode::UnbalancedBrace)
            .with_message("unclosed '{'")
            .with_source("Hi {Binding Name")
            .with_location(SourceLocation::point(3))
            .build();

        let text = DiagnosticFormatter::new(Format::Text)
            .with_help(false)
            .format(&diagnostic);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "error: unclosed '{' [E005]");
        assert_eq!(lines[1], "  | Hi {Binding Name");
        assert_eq!(lines[2], "  |    ^");
    }

    #[test]
    fn test_help_line() {
        let diagnostic = DiagnosticBuilder::warning(DiagnosticCode::DependencyCycle)
            .with_message("did not settle")
            .build();
        let text = DiagnosticFormatter::default().format(&diagnostic);
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("warning: did not settle [W200]"));
        assert!(text.lines().nth(1).unwrap().starts_with("  = help: "));
    }
}
