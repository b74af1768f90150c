//! Parsed templates

use crate::ast::{DependencySet, ExpressionNode};
use crate::parser::{self, ParseResult};
use std::fmt;
use std::sync::Arc;

/// A parsed template together with its static dependency set
///
/// Immutable once built; share it between proxies through `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    root: ExpressionNode,
    dependencies: DependencySet,
}

impl Template {
    /// Parse `source`
    pub fn parse(source: &str) -> ParseResult<Self> {
        let root = parser::parse(source)?;
        log::debug!("Parsed template {source:?}");
        Ok(Self::from_expression(source, root))
    }

    /// Parse `source` into a shareable handle
    pub fn shared(source: &str) -> ParseResult<Arc<Self>> {
        Self::parse(source).map(Arc::new)
    }

    /// Build from an already parsed expression
    pub fn from_expression(source: impl Into<String>, root: ExpressionNode) -> Self {
        let dependencies = DependencySet::from_expression(&root);
        Self {
            source: source.into(),
            root,
            dependencies,
        }
    }

    /// Template text as written
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Root node of the syntax tree
    pub fn root(&self) -> &ExpressionNode {
        &self.root
    }

    /// Properties the template reads
    pub fn dependencies(&self) -> &DependencySet {
        &self.dependencies
    }

    /// Whether the template reads no properties at all
    pub fn is_constant(&self) -> bool {
        self.dependencies.is_empty()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::PathRoot;

    #[test]
    fn test_dependencies_are_derived_once() {
        let template =
            Template::parse("{Binding Title|IsNotEmpty ? Binding Title : ContextBinding Fallback}")
                .unwrap();
        assert_eq!(template.dependencies().watched(PathRoot::Model), vec!["Title"]);
        assert_eq!(
            template.dependencies().watched(PathRoot::Context),
            vec!["Fallback"]
        );
        assert!(!template.is_constant());
    }

    #[test]
    fn test_literal_template_is_constant() {
        assert!(Template::parse("no bindings here").unwrap().is_constant());
    }

    #[test]
    fn test_parse_error_propagates() {
        assert!(Template::parse("{Binding}").is_err());
    }
}
