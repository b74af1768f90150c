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

//! Static dependency extraction
//!
//! The dependency set of an expression is every property path it can read,
//! whichever branch of a conditional is live. It is computed once per tree and
//! decides which change notifications a proxy subscribes to: every segment of
//! a path is watched on the object it is read from.

use super::expression::{ExpressionNode, PathRoot};
use super::visitor::Visitor;
use indexmap::IndexSet;
use smallvec::SmallVec;

/// One property path read by an expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyDependency {
    /// Model or ambient context
    pub root: PathRoot,
    /// Full dotted path
    pub path: SmallVec<[String; 4]>,
}

impl PropertyDependency {
    /// The property read directly on the root object
    pub fn head(&self) -> &str {
        self.path.first().map(String::as_str).unwrap_or_default()
    }
}

/// Ordered, duplicate-free set of property dependencies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    entries: IndexSet<PropertyDependency>,
}

impl DependencySet {
    /// Collect the dependencies of an expression tree
    pub fn from_expression(expr: &ExpressionNode) -> Self {
        let mut collector = DependencyCollector::default();
        collector.visit_expression(expr);
        collector.set
    }

    /// Iterate over all dependencies in first-read order
    pub fn iter(&self) -> impl Iterator<Item = &PropertyDependency> {
        self.entries.iter()
    }

    /// Paths read from `root`, as segment lists
    pub fn paths(&self, root: PathRoot) -> impl Iterator<Item = &[String]> {
        self.entries
            .iter()
            .filter(move |d| d.root == root)
            .map(|d| d.path.as_slice())
    }

    /// Whether any path reaches past its root-level property
    pub fn has_nested_paths(&self) -> bool {
        self.entries.iter().any(|d| d.path.len() > 1)
    }

    /// Distinct root-level property names read from `root`
    pub fn watched(&self, root: PathRoot) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for dependency in self.entries.iter().filter(|d| d.root == root) {
            let head = dependency.head();
            if !names.contains(&head) {
                names.push(head);
            }
        }
        names
    }

    /// Check whether a root-level property is watched
    pub fn watches(&self, root: PathRoot, property: &str) -> bool {
        self.entries
            .iter()
            .any(|d| d.root == root && d.head() == property)
    }

    /// Number of distinct paths
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True for constant expressions
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Default)]
struct DependencyCollector {
    set: DependencySet,
}

impl Visitor for DependencyCollector {
    fn visit_property_path(&mut self, root: PathRoot, segments: &[String]) {
        self.set.entries.insert(PropertyDependency {
            root,
            path: segments.iter().cloned().collect(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_every_branch() {
        let node = ExpressionNode::conditional(
            ExpressionNode::path(PathRoot::Context, ["IsReadOnly"]),
            ExpressionNode::path(PathRoot::Model, ["Address", "City"]),
            ExpressionNode::pipe(
                ExpressionNode::path(PathRoot::Model, ["Address", "Street"]),
                "Default",
                [ExpressionNode::path(PathRoot::Model, ["Fallback"])],
            ),
        );

        let deps = DependencySet::from_expression(&node);
        assert_eq!(deps.len(), 4);
        assert_eq!(deps.watched(PathRoot::Model), vec!["Address", "Fallback"]);
        assert_eq!(deps.watched(PathRoot::Context), vec!["IsReadOnly"]);
        assert!(deps.watches(PathRoot::Model, "Address"));
        assert!(!deps.watches(PathRoot::Model, "City"));
        assert!(deps.has_nested_paths());

        let model_paths: Vec<&[String]> = deps.paths(PathRoot::Model).collect();
        assert_eq!(model_paths.len(), 3);
        assert_eq!(model_paths[0], ["Address".to_string(), "City".to_string()]);
    }

    #[test]
    fn test_literal_has_no_dependencies() {
        let deps = DependencySet::from_expression(&ExpressionNode::text("hello"));
        assert!(deps.is_empty());
        assert!(!deps.has_nested_paths());
    }
}
