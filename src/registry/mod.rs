//! Filter registry
//!
//! Maps filter names to [`FormFilter`] implementations. A registry is built
//! up front, then wrapped in an `Arc` and shared read-only by every evaluator.

#![warn(missing_docs)]

pub mod filter;
pub mod filters;

pub use filter::{
    Arity, ClosureFilter, FilterContext, FilterError, FilterFn, FilterResult, FormFilter,
};

use crate::model::FormValue;
use crate::parser::lexer::{is_identifier_continue, is_identifier_start};
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Registration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A filter with this name already exists
    #[error("Filter '{name}' is already registered")]
    DuplicateFilter {
        /// Filter name
        name: String,
    },

    /// The name cannot be written in a template
    #[error("'{name}' is not a valid filter name")]
    InvalidName {
        /// Rejected name
        name: String,
    },
}

static SHARED_STANDARD: Lazy<Arc<FilterRegistry>> =
    Lazy::new(|| Arc::new(FilterRegistry::standard()));

/// Registry of named filters
#[derive(Clone, Default)]
pub struct FilterRegistry {
    filters: FxHashMap<String, Arc<dyn FormFilter>>,
}

impl FilterRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with all built-in filters
    pub fn standard() -> Self {
        let mut registry = Self::new();
        filters::register_builtins(&mut registry);
        registry
    }

    /// Process-wide standard registry, built on first use
    pub fn shared_standard() -> Arc<FilterRegistry> {
        Arc::clone(&SHARED_STANDARD)
    }

    /// Register a trait-based filter
    pub fn register<F: FormFilter + 'static>(&mut self, filter: F) -> Result<(), RegistryError> {
        let name = filter.name();
        if !is_valid_name(name) {
            return Err(RegistryError::InvalidName {
                name: name.to_string(),
            });
        }
        if self.filters.contains_key(name) {
            return Err(RegistryError::DuplicateFilter {
                name: name.to_string(),
            });
        }
        self.insert_builtin(filter);
        Ok(())
    }

    /// Register a closure-based filter
    pub fn register_fn<F>(
        &mut self,
        name: impl Into<String>,
        arity: Arity,
        func: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&FormValue, &[FormValue], &FilterContext<'_>) -> FilterResult<FormValue>
            + Send
            + Sync
            + 'static,
    {
        self.register(ClosureFilter::new(name, arity, func))
    }

    pub(crate) fn insert_builtin<F: FormFilter + 'static>(&mut self, filter: F) {
        self.filters
            .insert(filter.name().to_string(), Arc::new(filter));
    }

    /// Look up a filter by its case-sensitive name
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn FormFilter>> {
        self.filters.get(name).cloned()
    }

    /// Check whether a filter is registered
    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.filters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered filters
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.names())
            .finish()
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_identifier_start) && chars.all(is_identifier_continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Culture;

    #[test]
    fn test_standard_registry_has_builtins() {
        let registry = FilterRegistry::standard();
        for name in [
            "IsNull",
            "IsNotNull",
            "IsEmpty",
            "IsNotEmpty",
            "Not",
            "ToBoolean",
            "Equals",
            "NotEquals",
            "GreaterThan",
            "GreaterThanOrEqual",
            "LessThan",
            "LessThanOrEqual",
            "ToUpper",
            "ToLower",
            "Trim",
            "ToString",
            "Length",
            "Default",
            "Join",
            "Contains",
            "Matches",
        ] {
            assert!(registry.contains(name), "missing built-in {name}");
        }
        assert_eq!(registry.len(), 21);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let registry = FilterRegistry::standard();
        assert!(registry.resolve("IsNotEmpty").is_some());
        assert!(registry.resolve("isnotempty").is_none());
    }

    #[test]
    fn test_register_fn() {
        let mut registry = FilterRegistry::new();
        registry
            .register_fn("Double", Arity::NONE, |value, _, _| match value {
                FormValue::Integer(i) => Ok(FormValue::Integer(i * 2)),
                other => Err(FilterError::invalid_type("Double", 0, "Integer", other)),
            })
            .unwrap();

        let culture = Culture::invariant();
        let filter = registry.resolve("Double").unwrap();
        assert_eq!(filter.arity(), Arity::NONE);
        assert_eq!(
            filter
                .apply(&FormValue::Integer(21), &[], &FilterContext::new(&culture))
                .unwrap(),
            FormValue::Integer(42)
        );
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = FilterRegistry::standard();
        let err = registry
            .register_fn("Trim", Arity::NONE, |value, _, _| Ok(value.clone()))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateFilter {
                name: "Trim".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        let mut registry = FilterRegistry::new();
        for name in ["", "Has Space", "9Lives", "a|b"] {
            assert!(matches!(
                registry.register_fn(name, Arity::NONE, |v, _, _| Ok(v.clone())),
                Err(RegistryError::InvalidName { .. })
            ));
        }
    }

    #[test]
    fn test_shared_standard_is_one_instance() {
        assert!(Arc::ptr_eq(
            &FilterRegistry::shared_standard(),
            &FilterRegistry::shared_standard()
        ));
    }
}
