//! Built-in filters

pub mod collection;
pub mod comparison;
pub mod predicate;
pub mod string;

use super::FilterRegistry;

/// Register every built-in filter
pub fn register_builtins(registry: &mut FilterRegistry) {
    predicate::register(registry);
    comparison::register(registry);
    string::register(registry);
    collection::register(registry);
}
