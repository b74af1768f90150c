//! Data context capability
//!
//! Anything a template reads from implements [`DataContext`]: it can read a
//! named property and notify subscribers when a named property changes.

use super::value::FormValue;
use std::fmt;
use std::rc::Rc;

/// Callback invoked with the name of the property that changed
pub type PropertyChangedHandler = Rc<dyn Fn(&str)>;

/// Handle returned by [`DataContext::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Create a handle from a raw id
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read and observe named properties of a model or ambient context
///
/// Implementations must tolerate re-entrant calls from inside a handler:
/// a handler may read properties, write them, or (un)subscribe.
pub trait DataContext {
    /// Read a property, or `None` if the object has no such property
    fn read_property(&self, name: &str) -> Option<FormValue>;

    /// Register `handler` for changes of `name`
    fn subscribe(&self, name: &str, handler: PropertyChangedHandler) -> SubscriptionId;

    /// Release a subscription; unknown handles are ignored
    fn unsubscribe(&self, id: SubscriptionId);

    /// Name used in debug output
    fn type_name(&self) -> &str {
        "Object"
    }
}
