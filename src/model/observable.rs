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

//! Observable property bag

use super::context::{DataContext, PropertyChangedHandler, SubscriptionId};
use super::value::FormValue;
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

struct Subscriber {
    id: SubscriptionId,
    property: String,
    handler: PropertyChangedHandler,
}

/// Ordered property bag that notifies subscribers when a property changes
///
/// Writes that leave a property value-equal to its previous value notify
/// nobody. Handlers run after the internal borrows are released.
pub struct ObservableObject {
    type_name: String,
    properties: RefCell<IndexMap<String, FormValue>>,
    subscribers: RefCell<Vec<Subscriber>>,
    next_id: Cell<u64>,
}

impl ObservableObject {
    /// Create an empty object
    pub fn new() -> Rc<Self> {
        Self::named("Object")
    }

    /// Create an empty object with a type name for debug output
    pub fn named(type_name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            type_name: type_name.into(),
            properties: RefCell::new(IndexMap::new()),
            subscribers: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        })
    }

    /// Create an object pre-populated with properties
    pub fn with_properties<K, V>(properties: impl IntoIterator<Item = (K, V)>) -> Rc<Self>
    where
        K: Into<String>,
        V: Into<FormValue>,
    {
        let object = Self::new();
        object.properties.borrow_mut().extend(
            properties
                .into_iter()
                .map(|(name, value)| (name.into(), value.into())),
        );
        object
    }

    /// Current value of a property
    pub fn get(&self, name: &str) -> Option<FormValue> {
        self.properties.borrow().get(name).cloned()
    }

    /// Set a property, notifying subscribers if the value changed
    ///
    /// Returns whether the value changed.
    pub fn set(&self, name: &str, value: impl Into<FormValue>) -> bool {
        let value = value.into();
        {
            let mut properties = self.properties.borrow_mut();
            match properties.get_mut(name) {
                Some(current) if *current == value => return false,
                Some(current) => *current = value,
                None => {
                    properties.insert(name.to_string(), value);
                }
            }
        }
        self.notify(name);
        true
    }

    /// Remove a property, notifying subscribers if it existed
    pub fn remove(&self, name: &str) -> Option<FormValue> {
        let removed = self.properties.borrow_mut().shift_remove(name);
        if removed.is_some() {
            self.notify(name);
        }
        removed
    }

    /// Notify subscribers of `name` without changing anything
    ///
    /// A subscription released by an earlier handler in the same round is
    /// skipped.
    pub fn notify(&self, name: &str) {
        let handlers: SmallVec<[(SubscriptionId, PropertyChangedHandler); 4]> = self
            .subscribers
            .borrow()
            .iter()
            .filter(|s| s.property == name)
            .map(|s| (s.id, Rc::clone(&s.handler)))
            .collect();

        log::trace!(
            "{}.{} changed, {} subscriber(s)",
            self.type_name,
            name,
            handlers.len()
        );
        for (id, handler) in handlers {
            if self.subscribers.borrow().iter().any(|s| s.id == id) {
                handler(name);
            }
        }
    }

    /// Property names in insertion order
    pub fn property_names(&self) -> Vec<String> {
        self.properties.borrow().keys().cloned().collect()
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

impl DataContext for ObservableObject {
    fn read_property(&self, name: &str) -> Option<FormValue> {
        self.get(name)
    }

    fn subscribe(&self, name: &str, handler: PropertyChangedHandler) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_id.get());
        self.next_id.set(id.get() + 1);
        self.subscribers.borrow_mut().push(Subscriber {
            id,
            property: name.to_string(),
            handler,
        });
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.borrow_mut().retain(|s| s.id != id);
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl fmt::Debug for ObservableObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableObject")
            .field("type_name", &self.type_name)
            .field("properties", &self.properties.borrow())
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(object: &ObservableObject, name: &str) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        object.subscribe(name, Rc::new(move |_| seen.set(seen.get() + 1)));
        count
    }

    #[test]
    fn test_set_notifies_only_on_change() {
        let object = ObservableObject::with_properties([("Title", "Hello")]);
        let count = counter(&object, "Title");

        assert!(!object.set("Title", "Hello"));
        assert_eq!(count.get(), 0);

        assert!(object.set("Title", ""));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_other_properties_do_not_notify() {
        let object = ObservableObject::new();
        let count = counter(&object, "A");
        object.set("B", 1);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let object = ObservableObject::new();
        let id = object.subscribe("A", Rc::new(|_| {}));
        assert_eq!(object.subscriber_count(), 1);
        object.unsubscribe(id);
        object.unsubscribe(id);
        assert_eq!(object.subscriber_count(), 0);
    }

    #[test]
    fn test_handler_may_write_reentrantly() {
        let object = ObservableObject::new();
        let weak = Rc::downgrade(&object);
        object.subscribe(
            "A",
            Rc::new(move |_| {
                if let Some(object) = weak.upgrade() {
                    let a = object.get("A").unwrap_or(FormValue::Null);
                    object.set("Echo", a);
                }
            }),
        );

        object.set("A", 7);
        assert_eq!(object.get("Echo"), Some(FormValue::Integer(7)));
    }

    #[test]
    fn test_handler_released_mid_round_is_skipped() {
        let object = ObservableObject::new();
        let later = Rc::new(Cell::new(None));
        let calls = Rc::new(Cell::new(0));

        let (weak, target) = (Rc::downgrade(&object), Rc::clone(&later));
        object.subscribe(
            "A",
            Rc::new(move |_| {
                if let (Some(object), Some(id)) = (weak.upgrade(), target.get()) {
                    object.unsubscribe(id);
                }
            }),
        );
        let sink = Rc::clone(&calls);
        later.set(Some(object.subscribe("A", Rc::new(move |_| sink.set(sink.get() + 1)))));

        object.set("A", 1);
        assert_eq!(calls.get(), 0);
        assert_eq!(object.subscriber_count(), 1);
    }

    #[test]
    fn test_remove_notifies() {
        let object = ObservableObject::with_properties([("A", 1)]);
        let count = counter(&object, "A");
        assert_eq!(object.remove("A"), Some(FormValue::Integer(1)));
        assert_eq!(object.remove("A"), None);
        assert_eq!(count.get(), 1);
    }
}
