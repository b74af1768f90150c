//! Listener lists with RAII subscriptions

use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Slots<A> = RefCell<Vec<(u64, Rc<dyn Fn(&A)>)>>;

/// Ordered set of callbacks notified with a `&A`
pub struct ListenerSet<A> {
    slots: Rc<Slots<A>>,
    next_id: Cell<u64>,
}

impl<A> Default for ListenerSet<A> {
    fn default() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Vec::new())),
            next_id: Cell::new(0),
        }
    }
}

impl<A: 'static> ListenerSet<A> {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener; it stays registered while the returned guard lives
    pub fn add(&self, listener: impl Fn(&A) + 'static) -> Subscription<A> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.slots.borrow_mut().push((id, Rc::new(listener)));
        Subscription {
            slots: Rc::downgrade(&self.slots),
            id,
        }
    }

    /// Call every listener registered before the call started
    ///
    /// Listeners may add or drop subscriptions while being notified; one
    /// removed by an earlier listener in the same round is not called.
    pub fn notify(&self, value: &A) {
        let snapshot: SmallVec<[(u64, Rc<dyn Fn(&A)>); 4]> = self
            .slots
            .borrow()
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();
        for (id, listener) in snapshot {
            if self.contains(id) {
                listener(value);
            }
        }
    }

    fn contains(&self, id: u64) -> bool {
        self.slots.borrow().iter().any(|(slot, _)| *slot == id)
    }

    /// Remove every listener
    pub fn clear(&self) {
        self.slots.borrow_mut().clear();
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Whether no listener is registered
    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}

impl<A> fmt::Debug for ListenerSet<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listeners", &self.slots.borrow().len())
            .finish()
    }
}

/// Keeps a listener registered; dropping it removes the listener
#[must_use = "dropping the subscription removes the listener immediately"]
pub struct Subscription<A> {
    slots: Weak<Slots<A>>,
    id: u64,
}

impl<A> Subscription<A> {
    /// Leave the listener registered for the lifetime of its owner
    pub fn detach(self) {
        std::mem::forget(self);
    }
}

impl<A> Drop for Subscription<A> {
    fn drop(&mut self) {
        if let Some(slots) = self.slots.upgrade() {
            slots.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

impl<A> fmt::Debug for Subscription<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
