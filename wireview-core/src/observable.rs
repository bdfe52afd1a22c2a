//! Single-threaded observable value cells.
//!
//! A [`Store`] holds one value. Subscribers receive the current value as soon
//! as they subscribe and then every value passed to [`Store::set`], in
//! subscription order, synchronously.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Listener<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Inner<T> {
    value: RefCell<T>,
    listeners: RefCell<Vec<(u64, Listener<T>)>>,
    next_id: Cell<u64>,
}

/// An observable value. Clones share the same cell.
pub struct Store<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("value", &self.inner.value.borrow())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

impl<T: Clone + 'static> Store<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(value),
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Replace the value and notify every subscriber.
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.notify();
    }

    /// Replace the value with `f(current)` and notify every subscriber.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let value = f(&self.inner.value.borrow());
        self.set(value);
    }

    /// Call `listener` with the current value now and with every later value.
    pub fn subscribe(&self, listener: impl FnMut(&T) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        let listener: Listener<T> = Rc::new(RefCell::new(listener));
        self.inner.listeners.borrow_mut().push((id, Rc::clone(&listener)));

        let current = self.get();
        (&mut *listener.borrow_mut())(&current);

        let weak: Weak<Inner<T>> = Rc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.listeners.borrow_mut().retain(|(other, _)| *other != id);
                }
            })),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn notify(&self) {
        // Snapshot so listeners may subscribe, unsubscribe or set while we iterate.
        let listeners: Vec<Listener<T>> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            // Re-read per listener: an earlier one may have set a newer value.
            let value = self.get();
            match listener.try_borrow_mut() {
                Ok(mut listener) => (&mut *listener)(&value),
                Err(_) => log::warn!("listener re-entered its own store; skipping nested notification"),
            }
        }
    }
}

/// Handle returned by [`Store::subscribe`].
///
/// Dropping it keeps the subscription alive; call
/// [`Subscription::unsubscribe`] to stop notifications.
#[must_use]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
