use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Options for [`Store::subscribe`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SubscribeOptions {
    /// Invoke the listener once with the current slice at registration time
    pub fire_immediately: bool,
}

struct Registration<S> {
    id: u64,
    callback: Rc<RefCell<dyn FnMut(&S)>>,
}

struct Inner<S> {
    state: RefCell<S>,
    subscribers: RefCell<Vec<Registration<S>>>,
    next_id: Cell<u64>,
}

/// Single-threaded state container with slice-scoped subscriptions.
///
/// Consumers register a selector together with a listener; after every
/// write, listeners run synchronously in registration order, and only when
/// their selected slice actually changed. A listener registered on one
/// slice never observes writes to unrelated slices.
///
/// Listeners must not write back into the same store synchronously; all
/// mutation happens on one logical thread and re-entrant writes would
/// observe a half-notified state.
pub struct Store<S: 'static> {
    inner: Rc<Inner<S>>,
}

impl<S: 'static> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<S: Default + 'static> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: 'static> Store<S> {
    #[must_use]
    pub fn new(initial: S) -> Self {
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(initial),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Read the state through a closure without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    /// Clone of the whole state
    #[must_use]
    pub fn get(&self) -> S
    where
        S: Clone,
    {
        self.inner.state.borrow().clone()
    }

    /// Clone of one selected slice
    pub fn select<T>(&self, selector: impl FnOnce(&S) -> T) -> T {
        selector(&self.inner.state.borrow())
    }

    /// Apply a mutation, then notify subscribers whose slice changed
    pub fn update(&self, f: impl FnOnce(&mut S)) {
        f(&mut self.inner.state.borrow_mut());
        self.notify();
    }

    /// Register a listener on the slice produced by `selector`.
    ///
    /// The listener fires only when the selected value changes (by
    /// `PartialEq`), synchronously and in registration order relative to
    /// other subscribers. The returned [`Subscription`] unsubscribes on
    /// drop; explicit [`Subscription::unsubscribe`] is idempotent.
    pub fn subscribe<T, Sel, F>(
        &self,
        selector: Sel,
        mut listener: F,
        options: SubscribeOptions,
    ) -> Subscription
    where
        T: PartialEq + Clone + 'static,
        Sel: Fn(&S) -> T + 'static,
        F: FnMut(&T) + 'static,
    {
        let mut previous = self.select(&selector);
        if options.fire_immediately {
            listener(&previous);
        }

        let callback = move |state: &S| {
            let next = selector(state);
            if next != previous {
                previous = next;
                listener(&previous);
            }
        };

        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.subscribers.borrow_mut().push(Registration {
            id,
            callback: Rc::new(RefCell::new(callback)),
        });

        let weak: Weak<Inner<S>> = Rc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.subscribers.borrow_mut().retain(|r| r.id != id);
                }
            })),
        }
    }

    fn notify(&self) {
        // Snapshot the registration list so listeners may subscribe or
        // unsubscribe during notification without invalidating iteration.
        let snapshot: Vec<(u64, Rc<RefCell<dyn FnMut(&S)>>)> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|r| (r.id, Rc::clone(&r.callback)))
            .collect();

        let state = self.inner.state.borrow();
        for (id, callback) in snapshot {
            let still_registered = self.inner.subscribers.borrow().iter().any(|r| r.id == id);
            if still_registered {
                (callback.borrow_mut())(&state);
            }
        }
    }
}

/// Handle for one slice subscription; unsubscribes on drop
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Remove the subscription. Safe to call more than once.
    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
