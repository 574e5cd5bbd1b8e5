#![forbid(unsafe_code)]

//! Observable value with synchronous change notification.
//!
//! # Design
//!
//! [`ObservableValue<T>`] wraps a value of type `T` in shared,
//! reference-counted storage (`Rc<RefCell<..>>`). Every assignment notifies
//! all active subscribers in registration order. Equality is never checked,
//! so `T` does not need `PartialEq`.
//!
//! Each subscription is an `Rc<Binding>` owned by the returned
//! [`Subscription`]; the container only records a `Weak` to it. Dropping the
//! handle therefore detaches the callback without any explicit cancel, and
//! entries whose handle is gone are pruned on the next pass over the list.
//!
//! ```text
//!   ObservableValue ──Rc──▶ ObservableInner
//!                              subscribers: [Weak ─┐, Weak ─┐]
//!                                                  ▼        ▼
//!   Subscription ───────Rc──────────────────▶ Binding   Binding ◀──Rc── Subscription
//!                                              owner: Weak ─▶ ObservableInner
//! ```
//!
//! # Re-entrancy
//!
//! No `RefCell` borrow is held while a callback runs. Callbacks may read or
//! assign the value, subscribe, or cancel any subscription (their own
//! included). Delivery is depth-first: an assignment made inside a callback
//! is delivered to every active subscriber before the outer notification
//! resumes with its remaining subscribers, which still receive the outer
//! value. Subscribers registered during a notification are not part of it.
//!
//! # Performance
//!
//! | Operation     | Complexity                 |
//! |---------------|----------------------------|
//! | `get()`       | O(1) + clone of `T`        |
//! | `with()`      | O(1)                       |
//! | `set()`       | O(S) where S = subscribers |
//! | `subscribe()` | O(1) amortized             |
//! | `cancel()`    | O(S)                       |
//!
//! # Failure Modes
//!
//! - **Observer panic**: the remaining subscribers of that cycle are still
//!   notified, then the first panic resumes out of `set()`. The container
//!   holds no borrow at that point and stays fully usable.
//! - **Touching the value inside `update()`**: the closure passed to
//!   [`ObservableValue::update`] runs with the value mutably borrowed, so
//!   reading, assigning or subscribing to the same observable from inside it
//!   panics.

use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

#[cfg(feature = "tracing")]
use tracing::trace;

use crate::subscription::{Detach, Subscription, SubscriptionId};

type Callback<T> = Rc<dyn Fn(&T)>;

/// Shared interior for [`ObservableValue<T>`].
struct ObservableInner<T> {
    /// Held behind `Rc` so a notification can keep its value while a nested
    /// assignment replaces it.
    value: Rc<T>,
    version: u64,
    next_id: u64,
    /// Registration-ordered, non-owning.
    subscribers: Vec<Entry<T>>,
}

impl<T> ObservableInner<T> {
    fn prune(&mut self) {
        self.subscribers.retain(Entry::is_live);
    }
}

impl<T> Drop for ObservableInner<T> {
    fn drop(&mut self) {
        // Outstanding handles become inert; release what their callbacks captured.
        for entry in std::mem::take(&mut self.subscribers) {
            if let Some(binding) = entry.binding.upgrade() {
                drop(binding.release());
            }
        }
    }
}

struct Entry<T> {
    id: SubscriptionId,
    binding: Weak<Binding<T>>,
}

impl<T> Entry<T> {
    fn upgrade(&self) -> Option<Rc<Binding<T>>> {
        self.binding
            .upgrade()
            .filter(|binding| binding.callback.borrow().is_some())
    }

    fn is_live(&self) -> bool {
        self.upgrade().is_some()
    }
}

/// The subscription record. Strongly owned by its [`Subscription`] only.
struct Binding<T> {
    id: SubscriptionId,
    callback: RefCell<Option<Callback<T>>>,
    owner: Weak<RefCell<ObservableInner<T>>>,
}

impl<T> Binding<T> {
    fn invoke(&self, value: &T) {
        // Clone out so the callback may cancel itself mid-call.
        let callback = self.callback.borrow().clone();
        if let Some(callback) = callback {
            callback(value);
        }
    }

    fn release(&self) -> Option<Callback<T>> {
        self.callback.borrow_mut().take()
    }
}

impl<T: 'static> Detach for Binding<T> {
    fn id(&self) -> SubscriptionId {
        self.id
    }

    fn is_attached(&self) -> bool {
        self.callback.borrow().is_some()
    }

    fn detach(&self) {
        let Some(callback) = self.release() else {
            return;
        };

        if let Some(owner) = self.owner.upgrade() {
            // Borrowed only inside `update()`; the released entry is pruned later.
            if let Ok(mut inner) = owner.try_borrow_mut() {
                let id = self.id;
                inner
                    .subscribers
                    .retain(|entry| entry.id != id && entry.is_live());
            }
        }

        #[cfg(feature = "tracing")]
        trace!(id = self.id.get(), "observable: subscription cancelled");

        // Captured state may own other handles on this container, so drop it
        // only after the container borrow is released.
        drop(callback);
    }
}

/// A shared value that notifies subscribers on every assignment.
///
/// Cloning an `ObservableValue` creates a new handle to the **same** inner
/// state — both handles see the same value and share subscribers.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each assignment.
/// 2. `set(v)` notifies even if `v` equals the current value.
/// 3. Subscribers are notified in registration order, exactly once per
///    assignment.
/// 4. `subscribe` never replays the current value.
pub struct ObservableValue<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

// Manual Clone: shares the same Rc.
impl<T> Clone for ObservableValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ObservableValue")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field(
                "subscriber_count",
                &inner.subscribers.iter().filter(|e| e.is_live()).count(),
            )
            .finish()
    }
}

impl<T: Default + 'static> Default for ObservableValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: 'static> ObservableValue<T> {
    /// Create a new observable with the given initial value.
    ///
    /// The initial version is 0 and no subscribers are registered.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value: Rc::new(value),
                version: 0,
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Access the current value by reference without cloning.
    ///
    /// No borrow is held while `f` runs, so `f` may assign to this observable;
    /// it keeps seeing the value that was current when `with` was called.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let value = Rc::clone(&self.inner.borrow().value);
        f(&value)
    }

    /// Replace the value and notify every active subscriber with it.
    pub fn set(&self, value: T) {
        drop(self.store(Rc::new(value)));
        self.notify();
    }

    /// Register `callback` for every subsequent assignment.
    ///
    /// The callback is not invoked with the current value. The returned
    /// [`Subscription`] owns the registration: cancelling or dropping it
    /// detaches the callback.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let callback: Callback<T> = Rc::new(callback);
        let mut inner = self.inner.borrow_mut();
        inner.prune();
        let id = SubscriptionId::new(inner.next_id);
        inner.next_id += 1;

        let binding = Rc::new(Binding {
            id,
            callback: RefCell::new(Some(callback)),
            owner: Rc::downgrade(&self.inner),
        });
        inner.subscribers.push(Entry {
            id,
            binding: Rc::downgrade(&binding),
        });
        drop(inner);

        #[cfg(feature = "tracing")]
        trace!(id = id.get(), "observable: subscribe");

        Subscription::new(binding)
    }

    /// Whether at least one active subscription is registered.
    ///
    /// Meant for tests and diagnostics; do not gate behavior on it.
    #[must_use]
    pub fn is_in_use(&self) -> bool {
        self.inner.borrow().subscribers.iter().any(Entry::is_live)
    }

    /// Number of active subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|entry| entry.is_live())
            .count()
    }

    /// Current version number. Increments by 1 on each assignment.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    fn store(&self, value: Rc<T>) -> Rc<T> {
        let mut inner = self.inner.borrow_mut();
        inner.version += 1;
        std::mem::replace(&mut inner.value, value)
    }

    /// Notify live subscribers and prune dead ones.
    ///
    /// A panicking subscriber does not stop the cycle; the first panic is
    /// resumed once every snapshot entry has been invoked.
    fn notify(&self) {
        // Snapshot under the borrow, then call out with no borrow held.
        let (value, snapshot) = {
            let mut inner = self.inner.borrow_mut();
            inner.prune();
            let snapshot: Vec<Rc<Binding<T>>> =
                inner.subscribers.iter().filter_map(Entry::upgrade).collect();
            (Rc::clone(&inner.value), snapshot)
        };

        #[cfg(feature = "tracing")]
        trace!(subscribers = snapshot.len(), "observable: notify");

        let mut first_panic = None;
        for binding in &snapshot {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| binding.invoke(&value)));
            if let Err(payload) = outcome {
                first_panic.get_or_insert(payload);
            }
        }
        if let Some(payload) = first_panic {
            panic::resume_unwind(payload);
        }
    }
}

impl<T: Clone + 'static> ObservableValue<T> {
    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        T::clone(&self.inner.borrow().value)
    }

    /// Like [`set`](Self::set), returning the value that was replaced.
    pub fn replace(&self, value: T) -> T {
        let previous = self.store(Rc::new(value));
        self.notify();
        Rc::try_unwrap(previous).unwrap_or_else(|shared| T::clone(&shared))
    }

    /// Modify the value in place via a closure, then notify subscribers.
    ///
    /// # Panics
    ///
    /// Panics if `f` accesses this observable.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        {
            let mut inner = self.inner.borrow_mut();
            f(Rc::make_mut(&mut inner.value));
            inner.version += 1;
        }
        self.notify();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
