#![forbid(unsafe_code)]

//! Cancellation handles returned by [`ObservableValue::subscribe`].
//!
//! A [`Subscription`] is type-erased: it does not carry the value type of the
//! container it was issued by, so handles from different containers can be
//! stored side by side (for example in a `Vec<Subscription>` owned by a
//! view-model).
//!
//! [`ObservableValue::subscribe`]: crate::ObservableValue::subscribe

use std::fmt;
use std::rc::Rc;

/// Identity of a subscription within its container.
///
/// Allocated from a per-container counter, so two subscriptions with
/// identical callbacks are still distinct entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value of the id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Lifecycle of a [`Subscription`]. `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    /// The callback receives every subsequent assignment.
    Active,
    /// The callback was released and will never run again.
    Cancelled,
}

/// Container-side half of a subscription, seen through a type-erased handle.
pub(crate) trait Detach {
    fn id(&self) -> SubscriptionId;

    /// Whether the callback is still held.
    fn is_attached(&self) -> bool;

    /// Release the callback and unregister from the container. Idempotent.
    fn detach(&self);
}

/// RAII handle for a registered callback.
///
/// Dropping the handle cancels the subscription. Keep it alive for as long
/// as notifications are wanted; `let _ = value.subscribe(..)` unsubscribes
/// immediately.
#[must_use = "dropping a Subscription cancels it immediately"]
pub struct Subscription {
    binding: Rc<dyn Detach>,
}

impl Subscription {
    pub(crate) fn new(binding: Rc<dyn Detach>) -> Self {
        Self { binding }
    }

    /// Identity of this subscription within its container.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.binding.id()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SubscriptionState {
        if self.binding.is_attached() {
            SubscriptionState::Active
        } else {
            SubscriptionState::Cancelled
        }
    }

    /// Whether the callback will receive future assignments.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state() == SubscriptionState::Active
    }

    /// Stop receiving notifications.
    ///
    /// The callback (and everything it captured) is released before this
    /// returns. Calling `cancel` again, or after the container was dropped,
    /// does nothing. Safe to call from inside any callback, including the
    /// subscription's own.
    pub fn cancel(&self) {
        self.binding.detach();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.binding.detach();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id())
            .field("state", &self.state())
            .finish()
    }
}
