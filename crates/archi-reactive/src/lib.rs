#![forbid(unsafe_code)]

//! Reactive value bindings for archi.
//!
//! This crate provides the change-notification primitive the model and
//! view-model layers are wired with:
//!
//! - [`ObservableValue`]: A shared value box that synchronously notifies its
//!   subscribers on every assignment.
//! - [`Subscription`]: RAII handle that detaches its callback on `cancel()`
//!   or on drop.
//!
//! # Architecture
//!
//! `ObservableValue<T>` uses `Rc<RefCell<..>>` for single-threaded shared
//! ownership. The container keeps only `Weak` references to subscription
//! entries; the single strong reference lives in the [`Subscription`] handle.
//! Whoever holds the handle owns the lifetime of the callback.
//!
//! # Invariants
//!
//! 1. Every assignment notifies each active subscriber exactly once, in
//!    registration order, before the assignment returns.
//! 2. Assigning a value equal to the current one still notifies.
//! 3. A cancelled or dropped [`Subscription`] is never invoked again, even if
//!    it is removed in the middle of a notification cycle.
//! 4. Subscriptions never keep their container alive, and dropping the
//!    container turns outstanding subscriptions inert.

pub mod observable;
pub mod subscription;

pub use observable::ObservableValue;
pub use subscription::{Subscription, SubscriptionId, SubscriptionState};
