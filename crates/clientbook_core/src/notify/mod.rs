//! Synchronous publish/subscribe between repositories and their watchers.
//!
//! # Responsibility
//! - Keep an ordered subscriber list per publisher.
//! - Deliver every payload on the caller's stack before returning.
//!
//! # Invariants
//! - Delivery order equals subscription order.
//! - A subscriber is registered at most once (pointer identity).
//! - The first failing subscriber stops delivery and its error is returned.

mod channel;

pub use channel::{LatestEventObserver, NotificationChannel, Observer, ObserverError, RepoEvent};
