use crate::model::client::{Client, ClientId, ClientShort};
use crate::model::field::ClientField;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};

/// Payload broadcast to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum RepoEvent {
    /// A page of projections was read.
    Listed(Vec<ClientShort>),
    /// One client was read by id.
    Loaded(Client),
    /// A client was persisted with its freshly assigned id.
    Added(Client),
    /// A client's fields were overwritten in place.
    Replaced(Client),
    /// The client with this id no longer exists.
    Deleted(ClientId),
    /// Persisted order was rewritten by ascending `field`.
    Reordered(ClientField),
}

impl RepoEvent {
    /// Stable event name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Listed(_) => "listed",
            Self::Loaded(_) => "loaded",
            Self::Added(_) => "added",
            Self::Replaced(_) => "replaced",
            Self::Deleted(_) => "deleted",
            Self::Reordered(_) => "reordered",
        }
    }
}

/// Failure reported by a subscriber while handling an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserverError(pub String);

impl Display for ObserverError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "observer failed: {}", self.0)
    }
}

impl Error for ObserverError {}

/// Anything that wants to hear about repository changes.
pub trait Observer {
    fn on_event(&self, event: &RepoEvent) -> Result<(), ObserverError>;
}

impl<F> Observer for F
where
    F: Fn(&RepoEvent) -> Result<(), ObserverError>,
{
    fn on_event(&self, event: &RepoEvent) -> Result<(), ObserverError> {
        self(event)
    }
}

/// Ordered subscriber list with synchronous delivery.
#[derive(Default)]
pub struct NotificationChannel {
    observers: Vec<Arc<dyn Observer>>,
}

impl NotificationChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `observer`; re-subscribing the same instance is a no-op.
    ///
    /// Returns whether the observer was newly added.
    pub fn subscribe(&mut self, observer: Arc<dyn Observer>) -> bool {
        if self.position_of(&observer).is_some() {
            return false;
        }
        self.observers.push(observer);
        true
    }

    /// Removes `observer`; removing an absent observer is a no-op.
    ///
    /// Returns whether anything was removed.
    pub fn unsubscribe(&mut self, observer: &Arc<dyn Observer>) -> bool {
        match self.position_of(observer) {
            Some(index) => {
                self.observers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Delivers `event` to every subscriber in subscription order.
    pub fn publish(&self, event: &RepoEvent) -> Result<(), ObserverError> {
        debug!(
            "event=notify module=notify status=start kind={} subscribers={}",
            event.name(),
            self.observers.len()
        );
        for observer in &self.observers {
            observer.on_event(event)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    fn position_of(&self, observer: &Arc<dyn Observer>) -> Option<usize> {
        self.observers
            .iter()
            .position(|known| std::ptr::addr_eq(Arc::as_ptr(known), Arc::as_ptr(observer)))
    }
}

/// Observer that keeps the most recent payload, as a view's state holder.
#[derive(Default)]
pub struct LatestEventObserver {
    latest: Mutex<Option<RepoEvent>>,
}

impl LatestEventObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the last delivered event, if any.
    pub fn latest(&self) -> Option<RepoEvent> {
        match self.latest.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Observer for LatestEventObserver {
    fn on_event(&self, event: &RepoEvent) -> Result<(), ObserverError> {
        let mut guard = self
            .latest
            .lock()
            .map_err(|_| ObserverError("latest-event state is poisoned".to_string()))?;
        *guard = Some(event.clone());
        Ok(())
    }
}
