//! Subscriber Module
//!
//! Fan-out of cache mutations to registered listeners. Each listener is
//! isolated: an error or panic in one is reported to the notification sink
//! and delivery continues with the next.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::warn;

use crate::error::ListenerError;

/// Key delivered to subscribers when the whole cache is cleared.
pub const CLEAR_SENTINEL: &str = "*";

/// A registered change listener.
///
/// Called with the affected key (or pattern, or [`CLEAR_SENTINEL`]) and the
/// new value, which is `None` for invalidations and clears.
pub type Listener<V> = Arc<dyn Fn(&str, Option<&V>) -> anyhow::Result<()> + Send + Sync>;

// == Notification Sink ==
/// Receives listener failures. The cache never propagates them.
pub trait NotificationSink: Send + Sync {
    fn listener_failed(&self, error: ListenerError);
}

/// Default sink: logs each failure as a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn listener_failed(&self, error: ListenerError) {
        warn!(
            listener = error.listener(),
            key = error.key(),
            error = %error,
            "cache listener failed"
        );
    }
}

// == Registry ==
struct Registry<V> {
    next_id: u64,
    listeners: Vec<(u64, Listener<V>)>,
}

impl<V> Registry<V> {
    fn remove(&mut self, id: u64) {
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
    }
}

trait Unsubscribe: Send + Sync {
    fn unsubscribe(&self, id: u64);
}

impl<V> Unsubscribe for Mutex<Registry<V>> {
    fn unsubscribe(&self, id: u64) {
        self.lock().unwrap_or_else(PoisonError::into_inner).remove(id);
    }
}

// == Subscription ==
/// Disposer returned by [`SubscriberSet::subscribe`].
///
/// Dropping it does not unsubscribe; call [`Subscription::dispose`].
#[must_use = "keep the subscription to be able to unsubscribe later"]
pub struct Subscription {
    id: u64,
    registry: Weak<dyn Unsubscribe>,
}

impl Subscription {
    /// Removes exactly this listener. Calling it again, or after the cache
    /// is gone, does nothing.
    pub fn dispose(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unsubscribe(self.id);
        }
    }

    /// Registration id, also reported in [`ListenerError`].
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

// == Subscriber Set ==
/// Ordered set of listeners plus the sink their failures go to.
pub struct SubscriberSet<V> {
    registry: Arc<Mutex<Registry<V>>>,
    sink: Arc<dyn NotificationSink>,
}

impl<V: 'static> SubscriberSet<V> {
    /// Creates an empty set reporting failures to `sink`.
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 1,
                listeners: Vec::new(),
            })),
            sink,
        }
    }

    /// Replaces the sink; registered listeners are unaffected.
    pub fn set_sink(&mut self, sink: Arc<dyn NotificationSink>) {
        self.sink = sink;
    }

    fn registry(&self) -> MutexGuard<'_, Registry<V>> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a listener at the end of the delivery order.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&str, Option<&V>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let mut registry = self.registry();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Arc::new(listener)));

        let weak: Weak<Mutex<Registry<V>>> = Arc::downgrade(&self.registry);
        Subscription {
            id,
            registry: weak,
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.registry().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers one event to every listener in registration order.
    ///
    /// Listeners are snapshotted first, so a listener may dispose
    /// subscriptions while running; removals apply from the next event.
    /// Returns how many listeners failed.
    pub fn notify(&self, key: &str, value: Option<&V>) -> usize {
        let snapshot: Vec<(u64, Listener<V>)> = self.registry().listeners.clone();
        let mut failures = 0;

        for (id, listener) in snapshot {
            let error = match catch_unwind(AssertUnwindSafe(|| listener(key, value))) {
                Ok(Ok(())) => continue,
                Ok(Err(source)) => ListenerError::Failed {
                    listener: id,
                    key: key.to_string(),
                    source,
                },
                Err(payload) => ListenerError::Panicked {
                    listener: id,
                    key: key.to_string(),
                    message: panic_message(payload.as_ref()),
                },
            };
            failures += 1;
            self.sink.listener_failed(error);
        }

        failures
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
