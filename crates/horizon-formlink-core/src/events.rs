//! Named-event hub.
//!
//! Models and form elements expose a dynamic event surface: listeners
//! subscribe to events by name (`"change:city"`, `"change"`, or any custom
//! name fired through a trigger), and every subscription is represented by an
//! owned [`EventSubscription`] token. The token is the capability to
//! unsubscribe: it is created by [`EventHub::connect`] and consumed exactly
//! once by [`EventHub::disconnect`], which is what lets the binding session's
//! listener ledger guarantee symmetric teardown.
//!
//! Internally each event name owns one [`Signal<Value>`]; signals are created
//! on first subscription and emitting an event nobody listens to is a no-op.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::signal::{ConnectionId, Signal};
use crate::value::Value;

/// An owned handle to one event subscription.
///
/// Deliberately neither `Clone` nor `Copy`: whoever holds the token owns the
/// subscription, and handing it to [`EventHub::disconnect`] releases it.
#[derive(Debug)]
pub struct EventSubscription {
    event: String,
    id: ConnectionId,
}

impl EventSubscription {
    /// The event name this subscription listens to.
    pub fn event(&self) -> &str {
        &self.event
    }
}

/// A set of named signals with subscription bookkeeping.
#[derive(Default)]
pub struct EventHub {
    signals: Mutex<HashMap<String, Arc<Signal<Value>>>>,
}

impl EventHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    fn signal_for(&self, event: &str) -> Arc<Signal<Value>> {
        self.signals
            .lock()
            .entry(event.to_string())
            .or_insert_with(|| Arc::new(Signal::new()))
            .clone()
    }

    /// Subscribe a listener to a named event.
    pub fn connect<F>(&self, event: &str, listener: F) -> EventSubscription
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let id = self.signal_for(event).connect(listener);
        EventSubscription {
            event: event.to_string(),
            id,
        }
    }

    /// Release a subscription, consuming its token.
    ///
    /// Returns `true` if the subscription was still active.
    pub fn disconnect(&self, subscription: EventSubscription) -> bool {
        let signal = self.signals.lock().get(&subscription.event).cloned();
        match signal {
            Some(signal) => signal.disconnect(subscription.id),
            None => false,
        }
    }

    /// Fire a named event, invoking every listener with `value`.
    pub fn emit(&self, event: &str, value: Value) {
        let signal = self.signals.lock().get(event).cloned();
        if let Some(signal) = signal {
            tracing::trace!(
                target: "horizon_formlink_core::events",
                event,
                "dispatching event"
            );
            signal.emit(value);
        }
    }

    /// The number of listeners on one event name.
    pub fn listener_count(&self, event: &str) -> usize {
        self.signals
            .lock()
            .get(event)
            .map_or(0, |signal| signal.connection_count())
    }

    /// The number of listeners across every event name.
    pub fn total_listeners(&self) -> usize {
        self.signals
            .lock()
            .values()
            .map(|signal| signal.connection_count())
            .sum()
    }
}

static_assertions::assert_impl_all!(EventHub: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_emit() {
        let hub = EventHub::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        hub.connect("change:name", move |value| {
            received_clone.lock().push(value.clone());
        });

        hub.emit("change:name", Value::from("Ann"));
        hub.emit("change:other", Value::from("ignored"));

        assert_eq!(*received.lock(), vec![Value::from("Ann")]);
    }

    #[test]
    fn test_disconnect_consumes_token() {
        let hub = EventHub::new();
        let count = Arc::new(Mutex::new(0));

        let count_clone = count.clone();
        let subscription = hub.connect("ping", move |_| {
            *count_clone.lock() += 1;
        });

        hub.emit("ping", Value::Undefined);
        assert!(hub.disconnect(subscription));
        hub.emit("ping", Value::Undefined);

        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_emit_without_listeners_is_noop() {
        let hub = EventHub::new();
        hub.emit("nobody-home", Value::Int(1));
        assert_eq!(hub.listener_count("nobody-home"), 0);
    }

    #[test]
    fn test_listener_counts() {
        let hub = EventHub::new();
        let a = hub.connect("a", |_| {});
        let _b = hub.connect("a", |_| {});
        let _c = hub.connect("b", |_| {});

        assert_eq!(hub.listener_count("a"), 2);
        assert_eq!(hub.listener_count("b"), 1);
        assert_eq!(hub.total_listeners(), 3);

        assert!(hub.disconnect(a));
        assert_eq!(hub.total_listeners(), 2);
    }
}
