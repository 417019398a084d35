//! Signal/listener system for Horizon Formlink.
//!
//! A [`Signal<Args>`] is a type-safe notification channel: listeners (closures)
//! are connected to it, and emitting the signal invokes every connected
//! listener with the emitted arguments. Signals are the building block under
//! the named-event hub ([`crate::EventHub`]) that models and form elements
//! expose.
//!
//! Dispatch is synchronous and direct: `emit` invokes every listener on the
//! calling thread before returning. Formlink is an event-driven binding layer
//! with no event loop of its own, so there is no queued or cross-thread
//! delivery here.
//!
//! # Example
//!
//! ```
//! use horizon_formlink_core::Signal;
//!
//! let name_changed = Signal::<String>::new();
//!
//! let conn_id = name_changed.connect(|name| {
//!     println!("name is now {name}");
//! });
//!
//! name_changed.emit("Ann".to_string());
//! name_changed.disconnect(conn_id);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// A unique identifier for a signal/listener connection.
    ///
    /// Returned by [`Signal::connect`] and consumed by [`Signal::disconnect`].
    /// The id stays valid until the connection is disconnected or the signal
    /// is dropped.
    pub struct ConnectionId;
}

/// A type-safe signal with any number of connected listeners.
///
/// `Args` is the argument type passed to listeners; use `()` for signals
/// without arguments. The signal is `Send + Sync` and may be shared behind an
/// `Arc`, but emission itself is always synchronous on the calling thread.
pub struct Signal<Args> {
    /// All active connections, keyed by [`ConnectionId`].
    connections: Mutex<SlotMap<ConnectionId, Arc<dyn Fn(&Args) + Send + Sync>>>,
    /// Whether emission is temporarily suppressed.
    blocked: AtomicBool,
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a listener, returning its [`ConnectionId`].
    pub fn connect<F>(&self, listener: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(listener))
    }

    /// Disconnect a listener by id.
    ///
    /// Returns `true` if the connection existed and was removed.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect every listener.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// The number of connected listeners.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Suppress or re-enable emission.
    ///
    /// While blocked, `emit` does nothing. Useful during initialization or
    /// batch updates to avoid cascading notifications.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Whether emission is currently suppressed.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking every connected listener with `args`.
    ///
    /// Listeners are invoked in an unspecified order. The connection table is
    /// not locked during dispatch, so a listener may connect or disconnect
    /// listeners (including itself) without deadlocking; such changes take
    /// effect for the next emission.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: "horizon_formlink_core::signal", "signal blocked, skipping emit");
            return;
        }

        let listeners: Vec<_> = self.connections.lock().values().cloned().collect();
        tracing::trace!(
            target: "horizon_formlink_core::signal",
            connection_count = listeners.len(),
            "emitting signal"
        );
        for listener in listeners {
            listener(&args);
        }
    }
}
