//! The binding session.
//!
//! A [`BindingSession`] pairs one view with one model for the view's binding
//! lifetime. [`bind`](BindingSession::bind) runs every registered convention
//! against the view; every listener a handler registers lands in the
//! session's ledger as an owned subscription token, and
//! [`unbind`](BindingSession::unbind) drains the ledger, releasing each token
//! exactly once. Registrations and removals are symmetric by construction:
//! no listener outlives its session.

use parking_lot::Mutex;

use horizon_formlink_core::{EventSubscription, ModelRef, Value};

use crate::config::{BindingConfig, BindingOptions};
use crate::convention::ConventionRegistry;
use crate::element::{CHANGE_EVENT, ElementRef, FormView};

struct ModelBindingRecord {
    model: ModelRef,
    subscription: EventSubscription,
}

struct ElementBindingRecord {
    element: ElementRef,
    subscription: EventSubscription,
}

/// One view's binding lifetime: configuration, conventions, and the ledger.
pub struct BindingSession {
    view: FormView,
    model: ModelRef,
    config: BindingConfig,
    conventions: ConventionRegistry,
    model_bindings: Mutex<Vec<ModelBindingRecord>>,
    element_bindings: Mutex<Vec<ElementBindingRecord>>,
}

impl BindingSession {
    /// Create a session with default configuration and the standard
    /// conventions. The session is not yet bound.
    pub fn new(view: FormView, model: ModelRef) -> Self {
        Self::with_options(view, model, BindingOptions::new())
    }

    /// Create a session with configuration overrides.
    pub fn with_options(view: FormView, model: ModelRef, options: BindingOptions) -> Self {
        Self::with_conventions(view, model, options, ConventionRegistry::standard())
    }

    /// Create a session with configuration overrides and a custom registry.
    pub fn with_conventions(
        view: FormView,
        model: ModelRef,
        options: BindingOptions,
        conventions: ConventionRegistry,
    ) -> Self {
        Self {
            view,
            model,
            config: BindingConfig::new(options),
            conventions,
            model_bindings: Mutex::new(Vec::new()),
            element_bindings: Mutex::new(Vec::new()),
        }
    }

    /// The bound view.
    pub fn view(&self) -> &FormView {
        &self.view
    }

    /// The bound model.
    pub fn model(&self) -> &ModelRef {
        &self.model
    }

    /// The session's binding configuration.
    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    /// The number of listeners currently recorded in the ledger.
    pub fn binding_count(&self) -> usize {
        self.model_bindings.lock().len() + self.element_bindings.lock().len()
    }

    /// Run every registered convention against the view, in registry order.
    pub fn bind(&self) {
        tracing::debug!(
            target: "horizon_formlink::session",
            conventions = self.conventions.len(),
            elements = self.view.element_count(),
            "binding view"
        );
        let conventions = self.conventions.entries().to_vec();
        for convention in conventions {
            tracing::trace!(
                target: "horizon_formlink::session",
                convention = convention.name(),
                "running convention"
            );
            convention
                .handler()
                .bind(convention.selector(), &self.view, &self.model, self);
        }
    }

    /// Drain the ledger, releasing every recorded listener.
    ///
    /// Exhaustive and idempotent; a session with no bindings is a no-op.
    pub fn unbind(&self) {
        let element_records: Vec<_> = {
            let mut ledger = self.element_bindings.lock();
            ledger.drain(..).collect()
        };
        let model_records: Vec<_> = {
            let mut ledger = self.model_bindings.lock();
            ledger.drain(..).collect()
        };
        tracing::debug!(
            target: "horizon_formlink::session",
            element_listeners = element_records.len(),
            model_listeners = model_records.len(),
            "unbinding view"
        );
        for record in element_records {
            record.element.off(record.subscription);
        }
        for record in model_records {
            record.model.off(record.subscription);
        }
    }

    // -------------------------------------------------------------------------
    // Registration surface used by handlers
    // -------------------------------------------------------------------------

    /// Listen for changes of one model attribute (`change:<attr>`).
    pub fn register_model_binding<F>(&self, model: &ModelRef, attr: &str, callback: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let subscription = model.on(&format!("change:{attr}"), callback);
        self.model_bindings.lock().push(ModelBindingRecord {
            model: model.clone(),
            subscription,
        });
    }

    /// Listen for an arbitrary named model event.
    ///
    /// Used by the declarative handler, whose bindings may target any event
    /// name rather than the `change:<attr>` convention.
    pub fn register_event_binding<F>(&self, model: &ModelRef, event: &str, callback: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let subscription = model.on(event, callback);
        self.model_bindings.lock().push(ModelBindingRecord {
            model: model.clone(),
            subscription,
        });
    }

    /// Listen for an element's `change` event.
    pub fn register_element_binding<F>(&self, element: &ElementRef, callback: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let subscription = element.on(CHANGE_EVENT, callback);
        self.element_bindings.lock().push(ElementBindingRecord {
            element: element.clone(),
            subscription,
        });
    }
}

static_assertions::assert_impl_all!(BindingSession: Send, Sync);

/// Bind a view to a model with default configuration.
///
/// Constructs a session, runs its bind pass, and returns it; dropping the
/// session without calling [`BindingSession::unbind`] leaves the listeners
/// attached, so keep the session for the view's lifetime.
pub fn bind(view: &FormView, model: &ModelRef) -> BindingSession {
    bind_with(view, model, BindingOptions::new())
}

/// Bind a view to a model with configuration overrides.
pub fn bind_with(view: &FormView, model: &ModelRef, options: BindingOptions) -> BindingSession {
    let session = BindingSession::with_options(view.clone(), model.clone(), options);
    session.bind();
    session
}
