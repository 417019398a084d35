//! Binding conventions.
//!
//! A convention pairs an element [`Selector`] with the [`BindingHandler`]
//! strategy that binds whatever the selector matches. A session iterates its
//! [`ConventionRegistry`] in registration order, so earlier conventions see
//! the view first; within one convention, elements bind in document order.
//!
//! [`ConventionRegistry::standard`] registers the built-in conventions: the
//! standard text-like inputs, radio groups, checkboxes, select boxes, the
//! declarative `data-bind` convention, and the HTML5 input types.

use std::sync::Arc;

use horizon_formlink_core::ModelRef;

use crate::element::FormView;
use crate::handlers::{
    CheckboxBinding, DataBindBinding, RadioGroupBinding, SelectBoxBinding, StandardBinding,
};
use crate::selector::Selector;
use crate::session::BindingSession;

/// A binding strategy for one element shape.
///
/// Implementations enumerate the elements matching `selector` inside `view`,
/// derive each element's bound attribute path from the session's
/// configuration, wire both binding directions through the session's
/// registration methods, and reconcile initial state.
pub trait BindingHandler: Send + Sync {
    /// Run this strategy over the view.
    fn bind(
        &self,
        selector: &Selector,
        view: &FormView,
        model: &ModelRef,
        session: &BindingSession,
    );
}

/// One (selector, handler) rule.
#[derive(Clone)]
pub struct Convention {
    name: &'static str,
    selector: Selector,
    handler: Arc<dyn BindingHandler>,
}

impl Convention {
    /// Create a convention.
    pub fn new(name: &'static str, selector: Selector, handler: Arc<dyn BindingHandler>) -> Self {
        Self {
            name,
            selector,
            handler,
        }
    }

    /// The convention's registration name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The element predicate.
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// The bound strategy.
    pub fn handler(&self) -> &Arc<dyn BindingHandler> {
        &self.handler
    }
}

/// An ordered set of binding conventions.
#[derive(Clone, Default)]
pub struct ConventionRegistry {
    entries: Vec<Convention>,
}

impl ConventionRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in conventions, in their canonical order.
    pub fn standard() -> Self {
        let standard = Arc::new(StandardBinding);
        let mut registry = Self::empty();
        registry.register(Convention::new(
            "text",
            Selector::input("text"),
            standard.clone(),
        ));
        registry.register(Convention::new(
            "textarea",
            Selector::tag("textarea"),
            standard.clone(),
        ));
        registry.register(Convention::new(
            "password",
            Selector::input("password"),
            standard.clone(),
        ));
        registry.register(Convention::new(
            "radio",
            Selector::input("radio"),
            Arc::new(RadioGroupBinding),
        ));
        registry.register(Convention::new(
            "checkbox",
            Selector::input("checkbox"),
            Arc::new(CheckboxBinding),
        ));
        registry.register(Convention::new(
            "select",
            Selector::tag("select"),
            Arc::new(SelectBoxBinding),
        ));
        registry.register(Convention::new(
            "databind",
            Selector::attr_present("data-bind"),
            Arc::new(DataBindBinding),
        ));
        // HTML5 input types
        for (name, input_type) in [
            ("number", "number"),
            ("range", "range"),
            ("tel", "tel"),
            ("search", "search"),
            ("url", "url"),
            ("email", "email"),
        ] {
            registry.register(Convention::new(
                name,
                Selector::input(input_type),
                standard.clone(),
            ));
        }
        registry
    }

    /// Append a convention.
    pub fn register(&mut self, convention: Convention) {
        self.entries.push(convention);
    }

    /// The conventions in registration order.
    pub fn entries(&self) -> &[Convention] {
        &self.entries
    }

    /// The number of registered conventions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
