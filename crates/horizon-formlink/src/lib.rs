//! Bi-directional form/model data binding for Horizon applications.
//!
//! Formlink synchronizes form elements with attributes on an observable
//! model. A [`BindingSession`] scans a view's elements, classifies each one
//! into a binding convention, derives the bound attribute path from element
//! metadata, and wires change listeners in both directions:
//!
//! - **Conventions** ([`convention`]): an ordered registry of
//!   (selector, handler) rules deciding which elements bind and how
//! - **Configuration** ([`config`]): which metadata attribute carries the
//!   bound path for each element kind, with process-wide defaults
//! - **Paths** ([`path`]): dotted attribute paths resolved through nested
//!   model graphs for reads and writes
//! - **Mediators** ([`mediator`]): optional per-element parse/render
//!   transforms between element text and stored values
//! - **Sessions** ([`session`]): the bind/unbind lifecycle and the listener
//!   ledger guaranteeing symmetric teardown
//!
//! # Example
//!
//! ```
//! use horizon_formlink::{AttributeModel, FormElement, FormView, Value, bind};
//!
//! let view = FormView::new();
//! let name_field = view.add(FormElement::input("text").with_attr("id", "name"));
//!
//! let person = AttributeModel::with_attributes([("name", Value::from("Ann"))]);
//!
//! let session = bind(&view, &person);
//!
//! // The model value reached the element.
//! assert_eq!(name_field.value(), "Ann");
//!
//! // A user edit reaches the model.
//! name_field.edit("Bea");
//! assert_eq!(person.get("name"), Value::from("Bea"));
//!
//! session.unbind();
//! ```

pub mod config;
pub mod convention;
pub mod element;
pub mod error;
pub mod handlers;
pub mod mediator;
pub mod path;
pub mod selector;
pub mod session;

pub use config::{
    BindingConfig, BindingOptions, DEFAULT_SUBSTITUTION, ElementKind,
    configure_all_binding_attributes, configure_binding_attributes,
    configure_data_bind_substitutions, data_bind_substitution, restore_binding_attributes,
    restore_data_bind_substitutions, store_binding_attributes, store_data_bind_substitutions,
};
pub use convention::{BindingHandler, Convention, ConventionRegistry};
pub use element::{CHANGE_EVENT, ElementRef, FormElement, FormView, SelectOption};
pub use error::{Error, Result};
pub use handlers::{
    CheckboxBinding, DataBindBinding, DataBindEntry, RadioGroupBinding, SelectBoxBinding,
    StandardBinding,
};
pub use mediator::{MEDIATOR_ATTR, Mediator, mediator_for, mediator_named, register_mediator};
pub use path::{AttributePath, AttributeSetter, WriteCursor, descend, resolve, set};
pub use selector::Selector;
pub use session::{BindingSession, bind, bind_with};

// Re-export the core types a binding caller works with directly.
pub use horizon_formlink_core::{
    AttributeModel, EventHub, EventSubscription, ModelRef, Value, ValueMap,
};
