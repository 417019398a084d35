//! Core primitives for Horizon Formlink.
//!
//! This crate provides the foundations the form/model binding engine is built
//! on:
//!
//! - **Signals**: type-safe listener channels with connection bookkeeping
//! - **Named events**: the [`EventHub`] surface models and elements expose,
//!   with owned [`EventSubscription`] tokens
//! - **Values**: the dynamically-typed [`Value`] attribute type and the
//!   shared [`ValueMap`] container
//! - **Models**: the observable [`AttributeModel`] with compare-before-notify
//!   change events, computed accessors, and custom setters
//!
//! # Example
//!
//! ```
//! use horizon_formlink_core::{AttributeModel, Value};
//!
//! let person = AttributeModel::new();
//!
//! let subscription = person.on("change:name", |value| {
//!     println!("name is now {}", value.to_field_string());
//! });
//!
//! person.set_attr("name", Value::from("Ann"));
//!
//! person.off(subscription);
//! ```

pub mod events;
pub mod model;
pub mod signal;
pub mod value;

pub use events::{EventHub, EventSubscription};
pub use model::{
    AccessorFn, AttributeModel, DirectAttribute, ID_ATTRIBUTE, ModelRef, SetterFn,
};
pub use signal::{ConnectionId, Signal};
pub use value::{Value, ValueMap};
