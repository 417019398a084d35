//! Binding handlers.
//!
//! One strategy per element shape, each implementing the shared protocol:
//! enumerate matching elements, derive the bound attribute path from element
//! metadata (skipping elements with none), wire a model-change listener and
//! an element-change listener through the session, and reconcile initial
//! state with the model as the authoritative source when it holds a defined
//! value and the element as the seed otherwise.

mod checkbox;
mod data_bind;
mod radio_group;
mod select_box;
mod standard;

pub use checkbox::CheckboxBinding;
pub use data_bind::{DataBindBinding, DataBindEntry, parse_bindings};
pub use radio_group::RadioGroupBinding;
pub use select_box::SelectBoxBinding;
pub use standard::StandardBinding;
