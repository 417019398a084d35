//! The checkbox binding.

use horizon_formlink_core::{ModelRef, Value};

use crate::config::ElementKind;
use crate::convention::BindingHandler;
use crate::element::FormView;
use crate::path::{self, AttributePath, AttributeSetter};
use crate::selector::Selector;
use crate::session::BindingSession;

/// Binds checkbox inputs to boolean attributes.
///
/// Reconciliation is asymmetric from the other handlers: when the model
/// holds a defined value, anything other than `false` checks the element;
/// only with no model value does the element's checked state seed the model.
#[derive(Debug, Default)]
pub struct CheckboxBinding;

impl BindingHandler for CheckboxBinding {
    fn bind(
        &self,
        selector: &Selector,
        view: &FormView,
        model: &ModelRef,
        session: &BindingSession,
    ) {
        for element in view.select(selector) {
            let Some(attr_name) = session
                .config()
                .binding_value(&element, ElementKind::Checkbox)
            else {
                continue;
            };

            // model -> element
            let element_mc = element.clone();
            session.register_model_binding(model, &attr_name, move |value| {
                element_mc.set_checked(value.is_truthy());
            });

            // element -> model
            let model_ec = model.clone();
            let attr_ec = attr_name.clone();
            let element_ec = element.clone();
            session.register_element_binding(&element, move |_| {
                AttributeSetter::apply_one(
                    &model_ec,
                    attr_ec.clone(),
                    Value::Bool(element_ec.is_checked()),
                );
            });

            // Reconcile
            let current = path::resolve(model, &AttributePath::parse(attr_name.as_str()));
            if current.is_defined() {
                element.set_checked(!matches!(current, Value::Bool(false)));
            } else {
                AttributeSetter::apply_one(model, attr_name, Value::Bool(element.is_checked()));
            }
        }
    }
}
