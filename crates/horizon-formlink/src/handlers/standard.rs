//! The standard bi-directional binding for text-like inputs.

use horizon_formlink_core::{ModelRef, Value};

use crate::config::ElementKind;
use crate::convention::BindingHandler;
use crate::element::FormView;
use crate::mediator::mediator_for;
use crate::path::{self, AttributePath};
use crate::selector::Selector;
use crate::session::BindingSession;

/// Binds text, textarea, password, and the HTML5 text-like input types.
///
/// Each element classifies by tag name, or by its `type` attribute for
/// inputs (defaulting to text when absent or empty); one element binds one
/// attribute path. Values pass through the element's mediator in both
/// directions. On reconciliation the element seeds the model only when its
/// current value is non-empty.
#[derive(Debug, Default)]
pub struct StandardBinding;

impl BindingHandler for StandardBinding {
    fn bind(
        &self,
        selector: &Selector,
        view: &FormView,
        model: &ModelRef,
        session: &BindingSession,
    ) {
        for element in view.select(selector) {
            let Some(kind) = ElementKind::classify(&element) else {
                continue;
            };
            let Some(attr_name) = session.config().binding_value(&element, kind) else {
                tracing::trace!(
                    target: "horizon_formlink::handlers",
                    tag = element.tag(),
                    "no binding attribute configured, skipping element"
                );
                continue;
            };
            let path = AttributePath::parse(attr_name.as_str());
            let mediator = mediator_for(&element);

            // model -> element
            let element_mc = element.clone();
            let mediator_mc = mediator.clone();
            session.register_model_binding(model, &attr_name, move |value| {
                element_mc.set_value(mediator_mc.render(value).to_field_string());
            });

            // element -> model
            let model_ec = model.clone();
            let path_ec = path.clone();
            let mediator_ec = mediator.clone();
            let element_ec = element.clone();
            session.register_element_binding(&element, move |_| {
                let parsed = mediator_ec.parse(&Value::Str(element_ec.value()));
                path::set(&model_ec, &path_ec, parsed);
            });

            // Reconcile: a defined model value wins, else the element seeds.
            let current = path::resolve(model, &path);
            if current.is_defined() {
                element.set_value(mediator.render(&current).to_field_string());
            } else {
                let element_value = element.value();
                if !element_value.is_empty() {
                    path::set(model, &path, mediator.parse(&Value::Str(element_value)));
                }
            }
        }
    }
}
