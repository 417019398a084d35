//! The select-box binding.

use horizon_formlink_core::{ModelRef, Value};

use crate::config::ElementKind;
use crate::convention::BindingHandler;
use crate::element::FormView;
use crate::path::{self, AttributePath};
use crate::selector::Selector;
use crate::session::BindingSession;

/// Binds `<select>` elements.
///
/// Follows the standard protocol without mediation, with one addition: when
/// the element changes, the selected option's display label is stored at
/// `path + "_text"` next to the value, so a UI can keep a human-readable
/// label beside a coded value. Initial seeding writes both the same way.
#[derive(Debug, Default)]
pub struct SelectBoxBinding;

fn store_selection(model: &ModelRef, path: &AttributePath, value: String, text: String) {
    let cursor = path::descend(model, path);
    cursor.insert(path.last().to_string(), Value::Str(value));
    cursor.insert(format!("{}_text", path.last()), Value::Str(text));
    cursor.commit();
}

impl BindingHandler for SelectBoxBinding {
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
                .binding_value(&element, ElementKind::Select)
            else {
                continue;
            };
            let path = AttributePath::parse(attr_name.as_str());

            // model -> element
            let element_mc = element.clone();
            session.register_model_binding(model, &attr_name, move |value| {
                element_mc.set_value(value.to_field_string());
            });

            // element -> model, capturing the selected label
            let model_ec = model.clone();
            let path_ec = path.clone();
            let element_ec = element.clone();
            session.register_element_binding(&element, move |_| {
                store_selection(
                    &model_ec,
                    &path_ec,
                    element_ec.value(),
                    element_ec.selected_text(),
                );
            });

            // Reconcile
            let current = path::resolve(model, &path);
            if current.is_defined() {
                element.set_value(current.to_field_string());
            } else {
                store_selection(model, &path, element.value(), element.selected_text());
            }
        }
    }
}
