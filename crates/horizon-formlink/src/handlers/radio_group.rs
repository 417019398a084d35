//! The radio-group binding.

use std::collections::HashSet;

use horizon_formlink_core::{ModelRef, Value};

use crate::config::ElementKind;
use crate::convention::BindingHandler;
use crate::element::FormView;
use crate::path::{self, AttributePath};
use crate::selector::Selector;
use crate::session::BindingSession;

/// Binds radio inputs as groups.
///
/// Elements sharing a classification-derived group name bind as one unit:
/// each group is processed exactly once per bind pass regardless of how many
/// members the selector matches. A model change checks the member whose
/// `value` attribute equals the new value; an element change stores whichever
/// member is checked. Group values are flat and write directly through the
/// model's generic set, bypassing custom-setter dispatch.
#[derive(Debug, Default)]
pub struct RadioGroupBinding;

impl BindingHandler for RadioGroupBinding {
    fn bind(
        &self,
        selector: &Selector,
        view: &FormView,
        model: &ModelRef,
        session: &BindingSession,
    ) {
        let mut processed: HashSet<String> = HashSet::new();
        for element in view.select(selector) {
            let Some(group) = session.config().binding_value(&element, ElementKind::Radio)
            else {
                continue;
            };
            if !processed.insert(group.clone()) {
                continue;
            }
            let Some(binding_attr) = session
                .config()
                .binding_attr(ElementKind::Radio)
                .map(str::to_string)
            else {
                continue;
            };

            // model -> element: check the member carrying the new value
            let view_mc = view.clone();
            let binding_attr_mc = binding_attr.clone();
            let group_mc = group.clone();
            session.register_model_binding(model, &group, move |value| {
                let matching = Selector::input("radio")
                    .attr_eq(&binding_attr_mc, &group_mc)
                    .attr_eq("value", value.to_field_string());
                for radio in view_mc.select(&matching) {
                    radio.set_checked(true);
                }
            });

            // element -> model: every member reports through one callback shape
            let members = Selector::input("radio").attr_eq(&binding_attr, &group);
            for member in view.select(&members) {
                let model_ec = model.clone();
                let group_ec = group.clone();
                let member_ec = member.clone();
                session.register_element_binding(&member, move |_| {
                    if member_ec.is_checked() {
                        model_ec.set_attr(group_ec.clone(), Value::Str(member_ec.value()));
                    }
                });
            }

            // Reconcile
            let current = path::resolve(model, &AttributePath::parse(group.as_str()));
            if current.is_defined() {
                let matching = Selector::input("radio")
                    .attr_eq(&binding_attr, &group)
                    .attr_eq("value", current.to_field_string());
                for radio in view.select(&matching) {
                    radio.set_checked(true);
                }
            } else {
                // Seed from whichever member is checked; with none checked the
                // seed is undefined and the set is a silent no-op.
                let checked = Selector::input("radio")
                    .attr_eq(&binding_attr, &group)
                    .checked(true);
                let seed = view
                    .select(&checked)
                    .first()
                    .map(|radio| Value::Str(radio.value()))
                    .unwrap_or(Value::Undefined);
                model.set_attr(group, seed);
            }
        }
    }
}
