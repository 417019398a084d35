//! The declarative `data-bind` binding.

use horizon_formlink_core::{ModelRef, Value};

use crate::config;
use crate::convention::BindingHandler;
use crate::element::{ElementRef, FormView};
use crate::error::{Error, Result};
use crate::mediator::mediator_for;
use crate::path::{self, AttributePath};
use crate::selector::Selector;
use crate::session::BindingSession;

/// The model-attribute prefix selecting a raw event binding.
const EVENT_PREFIX: &str = "event:";

/// One parsed declaration: which element attribute renders which model
/// attribute (or event).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataBindEntry {
    /// The element-side render target (`text`, `html`, `enabled`, ...).
    pub element_attr: String,
    /// The model attribute path, or an `event:<name>` reference.
    pub model_attr: String,
}

/// Parse a semicolon-separated binding declaration list.
///
/// Each declaration is `"elementAttr modelAttr"`; a bare single token binds
/// the model attribute to the element's text. Empty declarations between
/// semicolons are tolerated, but a list declaring nothing at all, a
/// declaration with more than two tokens, and an `event:` reference with no
/// event name are malformed.
pub fn parse_bindings(raw: &str) -> Result<Vec<DataBindEntry>> {
    let mut entries = Vec::new();
    for declaration in raw.split(';') {
        let declaration = declaration.trim();
        if declaration.is_empty() {
            continue;
        }
        let tokens: Vec<&str> = declaration.split_whitespace().collect();
        let entry = match tokens.as_slice() {
            [model_attr] => DataBindEntry {
                element_attr: "text".to_string(),
                model_attr: (*model_attr).to_string(),
            },
            [element_attr, model_attr] => DataBindEntry {
                element_attr: (*element_attr).to_string(),
                model_attr: (*model_attr).to_string(),
            },
            _ => {
                return Err(Error::data_bind(
                    raw,
                    format!("expected 'elementAttr modelAttr' in '{declaration}'"),
                ));
            }
        };
        if let Some(event) = entry.model_attr.strip_prefix(EVENT_PREFIX) {
            if event.is_empty() {
                return Err(Error::data_bind(raw, "empty event name"));
            }
        }
        entries.push(entry);
    }
    if entries.is_empty() {
        return Err(Error::data_bind(raw, "no bindings declared"));
    }
    Ok(entries)
}

/// Render a value onto an element, dispatched on the render-target key.
fn set_on_element(element: &ElementRef, element_attr: &str, value: Value) {
    let value = config::data_bind_substitution(element_attr, value);
    let value = mediator_for(element).render(&value);
    match element_attr {
        "html" => element.set_html(value.to_field_string()),
        "text" => element.set_text(value.to_field_string()),
        "enabled" => element.set_disabled(!value.is_truthy()),
        "displayed" => element.set_visible(value.is_truthy()),
        "hidden" => element.set_visible(!value.is_truthy()),
        other => element.set_attr(other, value.to_field_string()),
    }
}

/// Binds arbitrary elements through declarations in a metadata attribute.
///
/// The attribute parsed is the one the convention's selector requires
/// present, so a registry entry built on a different attribute name parses
/// that attribute instead. Declarations bind one-way, model to element:
/// `change:<attr>` listeners for attribute paths and raw listeners for
/// `event:<name>` references, both rendering through the substitution table
/// and the element's mediator. Every declaration renders once at bind time
/// by resolving its declared name as a path, so event references (which
/// resolve to nothing) render the configured substitution. Elements with
/// malformed declarations are skipped.
#[derive(Debug, Default)]
pub struct DataBindBinding;

impl BindingHandler for DataBindBinding {
    fn bind(
        &self,
        selector: &Selector,
        view: &FormView,
        model: &ModelRef,
        session: &BindingSession,
    ) {
        let Some(bind_attr) = selector.required_attr() else {
            tracing::debug!(
                target: "horizon_formlink::handlers",
                "declarative convention has no required attribute, nothing to parse"
            );
            return;
        };
        for element in view.select(selector) {
            let Some(raw) = element.attr(bind_attr) else {
                continue;
            };
            let entries = match parse_bindings(&raw) {
                Ok(entries) => entries,
                Err(error) => {
                    tracing::debug!(
                        target: "horizon_formlink::handlers",
                        %error,
                        "skipping element with malformed data-bind attribute"
                    );
                    continue;
                }
            };
            for entry in entries {
                let element_cb = element.clone();
                let element_attr = entry.element_attr.clone();
                let callback = move |value: &Value| {
                    set_on_element(&element_cb, &element_attr, value.clone());
                };
                match entry.model_attr.strip_prefix(EVENT_PREFIX) {
                    Some(event) => session.register_event_binding(model, event, callback),
                    None => session.register_event_binding(
                        model,
                        &format!("change:{}", entry.model_attr),
                        callback,
                    ),
                }

                let initial =
                    path::resolve(model, &AttributePath::parse(entry.model_attr.as_str()));
                set_on_element(&element, &entry.element_attr, initial);
            }
        }
    }
}
