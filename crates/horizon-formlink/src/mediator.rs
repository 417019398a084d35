//! Value mediators.
//!
//! A [`Mediator`] is a pair of pure transforms applied to a value crossing
//! the element/model boundary: `parse` turns the raw element value into the
//! stored model value, and `render` turns the stored value back into element
//! text. The default mediator is the identity in both directions.
//!
//! Mediators are registered process-wide under a name, and an element opts in
//! by naming one in its `data-mediator` attribute. Looking up an element with
//! no such attribute, or one naming an unregistered mediator, yields the
//! identity pair rather than an error.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use horizon_formlink_core::Value;

use crate::element::FormElement;

/// The metadata attribute naming an element's mediator.
pub const MEDIATOR_ATTR: &str = "data-mediator";

type TransformFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// A parse/render transform pair.
#[derive(Clone)]
pub struct Mediator {
    parse: TransformFn,
    render: TransformFn,
}

impl Mediator {
    /// Create a mediator from a parse and a render transform.
    pub fn new<P, R>(parse: P, render: R) -> Self
    where
        P: Fn(&Value) -> Value + Send + Sync + 'static,
        R: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self {
            parse: Arc::new(parse),
            render: Arc::new(render),
        }
    }

    /// The identity mediator.
    pub fn identity() -> Self {
        Self::new(Value::clone, Value::clone)
    }

    /// Transform a raw element value into the stored model value.
    pub fn parse(&self, value: &Value) -> Value {
        (self.parse)(value)
    }

    /// Transform a stored model value into the raw element value.
    pub fn render(&self, value: &Value) -> Value {
        (self.render)(value)
    }
}

impl Default for Mediator {
    fn default() -> Self {
        Self::identity()
    }
}

/// Registered mediators (lazy initialized).
static MEDIATORS: Mutex<Option<BTreeMap<String, Mediator>>> = Mutex::new(None);

fn with_registry<R>(f: impl FnOnce(&mut BTreeMap<String, Mediator>) -> R) -> R {
    let mut guard = MEDIATORS.lock();
    f(guard.get_or_insert_with(BTreeMap::new))
}

/// Register a mediator process-wide under a name.
pub fn register_mediator(name: impl Into<String>, mediator: Mediator) {
    with_registry(|registry| {
        registry.insert(name.into(), mediator);
    });
}

/// Look up a mediator by name, falling back to identity.
pub fn mediator_named(name: &str) -> Mediator {
    with_registry(|registry| registry.get(name).cloned()).unwrap_or_else(Mediator::identity)
}

/// The mediator an element opted into, or identity.
pub fn mediator_for(element: &FormElement) -> Mediator {
    match element.attr(MEDIATOR_ATTR) {
        Some(name) => mediator_named(&name),
        None => Mediator::identity(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_default() {
        let element = FormElement::input("text");
        let mediator = mediator_for(&element);

        let value = Value::from("unchanged");
        assert_eq!(mediator.parse(&value), value);
        assert_eq!(mediator.render(&value), value);
    }

    #[test]
    fn test_unregistered_name_is_identity() {
        let element = FormElement::input("text").with_attr(MEDIATOR_ATTR, "no-such-mediator");
        let mediator = mediator_for(&element);

        let value = Value::Int(3);
        assert_eq!(mediator.parse(&value), value);
        assert_eq!(mediator.render(&value), value);
    }

    #[test]
    fn test_registered_mediator_applies() {
        register_mediator(
            "mediator-test-upper",
            Mediator::new(
                |raw| Value::from(raw.to_field_string().to_uppercase()),
                |stored| Value::from(stored.to_field_string().to_lowercase()),
            ),
        );

        let element =
            FormElement::input("text").with_attr(MEDIATOR_ATTR, "mediator-test-upper");
        let mediator = mediator_for(&element);

        assert_eq!(mediator.parse(&Value::from("ann")), Value::from("ANN"));
        assert_eq!(mediator.render(&Value::from("ANN")), Value::from("ann"));
    }
}
