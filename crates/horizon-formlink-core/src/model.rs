//! The observable attribute model.
//!
//! [`AttributeModel`] is the model half of a form binding: a keyed bag of
//! [`Value`] attributes with change notification. Bulk [`set`] compares each
//! incoming value against the stored one and fires `change:<key>` only for
//! keys that actually changed, followed by one aggregate `change` event
//! carrying the changed entries. That compare-before-notify contract is what
//! keeps a bound element/model pair from ping-ponging updates back and forth.
//!
//! Beyond the generic get/set surface the model carries two explicit
//! registries used by attribute resolution:
//!
//! - **Zero-arg accessors** ([`register_accessor`]): computed attributes
//!   resolved ahead of the stored ones.
//! - **Custom setters** ([`register_setter`]): per-key write interceptors
//!   honored by the attribute-setter dispatch in the binding engine.
//!
//! Attribute lookup resolves through an explicit priority list, surfaced by
//! [`direct_attribute`]: a direct value (the reserved `id`) first, then a
//! registered accessor, then the generic stored attribute, and finally
//! [`Value::Undefined`]. There is no implicit fallthrough beyond that list.
//!
//! [`set`]: AttributeModel::set
//! [`register_accessor`]: AttributeModel::register_accessor
//! [`register_setter`]: AttributeModel::register_setter
//! [`direct_attribute`]: AttributeModel::direct_attribute

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::events::{EventHub, EventSubscription};
use crate::value::{Value, ValueMap};

/// The reserved identifier attribute.
pub const ID_ATTRIBUTE: &str = "id";

/// A computed zero-arg accessor registered on a model.
pub type AccessorFn = Arc<dyn Fn(&AttributeModel) -> Value + Send + Sync>;

/// A custom per-key setter registered on a model.
pub type SetterFn = Arc<dyn Fn(&AttributeModel, Value) + Send + Sync>;

/// The direct (pre-getter) layer of attribute resolution.
///
/// Resolution priority is: `DirectValue`, then `ZeroArgAccessor`, then the
/// generic stored attribute via [`AttributeModel::get`].
#[derive(Clone)]
pub enum DirectAttribute {
    /// A value carried directly by the model, ahead of its attribute storage.
    DirectValue(Value),
    /// A registered computed accessor, invoked at resolution time.
    ZeroArgAccessor(AccessorFn),
}

impl DirectAttribute {
    /// Resolve this layer to a concrete value.
    pub fn resolve(&self, model: &AttributeModel) -> Value {
        match self {
            DirectAttribute::DirectValue(value) => value.clone(),
            DirectAttribute::ZeroArgAccessor(accessor) => accessor(model),
        }
    }
}

/// A shared handle to an [`AttributeModel`].
///
/// Models are always shared: bindings, nested attribute graphs, and listener
/// callbacks all hold handles to the same instance. Equality is identity.
#[derive(Clone)]
pub struct ModelRef(Arc<AttributeModel>);

impl ModelRef {
    /// Whether two handles point at the same model.
    pub fn is_same(&self, other: &ModelRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for ModelRef {
    type Target = AttributeModel;

    fn deref(&self) -> &AttributeModel {
        &self.0
    }
}

impl PartialEq for ModelRef {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
    }
}

impl fmt::Debug for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRef")
            .field("id", &self.id())
            .field("attributes", &self.attribute_keys())
            .finish()
    }
}

/// An observable bag of keyed attributes with change events.
#[derive(Default)]
pub struct AttributeModel {
    attributes: RwLock<BTreeMap<String, Value>>,
    accessors: RwLock<BTreeMap<String, AccessorFn>>,
    setters: RwLock<BTreeMap<String, SetterFn>>,
    events: EventHub,
}

impl AttributeModel {
    /// Create an empty model.
    pub fn new() -> ModelRef {
        ModelRef(Arc::new(Self::default()))
    }

    /// Create a model pre-populated with attributes.
    ///
    /// No change events fire for the initial attributes.
    pub fn with_attributes<K, I>(entries: I) -> ModelRef
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let model = Self::default();
        {
            let mut attrs = model.attributes.write();
            for (key, value) in entries {
                attrs.insert(key.into(), value);
            }
        }
        ModelRef(Arc::new(model))
    }

    // -------------------------------------------------------------------------
    // Attribute access
    // -------------------------------------------------------------------------

    /// The generic getter: the stored attribute, or [`Value::Undefined`].
    pub fn get(&self, key: &str) -> Value {
        self.attributes
            .read()
            .get(key)
            .cloned()
            .unwrap_or(Value::Undefined)
    }

    /// The model identifier: the stored `id` attribute, or `Undefined`.
    pub fn id(&self) -> Value {
        self.get(ID_ATTRIBUTE)
    }

    /// The direct resolution layer for a key, if one applies.
    ///
    /// The reserved `id` attribute is exposed as a direct value when set;
    /// registered accessors come next. `None` means resolution should fall
    /// through to the generic [`get`](Self::get).
    pub fn direct_attribute(&self, key: &str) -> Option<DirectAttribute> {
        if key == ID_ATTRIBUTE {
            let id = self.id();
            if id.is_defined() {
                return Some(DirectAttribute::DirectValue(id));
            }
        }
        self.accessors
            .read()
            .get(key)
            .cloned()
            .map(DirectAttribute::ZeroArgAccessor)
    }

    /// Snapshot the stored attribute keys.
    pub fn attribute_keys(&self) -> Vec<String> {
        self.attributes.read().keys().cloned().collect()
    }

    /// The number of stored attributes.
    pub fn attribute_count(&self) -> usize {
        self.attributes.read().len()
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Bulk-set attributes, firing change events for keys that changed.
    ///
    /// For every entry: an [`Value::Undefined`] value removes the key; any
    /// other value replaces the stored one if it differs. After the batch is
    /// applied, `change:<key>` fires once per changed key with the new value,
    /// then one aggregate `change` fires with a map of the changed entries.
    /// Unchanged keys fire nothing.
    pub fn set(&self, attributes: &ValueMap) {
        let mut changed: Vec<(String, Value)> = Vec::new();
        {
            let mut stored = self.attributes.write();
            for (key, value) in attributes.entries() {
                match value {
                    Value::Undefined => {
                        if stored.remove(&key).is_some() {
                            changed.push((key, Value::Undefined));
                        }
                    }
                    value => {
                        let differs = stored.get(&key) != Some(&value);
                        if differs {
                            stored.insert(key.clone(), value.clone());
                            changed.push((key, value));
                        }
                    }
                }
            }
        }

        if changed.is_empty() {
            return;
        }
        tracing::trace!(
            target: "horizon_formlink_core::model",
            changed = changed.len(),
            "attributes changed"
        );
        let summary = ValueMap::new();
        for (key, value) in &changed {
            summary.insert(key.clone(), value.clone());
        }
        for (key, value) in changed {
            self.events.emit(&format!("change:{key}"), value);
        }
        self.events.emit("change", Value::Map(summary));
    }

    /// Set a single attribute; a one-entry convenience over [`set`](Self::set).
    pub fn set_attr(&self, key: impl Into<String>, value: Value) {
        let batch = ValueMap::new();
        batch.insert(key, value);
        self.set(&batch);
    }

    // -------------------------------------------------------------------------
    // Accessor and setter registries
    // -------------------------------------------------------------------------

    /// Register a computed zero-arg accessor for a key.
    pub fn register_accessor<F>(&self, key: impl Into<String>, accessor: F)
    where
        F: Fn(&AttributeModel) -> Value + Send + Sync + 'static,
    {
        self.accessors.write().insert(key.into(), Arc::new(accessor));
    }

    /// Register a custom setter for a key.
    ///
    /// Custom setters are not invoked by [`set`](Self::set) itself; the
    /// binding engine's attribute-setter dispatch routes keys through them
    /// ahead of the generic bulk set.
    pub fn register_setter<F>(&self, key: impl Into<String>, setter: F)
    where
        F: Fn(&AttributeModel, Value) + Send + Sync + 'static,
    {
        self.setters.write().insert(key.into(), Arc::new(setter));
    }

    /// Look up the custom setter for a key.
    pub fn custom_setter(&self, key: &str) -> Option<SetterFn> {
        self.setters.read().get(key).cloned()
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Subscribe to a named event (`change:<key>`, `change`, or any custom
    /// name fired through [`trigger`](Self::trigger)).
    pub fn on<F>(&self, event: &str, listener: F) -> EventSubscription
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.events.connect(event, listener)
    }

    /// Release a subscription previously returned by [`on`](Self::on).
    pub fn off(&self, subscription: EventSubscription) -> bool {
        self.events.disconnect(subscription)
    }

    /// Fire an arbitrary named event.
    pub fn trigger(&self, event: &str, value: Value) {
        self.events.emit(event, value);
    }

    /// The model's event hub.
    pub fn events(&self) -> &EventHub {
        &self.events
    }
}

static_assertions::assert_impl_all!(AttributeModel: Send, Sync);
static_assertions::assert_impl_all!(ModelRef: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_get_missing_is_undefined() {
        let model = AttributeModel::new();
        assert_eq!(model.get("missing"), Value::Undefined);
    }

    #[test]
    fn test_set_fires_change_per_key() {
        let model = AttributeModel::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        model.on("change:name", move |value| {
            received_clone.lock().push(value.clone());
        });

        model.set_attr("name", Value::from("Ann"));
        model.set_attr("other", Value::from("x"));

        assert_eq!(*received.lock(), vec![Value::from("Ann")]);
        assert_eq!(model.get("name"), Value::from("Ann"));
    }

    #[test]
    fn test_set_same_value_is_silent() {
        let model = AttributeModel::new();
        let count = Arc::new(Mutex::new(0));

        let count_clone = count.clone();
        model.on("change:name", move |_| {
            *count_clone.lock() += 1;
        });

        model.set_attr("name", Value::from("Ann"));
        model.set_attr("name", Value::from("Ann"));
        model.set_attr("name", Value::from("Bea"));

        assert_eq!(*count.lock(), 2);
    }

    #[test]
    fn test_aggregate_change_event() {
        let model = AttributeModel::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        model.on("change", move |value| {
            received_clone.lock().push(value.clone());
        });

        let batch = ValueMap::new();
        batch.insert("a", Value::Int(1));
        batch.insert("b", Value::Int(2));
        model.set(&batch);

        let events = received.lock();
        assert_eq!(events.len(), 1);
        match &events[0] {
            Value::Map(map) => {
                assert_eq!(map.get("a"), Some(Value::Int(1)));
                assert_eq!(map.get("b"), Some(Value::Int(2)));
            }
            other => panic!("expected map payload, got {other:?}"),
        }
    }

    #[test]
    fn test_undefined_removes_attribute() {
        let model = AttributeModel::new();
        model.set_attr("name", Value::from("Ann"));

        model.set_attr("name", Value::Undefined);
        assert_eq!(model.get("name"), Value::Undefined);
        assert_eq!(model.attribute_count(), 0);

        // Removing an absent key is silent.
        let count = Arc::new(Mutex::new(0));
        let count_clone = count.clone();
        model.on("change:name", move |_| {
            *count_clone.lock() += 1;
        });
        model.set_attr("name", Value::Undefined);
        assert_eq!(*count.lock(), 0);
    }

    #[test]
    fn test_direct_attribute_priority() {
        let model = AttributeModel::with_attributes([("id", Value::from("m-1"))]);
        model.register_accessor("full_name", |model| {
            Value::from(format!(
                "{} {}",
                model.get("first").to_field_string(),
                model.get("last").to_field_string()
            ))
        });
        model.set_attr("first", Value::from("Ann"));
        model.set_attr("last", Value::from("Droste"));

        match model.direct_attribute("id") {
            Some(DirectAttribute::DirectValue(value)) => assert_eq!(value, Value::from("m-1")),
            other => panic!("expected direct id, got {:?}", other.is_some()),
        }
        match model.direct_attribute("full_name") {
            Some(direct) => assert_eq!(direct.resolve(&model), Value::from("Ann Droste")),
            None => panic!("expected accessor"),
        }
        assert!(model.direct_attribute("first").is_none());
    }

    #[test]
    fn test_trigger_custom_event() {
        let model = AttributeModel::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        model.on("sync", move |value| {
            received_clone.lock().push(value.clone());
        });

        model.trigger("sync", Value::Int(7));
        assert_eq!(*received.lock(), vec![Value::Int(7)]);
    }

    #[test]
    fn test_off_releases_subscription() {
        let model = AttributeModel::new();
        let count = Arc::new(Mutex::new(0));

        let count_clone = count.clone();
        let subscription = model.on("change:name", move |_| {
            *count_clone.lock() += 1;
        });

        model.set_attr("name", Value::from("Ann"));
        assert!(model.off(subscription));
        model.set_attr("name", Value::from("Bea"));

        assert_eq!(*count.lock(), 1);
    }
}
