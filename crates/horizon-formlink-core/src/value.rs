//! Dynamically-typed attribute values.
//!
//! Model attributes and event payloads in Formlink are dynamically typed: a
//! bound form field may carry a string today and a nested object tomorrow.
//! [`Value`] is the variant type that carries them, and [`ValueMap`] is the
//! shared, interiorly-mutable map used for nested attribute containers and
//! bulk-set batches.
//!
//! Two variants deserve a note:
//!
//! - [`Value::Undefined`] means "absent". Lookups that fail resolve to it
//!   instead of erroring, and writing it to a model removes the attribute.
//! - [`Value::Null`] is an explicit null stored by the caller. It is distinct
//!   from `Undefined`: a `Null` attribute exists.
//!
//! `ValueMap` clones are shallow: every clone aliases the same storage, so a
//! nested map attached to a parent attribute can still be written through
//! afterwards. This mirrors the reference semantics the binding engine's
//! nested-path writes rely on.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::model::ModelRef;

/// A dynamically-typed attribute value.
#[derive(Clone, PartialEq)]
pub enum Value {
    /// The absent value. Failed lookups resolve to this.
    Undefined,
    /// An explicit null.
    Null,
    /// A boolean, as produced by checkbox bindings.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A string, the native currency of form fields.
    Str(String),
    /// A nested attribute container with shared storage.
    Map(ValueMap),
    /// A reference to a nested domain model.
    Model(ModelRef),
}

impl Value {
    /// Whether this value is [`Value::Undefined`].
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Whether this value is defined and non-null.
    ///
    /// This is the reconciliation test binding handlers use to decide whether
    /// the model or the element is the authoritative initial source.
    pub fn is_defined(&self) -> bool {
        !matches!(self, Value::Undefined | Value::Null)
    }

    /// Whether this value is object-like (a map or a model reference).
    ///
    /// Path resolution only descends through object-like values.
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Map(_) | Value::Model(_))
    }

    /// Loose truthiness, used by checkbox state and visibility toggles.
    ///
    /// `Undefined`, `Null`, `false`, zero, and the empty string are falsy;
    /// everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::Map(_) | Value::Model(_) => true,
        }
    }

    /// Render this value as a form-field string.
    ///
    /// `Undefined` and `Null` render empty; a model reference renders its
    /// identifier; a map has no field representation and renders empty.
    pub fn to_field_string(&self) -> String {
        match self {
            Value::Undefined | Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::Str(s) => s.clone(),
            Value::Map(_) => String::new(),
            Value::Model(model) => model.id().to_field_string(),
        }
    }

    /// Borrow the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(n) => write!(f, "Float({n})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Map(map) => write!(f, "Map({} entries)", map.len()),
            Value::Model(model) => write!(f, "Model(id={:?})", model.id()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Value::Map(map)
    }
}

impl From<ModelRef> for Value {
    fn from(model: ModelRef) -> Self {
        Value::Model(model)
    }
}

/// A shared, ordered map of attribute values.
///
/// Clones alias the same storage. Equality compares contents, with an
/// identity short-circuit for aliasing clones.
#[derive(Clone, Default)]
pub struct ValueMap {
    inner: Arc<RwLock<BTreeMap<String, Value>>>,
}

impl ValueMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from key/value pairs.
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let map = Self::new();
        for (key, value) in entries {
            map.insert(key, value);
        }
        map
    }

    /// Look up a key, cloning the stored value.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.read().get(key).cloned()
    }

    /// Insert or replace a key.
    pub fn insert(&self, key: impl Into<String>, value: Value) {
        self.inner.write().insert(key.into(), value);
    }

    /// Remove a key, returning the previous value if any.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.inner.write().remove(key)
    }

    /// Whether the map holds a given key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.read().contains_key(key)
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Snapshot the current entries in key order.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.inner
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Snapshot the current keys in order.
    pub fn keys(&self) -> Vec<String> {
        self.inner.read().keys().cloned().collect()
    }

    /// Whether two handles alias the same storage.
    pub fn is_same(&self, other: &ValueMap) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for ValueMap {
    fn eq(&self, other: &Self) -> bool {
        if self.is_same(other) {
            return true;
        }
        *self.inner.read() == *other.inner.read()
    }
}

impl fmt::Debug for ValueMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

static_assertions::assert_impl_all!(Value: Send, Sync);
static_assertions::assert_impl_all!(ValueMap: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definedness() {
        assert!(!Value::Undefined.is_defined());
        assert!(!Value::Null.is_defined());
        assert!(Value::Bool(false).is_defined());
        assert!(Value::from("").is_defined());
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Int(-1).is_truthy());
        assert!(Value::from("no").is_truthy());
        assert!(Value::Map(ValueMap::new()).is_truthy());
    }

    #[test]
    fn test_field_string() {
        assert_eq!(Value::Undefined.to_field_string(), "");
        assert_eq!(Value::Null.to_field_string(), "");
        assert_eq!(Value::Bool(true).to_field_string(), "true");
        assert_eq!(Value::Int(42).to_field_string(), "42");
        assert_eq!(Value::from("Paris").to_field_string(), "Paris");
    }

    #[test]
    fn test_map_aliasing() {
        let map = ValueMap::new();
        let alias = map.clone();

        alias.insert("city", Value::from("Paris"));

        assert_eq!(map.get("city"), Some(Value::from("Paris")));
        assert!(map.is_same(&alias));
    }

    #[test]
    fn test_map_equality_by_contents() {
        let a = ValueMap::from_entries([("k", Value::Int(1))]);
        let b = ValueMap::from_entries([("k", Value::Int(1))]);
        let c = ValueMap::from_entries([("k", Value::Int(2))]);

        assert!(!a.is_same(&b));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_map_entries_snapshot() {
        let map = ValueMap::new();
        map.insert("b", Value::Int(2));
        map.insert("a", Value::Int(1));

        let entries = map.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "a");
        assert_eq!(entries[1].0, "b");
    }
}
