//! Attribute-path resolution.
//!
//! A bound attribute path is a dotted sequence of keys (`"address.city"`)
//! identifying a possibly-nested value inside a model graph. Reads walk the
//! graph through the documented resolution priority (direct value, zero-arg
//! accessor, generic getter) and never mutate; a failed step resolves to
//! [`Value::Undefined`]. Writes walk every segment but the last, descending
//! into nested models where they exist and lazily attaching writable nested
//! maps where they do not, and commit the innermost entries through
//! [`AttributeSetter`] so per-key custom setters are honored.
//!
//! The write side is exposed as a [`WriteCursor`] rather than a single `set`
//! call because one walk can carry several final entries: the select-box
//! handler stores the chosen value and its display label side by side.

use std::fmt;

use horizon_formlink_core::{ModelRef, Value, ValueMap};

/// A parsed dotted attribute path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributePath {
    raw: String,
    segments: Vec<String>,
}

impl AttributePath {
    /// Parse a dotted path. A string without dots yields one segment.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let segments = raw.split('.').map(str::to_string).collect();
        Self { raw, segments }
    }

    /// The original dotted string.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// All segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The final segment, the write target.
    pub fn last(&self) -> &str {
        self.segments
            .last()
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Every segment but the last, the traversal prefix.
    pub fn prefix(&self) -> &[String] {
        &self.segments[..self.segments.len().saturating_sub(1)]
    }

    /// Whether the path has a single segment (no nesting).
    pub fn is_flat(&self) -> bool {
        self.segments.len() == 1
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Pop one attribute off an object-like value.
///
/// Models resolve through their direct layer first (direct value, then
/// zero-arg accessor), falling back to the generic getter. Maps resolve by
/// key. Anything else is not object-like and yields `Undefined`.
fn pop_attribute(value: &Value, name: &str) -> Value {
    match value {
        Value::Model(model) => match model.direct_attribute(name) {
            Some(direct) => direct.resolve(model),
            None => model.get(name),
        },
        Value::Map(map) => map.get(name).unwrap_or(Value::Undefined),
        _ => Value::Undefined,
    }
}

/// Resolve a dotted path against a model for reading.
///
/// Non-destructive. If the final value is itself a model reference, its
/// identifier is substituted, since a bound field carries attributes rather
/// than whole models.
pub fn resolve(model: &ModelRef, path: &AttributePath) -> Value {
    let mut current = Value::Model(model.clone());
    for segment in path.segments() {
        current = pop_attribute(&current, segment);
    }
    tracing::trace!(
        target: "horizon_formlink::path",
        path = %path,
        "resolved path"
    );
    match current {
        Value::Model(model) => model.id(),
        value => value,
    }
}

/// A positioned write into a model graph.
///
/// Produced by [`descend`]; final entries are added with
/// [`insert`](WriteCursor::insert) and applied by
/// [`commit`](WriteCursor::commit).
pub struct WriteCursor {
    target: ModelRef,
    batch: ValueMap,
    slot: ValueMap,
}

impl WriteCursor {
    /// Add a final entry at the cursor position.
    pub fn insert(&self, key: impl Into<String>, value: Value) {
        self.slot.insert(key, value);
    }

    /// The model the batch will be committed to.
    pub fn target(&self) -> &ModelRef {
        &self.target
    }

    /// Apply the accumulated batch through [`AttributeSetter`].
    pub fn commit(self) {
        AttributeSetter::apply(&self.target, self.batch);
    }
}

/// Walk all but the last segment of a path, producing a [`WriteCursor`].
///
/// At each step the walk either descends into an existing nested model
/// (resolving the direct layer, so a zero-arg accessor returning a model is
/// descended through) or attaches a writable nested map at the parent's
/// corresponding attribute, reusing a stored map where one exists and
/// creating a fresh one where it does not. Descending into a nested model
/// re-targets the eventual commit at that model.
pub fn descend(model: &ModelRef, path: &AttributePath) -> WriteCursor {
    let batch = ValueMap::new();
    let mut target = model.clone();
    let mut slot = batch.clone();
    let mut cursor = Value::Model(model.clone());

    for segment in path.prefix() {
        let next = match &cursor {
            Value::Model(current) => {
                let existing = match current.direct_attribute(segment) {
                    Some(direct) => direct.resolve(current),
                    None => current.get(segment),
                };
                match existing {
                    Value::Model(child) => {
                        target = child.clone();
                        Value::Model(child)
                    }
                    Value::Map(map) => {
                        slot.insert(segment.clone(), Value::Map(map.clone()));
                        slot = map.clone();
                        Value::Map(map)
                    }
                    _ => {
                        let fresh = ValueMap::new();
                        slot.insert(segment.clone(), Value::Map(fresh.clone()));
                        slot = fresh.clone();
                        Value::Map(fresh)
                    }
                }
            }
            Value::Map(current) => {
                let nested = match current.get(segment) {
                    Some(Value::Map(existing)) => existing,
                    _ => ValueMap::new(),
                };
                current.insert(segment.clone(), Value::Map(nested.clone()));
                slot = nested.clone();
                Value::Map(nested)
            }
            // The cursor is only ever a model or a map.
            _ => unreachable!("write cursor left the object graph"),
        };
        cursor = next;
    }

    WriteCursor { target, batch, slot }
}

/// Set one value at a dotted path; the one-entry convenience over the cursor.
pub fn set(model: &ModelRef, path: &AttributePath, value: Value) {
    let cursor = descend(model, path);
    cursor.insert(path.last().to_string(), value);
    cursor.commit();
}

/// Dispatches attribute writes, honoring per-key custom setters.
pub struct AttributeSetter;

impl AttributeSetter {
    /// Apply a batch of attributes to a model.
    ///
    /// Every key is dispatched exactly once: through the model's registered
    /// custom setter where one exists, otherwise through the generic bulk
    /// set. A key never travels both routes.
    pub fn apply(model: &ModelRef, batch: ValueMap) {
        let remaining = ValueMap::new();
        for (key, value) in batch.entries() {
            if let Some(setter) = model.custom_setter(&key) {
                tracing::trace!(
                    target: "horizon_formlink::path",
                    key = %key,
                    "dispatching through custom setter"
                );
                setter(model, value);
            } else {
                remaining.insert(key, value);
            }
        }
        if !remaining.is_empty() {
            model.set(&remaining);
        }
    }

    /// Apply a single key/value pair; normalized into a one-entry batch.
    pub fn apply_one(model: &ModelRef, key: impl Into<String>, value: Value) {
        let batch = ValueMap::new();
        batch.insert(key, value);
        Self::apply(model, batch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_formlink_core::AttributeModel;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_parse_segments() {
        let path = AttributePath::parse("address.city");
        assert_eq!(path.segments(), ["address", "city"]);
        assert_eq!(path.last(), "city");
        assert_eq!(path.prefix(), ["address"]);
        assert!(!path.is_flat());
        assert!(AttributePath::parse("name").is_flat());
    }

    #[test]
    fn test_flat_round_trip() {
        let model = AttributeModel::new();
        let path = AttributePath::parse("name");

        set(&model, &path, Value::from("Ann"));
        assert_eq!(resolve(&model, &path), Value::from("Ann"));
    }

    #[test]
    fn test_nested_round_trip_creates_map() {
        let model = AttributeModel::new();
        let path = AttributePath::parse("address.city");

        set(&model, &path, Value::from("Paris"));

        assert_eq!(resolve(&model, &path), Value::from("Paris"));
        assert!(matches!(model.get("address"), Value::Map(_)));
    }

    #[test]
    fn test_nested_write_reuses_stored_map() {
        let existing = ValueMap::from_entries([("zip", Value::from("75001"))]);
        let model =
            AttributeModel::with_attributes([("address", Value::Map(existing.clone()))]);

        set(
            &model,
            &AttributePath::parse("address.city"),
            Value::from("Paris"),
        );

        // The stored map was written through, not replaced.
        assert_eq!(existing.get("city"), Some(Value::from("Paris")));
        assert_eq!(existing.get("zip"), Some(Value::from("75001")));
    }

    #[test]
    fn test_deep_nested_path() {
        let model = AttributeModel::new();
        let path = AttributePath::parse("contact.address.city");

        set(&model, &path, Value::from("Paris"));
        assert_eq!(resolve(&model, &path), Value::from("Paris"));
    }

    #[test]
    fn test_descent_into_nested_model_targets_child() {
        let child = AttributeModel::new();
        let parent =
            AttributeModel::with_attributes([("address", Value::Model(child.clone()))]);

        set(
            &parent,
            &AttributePath::parse("address.city"),
            Value::from("Paris"),
        );

        assert_eq!(child.get("city"), Value::from("Paris"));
        assert_eq!(
            resolve(&parent, &AttributePath::parse("address.city")),
            Value::from("Paris")
        );
    }

    #[test]
    fn test_resolve_undefined_intermediate() {
        let model = AttributeModel::new();
        assert_eq!(
            resolve(&model, &AttributePath::parse("missing.city")),
            Value::Undefined
        );

        // A non-object intermediate also resolves to undefined.
        model.set_attr("flat", Value::from("scalar"));
        assert_eq!(
            resolve(&model, &AttributePath::parse("flat.city")),
            Value::Undefined
        );
    }

    #[test]
    fn test_resolve_substitutes_model_id() {
        let child = AttributeModel::with_attributes([("id", Value::from("c-42"))]);
        let parent = AttributeModel::with_attributes([("owner", Value::Model(child))]);

        assert_eq!(
            resolve(&parent, &AttributePath::parse("owner")),
            Value::from("c-42")
        );
    }

    #[test]
    fn test_resolve_through_accessor() {
        let model = AttributeModel::new();
        model.set_attr("first", Value::from("Ann"));
        model.register_accessor("shouty", |model| {
            Value::from(model.get("first").to_field_string().to_uppercase())
        });

        assert_eq!(
            resolve(&model, &AttributePath::parse("shouty")),
            Value::from("ANN")
        );
    }

    #[test]
    fn test_custom_setter_precedence() {
        let model = AttributeModel::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let calls_clone = calls.clone();
        model.register_setter("city", move |model, value| {
            calls_clone.lock().push(value.clone());
            model.set_attr("city", Value::from(value.to_field_string().to_uppercase()));
        });

        let batch = ValueMap::new();
        batch.insert("city", Value::from("paris"));
        batch.insert("zip", Value::from("75001"));
        AttributeSetter::apply(&model, batch);

        // The custom setter ran exactly once and the key skipped the bulk set.
        assert_eq!(calls.lock().len(), 1);
        assert_eq!(model.get("city"), Value::from("PARIS"));
        assert_eq!(model.get("zip"), Value::from("75001"));
    }

    #[test]
    fn test_cursor_multi_entry() {
        let model = AttributeModel::new();
        let path = AttributePath::parse("choice");

        let cursor = descend(&model, &path);
        cursor.insert("choice", Value::from("2"));
        cursor.insert("choice_text", Value::from("Two"));
        cursor.commit();

        assert_eq!(model.get("choice"), Value::from("2"));
        assert_eq!(model.get("choice_text"), Value::from("Two"));
    }
}
