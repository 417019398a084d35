//! Binding configuration.
//!
//! Every bindable element classifies into an [`ElementKind`], and the
//! configuration maps each kind to the metadata attribute that carries the
//! bound attribute path (by default `name` for radio groups and `id` for
//! everything else). A [`BindingConfig`] is the per-session copy of that
//! mapping: it snapshots the process-wide defaults at construction and then
//! applies the caller's [`BindingOptions`], so later global changes do not
//! retroactively affect a live session.
//!
//! The process-wide defaults and the declarative substitution table are
//! mutable singletons, changed through the `configure_*` functions. Both
//! support scoped overrides through an explicit snapshot stack: `store_*`
//! pushes the current state, `restore_*` pops it back, and nested
//! store/restore pairs compose.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use horizon_formlink_core::Value;

use crate::element::FormElement;

/// The substitution-table key used when no per-attribute entry matches.
pub const DEFAULT_SUBSTITUTION: &str = "default";

/// Classification of a bindable form element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementKind {
    /// `<input type="text">`, including inputs with a missing or empty type.
    Text,
    /// `<textarea>`.
    TextArea,
    /// `<input type="password">`.
    Password,
    /// `<input type="radio">`.
    Radio,
    /// `<input type="checkbox">`.
    Checkbox,
    /// `<select>`.
    Select,
    /// `<input type="number">`.
    Number,
    /// `<input type="range">`.
    Range,
    /// `<input type="tel">`.
    Tel,
    /// `<input type="search">`.
    Search,
    /// `<input type="url">`.
    Url,
    /// `<input type="email">`.
    Email,
}

impl ElementKind {
    /// Every element kind, in configuration order.
    pub const ALL: [ElementKind; 12] = [
        ElementKind::Text,
        ElementKind::TextArea,
        ElementKind::Password,
        ElementKind::Radio,
        ElementKind::Checkbox,
        ElementKind::Select,
        ElementKind::Number,
        ElementKind::Range,
        ElementKind::Tel,
        ElementKind::Search,
        ElementKind::Url,
        ElementKind::Email,
    ];

    /// The classification key, as it appears in a `type` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::TextArea => "textarea",
            ElementKind::Password => "password",
            ElementKind::Radio => "radio",
            ElementKind::Checkbox => "checkbox",
            ElementKind::Select => "select",
            ElementKind::Number => "number",
            ElementKind::Range => "range",
            ElementKind::Tel => "tel",
            ElementKind::Search => "search",
            ElementKind::Url => "url",
            ElementKind::Email => "email",
        }
    }

    /// Parse a classification key.
    pub fn from_name(name: &str) -> Option<ElementKind> {
        ElementKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == name)
    }

    /// Classify an element by tag name, or by `type` for inputs.
    ///
    /// An input with a missing or empty `type` attribute classifies as
    /// [`ElementKind::Text`]. Elements of unknown shape yield `None` and are
    /// skipped by the binding handlers.
    pub fn classify(element: &FormElement) -> Option<ElementKind> {
        match element.tag() {
            "textarea" => Some(ElementKind::TextArea),
            "select" => Some(ElementKind::Select),
            "input" => {
                let input_type = element.attr("type").unwrap_or_default();
                if input_type.is_empty() {
                    Some(ElementKind::Text)
                } else {
                    ElementKind::from_name(&input_type)
                }
            }
            _ => None,
        }
    }
}

fn default_binding_attrs() -> BTreeMap<ElementKind, String> {
    ElementKind::ALL
        .iter()
        .map(|&kind| {
            let attr = if kind == ElementKind::Radio { "name" } else { "id" };
            (kind, attr.to_string())
        })
        .collect()
}

/// Caller-supplied overrides for a [`BindingConfig`].
///
/// The `all` pseudo-entry, when present, overwrites every per-kind entry
/// (including ones set explicitly on the same options value) and is then
/// discarded.
#[derive(Clone, Debug, Default)]
pub struct BindingOptions {
    entries: BTreeMap<ElementKind, String>,
    all: Option<String>,
}

impl BindingOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the binding attribute for one element kind.
    pub fn with_attr(mut self, kind: ElementKind, attr: impl Into<String>) -> Self {
        self.entries.insert(kind, attr.into());
        self
    }

    /// Override the binding attribute for every element kind.
    pub fn with_all(mut self, attr: impl Into<String>) -> Self {
        self.all = Some(attr.into());
        self
    }
}

/// The per-session element-kind to binding-attribute mapping.
#[derive(Clone, Debug)]
pub struct BindingConfig {
    binding_attrs: BTreeMap<ElementKind, String>,
}

impl BindingConfig {
    /// Build a configuration from the process-wide defaults plus overrides.
    pub fn new(options: BindingOptions) -> Self {
        let mut binding_attrs = with_global(|global| global.binding_attrs.clone());
        for (kind, attr) in options.entries {
            binding_attrs.insert(kind, attr);
        }
        if let Some(all) = options.all {
            for kind in ElementKind::ALL {
                binding_attrs.insert(kind, all.clone());
            }
        }
        Self { binding_attrs }
    }

    /// Build a configuration from the process-wide defaults alone.
    pub fn with_defaults() -> Self {
        Self::new(BindingOptions::new())
    }

    /// The metadata attribute configured for an element kind.
    pub fn binding_attr(&self, kind: ElementKind) -> Option<&str> {
        self.binding_attrs.get(&kind).map(String::as_str)
    }

    /// Read the bound attribute path off a concrete element.
    ///
    /// Returns `None` when the kind has no configured attribute or the
    /// element's attribute is missing or empty; handlers skip such elements.
    pub fn binding_value(&self, element: &FormElement, kind: ElementKind) -> Option<String> {
        let attr = self.binding_attr(kind)?;
        element.attr(attr).filter(|value| !value.is_empty())
    }
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// -----------------------------------------------------------------------------
// Process-wide configuration state
// -----------------------------------------------------------------------------

struct GlobalConfig {
    binding_attrs: BTreeMap<ElementKind, String>,
    binding_attr_snapshots: Vec<BTreeMap<ElementKind, String>>,
    substitutions: BTreeMap<String, Value>,
    substitution_snapshots: Vec<BTreeMap<String, Value>>,
}

impl GlobalConfig {
    fn new() -> Self {
        let mut substitutions = BTreeMap::new();
        substitutions.insert(DEFAULT_SUBSTITUTION.to_string(), Value::Str(String::new()));
        Self {
            binding_attrs: default_binding_attrs(),
            binding_attr_snapshots: Vec::new(),
            substitutions,
            substitution_snapshots: Vec::new(),
        }
    }
}

/// Global configuration (lazy initialized).
static GLOBAL_CONFIG: Mutex<Option<GlobalConfig>> = Mutex::new(None);

fn with_global<R>(f: impl FnOnce(&mut GlobalConfig) -> R) -> R {
    let mut guard = GLOBAL_CONFIG.lock();
    f(guard.get_or_insert_with(GlobalConfig::new))
}

/// Change the process-wide default binding attributes.
///
/// An `all` entry is expanded first, then per-kind entries are applied on top
/// of it, so `with_all(..).with_attr(kind, ..)` sets a blanket value with one
/// exception. Affects configurations built after this call.
pub fn configure_binding_attributes(options: BindingOptions) {
    with_global(|global| {
        if let Some(all) = options.all {
            for kind in ElementKind::ALL {
                global.binding_attrs.insert(kind, all.clone());
            }
        }
        for (kind, attr) in options.entries {
            global.binding_attrs.insert(kind, attr);
        }
    });
    tracing::debug!(target: "horizon_formlink::config", "binding attribute defaults changed");
}

/// Set every process-wide default binding attribute to one value.
pub fn configure_all_binding_attributes(attr: impl Into<String>) {
    configure_binding_attributes(BindingOptions::new().with_all(attr));
}

/// Push a snapshot of the process-wide binding attribute defaults.
pub fn store_binding_attributes() {
    with_global(|global| {
        let snapshot = global.binding_attrs.clone();
        global.binding_attr_snapshots.push(snapshot);
    });
}

/// Pop the most recent snapshot back into the process-wide defaults.
///
/// A no-op when no snapshot is stored.
pub fn restore_binding_attributes() {
    with_global(|global| {
        if let Some(snapshot) = global.binding_attr_snapshots.pop() {
            global.binding_attrs = snapshot;
        }
    });
}

// -----------------------------------------------------------------------------
// Declarative substitution table
// -----------------------------------------------------------------------------

/// Substitute an undefined value per the declarative substitution table.
///
/// A defined value (including `Null`) passes through untouched. For
/// [`Value::Undefined`] the table entry for `element_attr` applies, falling
/// back to the `default` entry (initially the empty string).
pub fn data_bind_substitution(element_attr: &str, value: Value) -> Value {
    if !value.is_undefined() {
        return value;
    }
    with_global(|global| {
        global
            .substitutions
            .get(element_attr)
            .or_else(|| global.substitutions.get(DEFAULT_SUBSTITUTION))
            .cloned()
            .unwrap_or_else(|| Value::Str(String::new()))
    })
}

/// Extend the substitution table, snapshotting the previous state first.
///
/// The implicit snapshot means a later [`restore_data_bind_substitutions`]
/// undoes this call.
pub fn configure_data_bind_substitutions<K, I>(entries: I)
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
{
    store_data_bind_substitutions();
    with_global(|global| {
        for (key, value) in entries {
            global.substitutions.insert(key.into(), value);
        }
    });
}

/// Push a snapshot of the substitution table.
pub fn store_data_bind_substitutions() {
    with_global(|global| {
        let snapshot = global.substitutions.clone();
        global.substitution_snapshots.push(snapshot);
    });
}

/// Pop the most recent substitution-table snapshot. No-op when empty.
pub fn restore_data_bind_substitutions() {
    with_global(|global| {
        if let Some(snapshot) = global.substitution_snapshots.pop() {
            global.substitutions = snapshot;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(
            ElementKind::classify(&FormElement::textarea()),
            Some(ElementKind::TextArea)
        );
        assert_eq!(
            ElementKind::classify(&FormElement::select()),
            Some(ElementKind::Select)
        );
        assert_eq!(
            ElementKind::classify(&FormElement::input("email")),
            Some(ElementKind::Email)
        );
        // Missing or empty type classifies as text.
        assert_eq!(
            ElementKind::classify(&FormElement::new("input")),
            Some(ElementKind::Text)
        );
        assert_eq!(
            ElementKind::classify(&FormElement::input("")),
            Some(ElementKind::Text)
        );
        assert_eq!(ElementKind::classify(&FormElement::new("div")), None);
        assert_eq!(ElementKind::classify(&FormElement::input("color")), None);
    }

    #[test]
    fn test_default_attrs() {
        let config = BindingConfig::with_defaults();
        assert_eq!(config.binding_attr(ElementKind::Text), Some("id"));
        assert_eq!(config.binding_attr(ElementKind::Checkbox), Some("id"));
        assert_eq!(config.binding_attr(ElementKind::Radio), Some("name"));
    }

    #[test]
    fn test_options_override_one_kind() {
        let config = BindingConfig::new(
            BindingOptions::new().with_attr(ElementKind::Text, "data-field"),
        );
        assert_eq!(config.binding_attr(ElementKind::Text), Some("data-field"));
        assert_eq!(config.binding_attr(ElementKind::Password), Some("id"));
    }

    #[test]
    fn test_all_overwrites_every_kind_at_construction() {
        let config = BindingConfig::new(
            BindingOptions::new()
                .with_attr(ElementKind::Text, "data-field")
                .with_all("data-bound"),
        );
        for kind in ElementKind::ALL {
            assert_eq!(config.binding_attr(kind), Some("data-bound"));
        }
    }

    #[test]
    fn test_binding_value_skips_missing_and_empty() {
        let config = BindingConfig::with_defaults();

        let bound = FormElement::input("text").with_attr("id", "name");
        assert_eq!(
            config.binding_value(&bound, ElementKind::Text),
            Some("name".to_string())
        );

        let unbound = FormElement::input("text");
        assert_eq!(config.binding_value(&unbound, ElementKind::Text), None);

        let empty = FormElement::input("text").with_attr("id", "");
        assert_eq!(config.binding_value(&empty, ElementKind::Text), None);
    }
}
