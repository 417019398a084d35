//! Typed element-matching predicates.
//!
//! A [`Selector`] is the predicate half of a binding convention: it decides
//! which elements of a view participate in a given binding strategy. The
//! constructors cover the shapes the standard conventions need (tag matches,
//! input-type matches, attribute presence) and the builder methods narrow a
//! selector further (attribute equality, checked state), which is how the
//! radio-group handler addresses individual group members.

use crate::element::FormElement;

/// An element-matching predicate.
#[derive(Clone, Debug, Default)]
pub struct Selector {
    tag: Option<String>,
    input_type: Option<String>,
    present: Option<String>,
    attr_eq: Vec<(String, String)>,
    checked: Option<bool>,
}

impl Selector {
    /// Match elements by tag name.
    pub fn tag(name: impl Into<String>) -> Self {
        Self {
            tag: Some(name.into().to_ascii_lowercase()),
            ..Self::default()
        }
    }

    /// Match `<input>` elements by their `type` attribute.
    ///
    /// An input with a missing or empty `type` attribute counts as `"text"`,
    /// matching how such inputs render and classify.
    pub fn input(input_type: impl Into<String>) -> Self {
        Self {
            input_type: Some(input_type.into().to_ascii_lowercase()),
            ..Self::default()
        }
    }

    /// Match elements carrying a named attribute, whatever its value.
    pub fn attr_present(name: impl Into<String>) -> Self {
        Self {
            present: Some(name.into()),
            ..Self::default()
        }
    }

    /// Narrow to elements whose attribute equals a value.
    pub fn attr_eq(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attr_eq.push((name.into(), value.into()));
        self
    }

    /// Narrow to elements with the given checked state.
    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    /// The attribute name this selector requires present, if any.
    ///
    /// The declarative handler reads this to learn which attribute carries
    /// the binding declarations, so a convention registered with a different
    /// attribute name parses that attribute instead.
    pub fn required_attr(&self) -> Option<&str> {
        self.present.as_deref()
    }

    /// Whether an element satisfies this predicate.
    pub fn matches(&self, element: &FormElement) -> bool {
        if let Some(tag) = &self.tag {
            if element.tag() != tag {
                return false;
            }
        }
        if let Some(input_type) = &self.input_type {
            if element.tag() != "input" {
                return false;
            }
            let actual = element.attr("type").unwrap_or_default();
            let matched = if input_type == "text" {
                actual.is_empty() || actual == "text"
            } else {
                actual == *input_type
            };
            if !matched {
                return false;
            }
        }
        if let Some(name) = &self.present {
            if element.attr(name).is_none() {
                return false;
            }
        }
        for (name, expected) in &self.attr_eq {
            if element.attr(name).as_deref() != Some(expected.as_str()) {
                return false;
            }
        }
        if let Some(checked) = self.checked {
            if element.is_checked() != checked {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_selector() {
        let selector = Selector::tag("textarea");
        assert!(selector.matches(&FormElement::textarea()));
        assert!(!selector.matches(&FormElement::select()));
    }

    #[test]
    fn test_input_type_selector() {
        let selector = Selector::input("password");
        assert!(selector.matches(&FormElement::input("password")));
        assert!(!selector.matches(&FormElement::input("text")));
        assert!(!selector.matches(&FormElement::textarea()));
    }

    #[test]
    fn test_text_matches_untyped_input() {
        let selector = Selector::input("text");
        assert!(selector.matches(&FormElement::new("input")));
        assert!(selector.matches(&FormElement::input("text")));
        assert!(!selector.matches(&FormElement::input("radio")));
    }

    #[test]
    fn test_attr_present_and_eq() {
        let element = FormElement::input("radio")
            .with_attr("name", "color")
            .with_value("red");

        assert!(Selector::attr_present("name").matches(&element));
        assert!(!Selector::attr_present("data-bind").matches(&element));
        assert!(
            Selector::input("radio")
                .attr_eq("name", "color")
                .attr_eq("value", "red")
                .matches(&element)
        );
        assert!(
            !Selector::input("radio")
                .attr_eq("name", "shape")
                .matches(&element)
        );
    }

    #[test]
    fn test_checked_narrowing() {
        let element = FormElement::input("radio").with_checked(true);
        assert!(Selector::input("radio").checked(true).matches(&element));
        assert!(!Selector::input("radio").checked(false).matches(&element));
    }
}
