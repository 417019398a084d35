//! Headless form elements and the view scope.
//!
//! The binding engine consumes a narrow element surface: read and write a
//! field value, get and set named attributes, check state, selected-option
//! text, content, visibility, and a `change` event. [`FormElement`] is the
//! render-free implementation of that surface, and [`FormView`] is the scope
//! a binding session runs against: an ordered collection of elements answering
//! selector queries in document order.
//!
//! Programmatic writes (`set_value`, `set_checked`) never fire the element's
//! `change` event, matching how a real input behaves when assigned from code.
//! Only the user-interaction simulators ([`edit`], [`toggle`],
//! [`choose_option`], [`FormView::click_radio`]) notify, which is one half of
//! the engine's feedback-loop guard.
//!
//! [`edit`]: FormElement::edit
//! [`toggle`]: FormElement::toggle
//! [`choose_option`]: FormElement::choose_option

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use horizon_formlink_core::{EventHub, EventSubscription, Value};

use crate::selector::Selector;

/// The DOM event name fired for user edits.
pub const CHANGE_EVENT: &str = "change";

/// A shared handle to a form element.
pub type ElementRef = Arc<FormElement>;

/// One option of a select element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    /// The submit value.
    pub value: String,
    /// The human-readable label.
    pub label: String,
}

/// A headless form element.
///
/// Built with the `with_*` builder methods and added to a [`FormView`]:
///
/// ```
/// use horizon_formlink::element::{FormElement, FormView};
///
/// let view = FormView::new();
/// let name = view.add(FormElement::input("text").with_attr("id", "name"));
/// assert_eq!(name.attr("type").as_deref(), Some("text"));
/// ```
pub struct FormElement {
    tag: String,
    attrs: RwLock<BTreeMap<String, String>>,
    value: RwLock<String>,
    checked: AtomicBool,
    options: RwLock<Vec<SelectOption>>,
    text: RwLock<String>,
    html: RwLock<String>,
    visible: AtomicBool,
    disabled: AtomicBool,
    events: EventHub,
}

impl FormElement {
    /// Create an element with the given tag name.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs: RwLock::new(BTreeMap::new()),
            value: RwLock::new(String::new()),
            checked: AtomicBool::new(false),
            options: RwLock::new(Vec::new()),
            text: RwLock::new(String::new()),
            html: RwLock::new(String::new()),
            visible: AtomicBool::new(true),
            disabled: AtomicBool::new(false),
            events: EventHub::new(),
        }
    }

    /// Create an `<input>` element with the given `type` attribute.
    pub fn input(input_type: impl Into<String>) -> Self {
        Self::new("input").with_attr("type", input_type)
    }

    /// Create a `<select>` element.
    pub fn select() -> Self {
        Self::new("select")
    }

    /// Create a `<textarea>` element.
    pub fn textarea() -> Self {
        Self::new("textarea")
    }

    /// Set an attribute (builder form).
    pub fn with_attr(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.write().insert(name.into(), value.into());
        self
    }

    /// Set the initial field value (builder form). Does not notify.
    ///
    /// Like the `value="..."` attribute in markup, this sets both the
    /// attribute and the live field it initializes. Later programmatic
    /// [`set_value`](Self::set_value) writes touch only the field.
    pub fn with_value(self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.attrs.write().insert("value".to_string(), value.clone());
        *self.value.write() = value;
        self
    }

    /// Set the checked state (builder form). Does not notify.
    pub fn with_checked(self, checked: bool) -> Self {
        self.checked.store(checked, Ordering::SeqCst);
        self
    }

    /// Append a select option (builder form).
    pub fn with_option(self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.write().push(SelectOption {
            value: value.into(),
            label: label.into(),
        });
        self
    }

    // -------------------------------------------------------------------------
    // Element surface
    // -------------------------------------------------------------------------

    /// The lowercase tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Read a named attribute.
    pub fn attr(&self, name: &str) -> Option<String> {
        self.attrs.read().get(name).cloned()
    }

    /// Write a named attribute.
    pub fn set_attr(&self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.write().insert(name.into(), value.into());
    }

    /// Remove a named attribute.
    pub fn remove_attr(&self, name: &str) -> Option<String> {
        self.attrs.write().remove(name)
    }

    /// The current field value.
    pub fn value(&self) -> String {
        self.value.read().clone()
    }

    /// Write the field value programmatically. Does not fire `change`.
    pub fn set_value(&self, value: impl Into<String>) {
        *self.value.write() = value.into();
    }

    /// The checked state.
    pub fn is_checked(&self) -> bool {
        self.checked.load(Ordering::SeqCst)
    }

    /// Write the checked state programmatically. Does not fire `change`.
    pub fn set_checked(&self, checked: bool) {
        self.checked.store(checked, Ordering::SeqCst);
    }

    /// The registered select options.
    pub fn options(&self) -> Vec<SelectOption> {
        self.options.read().clone()
    }

    /// The label of the option matching the current value, or empty.
    pub fn selected_text(&self) -> String {
        let value = self.value();
        self.options
            .read()
            .iter()
            .find(|option| option.value == value)
            .map(|option| option.label.clone())
            .unwrap_or_default()
    }

    /// The text content.
    pub fn text(&self) -> String {
        self.text.read().clone()
    }

    /// Set the text content.
    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.write() = text.into();
    }

    /// The markup content.
    pub fn html(&self) -> String {
        self.html.read().clone()
    }

    /// Set the markup content.
    pub fn set_html(&self, html: impl Into<String>) {
        *self.html.write() = html.into();
    }

    /// Whether the element is shown.
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    /// Show or hide the element.
    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }

    /// Whether the element is disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    /// Enable or disable the element.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Attach a listener for a named element event.
    pub fn on<F>(&self, event: &str, listener: F) -> EventSubscription
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.events.connect(event, listener)
    }

    /// Detach a listener previously attached with [`on`](Self::on).
    pub fn off(&self, subscription: EventSubscription) -> bool {
        self.events.disconnect(subscription)
    }

    /// Fire a named element event carrying the current field value.
    pub fn fire(&self, event: &str) {
        self.events.emit(event, Value::Str(self.value()));
    }

    /// The element's event hub.
    pub fn events(&self) -> &EventHub {
        &self.events
    }

    // -------------------------------------------------------------------------
    // User-interaction simulation
    // -------------------------------------------------------------------------

    /// Simulate the user typing a new value: writes it and fires `change`.
    pub fn edit(&self, value: impl Into<String>) {
        self.set_value(value);
        self.fire(CHANGE_EVENT);
    }

    /// Simulate the user toggling a checkbox: flips checked and fires `change`.
    pub fn toggle(&self) {
        let checked = !self.is_checked();
        self.set_checked(checked);
        self.fire(CHANGE_EVENT);
    }

    /// Simulate the user picking a select option: writes the value and fires
    /// `change`.
    pub fn choose_option(&self, value: impl Into<String>) {
        self.set_value(value);
        self.fire(CHANGE_EVENT);
    }
}

impl fmt::Debug for FormElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormElement")
            .field("tag", &self.tag)
            .field("attrs", &*self.attrs.read())
            .field("value", &*self.value.read())
            .field("checked", &self.is_checked())
            .finish()
    }
}

/// The element scope of one view.
///
/// Owns elements in document order; clones share the same scope.
#[derive(Clone, Default)]
pub struct FormView {
    elements: Arc<RwLock<Vec<ElementRef>>>,
}

impl FormView {
    /// Create an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element, returning its shared handle.
    pub fn add(&self, element: FormElement) -> ElementRef {
        let element = Arc::new(element);
        self.elements.write().push(element.clone());
        element
    }

    /// The elements matching a selector, in document order.
    pub fn select(&self, selector: &Selector) -> Vec<ElementRef> {
        self.elements
            .read()
            .iter()
            .filter(|element| selector.matches(element))
            .cloned()
            .collect()
    }

    /// The number of elements in the view.
    pub fn element_count(&self) -> usize {
        self.elements.read().len()
    }

    /// Simulate the user clicking a radio input.
    ///
    /// Every other radio sharing the target's `name` attribute is unchecked
    /// (browser group exclusivity), the target is checked, and `change` fires
    /// on the target.
    pub fn click_radio(&self, target: &ElementRef) {
        if let Some(group) = target.attr("name") {
            let group_selector = Selector::input("radio").attr_eq("name", &group);
            for member in self.select(&group_selector) {
                if !Arc::ptr_eq(&member, target) {
                    member.set_checked(false);
                }
            }
        }
        target.set_checked(true);
        target.fire(CHANGE_EVENT);
    }
}

static_assertions::assert_impl_all!(FormElement: Send, Sync);
static_assertions::assert_impl_all!(FormView: Send, Sync);
