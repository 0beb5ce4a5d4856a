//! Rendered tree produced by a component on each render.
//!
//! A `View` is plain data: a root container (`Div` or `Form`) with ordered
//! children. Elements a component needs to address later (focus, select)
//! carry a `Slot`, a stable name the `Document` resolves against whatever
//! tree is currently committed. Components never hold element pointers.

use std::fmt;

/// Stable handle naming an addressable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(pub &'static str);

impl Slot {
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    Div,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonType {
    Button,
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Emphasized static text.
    Info,
    Label,
    TextInput,
    Button(ButtonType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKind,
    pub class: &'static str,
    pub slot: Option<Slot>,
    pub id: Option<String>,
    /// Id of the element this label describes.
    pub html_for: Option<String>,
    /// Info text, label text, button caption, or input value.
    pub text: String,
    pub disabled: bool,
    pub busy: bool,
}

impl Element {
    fn new(kind: ElementKind, class: &'static str, text: impl Into<String>) -> Self {
        Self {
            kind,
            class,
            slot: None,
            id: None,
            html_for: None,
            text: text.into(),
            disabled: false,
            busy: false,
        }
    }

    pub fn info(class: &'static str, text: impl Into<String>) -> Self {
        Self::new(ElementKind::Info, class, text)
    }

    pub fn label(class: &'static str, text: impl Into<String>, html_for: impl Into<String>) -> Self {
        let mut el = Self::new(ElementKind::Label, class, text);
        el.html_for = Some(html_for.into());
        el
    }

    pub fn text_input(class: &'static str, id: impl Into<String>, value: impl Into<String>) -> Self {
        let mut el = Self::new(ElementKind::TextInput, class, value);
        el.id = Some(id.into());
        el
    }

    pub fn button(class: &'static str, caption: impl Into<String>, ty: ButtonType) -> Self {
        Self::new(ElementKind::Button(ty), class, caption)
    }

    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    /// Inputs and buttons can hold focus; static text cannot.
    pub fn is_focusable_kind(&self) -> bool {
        matches!(self.kind, ElementKind::TextInput | ElementKind::Button(_))
    }

    pub fn is_submit(&self) -> bool {
        matches!(self.kind, ElementKind::Button(ButtonType::Submit))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub root: RootKind,
    pub class: &'static str,
    pub children: Vec<Element>,
}

impl View {
    pub fn new(root: RootKind, class: &'static str) -> Self {
        Self {
            root,
            class,
            children: Vec::new(),
        }
    }

    pub fn child(mut self, element: Element) -> Self {
        self.children.push(element);
        self
    }

    pub fn find(&self, slot: Slot) -> Option<&Element> {
        self.children.iter().find(|el| el.slot == Some(slot))
    }

    pub fn by_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |el| el.class == class)
    }

    pub fn by_kind(&self, kind: ElementKind) -> impl Iterator<Item = &Element> + '_ {
        self.children.iter().filter(move |el| el.kind == kind)
    }

    /// The form's default button (first submit button), if this is a form.
    pub fn submit_button(&self) -> Option<&Element> {
        if self.root != RootKind::Form {
            return None;
        }
        self.children.iter().find(|el| el.is_submit())
    }

    /// Slots of enabled focusable elements in tree order.
    pub fn focus_order(&self) -> Vec<Slot> {
        self.children
            .iter()
            .filter(|el| el.is_focusable_kind() && !el.disabled)
            .filter_map(|el| el.slot)
            .collect()
    }
}
