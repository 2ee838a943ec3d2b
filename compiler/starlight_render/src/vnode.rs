//! Element descriptions.
//!
//! A [`VNode`] tree is built fresh on every render and never mutated once
//! built. The renderer diffs it against the previous tree.

use std::any::TypeId;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::document::{Event, EventHandler};
use crate::{Hooks, RenderError};

pub type Props = FxHashMap<String, PropValue>;

/// A prop value. Handlers compare by identity.
#[derive(Clone)]
pub enum PropValue {
    Str(String),
    Number(f64),
    Bool(bool),
    Null,
    Style(BTreeMap<String, String>),
    Handler(EventHandler),
}

impl PropValue {
    pub fn handler(f: impl Fn(&Event) + 'static) -> Self {
        PropValue::Handler(Rc::new(f))
    }

    /// The text written to an attribute, if this value has one.
    pub fn to_attribute(&self) -> Option<String> {
        match self {
            PropValue::Str(s) => Some(s.clone()),
            PropValue::Number(n) => Some(format_number(*n)),
            PropValue::Bool(b) => Some(b.to_string()),
            PropValue::Null | PropValue::Style(_) | PropValue::Handler(_) => None,
        }
    }

    /// `false` and `null` remove an attribute instead of setting it.
    pub fn is_removal(&self) -> bool {
        matches!(self, PropValue::Bool(false) | PropValue::Null)
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Str(a), PropValue::Str(b)) => a == b,
            (PropValue::Number(a), PropValue::Number(b)) => a == b,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Null, PropValue::Null) => true,
            (PropValue::Style(a), PropValue::Style(b)) => a == b,
            (PropValue::Handler(a), PropValue::Handler(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Str(s) => write!(f, "{s:?}"),
            PropValue::Number(n) => write!(f, "{n}"),
            PropValue::Bool(b) => write!(f, "{b}"),
            PropValue::Null => f.write_str("null"),
            PropValue::Style(map) => f.debug_map().entries(map).finish(),
            PropValue::Handler(_) => f.write_str("<handler>"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Str(s.to_string())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Str(s)
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        PropValue::Number(n)
    }
}

impl From<i32> for PropValue {
    fn from(n: i32) -> Self {
        PropValue::Number(f64::from(n))
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}

impl<T: Into<PropValue>> From<Option<T>> for PropValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PropValue::Null, Into::into)
    }
}

type RenderFn = dyn Fn(&mut Hooks<'_>, &Props) -> Result<VNode, RenderError>;

/// A component function with a display name.
///
/// Two components are the same type when they wrap the same function or
/// closure type, so a component rebuilt on every render keeps its state.
#[derive(Clone)]
pub struct Component {
    name: Rc<str>,
    type_id: TypeId,
    render: Rc<RenderFn>,
}

impl Component {
    pub fn new<F>(name: &str, render: F) -> Self
    where
        F: Fn(&mut Hooks<'_>, &Props) -> Result<VNode, RenderError> + 'static,
    {
        Component {
            name: Rc::from(name),
            type_id: TypeId::of::<F>(),
            render: Rc::new(render),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn same_type(&self, other: &Component) -> bool {
        self.type_id == other.type_id
    }

    pub(crate) fn call(&self, hooks: &mut Hooks<'_>, props: &Props) -> Result<VNode, RenderError> {
        (self.render)(hooks, props)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.name)
    }
}

#[derive(Clone, Debug)]
pub struct Element {
    pub tag: String,
    pub props: Props,
    pub children: Vec<VNode>,
}

#[derive(Clone, Debug)]
pub struct ComponentNode {
    pub component: Component,
    pub props: Props,
    pub children: Vec<VNode>,
}

/// A node of an element description.
#[derive(Clone, Debug)]
pub enum VNode {
    Element(Element),
    Component(ComponentNode),
    Text(String),
    Number(f64),
    /// Several siblings returned from one component.
    Fragment(Vec<VNode>),
    /// Renders nothing. Occupies its position as an empty text node.
    Empty,
}

impl VNode {
    pub fn text(text: impl Into<String>) -> Self {
        VNode::Text(text.into())
    }

    pub fn component(component: Component, props: Props) -> Self {
        VNode::Component(ComponentNode {
            component,
            props,
            children: Vec::new(),
        })
    }

    /// Whether `self` and `other` can be patched in place rather than
    /// replaced.
    pub fn same_type(&self, other: &VNode) -> bool {
        match (self, other) {
            (VNode::Element(a), VNode::Element(b)) => a.tag == b.tag,
            (VNode::Component(a), VNode::Component(b)) => a.component.same_type(&b.component),
            (VNode::Text(a), VNode::Text(b)) => a == b,
            (VNode::Number(a), VNode::Number(b)) => a.to_bits() == b.to_bits(),
            (VNode::Fragment(_), VNode::Fragment(_)) | (VNode::Empty, VNode::Empty) => true,
            _ => false,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element(el) => &el.children,
            VNode::Component(node) => &node.children,
            VNode::Fragment(children) => children,
            VNode::Text(_) | VNode::Number(_) | VNode::Empty => &[],
        }
    }
}

impl From<&str> for VNode {
    fn from(text: &str) -> Self {
        VNode::Text(text.to_string())
    }
}

impl From<String> for VNode {
    fn from(text: String) -> Self {
        VNode::Text(text)
    }
}

impl From<f64> for VNode {
    fn from(n: f64) -> Self {
        VNode::Number(n)
    }
}

impl From<i32> for VNode {
    fn from(n: i32) -> Self {
        VNode::Number(f64::from(n))
    }
}

impl From<Vec<VNode>> for VNode {
    fn from(children: Vec<VNode>) -> Self {
        VNode::Fragment(children)
    }
}

impl<T: Into<VNode>> From<Option<T>> for VNode {
    fn from(node: Option<T>) -> Self {
        node.map_or(VNode::Empty, Into::into)
    }
}

impl From<ElementBuilder> for VNode {
    fn from(builder: ElementBuilder) -> Self {
        builder.build()
    }
}

/// What `create_element` builds: a host tag or a component.
pub enum ElementType {
    Tag(String),
    Component(Component),
}

impl From<&str> for ElementType {
    fn from(tag: &str) -> Self {
        ElementType::Tag(tag.to_string())
    }
}

impl From<String> for ElementType {
    fn from(tag: String) -> Self {
        ElementType::Tag(tag)
    }
}

impl From<Component> for ElementType {
    fn from(component: Component) -> Self {
        ElementType::Component(component)
    }
}

/// Build a description node. Nested fragments among `children` are
/// flattened into the child list.
pub fn create_element(
    element_type: impl Into<ElementType>,
    props: Props,
    children: Vec<VNode>,
) -> VNode {
    let mut flat = Vec::with_capacity(children.len());
    flatten_into(children, &mut flat);
    match element_type.into() {
        ElementType::Tag(tag) => VNode::Element(Element {
            tag,
            props,
            children: flat,
        }),
        ElementType::Component(component) => VNode::Component(ComponentNode {
            component,
            props,
            children: flat,
        }),
    }
}

fn flatten_into(children: Vec<VNode>, out: &mut Vec<VNode>) {
    for child in children {
        match child {
            VNode::Fragment(nested) => flatten_into(nested, out),
            other => out.push(other),
        }
    }
}

/// Start an element description: `h("li").prop("id", "a").child("text")`.
pub fn h(tag: &str) -> ElementBuilder {
    ElementBuilder {
        tag: tag.to_string(),
        props: Props::default(),
        children: Vec::new(),
    }
}

#[must_use]
pub struct ElementBuilder {
    tag: String,
    props: Props,
    children: Vec<VNode>,
}

impl ElementBuilder {
    pub fn prop(mut self, key: &str, value: impl Into<PropValue>) -> Self {
        self.props.insert(key.to_string(), value.into());
        self
    }

    /// Bind `event`, stored as the `on<event>` prop.
    pub fn on(mut self, event: &str, handler: impl Fn(&Event) + 'static) -> Self {
        self.props
            .insert(format!("on{event}"), PropValue::handler(handler));
        self
    }

    pub fn style(mut self, property: &str, value: &str) -> Self {
        let entry = self
            .props
            .entry("style".to_string())
            .or_insert_with(|| PropValue::Style(BTreeMap::new()));
        if let PropValue::Style(map) = entry {
            map.insert(property.to_string(), value.to_string());
        }
        self
    }

    pub fn child(mut self, child: impl Into<VNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<VNode>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> VNode {
        create_element(self.tag, self.props, self.children)
    }
}

/// Text for a number, as a JavaScript host would print it.
pub(crate) fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
