//! Document tree.
//!
//! Plain owned values: an [`Element`] owns its attributes, its namespace
//! declarations and its children, so a node can only ever sit under one
//! parent. There are no parent pointers; navigation is top-down.
//!
//! # Example
//!
//! ```
//! use csx_core::{AtomicValue, Element, QName};
//!
//! let title = Element::new(QName::prefixed("bk", "urn:books", "title"))
//!     .with_namespace("bk", "urn:books")
//!     .with_attribute(QName::local("lang"), "en")
//!     .with_text("Dune");
//!
//! assert_eq!(title.attribute(&QName::local("lang")), Some(&AtomicValue::from("en")));
//! assert_eq!(title.string_value(), "Dune");
//! ```

use crate::name::{NamespaceBinding, QName};
use crate::value::{classify_atomic, AtomicValue, RawAtomic};

// ============================================================================
// Core Types
// ============================================================================

/// An attribute: a name and one atomic value. Attributes own no children.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: QName,
    pub value: AtomicValue,
}

impl Attribute {
    pub fn new(name: QName, value: impl Into<AtomicValue>) -> Self {
        Attribute {
            name,
            value: value.into(),
        }
    }

    /// Attribute whose value comes from a host scalar, classified with
    /// [`classify_atomic`].
    pub fn classified(name: QName, raw: RawAtomic<'_>) -> Self {
        Attribute {
            name,
            value: classify_atomic(raw),
        }
    }
}

/// An element node.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: QName,
    pub attributes: Vec<Attribute>,
    /// Bindings declared on this element, not inherited ones.
    pub namespaces: Vec<NamespaceBinding>,
    pub children: Vec<Node>,
    /// Atomic values assigned as the element's value, separate from its children.
    pub typed_value: Option<Vec<AtomicValue>>,
}

/// A node in the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Character data. Carries no attributes and no bindings.
    Text(String),
    Comment(String),
    ProcessingInstruction {
        target: String,
        data: String,
    },
}

/// One entry of a root-level sequence: a node, or a bare atomic value.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Node(Node),
    Atomic(AtomicValue),
}

/// Bindings declared directly on `element`, never the inherited ones.
pub fn namespace_bindings_of(element: &Element) -> &[NamespaceBinding] {
    &element.namespaces
}

// ============================================================================
// Element
// ============================================================================

impl Element {
    pub fn new(name: QName) -> Self {
        Element {
            name,
            attributes: Vec::new(),
            namespaces: Vec::new(),
            children: Vec::new(),
            typed_value: None,
        }
    }

    /// Add a namespace declaration.
    pub fn with_namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.namespaces.push(NamespaceBinding::new(prefix, uri));
        self
    }

    /// Add an attribute after the existing ones.
    pub fn with_attribute(mut self, name: QName, value: impl Into<AtomicValue>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    /// Append a child node.
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append a text child.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::Text(text.into()))
    }

    /// Assign the element's typed value.
    pub fn with_typed_value(mut self, values: Vec<AtomicValue>) -> Self {
        self.typed_value = Some(values);
        self
    }

    /// Get an attribute value by name.
    pub fn attribute(&self, name: &QName) -> Option<&AtomicValue> {
        self.attributes
            .iter()
            .find(|a| &a.name == name)
            .map(|a| &a.value)
    }

    /// Iterate over child elements, skipping other node kinds.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// True if any child is an element.
    pub fn has_element_children(&self) -> bool {
        self.children.iter().any(Node::is_element)
    }

    /// Concatenated text of all descendant text nodes, in document order.
    pub fn string_value(&self) -> String {
        let mut result = String::new();
        self.collect_text(&mut result);
        result
    }

    fn collect_text(&self, buf: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(s) => buf.push_str(s),
                Node::Element(e) => e.collect_text(buf),
                Node::Comment(_) | Node::ProcessingInstruction { .. } => {}
            }
        }
    }
}

// ============================================================================
// Node / Item
// ============================================================================

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Check if this is an element node.
    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    /// Check if this is a text node.
    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    /// Get element view if this is an element.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node.
    pub fn text_content(&self) -> Option<&str> {
        match self {
            Node::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

impl Item {
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Item::Node(n) => Some(n),
            Item::Atomic(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        self.as_node().and_then(Node::as_element)
    }

    pub fn as_atomic(&self) -> Option<&AtomicValue> {
        match self {
            Item::Atomic(v) => Some(v),
            Item::Node(_) => None,
        }
    }
}

impl From<Node> for Item {
    fn from(n: Node) -> Self {
        Item::Node(n)
    }
}

impl From<Element> for Item {
    fn from(e: Element) -> Self {
        Item::Node(Node::Element(e))
    }
}

impl From<AtomicValue> for Item {
    fn from(v: AtomicValue) -> Self {
        Item::Atomic(v)
    }
}

// ============================================================================
// Tests
// ============================================================================
