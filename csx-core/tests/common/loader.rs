//! Fixture loading from YAML files
//!
//! A fixture describes a root item sequence in a compact YAML form and the
//! event stream the serializer must produce for it. Names are written
//! lexically (`p:title`) and resolved against the bindings declared on the
//! enclosing fixture elements.

use serde::Deserialize;
use std::path::Path;

use csx_core::{AtomicValue, Attribute, Element, Item, NamespaceScope, Node, QName};

/// A single test case from a fixture file
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub desc: String,
    pub items: Vec<FixtureItem>,
    pub events: Vec<ExpectedEvent>,
    /// Rebuilding the serialized events must give the input back.
    #[serde(default = "default_true")]
    pub roundtrip: bool,
    /// Serialize with the data-model typed values instead of assigned ones.
    #[serde(default)]
    pub xdm: bool,
    /// Serialize with namespace fixup enabled.
    #[serde(default)]
    pub fixup: bool,
}

fn default_true() -> bool {
    true
}

/// One root item or child node.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FixtureItem {
    Text(String),
    Comment {
        comment: String,
    },
    Pi {
        pi: (String, String),
    },
    /// `[type, lexical]`, classified like a host scalar.
    Atomic {
        atomic: (String, String),
    },
    Element(FixtureElement),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureElement {
    pub name: String,
    #[serde(default)]
    pub ns: Vec<(String, String)>,
    #[serde(default)]
    pub attrs: Vec<FixtureAttr>,
    #[serde(default)]
    pub typed: Option<Vec<(String, String)>>,
    #[serde(default)]
    pub children: Vec<FixtureItem>,
}

/// `[name, value]` for a string attribute, `[name, type, lexical]` otherwise.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FixtureAttr {
    Plain(String, String),
    Typed(String, String, String),
}

/// Expected event - a bare name, or a name followed by one or two contents
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExpectedEvent {
    /// StartDocument, EndDocument
    Bare(String),
    /// [EventName, "content"]
    WithContent(String, String),
    /// [EventName, "content", "detail"]
    WithDetail(String, String, String),
}

impl ExpectedEvent {
    #[allow(dead_code)]
    pub fn name(&self) -> &str {
        match self {
            ExpectedEvent::Bare(name)
            | ExpectedEvent::WithContent(name, _)
            | ExpectedEvent::WithDetail(name, _, _) => name,
        }
    }
}

impl TestCase {
    /// Materialize the fixture items as a tree.
    pub fn tree(&self) -> Vec<Item> {
        let mut scope = NamespaceScope::new();
        self.items
            .iter()
            .map(|item| match item {
                FixtureItem::Atomic { atomic } => Item::Atomic(AtomicValue::classify(&atomic.0, &atomic.1)),
                other => Item::Node(to_node(other, &mut scope, &self.id)),
            })
            .collect()
    }
}

fn to_node(item: &FixtureItem, scope: &mut NamespaceScope, id: &str) -> Node {
    match item {
        FixtureItem::Text(text) => Node::text(text.as_str()),
        FixtureItem::Comment { comment } => Node::Comment(comment.clone()),
        FixtureItem::Pi { pi } => Node::ProcessingInstruction {
            target: pi.0.clone(),
            data: pi.1.clone(),
        },
        FixtureItem::Atomic { .. } => panic!("{}: atomics are only allowed at the root", id),
        FixtureItem::Element(el) => Node::Element(to_element(el, scope, id)),
    }
}

fn to_element(el: &FixtureElement, scope: &mut NamespaceScope, id: &str) -> Element {
    scope.push_scope();
    let mut element = Element::new(QName::default());
    for (prefix, uri) in &el.ns {
        element = element.with_namespace(prefix.as_str(), uri.as_str());
    }
    scope.declare_all(&element.namespaces);

    element.name = QName::parse(&el.name, scope)
        .unwrap_or_else(|e| panic!("{}: bad element name {:?}: {}", id, el.name, e));

    for attr in &el.attrs {
        let (name, value) = match attr {
            FixtureAttr::Plain(name, value) => (name, AtomicValue::from(value.as_str())),
            FixtureAttr::Typed(name, ty, lexical) => (name, AtomicValue::classify(ty, lexical)),
        };
        let name = QName::parse_attribute(name, scope)
            .unwrap_or_else(|e| panic!("{}: bad attribute name {:?}: {}", id, name, e));
        element.attributes.push(Attribute::new(name, value));
    }

    if let Some(typed) = &el.typed {
        element.typed_value = Some(
            typed
                .iter()
                .map(|(ty, lexical)| AtomicValue::classify(ty, lexical))
                .collect(),
        );
    }

    element.children = el.children.iter().map(|c| to_node(c, scope, id)).collect();
    scope.pop_scope();
    element
}

/// Load all test cases from a YAML fixture file
pub fn load_fixtures(path: &Path) -> Vec<TestCase> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read fixture file {:?}: {}", path, e));
    serde_yaml::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture file {:?}: {}", path, e))
}

/// Load fixtures from the standard fixtures directory
pub fn load_fixtures_by_name(name: &str) -> Vec<TestCase> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{}.yaml", name));
    load_fixtures(&path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_elements() {
        let cases = load_fixtures_by_name("elements");
        assert!(!cases.is_empty());
        assert!(cases.iter().any(|c| c.id == "simple_element"));
    }
}
