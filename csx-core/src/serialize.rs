//! Serializer - tree to events.
//!
//! Walks a root-level item sequence depth-first and pushes events into an
//! [`EventSink`]. Starts are emitted pre-order and ends post-order, so the
//! stream mirrors the tree shape exactly.
//!
//! # Typed values versus children
//!
//! An element may be describable both as a list of atomic values and as its
//! ordinary children. For every element the serializer first asks its
//! [`TypedValues`] capability:
//!
//! - values came back: each typed atomic becomes an `AtomicValue` event, and
//!   Text children directly under this element are skipped because their
//!   content is already represented. Sub-elements, comments and processing
//!   instructions are still emitted.
//! - "not applicable", or the computation failed: children are emitted as
//!   usual, Text as `Characters`.
//!
//! `Untyped` atomics never go out as `AtomicValue`. Their payload is written
//! as `Characters` at the position of the value, standing in for the skipped
//! Text children. An empty payload writes nothing.

use std::borrow::Cow;

use crate::event::Event;
use crate::name::{NamespaceBinding, QName};
use crate::scope::NamespaceScope;
use crate::sink::EventSink;
use crate::tracing_macros::{trace, trace_span};
use crate::tree::{Element, Item, Node};
use crate::typed::{AssignedTypedValue, TypedValues};
use crate::value::AtomicValue;

/// Serializer configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Add namespace declarations for element and attribute names whose
    /// prefix is not bound to their URI in scope.
    pub fixup_namespaces: bool,
}

impl SerializeOptions {
    pub fn fixup_namespaces(mut self, fixup: bool) -> Self {
        self.fixup_namespaces = fixup;
        self
    }
}

/// Converts item sequences into event streams.
///
/// All per-call state is reset at the start of [`Serializer::serialize`], so
/// one serializer can be reused for any number of independent calls.
#[derive(Debug, Clone)]
pub struct Serializer<T = AssignedTypedValue> {
    typed: T,
    options: SerializeOptions,
    scope: NamespaceScope,
    saw_atomics: bool,
}

impl Serializer {
    pub fn new() -> Self {
        Serializer {
            typed: AssignedTypedValue,
            options: SerializeOptions::default(),
            scope: NamespaceScope::new(),
            saw_atomics: false,
        }
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TypedValues> Serializer<T> {
    /// Use a different typed-value capability.
    pub fn with_typed_values<U: TypedValues>(self, typed: U) -> Serializer<U> {
        Serializer {
            typed,
            options: self.options,
            scope: self.scope,
            saw_atomics: false,
        }
    }

    pub fn with_options(mut self, options: SerializeOptions) -> Self {
        self.options = options;
        self
    }

    /// Serialize `items` into `sink`, framed by `StartDocument`/`EndDocument`.
    ///
    /// Returns true if at least one `AtomicValue` event was emitted. Sink
    /// errors abort the call and are returned unchanged.
    pub fn serialize<K>(&mut self, items: &[Item], sink: &mut K) -> Result<bool, K::Error>
    where
        K: EventSink + ?Sized,
    {
        self.scope = NamespaceScope::new();
        self.saw_atomics = false;

        sink.event(Event::StartDocument)?;
        for item in items {
            match item {
                Item::Node(node) => self.write_node(node, false, sink)?,
                Item::Atomic(value) => self.write_atomic(Cow::Borrowed(value), sink)?,
            }
        }
        sink.event(Event::EndDocument)?;

        Ok(self.saw_atomics)
    }

    fn write_atomic<K>(&mut self, value: Cow<'_, AtomicValue>, sink: &mut K) -> Result<(), K::Error>
    where
        K: EventSink + ?Sized,
    {
        self.saw_atomics = true;
        sink.event(Event::AtomicValue { value })
    }

    fn write_node<K>(&mut self, node: &Node, suppress_text: bool, sink: &mut K) -> Result<(), K::Error>
    where
        K: EventSink + ?Sized,
    {
        match node {
            Node::Element(element) => self.write_element(element, sink),
            Node::Text(_) if suppress_text => Ok(()),
            Node::Text(text) => sink.event(Event::characters(text.as_str())),
            Node::Comment(text) => sink.event(Event::Comment {
                text: Cow::Borrowed(text.as_str()),
            }),
            Node::ProcessingInstruction { target, data } => sink.event(Event::ProcessingInstruction {
                target: Cow::Borrowed(target.as_str()),
                data: Cow::Borrowed(data.as_str()),
            }),
        }
    }

    fn write_element<K>(&mut self, element: &Element, sink: &mut K) -> Result<(), K::Error>
    where
        K: EventSink + ?Sized,
    {
        trace_span!("element", name = %element.name);

        let Declared {
            name,
            bindings,
            attribute_names,
        } = if self.options.fixup_namespaces {
            self.declare_with_fixup(element)
        } else {
            Declared::as_written(element)
        };

        sink.event(Event::StartElement {
            name: name.clone(),
            bindings,
        })?;

        for (attribute, attr_name) in element.attributes.iter().zip(attribute_names) {
            sink.event(Event::Attribute {
                name: attr_name,
                value: Cow::Borrowed(&attribute.value),
            })?;
        }

        let values = self.typed_value_of(element);
        let represented = !values.is_empty();
        for value in values {
            match value {
                AtomicValue::Untyped(text) if text.is_empty() => {}
                AtomicValue::Untyped(text) => sink.event(Event::characters(text))?,
                value => self.write_atomic(Cow::Owned(value), sink)?,
            }
        }

        for child in &element.children {
            self.write_node(child, represented, sink)?;
        }

        if self.options.fixup_namespaces {
            self.scope.pop_scope();
        }
        sink.event(Event::EndElement { name })
    }

    /// The element's typed value, or nothing when the typed-value view does
    /// not apply.
    fn typed_value_of(&self, element: &Element) -> Vec<AtomicValue> {
        match self.typed.typed_value(element) {
            Ok(values) => values.unwrap_or_default(),
            Err(_error) => {
                trace!(error = %_error, "typed value unavailable, using children");
                Vec::new()
            }
        }
    }

    /// Enter the element's namespace scope and declare whatever its names need.
    fn declare_with_fixup<'e>(&mut self, element: &'e Element) -> Declared<'e> {
        self.scope.push_scope();
        self.scope.declare_all(&element.namespaces);

        let mut added: Vec<NamespaceBinding> = Vec::new();
        // Prefixes this element's names already rely on.
        let mut claimed: Vec<String> = Vec::new();

        let name = self.fixup_name(&element.name, false, &mut added, &mut claimed);
        let mut attribute_names = Vec::with_capacity(element.attributes.len());
        for attribute in &element.attributes {
            attribute_names.push(self.fixup_name(&attribute.name, true, &mut added, &mut claimed));
        }

        let bindings = if added.is_empty() {
            Cow::Borrowed(element.namespaces.as_slice())
        } else {
            trace!(count = added.len(), "namespace fixup added bindings");
            let mut all = element.namespaces.clone();
            all.extend(added);
            Cow::Owned(all)
        };

        Declared {
            name,
            bindings,
            attribute_names,
        }
    }

    /// The wire form of one name. Keeps the written prefix when it already
    /// means the right URI or can be declared without disturbing a local
    /// declaration or a prefix claimed by an earlier name of the element;
    /// otherwise the name moves to a fresh prefix.
    fn fixup_name<'e>(
        &mut self,
        name: &'e QName,
        attribute: bool,
        added: &mut Vec<NamespaceBinding>,
        claimed: &mut Vec<String>,
    ) -> Cow<'e, QName> {
        // Unprefixed attributes are in no namespace whatever the default is.
        if attribute && !name.has_namespace() {
            return Cow::Borrowed(name);
        }

        let prefix = name.prefix.as_str();
        let uri = name.namespace_uri.as_str();
        let keeps_prefix = !attribute || !prefix.is_empty();

        if keeps_prefix && self.scope.is_bound(prefix, uri) {
            claimed.push(prefix.to_owned());
            return Cow::Borrowed(name);
        }
        if keeps_prefix
            && !self.scope.declared_here(prefix)
            && !claimed.iter().any(|p| p == prefix)
        {
            self.add_binding(added, prefix, uri);
            claimed.push(prefix.to_owned());
            return Cow::Borrowed(name);
        }
        if !name.has_namespace() {
            // No prefix can put a name back into no namespace.
            trace!(name = %name, "default namespace clash for a name in no namespace");
            return Cow::Borrowed(name);
        }

        let fresh = self.fresh_prefix();
        trace!(name = %name, prefix = %fresh, "name moved to a fresh prefix");
        self.add_binding(added, &fresh, uri);
        claimed.push(fresh.clone());
        Cow::Owned(name.with_prefix(fresh))
    }

    fn add_binding(&mut self, added: &mut Vec<NamespaceBinding>, prefix: &str, uri: &str) {
        self.scope.declare(prefix, uri);
        added.push(NamespaceBinding::new(prefix, uri));
    }

    /// A prefix of the form `ns{n}` that is not bound anywhere in scope.
    fn fresh_prefix(&self) -> String {
        (0u32..)
            .map(|n| format!("ns{n}"))
            .find(|p| self.scope.resolve(p).is_none())
            .unwrap_or_default()
    }
}

/// Names and bindings as they go on the wire for one element.
struct Declared<'e> {
    name: Cow<'e, QName>,
    bindings: Cow<'e, [NamespaceBinding]>,
    attribute_names: Vec<Cow<'e, QName>>,
}

impl<'e> Declared<'e> {
    fn as_written(element: &'e Element) -> Self {
        Declared {
            name: Cow::Borrowed(&element.name),
            bindings: Cow::Borrowed(&element.namespaces),
            attribute_names: element
                .attributes
                .iter()
                .map(|a| Cow::Borrowed(&a.name))
                .collect(),
        }
    }
}

/// Serialize `items` into `sink` with default options and the element's
/// assigned typed values.
pub fn serialize<K>(items: &[Item], sink: &mut K) -> Result<bool, K::Error>
where
    K: EventSink + ?Sized,
{
    Serializer::new().serialize(items, sink)
}

// ============================================================================
// Tests
// ============================================================================
