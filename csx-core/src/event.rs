//! Conversion events - the vocabulary shared by the serializer, the builder
//! and the external CSX codec.
//!
//! This is a SAX-style model: structure is represented by start/end pairs,
//! and nothing is accumulated by the event itself. Payloads are `Cow` so the
//! serializer can lend names and text straight out of the tree, while a
//! recorded stream owns its data (see [`Event::into_owned`]).
//!
//! ## Event Sequences
//!
//! `<bk:title xmlns:bk="urn:books" lang="en">Dune</bk:title>` emits:
//! ```text
//! StartDocument
//! StartElement { name: bk:title, bindings: [bk -> urn:books] }
//! Attribute { name: lang, value: String("en") }
//! Characters { text: "Dune" }
//! EndElement { name: bk:title }
//! EndDocument
//! ```
//!
//! An element whose content is a typed list emits one `AtomicValue` per item
//! in place of character data:
//! ```text
//! StartElement { name: sizes, bindings: [] }
//! AtomicValue { value: Int(1) }
//! AtomicValue { value: Int(2) }
//! EndElement { name: sizes }
//! ```

use std::borrow::Cow;

use crate::name::{NamespaceBinding, QName};
use crate::value::AtomicValue;

/// Conversion events.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<'a> {
    // ========== Document Events ==========

    /// Start of the item sequence. Exactly once per stream.
    StartDocument,

    /// End of the item sequence. Exactly once per stream.
    EndDocument,

    // ========== Structure Events ==========

    /// Element start, with the bindings declared on this element only.
    StartElement {
        name: Cow<'a, QName>,
        bindings: Cow<'a, [NamespaceBinding]>,
    },

    /// Element end. Names the same element as its matching start.
    EndElement {
        name: Cow<'a, QName>,
    },

    /// Attribute of the open element.
    ///
    /// Only valid between `StartElement` and the element's first content event.
    Attribute {
        name: Cow<'a, QName>,
        value: Cow<'a, AtomicValue>,
    },

    // ========== Content Events ==========

    /// Character data.
    Characters {
        text: Cow<'a, str>,
    },

    /// One item of a typed value, or a bare atomic item at sequence level.
    AtomicValue {
        value: Cow<'a, AtomicValue>,
    },

    /// Processing instruction: `<?target data?>`
    ProcessingInstruction {
        target: Cow<'a, str>,
        data: Cow<'a, str>,
    },

    /// Comment: `<!-- text -->`
    Comment {
        text: Cow<'a, str>,
    },
}

impl<'a> Event<'a> {
    /// Start of an element, borrowing its name and bindings.
    pub fn start_element(name: &'a QName, bindings: &'a [NamespaceBinding]) -> Self {
        Event::StartElement {
            name: Cow::Borrowed(name),
            bindings: Cow::Borrowed(bindings),
        }
    }

    /// End of an element, borrowing its name.
    pub fn end_element(name: &'a QName) -> Self {
        Event::EndElement {
            name: Cow::Borrowed(name),
        }
    }

    /// Attribute event, borrowing name and value.
    pub fn attribute(name: &'a QName, value: &'a AtomicValue) -> Self {
        Event::Attribute {
            name: Cow::Borrowed(name),
            value: Cow::Borrowed(value),
        }
    }

    /// Character data event.
    pub fn characters(text: impl Into<Cow<'a, str>>) -> Self {
        Event::Characters { text: text.into() }
    }

    /// Atomic value event, owning the value.
    pub fn atomic(value: impl Into<AtomicValue>) -> Self {
        Event::AtomicValue {
            value: Cow::Owned(value.into()),
        }
    }

    /// Detach the event from whatever it borrows.
    pub fn into_owned(self) -> Event<'static> {
        match self {
            Event::StartDocument => Event::StartDocument,
            Event::EndDocument => Event::EndDocument,
            Event::StartElement { name, bindings } => Event::StartElement {
                name: Cow::Owned(name.into_owned()),
                bindings: Cow::Owned(bindings.into_owned()),
            },
            Event::EndElement { name } => Event::EndElement {
                name: Cow::Owned(name.into_owned()),
            },
            Event::Attribute { name, value } => Event::Attribute {
                name: Cow::Owned(name.into_owned()),
                value: Cow::Owned(value.into_owned()),
            },
            Event::Characters { text } => Event::Characters {
                text: Cow::Owned(text.into_owned()),
            },
            Event::AtomicValue { value } => Event::AtomicValue {
                value: Cow::Owned(value.into_owned()),
            },
            Event::ProcessingInstruction { target, data } => Event::ProcessingInstruction {
                target: Cow::Owned(target.into_owned()),
                data: Cow::Owned(data.into_owned()),
            },
            Event::Comment { text } => Event::Comment {
                text: Cow::Owned(text.into_owned()),
            },
        }
    }

    /// A view of this event that borrows from it.
    pub fn as_borrowed(&self) -> Event<'_> {
        match self {
            Event::StartDocument => Event::StartDocument,
            Event::EndDocument => Event::EndDocument,
            Event::StartElement { name, bindings } => Event::StartElement {
                name: Cow::Borrowed(&**name),
                bindings: Cow::Borrowed(&**bindings),
            },
            Event::EndElement { name } => Event::EndElement {
                name: Cow::Borrowed(&**name),
            },
            Event::Attribute { name, value } => Event::Attribute {
                name: Cow::Borrowed(&**name),
                value: Cow::Borrowed(&**value),
            },
            Event::Characters { text } => Event::Characters {
                text: Cow::Borrowed(&**text),
            },
            Event::AtomicValue { value } => Event::AtomicValue {
                value: Cow::Borrowed(&**value),
            },
            Event::ProcessingInstruction { target, data } => Event::ProcessingInstruction {
                target: Cow::Borrowed(&**target),
                data: Cow::Borrowed(&**data),
            },
            Event::Comment { text } => Event::Comment {
                text: Cow::Borrowed(&**text),
            },
        }
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Event::StartDocument => "StartDocument",
            Event::EndDocument => "EndDocument",
            Event::StartElement { .. } => "StartElement",
            Event::EndElement { .. } => "EndElement",
            Event::Attribute { .. } => "Attribute",
            Event::Characters { .. } => "Characters",
            Event::AtomicValue { .. } => "AtomicValue",
            Event::ProcessingInstruction { .. } => "ProcessingInstruction",
            Event::Comment { .. } => "Comment",
        }
    }

    /// Check if this is a structure start event (has matching end).
    pub fn is_structure_start(&self) -> bool {
        matches!(self, Event::StartDocument | Event::StartElement { .. })
    }

    /// Check if this is a structure end event.
    pub fn is_structure_end(&self) -> bool {
        matches!(self, Event::EndDocument | Event::EndElement { .. })
    }

    /// Check if this event produces content of the open element, after which
    /// no more attributes may follow.
    pub fn is_content(&self) -> bool {
        matches!(
            self,
            Event::StartElement { .. }
                | Event::Characters { .. }
                | Event::AtomicValue { .. }
                | Event::ProcessingInstruction { .. }
                | Event::Comment { .. }
        )
    }
}
