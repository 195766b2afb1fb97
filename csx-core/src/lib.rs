//! CSX Core
//!
//! Converts between an in-memory document tree and the linear event stream
//! consumed and produced by a CSX (compact schema-aware XML) wire codec.
//! The byte-level codec itself lives outside this crate; it talks to us
//! through [`EventSink`] and [`EventSource`].
//!
//! # Architecture
//!
//! - **name.rs** - Qualified names and namespace bindings
//! - **scope.rs** - Stack-based namespace scope
//! - **value.rs** - Atomic values and type-tag classification
//! - **tree.rs** - Elements, text and root-level items
//! - **event.rs** - The event vocabulary shared by both directions
//! - **sink.rs** - Event sink/source traits implemented by codecs
//! - **typed.rs** - Typed-value capability used by the serializer
//! - **serialize.rs** - Tree to events
//! - **build.rs** - Events to tree
//!
//! # Example
//!
//! ```
//! use csx_core::{build, serialize, Element, Event, Item, QName};
//!
//! let tree = vec![Item::from(
//!     Element::new(QName::new("urn:books", "title")).with_text("Dune"),
//! )];
//!
//! let mut events: Vec<Event<'static>> = Vec::new();
//! serialize(&tree, &mut events).unwrap();
//!
//! let rebuilt = build(events).unwrap();
//! assert_eq!(rebuilt, tree);
//! ```

mod tracing_macros;

pub mod build;
pub mod error;
pub mod event;
pub mod name;
pub mod scope;
pub mod serialize;
pub mod sink;
pub mod tree;
pub mod typed;
pub mod value;

pub use build::{build, build_with, BuildOptions, Builder};
pub use error::{BuildError, DriveError, NameError, StructuralViolation, TypedValueError, ViolationKind};
pub use event::Event;
pub use name::{NamespaceBinding, QName, XML_NAMESPACE};
pub use scope::NamespaceScope;
pub use serialize::{serialize, SerializeOptions, Serializer};
pub use sink::{EventSink, EventSource, IterSource};
pub use tree::{namespace_bindings_of, Attribute, Element, Item, Node};
pub use typed::{AssignedTypedValue, TypedValues, XdmTypedValue};
pub use value::{classify_atomic, AtomicKind, AtomicValue, RawAtomic};
