//! Error types.
//!
//! Only two failures ever reach a caller: a malformed event stream
//! ([`StructuralViolation`]) and whatever the external codec reports, passed
//! through untouched. Typed-value failures are absorbed by the serializer and
//! unknown atomic kinds degrade to strings, so neither has a fatal path.

use std::fmt;

use crate::name::QName;

/// What was wrong with an event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// An event arrived before `StartDocument`.
    NotStarted,
    /// `StartDocument` arrived inside an open document.
    DuplicateStartDocument,
    /// An event other than `StartDocument` arrived after `EndDocument`.
    AfterEndDocument,
    /// `EndElement` with no element open.
    UnmatchedEndElement { name: QName },
    /// `EndElement` naming a different element than the one open.
    MismatchedEndElement { expected: QName, found: QName },
    /// `EndDocument` while elements are still open.
    UnclosedElements { open: usize },
    /// `Attribute` with no element open.
    AttributeOutsideElement { name: QName },
    /// `Attribute` after the open element already received content.
    AttributeAfterContent { name: QName },
    /// The source ended without `EndDocument`.
    MissingEndDocument,
}

impl ViolationKind {
    /// Get a short human-readable message for this kind.
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotStarted => "event before start of document",
            Self::DuplicateStartDocument => "duplicate start of document",
            Self::AfterEndDocument => "event after end of document",
            Self::UnmatchedEndElement { .. } => "end element without open element",
            Self::MismatchedEndElement { .. } => "end element does not match open element",
            Self::UnclosedElements { .. } => "end of document with open elements",
            Self::AttributeOutsideElement { .. } => "attribute outside element",
            Self::AttributeAfterContent { .. } => "attribute after element content",
            Self::MissingEndDocument => "missing end of document",
        }
    }
}

/// A malformed event stream. Fatal for the `build` call that saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralViolation {
    pub kind: ViolationKind,
    /// Zero-based position of the offending event in the stream.
    pub event_index: usize,
}

impl StructuralViolation {
    pub fn new(kind: ViolationKind, event_index: usize) -> Self {
        StructuralViolation { kind, event_index }
    }
}

impl fmt::Display for StructuralViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at event {}", self.kind.message(), self.event_index)?;
        match &self.kind {
            ViolationKind::UnmatchedEndElement { name }
            | ViolationKind::AttributeOutsideElement { name }
            | ViolationKind::AttributeAfterContent { name } => write!(f, ": {}", name.clark()),
            ViolationKind::MismatchedEndElement { expected, found } => {
                write!(f, ": expected {}, found {}", expected.clark(), found.clark())
            }
            ViolationKind::UnclosedElements { open } => write!(f, ": {open} open"),
            _ => Ok(()),
        }
    }
}

impl std::error::Error for StructuralViolation {}

/// Error from [`crate::build`]: either the stream was malformed or the source
/// codec failed.
#[derive(Debug)]
pub enum BuildError<E> {
    /// The event stream was malformed.
    Structure(StructuralViolation),
    /// The event source reported a failure.
    Source(E),
}

impl<E> From<StructuralViolation> for BuildError<E> {
    fn from(e: StructuralViolation) -> Self {
        Self::Structure(e)
    }
}

impl<E: fmt::Display> fmt::Display for BuildError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structure(e) => write!(f, "malformed event stream: {e}"),
            Self::Source(e) => write!(f, "event source error: {e}"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for BuildError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Structure(e) => Some(e),
            Self::Source(e) => Some(e),
        }
    }
}

/// Failure while an [`crate::EventSource`] drives a sink: either side can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriveError<S, K> {
    Source(S),
    Sink(K),
}

/// The typed value of an element could not be computed.
///
/// Recoverable: the serializer treats it as "no typed value".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValueError {
    /// The element has element children, so it has no atomic typed value.
    ElementContent { name: QName },
    /// Any other host-side failure.
    Host(String),
}

impl fmt::Display for TypedValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ElementContent { name } => {
                write!(f, "element {} has element content", name.clark())
            }
            Self::Host(msg) => write!(f, "typed value unavailable: {msg}"),
        }
    }
}

impl std::error::Error for TypedValueError {}

/// A lexical name could not be turned into a [`QName`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    Empty,
    InvalidPrefix(String),
    InvalidLocalName(String),
    UnboundPrefix(String),
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty name"),
            Self::InvalidPrefix(p) => write!(f, "invalid prefix: {p}"),
            Self::InvalidLocalName(n) => write!(f, "invalid local name: {n}"),
            Self::UnboundPrefix(p) => write!(f, "unbound prefix: {p}"),
        }
    }
}

impl std::error::Error for NameError {}
