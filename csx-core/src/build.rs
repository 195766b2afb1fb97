//! Builder - events to tree.
//!
//! The builder is an [`EventSink`]. It keeps one owned stack of open
//! elements, innermost last. Each open frame carries the atomic values seen
//! since its start, and they are assigned as the element's typed value when
//! the element closes. A closed element is moved into its parent's children,
//! or into the result when nothing is open, never both.
//!
//! Any structural problem in the stream is fatal: the offending event is
//! rejected with a [`StructuralViolation`] and the builder should be dropped.

use std::mem;

use crate::error::{BuildError, DriveError, StructuralViolation, ViolationKind};
use crate::event::Event;
use crate::name::QName;
use crate::sink::{EventSink, EventSource};
use crate::tracing_macros::{debug, trace};
use crate::tree::{Attribute, Element, Item, Node};
use crate::value::AtomicValue;

/// Builder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Keep `Comment` events as comment nodes (otherwise they are dropped).
    pub keep_comments: bool,
    /// Keep `ProcessingInstruction` events as nodes (otherwise they are dropped).
    pub keep_processing_instructions: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            keep_comments: true,
            keep_processing_instructions: true,
        }
    }
}

impl BuildOptions {
    pub fn keep_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    pub fn keep_processing_instructions(mut self, keep: bool) -> Self {
        self.keep_processing_instructions = keep;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Waiting for `StartDocument`, before the first document or between two.
    Idle,
    InDocument,
}

/// An element that has started but not yet ended.
#[derive(Debug)]
struct Frame {
    element: Element,
    /// Atomic values for this element only.
    pending: Vec<AtomicValue>,
    /// Set by the first content event; attributes are rejected after it.
    has_content: bool,
}

/// Builds a sequence of root items from events.
#[derive(Debug)]
pub struct Builder {
    options: BuildOptions,
    state: State,
    stack: Vec<Frame>,
    result: Vec<Item>,
    /// Documents closed so far.
    documents: usize,
    /// Index of the next event, for error reports.
    position: usize,
}

impl Builder {
    pub fn new() -> Self {
        Self::with_options(BuildOptions::default())
    }

    pub fn with_options(options: BuildOptions) -> Self {
        Builder {
            options,
            state: State::Idle,
            stack: Vec::new(),
            result: Vec::new(),
            documents: 0,
            position: 0,
        }
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Handle one event.
    pub fn handle(&mut self, event: Event<'_>) -> Result<(), StructuralViolation> {
        let index = self.position;
        self.position += 1;
        trace!(index, event = event.kind_name(), depth = self.stack.len(), "build event");

        match self.state {
            State::Idle => match event {
                Event::StartDocument => {
                    self.stack.clear();
                    self.state = State::InDocument;
                    Ok(())
                }
                _ if self.documents > 0 => Err(self.violation(ViolationKind::AfterEndDocument, index)),
                _ => Err(self.violation(ViolationKind::NotStarted, index)),
            },
            State::InDocument => self.handle_in_document(event, index),
        }
    }

    fn handle_in_document(&mut self, event: Event<'_>, index: usize) -> Result<(), StructuralViolation> {
        match event {
            Event::StartDocument => Err(self.violation(ViolationKind::DuplicateStartDocument, index)),

            Event::EndDocument => {
                if !self.stack.is_empty() {
                    let open = self.stack.len();
                    return Err(self.violation(ViolationKind::UnclosedElements { open }, index));
                }
                self.documents += 1;
                self.state = State::Idle;
                Ok(())
            }

            // ---- Elements ----
            Event::StartElement { name, bindings } => {
                self.mark_content();
                let mut element = Element::new(name.into_owned());
                element.namespaces = bindings.into_owned();
                self.stack.push(Frame {
                    element,
                    pending: Vec::new(),
                    has_content: false,
                });
                Ok(())
            }
            Event::EndElement { name } => self.end_element(name.into_owned(), index),

            // ---- Attributes ----
            Event::Attribute { name, value } => {
                let Some(frame) = self.stack.last_mut() else {
                    let name = name.into_owned();
                    return Err(self.violation(ViolationKind::AttributeOutsideElement { name }, index));
                };
                if frame.has_content {
                    let name = name.into_owned();
                    return Err(self.violation(ViolationKind::AttributeAfterContent { name }, index));
                }
                frame
                    .element
                    .attributes
                    .push(Attribute::new(name.into_owned(), value.into_owned()));
                Ok(())
            }

            // ---- Content ----
            Event::Characters { text } => {
                self.append(Node::Text(text.into_owned()));
                Ok(())
            }
            Event::AtomicValue { value } => {
                let value = value.into_owned();
                match self.stack.last_mut() {
                    Some(frame) => {
                        frame.has_content = true;
                        frame.pending.push(value);
                    }
                    None => self.result.push(Item::Atomic(value)),
                }
                Ok(())
            }
            Event::Comment { text } => {
                if self.options.keep_comments {
                    self.append(Node::Comment(text.into_owned()));
                } else {
                    self.mark_content();
                }
                Ok(())
            }
            Event::ProcessingInstruction { target, data } => {
                if self.options.keep_processing_instructions {
                    self.append(Node::ProcessingInstruction {
                        target: target.into_owned(),
                        data: data.into_owned(),
                    });
                } else {
                    self.mark_content();
                }
                Ok(())
            }
        }
    }

    fn end_element(&mut self, name: QName, index: usize) -> Result<(), StructuralViolation> {
        let Some(mut frame) = self.stack.pop() else {
            return Err(self.violation(ViolationKind::UnmatchedEndElement { name }, index));
        };
        if frame.element.name != name {
            let expected = frame.element.name.clone();
            self.stack.push(frame);
            return Err(self.violation(
                ViolationKind::MismatchedEndElement { expected, found: name },
                index,
            ));
        }

        // The buffer goes with its own element, used or not.
        if !frame.pending.is_empty() {
            frame.element.typed_value = Some(mem::take(&mut frame.pending));
        }
        self.append(Node::Element(frame.element));
        Ok(())
    }

    /// Append a finished node to the open element, or to the result at top level.
    fn append(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(frame) => {
                frame.has_content = true;
                frame.element.children.push(node);
            }
            None => self.result.push(Item::Node(node)),
        }
    }

    fn mark_content(&mut self) {
        if let Some(frame) = self.stack.last_mut() {
            frame.has_content = true;
        }
    }

    fn violation(&self, kind: ViolationKind, index: usize) -> StructuralViolation {
        let violation = StructuralViolation::new(kind, index);
        debug!(%violation, "rejecting event stream");
        violation
    }

    /// Take the finished result. Fails while a document is open, or if no
    /// document was ever closed.
    pub fn finish(self) -> Result<Vec<Item>, StructuralViolation> {
        if self.state != State::Idle || self.documents == 0 {
            return Err(self.violation(ViolationKind::MissingEndDocument, self.position));
        }
        debug!(items = self.result.len(), events = self.position, "build finished");
        Ok(self.result)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for Builder {
    type Error = StructuralViolation;

    fn event(&mut self, event: Event<'_>) -> Result<(), StructuralViolation> {
        self.handle(event)
    }
}

/// Build root items from an event source with default options.
pub fn build<S: EventSource>(source: S) -> Result<Vec<Item>, BuildError<S::Error>> {
    build_with(source, BuildOptions::default())
}

/// Build root items from an event source.
pub fn build_with<S: EventSource>(
    source: S,
    options: BuildOptions,
) -> Result<Vec<Item>, BuildError<S::Error>> {
    let mut builder = Builder::with_options(options);
    source.drive(&mut builder).map_err(|e| match e {
        DriveError::Source(e) => BuildError::Source(e),
        DriveError::Sink(v) => BuildError::Structure(v),
    })?;
    Ok(builder.finish()?)
}

// ============================================================================
// Tests
// ============================================================================
