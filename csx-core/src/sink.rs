//! Seams to the external CSX codec.
//!
//! The encoder side of a codec is an [`EventSink`]: the serializer pushes
//! events into it. The decoder side is an [`EventSource`]: it pushes the
//! events it decodes into whatever sink it is given, normally a
//! [`crate::Builder`]. Neither side pulls or looks ahead.

use std::convert::Infallible;

use crate::error::DriveError;
use crate::event::Event;

/// Receives events in stream order.
pub trait EventSink {
    type Error;

    fn event(&mut self, event: Event<'_>) -> Result<(), Self::Error>;
}

/// Records the stream, detaching each event from its borrows.
impl EventSink for Vec<Event<'static>> {
    type Error = Infallible;

    fn event(&mut self, event: Event<'_>) -> Result<(), Infallible> {
        self.push(event.into_owned());
        Ok(())
    }
}

impl<K: EventSink + ?Sized> EventSink for &mut K {
    type Error = K::Error;

    fn event(&mut self, event: Event<'_>) -> Result<(), K::Error> {
        (**self).event(event)
    }
}

/// Pushes a whole event stream into a sink.
///
/// Stops at the first failure on either side.
pub trait EventSource {
    type Error;

    fn drive<K: EventSink + ?Sized>(
        self,
        sink: &mut K,
    ) -> Result<(), DriveError<Self::Error, K::Error>>;
}

/// Replays a recorded stream.
impl<'a> EventSource for Vec<Event<'a>> {
    type Error = Infallible;

    fn drive<K: EventSink + ?Sized>(self, sink: &mut K) -> Result<(), DriveError<Infallible, K::Error>> {
        for event in self {
            sink.event(event).map_err(DriveError::Sink)?;
        }
        Ok(())
    }
}

/// Replays a recorded stream without consuming it.
impl<'s, 'a> EventSource for &'s [Event<'a>] {
    type Error = Infallible;

    fn drive<K: EventSink + ?Sized>(self, sink: &mut K) -> Result<(), DriveError<Infallible, K::Error>> {
        for event in self {
            sink.event(event.as_borrowed()).map_err(DriveError::Sink)?;
        }
        Ok(())
    }
}

/// Adapts a fallible event iterator, such as a decoder reading from I/O.
#[derive(Debug, Clone)]
pub struct IterSource<I>(pub I);

impl<'a, I, E> EventSource for IterSource<I>
where
    I: IntoIterator<Item = Result<Event<'a>, E>>,
{
    type Error = E;

    fn drive<K: EventSink + ?Sized>(self, sink: &mut K) -> Result<(), DriveError<E, K::Error>> {
        for item in self.0 {
            let event = item.map_err(DriveError::Source)?;
            sink.event(event).map_err(DriveError::Sink)?;
        }
        Ok(())
    }
}
