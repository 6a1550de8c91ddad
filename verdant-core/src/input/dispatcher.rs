//! Ordered synchronous event fan-out
//!
//! Listeners are registered once at start-up and borrowed for the
//! lifetime of the dispatcher. Delivery is synchronous and in
//! registration order; the first failing listener aborts the rest of
//! the delivery and its error is handed back to the publisher.

use heapless::Vec;

use super::event::DecodedEvent;

/// Something that reacts to decoded input events
///
/// Takes `&self` so the same listener can be shared between the
/// dispatcher and its owner; listeners with state use interior
/// mutability.
pub trait EventListener {
    type Error;

    fn on_event(&self, event: DecodedEvent) -> Result<(), Self::Error>;
}

/// Error returned when registering a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SubscribeError {
    /// All listener slots are taken
    Full,
}

/// Fixed-capacity dispatcher over `N` listeners sharing an error type
pub struct EventDispatcher<'a, E, const N: usize> {
    listeners: Vec<&'a dyn EventListener<Error = E>, N>,
}

impl<'a, E, const N: usize> Default for EventDispatcher<'a, E, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, E, const N: usize> EventDispatcher<'a, E, N> {
    pub const fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Register a listener; it will see every event published afterwards
    pub fn subscribe(
        &mut self,
        listener: &'a dyn EventListener<Error = E>,
    ) -> Result<(), SubscribeError> {
        self.listeners
            .push(listener)
            .map_err(|_| SubscribeError::Full)
    }

    /// Deliver `event` to every listener in registration order
    pub fn publish(&self, event: DecodedEvent) -> Result<(), E> {
        for listener in &self.listeners {
            listener.on_event(event)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
