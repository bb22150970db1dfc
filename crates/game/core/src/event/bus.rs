//! Single-threaded FIFO event queue.

use std::collections::VecDeque;

use super::{Event, EventKind};

/// Errors surfaced while draining the bus.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
    #[error("event drain exceeded {limit} events; {discarded} pending events discarded")]
    DrainLimitExceeded { limit: usize, discarded: usize },
}

/// Unbounded FIFO of [`Event`]s, drained fully once per frame.
///
/// Draining is not a snapshot: events emitted by a handler during a drain are
/// appended to the tail and processed by the same drain call.
#[derive(Clone, Debug, Default)]
pub struct EventBus {
    queue: VecDeque<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event to the tail.
    pub fn emit(&mut self, event: impl Into<Event>) {
        let event = event.into();
        tracing::trace!(kind = %event.kind, "event emitted");
        self.queue.push_back(event);
    }

    /// Pops the head of the queue.
    pub fn pop(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Kinds currently queued, head first.
    pub fn pending_kinds(&self) -> impl Iterator<Item = EventKind> + '_ {
        self.queue.iter().map(|event| event.kind)
    }

    /// Drain-and-discard used on level transitions. Returns how many events
    /// were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        dropped
    }

    /// Pops the head for the `processed`-th dispatch of a bounded drain.
    ///
    /// Once `processed` reaches `limit` with events still queued, the rest of
    /// the queue is discarded and [`BusError::DrainLimitExceeded`] returned.
    pub fn next_within(
        &mut self,
        processed: usize,
        limit: usize,
    ) -> Result<Option<Event>, BusError> {
        if processed >= limit && !self.queue.is_empty() {
            let discarded = self.clear();
            tracing::error!(limit, discarded, "event drain limit exceeded");
            return Err(BusError::DrainLimitExceeded { limit, discarded });
        }
        Ok(self.queue.pop_front())
    }

    /// Pops events until the queue is empty, handing each to `handler`
    /// together with the bus so the handler can emit follow-ups.
    ///
    /// At most `limit` events are processed; past that the remaining queue is
    /// discarded to break emit loops.
    pub fn drain_with<F>(&mut self, limit: usize, mut handler: F) -> Result<usize, BusError>
    where
        F: FnMut(Event, &mut EventBus),
    {
        let mut processed = 0;
        while let Some(event) = self.next_within(processed, limit)? {
            handler(event, self);
            processed += 1;
        }
        Ok(processed)
    }
}
