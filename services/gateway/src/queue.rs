//! Ingress command queue
//!
//! Bounded multi-producer ring buffer with non-blocking push and a
//! single consumer: the engine thread. The order in which the consumer
//! pops commands is the serialization point for the whole system.

use crossbeam_queue::ArrayQueue;

use crate::commands::EngineCommand;

/// Bounded FIFO handing commands from ingress threads to the engine.
///
/// `push` never blocks; a full queue returns the command to the caller
/// so the transport can reject or retry. Only one thread may pop.
pub struct CommandQueue {
    inner: ArrayQueue<EngineCommand>,
}

impl CommandQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: ArrayQueue::new(capacity),
        }
    }

    /// Non-blocking push; returns the command back on overflow.
    pub fn push(&self, command: EngineCommand) -> Result<(), EngineCommand> {
        self.inner.push(command)
    }

    /// Pop the next command. Engine-thread only.
    pub fn pop(&self) -> Option<EngineCommand> {
        self.inner.pop()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }
}
