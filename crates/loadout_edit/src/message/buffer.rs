//! Transaction scoped message accumulator

use std::sync::Arc;

use parking_lot::Mutex;

use super::MessageSink;

/// Collects notification messages posted while a transaction is running.
///
/// Cheap to clone; all clones share the same queue. A composite hands
/// clones to its sub-operations at build time and drains the queue once the
/// transaction has reached a terminal state, so observers never see
/// messages from a half-finished transaction.
pub struct MessageBuffer<M> {
    messages: Arc<Mutex<Vec<M>>>,
}

impl<M> Clone for MessageBuffer<M> {
    fn clone(&self) -> Self {
        Self {
            messages: Arc::clone(&self.messages),
        }
    }
}

impl<M> Default for MessageBuffer<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> MessageBuffer<M> {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a message for delivery when the enclosing transaction ends.
    pub fn post(&self, message: M) {
        self.messages.lock().push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    /// Drop everything that was queued.
    pub fn clear(&self) {
        self.messages.lock().clear();
    }

    /// Take all queued messages, leaving the buffer empty.
    pub fn drain(&self) -> Vec<M> {
        std::mem::take(&mut *self.messages.lock())
    }

    /// Hand the queued messages to `sink` in posting order. Without a sink
    /// the messages are dropped. The buffer is empty afterwards either way.
    pub fn deliver_to(&self, sink: Option<&dyn MessageSink<M>>) {
        let messages = self.drain();
        if messages.is_empty() {
            return;
        }
        if let Some(sink) = sink {
            sink.deliver(&messages);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_queue() {
        let buffer = MessageBuffer::new();
        let clone = buffer.clone();
        clone.post("a");
        buffer.post("b");

        assert_eq!(buffer.drain(), vec!["a", "b"]);
        assert!(clone.is_empty());
    }

    #[test]
    fn deliver_without_sink_discards() {
        let buffer = MessageBuffer::new();
        buffer.post(1);
        buffer.deliver_to(None);
        assert!(buffer.is_empty());
    }
}
