//! Notification plumbing for build mutations
//!
//! Operations post messages into a transaction scoped [`MessageBuffer`];
//! once the enclosing transaction reaches a terminal state the buffer is
//! flushed, exactly once, to a [`MessageSink`]. [`MessageBus`] is the stock
//! sink: a crossbar that fans each message out to weakly registered
//! listeners.

mod buffer;
pub use buffer::MessageBuffer;

mod bus;
pub use bus::MessageBus;

/// Receives the buffered messages of one completed transaction, in posting
/// order.
pub trait MessageSink<M>: Send + Sync {
    fn deliver(&self, messages: &[M]);
}

/// Observer attached to a [`MessageBus`].
pub trait MessageListener<M>: Send + Sync {
    fn on_message(&self, message: &M);
}
