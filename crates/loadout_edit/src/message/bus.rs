//! Broadcast hub for build notifications

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::{MessageListener, MessageSink};

/// Fans messages out to weakly registered listeners.
///
/// Listeners are held by `Weak` reference: dropping the listener's last
/// `Arc` unregisters it, and dead entries are pruned on the next post.
/// Used as the [`MessageSink`] behind an operation stack, it forwards each
/// buffered message of a completed transaction to every live listener.
pub struct MessageBus<M> {
    listeners: RwLock<Vec<Weak<dyn MessageListener<M>>>>,
}

impl<M> Default for MessageBus<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> MessageBus<M> {
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Register a listener. Only a weak reference is kept.
    pub fn attach<L>(&self, listener: &Arc<L>)
    where
        L: MessageListener<M> + 'static,
    {
        let listener: Arc<dyn MessageListener<M>> = listener.clone();
        let weak: Weak<dyn MessageListener<M>> = Arc::downgrade(&listener);
        self.listeners.write().push(weak);
    }

    /// Dispatch one message to every live listener, in attach order. Dead
    /// listeners are pruned first; dispatch happens outside the registry
    /// lock so a listener may attach others or post follow-ups.
    pub fn post(&self, message: &M) {
        let live: Vec<Arc<dyn MessageListener<M>>> = {
            let mut listeners = self.listeners.write();
            listeners.retain(|weak| weak.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };
        for listener in live {
            listener.on_message(message);
        }
    }

    /// Number of currently live listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.read().iter().filter(|weak| weak.strong_count() > 0).count()
    }
}

impl<M> MessageSink<M> for MessageBus<M> {
    fn deliver(&self, messages: &[M]) {
        for message in messages {
            self.post(message);
        }
    }
}
