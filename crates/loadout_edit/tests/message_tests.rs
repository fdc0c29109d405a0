//! Tests for the notification crossbar and transaction buffer

use std::sync::{Arc, Mutex};

use loadout_edit::{MessageBuffer, MessageBus, MessageListener, MessageSink};

#[derive(Debug, Clone, PartialEq)]
enum Notice {
    ArmorChanged(i32),
    ItemAdded(String),
}

/// Listener that records everything it sees.
#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<Notice>>,
}

impl Recorder {
    fn seen(&self) -> Vec<Notice> {
        self.seen.lock().unwrap().clone()
    }
}

impl MessageListener<Notice> for Recorder {
    fn on_message(&self, message: &Notice) {
        self.seen.lock().unwrap().push(message.clone());
    }
}

#[test]
fn posted_messages_reach_attached_listeners() {
    let bus = MessageBus::new();
    let listener = Arc::new(Recorder::default());
    bus.attach(&listener);

    bus.post(&Notice::ArmorChanged(32));

    assert_eq!(listener.seen(), vec![Notice::ArmorChanged(32)]);
}

#[test]
fn every_listener_receives_each_message() {
    let bus = MessageBus::new();
    let first = Arc::new(Recorder::default());
    let second = Arc::new(Recorder::default());
    bus.attach(&first);
    bus.attach(&second);

    bus.post(&Notice::ItemAdded("srm6".to_string()));

    assert_eq!(first.seen(), second.seen());
    assert_eq!(first.seen().len(), 1);
}

#[test]
fn dropped_listeners_are_pruned() {
    let bus = MessageBus::new();
    let keeper = Arc::new(Recorder::default());
    let dropped = Arc::new(Recorder::default());
    bus.attach(&keeper);
    bus.attach(&dropped);
    assert_eq!(bus.listener_count(), 2);

    drop(dropped);
    assert_eq!(bus.listener_count(), 1);

    bus.post(&Notice::ArmorChanged(8));
    assert_eq!(keeper.seen(), vec![Notice::ArmorChanged(8)]);
}

#[test]
fn a_bus_fans_out_a_delivered_batch_in_order() {
    let bus = MessageBus::new();
    let listener = Arc::new(Recorder::default());
    bus.attach(&listener);

    let batch = vec![Notice::ItemAdded("srm6".to_string()), Notice::ArmorChanged(48)];
    bus.deliver(&batch);

    assert_eq!(listener.seen(), batch);
}

#[test]
fn a_buffer_drains_into_a_bus() {
    let bus = MessageBus::new();
    let listener = Arc::new(Recorder::default());
    bus.attach(&listener);

    let buffer = MessageBuffer::new();
    buffer.post(Notice::ArmorChanged(10));
    buffer.post(Notice::ArmorChanged(12));
    buffer.deliver_to(Some(&bus));

    assert!(buffer.is_empty());
    assert_eq!(listener.seen(), vec![Notice::ArmorChanged(10), Notice::ArmorChanged(12)]);
}
