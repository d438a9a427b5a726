//! In-process test doubles for the host contract.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::mpsc;

use crate::message::{Event, Message};
use crate::process::Process;

/// Buffer depth for the mock host's inbox and events channels.
const CHANNEL_DEPTH: usize = 32;

/// An outbound message recorded by [`LocalProcess`].
#[derive(Debug, Clone)]
pub struct Outbound {
    /// Destination pid.
    pub dest: String,
    /// Topic of the send.
    pub topic: String,
    /// Payload of the send.
    pub payload: Value,
}

/// An in-process [`Process`] implementation for tests and local
/// composition. Outbound sends are recorded instead of delivered.
pub struct LocalProcess {
    pid: String,
    inbox_rx: Option<mpsc::Receiver<Message>>,
    events_rx: Option<mpsc::Receiver<Event>>,
    sent: Arc<Mutex<Vec<Outbound>>>,
}

/// The feeding half of a [`LocalProcess`].
///
/// Dropping a sender closes the matching source, which the actor observes
/// as host-channel closure.
pub struct LocalHandle {
    /// Sender feeding the actor's inbox.
    pub inbox: mpsc::Sender<Message>,
    /// Sender feeding the actor's events channel.
    pub events: mpsc::Sender<Event>,
    sent: Arc<Mutex<Vec<Outbound>>>,
}

impl LocalProcess {
    /// Create a mock host and the handle that feeds it.
    #[must_use]
    pub fn new(pid: impl Into<String>) -> (Self, LocalHandle) {
        let (inbox_tx, inbox_rx) = mpsc::channel(CHANNEL_DEPTH);
        let (events_tx, events_rx) = mpsc::channel(CHANNEL_DEPTH);
        let sent = Arc::new(Mutex::new(Vec::new()));
        let process = Self {
            pid: pid.into(),
            inbox_rx: Some(inbox_rx),
            events_rx: Some(events_rx),
            sent: Arc::clone(&sent),
        };
        let handle = LocalHandle {
            inbox: inbox_tx,
            events: events_tx,
            sent,
        };
        (process, handle)
    }
}

impl LocalHandle {
    /// Everything the actor sent through the host so far.
    #[must_use]
    pub fn sent(&self) -> Vec<Outbound> {
        self.sent.lock().expect("test lock poisoned").clone()
    }
}

impl Process for LocalProcess {
    fn inbox(&mut self) -> mpsc::Receiver<Message> {
        self.inbox_rx.take().expect("inbox receiver already taken")
    }

    fn events(&mut self) -> mpsc::Receiver<Event> {
        self.events_rx.take().expect("events receiver already taken")
    }

    fn send(&self, dest: &str, topic: &str, payload: Value) {
        self.sent.lock().expect("test lock poisoned").push(Outbound {
            dest: dest.to_string(),
            topic: topic.to_string(),
            payload,
        });
    }

    fn pid(&self) -> String {
        self.pid.clone()
    }
}
