//! The host process contract consumed by the runtime.

use serde_json::Value;
use tokio::sync::mpsc;

use crate::message::{Event, Message};

/// A process-like host supplying the actor's identity and channels.
///
/// The runtime takes the inbox and events receivers exactly once when a
/// run starts; `send` and `pid` stay reachable from handlers through the
/// context for the rest of the run. Closing either receiver (dropping all
/// senders) terminates the actor with the default completion result.
pub trait Process: Send + 'static {
    /// Hand over the inbox receiver. Called once per run.
    fn inbox(&mut self) -> mpsc::Receiver<Message>;

    /// Hand over the system-events receiver. Called once per run.
    fn events(&mut self) -> mpsc::Receiver<Event>;

    /// Fire-and-forget send to another process. The runtime never inspects
    /// the outcome.
    fn send(&self, dest: &str, topic: &str, payload: Value);

    /// Identity of this process.
    fn pid(&self) -> String;
}
