//! Inbox messages, system events, and internal re-entry messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event kinds delivered on the host's system-events channel.
pub mod event_kind {
    /// The host asks the actor to wind down. Delivered to `__on_event` and
    /// additionally to `__on_cancel`.
    pub const CANCEL: &str = "pid.cancel";
    /// A linked process exited.
    pub const EXIT: &str = "pid.exit";
    /// A monitored link went down.
    pub const LINK_DOWN: &str = "pid.link_down";
}

/// Origin tags carried in the `from` field of internal messages.
pub mod source {
    /// Enqueued by the `__init` hook returning a re-dispatch token.
    pub const INIT: &str = "init";
    /// Enqueued by the async bridge when off-loop work completes.
    pub const ASYNC: &str = "async";
    /// Enqueued by `__on_event` returning a re-dispatch token.
    pub const EVENT_HANDLER: &str = "event_handler";
}

/// A message delivered on the actor's inbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Identity of the sender. Preserved across a whole dispatch chain.
    pub from: String,
    /// Topic routing the message to a handler.
    pub topic: String,
    /// The user-visible payload.
    pub payload: Value,
}

impl Message {
    /// Create an inbox message.
    #[must_use]
    pub fn new(from: impl Into<String>, topic: impl Into<String>, payload: Value) -> Self {
        Self {
            from: from.into(),
            topic: topic.into(),
            payload,
        }
    }
}

/// A system event delivered on the host's events channel.
///
/// Only `kind` and `from` are interpreted by the runtime; everything else
/// the host attaches (a deadline, a result, ...) rides along in `extra`
/// and reaches the event hooks untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// The event kind, compared against [`event_kind`] constants.
    pub kind: String,
    /// The process the event originates from.
    pub from: String,
    /// Additional event fields, forwarded verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Event {
    /// Create an event with no extra fields.
    #[must_use]
    pub fn new(kind: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            from: from.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Create a cancel event.
    #[must_use]
    pub fn cancel(from: impl Into<String>) -> Self {
        Self::new(event_kind::CANCEL, from)
    }
}

/// A message on the actor's internal re-entry channel.
///
/// The loop interprets only the [`InternalMessage::NEXT`] kind, which
/// resumes topic dispatch; every other kind is handed to the
/// `__on_internal_message` hook, or dropped if none is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternalMessage {
    /// The message kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Topic to re-dispatch under, for [`InternalMessage::NEXT`] messages.
    pub topic: Option<String>,
    /// Payload for the re-dispatch or the internal hook.
    pub payload: Option<Value>,
    /// Source tag, one of the [`source`] constants or a user-chosen origin.
    pub from: String,
}

impl InternalMessage {
    /// Kind of re-entry messages that resume topic dispatch.
    pub const NEXT: &'static str = "__next";

    /// Create an internal message of an arbitrary kind.
    #[must_use]
    pub fn new(kind: impl Into<String>, payload: Option<Value>, from: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            topic: None,
            payload,
            from: from.into(),
        }
    }

    /// Create a `__next` re-dispatch message. An empty topic is recorded as
    /// no topic, which routes the message to the internal hook instead of
    /// topic dispatch.
    #[must_use]
    pub fn next(topic: impl Into<String>, payload: Option<Value>, from: impl Into<String>) -> Self {
        let topic = topic.into();
        Self {
            kind: Self::NEXT.to_string(),
            topic: (!topic.is_empty()).then_some(topic),
            payload,
            from: from.into(),
        }
    }
}
