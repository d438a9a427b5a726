//! The per-run context: user state plus the runtime helpers.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use troupe_types::{source, ActorError, HandlerReply, InternalMessage, Process};

use crate::channel::ChannelRegistry;
use crate::handlers::{HandlerResult, TopicFn, RESERVED_PREFIX};

/// The state wrapper handed to every handler invocation.
///
/// Owns the user state for the lifetime of one run and carries the runtime
/// helpers: handler and channel registration, the async bridge, and host
/// passthrough. One `Context` exists per run; handlers receive it mutably,
/// one at a time.
pub struct Context<S> {
    /// The user state. Exactly one writer at a time: the current handler.
    pub state: S,
    pub(crate) topics: HashMap<String, TopicFn<S>>,
    pub(crate) channels: ChannelRegistry<S>,
    pub(crate) internal_tx: mpsc::Sender<InternalMessage>,
    pub(crate) process: Box<dyn Process>,
}

impl<S> Context<S> {
    /// Upsert a topic handler. Takes effect from the next dispatch step;
    /// the currently-running handler is never swapped out mid-invocation.
    ///
    /// # Errors
    ///
    /// `ActorError::InvalidHandler` on an empty or `"__"`-prefixed topic.
    pub fn add_handler<F>(&mut self, topic: impl Into<String>, handler: F) -> Result<(), ActorError>
    where
        F: Fn(&mut Context<S>, &Value, &str, &str) -> HandlerResult + Send + Sync + 'static,
    {
        let topic = topic.into();
        if topic.is_empty() {
            return Err(ActorError::InvalidHandler("topic name is empty".into()));
        }
        if topic.starts_with(RESERVED_PREFIX) {
            return Err(ActorError::InvalidHandler(format!(
                "topic '{topic}' is reserved"
            )));
        }
        self.topics.insert(topic, Arc::new(handler));
        Ok(())
    }

    /// Remove a topic handler. Returns whether one was removed. Reserved
    /// lifecycle slots live outside the topic map and cannot be touched.
    pub fn remove_handler(&mut self, topic: &str) -> bool {
        self.topics.remove(topic).is_some()
    }

    /// Register a user channel under a stable name and fuse it into the
    /// select-case set. Re-registering a name replaces the receiver and
    /// callback in place, leaving exactly one case for the channel.
    ///
    /// The callback receives `(state, value, ok, channel_name)`; `ok` is
    /// false exactly once, when the channel closes, after which the channel
    /// is removed before any further select.
    ///
    /// # Errors
    ///
    /// `ActorError::InvalidChannel` on an empty name.
    pub fn register_channel<F>(
        &mut self,
        name: impl Into<String>,
        rx: mpsc::Receiver<Value>,
        callback: F,
    ) -> Result<(), ActorError>
    where
        F: Fn(&mut Context<S>, Option<Value>, bool, &str) -> HandlerResult + Send + Sync + 'static,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(ActorError::InvalidChannel("channel name is empty".into()));
        }
        tracing::debug!(channel = %name, "registering user channel");
        self.channels.insert(name, rx, Arc::new(callback));
        Ok(())
    }

    /// Unregister a user channel, dropping its receiver. Returns whether a
    /// channel was registered under `name`.
    pub fn unregister_channel(&mut self, name: &str) -> bool {
        let removed = self.channels.remove(name);
        if removed {
            tracing::debug!(channel = %name, "unregistered user channel");
        }
        removed
    }

    /// Number of user channels currently in the select-case set.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Run `future` off the actor's thread. If it resolves to
    /// [`HandlerReply::Next`], the completion re-enters the loop as a
    /// `__next` internal message from source `"async"`; any other
    /// resolution is discarded.
    ///
    /// This is the only way off-loop work may feed back into dispatch
    /// without breaking the single-writer state contract.
    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = HandlerReply> + Send + 'static,
    {
        let tx = self.internal_tx.clone();
        tokio::spawn(async move {
            if let HandlerReply::Next { topic, payload } = future.await {
                let message = InternalMessage::next(topic, payload, source::ASYNC);
                if tx.send(message).await.is_err() {
                    tracing::debug!("actor finished before async completion was delivered");
                }
            }
        });
    }

    /// A sender for the actor's bounded internal channel: the off-loop
    /// re-entry bridge. Messages of kind `"__next"` carrying a topic resume
    /// topic dispatch; every other kind goes to the
    /// `__on_internal_message` hook.
    #[must_use]
    pub fn internal_sender(&self) -> mpsc::Sender<InternalMessage> {
        self.internal_tx.clone()
    }

    /// Fire-and-forget send through the host process.
    pub fn send(&self, dest: &str, topic: &str, payload: Value) {
        self.process.send(dest, topic, payload);
    }

    /// Identity of the hosting process.
    #[must_use]
    pub fn pid(&self) -> String {
        self.process.pid()
    }
}
