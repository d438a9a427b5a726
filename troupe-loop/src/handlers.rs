//! Handler registry: the factory-time partition of lifecycle slots and
//! topic handlers.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use troupe_types::{Event, HandlerError, HandlerReply};

use crate::context::Context;

/// Result of a handler invocation. An `Err` aborts the run.
pub type HandlerResult = Result<HandlerReply, HandlerError>;

/// A topic handler: `(state, payload, topic, from)`.
pub type TopicFn<S> =
    Arc<dyn Fn(&mut Context<S>, &Value, &str, &str) -> HandlerResult + Send + Sync>;

/// An event hook: `(state, event, kind, from)`.
pub type EventFn<S> =
    Arc<dyn Fn(&mut Context<S>, &Event, &str, &str) -> HandlerResult + Send + Sync>;

/// The init hook: `(state)`.
pub type InitFn<S> = Arc<dyn Fn(&mut Context<S>) -> HandlerResult + Send + Sync>;

/// The internal-message hook: `(state, payload, kind, from)`.
pub type InternalFn<S> =
    Arc<dyn Fn(&mut Context<S>, &Value, &str, &str) -> HandlerResult + Send + Sync>;

/// A user-channel callback: `(state, value, ok, channel_name)`. `ok` is
/// false exactly when the channel closed, in which case `value` is `None`.
pub type ChannelFn<S> =
    Arc<dyn Fn(&mut Context<S>, Option<Value>, bool, &str) -> HandlerResult + Send + Sync>;

/// Name under which the fallback topic handler is addressable in chains.
pub(crate) const DEFAULT_TOPIC: &str = "__default";

/// Prefix marking reserved lifecycle slot names.
pub(crate) const RESERVED_PREFIX: &str = "__";

/// The handler map handed to [`Actor::new`](crate::Actor::new).
///
/// Construction partitions handlers once: the `"__"`-prefixed lifecycle
/// slots are fixed for the lifetime of the run, while the topic map stays
/// mutable through [`Context::add_handler`] and [`Context::remove_handler`].
pub struct Handlers<S> {
    pub(crate) topics: HashMap<String, TopicFn<S>>,
    pub(crate) init: Option<InitFn<S>>,
    pub(crate) on_event: Option<EventFn<S>>,
    pub(crate) on_cancel: Option<EventFn<S>>,
    pub(crate) on_internal: Option<InternalFn<S>>,
    pub(crate) fallback: Option<TopicFn<S>>,
}

impl<S> Handlers<S> {
    /// Create an empty handler map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            topics: HashMap::new(),
            init: None,
            on_event: None,
            on_cancel: None,
            on_internal: None,
            fallback: None,
        }
    }

    /// Register a topic handler.
    ///
    /// `"__default"` routes to the fallback slot. Any other `"__"`-prefixed
    /// name is a reserved lifecycle name and is held aside, never
    /// dispatched; the typed hooks below are the way to fill those slots.
    #[must_use]
    pub fn on<F>(mut self, topic: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Context<S>, &Value, &str, &str) -> HandlerResult + Send + Sync + 'static,
    {
        let topic = topic.into();
        if topic == DEFAULT_TOPIC {
            self.fallback = Some(Arc::new(handler));
        } else if topic.starts_with(RESERVED_PREFIX) {
            tracing::warn!(topic = %topic, "reserved handler name held aside, never dispatched");
        } else {
            self.topics.insert(topic, Arc::new(handler));
        }
        self
    }

    /// Set the `__init` hook, invoked once before the loop starts.
    #[must_use]
    pub fn on_init<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut Context<S>) -> HandlerResult + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(handler));
        self
    }

    /// Set the `__on_event` hook, invoked for every system event.
    #[must_use]
    pub fn on_event<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut Context<S>, &Event, &str, &str) -> HandlerResult + Send + Sync + 'static,
    {
        self.on_event = Some(Arc::new(handler));
        self
    }

    /// Set the `__on_cancel` hook, invoked for cancel events in addition to
    /// `__on_event`, never instead of it.
    #[must_use]
    pub fn on_cancel<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut Context<S>, &Event, &str, &str) -> HandlerResult + Send + Sync + 'static,
    {
        self.on_cancel = Some(Arc::new(handler));
        self
    }

    /// Set the `__on_internal_message` hook for internal messages that are
    /// not `__next` re-dispatches.
    #[must_use]
    pub fn on_internal<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut Context<S>, &Value, &str, &str) -> HandlerResult + Send + Sync + 'static,
    {
        self.on_internal = Some(Arc::new(handler));
        self
    }

    /// Set the `__default` fallback, the terminus of chains with an unknown
    /// or missing topic.
    #[must_use]
    pub fn on_default<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut Context<S>, &Value, &str, &str) -> HandlerResult + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(handler));
        self
    }
}

impl<S> Default for Handlers<S> {
    fn default() -> Self {
        Self::new()
    }
}
