//! The actor factory and its dispatch loop.

use std::ops::ControlFlow;

use serde_json::{json, Value};
use tokio::sync::mpsc;
use troupe_types::{
    event_kind, source, ActorError, Event, HandlerReply, InternalMessage, Message, Process,
};

use crate::channel::ChannelRegistry;
use crate::config::ActorConfig;
use crate::context::Context;
use crate::handlers::{EventFn, Handlers, InitFn, InternalFn, TopicFn, DEFAULT_TOPIC};

/// An actor: private state bound to a handler map, run to termination.
///
/// Constructed with [`Actor::new`], consumed by [`Actor::run`]. All
/// handlers execute serially on the run's single logical thread; the only
/// suspension point is the select at the top of the loop.
pub struct Actor<S> {
    state: S,
    handlers: Handlers<S>,
    config: ActorConfig,
}

impl<S> Actor<S> {
    /// Bind `state` to `handlers` with the default configuration.
    #[must_use]
    pub fn new(state: S, handlers: Handlers<S>) -> Self {
        Self::with_config(state, handlers, ActorConfig::default())
    }

    /// Bind `state` to `handlers` with an explicit configuration.
    #[must_use]
    pub fn with_config(state: S, handlers: Handlers<S>, config: ActorConfig) -> Self {
        Self {
            state,
            handlers,
            config,
        }
    }

    /// Run the actor to termination on `process`.
    ///
    /// Runs `__init` if present, then selects over the inbox, the events
    /// channel, the internal channel, and registered user channels until a
    /// handler exits or the host closes a core source. Returns the exit
    /// result, or `{"status":"completed"}` on host-channel closure.
    ///
    /// # Errors
    ///
    /// `ActorError::Handler` when any handler returns `Err`. The loop
    /// performs no catch; the run aborts at the failing handler.
    pub async fn run(self, mut process: impl Process) -> Result<Value, ActorError> {
        let inbox = process.inbox();
        let events = process.events();
        let (internal_tx, internal_rx) = mpsc::channel(self.config.internal_capacity.max(1));
        let Handlers {
            topics,
            init,
            on_event,
            on_cancel,
            on_internal,
            fallback,
        } = self.handlers;
        let ctx = Context {
            state: self.state,
            topics,
            channels: ChannelRegistry::new(),
            internal_tx: internal_tx.clone(),
            process: Box::new(process),
        };
        let runtime = ActorRuntime {
            ctx,
            inbox,
            events,
            internal_rx,
            internal_tx,
            init,
            on_event,
            on_cancel,
            on_internal,
            fallback,
        };
        runtime.entrypoint().await
    }
}

/// The default result when the host closes a core source.
fn completed() -> Value {
    json!({"status": "completed"})
}

/// What one pass of the select resolved to. `None` payloads mean the
/// originating channel is closed.
enum Selected {
    Inbox(Option<Message>),
    Event(Option<Event>),
    Internal(Option<InternalMessage>),
    User(usize, Option<Value>),
}

/// One run's worth of loop state: the context, the fixed lifecycle slots,
/// and the three core receivers.
struct ActorRuntime<S> {
    ctx: Context<S>,
    inbox: mpsc::Receiver<Message>,
    events: mpsc::Receiver<Event>,
    internal_rx: mpsc::Receiver<InternalMessage>,
    internal_tx: mpsc::Sender<InternalMessage>,
    init: Option<InitFn<S>>,
    on_event: Option<EventFn<S>>,
    on_cancel: Option<EventFn<S>>,
    on_internal: Option<InternalFn<S>>,
    fallback: Option<TopicFn<S>>,
}

impl<S> ActorRuntime<S> {
    async fn entrypoint(mut self) -> Result<Value, ActorError> {
        tracing::debug!(pid = %self.ctx.pid(), "actor starting");
        if let Some(init) = self.init.take() {
            match init(&mut self.ctx).map_err(ActorError::Handler)? {
                HandlerReply::Exit(result) => {
                    tracing::debug!("actor exited from init");
                    return Ok(result);
                }
                HandlerReply::Next { topic, payload } => {
                    self.enqueue_next(topic, payload, source::INIT).await;
                }
                HandlerReply::Continue => {}
            }
        }
        let result = self.routine().await;
        tracing::debug!("actor finished");
        result
    }

    async fn routine(&mut self) -> Result<Value, ActorError> {
        loop {
            // Priority order of the case set: inbox, events, internal,
            // then user channels in registration order.
            let selected = tokio::select! {
                biased;
                message = self.inbox.recv() => Selected::Inbox(message),
                event = self.events.recv() => Selected::Event(event),
                internal = self.internal_rx.recv() => Selected::Internal(internal),
                (idx, item) = self.ctx.channels.select() => Selected::User(idx, item),
            };
            let flow = match selected {
                Selected::Inbox(None) => {
                    tracing::debug!("inbox closed, completing");
                    return Ok(completed());
                }
                Selected::Event(None) => {
                    tracing::debug!("events channel closed, completing");
                    return Ok(completed());
                }
                Selected::Internal(None) => {
                    tracing::debug!("internal channel closed, completing");
                    return Ok(completed());
                }
                Selected::Inbox(Some(message)) => {
                    let Message {
                        from,
                        topic,
                        payload,
                    } = message;
                    self.dispatch_topic(topic, payload, &from)?
                }
                Selected::Event(Some(event)) => self.handle_event(event).await?,
                Selected::Internal(Some(message)) => self.handle_internal(message)?,
                Selected::User(idx, item) => self.handle_user_channel(idx, item)?,
            };
            if let ControlFlow::Break(result) = flow {
                return Ok(result);
            }
        }
    }

    /// Run a topic-dispatch chain to completion.
    ///
    /// The chain is a loop, never recursion: each `Next` reply re-resolves
    /// the handler from the live registry, replaces the payload only when
    /// the reply carries one, and keeps `from` fixed at the original
    /// sender. It never yields back to the select, so a chain cannot be
    /// preempted by other sources.
    fn dispatch_topic(
        &mut self,
        topic: String,
        payload: Value,
        from: &str,
    ) -> Result<ControlFlow<Value>, ActorError> {
        let mut current_topic = topic;
        let mut current_payload = payload;
        loop {
            let handler = if current_topic == DEFAULT_TOPIC {
                self.fallback.clone()
            } else {
                self.ctx
                    .topics
                    .get(&current_topic)
                    .cloned()
                    .or_else(|| self.fallback.clone())
            };
            let Some(handler) = handler else {
                tracing::debug!(topic = %current_topic, "no handler for topic, dropping");
                return Ok(ControlFlow::Continue(()));
            };
            let reply = handler(&mut self.ctx, &current_payload, &current_topic, from)
                .map_err(ActorError::Handler)?;
            match reply {
                HandlerReply::Exit(result) => return Ok(ControlFlow::Break(result)),
                HandlerReply::Next { topic, payload } => {
                    if let Some(payload) = payload {
                        current_payload = payload;
                    }
                    if topic.is_empty() {
                        if self.fallback.is_none() {
                            return Ok(ControlFlow::Continue(()));
                        }
                        current_topic = DEFAULT_TOPIC.to_string();
                    } else {
                        current_topic = topic;
                    }
                }
                HandlerReply::Continue => return Ok(ControlFlow::Continue(())),
            }
        }
    }

    /// Demultiplex a system event: `__on_event` first, then `__on_cancel`
    /// additionally for cancel events. Both fire when both are present; a
    /// `Next` from `__on_event` is enqueued on the internal channel and
    /// does not suppress the cancel hook.
    async fn handle_event(&mut self, event: Event) -> Result<ControlFlow<Value>, ActorError> {
        if let Some(hook) = self.on_event.clone() {
            match hook(&mut self.ctx, &event, &event.kind, &event.from)
                .map_err(ActorError::Handler)?
            {
                HandlerReply::Exit(result) => return Ok(ControlFlow::Break(result)),
                HandlerReply::Next { topic, payload } => {
                    self.enqueue_next(topic, payload, source::EVENT_HANDLER).await;
                }
                HandlerReply::Continue => {}
            }
        }
        if event.kind == event_kind::CANCEL
            && let Some(hook) = self.on_cancel.clone()
        {
            tracing::debug!(from = %event.from, "cancel event");
            if let HandlerReply::Exit(result) = hook(&mut self.ctx, &event, &event.kind, &event.from)
                .map_err(ActorError::Handler)?
            {
                return Ok(ControlFlow::Break(result));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Route an internal message: `__next` with a topic resumes dispatch,
    /// everything else goes to `__on_internal_message` or is dropped.
    fn handle_internal(
        &mut self,
        mut message: InternalMessage,
    ) -> Result<ControlFlow<Value>, ActorError> {
        if message.kind == InternalMessage::NEXT
            && let Some(topic) = message.topic.take()
        {
            let payload = message.payload.take().unwrap_or(Value::Null);
            return self.dispatch_topic(topic, payload, &message.from);
        }
        if let Some(hook) = self.on_internal.clone() {
            let payload = message.payload.unwrap_or(Value::Null);
            if let HandlerReply::Exit(result) = hook(&mut self.ctx, &payload, &message.kind, &message.from)
                .map_err(ActorError::Handler)?
            {
                return Ok(ControlFlow::Break(result));
            }
        } else {
            tracing::debug!(kind = %message.kind, "unhandled internal message, dropping");
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Invoke a user channel's callback. On closure the channel is removed
    /// by name before the next select; removal is by name because the
    /// callback itself may mutate the registry.
    fn handle_user_channel(
        &mut self,
        idx: usize,
        item: Option<Value>,
    ) -> Result<ControlFlow<Value>, ActorError> {
        let Some(entry) = self.ctx.channels.get(idx) else {
            return Ok(ControlFlow::Continue(()));
        };
        let name = entry.name.clone();
        let callback = entry.callback.clone();
        let closed = item.is_none();
        let reply =
            callback(&mut self.ctx, item, !closed, &name).map_err(ActorError::Handler)?;
        if closed {
            tracing::debug!(channel = %name, "user channel closed, unregistering");
            self.ctx.channels.remove(&name);
        }
        if let HandlerReply::Exit(result) = reply {
            return Ok(ControlFlow::Break(result));
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Post a `__next` re-dispatch on the internal channel. The channel is
    /// bounded; the send awaits space rather than dropping.
    async fn enqueue_next(&mut self, topic: String, payload: Option<Value>, from: &str) {
        let message = InternalMessage::next(topic, payload, from);
        if self.internal_tx.send(message).await.is_err() {
            tracing::warn!("internal channel closed, dropping re-dispatch");
        }
    }
}
