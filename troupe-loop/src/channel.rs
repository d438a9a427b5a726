//! Channel registry: user channels fused into the actor's select.

use std::future::poll_fn;
use std::task::Poll;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::handlers::ChannelFn;

pub(crate) struct ChannelEntry<S> {
    pub(crate) name: String,
    pub(crate) rx: mpsc::Receiver<Value>,
    pub(crate) callback: ChannelFn<S>,
}

/// Registered user channels, in select order.
pub(crate) struct ChannelRegistry<S> {
    entries: Vec<ChannelEntry<S>>,
}

impl<S> ChannelRegistry<S> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace. Replacing keeps the original select position, so
    /// a re-registered channel still holds exactly one case.
    pub(crate) fn insert(&mut self, name: String, rx: mpsc::Receiver<Value>, callback: ChannelFn<S>) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.name == name) {
            entry.rx = rx;
            entry.callback = callback;
        } else {
            self.entries.push(ChannelEntry { name, rx, callback });
        }
    }

    /// Remove by name, dropping the receiver. Returns whether an entry
    /// existed.
    pub(crate) fn remove(&mut self, name: &str) -> bool {
        match self.entries.iter().position(|entry| entry.name == name) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn get(&self, idx: usize) -> Option<&ChannelEntry<S>> {
        self.entries.get(idx)
    }

    /// Resolve one ready user channel, polling in registration order.
    /// Pends while the registry is empty, which parks this select case
    /// until a channel is registered.
    pub(crate) async fn select(&mut self) -> (usize, Option<Value>) {
        poll_fn(|cx| {
            for (idx, entry) in self.entries.iter_mut().enumerate() {
                if let Poll::Ready(item) = entry.rx.poll_recv(cx) {
                    return Poll::Ready((idx, item));
                }
            }
            Poll::Pending
        })
        .await
    }
}
