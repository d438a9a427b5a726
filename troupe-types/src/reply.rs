//! Reply tokens: the values handlers return to drive dispatch control flow.

use serde_json::Value;

/// A handler's reply, inspected by the dispatch loop.
///
/// Replies are plain values, not effects: returning one does nothing until
/// the loop looks at it.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerReply {
    /// Terminate the actor. `run` returns the carried result.
    Exit(Value),
    /// Immediately re-dispatch under `topic` without re-entering the outer
    /// select.
    Next {
        /// Topic to dispatch next. An empty topic routes the chain to the
        /// `__default` handler.
        topic: String,
        /// Replacement payload. `None` reuses the current payload;
        /// `Some(Value::Null)` is a replacement, not an absence.
        payload: Option<Value>,
    },
    /// No control effect. The loop moves on to the next select.
    Continue,
}

/// Exit token: terminate the actor with `result`.
#[must_use]
pub fn exit(result: Value) -> HandlerReply {
    HandlerReply::Exit(result)
}

/// Re-dispatch token reusing the current payload.
#[must_use]
pub fn next(topic: impl Into<String>) -> HandlerReply {
    HandlerReply::Next {
        topic: topic.into(),
        payload: None,
    }
}

/// Re-dispatch token replacing the current payload.
#[must_use]
pub fn next_with(topic: impl Into<String>, payload: Value) -> HandlerReply {
    HandlerReply::Next {
        topic: topic.into(),
        payload: Some(payload),
    }
}
