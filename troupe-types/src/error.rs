//! Error types for the actor runtime.

use thiserror::Error;

/// A boxed error escaping a user handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Errors from actor construction, the context helpers, and the dispatch
/// loop.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ActorError {
    /// `add_handler` was given an unusable topic name.
    #[error("invalid handler: {0}")]
    InvalidHandler(String),

    /// `register_channel` was given an unusable channel name.
    #[error("invalid channel: {0}")]
    InvalidChannel(String),

    /// A handler failed. The run aborts; the loop performs no catch.
    #[error("handler failed: {0}")]
    Handler(#[from] HandlerError),
}
