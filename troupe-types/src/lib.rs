//! Core types for the troupe actor runtime.
//!
//! An actor owns private state, consumes a serial stream of messages and
//! events from multiple sources, and replies with the control tokens in
//! [`reply`]. This crate carries the data model shared by every troupe
//! crate: inbox [`Message`]s, system [`Event`]s, internal re-entry
//! messages, the [`HandlerReply`] token ADT, error types, and the
//! [`Process`] contract a host must satisfy to run an actor.
//!
//! The dispatch loop itself lives in `troupe-loop`.

pub mod error;
pub mod message;
pub mod process;
pub mod reply;

pub use error::*;
pub use message::*;
pub use process::*;
pub use reply::*;

#[cfg(feature = "test-utils")]
pub mod test_utils;
