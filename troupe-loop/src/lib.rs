//! Dispatch loop for the troupe actor runtime.
//!
//! An [`Actor`] binds user state to a [`Handlers`] map and runs one logical
//! thread of control: a biased select over the host inbox, the system-events
//! channel, a bounded internal re-entry channel, and any user channels
//! registered at runtime. Handlers execute serially, mutate the state
//! through [`Context`], and steer the loop with the reply tokens from
//! [`troupe_types`].

mod channel;
pub mod config;
pub mod context;
pub mod handlers;
pub mod loop_impl;

pub use config::*;
pub use context::*;
pub use handlers::*;
pub use loop_impl::*;
