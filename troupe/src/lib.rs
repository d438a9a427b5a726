#![deny(missing_docs)]
//! # troupe: umbrella crate
//!
//! Single import surface for the troupe actor runtime. Re-exports the data
//! model (`troupe-types`) and the dispatch loop (`troupe-loop`), plus a
//! `prelude` for the happy path.
//!
//! ```no_run
//! use troupe::prelude::*;
//! use serde_json::json;
//!
//! # async fn demo(process: impl Process) -> Result<(), ActorError> {
//! let handlers = Handlers::<i64>::new()
//!     .on("add", |ctx, payload, _topic, _from| {
//!         ctx.state += payload["n"].as_i64().unwrap_or(0);
//!         Ok(HandlerReply::Continue)
//!     })
//!     .on("total", |ctx, _payload, _topic, _from| {
//!         Ok(exit(json!({ "total": ctx.state })))
//!     });
//! let result = Actor::new(0, handlers).run(process).await?;
//! # Ok(())
//! # }
//! ```

pub use troupe_loop;
pub use troupe_types;

/// Happy-path imports for building and running actors.
pub mod prelude {
    pub use troupe_loop::{Actor, ActorConfig, Context, HandlerResult, Handlers};
    pub use troupe_types::{
        event_kind, exit, next, next_with, source, ActorError, Event, HandlerError, HandlerReply,
        InternalMessage, Message, Process,
    };

    #[cfg(feature = "test-utils")]
    pub use troupe_types::test_utils::{LocalHandle, LocalProcess, Outbound};
}
