//! Configuration for an actor run.

/// Tunables for the dispatch loop.
#[derive(Debug, Clone)]
pub struct ActorConfig {
    /// Buffer size of the internal re-entry channel. A full buffer blocks
    /// off-loop producers such as async completions until the loop drains.
    pub internal_capacity: usize,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            internal_capacity: 100,
        }
    }
}
