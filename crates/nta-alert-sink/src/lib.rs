//! C8: alert assembly, dedup, and delivery to external collaborators
//! (SPEC_FULL.md §4.8).

pub mod backoff;
pub mod dispatcher;
pub mod error;
pub mod investigation;
pub mod queue;
pub mod sink;

pub use backoff::{deliver_with_backoff, BackoffConfig};
pub use dispatcher::AlertDispatcher;
pub use error::SinkError;
pub use investigation::build_investigation;
pub use queue::OverflowQueue;
pub use sink::{AlertSink, InMemorySink};
