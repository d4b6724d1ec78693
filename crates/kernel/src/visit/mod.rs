//! Batched visit logging.
//!
//! Page visits arrive on the hot request path, so they are never written
//! one at a time. A dedicated background worker owns the batching buffer
//! and receives records over a bounded channel; the buffer is flushed to a
//! pluggable sink on a size threshold, a timer tick, or shutdown.

mod service;
mod types;

pub use service::{VisitLogOptions, VisitLogService, VisitLogger};
pub use types::{MemorySink, Visit, VisitSink};
