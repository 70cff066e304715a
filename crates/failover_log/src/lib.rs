//! Event sinks and logging setup for failover calls.
//!
//! - [`TracingSink`] maps failover events onto `tracing` events.
//! - [`FileSink`] appends timestamped, human-readable lines to a log file.
//! - [`FanoutSink`] sends each event to several sinks.
//! - [`TracingSetup`] installs a `tracing-subscriber` registry.
//!
//! # Example
//!
//! ```
//! use failover_engine::{FailoverEngine, FailoverEvent};
//! use failover_log::{FanoutSink, TracingSink, render_event};
//! use failover_models::ProviderRegistry;
//! use std::sync::Arc;
//!
//! let sink = FanoutSink::new()
//!     .with(TracingSink)
//!     .with(|event: &FailoverEvent<'_>| tracing::debug!("{}", render_event(event)));
//! let engine = FailoverEngine::new(Arc::new(ProviderRegistry::new()), Arc::new(sink));
//! # let _ = engine;
//! ```

mod clock;
mod render;
mod sinks;
mod tracing_setup;

#[cfg(any(test, feature = "test-utils"))]
pub use clock::MockClock;
pub use clock::{Clock, SystemClock, format_timestamp};
pub use render::{EMPTY_PREVIEW, render_event};
pub use sinks::{DEFAULT_LOG_FILE, FanoutSink, FileSink, LOG_TARGET, TracingSink};
pub use tracing_setup::{TracingFormat, TracingSetup};
