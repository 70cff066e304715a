//! Provider failover for LLM chat completions.
//!
//! Wraps a set of interchangeable chat providers so that a request failing
//! on one provider with a transient error is retried on the next, while
//! streamed output is never stitched together from two providers.
//!

pub use failover_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use failover_internal::prelude::*;
}
