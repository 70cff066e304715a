//! # llm_failover Internal Library
//!
//! Re-exports the llm_failover crates for convenience.

/// Provider trait, request/response types and the provider registry.
pub use failover_models;

/// Failover orchestration: classifier, attempt order, executors and engine.
pub use failover_engine;

/// Event sinks and logging setup.
pub use failover_log;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use failover_engine::{
        EventSink, FailoverConfig, FailoverEngine, FailoverError, FailoverEvent,
        FailoverInstaller, FailoverProvider, NoopSink,
    };
    pub use failover_log::{FanoutSink, FileSink, TracingFormat, TracingSetup, TracingSink};
    pub use failover_models::{
        Capabilities, ChatProvider, ChatRequest, ChatResponse, ChunkStream, MessageChain,
        ProviderError, ProviderRegistry, ProviderSource,
    };
}
