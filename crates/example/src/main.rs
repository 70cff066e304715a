//! Failover demo CLI.
//!
//! Runs one completion and one streaming call through failover wrappers
//! installed over simulated providers.
//!
//! # Usage
//!
//! ```bash
//! failover-demo [prompt] [log_file]
//! ```

use example::demo_registry;
use failover_engine::{FailoverConfig, FailoverEngine, FailoverInstaller, response_text};
use failover_log::{
    DEFAULT_LOG_FILE, FanoutSink, FileSink, TracingFormat, TracingSetup, TracingSink,
};
use failover_models::{ChatProvider, ChatRequest, ProviderRegistry};
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;

#[tokio::main]
async fn main() {
    TracingSetup::new()
        .with_level(Level::DEBUG)
        .with_format(TracingFormat::Compact)
        .with_env_filter("llm_failover=info,failover_engine=debug")
        .init();

    let mut args = std::env::args().skip(1);
    let prompt = args.next().unwrap_or_else(|| "Summarize failover in one line".to_string());
    let log_file = args.next().map_or_else(
        || std::env::temp_dir().join(DEFAULT_LOG_FILE),
        PathBuf::from,
    );

    let file_sink = Arc::new(FileSink::new(&log_file));
    file_sink.log("failover demo starting");
    let sink = FanoutSink::new().with(TracingSink).with_shared(file_sink);

    let raw = demo_registry();
    let engine = FailoverEngine::new(Arc::new(raw), Arc::new(sink))
        .with_config(FailoverConfig::new().with_response_preview_chars(60));

    // The host only ever sees the wrappers.
    let host = ProviderRegistry::new();
    if let Err(e) = FailoverInstaller::new(engine).install_into(&host) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let Some(primary) = host.get("primary") else {
        eprintln!("Error: failover was not installed");
        std::process::exit(1);
    };

    match primary.complete(ChatRequest::new(prompt.clone())).await {
        Ok(response) => tracing::info!(?response, "completion finished"),
        Err(e) => tracing::error!(error = %e, "completion failed"),
    }

    let mut chunks = match primary.stream(ChatRequest::new(prompt)).await {
        Ok(chunks) => chunks,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let mut text = String::new();
    while let Some(chunk) = chunks.next().await {
        match chunk {
            Ok(chunk) => text.push_str(&response_text(Some(&chunk))),
            Err(e) => {
                tracing::error!(error = %e, "stream failed");
                break;
            }
        }
    }
    tracing::info!(%text, log = %log_file.display(), "stream finished");
}
