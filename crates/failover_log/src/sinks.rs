//! Concrete [`EventSink`]s.

use crate::clock::{Clock, SystemClock, format_timestamp};
use crate::render::render_event;
use failover_engine::{EventSink, FailoverEvent, summarize};
use parking_lot::Mutex;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Target used for every failover log event.
pub const LOG_TARGET: &str = "llm_failover";

/// Default file written by [`FileSink`].
pub const DEFAULT_LOG_FILE: &str = "llm_failover.log";

// ─────────────────────────────────────────────────────────────────────────────
// TracingSink
// ─────────────────────────────────────────────────────────────────────────────

/// Forwards events to `tracing` under the [`LOG_TARGET`] target.
///
/// Attempts, successes and installation are logged at `INFO`, retries and
/// skips at `WARN`, and anything that ends a call with an error at `ERROR`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &FailoverEvent<'_>) {
        match *event {
            FailoverEvent::Attempting {
                provider_id,
                prompt_preview,
            } => {
                tracing::info!(target: LOG_TARGET, provider = provider_id, prompt = prompt_preview, "attempting provider");
            }
            FailoverEvent::Succeeded {
                provider_id,
                response_preview,
                prior_failures,
            } => {
                tracing::info!(
                    target: LOG_TARGET,
                    provider = provider_id,
                    preview = response_preview,
                    prior_failures = %summarize(prior_failures, ", "),
                    "provider succeeded"
                );
            }
            FailoverEvent::FailedRetrying { provider_id, error } => {
                tracing::warn!(target: LOG_TARGET, provider = provider_id, error = %error, "provider failed, trying next");
            }
            FailoverEvent::FailedTerminal {
                provider_id,
                error,
                locked_in,
            } => {
                tracing::error!(
                    target: LOG_TARGET,
                    provider = provider_id,
                    error = %error,
                    locked_in,
                    "provider failed, not failing over"
                );
            }
            FailoverEvent::Skipped { provider_id } => {
                tracing::warn!(target: LOG_TARGET, provider = provider_id, "provider has no usable chat operation");
            }
            FailoverEvent::AllExhausted { failures } => {
                tracing::error!(
                    target: LOG_TARGET,
                    attempts = failures.len(),
                    failures = %summarize(failures, "; "),
                    "all providers failed"
                );
            }
            FailoverEvent::Installed { provider_ids } => {
                tracing::info!(target: LOG_TARGET, providers = %provider_ids.join(", "), "failover installed");
            }
            FailoverEvent::InstallSkipped {
                provider_count,
                min_providers,
            } => {
                tracing::warn!(target: LOG_TARGET, provider_count, min_providers, "too few chat providers, failover not installed");
            }
            FailoverEvent::InstallFailed { error } => {
                tracing::error!(target: LOG_TARGET, error = %error, "failover installation failed");
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FileSink
// ─────────────────────────────────────────────────────────────────────────────

/// Appends timestamped lines to a log file.
///
/// Each line reads `[YYYY-mm-dd HH:MM:SS] [failover] <message>`. The file and
/// its parent directories are created on first write. Write failures are
/// ignored so that logging never affects a call.
pub struct FileSink {
    path: PathBuf,
    clock: Arc<dyn Clock>,
    // Serializes appends from concurrent calls.
    lock: Mutex<()>,
}

impl FileSink {
    /// Creates a sink appending to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            clock: Arc::new(SystemClock),
            lock: Mutex::new(()),
        }
    }

    /// Uses `clock` for timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The file being written.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a free-form message, such as a lifecycle notice.
    pub fn log(&self, message: &str) {
        let line = format!(
            "[{}] [failover] {message}\n",
            format_timestamp(self.clock.now())
        );
        let _guard = self.lock.lock();
        if let Err(err) = self.append(&line) {
            tracing::debug!(target: LOG_TARGET, path = %self.path.display(), error = %err, "failed to write failover log");
        }
    }

    fn append(&self, line: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }
}

impl Default for FileSink {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_FILE)
    }
}

impl core::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FileSink")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl EventSink for FileSink {
    fn record(&self, event: &FailoverEvent<'_>) {
        self.log(&render_event(event));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FanoutSink
// ─────────────────────────────────────────────────────────────────────────────

/// Forwards every event to several sinks, in the order they were added.
///
/// ```
/// use failover_log::{FanoutSink, FileSink, TracingSink};
///
/// let sink = FanoutSink::new()
///     .with(TracingSink)
///     .with(FileSink::new(std::env::temp_dir().join("llm_failover.log")));
/// assert_eq!(sink.len(), 2);
/// ```
#[derive(Default, Clone)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl FanoutSink {
    /// Creates a sink with no targets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a target.
    #[must_use]
    pub fn with(mut self, sink: impl EventSink) -> Self {
        self.sinks.push(Arc::new(sink));
        self
    }

    /// Adds a shared target.
    #[must_use]
    pub fn with_shared(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Number of targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Returns `true` if there are no targets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl core::fmt::Debug for FanoutSink {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FanoutSink")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl EventSink for FanoutSink {
    fn record(&self, event: &FailoverEvent<'_>) {
        for sink in &self.sinks {
            sink.record(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use chrono::{NaiveDate, TimeDelta};
    use failover_models::ProviderError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn clock() -> Arc<MockClock> {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Arc::new(MockClock::new(start))
    }

    #[test]
    fn file_sink_appends_timestamped_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("failover.log");
        let clock = clock();
        let sink = FileSink::new(&path).with_clock(clock.clone());

        sink.record(&FailoverEvent::Attempting {
            provider_id: "a",
            prompt_preview: "hi",
        });
        clock.advance(TimeDelta::seconds(2));
        sink.record(&FailoverEvent::FailedRetrying {
            provider_id: "a",
            error: &ProviderError::status(503, "busy"),
        });

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "[2024-05-01 12:00:00] [failover] attempting provider a, prompt: hi\n\
             [2024-05-01 12:00:02] [failover] provider a failed: provider error: busy; trying next provider\n"
        );
    }

    #[test]
    fn file_sink_ignores_write_failures() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending.
        let sink = FileSink::new(dir.path());
        sink.log("dropped");
        assert!(dir.path().is_dir());
    }

    #[test]
    fn file_sink_default_path() {
        assert_eq!(FileSink::default().path(), Path::new(DEFAULT_LOG_FILE));
    }

    #[test]
    fn fanout_forwards_in_order() {
        static FIRST: AtomicUsize = AtomicUsize::new(0);
        static SECOND: AtomicUsize = AtomicUsize::new(0);
        let sink = FanoutSink::new()
            .with(|_: &FailoverEvent<'_>| {
                FIRST.fetch_add(1, Ordering::SeqCst);
            })
            .with_shared(Arc::new(|_: &FailoverEvent<'_>| {
                assert_eq!(FIRST.load(Ordering::SeqCst), SECOND.load(Ordering::SeqCst) + 1);
                SECOND.fetch_add(1, Ordering::SeqCst);
            }));

        sink.record(&FailoverEvent::Skipped { provider_id: "a" });
        sink.record(&FailoverEvent::Skipped { provider_id: "b" });

        assert_eq!(sink.len(), 2);
        assert_eq!(SECOND.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn tracing_sink_uses_failover_target() {
        use tracing_subscriber::fmt::MakeWriter;

        #[derive(Clone, Default)]
        struct Buffer(Arc<Mutex<Vec<u8>>>);

        impl Write for Buffer {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        impl<'a> MakeWriter<'a> for Buffer {
            type Writer = Self;

            fn make_writer(&'a self) -> Self::Writer {
                self.clone()
            }
        }

        let buffer = Buffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            TracingSink.record(&FailoverEvent::AllExhausted { failures: &[] });
            TracingSink.record(&FailoverEvent::Installed {
                provider_ids: &["a".to_string()],
            });
        });

        let output = String::from_utf8(buffer.0.lock().clone()).unwrap();
        assert!(output.contains("ERROR"));
        assert!(output.contains("llm_failover"));
        assert!(output.contains("all providers failed"));
        assert!(output.contains("failover installed"));
    }
}
