use super::ExecutorContext;
use crate::error::FailoverError;
use crate::order::{AttemptOrder, provider_id};
use async_stream::stream;
use failover_models::{ChatRequest, ChatResponse};
use futures::StreamExt;
use futures::stream::BoxStream;

/// Runs streaming completions with failover.
///
/// Each provider's stream is forwarded chunk by chunk. A provider that only
/// implements [`complete`](failover_models::ChatProvider::complete) has its
/// single result forwarded as one chunk. Once a provider has produced a
/// chunk it is locked in: a later failure ends the call with that error no
/// matter how it classifies, so output from two providers is never mixed.
///
/// Dropping the returned stream drops the in-flight provider stream, and no
/// further provider is started.
#[derive(Debug, Clone)]
pub struct StreamingExecutor {
    ctx: ExecutorContext,
}

impl StreamingExecutor {
    /// Creates an executor over `ctx`.
    #[must_use]
    pub fn new(ctx: ExecutorContext) -> Self {
        Self { ctx }
    }

    /// Runs `request` against `order`, yielding chunks as they arrive.
    ///
    /// The stream ends after the winning provider's last chunk, or after a
    /// single `Err` item carrying the error that ended the call (see
    /// [`AtomicExecutor::run`](super::AtomicExecutor::run) for the variants).
    pub fn run(
        self,
        order: AttemptOrder,
        request: ChatRequest,
    ) -> BoxStream<'static, Result<ChatResponse, FailoverError>> {
        let ctx = self.ctx;
        Box::pin(stream! {
            let mut session = ctx.session(&request);
            let last = order.len().saturating_sub(1);

            'call: {
                for (index, provider) in order.into_iter().enumerate() {
                    let id = provider_id(provider.as_ref()).to_string();
                    let capabilities = provider.capabilities();

                    if capabilities.stream {
                        session.attempting(&id);
                        let mut chunks = match provider.stream(request.clone()).await {
                            Ok(chunks) => chunks,
                            Err(error) => match session.fail(&id, error, index == last) {
                                Ok(()) => continue,
                                Err(err) => {
                                    yield Err(err);
                                    break 'call;
                                }
                            },
                        };

                        let mut first_preview: Option<String> = None;
                        let mut forwarded = 0usize;
                        let mut retry = false;
                        while let Some(item) = chunks.next().await {
                            match item {
                                Ok(chunk) => {
                                    if first_preview.is_none() {
                                        first_preview = Some(session.response_preview(&chunk));
                                    }
                                    forwarded += 1;
                                    yield Ok(chunk);
                                }
                                Err(error) if first_preview.is_some() => {
                                    tracing::debug!(provider = %id, forwarded, "stream failed after output");
                                    yield Err(session.locked_in(&id, error));
                                    break 'call;
                                }
                                Err(error) => {
                                    if let Err(err) = session.fail(&id, error, index == last) {
                                        yield Err(err);
                                        break 'call;
                                    }
                                    retry = true;
                                    break;
                                }
                            }
                        }
                        if retry {
                            continue;
                        }

                        tracing::debug!(provider = %id, forwarded, "stream finished");
                        session.succeeded(&id, first_preview.as_deref().unwrap_or_default());
                        break 'call;
                    } else if capabilities.complete {
                        session.attempting(&id);
                        match provider.complete(request.clone()).await {
                            Ok(response) => {
                                session.succeeded(&id, &session.response_preview(&response));
                                yield Ok(response);
                                break 'call;
                            }
                            Err(error) => {
                                if let Err(err) = session.fail(&id, error, index == last) {
                                    yield Err(err);
                                    break 'call;
                                }
                            }
                        }
                    } else {
                        session.skip(&id);
                    }
                }

                yield Err(session.exhausted());
            }
        })
    }
}
