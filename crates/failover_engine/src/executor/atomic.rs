use super::ExecutorContext;
use crate::error::FailoverError;
use crate::order::{AttemptOrder, provider_id};
use failover_models::{ChatRequest, ChatResponse};

/// Runs single-shot completions with failover.
///
/// Providers are called in attempt order until one answers. A retry-eligible
/// failure moves on to the next provider; any other failure ends the call
/// with that provider's error, leaving later providers untried. Providers
/// that do not implement [`complete`](failover_models::ChatProvider::complete)
/// are skipped.
#[derive(Debug, Clone)]
pub struct AtomicExecutor {
    ctx: ExecutorContext,
}

impl AtomicExecutor {
    /// Creates an executor over `ctx`.
    #[must_use]
    pub fn new(ctx: ExecutorContext) -> Self {
        Self { ctx }
    }

    /// Runs `request` against `order`.
    ///
    /// # Errors
    ///
    /// - [`FailoverError::NoProviderAvailable`] if `order` is empty.
    /// - [`FailoverError::Provider`] if a provider failed with an error that
    ///   does not allow failover.
    /// - [`FailoverError::Exhausted`] if every provider failed or was skipped.
    pub async fn run(
        &self,
        order: &AttemptOrder,
        request: ChatRequest,
    ) -> Result<ChatResponse, FailoverError> {
        let mut session = self.ctx.session(&request);
        let last = order.len().saturating_sub(1);

        for (index, provider) in order.providers().iter().enumerate() {
            let id = provider_id(provider.as_ref());
            if !provider.capabilities().complete {
                session.skip(id);
                continue;
            }

            session.attempting(id);
            match provider.complete(request.clone()).await {
                Ok(response) => {
                    session.succeeded(id, &session.response_preview(&response));
                    return Ok(response);
                }
                Err(error) => session.fail(id, error, index == last)?,
            }
        }

        Err(session.exhausted())
    }
}
