//! End-to-end failover through the prelude.

use async_trait::async_trait;
use failover_internal::prelude::*;
use futures::StreamExt;
use std::sync::Arc;

struct Fixed {
    id: &'static str,
    result: Result<&'static str, u16>,
    capabilities: Capabilities,
}

#[async_trait]
impl ChatProvider for Fixed {
    fn id(&self) -> Option<&str> {
        Some(self.id)
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    async fn complete(&self, _request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        match self.result {
            Ok(text) => Ok(ChatResponse::completion(text)),
            Err(status) => Err(ProviderError::status(status, "unavailable")),
        }
    }

    async fn stream(&self, _request: ChatRequest) -> Result<ChunkStream, ProviderError> {
        match self.result {
            Ok(text) => Ok(futures::stream::iter(
                text.split(' ').map(|w| Ok(ChatResponse::text(w))).collect::<Vec<_>>(),
            )
            .boxed()),
            Err(status) => Err(ProviderError::status(status, "unavailable")),
        }
    }
}

fn provider(id: &'static str, result: Result<&'static str, u16>) -> Arc<dyn ChatProvider> {
    Arc::new(Fixed {
        id,
        result,
        capabilities: Capabilities::ALL,
    })
}

/// Verifies that installed wrappers fail over for both completions and streams.
#[tokio::test]
async fn installed_wrappers_fail_over() {
    let raw = ProviderRegistry::from_providers([
        provider("down", Err(502)),
        provider("up", Ok("hello there")),
    ]);
    let engine = FailoverEngine::new(Arc::new(raw), Arc::new(TracingSink));
    let host = ProviderRegistry::new();
    let ids = FailoverInstaller::new(engine).install_into(&host).unwrap();
    assert_eq!(ids, vec!["down", "up"]);

    let down = host.get("down").unwrap();
    let response = down.complete(ChatRequest::new("hi")).await.unwrap();
    assert_eq!(response, ChatResponse::completion("hello there"));

    let chunks: Vec<_> = down
        .stream(ChatRequest::new("hi"))
        .await
        .unwrap()
        .collect()
        .await;
    let chunks: Vec<ChatResponse> = chunks.into_iter().collect::<Result<_, _>>().unwrap();
    assert_eq!(
        chunks,
        vec![ChatResponse::text("hello"), ChatResponse::text("there")]
    );
}
