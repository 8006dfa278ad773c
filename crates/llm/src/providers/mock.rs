//! Scripted provider for tests and offline runs.
//!
//! Replies are consumed in order; once the script is exhausted every call
//! gets the fallback reply. Each call records the instant it was issued and
//! the prompt it carried, and may be given an artificial latency.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use vta_core::{AppError, AppResult};

/// One scripted outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Successful completion with this text
    Text(String),

    /// Provider failure with this error message
    Error(String),
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }
}

/// Mock generation client.
#[derive(Debug)]
pub struct MockClient {
    script: Mutex<VecDeque<MockReply>>,
    fallback: MockReply,
    latency: Duration,
    calls: Mutex<Vec<(Instant, String)>>,
}

impl MockClient {
    /// A client that always answers with a fixed sentence.
    pub fn new() -> Self {
        Self::always(MockReply::text(
            "This is a mock answer generated without contacting a provider.",
        ))
    }

    /// A client that returns the same reply on every call.
    pub fn always(reply: MockReply) -> Self {
        Self::with_replies(Vec::new(), reply)
    }

    /// A client that plays `replies` in order, then repeats `fallback`.
    pub fn with_replies(replies: Vec<MockReply>, fallback: MockReply) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            fallback,
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make every call take `latency` before it replies.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of `complete` calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    /// Instants at which each call was issued.
    pub fn call_instants(&self) -> Vec<Instant> {
        self.calls
            .lock()
            .map(|calls| calls.iter().map(|(at, _)| *at).collect())
            .unwrap_or_default()
    }

    /// Prompt carried by the most recent call.
    pub fn last_prompt(&self) -> Option<String> {
        self.calls
            .lock()
            .ok()
            .and_then(|calls| calls.last().map(|(_, prompt)| prompt.clone()))
    }

    fn next_reply(&self) -> MockReply {
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((Instant::now(), request.prompt.clone()));
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match self.next_reply() {
            MockReply::Text(content) => Ok(LlmResponse {
                usage: LlmUsage::new(
                    request.prompt.split_whitespace().count() as u32,
                    content.split_whitespace().count() as u32,
                ),
                content,
                model: request.model.clone(),
                done: true,
            }),
            MockReply::Error(message) => Err(AppError::Llm(message)),
        }
    }

    async fn list_models(&self) -> AppResult<Vec<String>> {
        Ok(vec!["mock".to_string()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_then_fallback() {
        let client = MockClient::with_replies(
            vec![MockReply::error("503 Service Unavailable"), MockReply::text("first")],
            MockReply::text("again"),
        );
        let request = LlmRequest::new("prompt", "mock");

        assert!(client.complete(&request).await.is_err());
        assert_eq!(client.complete(&request).await.unwrap().content, "first");
        assert_eq!(client.complete(&request).await.unwrap().content, "again");
        assert_eq!(client.call_count(), 3);
        assert_eq!(client.call_instants().len(), 3);
        assert_eq!(client.last_prompt().as_deref(), Some("prompt"));
    }

    #[tokio::test]
    async fn test_latency_delays_reply() {
        let client = MockClient::new().with_latency(Duration::from_millis(30));
        let started = Instant::now();
        client.complete(&LlmRequest::new("p", "mock")).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_error_message_preserved() {
        let client = MockClient::always(MockReply::error("429 quota exceeded"));
        let err = client
            .complete(&LlmRequest::new("p", "mock"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("429"));
    }
}
