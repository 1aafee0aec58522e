//! Completion client - one chat-completion round trip per call.

use std::sync::Arc;
use std::time::Duration;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, FinishReason, Message, RequestMetadata,
};

/// Default sampling temperature. Kept low so tool calls stay well-formed.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Sends message lists to an [`AIProvider`] and returns the reply text.
///
/// Errors are returned unchanged; this client never retries.
#[derive(Clone)]
pub struct CompletionClient {
    provider: Arc<dyn AIProvider>,
    temperature: f32,
    max_tokens: Option<u32>,
    timeout: Option<Duration>,
}

impl CompletionClient {
    /// Creates a client with the default temperature and no token cap.
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self {
            provider,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
            timeout: None,
        }
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Caps the number of generated tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sets the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the configured temperature.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Runs one completion and returns the reply text.
    ///
    /// A reply cut off by the token cap is still returned, with a warning:
    /// a truncated tool call no longer parses and reads as a direct answer.
    pub async fn complete(
        &self,
        messages: Vec<Message>,
        metadata: RequestMetadata,
    ) -> Result<String, AIError> {
        let mut request = CompletionRequest::new(metadata)
            .with_messages(messages)
            .with_temperature(self.temperature);
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        if let Some(timeout) = self.timeout {
            request = request.with_timeout(timeout);
        }

        tracing::debug!(
            trace_id = %request.metadata.trace_id,
            message_count = request.messages.len(),
            "Requesting completion"
        );
        let response = self.provider.complete(request).await?;
        tracing::debug!(
            model = %response.model,
            total_tokens = response.usage.total_tokens,
            reply_len = response.content.len(),
            "Completion received"
        );
        if response.finish_reason == FinishReason::Length {
            tracing::warn!(
                model = %response.model,
                max_tokens = ?self.max_tokens,
                reply_len = response.content.len(),
                "Completion truncated at token limit"
            );
        }
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::ports::TokenUsage;
    use std::io;
    use std::sync::Mutex;

    /// Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture_warnings() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    fn metadata() -> RequestMetadata {
        RequestMetadata::new("trace-1")
    }

    #[tokio::test]
    async fn returns_reply_text() {
        let provider = Arc::new(MockAIProvider::new().with_response("hello"));
        let client = CompletionClient::new(provider.clone());

        let reply = client
            .complete(vec![Message::user("hi")], metadata())
            .await
            .unwrap();

        assert_eq!(reply, "hello");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn sends_configured_parameters() {
        let provider = Arc::new(MockAIProvider::new());
        let client = CompletionClient::new(provider.clone())
            .with_max_tokens(256)
            .with_timeout(Duration::from_secs(7));

        client
            .complete(vec![Message::system("s"), Message::user("u")], metadata())
            .await
            .unwrap();

        let request = &provider.get_calls()[0];
        assert_eq!(request.temperature, Some(DEFAULT_TEMPERATURE));
        assert_eq!(request.max_tokens, Some(256));
        assert_eq!(request.timeout, Some(Duration::from_secs(7)));
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.metadata.trace_id, "trace-1");
    }

    #[tokio::test]
    async fn errors_propagate_without_retry() {
        let provider = Arc::new(
            MockAIProvider::new()
                .with_error(MockError::Unavailable {
                    message: "down".into(),
                })
                .with_response("would succeed on retry"),
        );
        let client = CompletionClient::new(provider.clone());

        let result = client.complete(vec![Message::user("hi")], metadata()).await;

        assert!(matches!(result, Err(AIError::Unavailable { .. })));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn truncated_reply_is_returned_with_warning() {
        let provider = Arc::new(
            MockAIProvider::new()
                .with_model("gpt-4o-mini")
                .with_response_full(
                    r#"{"tool_name": "get_config", "argum"#,
                    TokenUsage::new(100, 16),
                    FinishReason::Length,
                ),
        );
        let client = CompletionClient::new(provider).with_max_tokens(16);
        let (logs, _guard) = capture_warnings();

        let reply = client
            .complete(vec![Message::user("config of r1")], metadata())
            .await
            .unwrap();

        assert_eq!(reply, r#"{"tool_name": "get_config", "argum"#);
        let output = logs.contents();
        assert!(output.contains("Completion truncated at token limit"));
        assert!(output.contains("gpt-4o-mini"));
    }

    #[tokio::test]
    async fn complete_reply_logs_no_warning() {
        let provider = Arc::new(MockAIProvider::new().with_response("done"));
        let client = CompletionClient::new(provider);
        let (logs, _guard) = capture_warnings();

        client
            .complete(vec![Message::user("hi")], metadata())
            .await
            .unwrap();

        assert!(!logs.contents().contains("truncated"));
    }
}
