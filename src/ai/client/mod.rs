//! LLM Messages API Client
//!
//! HTTP client for the hosted messages endpoint, with secure API key
//! handling and both one-shot and streaming request modes.
//!
//! Streaming uses server-sent events: the response body is decoded with
//! `eventsource-stream` into typed `StreamEvent`s that the accumulator
//! consumes. Dropping the stream closes the connection.

use std::time::Duration;

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::{Stream, StreamExt};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ApiConfig;
use crate::constants::network::API_VERSION;
use crate::types::{ErrorClassifier, QuillError, Result};

// =============================================================================
// Request Model
// =============================================================================

/// One code task sent to the remote service.
///
/// Created per call, never mutated, discarded after the call completes.
#[derive(Debug, Clone)]
pub struct TaskRequest {
    /// Instruction text
    pub prompt: String,
    /// Code payload the instruction refers to, if any
    pub source_code: Option<String>,
    /// Language tag of the payload
    pub source_language: Option<String>,
    /// Target language (translation tasks)
    pub target_language: Option<String>,
    /// Maximum output tokens for this call
    pub max_tokens: u32,
}

impl TaskRequest {
    pub fn new(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            source_code: None,
            source_language: None,
            target_language: None,
            max_tokens,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>, language: impl Into<String>) -> Self {
        self.source_code = Some(code.into());
        self.source_language = Some(language.into());
        self
    }

    pub fn with_target_language(mut self, language: impl Into<String>) -> Self {
        self.target_language = Some(language.into());
        self
    }

    /// Render prompt and code payload into one user message
    fn render(&self) -> String {
        match &self.source_code {
            Some(code) => {
                let lang = self.source_language.as_deref().unwrap_or("");
                format!("{}\n\n```{}\n{}\n```", self.prompt, lang, code)
            }
            None => self.prompt.clone(),
        }
    }
}

/// Token usage reported by the service
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// Complete (non-streamed) response
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub text: String,
    pub usage: TokenUsage,
}

// =============================================================================
// Stream Events
// =============================================================================

/// One decoded server-sent event from a streamed call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental text fragment
    TextDelta(String),
    /// Explicit completion signal
    MessageStop,
    /// Keep-alive
    Ping,
    /// In-band failure reported by the service mid-stream
    Error(String),
    /// Anything else (block boundaries, usage updates)
    Other,
}

/// Classification used by the accumulator: only text deltas are appendable.
pub fn text_delta(event: &StreamEvent) -> Option<&str> {
    match event {
        StreamEvent::TextDelta(text) => Some(text),
        _ => None,
    }
}

fn parse_stream_event(data: &str) -> StreamEvent {
    #[derive(Deserialize)]
    struct SseData {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        delta: Option<SseDelta>,
        #[serde(default)]
        error: Option<SseError>,
    }

    #[derive(Deserialize)]
    struct SseDelta {
        #[serde(rename = "type", default)]
        kind: String,
        #[serde(default)]
        text: Option<String>,
    }

    #[derive(Deserialize)]
    struct SseError {
        #[serde(rename = "type", default)]
        kind: String,
        #[serde(default)]
        message: Option<String>,
    }

    let Ok(parsed) = serde_json::from_str::<SseData>(data) else {
        return StreamEvent::Other;
    };

    match parsed.kind.as_str() {
        "content_block_delta" => match parsed.delta {
            Some(delta) if delta.kind == "text_delta" => {
                StreamEvent::TextDelta(delta.text.unwrap_or_default())
            }
            _ => StreamEvent::Other,
        },
        "message_stop" => StreamEvent::MessageStop,
        "ping" => StreamEvent::Ping,
        "error" => {
            let detail = match parsed.error {
                Some(SseError {
                    kind,
                    message: Some(message),
                }) if !message.is_empty() => format!("{}: {}", kind, message),
                Some(SseError { kind, .. }) if !kind.is_empty() => kind,
                _ => "service reported an unspecified error".to_string(),
            };
            StreamEvent::Error(detail)
        }
        _ => StreamEvent::Other,
    }
}

/// In-band error events become stream failures, so the accumulator fails
/// with the partial output instead of finishing with truncated text.
fn into_stream_item(
    event: StreamEvent,
) -> std::result::Result<StreamEvent, StreamTransportError> {
    match event {
        StreamEvent::Error(message) => Err(StreamTransportError(message)),
        other => Ok(other),
    }
}

// =============================================================================
// Backend Trait
// =============================================================================

/// One-shot completion backend, mockable in tests
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &TaskRequest) -> Result<CompletionResponse>;

    /// Model name currently in use
    fn model(&self) -> &str;
}

// =============================================================================
// Messages Client
// =============================================================================

/// Client for the hosted messages API with secure API key handling
pub struct MessagesClient {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    temperature: f32,
    timeout: Duration,
    client: reqwest::Client,
}

impl std::fmt::Debug for MessagesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagesClient")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl MessagesClient {
    /// Build a client from configuration.
    ///
    /// The credential comes from config or the `ANTHROPIC_API_KEY` env var;
    /// its absence is a fatal configuration error, reported before any call.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let api_key_str = config
            .api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .ok_or_else(|| {
                QuillError::Config(
                    "API key not found. Set ANTHROPIC_API_KEY env var or provide in config"
                        .to_string(),
                )
            })?;

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QuillError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key_str),
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout,
            client,
        })
    }

    /// Map a transport failure to the right error kind. Timeouts carry the
    /// configured duration; everything else goes through the classifier.
    fn transport_error(&self, err: &reqwest::Error) -> QuillError {
        if err.is_timeout() {
            QuillError::timeout("messages request", self.timeout)
        } else {
            QuillError::Api(ErrorClassifier::classify_transport(err))
        }
    }

    fn build_body(&self, request: &TaskRequest, stream: bool) -> MessagesBody {
        MessagesBody {
            model: self.model.clone(),
            max_tokens: request.max_tokens,
            temperature: self.temperature,
            stream: if stream { Some(true) } else { None },
            messages: vec![Message {
                role: "user".to_string(),
                content: request.render(),
            }],
        }
    }

    async fn send(&self, request: &TaskRequest, stream: bool) -> Result<reqwest::Response> {
        let url = format!("{}/messages", self.api_base);
        let body = self.build_body(request, stream);

        debug!(model = %self.model, stream, "Sending messages request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(QuillError::Api(ErrorClassifier::classify_http_status(
                status, &body,
            )));
        }

        Ok(response)
    }

    /// Send a request and wait for the complete response
    pub async fn complete(&self, request: &TaskRequest) -> Result<CompletionResponse> {
        let response = self.send(request, false).await?;

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let text: String = parsed
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect();

        if text.is_empty() {
            return Err(QuillError::Api(ErrorClassifier::classify(
                "No text content in response",
            )));
        }

        let usage = parsed.usage.unwrap_or_default();
        info!(
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Completion received"
        );

        Ok(CompletionResponse { text, usage })
    }

    /// Send a request and return the decoded event stream.
    ///
    /// The stream ends when the service sends its completion signal and
    /// closes the connection. Dropping the stream early also closes it.
    pub async fn stream(
        &self,
        request: &TaskRequest,
    ) -> Result<impl Stream<Item = std::result::Result<StreamEvent, StreamTransportError>> + Unpin>
    {
        let response = self.send(request, true).await?;

        let events = response.bytes_stream().eventsource().map(|item| match item {
            Ok(sse) => into_stream_item(parse_stream_event(&sse.data)),
            Err(e) => Err(StreamTransportError(e.to_string())),
        });

        Ok(Box::pin(events))
    }
}

#[async_trait]
impl CompletionBackend for MessagesClient {
    async fn complete(&self, request: &TaskRequest) -> Result<CompletionResponse> {
        MessagesClient::complete(self, request).await
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Transport failure inside an established stream
#[derive(Debug, Clone)]
pub struct StreamTransportError(pub String);

impl std::fmt::Display for StreamTransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for StreamTransportError {}

// Request/Response wire types

#[derive(Debug, Serialize)]
struct MessagesBody {
    model: String,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}
