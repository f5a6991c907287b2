use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::Serialize;
use std::borrow::Cow;
use std::time::Duration;

use super::assembler::{AssembledPrompt, SegmentRole};
use super::sse_parser::sse_to_text_stream;
use crate::error::ProviderError;

/// Sends one assembled prompt to a completion provider.
///
/// Implementations make exactly one attempt per call. Retry or backoff
/// belongs in a wrapper around this trait.
#[async_trait(?Send)]
pub trait TranslationClient {
    async fn translate(&self, prompt: &AssembledPrompt) -> Result<String, ProviderError>;
}

/// Connection settings for an OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    /// Transport timeout for a whole request; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

// Use Cow to avoid cloning strings that are only borrowed for serialization
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Cow<'a, str>,
}

/// Chat-completions client for OpenAI-compatible APIs.
pub struct OpenAiClient {
    client: Client,
    config: ClientConfig,
}

impl OpenAiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::from_parts(builder.build()?, config))
    }

    fn from_parts(client: Client, config: ClientConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait(?Send)]
impl TranslationClient for OpenAiClient {
    async fn translate(&self, prompt: &AssembledPrompt) -> Result<String, ProviderError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        );

        let chat_request = ChatCompletionRequest {
            model: &self.config.model,
            messages: wire_messages(prompt),
            temperature: self.config.temperature,
            stream: true,
        };

        crate::debug!(
            "POST {url} (model {}, {} messages)",
            self.config.model,
            chat_request.messages.len()
        );

        let mut http_request = self.client.post(&url).json(&chat_request);

        // Add Authorization header if API key is present
        if let Some(api_key) = &self.config.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = http_request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, body });
        }

        let mut stream = std::pin::pin!(sse_to_text_stream(response.bytes_stream()));
        let mut text = String::new();
        while let Some(delta) = stream.next().await {
            text.push_str(&delta?);
        }

        let text = text.trim();
        if text.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

const fn wire_role(role: SegmentRole) -> &'static str {
    match role {
        SegmentRole::System => "system",
        SegmentRole::Assistant => "assistant",
        SegmentRole::Intro | SegmentRole::Glossary | SegmentRole::User => "user",
    }
}

/// Maps segments to chat messages; consecutive user-side segments are merged
/// into one message separated by a blank line.
fn wire_messages(prompt: &AssembledPrompt) -> Vec<Message<'_>> {
    let mut messages: Vec<Message<'_>> = Vec::with_capacity(prompt.segments.len());

    for segment in &prompt.segments {
        let role = wire_role(segment.role);
        match messages.last_mut() {
            Some(last) if role == "user" && last.role == "user" => {
                let merged = last.content.to_mut();
                merged.push_str("\n\n");
                merged.push_str(&segment.text);
            }
            _ => messages.push(Message {
                role,
                content: Cow::Borrowed(&segment.text),
            }),
        }
    }

    messages
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::translation::assembler::Segment;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn prompt() -> AssembledPrompt {
        let segment = |role, text: &str| Segment {
            role,
            text: text.to_string(),
        };
        AssembledPrompt {
            segments: vec![
                segment(SegmentRole::System, "system text"),
                segment(SegmentRole::Assistant, "assistant text"),
                segment(SegmentRole::Intro, "intro text"),
                segment(SegmentRole::Glossary, "glossary text"),
                segment(SegmentRole::User, "chunk text"),
            ],
        }
    }

    fn test_client(endpoint: String) -> OpenAiClient {
        let client = Client::builder().no_proxy().build().unwrap();
        OpenAiClient::from_parts(
            client,
            ClientConfig {
                endpoint,
                model: "gpt-test".to_string(),
                api_key: Some("secret".to_string()),
                temperature: 0.0,
                timeout: None,
            },
        )
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
            if let Some(header_end) = data.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&data[..header_end]).to_lowercase();
                let length = headers
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if data.len() >= header_end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).into_owned()
    }

    /// Serves one canned HTTP response and hands back the raw request.
    async fn serve_once(status_line: &'static str, body: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: text/event-stream\r\n\
                 content-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });
        (format!("http://{addr}/"), handle)
    }

    fn sse_body(deltas: &[&str]) -> String {
        let mut body = String::new();
        for delta in deltas {
            let event = serde_json::json!({"choices": [{"delta": {"content": delta}}]});
            body.push_str(&format!("data: {event}\n\n"));
        }
        body.push_str("data: [DONE]\n\n");
        body
    }

    #[test]
    fn test_wire_messages_merge_user_side_segments() {
        let prompt = prompt();
        let messages = wire_messages(&prompt);

        let pairs: Vec<(&str, &str)> = messages
            .iter()
            .map(|m| (m.role, m.content.as_ref()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("system", "system text"),
                ("assistant", "assistant text"),
                ("user", "intro text\n\nglossary text\n\nchunk text"),
            ]
        );
    }

    #[tokio::test]
    async fn test_translate_collects_stream() {
        let (endpoint, server) = serve_once("200 OK", sse_body(&["  Sông núi", " nước Nam\n"])).await;
        let client = test_client(endpoint);

        let text = client.translate(&prompt()).await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(text, "Sông núi nước Nam");
        assert!(request.starts_with("POST /v1/chat/completions"));
        assert!(request.to_lowercase().contains("authorization: bearer secret"));
        assert!(request.contains(r#""stream":true"#));
        assert!(request.contains(r#""model":"gpt-test""#));
        assert!(request.contains(r#""role":"assistant""#));
    }

    #[tokio::test]
    async fn test_translate_reports_api_error() {
        let (endpoint, server) =
            serve_once("500 Internal Server Error", "overloaded".to_string()).await;
        let client = test_client(endpoint);

        let result = client.translate(&prompt()).await;
        server.await.unwrap();

        match result {
            Err(ProviderError::Api { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "overloaded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_translate_rejects_empty_completion() {
        let (endpoint, server) = serve_once("200 OK", sse_body(&[])).await;
        let client = test_client(endpoint);

        let result = client.translate(&prompt()).await;
        server.await.unwrap();

        assert!(matches!(result, Err(ProviderError::EmptyResponse)));
    }
}
