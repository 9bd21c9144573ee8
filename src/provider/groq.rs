use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::ProviderError;

/// Groq's OpenAI-compatible chat-completion endpoint.
pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// Model requested for every completion.
pub const GROQ_MODEL: &str = "llama-3.3-70b-versatile";

const HTTP_TIMEOUT_SECS: u64 = 30;

/// Client for the Groq chat-completion API.
#[derive(Clone)]
pub struct GroqClient {
    http_client: reqwest::Client,
    endpoint: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl GroqClient {
    pub fn new() -> Self {
        Self::with_endpoint(GROQ_API_URL.to_string())
    }

    /// Point the client at a different endpoint (used by tests).
    pub fn with_endpoint(endpoint: String) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            endpoint,
        }
    }

    /// Send `user_text` as a single user-role message and return the first
    /// completion's content, trimmed. A well-formed response without content
    /// yields the literal "(no reply)".
    pub async fn complete(&self, api_key: &str, user_text: &str) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: GROQ_MODEL,
            messages: vec![RequestMessage {
                role: "user",
                content: user_text,
            }],
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let body: ChatResponse = response.json().await?;
        Ok(extract_reply(body))
    }
}

impl Default for GroqClient {
    fn default() -> Self {
        Self::new()
    }
}

fn extract_reply(response: ChatResponse) -> String {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .map(|text| text.trim().to_string())
        .unwrap_or_default();

    if content.is_empty() {
        "(no reply)".to_string()
    } else {
        content
    }
}

/// One-shot HTTP stub: accepts a single connection and answers it with the
/// given JSON body. Returns the URL to point a client at.
#[cfg(test)]
pub(crate) async fn spawn_mock_endpoint(body: String) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock endpoint");
    let addr = listener.local_addr().expect("mock endpoint addr");

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 8192];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{addr}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> ChatResponse {
        serde_json::from_str(body).expect("parse response body")
    }

    #[test]
    fn extracts_the_first_completion_content() {
        let body = r#"{"choices":[{"message":{"content":"(mock) Hi from Groq!"}}]}"#;
        assert_eq!(extract_reply(parse(body)), "(mock) Hi from Groq!");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let body = r#"{"choices":[{"message":{"content":"  hi there \n"}}]}"#;
        assert_eq!(extract_reply(parse(body)), "hi there");
    }

    #[test]
    fn missing_content_yields_placeholder() {
        for body in [
            r#"{}"#,
            r#"{"choices":[]}"#,
            r#"{"choices":[{}]}"#,
            r#"{"choices":[{"message":{}}]}"#,
            r#"{"choices":[{"message":{"content":"   "}}]}"#,
        ] {
            assert_eq!(extract_reply(parse(body)), "(no reply)", "body: {body}");
        }
    }

    #[tokio::test]
    async fn complete_returns_mocked_reply() {
        let endpoint = spawn_mock_endpoint(
            r#"{"choices":[{"message":{"content":"(mock) Hi from Groq!"}}]}"#.to_string(),
        )
        .await;

        let client = GroqClient::with_endpoint(endpoint);
        let reply = client.complete("TEST_KEY", "ping").await.expect("complete");

        assert_eq!(reply, "(mock) Hi from Groq!");
    }

    #[tokio::test]
    async fn unparseable_body_is_an_error() {
        let endpoint = spawn_mock_endpoint("this is not json".to_string()).await;

        let client = GroqClient::with_endpoint(endpoint);
        let result = client.complete("TEST_KEY", "ping").await;

        assert!(matches!(result, Err(ProviderError::Http(_))));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        // Grab a free port, then close the listener so the connect fails.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let client = GroqClient::with_endpoint(format!("http://{addr}"));
        let result = client.complete("TEST_KEY", "ping").await;

        assert!(matches!(result, Err(ProviderError::Http(_))));
    }
}
