//! Client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::ProviderConfig;
use crate::error::GenerationError;

use super::CompletionClient;

const DEFAULT_API_ERROR: &str = "Failed to generate question";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl From<&ProviderConfig> for GenerationConfig {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_k: config.top_k,
            top_p: config.top_p,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: &'a GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str, generation_config: &'a GenerationConfig) -> Self {
        Self {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
            generation_config,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|error| error.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| DEFAULT_API_ERROR.to_string())
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    endpoint: String,
    api_key: String,
    generation: GenerationConfig,
}

impl GeminiClient {
    pub fn new(http: Client, config: &ProviderConfig) -> Self {
        Self {
            http,
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
            api_key: config.api_key.clone(),
            generation: GenerationConfig::from(config),
        }
    }

    /// Builds the client together with its own HTTP connection pool.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::new(http, config))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl CompletionClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateContentRequest::new(prompt, &self.generation);
        debug!(endpoint = %self.endpoint, "sending generation request");

        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Generation request failed: {} - {}", status, body);
            return Err(GenerationError::Api(api_error_message(&body)));
        }

        let reply: GenerateContentResponse = response.json().await?;
        reply.into_text().ok_or(GenerationError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    use super::*;

    const KEY: &str = "SECRETKEY123";

    fn generation() -> GenerationConfig {
        GenerationConfig::from(&ProviderConfig::default())
    }

    fn client_for(base_url: String) -> GeminiClient {
        GeminiClient::from_config(&ProviderConfig {
            base_url,
            api_key: KEY.to_string(),
            request_timeout_secs: 5,
            ..ProviderConfig::default()
        })
        .unwrap()
    }

    /// Answers a single request with `status` and `body`, handing back the raw
    /// request it received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/v1beta", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
            request
        });

        (base_url, handle)
    }

    async fn read_request(stream: &mut TcpStream) -> String {
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&request);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= end + 4 + length {
                    break;
                }
            }
        }

        String::from_utf8_lossy(&request).into_owned()
    }

    #[test]
    fn test_request_shape() {
        let config = generation();
        let body = serde_json::to_value(GenerateContentRequest::new("hello", &config)).unwrap();

        assert_eq!(
            body,
            json!({
                "contents": [{ "parts": [{ "text": "hello" }] }],
                "generationConfig": {
                    "temperature": 0.8f32,
                    "topK": 40,
                    "topP": 0.95f32,
                    "maxOutputTokens": 1024
                }
            })
        );
    }

    #[test]
    fn test_endpoint_from_config() {
        let config = ProviderConfig {
            base_url: "https://example.test/v1beta/".to_string(),
            model: "gemini-test".to_string(),
            ..ProviderConfig::default()
        };
        let client = GeminiClient::new(Client::new(), &config);
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_reply_text_extraction() {
        let reply: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "Question: first" }], "role": "model" } },
                { "content": { "parts": [{ "text": "Question: second" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(reply.into_text().as_deref(), Some("Question: first"));

        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.into_text(), None);

        let blocked: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        }))
        .unwrap();
        assert_eq!(blocked.into_text(), None);
    }

    #[test]
    fn test_api_error_message() {
        assert_eq!(
            api_error_message(r#"{"error":{"code":400,"message":"API key not valid"}}"#),
            "API key not valid"
        );
        assert_eq!(api_error_message(r#"{"error":{}}"#), DEFAULT_API_ERROR);
        assert_eq!(api_error_message("<html>bad gateway</html>"), DEFAULT_API_ERROR);
    }

    #[tokio::test]
    async fn test_complete_returns_reply_text() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"Question: ok?"}]}}]}"#,
        )
        .await;

        let reply = client_for(base_url).complete("hello").await.unwrap();
        assert_eq!(reply, "Question: ok?");

        let request = server.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert_eq!(
            request_line,
            "POST /v1beta/models/gemini-2.0-flash:generateContent HTTP/1.1"
        );
        assert!(request.to_lowercase().contains(&format!("x-goog-api-key: {}", KEY.to_lowercase())));
        assert!(request.contains(r#""text":"hello""#));
    }

    #[tokio::test]
    async fn test_complete_reports_endpoint_error_message() {
        let (base_url, server) = serve_once(
            "400 Bad Request",
            r#"{"error":{"code":400,"message":"API key not valid"}}"#,
        )
        .await;

        let result = client_for(base_url).complete("hello").await;
        assert!(matches!(result, Err(GenerationError::Api(ref m)) if m == "API key not valid"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_complete_without_text_is_empty_response() {
        let (base_url, server) = serve_once("200 OK", r#"{"candidates":[]}"#).await;

        let result = client_for(base_url).complete("hello").await;
        assert!(matches!(result, Err(GenerationError::EmptyResponse)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_http_errors_do_not_expose_api_key() {
        let refused = client_for("http://127.0.0.1:1/v1beta".to_string())
            .complete("hi")
            .await
            .unwrap_err();
        assert!(matches!(refused, GenerationError::Http(_)));
        assert!(!refused.to_string().contains(KEY));
        assert!(!format!("{:?}", refused).contains(KEY));

        let (base_url, server) = serve_once("200 OK", "not json").await;
        let undecodable = client_for(base_url).complete("hi").await.unwrap_err();
        assert!(matches!(undecodable, GenerationError::Http(_)));
        assert!(!undecodable.to_string().contains(KEY));
        assert!(!format!("{:?}", undecodable).contains(KEY));
        server.await.unwrap();
    }
}
