use std::error::Error;
use std::fmt;

use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::time::{timeout, Duration};

use crate::config::AppConfig;

/// Generation parameters sent with every request, fixed by design.
const MAX_GEN_LEN: u32 = 512;
const TEMPERATURE: f32 = 0.5;

const BEGIN_OF_TEXT: &str = "<|begin_of_text|>";
const USER_HEADER: &str = "<|start_header_id|>user<|end_header_id|>";
const END_OF_TURN: &str = "<|eot_id|>";
const ASSISTANT_HEADER: &str = "<|start_header_id|>assistant<|end_header_id|>";

/// Wraps a topic into the instruction template and the Llama 3 chat
/// delimiters the model expects: begin-of-text, user turn header, prompt
/// body, end-of-turn, assistant turn header.
pub fn format_prompt(topic: &str) -> String {
    let instruction = format!("Write a 200 words blog on the topic {topic}");
    format!("{BEGIN_OF_TEXT}{USER_HEADER}\n{instruction}{END_OF_TURN}{ASSISTANT_HEADER}\n")
}

#[derive(Serialize)]
struct NativeRequest<'a> {
    prompt: &'a str,
    max_gen_len: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ModelResponse {
    generation: String,
}

#[derive(Debug)]
pub enum InferenceError {
    Timeout,
    Request(reqwest::Error),
    UpstreamStatus { status: StatusCode, body: String },
    MalformedResponse(serde_json::Error),
}

impl fmt::Display for InferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "model invocation timed out"),
            Self::Request(err) => write!(f, "failed to reach model endpoint: {err}"),
            Self::UpstreamStatus { status, body } => {
                write!(f, "model endpoint returned {status}: {}", body.trim())
            }
            Self::MalformedResponse(err) => {
                write!(f, "model response was not valid JSON: {err}")
            }
        }
    }
}

impl Error for InferenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Request(err) => Some(err),
            Self::MalformedResponse(err) => Some(err),
            _ => None,
        }
    }
}

/// Client for a hosted text-generation endpoint speaking the Llama native
/// request format.
pub struct InferenceClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    timeout_ms: u64,
}

impl InferenceClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.model_endpoint.clone(),
            api_key: config.model_api_key.clone(),
            timeout_ms: config.timeout_ms,
        }
    }

    /// Asks the model for a blog post on `topic`. An empty `generation`
    /// field is a legitimate `Ok("")`, distinct from any error variant.
    pub async fn generate(&self, topic: &str) -> Result<String, InferenceError> {
        let prompt = format_prompt(topic);
        let request = NativeRequest {
            prompt: &prompt,
            max_gen_len: MAX_GEN_LEN,
            temperature: TEMPERATURE,
        };

        let mut builder = self
            .http
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = timeout(Duration::from_millis(self.timeout_ms), builder.send())
            .await
            .map_err(|_| InferenceError::Timeout)?
            .map_err(InferenceError::Request)?;

        let status = response.status();
        let body = response.text().await.map_err(InferenceError::Request)?;
        if !status.is_success() {
            return Err(InferenceError::UpstreamStatus { status, body });
        }

        let parsed: ModelResponse =
            serde_json::from_str(&body).map_err(InferenceError::MalformedResponse)?;
        Ok(parsed.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_instruction_with_topic() {
        let prompt = format_prompt("llamas");
        assert!(prompt.contains("Write a 200 words blog on the topic llamas"));
    }

    #[test]
    fn prompt_delimiters_appear_in_fixed_order() {
        let prompt = format_prompt("rust");
        let begin = prompt.find(BEGIN_OF_TEXT).unwrap();
        let user = prompt.find(USER_HEADER).unwrap();
        let body = prompt.find("Write a 200 words blog").unwrap();
        let eot = prompt.find(END_OF_TURN).unwrap();
        let assistant = prompt.find(ASSISTANT_HEADER).unwrap();
        assert!(begin < user && user < body && body < eot && eot < assistant);
    }

    #[test]
    fn prompt_ends_with_assistant_header() {
        let prompt = format_prompt("tea");
        assert!(prompt.trim_end().ends_with(ASSISTANT_HEADER));
    }
}
