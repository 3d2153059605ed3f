//! Gemini assistant client
//!
//! Prompt-in/text-out HTTP calls for recipe generation and health chat.
//! The model endpoint sheds load with transient "overloaded" errors, so
//! each call retries a small, fixed number of times with a flat delay.

use std::time::Duration;

use serde_json::{json, Value};
use thiserror::Error;

/// Maximum attempts per generation call
const MAX_ATTEMPTS: u32 = 3;

/// Flat delay between attempts
const RETRY_DELAY: Duration = Duration::from_secs(1);

const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1/models/gemini-2.5-flash:generateContent";

/// Assistant error types
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error: {0}")]
    Api(String),

    #[error("Model still overloaded after {0} attempts")]
    Exhausted(u32),

    #[error("Response contained no candidate text")]
    MissingText,
}

/// Result type for assistant operations
pub type AssistantResult<T> = Result<T, AssistantError>;

/// Blocking client for the Gemini text-generation endpoint
pub struct AssistantClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
}

impl AssistantClient {
    /// Create a client for the default Gemini endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    /// Create a client against a specific endpoint URL
    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Answer a free-form food/fitness/health question
    pub fn chat(&self, message: &str) -> AssistantResult<String> {
        self.generate(&chat_prompt(message))
    }

    /// Generate a structured recipe from an ingredient or dish prompt
    pub fn generate_recipe(&self, prompt: &str) -> AssistantResult<String> {
        self.generate(&recipe_prompt(prompt))
    }

    /// Send one prompt, retrying on transient overload responses
    fn generate(&self, prompt: &str) -> AssistantResult<String> {
        let body = json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ]
        });

        for attempt in 1..=MAX_ATTEMPTS {
            let response = self
                .http
                .post(&self.endpoint)
                .query(&[("key", self.api_key.as_str())])
                .json(&body)
                .send()?;

            let status = response.status();
            if status == reqwest::StatusCode::SERVICE_UNAVAILABLE
                || status == reqwest::StatusCode::TOO_MANY_REQUESTS
            {
                tracing::warn!(
                    "Gemini returned {} (attempt {}/{}), retrying",
                    status,
                    attempt,
                    MAX_ATTEMPTS
                );
                std::thread::sleep(RETRY_DELAY);
                continue;
            }

            let payload: Value = response.json()?;

            if let Some(message) = api_error_message(&payload) {
                if is_overloaded(&message) {
                    tracing::warn!(
                        "Gemini overloaded (attempt {}/{}): {}",
                        attempt,
                        MAX_ATTEMPTS,
                        message
                    );
                    std::thread::sleep(RETRY_DELAY);
                    continue;
                }
                return Err(AssistantError::Api(message));
            }

            return extract_text(&payload).ok_or(AssistantError::MissingText);
        }

        Err(AssistantError::Exhausted(MAX_ATTEMPTS))
    }
}

/// Pull the first candidate's text out of a generateContent response
fn extract_text(payload: &Value) -> Option<String> {
    payload["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Error message from a generateContent error body, if any
fn api_error_message(payload: &Value) -> Option<String> {
    payload["error"]["message"].as_str().map(|s| s.to_string())
}

/// Whether an API error message indicates a transient overload
fn is_overloaded(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("overloaded") || lower.contains("unavailable")
}

/// Health-assistant chat prompt wrapper
fn chat_prompt(message: &str) -> String {
    format!(
        "You are EatoAI, a friendly AI health assistant.\n\
         Answer the user clearly and helpfully about food, fitness, or health.\n\
         User message: {}",
        message
    )
}

/// Chef-style recipe prompt wrapper
fn recipe_prompt(prompt: &str) -> String {
    format!(
        "You are a master chef AI. Based on this input: \"{}\", generate a detailed recipe including:\n\
         1. Recipe Title\n\
         2. Ingredients List\n\
         3. Step-by-step Instructions\n\
         Keep it simple, structured, and in plain text.",
        prompt
    )
}
