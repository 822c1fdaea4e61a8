//! This module handles talking to the remote text-generation service which interprets wishes.

use crate::{OrnamentType, WishResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::env;
use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::{debug, instrument, trace};

/// Anything that can go wrong while asking the remote service to interpret a wish.
///
/// Every variant is treated the same way by [`resolve_wish`](crate::resolve_wish), but we keep
/// them apart so the logs say what actually happened.
#[derive(Debug, Error)]
pub enum WishError {
    /// The API key environment variable isn't set.
    #[error("the API key variable `{0}` is not set")]
    MissingApiKey(String),

    /// The request never got a response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service responded with a non-success status.
    #[error("the service responded with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The service responded, but with no text to parse.
    #[error("the service returned no candidate text")]
    EmptyCandidate,

    /// The text didn't match the shape of a [`WishResponse`].
    #[error("malformed wish response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Something which can turn the text of a wish into a [`WishResponse`].
pub trait WishService {
    /// Ask the service to interpret the given wish.
    async fn request_wish(&self, wish: &str) -> Result<WishResponse, WishError>;
}

/// The config needed to reach the Gemini API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WishServiceConfig {
    /// The base URL of the API, without a trailing slash.
    pub endpoint: String,

    /// The name of the model to use.
    pub model: String,

    /// The name of the environment variable that holds the API key.
    pub api_key_var: String,
}

impl Default for WishServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key_var: "GEMINI_API_KEY".to_string(),
        }
    }
}

/// A [`WishService`] backed by the Gemini `generateContent` endpoint.
#[derive(Clone, Debug)]
pub struct GeminiWishService {
    /// The HTTP client, which holds its own connection pool.
    client: reqwest::Client,

    /// Where and how to send requests.
    config: WishServiceConfig,
}

impl GeminiWishService {
    /// Create a new service with the given config.
    pub fn new(config: WishServiceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// The full URL for a `generateContent` call, without the key.
    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl WishService for GeminiWishService {
    #[instrument(skip(self))]
    async fn request_wish(&self, wish: &str) -> Result<WishResponse, WishError> {
        let api_key = env::var(&self.config.api_key_var)
            .map_err(|_| WishError::MissingApiKey(self.config.api_key_var.clone()))?;

        let response = self
            .client
            .post(self.url())
            .query(&[("key", api_key)])
            .json(&request_body(wish))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%status, "Received response from wish service");
        trace!(?body);

        if !status.is_success() {
            return Err(WishError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_generate_content(&body)
    }
}

/// Build the JSON body for a `generateContent` call, constraining the output to the shape of a
/// [`WishResponse`].
fn request_body(wish: &str) -> serde_json::Value {
    let ornament_literals: Vec<&str> = OrnamentType::iter().map(OrnamentType::literal).collect();

    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt(wish) }],
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "sentiment": {
                        "type": "STRING",
                        "description": "One or two words describing the feeling of the wish.",
                    },
                    "glowColor": {
                        "type": "STRING",
                        "description": "A hex colour like #ffd700 that matches the wish.",
                    },
                    "message": {
                        "type": "STRING",
                        "description": "A short, warm, poetic reply to the wish.",
                    },
                    "ornamentType": {
                        "type": "STRING",
                        "enum": ornament_literals,
                    },
                },
                "required": ["sentiment", "glowColor", "message", "ornamentType"],
            },
        },
    })
}

/// The prompt sent along with the wish.
fn prompt(wish: &str) -> String {
    format!(
        concat!(
            "You are a magical holiday spirit living in an enchanted winter tree. ",
            "Someone has made this wish: \"{}\". ",
            "Interpret its sentiment, choose a glowing colour that captures it, ",
            "write a short and warm reply, and pick the ornament that suits it best."
        ),
        wish.trim()
    )
}

/// The parts of a `generateContent` response that we care about.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Part {
    text: Option<String>,
}

/// Parse the body of a `generateContent` response into a [`WishResponse`].
///
/// The model's answer is JSON inside the text of the first part of the first candidate.
pub fn parse_generate_content(body: &str) -> Result<WishResponse, WishError> {
    let envelope: GenerateContentResponse = serde_json::from_str(body)?;

    let text = envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content.parts.into_iter().next())
        .and_then(|part| part.text)
        .filter(|text| !text.trim().is_empty())
        .ok_or(WishError::EmptyCandidate)?;

    Ok(serde_json::from_str(text.trim())?)
}
