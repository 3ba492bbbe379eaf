//! Data types passed between the controller, the HTTP client and the surface.

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;
use crate::target::Target;

/// Character count at which the input counter switches to its warning style.
pub const CHAR_WARNING_THRESHOLD: usize = 500;

/// Validated request body for `POST /api/convert`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionRequest {
    text: String,
    target: Target,
}

impl ConversionRequest {
    /// Trims `raw_text` and rejects it if nothing is left.
    pub fn new(raw_text: &str, target: Target) -> Result<Self, ConvertError> {
        let text = raw_text.trim();
        if text.is_empty() {
            return Err(ConvertError::EmptyInput);
        }
        Ok(Self {
            text: text.to_string(),
            target,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn target(&self) -> Target {
        self.target
    }
}

/// Status and body exactly as the server sent them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConversionResponse {
    #[serde(default)]
    converted_text: Option<String>,
    #[serde(default)]
    converted: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Turns a settled request into either the converted text or the error to show.
pub fn interpret_response(outcome: Result<RawResponse, ConvertError>) -> Result<String, ConvertError> {
    let response = outcome?;

    if !response.is_success() {
        let body: ConversionResponse = serde_json::from_str(&response.body).unwrap_or_default();
        return Err(match body.error.filter(|e| !e.trim().is_empty()) {
            Some(message) => ConvertError::Server {
                status: response.status,
                message,
            },
            None => ConvertError::server_status(response.status),
        });
    }

    let body: ConversionResponse = serde_json::from_str(&response.body)
        .map_err(|e| ConvertError::MalformedBody(e.to_string()))?;

    match body.converted_text.or(body.converted) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ConvertError::NoContent),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Success(String),
    Error(String),
}

impl UiState {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn converted_text(&self) -> Option<&str> {
        match self {
            UiState::Success(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Positive,
    Negative,
}

impl FeedbackKind {
    pub fn thanks_message(&self) -> &'static str {
        match self {
            FeedbackKind::Positive => "Thanks for the positive feedback!",
            FeedbackKind::Negative => "Thanks. We'll keep working to do better.",
        }
    }
}

/// Length of the input as shown in the counter, in Unicode scalar values.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

pub fn is_over_limit(count: usize) -> bool {
    count >= CHAR_WARNING_THRESHOLD
}
