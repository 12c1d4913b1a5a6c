use thiserror::Error;

/// Why a generation attempt could not produce usable messages. Never leaves
/// the generator; every variant ends on the fallback path.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Gemini API key is not configured")]
    MissingApiKey,

    #[error("Gemini API error: HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("No valid messages returned")]
    NoMessages,
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        GenerationError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(e: serde_json::Error) -> Self {
        GenerationError::MalformedResponse(e.to_string())
    }
}
