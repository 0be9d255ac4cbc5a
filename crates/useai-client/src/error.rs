//! Error types for the generation client

/// Generation client errors
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No credential configured
    #[error("missing API key: set `api_key` or OPENROUTER_API_KEY")]
    MissingApiKey,

    /// Request could not be sent or the response not read
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("generation service returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body as text
        body: String,
    },

    /// Response body is not JSON
    #[error("malformed response: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// JSON response without `choices[0].message.content`
    #[error("invalid response from generation service: {payload}")]
    InvalidResponse {
        /// Raw response body
        payload: String,
    },
}
