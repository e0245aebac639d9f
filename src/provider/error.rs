use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status error: {status} {body}")]
    HttpStatus { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Longest error body kept from a failed response, in characters.
pub const MAX_ERROR_BODY_CHARS: usize = 200;

impl ProviderError {
    pub fn http_status(status: reqwest::StatusCode, body: String) -> Self {
        Self::HttpStatus {
            status: status.as_u16(),
            body: truncate_body(body),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}

fn truncate_body(body: String) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body,
    }
}
