use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP transport error: {0}")]
    Http(reqwest::Error),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("The API request returned HTTP {status}: {message}")]
    Status {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid data format from API: {0}")]
    InvalidData(String),

    #[error("Invalid API key header: {0}")]
    InvalidHeader(String),
}

impl ApiError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Http(e) => !e.is_builder(),
            ApiError::Timeout(_) => true,
            ApiError::Status { status, .. } => *status == 429 || *status >= 500,
            ApiError::Deserialization(_)
            | ApiError::InvalidData(_)
            | ApiError::InvalidHeader(_) => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(err.to_string())
        } else {
            ApiError::Http(err)
        }
    }
}
