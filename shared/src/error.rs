use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("staging document missing: {key}")]
    MissingDocument { key: String },

    #[error("staging document malformed: {key}: {reason}")]
    MalformedDocument { key: String, reason: String },

    #[error("upstream API returned status {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("validation failed: {message}")]
    Validation { message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
