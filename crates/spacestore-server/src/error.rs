//! Request failures and their HTTP responses.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use spacestore_core::ExtractionError;
use thiserror::Error;

/// Everything that can fail while handling an upload.
#[derive(Error, Debug)]
pub enum UploadError {
    /// No `X-API-Key` header was sent.
    #[error("API key required")]
    MissingApiKey,

    /// The API key is not in the key map.
    #[error("unauthorized")]
    UnknownApiKey,

    /// The request body is not readable multipart data.
    #[error("invalid multipart data: {0}")]
    Multipart(#[from] MultipartError),

    /// The form has no `file` field.
    #[error("missing file field")]
    MissingFile,

    /// The `file` field carries no usable file name.
    #[error("invalid file name: {0:?}")]
    InvalidFileName(String),

    /// Creating the tenant directory or writing the staged file failed.
    #[error("failed to store upload: {0}")]
    Storage(#[source] std::io::Error),

    /// The staged archive could not be extracted.
    #[error("failed to extract archive: {0}")]
    Extraction(#[from] ExtractionError),

    /// The extraction task panicked or was cancelled.
    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl UploadError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingApiKey | Self::UnknownApiKey => StatusCode::UNAUTHORIZED,
            Self::Multipart(_) | Self::MissingFile | Self::InvalidFileName(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Storage(_) | Self::Extraction(_) | Self::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
