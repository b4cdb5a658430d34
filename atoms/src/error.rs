use thiserror::Error;

/// Errors raised anywhere in the image pipeline.
///
/// Upstream failures (storage, analysis, persistence) and malformed input are
/// all fatal to the current invocation; the lambdas turn them into a generic
/// failure response.
#[derive(Error, Debug)]
pub enum GalleryError {
    /// S3 read or write failed
    #[error("S3 error: {0}")]
    Storage(String),

    /// Rekognition call failed
    #[error("Rekognition error: {0}")]
    Analysis(String),

    /// DynamoDB call failed
    #[error("DynamoDB error: {0}")]
    Persistence(String),

    /// A stored item could not be turned back into an image record
    #[error("Malformed image record: {0}")]
    MalformedRecord(String),

    /// The trigger payload is missing something we need
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// A required environment variable is not set
    #[error("{0} must be set")]
    MissingConfig(&'static str),

    /// Thumbnail decode or encode failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response building failed
    #[error("HTTP error: {0}")]
    Http(String),
}

pub type Result<T, E = GalleryError> = std::result::Result<T, E>;
