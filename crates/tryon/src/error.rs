use {image::ImageError, inference::InferError, std::fmt, std::time::Duration};

/// Every way a try-on request can fail.
///
/// `Clone` so a single computation's outcome can be handed to every caller
/// waiting on the same fingerprint.
#[derive(Debug, Clone, PartialEq)]
pub enum TryOnError {
    /// Missing image, blank user id or unknown garment category. Raised
    /// before any inference runs.
    InvalidRequest(String),
    InvalidImageFormat(String),
    NoBodyDetected,
    EngineNotReady,
    ProcessingFailure(String),
    Timeout(Duration),
    Unknown(String),
}

impl TryOnError {
    /// Category recorded in processing metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            TryOnError::InvalidRequest(_) => "invalid_request",
            TryOnError::InvalidImageFormat(_) => "invalid_image_format",
            TryOnError::NoBodyDetected => "no_body_detected",
            TryOnError::EngineNotReady => "engine_not_ready",
            TryOnError::ProcessingFailure(_) => "processing_failure",
            TryOnError::Timeout(_) => "timeout",
            TryOnError::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for TryOnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryOnError::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
            TryOnError::InvalidImageFormat(msg) => write!(f, "invalid image format: {msg}"),
            TryOnError::NoBodyDetected => write!(
                f,
                "no body detected: retake the photo with a clear view of the person"
            ),
            TryOnError::EngineNotReady => write!(f, "engine is not initialized yet"),
            TryOnError::ProcessingFailure(msg) => write!(f, "processing failure: {msg}"),
            TryOnError::Timeout(budget) => {
                write!(f, "request exceeded its {} ms budget", budget.as_millis())
            }
            TryOnError::Unknown(msg) => write!(f, "unexpected failure: {msg}"),
        }
    }
}

impl std::error::Error for TryOnError {}

impl From<ImageError> for TryOnError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::InvalidFormat(msg) | ImageError::Decode(msg) => {
                TryOnError::InvalidImageFormat(msg)
            }
            ImageError::Task(msg) => TryOnError::Unknown(msg),
            other => TryOnError::ProcessingFailure(other.to_string()),
        }
    }
}

impl From<InferError> for TryOnError {
    fn from(err: InferError) -> Self {
        TryOnError::ProcessingFailure(err.to_string())
    }
}

impl From<tokio::task::JoinError> for TryOnError {
    fn from(err: tokio::task::JoinError) -> Self {
        TryOnError::Unknown(format!("blocking task failed: {err}"))
    }
}
