use std::fmt;

#[derive(Debug)]
pub enum ImageError {
    /// The payload is not a structurally valid transfer-encoded image.
    InvalidFormat(String),
    Decode(String),
    Encode(String),
    Tensor(base::TensorError),
    /// The blocking codec task panicked or was cancelled.
    Task(String),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::InvalidFormat(msg) => write!(f, "invalid image format: {msg}"),
            ImageError::Decode(msg) => write!(f, "decode error: {msg}"),
            ImageError::Encode(msg) => write!(f, "encode error: {msg}"),
            ImageError::Tensor(err) => write!(f, "tensor error: {err}"),
            ImageError::Task(msg) => write!(f, "codec task failed: {msg}"),
        }
    }
}

impl std::error::Error for ImageError {}

impl From<crates_image::ImageError> for ImageError {
    fn from(err: crates_image::ImageError) -> Self {
        ImageError::Decode(err.to_string())
    }
}

impl From<base::TensorError> for ImageError {
    fn from(err: base::TensorError) -> Self {
        ImageError::Tensor(err)
    }
}

impl From<tokio::task::JoinError> for ImageError {
    fn from(err: tokio::task::JoinError) -> Self {
        ImageError::Task(err.to_string())
    }
}
