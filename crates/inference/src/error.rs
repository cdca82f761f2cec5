use std::fmt;

#[derive(Debug)]
pub enum InferError {
    Candle(String),
    Shape(String),
    Io(String),
    Runtime(String),
}

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferError::Candle(msg) => write!(f, "candle error: {msg}"),
            InferError::Shape(msg) => write!(f, "shape error: {msg}"),
            InferError::Io(msg) => write!(f, "io error: {msg}"),
            InferError::Runtime(msg) => write!(f, "runtime error: {msg}"),
        }
    }
}

impl std::error::Error for InferError {}

impl From<candle_core::Error> for InferError {
    fn from(err: candle_core::Error) -> Self {
        InferError::Candle(err.to_string())
    }
}

impl From<std::io::Error> for InferError {
    fn from(err: std::io::Error) -> Self {
        InferError::Io(err.to_string())
    }
}

impl From<base::TensorError> for InferError {
    fn from(err: base::TensorError) -> Self {
        InferError::Shape(err.to_string())
    }
}

/// Check that `frame` is a non-empty `[H, W, 3]` tensor and return `(H, W)`.
pub(crate) fn validate_frame(frame: &base::Tensor<f32>) -> Result<(usize, usize), InferError> {
    if frame.shape.len() != 3 {
        return Err(InferError::Shape(format!(
            "expected HWC tensor, got shape {:?}",
            frame.shape
        )));
    }
    let (h, w, c) = (frame.shape[0], frame.shape[1], frame.shape[2]);
    if h == 0 || w == 0 {
        return Err(InferError::Shape(format!(
            "image dimensions must be non-zero, got {}x{}",
            h, w
        )));
    }
    if c != 3 {
        return Err(InferError::Shape(format!(
            "expected 3 channels (RGB), got {}",
            c
        )));
    }
    Ok((h, w))
}
