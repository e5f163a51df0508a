/// Result alias that carries the custom [`DemoError`] type.
pub type Result<T> = std::result::Result<T, DemoError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// Free-form failure message, mostly raised by collaborators that have no
    /// richer error taxonomy of their own.
    #[error("{0}")]
    Message(String),
    /// A caller handed in data the engine cannot work with.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Image decoding or encoding failed.
    #[error("image: {0}")]
    Image(#[from] image::ImageError),
    /// WAV decoding failed.
    #[error("audio: {0}")]
    Audio(#[from] hound::Error),
    /// JSON (de)serialisation failed.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl DemoError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for DemoError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for DemoError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
