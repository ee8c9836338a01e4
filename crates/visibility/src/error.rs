use std::fmt;

#[derive(Debug)]
pub enum StoreError {
    /// Reading or writing durable storage failed.
    Io(String),
    /// Visibility map could not be encoded as JSON.
    Encode(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "visibility storage error: {msg}"),
            Self::Encode(msg) => write!(f, "visibility encode error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Encode(e.to_string())
    }
}
