use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid pixel buffer: expected {expected} bytes for {width}x{height}, got {actual}")]
    InvalidPixelBuffer {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Failed to decode frame image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            Error::ImageDecode(image::ImageError::IoError(e)) => {
                e.kind() == std::io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}
