use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum NutriError {
    #[error("please select an image or enter a location first")]
    InputMissing,

    #[error("file is not a decodable image: {0}")]
    InvalidImage(String),

    #[error("unsupported file type '{0}'. Allowed: png, jpg, jpeg")]
    UnsupportedFileType(String),

    #[error("file is {size} bytes, larger than the {limit} byte upload limit")]
    FileTooLarge { size: usize, limit: usize },

    #[error("{0}")]
    Service(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("server responded with status {status}")]
    HttpStatus { status: u16 },

    #[error("failed to load agronomy table from {path}: {reason}")]
    TableLoad { path: PathBuf, reason: String },

    #[error("invalid agronomy table: {0}")]
    TableInvalid(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NutriError {
    /// True for failures the user fixes by changing their input.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            NutriError::InputMissing
                | NutriError::InvalidImage(_)
                | NutriError::UnsupportedFileType(_)
                | NutriError::FileTooLarge { .. }
        )
    }

    /// True when the request never produced a usable response body.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            NutriError::Transport(_) | NutriError::HttpStatus { .. } | NutriError::Json(_)
        )
    }
}

impl From<reqwest::Error> for NutriError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => NutriError::HttpStatus {
                status: status.as_u16(),
            },
            None => NutriError::Transport(e.to_string()),
        }
    }
}
