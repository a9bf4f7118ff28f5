use thiserror::Error;

#[derive(Error, Debug)]
pub enum CihuiError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Word not found: {0}")]
    WordNotFound(String),

    #[error("CihuiError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for CihuiError {
    fn from(error: std::io::Error) -> Self {
        CihuiError::Io(Box::new(error))
    }
}

impl CihuiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CihuiError::WordNotFound(_))
    }
}
