use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Source is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}
