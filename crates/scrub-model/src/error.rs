use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrubError {
    #[error("required column missing: {0}")]
    MissingColumn(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ScrubError>;
