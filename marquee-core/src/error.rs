use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("transport error: upstream returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("cache error: {0}")]
    Cache(#[from] cacache::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
