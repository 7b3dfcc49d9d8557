use molgraph_core::CoreError;
use thiserror::Error;

pub type DataResult<T> = Result<T, DataError>;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("format error at line {line}: {msg}")]
    Format { line: usize, msg: String },
    #[error("unknown dataset class: {0}")]
    UnknownDataset(String),
    #[error("dataset config is missing required field {0}")]
    MissingField(&'static str),
    #[error("structure inference failed: {0}")]
    Inference(String),
    #[error("invalid dataset config: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Element(#[from] CoreError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DataError {
    pub fn format(line: usize, msg: impl Into<String>) -> Self {
        DataError::Format {
            line,
            msg: msg.into(),
        }
    }
}
