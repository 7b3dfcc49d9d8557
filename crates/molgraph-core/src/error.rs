use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown element symbol: {0}")]
    UnknownElement(String),
    #[error("unknown bond order: {0}")]
    UnknownBondOrder(i64),
}
