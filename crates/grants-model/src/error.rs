use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("grant id is empty")]
    EmptyGrantId,
    #[error("grant id {0:?} does not match the GR-<year>-<seq> shape")]
    MalformedGrantId(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
