use thiserror::Error;

use grants_model::ModelError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The raw row set has zero rows; there is nothing to normalize.
    #[error("source produced no rows; nothing was derived")]
    EmptySource,
    /// A row carries a missing or malformed grant id.
    ///
    /// Skipping the row would silently drop its grant, reports, or visits
    /// from the output, so the whole run fails instead.
    #[error("unusable Grant_ID: {source}")]
    MalformedKey {
        #[from]
        source: ModelError,
    },
    /// A post-derivation check the key-synthesis rules guarantee has failed.
    #[error("internal invariant violated in {table}: {detail}")]
    InvariantViolation { table: String, detail: String },
}

pub type Result<T> = std::result::Result<T, EngineError>;
