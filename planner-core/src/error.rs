use thiserror::Error;

use crate::store::SectionKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),
    #[error("no {section} record with id {id}")]
    NotFound { section: SectionKind, id: String },
    #[error("{section} id {id} appears more than once")]
    DuplicateId { section: SectionKind, id: String },
    #[error("{section} record {id} was updated before it was created")]
    UpdatedBeforeCreated { section: SectionKind, id: String },
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not determine a data directory for this platform")]
    NoDataDir,
}
