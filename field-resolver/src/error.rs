use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("Expected an array of records, found {0}")]
    NotAnArray(&'static str),

    #[error("Record {index} is not an object (found {found})")]
    NotAnObject { index: usize, found: &'static str },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ResolverResult<T> = Result<T, ResolverError>;
