//! Error taxonomy shared across the storage, repository and board layers.

use thiserror::Error;

use crate::task::TaskId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// An update targeted an id absent from the collection.
    #[error("task {id} not found")]
    NotFound { id: TaskId },

    /// A stored collection exists but its JSON does not parse. Surfaced
    /// instead of silently replacing the collection with an empty one.
    #[error("stored data under '{key}' is malformed: {source}")]
    MalformedData {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The underlying storage failed to read or write a collection.
    #[error("failed to persist '{key}': {source}")]
    Persistence {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A record failed boundary validation before being stored.
    #[error("invalid record: {reason}")]
    InvalidRecord { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
