mod connection;
mod error;
mod models;
/// MongoDB-backed implementation of the board store.
pub mod store;

/// Connection configuration for the MongoDB backend.
pub mod config;

pub use error::MongoDaoError;
pub use store::MongoBoardStore;

use crate::dao::storage::StorageError;

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        StorageError::unavailable(err.to_string(), err)
    }
}
