use mongodb::error::Error as MongoError;
use thiserror::Error;
use uuid::Uuid;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Failures specific to the MongoDB backend.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to save the board record")]
    SaveBoard {
        #[source]
        source: MongoError,
    },
    #[error("failed to load the board record")]
    LoadBoard {
        #[source]
        source: MongoError,
    },
    #[error("failed to save question `{id}`")]
    SaveQuestion {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to delete question `{id}`")]
    DeleteQuestion {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to list questions")]
    ListQuestions {
        #[source]
        source: MongoError,
    },
    #[error("failed to save answer `{id}`")]
    SaveAnswer {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to delete answer `{id}`")]
    DeleteAnswer {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to list answers for question `{question_id}`")]
    ListAnswers {
        question_id: Uuid,
        #[source]
        source: MongoError,
    },
}
