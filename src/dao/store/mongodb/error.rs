use mongodb::error::Error as MongoError;
use thiserror::Error;
use uuid::Uuid;

/// Result alias for MongoDB store operations.
pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Failures raised by the MongoDB backend.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// The connection string could not be parsed.
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        /// Rejected connection string.
        uri: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// The driver rejected the client options.
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// The server never answered while connecting.
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        /// Number of pings tried.
        attempts: u32,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A health probe failed.
    #[error("MongoDB ping health check failed")]
    HealthPing {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// An index could not be created.
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        /// Collection involved.
        collection: &'static str,
        /// Name of the index.
        index: &'static str,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A player could not be inserted.
    #[error("failed to save player `{name}`")]
    SavePlayer {
        /// Name of the player.
        name: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A match could not be inserted.
    #[error("failed to save match `{id}`")]
    SaveMatch {
        /// Identifier of the match.
        id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A collection could not be read.
    #[error("failed to list {collection}")]
    List {
        /// Collection involved.
        collection: &'static str,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A collection could not be emptied.
    #[error("failed to clear {collection}")]
    Clear {
        /// Collection involved.
        collection: &'static str,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A stored identifier is not a UUID.
    #[error("invalid identifier `{value}` stored in {collection}")]
    InvalidId {
        /// Collection involved.
        collection: &'static str,
        /// Raw stored value.
        value: String,
    },
}
