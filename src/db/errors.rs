use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Query execution error: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("Integrity constraint violation: {0}")]
    IntegrityError(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Insufficient credit points: requested {requested}, available {available}")]
    InsufficientPoints { requested: i64, available: i64 },
}

impl DatabaseError {
    /// Whether this error is a unique-constraint violation. Registration maps
    /// these to a Conflict response (duplicate phone/email/fssai number).
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::IntegrityError(_) => true,
            Self::QueryError(e) => {
                if let Some(db_error) = e.as_database_error() {
                    // PostgreSQL unique_violation
                    matches!(db_error.code().as_deref(), Some("23505"))
                } else {
                    false
                }
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
