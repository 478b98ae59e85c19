//! Error types for chainql

use thiserror::Error;

/// The main error type for chainql operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database connection or execution error raised by sqlx
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Execution failure reported by a non-sqlx executor
    #[error("Execution error: {message}")]
    Execution { message: String },

    /// Invalid query configuration, detected while composing a statement
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    /// A bulk write row does not carry a column the statement needs
    #[error("Column '{column}' missing from row {row} of bulk write to '{table}'")]
    MissingColumn {
        table: String,
        column: String,
        row: usize,
    },

    /// Transaction used in the wrong state (double begin, commit while idle, ...)
    #[error("Transaction error: {message}")]
    TransactionState { message: String },

    /// The unit of work failed and so did the rollback that followed
    #[error("{cause} (rollback also failed: {rollback})")]
    RollbackFailed {
        cause: Box<Error>,
        rollback: Box<Error>,
    },

    /// A scalar result could not be read as the expected type
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience Result type for chainql operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }

    /// Create a new invalid query error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Create a new missing column error
    pub fn missing_column(table: impl Into<String>, column: impl Into<String>, row: usize) -> Self {
        Self::MissingColumn {
            table: table.into(),
            column: column.into(),
            row,
        }
    }

    /// Create a new transaction state error
    pub fn transaction_state(message: impl Into<String>) -> Self {
        Self::TransactionState {
            message: message.into(),
        }
    }

    /// Create a new decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// True for errors caused by misusing the transaction API rather than by data
    pub fn is_transaction_state(&self) -> bool {
        matches!(self, Self::TransactionState { .. })
    }

    /// The error that made a unit of work fail, looking through rollback failures
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::RollbackFailed { cause, .. } => cause.root_cause(),
            other => other,
        }
    }
}
