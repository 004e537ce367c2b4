use thiserror::Error;

/// Centralized error types for the application
///
/// Storage, transport and configuration failures are all converted to this enum.
/// "Not found" is not an error: lookups return `Ok(None)` for missing rows.
///
/// # Example
///
/// ```no_run
/// use abiturbot::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Database connection pool errors
    #[error("Database pool error: {0}")]
    DatabasePool(#[from] r2d2::Error),

    /// Schema migration errors
    #[error("Migration error: {0}")]
    Migration(#[from] refinery::Error),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Data file parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration extraction errors
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// A blocking storage task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// A filter declared as "exactly one or none" matched several rows;
    /// `count` is a lower bound, the lookup stops after the second row
    #[error("Expected at most one row in {table}, found at least {count}")]
    AmbiguousMatch { table: &'static str, count: usize },

    /// A filter or insert referenced a column the record does not have
    #[error("Unknown column {column} for table {table}")]
    UnknownColumn { table: &'static str, column: String },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::Config(Box::new(err))
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_match_message() {
        let err = AppError::AmbiguousMatch {
            table: "universities",
            count: 2,
        };
        assert_eq!(err.to_string(), "Expected at most one row in universities, found at least 2");
    }

    #[test]
    fn test_unknown_column_message() {
        let err = AppError::UnknownColumn {
            table: "specialties",
            column: "price; DROP TABLE".to_string(),
        };
        assert!(err.to_string().contains("price; DROP TABLE"));
        assert!(err.to_string().contains("specialties"));
    }
}
