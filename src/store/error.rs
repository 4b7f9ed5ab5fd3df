use thiserror::Error;

/// Storage failures, classified by the constraint that rejected the write.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write. Carries the driver message,
    /// e.g. `UNIQUE constraint failed: users.email`.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("check constraint violated: {0}")]
    CheckViolation(String),

    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let kind = match &err {
            sqlx::Error::Database(db_err) => Some((db_err.kind(), db_err.message().to_string())),
            _ => None,
        };

        match kind {
            Some((sqlx::error::ErrorKind::UniqueViolation, message)) => {
                Self::UniqueViolation(message)
            }
            Some((sqlx::error::ErrorKind::CheckViolation, message)) => {
                Self::CheckViolation(message)
            }
            Some((sqlx::error::ErrorKind::ForeignKeyViolation, message)) => {
                Self::ForeignKeyViolation(message)
            }
            _ => Self::Database(err),
        }
    }
}

impl StoreError {
    /// Returns `true` when the rejected write targeted the `properties` table.
    #[must_use]
    pub fn is_on_properties(&self) -> bool {
        match self {
            Self::UniqueViolation(message)
            | Self::CheckViolation(message)
            | Self::ForeignKeyViolation(message) => message.contains("properties"),
            Self::Database(_) => false,
        }
    }
}
