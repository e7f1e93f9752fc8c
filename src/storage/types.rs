use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Database errors with user-facing messages.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Another process has the preference database locked
    #[error("Another instance of trailhead appears to be running. Please close it and try again.")]
    InstanceLocked,

    /// Schema creation failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Classify a sqlx error, mapping SQLite lock failures to `InstanceLocked`.
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        if Self::is_lock_message(&err.to_string()) {
            return DatabaseError::InstanceLocked;
        }
        DatabaseError::Other(err)
    }

    /// SQLITE_BUSY (5), SQLITE_LOCKED (6) and SQLITE_CANTOPEN (14) all mean
    /// the file is held elsewhere.
    pub(crate) fn is_lock_message(message: &str) -> bool {
        let lower = message.to_lowercase();
        lower.contains("database is locked")
            || lower.contains("database table is locked")
            || lower.contains("sqlite_busy")
            || lower.contains("sqlite_locked")
            || lower.contains("unable to open database file")
    }
}
