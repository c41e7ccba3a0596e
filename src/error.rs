//! Error types for dashboard operations and imports.

use thiserror::Error;

/// Errors surfaced by the dashboard.
///
/// The `Display` text is the message shown to whoever triggered the
/// operation, so variants carry complete sentences.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// A row or record failed format checks during import
    #[error("Invalid data format: {0}")]
    InvalidData(String),

    /// Meeting dataset failed structural validation
    #[error("{0}")]
    InvalidDataset(String),

    /// Input was not valid JSON
    #[error("Invalid JSON format: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reader failed
    #[error("Invalid data format: {0}")]
    Csv(#[from] csv::Error),

    /// Import file had the wrong extension
    #[error("Please upload a CSV file")]
    UnsupportedFile(String),

    /// Import file contained no records
    #[error("No data found in the file")]
    Empty,

    /// Referenced entity does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Reading or writing local state failed
    #[error("Could not access local state: {0}")]
    Io(#[from] std::io::Error),

    /// Operation needs at least one user
    #[error("No users available for assignment")]
    NoUsers,
}

pub type Result<T> = std::result::Result<T, DashboardError>;
