use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Issue update rejected with status {status}: {body}")]
    IssueUpdate { status: u16, body: String },

    /// No vote panel could be found at the snapshot source.
    #[error("Vote panel not found: {0}")]
    PanelNotFound(String),

    #[error("Column {column} out of range (table has {columns} columns)")]
    ColumnOutOfRange { column: usize, columns: usize },

    #[error("Stored flag is unreadable: {0}")]
    Flag(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
