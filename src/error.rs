// src/error.rs

//! Error types for app-install

use thiserror::Error;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the database, generator, extractor and repository layers
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying SQLite failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Underlying filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database is missing, already initialized, or otherwise unusable
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Setup failed (bad arguments, missing directories, etc.)
    #[error("Initialization error: {0}")]
    InitError(String),

    /// I/O failure with context
    #[error("I/O error: {0}")]
    IoError(String),

    /// Fetching metadata or packages failed
    #[error("Download error: {0}")]
    DownloadError(String),

    /// Malformed desktop file, repository metadata, or archive
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Requested item does not exist
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Archive format could not be handled
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Archive entry tried to escape the extraction directory
    #[error("Path traversal attempt: {0}")]
    PathTraversal(String),

    /// External helper exited unsuccessfully
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// External helper is not installed
    #[error("Tool not found: {0}")]
    ToolNotFound(String),
}

impl From<crate::compression::CompressionError> for Error {
    fn from(err: crate::compression::CompressionError) -> Self {
        Error::ParseError(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::ParseError(format!("XML error: {err}"))
    }
}
