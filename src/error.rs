//! Error types for the tabstream library

use thiserror::Error;

/// Result type alias for tabstream operations
pub type Result<T> = std::result::Result<T, TabError>;

/// Main error type for all registry and I/O operations
#[derive(Error, Debug)]
pub enum TabError {
    /// No handler is registered for the requested format
    #[error("no suitable handler found for format '{format}'")]
    NoHandler { format: String },

    /// The format is known but the explicitly requested backend library is not
    #[error("library '{library}' is not registered for format '{format}'")]
    LibraryUnavailable { library: String, format: String },

    /// A deferred backend module failed to load
    #[error("failed to load backend module '{module}': {reason}")]
    Load { module: String, reason: String },

    /// Invalid sheet name or sheet not found
    #[error("sheet '{sheet}' not found. Available sheets: {available}")]
    SheetNotFound { sheet: String, available: String },

    /// A handler was given a source or sink kind it cannot consume
    #[error("unsupported source: {0}")]
    UnsupportedSource(String),

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV codec error wrapper
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
