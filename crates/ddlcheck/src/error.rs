//! Error types for the harness.

/// Errors surfaced while running a statement stream.
///
/// Parse and I/O failures are fatal and abort the run. Execution and lookup
/// failures are recoverable: the processing loop converts them to printed
/// lines at the statement boundary and moves on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The SQL oracle rejected a batched statement. Fatal: the statement
    /// boundary can no longer be trusted.
    #[error("parse error: {message}\nsql: {sql}")]
    Parse {
        /// The oracle's error message.
        message: String,
        /// The statement text that failed to parse.
        sql: String,
    },

    /// Reading the input stream or writing a report failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The MySQL backend reported an error.
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    /// The engine backend reported an error.
    #[error("{0}")]
    Engine(#[from] ddlcheck_engine::EngineError),

    /// A table expected to exist was not found.
    ///
    /// Distinct from an empty column list: a successful lookup never returns
    /// zero columns.
    #[error("Table '{database}.{table}' doesn't exist")]
    NoSuchTable {
        /// Database the lookup ran against.
        database: String,
        /// Table that was not found.
        table: String,
    },
}

/// Result type for harness operations.
pub type Result<T> = std::result::Result<T, Error>;
