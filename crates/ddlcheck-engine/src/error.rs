//! Error types for the schema engine.

use sqlparser::parser::ParserError;

/// Errors produced while applying statements to the simulated catalog.
///
/// Display text follows the wording of the equivalent MySQL server errors,
/// so harness output stays comparable between backends.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// CREATE DATABASE for a database that already exists.
    #[error("Can't create database '{0}'; database exists")]
    DatabaseExists(String),

    /// DROP DATABASE for a database that doesn't exist.
    #[error("Can't drop database '{0}'; database doesn't exist")]
    DropDatabaseNotFound(String),

    /// A statement referenced a database that doesn't exist.
    #[error("Unknown database '{0}'")]
    UnknownDatabase(String),

    /// The statement omitted a schema qualifier and no database is selected.
    #[error("No database selected")]
    NoDatabaseSelected,

    /// CREATE TABLE for a table that already exists.
    #[error("Table '{0}' already exists")]
    TableExists(String),

    /// DROP TABLE for one or more tables that don't exist.
    #[error("Unknown table '{0}'")]
    UnknownTable(String),

    /// A statement referenced a table that doesn't exist.
    #[error("Table '{0}.{1}' doesn't exist")]
    TableNotFound(String, String),

    /// Duplicate column name in a CREATE TABLE or ADD COLUMN.
    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),

    /// A statement referenced a column that doesn't exist.
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// DROP of a column or key that doesn't exist.
    #[error("Can't DROP '{0}'; check that column/key exists")]
    UnknownColumnOrKey(String),

    /// Duplicate index name on one table.
    #[error("Duplicate key name '{0}'")]
    DuplicateKey(String),

    /// More than one PRIMARY KEY on one table.
    #[error("Multiple primary key defined")]
    MultiplePrimaryKey,

    /// The statement text failed to parse.
    #[error("{0}")]
    Parse(#[from] ParserError),

    /// A statement form the engine doesn't simulate.
    #[error("unsupported statement: {0}")]
    Unsupported(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
