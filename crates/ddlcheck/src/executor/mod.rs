//! Backend contract.
//!
//! Both backends expose the same three operations with identical observable
//! behavior — same column shapes, same not-found signaling — so two runs over
//! the same input can be diffed line by line.

pub mod engine;
pub mod mysql;

use crate::error::Result;

/// One column as reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Lower-case MySQL-style column type, e.g. `int`, `varchar(10)`.
    pub column_type: String,
    /// Indexing-role marker: `PRI`, `UNI`, `MUL`, or empty.
    pub key: String,
    /// Character set, empty for non-character columns.
    pub charset: String,
    /// `YES` or `NO`, normalized across backends.
    pub nullable: String,
}

/// One table definition as reported by a backend.
///
/// Column order is the backend-reported ordinal order. A successful fetch
/// never produces an empty column list; absence is signaled through
/// [`crate::Error::NoSuchTable`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    /// Table name.
    pub name: String,
    /// Columns in ordinal order.
    pub columns: Vec<ColumnDef>,
}

/// The uniform operation set both backends implement.
///
/// Exactly one backend is active per run, selected at startup and owned by
/// the processing loop for the process's whole lifetime.
#[allow(async_fn_in_trait)]
pub trait Executor {
    /// Executes one full statement, which may be the verbatim multi-line
    /// original. Errors are recoverable: the caller reports them and
    /// continues with the next statement.
    async fn exec(&mut self, sql: &str) -> Result<()>;

    /// Full ordered column list for one table; [`crate::Error::NoSuchTable`]
    /// when it does not exist.
    async fn table_def(&mut self, database: &str, table: &str) -> Result<TableDef>;

    /// Session-scoped current database, empty string when none is selected.
    async fn current_database(&mut self) -> Result<String>;
}
