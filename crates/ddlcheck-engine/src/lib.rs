//! In-memory simulation of MySQL DDL semantics.
//!
//! `ddlcheck-engine` maintains a schema catalog (databases, tables, columns,
//! indexes) and applies DDL statements to it without a server: statements are
//! parsed with the same SQL oracle the harness uses and interpreted with
//! MySQL-flavored rules (identifier case folding, implicit NOT NULL on
//! primary keys, `COLUMN_KEY` derivation, server-default charsets).
//!
//! The engine exposes the same three operations the harness expects of any
//! backend: execute a statement, introspect a table definition, and report
//! the session's current database.
//!
//! # Example
//!
//! ```rust
//! use ddlcheck_engine::{Config, Engine};
//!
//! let mut engine = Engine::new(Config {
//!     lower_case_table_names: true,
//!     ..Config::default()
//! });
//! engine.exec("CREATE DATABASE d").unwrap();
//! engine.exec("USE d").unwrap();
//! engine.exec("CREATE TABLE t (id INT PRIMARY KEY)").unwrap();
//!
//! let def = engine.table_def("d", "t").unwrap();
//! assert_eq!(def.columns[0].key, "PRI");
//! ```

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;

pub use catalog::{ColumnDef, ColumnSchema, DatabaseSchema, IndexSchema, TableDef, TableSchema};
pub use config::Config;
pub use engine::Engine;
pub use error::{EngineError, Result};
