//! Differential-testing harness for DDL statements.
//!
//! ddlcheck feeds a stream of SQL text to one of two interchangeable
//! backends — an in-memory schema engine or a live MySQL server — and prints
//! the resulting table schema after every data-definition statement. Running
//! the same input once per backend and diffing the two outputs surfaces
//! divergence in DDL semantics.
//!
//! # Architecture
//!
//! The pipeline, in statement order:
//!
//! - [`batch`] reassembles complete `;`-terminated statements from the
//!   line-oriented input stream.
//! - The SQL oracle (`sqlparser`, MySQL dialect) turns each one into a
//!   structured statement.
//! - [`classify`] decides whether it must execute and whether it is DDL.
//! - The selected [`executor`] backend executes it.
//! - [`resolve`] computes the tables a DDL statement touched, filling
//!   missing schema qualifiers from the backend's current database.
//! - [`report`] prints each affected table's definition, one line per
//!   column.
//!
//! [`run`] wires these together; the backend is constructed once at startup
//! and passed in explicitly, so the loop is testable without a server.

pub mod batch;
pub mod classify;
pub mod error;
pub mod executor;
pub mod report;
pub mod resolve;
pub mod run;

pub use batch::StatementBatcher;
pub use error::{Error, Result};
pub use executor::{ColumnDef, Executor, TableDef};
pub use resolve::TableId;
pub use run::run;
