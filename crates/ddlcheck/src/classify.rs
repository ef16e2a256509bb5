//! Statement classification.
//!
//! Pure, total functions over the oracle's statement variants: unrecognized
//! variants classify as "no execution needed" rather than erroring.

use sqlparser::ast::{ObjectType, Statement};

/// Whether the harness should execute this statement.
///
/// True for session-context statements (`USE`, the `SET` family) and for
/// every DDL variant; false for everything else, queries and DML included.
#[must_use]
pub fn needs_execution(statement: &Statement) -> bool {
    matches!(
        statement,
        Statement::Use(_)
            | Statement::SetVariable { .. }
            | Statement::SetNames { .. }
            | Statement::SetNamesDefault { .. }
            | Statement::SetTimeZone { .. }
    ) || is_ddl(statement)
}

/// Whether this is a schema-changing statement.
///
/// True exactly for the closed DDL set: create/drop of databases, tables and
/// indexes, ALTER TABLE, and RENAME TABLE. (`CREATE SCHEMA` is MySQL's
/// synonym for `CREATE DATABASE` and counts as one.)
#[must_use]
pub fn is_ddl(statement: &Statement) -> bool {
    matches!(
        statement,
        Statement::CreateDatabase { .. }
            | Statement::CreateSchema { .. }
            | Statement::CreateTable(_)
            | Statement::CreateIndex(_)
            | Statement::AlterTable { .. }
            | Statement::RenameTable(_)
            | Statement::Drop {
                object_type: ObjectType::Database
                    | ObjectType::Schema
                    | ObjectType::Table
                    | ObjectType::Index,
                ..
            }
    )
}
