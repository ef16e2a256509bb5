//! Affected-table resolution.
//!
//! Given a parsed DDL statement, computes the fully-qualified tables it
//! touches. Unqualified names are filled from the backend's current database
//! at resolution time, never earlier: a `USE` executed a few statements back
//! must already be reflected here.

use sqlparser::ast::{ObjectName, ObjectNamePart, ObjectType, Statement};

use crate::error::Result;
use crate::executor::Executor;

/// A fully-qualified table identifier.
///
/// `database` is never empty once constructed, except when the backend
/// itself has no current database to offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableId {
    /// Database (schema) name.
    pub database: String,
    /// Table name.
    pub table: String,
}

/// Tables affected by one DDL statement, in statement-declaration order.
///
/// Database-level statements (create/drop database) and DROP TABLE produce
/// an empty list; RENAME TABLE reports each rename's *new* location only.
pub async fn affected_tables<E: Executor>(
    statement: &Statement,
    backend: &mut E,
) -> Result<Vec<TableId>> {
    let mut tables = Vec::new();
    match statement {
        Statement::CreateTable(create) => {
            tables.push(table_id(&create.name, backend).await?);
        }
        Statement::CreateIndex(create) => {
            tables.push(table_id(&create.table_name, backend).await?);
        }
        Statement::AlterTable { name, .. } => {
            tables.push(table_id(name, backend).await?);
        }
        Statement::RenameTable(renames) => {
            for rename in renames {
                tables.push(table_id(&rename.new_name, backend).await?);
            }
        }
        Statement::Drop {
            object_type: ObjectType::Index,
            names,
            ..
        } => {
            // The oracle carries DROP INDEX as a possibly-qualified index
            // name; only the qualifier names the table. An unqualified index
            // resolves to no table at all.
            for name in names {
                let mut parts = name_parts(name);
                parts.pop();
                if let Some(table) = parts.pop() {
                    tables.push(qualify(parts.pop(), table, backend).await?);
                }
            }
        }
        _ => {}
    }
    Ok(tables)
}

async fn table_id<E: Executor>(name: &ObjectName, backend: &mut E) -> Result<TableId> {
    let mut parts = name_parts(name);
    let table = parts.pop().unwrap_or_default();
    qualify(parts.pop(), table, backend).await
}

async fn qualify<E: Executor>(
    database: Option<String>,
    table: String,
    backend: &mut E,
) -> Result<TableId> {
    let database = match database {
        Some(database) if !database.is_empty() => database,
        _ => backend.current_database().await?,
    };
    Ok(TableId { database, table })
}

fn name_parts(name: &ObjectName) -> Vec<String> {
    name.0
        .iter()
        .map(|part| match part {
            ObjectNamePart::Identifier(ident) => ident.value.clone(),
        })
        .collect()
}
