//! The simulated-engine backend.

use ddlcheck_engine::{Config, Engine, EngineError};

use super::{ColumnDef, Executor, TableDef};
use crate::error::{Error, Result};

/// Backend that applies DDL with the in-memory schema engine.
pub struct EngineExecutor {
    engine: Engine,
}

impl EngineExecutor {
    /// Creates the engine backend.
    ///
    /// `charset` should match the live server's charset when the output is
    /// diffed against a MySQL run. The engine folds table names to lower
    /// case and applies multi-operation DDL best-effort, mirroring the
    /// non-transactional server it stands in for.
    #[must_use]
    pub fn new(charset: impl Into<String>) -> Self {
        Self {
            engine: Engine::new(Config {
                charset_server: charset.into(),
                lower_case_table_names: true,
                need_atomic: false,
            }),
        }
    }
}

impl Executor for EngineExecutor {
    async fn exec(&mut self, sql: &str) -> Result<()> {
        self.engine.exec(sql)?;
        Ok(())
    }

    async fn table_def(&mut self, database: &str, table: &str) -> Result<TableDef> {
        let def = self
            .engine
            .table_def(database, table)
            .map_err(|err| match err {
                EngineError::UnknownDatabase(_) | EngineError::TableNotFound(_, _) => {
                    Error::NoSuchTable {
                        database: database.to_owned(),
                        table: table.to_owned(),
                    }
                }
                other => Error::Engine(other),
            })?;
        Ok(TableDef {
            name: def.name,
            columns: def
                .columns
                .into_iter()
                .map(|column| ColumnDef {
                    name: column.name,
                    column_type: column.column_type,
                    key: column.key,
                    charset: column.charset,
                    nullable: if column.nullable { "YES" } else { "NO" }.to_owned(),
                })
                .collect(),
        })
    }

    async fn current_database(&mut self) -> Result<String> {
        Ok(self
            .engine
            .current_database()
            .unwrap_or_default()
            .to_owned())
    }
}
