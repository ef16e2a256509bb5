//! The live-MySQL backend.

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::Row;
use tracing::info;

use super::{ColumnDef, Executor, TableDef};
use crate::error::{Error, Result};

/// Ordered column metadata for one table, as the server reports it.
const COLUMNS_QUERY: &str = "\
    SELECT COLUMN_NAME, COLUMN_TYPE, IS_NULLABLE, COLUMN_KEY, CHARACTER_SET_NAME \
    FROM information_schema.columns \
    WHERE table_schema = ? AND table_name = ? \
    ORDER BY ORDINAL_POSITION";

/// Backend that executes DDL against a live MySQL server.
///
/// The pool is capped at one connection: session state set by `USE` and
/// `SET` must stay visible to every later call.
pub struct MysqlExecutor {
    pool: MySqlPool,
}

impl MysqlExecutor {
    /// Opens the connection and verifies the server is reachable before any
    /// input is accepted.
    pub async fn connect(host: &str, port: u16, user: &str, password: &str) -> Result<Self> {
        let options = MySqlConnectOptions::new()
            .host(host)
            .port(port)
            .username(user)
            .password(password);
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        info!(host = %host, port = %port, "connected to MySQL");
        Ok(Self { pool })
    }
}

impl Executor for MysqlExecutor {
    async fn exec(&mut self, sql: &str) -> Result<()> {
        // Text protocol: statements like USE cannot go through a prepared
        // statement.
        sqlx::raw_sql(sql).execute(&self.pool).await?;
        Ok(())
    }

    async fn table_def(&mut self, database: &str, table: &str) -> Result<TableDef> {
        let rows = sqlx::query(COLUMNS_QUERY)
            .bind(database)
            .bind(table)
            .fetch_all(&self.pool)
            .await?;
        if rows.is_empty() {
            return Err(Error::NoSuchTable {
                database: database.to_owned(),
                table: table.to_owned(),
            });
        }
        let mut columns = Vec::with_capacity(rows.len());
        for row in &rows {
            let charset: Option<String> = row.try_get(4)?;
            columns.push(ColumnDef {
                name: row.try_get(0)?,
                column_type: row.try_get(1)?,
                nullable: row.try_get(2)?,
                key: row.try_get(3)?,
                charset: charset.unwrap_or_default(),
            });
        }
        Ok(TableDef {
            name: table.to_owned(),
            columns,
        })
    }

    async fn current_database(&mut self) -> Result<String> {
        let database: Option<String> = sqlx::query_scalar("SELECT DATABASE()")
            .fetch_one(&self.pool)
            .await?;
        Ok(database.unwrap_or_default())
    }
}
