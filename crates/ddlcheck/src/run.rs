//! The processing loop.
//!
//! Strictly sequential: one statement is read, executed, resolved, and
//! reported before the next input line is consumed. The backend is passed in
//! once and exclusively owned by the loop for the whole run.

use std::io::Write;

use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::batch::StatementBatcher;
use crate::classify;
use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::report;
use crate::resolve;

/// Feeds a statement stream to `backend`, echoing executed statements and
/// reporting affected table definitions to `out`.
///
/// Parse and I/O failures abort the run. Execution and lookup failures are
/// printed to `out` in place of the normal output for that statement — in
/// the same stream, so a diff between two backends surfaces value and error
/// divergence uniformly — and processing continues.
pub async fn run<E, R, W>(reader: R, backend: &mut E, out: &mut W) -> Result<()>
where
    E: Executor,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    let mut batcher = StatementBatcher::new();
    while let Some(line) = lines.next_line().await? {
        let Some(sql) = batcher.push_line(&line) else {
            continue;
        };
        process_statement(&sql, backend, out).await?;
    }
    if batcher.has_pending() {
        debug!("discarding unterminated trailing input");
    }
    Ok(())
}

async fn process_statement<E: Executor, W: Write>(
    sql: &str,
    backend: &mut E,
    out: &mut W,
) -> Result<()> {
    let statements = Parser::parse_sql(&MySqlDialect {}, sql).map_err(|err| Error::Parse {
        message: err.to_string(),
        sql: sql.to_owned(),
    })?;
    let single = statements.len() == 1;
    for statement in &statements {
        if !classify::needs_execution(statement) {
            continue;
        }
        writeln!(out, "{statement}")?;
        // The backend gets the verbatim input when the batch held exactly one
        // statement; a multi-statement batch is re-rendered per statement.
        let text = if single {
            sql.to_owned()
        } else {
            statement.to_string()
        };
        if let Err(err) = backend.exec(&text).await {
            writeln!(out, "{err}")?;
        }
        if !classify::is_ddl(statement) {
            continue;
        }
        for table in resolve::affected_tables(statement, backend).await? {
            match backend.table_def(&table.database, &table.table).await {
                Ok(def) => report::write_table_def(out, &def)?,
                Err(err) => writeln!(out, "{err}")?,
            }
        }
    }
    Ok(())
}
