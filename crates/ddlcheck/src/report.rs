//! Result reporting.

use std::io::{self, Write};

use crate::executor::TableDef;

/// Writes one line per column: table-qualified column name, type, key
/// marker, charset, nullability, joined by single spaces.
///
/// No header, no summary, no separators between tables — the line-by-line
/// diff between two runs is the whole comparison.
pub fn write_table_def<W: Write>(out: &mut W, def: &TableDef) -> io::Result<()> {
    for column in &def.columns {
        writeln!(
            out,
            "{}.{} {} {} {} {}",
            def.name, column.name, column.column_type, column.key, column.charset, column.nullable
        )?;
    }
    Ok(())
}
