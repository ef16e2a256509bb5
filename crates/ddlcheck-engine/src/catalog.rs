//! Schema catalog value types.
//!
//! The catalog is a plain in-memory tree: databases hold tables, tables hold
//! an ordered column list plus their indexes. Key markers (`PRI`/`UNI`/`MUL`)
//! are never stored; they are derived from the index set at introspection
//! time, the way MySQL derives `COLUMN_KEY`.

use std::collections::HashMap;

/// One database in the catalog.
#[derive(Debug, Clone, Default)]
pub struct DatabaseSchema {
    /// Tables keyed by their (possibly case-folded) name.
    pub tables: HashMap<String, TableSchema>,
}

/// One table: ordered columns plus indexes.
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// Stored table name.
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnSchema>,
    /// Indexes; the primary key is the index named `PRIMARY`.
    pub indexes: Vec<IndexSchema>,
}

/// One column as stored in the catalog.
#[derive(Debug, Clone)]
pub struct ColumnSchema {
    /// Column name, in the case it was written.
    pub name: String,
    /// Lower-case MySQL-style type rendering, e.g. `int`, `varchar(10)`.
    pub sql_type: String,
    /// Explicit or server-default charset; `None` for non-character columns.
    pub charset: Option<String>,
    /// Whether the column accepts NULL.
    pub nullable: bool,
}

/// One index over a table's columns.
#[derive(Debug, Clone)]
pub struct IndexSchema {
    /// Index name (`PRIMARY` for the primary key).
    pub name: String,
    /// Indexed columns, in index order.
    pub columns: Vec<String>,
    /// Whether the index enforces uniqueness.
    pub unique: bool,
    /// Whether this is the primary key.
    pub primary: bool,
}

impl TableSchema {
    /// Creates an empty table schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Looks up a column by name. Column names compare case-insensitively.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns
            .iter()
            .find(|column| column.name.eq_ignore_ascii_case(name))
    }

    /// Ordinal position of a column, if present.
    #[must_use]
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.name.eq_ignore_ascii_case(name))
    }

    /// Position of an index by name, if present.
    #[must_use]
    pub fn index_position(&self, name: &str) -> Option<usize> {
        self.indexes
            .iter()
            .position(|index| index.name.eq_ignore_ascii_case(name))
    }

    /// `COLUMN_KEY` marker for one column.
    ///
    /// `PRI` for primary-key columns, otherwise `UNI` for the first column of
    /// a unique index, otherwise `MUL` for the first column of any other
    /// index, otherwise empty.
    #[must_use]
    pub fn key_marker(&self, column: &str) -> &'static str {
        let in_primary = self.indexes.iter().any(|index| {
            index.primary
                && index
                    .columns
                    .iter()
                    .any(|c| c.eq_ignore_ascii_case(column))
        });
        if in_primary {
            return "PRI";
        }
        let leads = |unique: bool| {
            self.indexes.iter().any(|index| {
                !index.primary
                    && index.unique == unique
                    && index
                        .columns
                        .first()
                        .is_some_and(|c| c.eq_ignore_ascii_case(column))
            })
        };
        if leads(true) {
            return "UNI";
        }
        if leads(false) {
            return "MUL";
        }
        ""
    }

    /// Introspects this table into a [`TableDef`].
    #[must_use]
    pub fn table_def(&self) -> TableDef {
        TableDef {
            name: self.name.clone(),
            columns: self
                .columns
                .iter()
                .map(|column| ColumnDef {
                    name: column.name.clone(),
                    column_type: column.sql_type.clone(),
                    key: self.key_marker(&column.name).to_owned(),
                    charset: column.charset.clone().unwrap_or_default(),
                    nullable: column.nullable,
                })
                .collect(),
        }
    }
}

/// Introspected table definition, one entry per column in ordinal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    /// Stored table name.
    pub name: String,
    /// Columns in ordinal order; never empty for an existing table.
    pub columns: Vec<ColumnDef>,
}

/// Introspected column shape, matching what `information_schema.columns`
/// reports for the same table on a live server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Lower-case MySQL-style column type.
    pub column_type: String,
    /// `PRI`, `UNI`, `MUL`, or empty.
    pub key: String,
    /// Character set, empty for non-character columns.
    pub charset: String,
    /// Whether the column accepts NULL.
    pub nullable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_indexes(indexes: Vec<IndexSchema>) -> TableSchema {
        TableSchema {
            name: "t".to_owned(),
            columns: vec![
                ColumnSchema {
                    name: "a".to_owned(),
                    sql_type: "int".to_owned(),
                    charset: None,
                    nullable: true,
                },
                ColumnSchema {
                    name: "b".to_owned(),
                    sql_type: "int".to_owned(),
                    charset: None,
                    nullable: true,
                },
            ],
            indexes,
        }
    }

    #[test]
    fn key_marker_prefers_primary() {
        let table = table_with_indexes(vec![
            IndexSchema {
                name: "PRIMARY".to_owned(),
                columns: vec!["a".to_owned()],
                unique: true,
                primary: true,
            },
            IndexSchema {
                name: "a".to_owned(),
                columns: vec!["a".to_owned()],
                unique: true,
                primary: false,
            },
        ]);
        assert_eq!(table.key_marker("a"), "PRI");
        assert_eq!(table.key_marker("b"), "");
    }

    #[test]
    fn key_marker_unique_beats_plain_index() {
        let table = table_with_indexes(vec![
            IndexSchema {
                name: "idx_b".to_owned(),
                columns: vec!["b".to_owned(), "a".to_owned()],
                unique: false,
                primary: false,
            },
            IndexSchema {
                name: "uniq_b".to_owned(),
                columns: vec!["b".to_owned()],
                unique: true,
                primary: false,
            },
        ]);
        assert_eq!(table.key_marker("b"), "UNI");
        // Second column of a non-unique index carries no marker.
        assert_eq!(table.key_marker("a"), "");
    }

    #[test]
    fn key_marker_multiple_for_nonunique_lead_column() {
        let table = table_with_indexes(vec![IndexSchema {
            name: "idx_a".to_owned(),
            columns: vec!["a".to_owned()],
            unique: false,
            primary: false,
        }]);
        assert_eq!(table.key_marker("a"), "MUL");
    }

    #[test]
    fn column_lookup_is_case_insensitive() {
        let table = table_with_indexes(Vec::new());
        assert!(table.column("A").is_some());
        assert_eq!(table.column_position("B"), Some(1));
    }
}
