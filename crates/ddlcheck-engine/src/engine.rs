//! The schema engine.
//!
//! Parses statements with the same SQL oracle the harness uses and applies
//! them to the in-memory catalog. Only schema-affecting statements mutate the
//! catalog; session statements (`USE`, `SET`) touch session state at most.

use std::collections::HashMap;

use sqlparser::ast::{
    AlterTableOperation, ColumnDef as AstColumnDef, ColumnOption, CreateIndex, CreateTable,
    DataType, Expr, MySQLColumnPosition, ObjectName, ObjectNamePart, ObjectType, RenameTable,
    SchemaName, Statement, TableConstraint, Use,
};
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;
use tracing::debug;

use crate::catalog::{ColumnSchema, DatabaseSchema, IndexSchema, TableDef, TableSchema};
use crate::config::Config;
use crate::error::{EngineError, Result};

/// In-memory DDL engine with MySQL-flavored semantics.
///
/// One `Engine` models one server session: a catalog of databases plus the
/// session's current database.
pub struct Engine {
    config: Config,
    databases: HashMap<String, DatabaseSchema>,
    current_database: Option<String>,
}

impl Engine {
    /// Creates an empty engine.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            databases: HashMap::new(),
            current_database: None,
        }
    }

    /// Parses and applies one statement string.
    ///
    /// The text may hold several `;`-separated statements; they are applied
    /// in order and the first failure stops the rest.
    pub fn exec(&mut self, sql: &str) -> Result<()> {
        let statements = Parser::parse_sql(&MySqlDialect {}, sql)?;
        for statement in &statements {
            self.apply(statement)?;
        }
        Ok(())
    }

    /// Session-scoped current database, if one was selected with `USE`.
    #[must_use]
    pub fn current_database(&self) -> Option<&str> {
        self.current_database.as_deref()
    }

    /// Full introspected definition of one table.
    pub fn table_def(&self, database: &str, table: &str) -> Result<TableDef> {
        let db_key = self.fold(database);
        let table_key = self.fold(table);
        let db = self
            .databases
            .get(&db_key)
            .ok_or_else(|| EngineError::UnknownDatabase(db_key.clone()))?;
        let table = db
            .tables
            .get(&table_key)
            .ok_or_else(|| EngineError::TableNotFound(db_key.clone(), table_key.clone()))?;
        Ok(table.table_def())
    }

    fn apply(&mut self, statement: &Statement) -> Result<()> {
        match statement {
            Statement::CreateDatabase {
                db_name,
                if_not_exists,
                ..
            } => self.create_database(&object_name_string(db_name), *if_not_exists),
            // MySQL treats CREATE SCHEMA as a synonym for CREATE DATABASE.
            Statement::CreateSchema {
                schema_name,
                if_not_exists,
                ..
            } => match schema_name {
                SchemaName::Simple(name) => {
                    self.create_database(&object_name_string(name), *if_not_exists)
                }
                other => Err(EngineError::Unsupported(other.to_string())),
            },
            Statement::CreateTable(create) => self.create_table(create),
            Statement::CreateIndex(create) => self.create_index(create),
            Statement::AlterTable {
                name, operations, ..
            } => self.alter_table(name, operations),
            Statement::RenameTable(renames) => self.rename_tables(renames),
            Statement::Drop {
                object_type,
                if_exists,
                names,
                ..
            } => match object_type {
                ObjectType::Database | ObjectType::Schema => {
                    self.drop_databases(names, *if_exists)
                }
                ObjectType::Table => self.drop_tables(names, *if_exists),
                ObjectType::Index => self.drop_indexes(names),
                other => Err(EngineError::Unsupported(format!("DROP {other}"))),
            },
            Statement::Use(target) => self.use_database(target),
            // Session statements are accepted but have no catalog effect.
            Statement::SetVariable { .. }
            | Statement::SetNames { .. }
            | Statement::SetNamesDefault { .. }
            | Statement::SetTimeZone { .. } => Ok(()),
            other => Err(EngineError::Unsupported(other.to_string())),
        }
    }

    fn create_database(&mut self, name: &str, if_not_exists: bool) -> Result<()> {
        let key = self.fold(name);
        if self.databases.contains_key(&key) {
            if if_not_exists {
                return Ok(());
            }
            return Err(EngineError::DatabaseExists(key));
        }
        debug!(database = %key, "create database");
        self.databases.insert(key, DatabaseSchema::default());
        Ok(())
    }

    fn drop_databases(&mut self, names: &[ObjectName], if_exists: bool) -> Result<()> {
        for name in names {
            let key = self.fold(&object_name_string(name));
            if self.databases.remove(&key).is_none() {
                if if_exists {
                    continue;
                }
                return Err(EngineError::DropDatabaseNotFound(key));
            }
            debug!(database = %key, "drop database");
            if self.current_database.as_deref() == Some(key.as_str()) {
                self.current_database = None;
            }
        }
        Ok(())
    }

    fn use_database(&mut self, target: &Use) -> Result<()> {
        let name = match target {
            Use::Object(name) | Use::Database(name) | Use::Schema(name) => {
                object_name_string(name)
            }
            other => return Err(EngineError::Unsupported(other.to_string())),
        };
        let key = self.fold(&name);
        if !self.databases.contains_key(&key) {
            return Err(EngineError::UnknownDatabase(key));
        }
        self.current_database = Some(key);
        Ok(())
    }

    fn create_table(&mut self, create: &CreateTable) -> Result<()> {
        let (qualifier, table_name) = split_table_name(&create.name);
        let database = self.resolve_database(qualifier)?;
        let table_key = self.fold(&table_name);
        {
            let db = self
                .databases
                .get(&database)
                .ok_or_else(|| EngineError::UnknownDatabase(database.clone()))?;
            if db.tables.contains_key(&table_key) {
                if create.if_not_exists {
                    return Ok(());
                }
                return Err(EngineError::TableExists(table_key));
            }
        }

        let mut table = TableSchema::new(table_key.clone());
        for column in &create.columns {
            let (schema, is_primary, is_unique) = column_from_ast(&self.config, column);
            if table.column(&schema.name).is_some() {
                return Err(EngineError::DuplicateColumn(schema.name));
            }
            let column_name = schema.name.clone();
            table.columns.push(schema);
            if is_primary {
                add_primary_index(&mut table, vec![column_name])?;
            } else if is_unique {
                add_index(&mut table, None, vec![column_name], true)?;
            }
        }
        for constraint in &create.constraints {
            add_constraint(&mut table, constraint)?;
        }

        debug!(database = %database, table = %table_key, "create table");
        if let Some(db) = self.databases.get_mut(&database) {
            db.tables.insert(table_key, table);
        }
        Ok(())
    }

    fn create_index(&mut self, create: &CreateIndex) -> Result<()> {
        let (qualifier, table_name) = split_table_name(&create.table_name);
        let database = self.resolve_database(qualifier)?;
        let table_key = self.fold(&table_name);
        let index_name = create
            .name
            .as_ref()
            .and_then(|name| name_parts(name).pop());
        let columns: Vec<String> = create
            .columns
            .iter()
            .map(|column| index_expr_name(&column.expr))
            .collect();

        let unique = create.unique;
        let table = self.table_mut(&database, &table_key)?;
        check_index_columns(table, &columns)?;
        add_index(table, index_name, columns, unique)
    }

    fn drop_tables(&mut self, names: &[ObjectName], if_exists: bool) -> Result<()> {
        // MySQL drops every table it can and reports the rest in one error.
        let mut missing = Vec::new();
        for name in names {
            let (qualifier, table_name) = split_table_name(name);
            let database = self.resolve_database(qualifier)?;
            let table_key = self.fold(&table_name);
            let dropped = self
                .databases
                .get_mut(&database)
                .and_then(|db| db.tables.remove(&table_key))
                .is_some();
            if dropped {
                debug!(database = %database, table = %table_key, "drop table");
            } else {
                missing.push(format!("{database}.{table_key}"));
            }
        }
        if !missing.is_empty() && !if_exists {
            return Err(EngineError::UnknownTable(missing.join(",")));
        }
        Ok(())
    }

    fn drop_indexes(&mut self, names: &[ObjectName]) -> Result<()> {
        for name in names {
            let mut parts = name_parts(name);
            let index_name = parts.pop().unwrap_or_default();
            let Some(table_name) = parts.pop() else {
                return Err(EngineError::Unsupported(
                    "DROP INDEX without a table-qualified index name".to_owned(),
                ));
            };
            let database = self.resolve_database(parts.pop())?;
            let table_key = self.fold(&table_name);
            let table = self.table_mut(&database, &table_key)?;
            let Some(position) = table.index_position(&index_name) else {
                return Err(EngineError::UnknownColumnOrKey(index_name));
            };
            table.indexes.remove(position);
        }
        Ok(())
    }

    fn rename_tables(&mut self, renames: &[RenameTable]) -> Result<()> {
        for rename in renames {
            let (old_qualifier, old_name) = split_table_name(&rename.old_name);
            let from_db = self.resolve_database(old_qualifier)?;
            let from_table = self.fold(&old_name);
            let (new_qualifier, new_name) = split_table_name(&rename.new_name);
            let to_db = self.resolve_database(new_qualifier)?;
            let to_table = self.fold(&new_name);
            self.move_table(&from_db, &from_table, &to_db, &to_table)?;
        }
        Ok(())
    }

    fn alter_table(&mut self, name: &ObjectName, operations: &[AlterTableOperation]) -> Result<()> {
        let (qualifier, table_name) = split_table_name(name);
        let mut database = self.resolve_database(qualifier)?;
        let mut table_key = self.fold(&table_name);
        self.table_mut(&database, &table_key)?;

        let snapshot = (self.config.need_atomic && operations.len() > 1)
            .then(|| self.databases.clone());
        for operation in operations {
            match self.apply_alter(&database, &table_key, operation) {
                Ok(Some((new_database, new_table))) => {
                    database = new_database;
                    table_key = new_table;
                }
                Ok(None) => {}
                Err(err) => {
                    if let Some(snapshot) = snapshot {
                        self.databases = snapshot;
                    }
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Applies one ALTER TABLE operation. Returns the table's new location
    /// when the operation renamed it.
    fn apply_alter(
        &mut self,
        database: &str,
        table_key: &str,
        operation: &AlterTableOperation,
    ) -> Result<Option<(String, String)>> {
        match operation {
            AlterTableOperation::AddColumn {
                column_def,
                if_not_exists,
                column_position,
                ..
            } => {
                let (schema, is_primary, is_unique) = column_from_ast(&self.config, column_def);
                let table = self.table_mut(database, table_key)?;
                if table.column(&schema.name).is_some() {
                    if *if_not_exists {
                        return Ok(None);
                    }
                    return Err(EngineError::DuplicateColumn(schema.name));
                }
                let column_name = schema.name.clone();
                insert_column(table, schema, column_position.as_ref())?;
                if is_primary {
                    add_primary_index(table, vec![column_name])?;
                } else if is_unique {
                    add_index(table, None, vec![column_name], true)?;
                }
                Ok(None)
            }
            AlterTableOperation::DropColumn {
                column_name,
                if_exists,
                ..
            } => {
                let table = self.table_mut(database, table_key)?;
                let Some(position) = table.column_position(&column_name.value) else {
                    if *if_exists {
                        return Ok(None);
                    }
                    return Err(EngineError::UnknownColumnOrKey(column_name.value.clone()));
                };
                table.columns.remove(position);
                prune_column_from_indexes(table, &column_name.value);
                Ok(None)
            }
            AlterTableOperation::RenameColumn {
                old_column_name,
                new_column_name,
                ..
            } => {
                let table = self.table_mut(database, table_key)?;
                rename_column(table, &old_column_name.value, &new_column_name.value)?;
                Ok(None)
            }
            AlterTableOperation::ModifyColumn {
                col_name,
                data_type,
                options,
                column_position,
                ..
            } => self.modify_column(
                database,
                table_key,
                &col_name.value,
                &col_name.value,
                data_type,
                options,
                column_position.as_ref(),
            ),
            AlterTableOperation::ChangeColumn {
                old_name,
                new_name,
                data_type,
                options,
                column_position,
                ..
            } => self.modify_column(
                database,
                table_key,
                &old_name.value,
                &new_name.value,
                data_type,
                options,
                column_position.as_ref(),
            ),
            AlterTableOperation::RenameTable { table_name, .. } => {
                let (qualifier, new_name) = split_table_name(table_name);
                let to_db = match qualifier {
                    Some(db) => self.fold(&db),
                    None => database.to_owned(),
                };
                let to_table = self.fold(&new_name);
                self.move_table(database, table_key, &to_db, &to_table)?;
                Ok(Some((to_db, to_table)))
            }
            AlterTableOperation::AddConstraint(constraint) => {
                let table = self.table_mut(database, table_key)?;
                add_constraint(table, constraint)?;
                Ok(None)
            }
            AlterTableOperation::DropConstraint { name, .. } => {
                let table = self.table_mut(database, table_key)?;
                let Some(position) = table.index_position(&name.value) else {
                    return Err(EngineError::UnknownColumnOrKey(name.value.clone()));
                };
                table.indexes.remove(position);
                Ok(None)
            }
            AlterTableOperation::DropPrimaryKey { .. } => {
                let table = self.table_mut(database, table_key)?;
                let Some(position) = table.indexes.iter().position(|index| index.primary) else {
                    return Err(EngineError::UnknownColumnOrKey("PRIMARY".to_owned()));
                };
                table.indexes.remove(position);
                Ok(None)
            }
            other => Err(EngineError::Unsupported(other.to_string())),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn modify_column(
        &mut self,
        database: &str,
        table_key: &str,
        old_name: &str,
        new_name: &str,
        data_type: &DataType,
        options: &[ColumnOption],
        position: Option<&MySQLColumnPosition>,
    ) -> Result<Option<(String, String)>> {
        let sql_type = normalize_type(&data_type.to_string());
        let mut nullable = true;
        let mut is_primary = false;
        let mut is_unique = false;
        let mut charset = None;
        for option in options {
            match option {
                ColumnOption::NotNull => nullable = false,
                ColumnOption::Null => nullable = true,
                ColumnOption::Unique {
                    is_primary: primary,
                    ..
                } => {
                    if *primary {
                        is_primary = true;
                    } else {
                        is_unique = true;
                    }
                }
                ColumnOption::CharacterSet(name) => charset = Some(object_name_string(name)),
                _ => {}
            }
        }
        let charset = column_charset(&self.config, &sql_type, charset);
        if is_primary {
            nullable = false;
        }

        let table = self.table_mut(database, table_key)?;
        if table.column_position(old_name).is_none() {
            return Err(EngineError::UnknownColumn(old_name.to_owned()));
        }
        if !old_name.eq_ignore_ascii_case(new_name) {
            rename_column(table, old_name, new_name)?;
        }
        let Some(index) = table.column_position(new_name) else {
            return Err(EngineError::UnknownColumn(new_name.to_owned()));
        };
        {
            let column = &mut table.columns[index];
            column.sql_type = sql_type;
            column.charset = charset;
            column.nullable = nullable;
        }
        if position.is_some() {
            let column = table.columns.remove(index);
            insert_column(table, column, position)?;
        }
        if is_primary {
            let covered = table.indexes.iter().any(|idx| {
                idx.primary && idx.columns.iter().any(|c| c.eq_ignore_ascii_case(new_name))
            });
            if !covered {
                add_primary_index(table, vec![new_name.to_owned()])?;
            }
        } else if is_unique {
            add_index(table, None, vec![new_name.to_owned()], true)?;
        }
        Ok(None)
    }

    fn move_table(
        &mut self,
        from_db: &str,
        from_table: &str,
        to_db: &str,
        to_table: &str,
    ) -> Result<()> {
        if !self
            .databases
            .get(from_db)
            .is_some_and(|db| db.tables.contains_key(from_table))
        {
            return Err(EngineError::TableNotFound(
                from_db.to_owned(),
                from_table.to_owned(),
            ));
        }
        if !self.databases.contains_key(to_db) {
            return Err(EngineError::UnknownDatabase(to_db.to_owned()));
        }
        if self
            .databases
            .get(to_db)
            .is_some_and(|db| db.tables.contains_key(to_table))
        {
            return Err(EngineError::TableExists(to_table.to_owned()));
        }
        let table = self
            .databases
            .get_mut(from_db)
            .and_then(|db| db.tables.remove(from_table));
        if let Some(mut table) = table {
            table.name = to_table.to_owned();
            if let Some(db) = self.databases.get_mut(to_db) {
                debug!(
                    from = %format!("{from_db}.{from_table}"),
                    to = %format!("{to_db}.{to_table}"),
                    "rename table"
                );
                db.tables.insert(to_table.to_owned(), table);
            }
        }
        Ok(())
    }

    fn table_mut(&mut self, database: &str, table: &str) -> Result<&mut TableSchema> {
        let db = self
            .databases
            .get_mut(database)
            .ok_or_else(|| EngineError::UnknownDatabase(database.to_owned()))?;
        db.tables
            .get_mut(table)
            .ok_or_else(|| EngineError::TableNotFound(database.to_owned(), table.to_owned()))
    }

    fn resolve_database(&self, qualifier: Option<String>) -> Result<String> {
        match qualifier {
            Some(database) => Ok(self.fold(&database)),
            None => self
                .current_database
                .clone()
                .ok_or(EngineError::NoDatabaseSelected),
        }
    }

    fn fold(&self, name: &str) -> String {
        if self.config.lower_case_table_names {
            name.to_ascii_lowercase()
        } else {
            name.to_owned()
        }
    }
}

fn name_parts(name: &ObjectName) -> Vec<String> {
    name.0
        .iter()
        .map(|part| match part {
            ObjectNamePart::Identifier(ident) => ident.value.clone(),
        })
        .collect()
}

fn object_name_string(name: &ObjectName) -> String {
    name_parts(name).join(".")
}

/// Splits an object name into an optional schema qualifier and the bare name.
fn split_table_name(name: &ObjectName) -> (Option<String>, String) {
    let mut parts = name_parts(name);
    let table = parts.pop().unwrap_or_default();
    (parts.pop(), table)
}

fn index_expr_name(expr: &Expr) -> String {
    match expr {
        Expr::Identifier(ident) => ident.value.clone(),
        Expr::CompoundIdentifier(idents) => match idents.last() {
            Some(ident) => ident.value.clone(),
            None => expr.to_string(),
        },
        other => other.to_string(),
    }
}

fn ident_names(idents: &[sqlparser::ast::Ident]) -> Vec<String> {
    idents.iter().map(|ident| ident.value.clone()).collect()
}

/// Builds a catalog column from an AST column definition.
///
/// Returns the column plus whether its options declared it PRIMARY KEY or
/// UNIQUE.
fn column_from_ast(config: &Config, column: &AstColumnDef) -> (ColumnSchema, bool, bool) {
    let sql_type = normalize_type(&column.data_type.to_string());
    let mut nullable = true;
    let mut is_primary = false;
    let mut is_unique = false;
    let mut charset = None;
    for option in &column.options {
        match &option.option {
            ColumnOption::NotNull => nullable = false,
            ColumnOption::Null => nullable = true,
            ColumnOption::Unique { is_primary: primary, .. } => {
                if *primary {
                    is_primary = true;
                } else {
                    is_unique = true;
                }
            }
            ColumnOption::CharacterSet(name) => charset = Some(object_name_string(name)),
            _ => {}
        }
    }
    if is_primary {
        nullable = false;
    }
    let charset = column_charset(config, &sql_type, charset);
    (
        ColumnSchema {
            name: column.name.value.clone(),
            sql_type,
            charset,
            nullable,
        },
        is_primary,
        is_unique,
    )
}

/// Explicit charset wins, then the server default; non-character columns
/// never carry one.
fn column_charset(config: &Config, sql_type: &str, explicit: Option<String>) -> Option<String> {
    if !is_character_type(sql_type) {
        return None;
    }
    explicit.or_else(|| {
        if config.charset_server.is_empty() {
            None
        } else {
            Some(config.charset_server.clone())
        }
    })
}

/// MySQL reports a handful of type aliases under their canonical names.
fn normalize_type(rendered: &str) -> String {
    let rendered = rendered.to_lowercase();
    if let Some(rest) = rendered.strip_prefix("integer") {
        return format!("int{rest}");
    }
    if rendered == "bool" || rendered == "boolean" {
        return "tinyint(1)".to_owned();
    }
    if let Some(rest) = rendered.strip_prefix("double precision") {
        return format!("double{rest}");
    }
    rendered
}

fn is_character_type(sql_type: &str) -> bool {
    [
        "char", "varchar", "nchar", "nvarchar", "tinytext", "text", "mediumtext", "longtext",
        "enum", "set",
    ]
    .iter()
    .any(|prefix| sql_type.starts_with(prefix))
}

fn check_index_columns(table: &TableSchema, columns: &[String]) -> Result<()> {
    for column in columns {
        if table.column(column).is_none() {
            return Err(EngineError::UnknownColumn(column.clone()));
        }
    }
    Ok(())
}

fn add_constraint(table: &mut TableSchema, constraint: &TableConstraint) -> Result<()> {
    match constraint {
        TableConstraint::PrimaryKey { columns, .. } => {
            let columns = ident_names(columns);
            check_index_columns(table, &columns)?;
            add_primary_index(table, columns)
        }
        TableConstraint::Unique {
            name,
            index_name,
            columns,
            ..
        } => {
            let columns = ident_names(columns);
            check_index_columns(table, &columns)?;
            let index_name = index_name
                .as_ref()
                .or(name.as_ref())
                .map(|ident| ident.value.clone());
            add_index(table, index_name, columns, true)
        }
        TableConstraint::Index { name, columns, .. } => {
            let columns = ident_names(columns);
            check_index_columns(table, &columns)?;
            add_index(
                table,
                name.as_ref().map(|ident| ident.value.clone()),
                columns,
                false,
            )
        }
        // MySQL backs a foreign key with an index on the referencing columns.
        TableConstraint::ForeignKey { name, columns, .. } => {
            let columns = ident_names(columns);
            check_index_columns(table, &columns)?;
            add_index(
                table,
                name.as_ref().map(|ident| ident.value.clone()),
                columns,
                false,
            )
        }
        _ => Ok(()),
    }
}

fn add_primary_index(table: &mut TableSchema, columns: Vec<String>) -> Result<()> {
    if table.indexes.iter().any(|index| index.primary) {
        return Err(EngineError::MultiplePrimaryKey);
    }
    // Primary-key columns are implicitly NOT NULL.
    for name in &columns {
        if let Some(position) = table.column_position(name) {
            table.columns[position].nullable = false;
        }
    }
    table.indexes.push(IndexSchema {
        name: "PRIMARY".to_owned(),
        columns,
        unique: true,
        primary: true,
    });
    Ok(())
}

fn add_index(
    table: &mut TableSchema,
    name: Option<String>,
    columns: Vec<String>,
    unique: bool,
) -> Result<()> {
    let name = match name {
        Some(name) => {
            if table.index_position(&name).is_some() {
                return Err(EngineError::DuplicateKey(name));
            }
            name
        }
        None => auto_index_name(table, columns.first().map_or("", String::as_str)),
    };
    table.indexes.push(IndexSchema {
        name,
        columns,
        unique,
        primary: false,
    });
    Ok(())
}

/// MySQL auto-names indexes after their first column, suffixing `_2`, `_3`,
/// ... on collision.
fn auto_index_name(table: &TableSchema, first_column: &str) -> String {
    if table.index_position(first_column).is_none() {
        return first_column.to_owned();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{first_column}_{n}");
        if table.index_position(&candidate).is_none() {
            return candidate;
        }
        n += 1;
    }
}

fn insert_column(
    table: &mut TableSchema,
    column: ColumnSchema,
    position: Option<&MySQLColumnPosition>,
) -> Result<()> {
    match position {
        None => table.columns.push(column),
        Some(MySQLColumnPosition::First) => table.columns.insert(0, column),
        Some(MySQLColumnPosition::After(ident)) => {
            let Some(index) = table.column_position(&ident.value) else {
                return Err(EngineError::UnknownColumn(ident.value.clone()));
            };
            table.columns.insert(index + 1, column);
        }
    }
    Ok(())
}

fn rename_column(table: &mut TableSchema, old: &str, new: &str) -> Result<()> {
    if !old.eq_ignore_ascii_case(new) && table.column(new).is_some() {
        return Err(EngineError::DuplicateColumn(new.to_owned()));
    }
    let Some(position) = table.column_position(old) else {
        return Err(EngineError::UnknownColumn(old.to_owned()));
    };
    table.columns[position].name = new.to_owned();
    for index in &mut table.indexes {
        for column in &mut index.columns {
            if column.eq_ignore_ascii_case(old) {
                *column = new.to_owned();
            }
        }
    }
    Ok(())
}

fn prune_column_from_indexes(table: &mut TableSchema, column: &str) {
    for index in &mut table.indexes {
        index.columns.retain(|c| !c.eq_ignore_ascii_case(column));
    }
    table.indexes.retain(|index| !index.columns.is_empty());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        Engine::new(Config {
            charset_server: String::new(),
            lower_case_table_names: true,
            need_atomic: false,
        })
    }

    fn exec_all(engine: &mut Engine, statements: &[&str]) {
        for statement in statements {
            engine.exec(statement).unwrap();
        }
    }

    #[test]
    fn create_table_reports_columns_in_order() {
        let mut engine = engine();
        exec_all(
            &mut engine,
            &[
                "CREATE DATABASE d",
                "USE d",
                "CREATE TABLE t (id INT PRIMARY KEY, name VARCHAR(20) NOT NULL, note TEXT)",
            ],
        );
        let def = engine.table_def("d", "t").unwrap();
        assert_eq!(def.name, "t");
        let columns: Vec<&str> = def.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(columns, ["id", "name", "note"]);
        assert_eq!(def.columns[0].column_type, "int");
        assert_eq!(def.columns[0].key, "PRI");
        assert!(!def.columns[0].nullable);
        assert_eq!(def.columns[1].column_type, "varchar(20)");
        assert!(!def.columns[1].nullable);
        assert!(def.columns[2].nullable);
    }

    #[test]
    fn create_database_twice_fails_unless_if_not_exists() {
        let mut engine = engine();
        engine.exec("CREATE DATABASE d").unwrap();
        let err = engine.exec("CREATE DATABASE d").unwrap_err();
        assert!(matches!(err, EngineError::DatabaseExists(_)));
        engine.exec("CREATE DATABASE IF NOT EXISTS d").unwrap();
    }

    #[test]
    fn unqualified_table_requires_current_database() {
        let mut engine = engine();
        let err = engine.exec("CREATE TABLE t (a INT)").unwrap_err();
        assert!(matches!(err, EngineError::NoDatabaseSelected));
    }

    #[test]
    fn use_unknown_database_fails() {
        let mut engine = engine();
        let err = engine.exec("USE missing").unwrap_err();
        assert!(matches!(err, EngineError::UnknownDatabase(_)));
        assert_eq!(engine.current_database(), None);
    }

    #[test]
    fn names_fold_to_lower_case() {
        let mut engine = engine();
        exec_all(
            &mut engine,
            &["CREATE DATABASE D", "USE d", "CREATE TABLE Foo (a INT)"],
        );
        let def = engine.table_def("D", "FOO").unwrap();
        assert_eq!(def.name, "foo");
    }

    #[test]
    fn server_charset_applies_to_character_columns_only() {
        let mut engine = Engine::new(Config {
            charset_server: "utf8mb4".to_owned(),
            lower_case_table_names: true,
            need_atomic: false,
        });
        exec_all(
            &mut engine,
            &[
                "CREATE DATABASE d",
                "USE d",
                "CREATE TABLE t (a INT, b VARCHAR(10), c CHAR(4) CHARACTER SET latin1)",
            ],
        );
        let def = engine.table_def("d", "t").unwrap();
        assert_eq!(def.columns[0].charset, "");
        assert_eq!(def.columns[1].charset, "utf8mb4");
        assert_eq!(def.columns[2].charset, "latin1");
    }

    #[test]
    fn missing_table_is_not_an_empty_def() {
        let mut engine = engine();
        engine.exec("CREATE DATABASE d").unwrap();
        let err = engine.table_def("d", "missing").unwrap_err();
        assert!(matches!(err, EngineError::TableNotFound(_, _)));
        let err = engine.table_def("nope", "t").unwrap_err();
        assert!(matches!(err, EngineError::UnknownDatabase(_)));
    }

    #[test]
    fn create_index_sets_key_markers() {
        let mut engine = engine();
        exec_all(
            &mut engine,
            &[
                "CREATE DATABASE d",
                "USE d",
                "CREATE TABLE t (a INT, b INT)",
                "CREATE INDEX idx_a ON t (a)",
                "CREATE UNIQUE INDEX uq_b ON t (b)",
            ],
        );
        let def = engine.table_def("d", "t").unwrap();
        assert_eq!(def.columns[0].key, "MUL");
        assert_eq!(def.columns[1].key, "UNI");
    }

    #[test]
    fn drop_index_clears_marker() {
        let mut engine = engine();
        exec_all(
            &mut engine,
            &[
                "CREATE DATABASE d",
                "USE d",
                "CREATE TABLE t (a INT)",
                "CREATE INDEX idx_a ON t (a)",
                "DROP INDEX t.idx_a",
            ],
        );
        let def = engine.table_def("d", "t").unwrap();
        assert_eq!(def.columns[0].key, "");
    }

    #[test]
    fn create_index_on_unknown_column_fails() {
        let mut engine = engine();
        exec_all(
            &mut engine,
            &["CREATE DATABASE d", "USE d", "CREATE TABLE t (a INT)"],
        );
        let err = engine.exec("CREATE INDEX idx ON t (missing)").unwrap_err();
        assert!(matches!(err, EngineError::UnknownColumn(_)));
    }

    #[test]
    fn alter_add_and_drop_column() {
        let mut engine = engine();
        exec_all(
            &mut engine,
            &[
                "CREATE DATABASE d",
                "USE d",
                "CREATE TABLE t (a INT)",
                "ALTER TABLE t ADD COLUMN b VARCHAR(5) NOT NULL",
            ],
        );
        let def = engine.table_def("d", "t").unwrap();
        assert_eq!(def.columns.len(), 2);
        assert_eq!(def.columns[1].name, "b");
        assert!(!def.columns[1].nullable);

        engine.exec("ALTER TABLE t DROP COLUMN a").unwrap();
        let def = engine.table_def("d", "t").unwrap();
        assert_eq!(def.columns.len(), 1);
        assert_eq!(def.columns[0].name, "b");
    }

    #[test]
    fn alter_add_column_first_and_after() {
        let mut engine = engine();
        exec_all(
            &mut engine,
            &[
                "CREATE DATABASE d",
                "USE d",
                "CREATE TABLE t (a INT, b INT)",
                "ALTER TABLE t ADD COLUMN c INT FIRST",
                "ALTER TABLE t ADD COLUMN x INT AFTER a",
            ],
        );
        let def = engine.table_def("d", "t").unwrap();
        let columns: Vec<&str> = def.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(columns, ["c", "a", "x", "b"]);
    }

    #[test]
    fn drop_column_prunes_indexes() {
        let mut engine = engine();
        exec_all(
            &mut engine,
            &[
                "CREATE DATABASE d",
                "USE d",
                "CREATE TABLE t (a INT, b INT)",
                "CREATE INDEX idx ON t (a, b)",
                "ALTER TABLE t DROP COLUMN a",
            ],
        );
        let def = engine.table_def("d", "t").unwrap();
        // b leads the surviving index now.
        assert_eq!(def.columns[0].key, "MUL");
    }

    #[test]
    fn rename_column_follows_indexes() {
        let mut engine = engine();
        exec_all(
            &mut engine,
            &[
                "CREATE DATABASE d",
                "USE d",
                "CREATE TABLE t (a INT PRIMARY KEY)",
                "ALTER TABLE t RENAME COLUMN a TO id",
            ],
        );
        let def = engine.table_def("d", "t").unwrap();
        assert_eq!(def.columns[0].name, "id");
        assert_eq!(def.columns[0].key, "PRI");
    }

    #[test]
    fn modify_column_changes_type_and_nullability() {
        let mut engine = engine();
        exec_all(
            &mut engine,
            &[
                "CREATE DATABASE d",
                "USE d",
                "CREATE TABLE t (a INT)",
                "ALTER TABLE t MODIFY COLUMN a BIGINT NOT NULL",
            ],
        );
        let def = engine.table_def("d", "t").unwrap();
        assert_eq!(def.columns[0].column_type, "bigint");
        assert!(!def.columns[0].nullable);
    }

    #[test]
    fn change_column_renames_and_retypes() {
        let mut engine = engine();
        exec_all(
            &mut engine,
            &[
                "CREATE DATABASE d",
                "USE d",
                "CREATE TABLE t (a INT)",
                "ALTER TABLE t CHANGE COLUMN a b VARCHAR(8)",
            ],
        );
        let def = engine.table_def("d", "t").unwrap();
        assert_eq!(def.columns[0].name, "b");
        assert_eq!(def.columns[0].column_type, "varchar(8)");
    }

    #[test]
    fn alter_rename_moves_table() {
        let mut engine = engine();
        exec_all(
            &mut engine,
            &[
                "CREATE DATABASE d",
                "USE d",
                "CREATE TABLE t (a INT)",
                "ALTER TABLE t RENAME TO u",
            ],
        );
        assert!(engine.table_def("d", "t").is_err());
        let def = engine.table_def("d", "u").unwrap();
        assert_eq!(def.name, "u");
    }

    #[test]
    fn rename_table_across_databases() {
        let mut engine = engine();
        exec_all(
            &mut engine,
            &[
                "CREATE DATABASE a",
                "CREATE DATABASE b",
                "USE a",
                "CREATE TABLE t1 (x INT)",
                "RENAME TABLE a.t1 TO b.t2",
            ],
        );
        assert!(engine.table_def("a", "t1").is_err());
        let def = engine.table_def("b", "t2").unwrap();
        assert_eq!(def.name, "t2");
    }

    #[test]
    fn rename_table_to_existing_fails() {
        let mut engine = engine();
        exec_all(
            &mut engine,
            &[
                "CREATE DATABASE d",
                "USE d",
                "CREATE TABLE t1 (a INT)",
                "CREATE TABLE t2 (a INT)",
            ],
        );
        let err = engine.exec("RENAME TABLE t1 TO t2").unwrap_err();
        assert!(matches!(err, EngineError::TableExists(_)));
    }

    #[test]
    fn drop_table_lists_missing_tables() {
        let mut engine = engine();
        exec_all(
            &mut engine,
            &["CREATE DATABASE d", "USE d", "CREATE TABLE t (a INT)"],
        );
        let err = engine.exec("DROP TABLE t, missing").unwrap_err();
        assert_eq!(err.to_string(), "Unknown table 'd.missing'");
        // The existing table was still dropped, as MySQL does.
        assert!(engine.table_def("d", "t").is_err());
        engine.exec("DROP TABLE IF EXISTS missing").unwrap();
    }

    #[test]
    fn drop_database_clears_current_selection() {
        let mut engine = engine();
        exec_all(&mut engine, &["CREATE DATABASE d", "USE d"]);
        assert_eq!(engine.current_database(), Some("d"));
        engine.exec("DROP DATABASE d").unwrap();
        assert_eq!(engine.current_database(), None);
    }

    #[test]
    fn best_effort_alter_keeps_applied_operations() {
        let mut engine = engine();
        exec_all(
            &mut engine,
            &["CREATE DATABASE d", "USE d", "CREATE TABLE t (a INT)"],
        );
        let err = engine
            .exec("ALTER TABLE t ADD COLUMN b INT, DROP COLUMN missing")
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownColumnOrKey(_)));
        let def = engine.table_def("d", "t").unwrap();
        assert_eq!(def.columns.len(), 2);
    }

    #[test]
    fn atomic_alter_restores_previous_state() {
        let mut engine = Engine::new(Config {
            charset_server: String::new(),
            lower_case_table_names: true,
            need_atomic: true,
        });
        exec_all(
            &mut engine,
            &["CREATE DATABASE d", "USE d", "CREATE TABLE t (a INT)"],
        );
        engine
            .exec("ALTER TABLE t ADD COLUMN b INT, DROP COLUMN missing")
            .unwrap_err();
        let def = engine.table_def("d", "t").unwrap();
        assert_eq!(def.columns.len(), 1);
    }

    #[test]
    fn table_level_constraints_set_markers() {
        let mut engine = engine();
        exec_all(
            &mut engine,
            &[
                "CREATE DATABASE d",
                "USE d",
                "CREATE TABLE t (a INT, b INT, c INT, PRIMARY KEY (a), UNIQUE (b), KEY k (c))",
            ],
        );
        let def = engine.table_def("d", "t").unwrap();
        assert_eq!(def.columns[0].key, "PRI");
        assert!(!def.columns[0].nullable);
        assert_eq!(def.columns[1].key, "UNI");
        assert_eq!(def.columns[2].key, "MUL");
    }

    #[test]
    fn second_primary_key_is_rejected() {
        let mut engine = engine();
        exec_all(
            &mut engine,
            &["CREATE DATABASE d", "USE d", "CREATE TABLE t (a INT PRIMARY KEY, b INT)"],
        );
        let err = engine.exec("ALTER TABLE t ADD PRIMARY KEY (b)").unwrap_err();
        assert!(matches!(err, EngineError::MultiplePrimaryKey));
    }

    #[test]
    fn drop_primary_key_removes_marker() {
        let mut engine = engine();
        exec_all(
            &mut engine,
            &[
                "CREATE DATABASE d",
                "USE d",
                "CREATE TABLE t (a INT PRIMARY KEY)",
                "ALTER TABLE t DROP PRIMARY KEY",
            ],
        );
        let def = engine.table_def("d", "t").unwrap();
        assert_eq!(def.columns[0].key, "");
    }

    #[test]
    fn set_statements_are_accepted() {
        let mut engine = engine();
        engine.exec("SET sql_mode = 'STRICT_ALL_TABLES'").unwrap();
    }

    #[test]
    fn unsupported_statements_are_rejected() {
        let mut engine = engine();
        let err = engine.exec("SELECT 1").unwrap_err();
        assert!(matches!(err, EngineError::Unsupported(_)));
    }

    #[test]
    fn type_aliases_normalize() {
        let mut engine = engine();
        exec_all(
            &mut engine,
            &[
                "CREATE DATABASE d",
                "USE d",
                "CREATE TABLE t (a INTEGER, b BOOLEAN)",
            ],
        );
        let def = engine.table_def("d", "t").unwrap();
        assert_eq!(def.columns[0].column_type, "int");
        assert_eq!(def.columns[1].column_type, "tinyint(1)");
    }
}
