//! Importers that turn external schema sources into entities
//!
//! Both are best-effort: the SQL importer reads only `CREATE TABLE` statements,
//! the CSV importer reads only the header line.

use super::inference::FOREIGN_KEY_SUFFIX;
use super::{Column, Entity, IdGenerator, Position};
use serde::{Deserialize, Serialize};
use sqlparser::ast::{ColumnOption, CreateTable, Statement, TableConstraint};
use sqlparser::dialect::{Dialect, GenericDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect};
use sqlparser::parser::{Parser, ParserError};

/// Data type given to every CSV column
pub const CSV_DATA_TYPE: &str = "VARCHAR(255)";

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("SQL syntax error: {0}")]
    Sql(#[from] ParserError),

    #[error("CSV input is empty")]
    EmptyCsv,
}

/// SQL dialect used to parse import scripts
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    #[default]
    #[display("generic")]
    Generic,
    #[display("mysql")]
    MySQL,
    #[display("postgresql")]
    PostgreSQL,
    #[display("sqlite")]
    SQLite,
}

impl SqlDialect {
    /// Parse a dialect name, case-insensitive. `postgres` is accepted too.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "generic" => Some(SqlDialect::Generic),
            "mysql" => Some(SqlDialect::MySQL),
            "postgresql" | "postgres" => Some(SqlDialect::PostgreSQL),
            "sqlite" => Some(SqlDialect::SQLite),
            _ => None,
        }
    }

    fn parser_dialect(self) -> Box<dyn Dialect> {
        match self {
            SqlDialect::Generic => Box::new(GenericDialect {}),
            SqlDialect::MySQL => Box::new(MySqlDialect {}),
            SqlDialect::PostgreSQL => Box::new(PostgreSqlDialect {}),
            SqlDialect::SQLite => Box::new(SQLiteDialect {}),
        }
    }
}

/// Canvas slot of the `index`-th imported table
fn import_position(index: usize) -> Position {
    Position::new(
        100.0 + index as f64 * 350.0,
        100.0 + (index / 3) as f64 * 250.0,
    )
}

fn strip_quotes(name: &str) -> String {
    name.trim_matches('`')
        .trim_matches('"')
        .trim_matches('\'')
        .trim_matches('[')
        .trim_matches(']')
        .to_string()
}

fn has_foreign_key_suffix(name: &str) -> bool {
    name.to_lowercase().ends_with(FOREIGN_KEY_SUFFIX)
}

/// Parse a SQL script into entities, one per `CREATE TABLE` with columns.
///
/// Other statements are ignored. Tables without columns are skipped but still
/// take their canvas slot.
pub fn parse_sql_script(
    sql: &str,
    dialect: SqlDialect,
    ids: &mut impl IdGenerator,
) -> Result<Vec<Entity>, ImportError> {
    let parser_dialect = dialect.parser_dialect();
    let statements = Parser::parse_sql(parser_dialect.as_ref(), sql)?;

    let entities: Vec<Entity> = statements
        .iter()
        .filter_map(|statement| match statement {
            Statement::CreateTable(create_table) => Some(create_table),
            _ => None,
        })
        .enumerate()
        .filter_map(|(index, create_table)| entity_from_table(create_table, index, ids))
        .collect();

    tracing::info!(
        "Imported {} table(s) from {} SQL script",
        entities.len(),
        dialect
    );
    Ok(entities)
}

fn entity_from_table(
    create_table: &CreateTable,
    index: usize,
    ids: &mut impl IdGenerator,
) -> Option<Entity> {
    let table_name = strip_quotes(&create_table.name.to_string());
    if create_table.columns.is_empty() {
        tracing::debug!("Skipping table '{}' without columns", table_name);
        return None;
    }

    let mut pk_columns: Vec<String> = Vec::new();
    let mut fk_columns: Vec<String> = Vec::new();
    for constraint in &create_table.constraints {
        match constraint {
            TableConstraint::PrimaryKey(pk) => pk_columns.extend(
                pk.columns
                    .iter()
                    .map(|col| strip_quotes(&col.column.to_string()).to_lowercase()),
            ),
            TableConstraint::ForeignKey(fk) => fk_columns.extend(
                fk.columns
                    .iter()
                    .map(|col| strip_quotes(&col.value).to_lowercase()),
            ),
            _ => {}
        }
    }

    let token = ids.next_token();
    let columns = create_table
        .columns
        .iter()
        .enumerate()
        .map(|(i, col_def)| {
            let name = col_def.name.value.clone();
            let lower = name.to_lowercase();

            let is_primary_key = col_def
                .options
                .iter()
                .any(|opt| matches!(opt.option, ColumnOption::PrimaryKey(_)))
                || pk_columns.contains(&lower);
            let is_foreign_key = col_def
                .options
                .iter()
                .any(|opt| matches!(opt.option, ColumnOption::ForeignKey { .. }))
                || fk_columns.contains(&lower)
                || has_foreign_key_suffix(&name);

            Column {
                is_primary_key,
                is_foreign_key,
                ..Column::new(
                    format!("col-{token}-{i}"),
                    name,
                    col_def.data_type.to_string(),
                )
            }
        })
        .collect();

    Some(Entity {
        columns,
        position: import_position(index),
        ..Entity::new(format!("entity-{token}"), table_name)
    })
}

/// Build one entity from the header line of a CSV file.
///
/// Fewer than two non-blank lines (a header without data) yields no entity.
pub fn parse_csv(
    file_name: &str,
    text: &str,
    ids: &mut impl IdGenerator,
) -> Result<Vec<Entity>, ImportError> {
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    let Some(header) = lines.first() else {
        return Err(ImportError::EmptyCsv);
    };
    if lines.len() < 2 {
        tracing::debug!("CSV '{}' has a header but no rows, nothing imported", file_name);
        return Ok(Vec::new());
    }

    let token = ids.next_token();
    let columns = header
        .split(',')
        .map(|h| h.trim().replace('"', ""))
        .enumerate()
        .map(|(i, name)| {
            let is_foreign_key = has_foreign_key_suffix(&name);
            Column {
                is_primary_key: i == 0,
                is_foreign_key,
                ..Column::new(format!("col-{token}-{i}"), name, CSV_DATA_TYPE)
            }
        })
        .collect();

    let name = file_name.strip_suffix(".csv").unwrap_or(file_name);
    Ok(vec![Entity {
        columns,
        ..Entity::new(format!("entity-{token}"), name).with_position(100.0, 100.0)
    }])
}
