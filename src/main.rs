//! erdforge CLI - transform and analyze ER schema documents
//!
//! Usage:
//!   erdforge transform [schema.json]
//!   erdforge recommend [schema.json] [--json]
//!   erdforge relationships [schema.json]
//!   erdforge layout [schema.json] [--snap 20]
//!   erdforge edit [schema.json] --entity <id> --column <id> --op '<json>'
//!   erdforge import-sql [script.sql] [--dialect mysql]
//!   erdforge import-csv <file.csv>
//!
//! Documents are either a bare entity array or a project object. Input is
//! read from stdin when no path is given; output is JSON on stdout.

use clap::{Parser, Subcommand, ValueEnum};
use erdforge::core::auto_layout::{auto_layout, snap_to_grid};
use erdforge::core::config::{Config, IdStrategy};
use erdforge::core::{
    AppError, AppResult, ColumnEdit, IdGenerator, SchemaDocument, SequentialIds, SqlDialect,
    Transformer, UuidIds, analyze, apply_column_edit, infer_relationships, parse_csv,
    parse_sql_script,
};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "erdforge")]
#[command(about = "Transform ER schemas toward a star schema and suggest improvements")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a transformation pass and print {updatedEntities, newEntities}
    Transform {
        /// Schema document (stdin if omitted)
        file: Option<PathBuf>,
    },

    /// Print the recommendation report
    Recommend {
        /// Schema document (stdin if omitted)
        file: Option<PathBuf>,

        /// Print the structured report instead of text
        #[arg(long)]
        json: bool,
    },

    /// List inferred relationships
    Relationships {
        /// Schema document (stdin if omitted)
        file: Option<PathBuf>,
    },

    /// Arrange entities on a grid
    Layout {
        /// Schema document (stdin if omitted)
        file: Option<PathBuf>,

        /// Snap positions to a grid of this size
        #[arg(long)]
        snap: Option<f64>,
    },

    /// Apply one column edit and print the edited entity
    Edit {
        /// Schema document (stdin if omitted)
        file: Option<PathBuf>,

        /// Entity id
        #[arg(long)]
        entity: String,

        /// Column id
        #[arg(long)]
        column: String,

        /// Edit as JSON, e.g. '{"op":"rename","name":"customer_id"}'
        #[arg(long)]
        op: String,
    },

    /// Import CREATE TABLE statements as entities
    ImportSql {
        /// SQL script (stdin if omitted)
        file: Option<PathBuf>,

        /// SQL dialect (defaults to ERDFORGE_SQL_DIALECT)
        #[arg(short, long)]
        dialect: Option<DialectArg>,
    },

    /// Import a CSV header as an entity
    ImportCsv {
        /// Path to the .csv file
        file: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum DialectArg {
    Generic,
    Mysql,
    Postgresql,
    Sqlite,
}

impl From<DialectArg> for SqlDialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Generic => SqlDialect::Generic,
            DialectArg::Mysql => SqlDialect::MySQL,
            DialectArg::Postgresql => SqlDialect::PostgreSQL,
            DialectArg::Sqlite => SqlDialect::SQLite,
        }
    }
}

fn main() -> ExitCode {
    // Load .env file (if exists)
    let _ = dotenvy::dotenv();

    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        "Config loaded: ids={}, dialect={}, pretty={}",
        config.id_strategy,
        config.sql_dialect,
        config.pretty
    );

    let cli = Cli::parse();
    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, config: &Config) -> AppResult<()> {
    match command {
        Commands::Transform { file } => {
            let entities = read_document(file.as_deref())?.into_entities();
            let (outcome, report) =
                Transformer::new(id_source(config)).transform_with_report(&entities);
            if !report.dropped_columns.is_empty() {
                tracing::warn!(
                    "{} column(s) dropped during decomposition",
                    report.dropped_columns.len()
                );
            }
            write_json(&outcome, config.pretty)
        }
        Commands::Recommend { file, json } => {
            let document = read_document(file.as_deref())?;
            let report = analyze(document.entities());
            if json {
                write_json(&report, config.pretty)
            } else {
                println!("{}", report);
                Ok(())
            }
        }
        Commands::Relationships { file } => {
            let document = read_document(file.as_deref())?;
            write_json(&infer_relationships(document.entities()), config.pretty)
        }
        Commands::Layout { file, snap } => {
            let document = read_document(file.as_deref())?;
            let mut entities = auto_layout(document.entities());
            if let Some(grid) = snap.filter(|g| *g > 0.0) {
                for entity in &mut entities {
                    entity.position = snap_to_grid(entity.position, grid);
                }
            }
            write_json(&entities, config.pretty)
        }
        Commands::Edit {
            file,
            entity,
            column,
            op,
        } => {
            let document = read_document(file.as_deref())?;
            let edit: ColumnEdit = serde_json::from_str(&op)?;
            let target = document
                .entities()
                .iter()
                .find(|e| e.id == entity)
                .ok_or(AppError::EntityNotFound(entity))?;
            write_json(&apply_column_edit(target, &column, edit)?, config.pretty)
        }
        Commands::ImportSql { file, dialect } => {
            let sql = read_input(file.as_deref())?;
            let dialect = dialect.map(SqlDialect::from).unwrap_or(config.sql_dialect);
            let entities = parse_sql_script(&sql, dialect, &mut id_source(config))?;
            write_json(&entities, config.pretty)
        }
        Commands::ImportCsv { file } => {
            let text = std::fs::read_to_string(&file)?;
            let file_name = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let entities = parse_csv(&file_name, &text, &mut id_source(config))?;
            write_json(&entities, config.pretty)
        }
    }
}

fn id_source(config: &Config) -> Box<dyn IdGenerator> {
    match config.id_strategy {
        IdStrategy::Uuid => Box::new(UuidIds),
        IdStrategy::Sequential => Box::new(SequentialIds::new()),
    }
}

fn read_input(path: Option<&Path>) -> AppResult<String> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn read_document(path: Option<&Path>) -> AppResult<SchemaDocument> {
    let text = read_input(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn write_json<T: Serialize>(value: &T, pretty: bool) -> AppResult<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", text);
    Ok(())
}
