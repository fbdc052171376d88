//! CLI configuration from environment variables.
//!
//! Load configuration using `Config::from_env()` after calling `dotenvy::dotenv()`.
//! Unknown or missing values fall back to the defaults.

use super::import::SqlDialect;

pub const ID_STRATEGY_VAR: &str = "ERDFORGE_ID_STRATEGY";
pub const SQL_DIALECT_VAR: &str = "ERDFORGE_SQL_DIALECT";
pub const LOG_LEVEL_VAR: &str = "ERDFORGE_LOG_LEVEL";
pub const PRETTY_VAR: &str = "ERDFORGE_PRETTY";

/// How synthesized entities get their id tokens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::Display)]
pub enum IdStrategy {
    /// Random v4 UUIDs
    #[default]
    #[display("uuid")]
    Uuid,
    /// "1", "2", ... for reproducible output
    #[display("sequential")]
    Sequential,
}

impl IdStrategy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "uuid" => Some(IdStrategy::Uuid),
            "sequential" => Some(IdStrategy::Sequential),
            _ => None,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Id token source for synthesized entities
    pub id_strategy: IdStrategy,
    /// Dialect for `import-sql`
    pub sql_dialect: SqlDialect,
    /// Maximum tracing level
    pub log_level: tracing::Level,
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::default(),
            sql_dialect: SqlDialect::default(),
            log_level: tracing::Level::INFO,
            pretty: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` before this to load from `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            id_strategy: lookup(ID_STRATEGY_VAR)
                .and_then(|v| IdStrategy::from_name(&v))
                .unwrap_or(defaults.id_strategy),
            sql_dialect: lookup(SQL_DIALECT_VAR)
                .and_then(|v| SqlDialect::from_name(&v))
                .unwrap_or(defaults.sql_dialect),
            log_level: lookup(LOG_LEVEL_VAR)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.log_level),
            pretty: lookup(PRETTY_VAR)
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.pretty),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
