//! Core domain models and schema transformation logic

pub mod auto_layout;
pub mod classifier;
#[cfg(feature = "cli")]
pub mod config;
pub mod decomposer;
pub mod edit;
pub mod error;
mod ids;
pub mod import;
pub mod inference;
pub mod recommendations;
mod schema;
pub mod synthesizer;
#[cfg(test)]
mod tests;
pub mod transform;
pub mod validation;

pub use auto_layout::{LayoutConfig, LayoutResult, calculate_auto_layout, snap_to_grid};
pub use classifier::{Classification, TableRole, classify};
pub use decomposer::{Decomposition, decompose};
pub use edit::{ColumnEdit, EditError, apply_column_edit};
pub use error::{AppError, AppResult};
pub use ids::*;
pub use import::{ImportError, SqlDialect, parse_csv, parse_sql_script};
pub use inference::{infer_referent, infer_relationships, optimize_entity, relationship_graph};
pub use recommendations::{RecommendationReport, analyze, generate_recommendations};
pub use schema::*;
pub use synthesizer::{date_dimension, synthesize_missing_dimensions};
pub use transform::{TransformOutcome, TransformReport, Transformer, transform};
