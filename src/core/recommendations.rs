//! Recommendation report
//!
//! Rule-based analysis of a schema snapshot, rendered as the plain-text report
//! shown in the editor's recommendation panel.

use super::classifier::classify;
use super::decomposer::exceeds_threshold;
use super::inference::{foreign_key_stem, infer_referent};
use super::{Entity, RelationshipType};
use serde::Serialize;
use std::fmt;

pub const NO_RECOMMENDATIONS: &str =
    "No specific recommendations at this time. Your schema looks well-structured!";

/// Suggested link for a foreign-key column
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkHint {
    pub entity: String,
    pub column: String,
    /// Referenced entity name, or the bare stem when nothing resolves
    pub target: String,
    pub resolved: bool,
}

/// Column worth indexing
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IndexHint {
    pub entity: String,
    pub column: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationReport {
    pub links: Vec<LinkHint>,
    pub fact_tables: Vec<String>,
    pub dimension_tables: Vec<String>,
    pub oversized: Vec<String>,
    pub indexes: Vec<IndexHint>,
}

impl RecommendationReport {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
            && self.fact_tables.is_empty()
            && self.dimension_tables.is_empty()
            && self.oversized.is_empty()
            && self.indexes.is_empty()
    }
}

/// Analyze a schema snapshot. Uses the current key flags as-is.
pub fn analyze(entities: &[Entity]) -> RecommendationReport {
    let links = entities
        .iter()
        .flat_map(|entity| {
            entity
                .columns
                .iter()
                .filter(|c| c.is_foreign_key)
                .map(move |column| {
                    let referent = infer_referent(&column.name, entities);
                    LinkHint {
                        entity: entity.name.clone(),
                        column: column.name.clone(),
                        target: referent
                            .map(|r| r.name.clone())
                            .unwrap_or_else(|| foreign_key_stem(&column.name).to_string()),
                        resolved: referent.is_some(),
                    }
                })
        })
        .collect();

    let classification = classify(entities);
    let names = |list: Vec<&Entity>| -> Vec<String> {
        list.into_iter().map(|e| e.name.clone()).collect()
    };

    let indexes = entities
        .iter()
        .flat_map(|entity| {
            entity
                .columns
                .iter()
                .filter(|c| c.is_foreign_key || c.name.contains("date") || c.name.contains("time"))
                .map(move |column| IndexHint {
                    entity: entity.name.clone(),
                    column: column.name.clone(),
                })
        })
        .collect();

    RecommendationReport {
        links,
        fact_tables: names(classification.facts()),
        dimension_tables: names(classification.dimensions()),
        oversized: entities
            .iter()
            .filter(|e| exceeds_threshold(e))
            .map(|e| e.name.clone())
            .collect(),
        indexes,
    }
}

/// Render the report as text
pub fn generate_recommendations(entities: &[Entity]) -> String {
    analyze(entities).to_string()
}

impl fmt::Display for RecommendationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "{}", NO_RECOMMENDATIONS);
        }

        let mut lines: Vec<String> = Vec::new();

        if !self.links.is_empty() {
            lines.push("🔗 RELATIONSHIP RECOMMENDATIONS:".into());
            for link in &self.links {
                lines.push(format!(
                    "• Link {}.{} to {}.id ({})",
                    link.entity,
                    link.column,
                    link.target,
                    RelationshipType::OneToMany.label()
                ));
            }
            lines.push(String::new());
        }

        if !self.fact_tables.is_empty() || !self.dimension_tables.is_empty() {
            lines.push("📊 DIMENSIONAL MODELING SUGGESTIONS:".into());
            if !self.fact_tables.is_empty() {
                lines.push("FACT TABLES (contain metrics and foreign keys):".into());
                for name in &self.fact_tables {
                    lines.push(format!(
                        "• {} - Consider adding measures like quantities, amounts, or counts",
                        name
                    ));
                }
                lines.push(String::new());
            }
            if !self.dimension_tables.is_empty() {
                lines.push("DIMENSION TABLES (contain descriptive attributes):".into());
                for name in &self.dimension_tables {
                    lines.push(format!(
                        "• {} - Good candidate for dimension with descriptive attributes",
                        name
                    ));
                }
                lines.push(String::new());
            }
        }

        if !self.oversized.is_empty() {
            lines.push("🔧 NORMALIZATION RECOMMENDATIONS:".into());
            for name in &self.oversized {
                lines.push(format!(
                    "• Consider breaking down {} into smaller, more focused entities",
                    name
                ));
                lines.push("  - Separate core attributes from optional/descriptive ones".into());
                lines.push("  - Group related columns into separate entities".into());
            }
            lines.push(String::new());
        }

        if !self.indexes.is_empty() {
            lines.push("⚡ PERFORMANCE RECOMMENDATIONS:".into());
            lines.push(
                "Consider adding indexes on these columns for better query performance:".into(),
            );
            for hint in &self.indexes {
                lines.push(format!("• {}.{}", hint.entity, hint.column));
            }
        }

        write!(f, "{}", lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Column;

    #[test]
    fn test_empty_schema() {
        assert_eq!(generate_recommendations(&[]), NO_RECOMMENDATIONS);

        let plain = Entity::new("n", "Notes").add_column(Column::new("a", "body", "TEXT"));
        assert_eq!(generate_recommendations(&[plain]), NO_RECOMMENDATIONS);
    }

    #[test]
    fn test_link_targets() {
        let entities = vec![
            Entity::new("cust", "Customer Account")
                .add_column(Column::new("c1", "id", "INTEGER").primary_key()),
            Entity::new("o", "Order")
                .add_column(Column::new("o1", "customer_account_id", "INTEGER").foreign_key())
                .add_column(Column::new("o2", "coupon_id", "INTEGER").foreign_key()),
        ];

        let report = analyze(&entities);

        assert_eq!(report.links.len(), 2);
        assert_eq!(report.links[0].target, "Customer Account");
        assert!(report.links[0].resolved);
        assert_eq!(report.links[1].target, "coupon");
        assert!(!report.links[1].resolved);
        assert_eq!(report.fact_tables, vec!["Order"]);
        assert_eq!(report.dimension_tables, vec!["Customer Account"]);
    }

    #[test]
    fn test_rendered_sections() {
        let wide = (0..9).fold(Entity::new("w", "Wide"), |e, i| {
            e.add_column(Column::new(format!("w{i}"), format!("attr{i}"), "INTEGER"))
        });
        let sale = Entity::new("s", "Sale")
            .add_column(Column::new("s1", "id", "INTEGER").primary_key())
            .add_column(Column::new("s2", "product_id", "INTEGER").foreign_key())
            .add_column(Column::new("s3", "sold_at", "TIMESTAMP"));

        let text = generate_recommendations(&[wide, sale]);

        let expected = [
            "🔗 RELATIONSHIP RECOMMENDATIONS:",
            "• Link Sale.product_id to product.id (One-to-Many)",
            "",
            "📊 DIMENSIONAL MODELING SUGGESTIONS:",
            "DIMENSION TABLES (contain descriptive attributes):",
            "• Sale - Good candidate for dimension with descriptive attributes",
            "",
            "🔧 NORMALIZATION RECOMMENDATIONS:",
            "• Consider breaking down Wide into smaller, more focused entities",
            "  - Separate core attributes from optional/descriptive ones",
            "  - Group related columns into separate entities",
            "",
            "⚡ PERFORMANCE RECOMMENDATIONS:",
            "Consider adding indexes on these columns for better query performance:",
            "• Sale.product_id",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn test_index_hints_use_column_names() {
        let entity = Entity::new("e", "Event")
            .add_column(Column::new("a", "start_time", "VARCHAR(20)"))
            .add_column(Column::new("b", "logged", "TIMESTAMP"));

        let report = analyze(&[entity]);

        assert_eq!(report.indexes.len(), 1);
        assert_eq!(report.indexes[0].column, "start_time");
    }
}
