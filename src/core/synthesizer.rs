//! Synthesis of missing dimension entities and the shared date dimension

use super::inference::{foreign_key_stem, infer_referent};
use super::{Column, Entity, IdGenerator, Position};

/// Horizontal distance of synthesized dimensions to the left of their fact
const DIMENSION_OFFSET_X: f64 = -400.0;
/// Vertical spacing between dimensions created for the same fact
const DIMENSION_SPACING_Y: f64 = 250.0;

pub const DATE_DIMENSION_NAME: &str = "Date_Dimension";
pub const DATE_DIMENSION_POSITION: Position = Position { x: 100.0, y: 500.0 };

/// Upper-case the first character of a stem
fn dimension_name(stem: &str) -> String {
    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn dimension_entity(stem: &str, fact: &Entity, created: usize, token: &str) -> Entity {
    Entity {
        id: format!("dim_{stem}_{token}"),
        name: dimension_name(stem),
        columns: vec![
            Column::new(format!("dim_pk_{token}"), "id", "INTEGER").primary_key(),
            Column::new(format!("dim_name_{token}"), "name", "VARCHAR(255)"),
            Column::new(format!("dim_desc_{token}"), "description", "TEXT"),
        ],
        position: fact
            .position
            .offset(DIMENSION_OFFSET_X, created as f64 * DIMENSION_SPACING_Y),
        visible: true,
    }
}

/// Create a dimension for every foreign key of `fact` whose referent is absent
/// from `existing`.
///
/// Dimensions created here count as existing for the remaining columns, so two
/// keys with the same stem yield one dimension. Columns whose stem is empty are
/// skipped.
pub fn synthesize_missing_dimensions<'a>(
    fact: &Entity,
    existing: impl IntoIterator<Item = &'a Entity>,
    ids: &mut impl IdGenerator,
) -> Vec<Entity> {
    let existing: Vec<&Entity> = existing.into_iter().collect();
    let mut created: Vec<Entity> = Vec::new();

    for column in fact.columns.iter().filter(|c| c.is_foreign_key) {
        let stem = foreign_key_stem(&column.name);
        if stem.is_empty() {
            continue;
        }
        if infer_referent(&column.name, existing.iter().copied().chain(created.iter())).is_some() {
            continue;
        }

        let token = ids.next_token();
        let dimension = dimension_entity(stem, fact, created.len(), &token);
        tracing::info!(
            "Synthesized dimension '{}' for {}.{}",
            dimension.name,
            fact.name,
            column.name
        );
        created.push(dimension);
    }

    created
}

/// Whether any entity carries a date or time column
pub fn has_temporal_columns(entities: &[Entity]) -> bool {
    entities
        .iter()
        .any(|entity| entity.columns.iter().any(Column::is_temporal))
}

/// Whether an entity named like a date table exists
pub fn has_date_entity<'a>(entities: impl IntoIterator<Item = &'a Entity>) -> bool {
    entities
        .into_iter()
        .any(|entity| entity.name.to_lowercase().contains("date"))
}

/// The canonical seven-column date dimension
pub fn date_dimension(ids: &mut impl IdGenerator) -> Entity {
    let token = ids.next_token();
    let attribute = |suffix: &str, name: &str| {
        Column::new(format!("date_{suffix}_{token}"), name, "INTEGER")
    };

    Entity {
        id: format!("date_dim_{token}"),
        name: DATE_DIMENSION_NAME.to_string(),
        columns: vec![
            Column::new(format!("date_pk_{token}"), "date_id", "INTEGER").primary_key(),
            Column::new(format!("date_full_{token}"), "full_date", "DATE"),
            attribute("year", "year"),
            attribute("quarter", "quarter"),
            attribute("month", "month"),
            attribute("week", "week"),
            attribute("day", "day"),
        ],
        position: DATE_DIMENSION_POSITION,
        visible: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SequentialIds;

    fn listing() -> Entity {
        Entity::new("listing", "Listing")
            .with_position(800.0, 200.0)
            .add_column(Column::new("l1", "listing_id", "INTEGER").primary_key())
            .add_column(Column::new("l2", "agent_id", "INTEGER").foreign_key())
            .add_column(Column::new("l3", "property_id", "INTEGER").foreign_key())
            .add_column(Column::new("l4", "listing_price", "DECIMAL"))
    }

    #[test]
    fn test_dimension_name() {
        assert_eq!(dimension_name("agent"), "Agent");
        assert_eq!(dimension_name("order_item"), "Order_item");
        assert_eq!(dimension_name(""), "");
    }

    #[test]
    fn test_synthesizes_missing_dimensions() {
        let fact = listing();
        let mut ids = SequentialIds::new();

        let dims = synthesize_missing_dimensions(&fact, std::slice::from_ref(&fact), &mut ids);

        assert_eq!(dims.len(), 2);
        assert_eq!(dims[0].id, "dim_agent_1");
        assert_eq!(dims[0].name, "Agent");
        assert_eq!(dims[0].position, Position::new(400.0, 200.0));
        assert_eq!(dims[1].id, "dim_property_2");
        assert_eq!(dims[1].name, "Property");
        assert_eq!(dims[1].position, Position::new(400.0, 450.0));

        let shape: Vec<(&str, &str, bool)> = dims[0]
            .columns
            .iter()
            .map(|c| (c.name.as_str(), c.data_type.as_str(), c.is_primary_key))
            .collect();
        assert_eq!(
            shape,
            vec![
                ("id", "INTEGER", true),
                ("name", "VARCHAR(255)", false),
                ("description", "TEXT", false),
            ]
        );
        assert_eq!(dims[0].columns[0].id, "dim_pk_1");
    }

    #[test]
    fn test_existing_referent_is_not_duplicated() {
        let fact = listing();
        let agent = Entity::new("a", "agent");
        let existing = vec![fact.clone(), agent];
        let mut ids = SequentialIds::new();

        let dims = synthesize_missing_dimensions(&fact, &existing, &mut ids);

        assert_eq!(dims.len(), 1);
        assert_eq!(dims[0].name, "Property");
        // Stacking counts only dimensions created for this fact
        assert_eq!(dims[0].position.y, 200.0);
    }

    #[test]
    fn test_repeated_stem_in_one_fact() {
        let fact = Entity::new("t", "Transfer")
            .add_column(Column::new("a", "account_id", "INTEGER").foreign_key())
            .add_column(Column::new("b", "account_id", "INTEGER").foreign_key());
        let mut ids = SequentialIds::new();

        let dims = synthesize_missing_dimensions(&fact, std::iter::empty(), &mut ids);

        assert_eq!(dims.len(), 1);
    }

    #[test]
    fn test_second_pass_creates_nothing() {
        let fact = listing();
        let mut ids = SequentialIds::new();
        let mut schema = vec![fact.clone()];

        let first = synthesize_missing_dimensions(&fact, &schema, &mut ids);
        schema.extend(first);
        let second = synthesize_missing_dimensions(&fact, &schema, &mut ids);

        assert!(second.is_empty());
    }

    #[test]
    fn test_empty_stem_is_skipped() {
        let fact = Entity::new("f", "Odd")
            .add_column(Column::new("a", "_id", "INTEGER").foreign_key())
            .add_column(Column::new("b", "store_id", "INTEGER").foreign_key());
        let mut ids = SequentialIds::new();

        let dims = synthesize_missing_dimensions(&fact, std::iter::empty(), &mut ids);

        assert_eq!(dims.len(), 1);
        assert_eq!(dims[0].name, "Store");
    }

    #[test]
    fn test_temporal_detection() {
        let plain = Entity::new("p", "Plain").add_column(Column::new("a", "qty", "INTEGER"));
        let stamped = Entity::new("s", "Stamped").add_column(Column::new("b", "at", "timestamp"));

        assert!(!has_temporal_columns(std::slice::from_ref(&plain)));
        assert!(has_temporal_columns(&[plain, stamped]));
        assert!(has_date_entity(&[Entity::new("d", "Delivery Dates")]));
        assert!(!has_date_entity(&[Entity::new("o", "Order")]));
    }

    #[test]
    fn test_date_dimension_layout() {
        let mut ids = SequentialIds::new();
        let date = date_dimension(&mut ids);

        assert_eq!(date.id, "date_dim_1");
        assert_eq!(date.name, DATE_DIMENSION_NAME);
        assert_eq!(date.position, Position::new(100.0, 500.0));

        let shape: Vec<(&str, &str)> = date
            .columns
            .iter()
            .map(|c| (c.name.as_str(), c.data_type.as_str()))
            .collect();
        assert_eq!(
            shape,
            vec![
                ("date_id", "INTEGER"),
                ("full_date", "DATE"),
                ("year", "INTEGER"),
                ("quarter", "INTEGER"),
                ("month", "INTEGER"),
                ("week", "INTEGER"),
                ("day", "INTEGER"),
            ]
        );
        assert!(date.columns[0].is_primary_key);
        assert_eq!(date.columns[6].id, "date_day_1");
    }
}
