#[cfg(test)]
mod tests {
    use crate::core::{
        Column, Entity, Position, SequentialIds, TableRole, TransformOutcome, Transformer,
        classify, infer_relationships, transform,
    };

    fn run(entities: &[Entity]) -> TransformOutcome {
        Transformer::new(SequentialIds::new()).transform(entities)
    }

    fn column_names(entity: &Entity) -> Vec<&str> {
        entity.columns.iter().map(|c| c.name.as_str()).collect()
    }

    fn entity_names(entities: &[Entity]) -> Vec<&str> {
        entities.iter().map(|e| e.name.as_str()).collect()
    }

    fn customer() -> Entity {
        Entity::new("customer", "Customer")
            .add_column(Column::new("cu1", "id", "INTEGER").primary_key())
            .add_column(Column::new("cu2", "full_name", "VARCHAR(255)"))
    }

    fn order() -> Entity {
        Entity::new("order", "Order")
            .add_column(Column::new("o1", "order_id", "INTEGER").primary_key())
            .add_column(Column::new("o2", "customer_id", "INTEGER"))
            .add_column(Column::new("o3", "order_date", "DATE"))
            .add_column(Column::new("o4", "total_amount", "DECIMAL(10,2)"))
            .add_column(Column::new("o5", "status", "VARCHAR(20)"))
    }

    fn listing() -> Entity {
        Entity::new("listing", "Listing")
            .with_position(500.0, 100.0)
            .add_column(Column::new("l1", "listing_id", "INTEGER").primary_key())
            .add_column(Column::new("l2", "agent_id", "INTEGER").foreign_key())
            .add_column(Column::new("l3", "property_id", "INTEGER").foreign_key())
            .add_column(Column::new("l4", "listing_price", "DECIMAL(12,2)"))
            .add_column(Column::new("l5", "status", "VARCHAR(20)"))
            .add_column(Column::new("l6", "created_at", "TIMESTAMP"))
    }

    fn article() -> Entity {
        let columns = [
            ("id", "INTEGER"),
            ("title", "VARCHAR(255)"),
            ("description", "VARCHAR(255)"),
            ("address", "VARCHAR(255)"),
            ("note_internal", "VARCHAR(255)"),
            ("summary", "VARCHAR(255)"),
            ("code", "VARCHAR(255)"),
            ("owner_name", "VARCHAR(255)"),
            ("x", "INTEGER"),
            ("y", "INTEGER"),
        ];
        columns.iter().enumerate().fold(
            Entity::new("article", "Article").with_position(200.0, 300.0),
            |entity, (i, (name, data_type))| {
                let column = Column::new(format!("a{i}"), *name, *data_type);
                entity.add_column(if i == 0 { column.primary_key() } else { column })
            },
        )
    }

    // ========================================================================
    // Scenarios
    // ========================================================================

    #[test]
    fn test_order_flags_customer_key_when_customer_exists() {
        let outcome = run(&[order(), customer()]);

        assert_eq!(outcome.updated_entities.len(), 2);
        let order = &outcome.updated_entities[0];
        assert_eq!(order.columns.len(), 5);
        assert!(order.columns[1].is_foreign_key);
        // Only the `_id` column is touched
        assert!(!order.columns[0].is_foreign_key);
        assert!(!order.columns[2].is_foreign_key);
        assert_eq!(outcome.updated_entities[1], customer());
    }

    #[test]
    fn test_order_without_customer_is_left_alone() {
        let outcome = run(&[order()]);

        let order = &outcome.updated_entities[0];
        assert!(!order.columns[1].is_foreign_key);
        // Not a fact: no dimensions, only the date table for `order_date`
        assert_eq!(entity_names(&outcome.new_entities), vec!["Date_Dimension"]);
    }

    #[test]
    fn test_listing_synthesizes_agent_and_property() {
        let outcome = run(&[listing()]);

        assert_eq!(outcome.updated_entities, vec![listing()]);
        assert_eq!(
            entity_names(&outcome.new_entities),
            vec!["Agent", "Property", "Date_Dimension"]
        );

        let agent = &outcome.new_entities[0];
        assert_eq!(agent.id, "dim_agent_1");
        assert_eq!(agent.position, Position::new(100.0, 100.0));
        assert_eq!(column_names(agent), vec!["id", "name", "description"]);
        let ids: Vec<&str> = agent.columns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["dim_pk_1", "dim_name_1", "dim_desc_1"]);
        assert!(agent.columns[0].is_primary_key);
        assert_eq!(agent.columns[0].data_type, "INTEGER");
        assert_eq!(agent.columns[1].data_type, "VARCHAR(255)");
        assert_eq!(agent.columns[2].data_type, "TEXT");
        assert!(agent.visible);

        let property = &outcome.new_entities[1];
        assert_eq!(property.id, "dim_property_2");
        assert_eq!(property.position, Position::new(100.0, 350.0));

        assert_eq!(outcome.new_entities[2].id, "date_dim_3");
    }

    #[test]
    fn test_article_decomposition_drops_unmatched_columns() {
        let (outcome, report) =
            Transformer::new(SequentialIds::new()).transform_with_report(&[article()]);

        let main = &outcome.updated_entities[0];
        assert_eq!(main.id, "article");
        assert_eq!(main.name, "Article");
        assert_eq!(main.position, Position::new(200.0, 300.0));
        assert_eq!(column_names(main), vec!["id", "title", "owner_name"]);

        assert_eq!(outcome.new_entities.len(), 1);
        let detail = &outcome.new_entities[0];
        assert_eq!(detail.id, "article_details");
        assert_eq!(detail.name, "Article_Details");
        assert_eq!(detail.position, Position::new(600.0, 400.0));
        assert_eq!(
            column_names(detail),
            vec!["id", "article_id", "description", "address", "note_internal"]
        );
        assert_eq!(detail.columns[0].id, "detail_id_1");
        assert_eq!(detail.columns[1].id, "detail_fk_1");

        let dropped: Vec<&str> = report
            .dropped_columns
            .iter()
            .map(|(_, c)| c.name.as_str())
            .collect();
        assert_eq!(dropped, vec!["summary", "code", "x", "y"]);
        assert_eq!(report.decomposed, vec!["article"]);
    }

    #[test]
    fn test_timestamp_adds_date_dimension() {
        let event = Entity::new("event", "Event")
            .add_column(Column::new("e1", "id", "INTEGER").primary_key())
            .add_column(Column::new("e2", "happened", "TIMESTAMP"));

        let outcome = run(&[event]);

        assert_eq!(outcome.new_entities.len(), 1);
        let date = &outcome.new_entities[0];
        assert_eq!(date.name, "Date_Dimension");
        assert_eq!(date.position, Position::new(100.0, 500.0));
        assert_eq!(
            column_names(date),
            vec!["date_id", "full_date", "year", "quarter", "month", "week", "day"]
        );
        assert!(date.columns[0].is_primary_key);
        assert_eq!(date.columns[1].data_type, "DATE");
        assert!(date.columns[2..].iter().all(|c| c.data_type == "INTEGER"));
    }

    // ========================================================================
    // Properties
    // ========================================================================

    #[test]
    fn test_determinism() {
        let input = vec![order(), customer(), listing(), article()];

        assert_eq!(run(&input), run(&input));

        // Random ids differ, decisions do not
        let a = transform(&input);
        let b = transform(&input);
        assert_eq!(a.updated_entities, b.updated_entities);
        assert_eq!(entity_names(&a.new_entities), entity_names(&b.new_entities));
        assert_eq!(infer_relationships(&input), infer_relationships(&input));

        let roles_a = classify(&input).roles().to_vec();
        let roles_b = classify(&input).roles().to_vec();
        assert_eq!(roles_a, roles_b);
    }

    #[test]
    fn test_fact_threshold() {
        let one = Entity::new("s", "Sale")
            .add_column(Column::new("s1", "store_id", "INTEGER").foreign_key());
        let two = one
            .clone()
            .add_column(Column::new("s2", "product_id", "INTEGER").foreign_key());

        assert!(run(&[one.clone()]).new_entities.is_empty());
        assert!(classify(&[one]).facts().is_empty());
        assert_eq!(entity_names(&run(&[two]).new_entities), vec!["Store", "Product"]);
    }

    #[test]
    fn test_second_pass_adds_no_dimensions() {
        let first = run(&[listing()]);
        let merged = first.clone().merged();

        let second = run(&merged);

        assert!(second.new_entities.is_empty());
        assert_eq!(second.updated_entities, merged);
    }

    #[test]
    fn test_decomposition_threshold() {
        let wide = |count: usize| {
            (0..count).fold(Entity::new("w", "Wide"), |e, i| {
                e.add_column(Column::new(format!("w{i}"), format!("attr{i}"), "TEXT"))
            })
        };

        let eight = run(&[wide(8)]);
        assert_eq!(eight.updated_entities[0].columns.len(), 8);
        assert!(eight.new_entities.is_empty());

        let nine = run(&[wide(9)]);
        // No core column: first five stay, and all TEXT columns go to the detail entity
        assert_eq!(nine.updated_entities[0].columns.len(), 5);
        assert_eq!(nine.new_entities[0].columns.len(), 11);
    }

    #[test]
    fn test_wide_fact_is_not_decomposed() {
        let fact = (0..8).fold(
            Entity::new("f", "Sales")
                .add_column(Column::new("k1", "store_id", "INTEGER").foreign_key())
                .add_column(Column::new("k2", "product_id", "INTEGER").foreign_key()),
            |e, i| e.add_column(Column::new(format!("m{i}"), format!("measure{i}"), "DECIMAL")),
        );

        let outcome = run(&[fact.clone()]);

        assert_eq!(outcome.updated_entities, vec![fact]);
        assert_eq!(entity_names(&outcome.new_entities), vec!["Store", "Product"]);
    }

    #[test]
    fn test_date_dimension_singleton() {
        let a = Entity::new("a", "Login").add_column(Column::new("a1", "at", "TIMESTAMP"));
        let b = Entity::new("b", "Logout").add_column(Column::new("b1", "at", "TIMESTAMP"));

        let outcome = run(&[a, b]);

        let dates = outcome
            .new_entities
            .iter()
            .filter(|e| e.name == "Date_Dimension")
            .count();
        assert_eq!(dates, 1);
    }

    #[test]
    fn test_existing_date_entity_suppresses_date_dimension() {
        let calendar = Entity::new("cal", "Calendar_Dates")
            .add_column(Column::new("c1", "day", "DATE").primary_key());

        let outcome = run(&[order(), calendar]);

        assert!(outcome.new_entities.is_empty());
    }

    #[test]
    fn test_synthesized_dimension_named_like_date_does_not_suppress_date_dimension() {
        // "candidate" contains "date", but only input entities count as date tables
        let hire = Entity::new("hire", "Hire")
            .add_column(Column::new("h1", "candidate_id", "INTEGER").foreign_key())
            .add_column(Column::new("h2", "store_id", "INTEGER").foreign_key())
            .add_column(Column::new("h3", "hired_at", "TIMESTAMP"));

        let outcome = run(&[hire]);

        assert_eq!(
            entity_names(&outcome.new_entities),
            vec!["Candidate", "Store", "Date_Dimension"]
        );
        assert_eq!(outcome.new_entities[2].id, "date_dim_3");
    }

    #[test]
    fn test_dimensions_accumulate_across_facts() {
        let sale = Entity::new("sale", "Sale")
            .with_position(800.0, 100.0)
            .add_column(Column::new("s1", "agent_id", "INTEGER").foreign_key())
            .add_column(Column::new("s2", "store_id", "INTEGER").foreign_key());
        let visit = Entity::new("visit", "Visit")
            .with_position(800.0, 600.0)
            .add_column(Column::new("v1", "agent_id", "INTEGER").foreign_key())
            .add_column(Column::new("v2", "region_id", "INTEGER").foreign_key());

        let outcome = run(&[sale, visit]);

        assert_eq!(
            entity_names(&outcome.new_entities),
            vec!["Agent", "Store", "Region"]
        );
        let ids: Vec<&str> = outcome.new_entities.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["dim_agent_1", "dim_store_2", "dim_region_3"]);

        assert_eq!(outcome.new_entities[0].position, Position::new(400.0, 100.0));
        assert_eq!(outcome.new_entities[1].position, Position::new(400.0, 350.0));
        // Region is the first dimension created for Visit
        assert_eq!(outcome.new_entities[2].position, Position::new(400.0, 600.0));
    }

    // ========================================================================
    // Edge cases
    // ========================================================================

    #[test]
    fn test_empty_input() {
        assert_eq!(run(&[]), TransformOutcome::default());

        let bare = Entity::new("e", "Empty");
        let outcome = run(&[bare.clone()]);
        assert_eq!(outcome.updated_entities, vec![bare]);
        assert!(outcome.new_entities.is_empty());
    }

    #[test]
    fn test_decomposed_entity_is_not_optimized() {
        let wide = (0..8).fold(
            Entity::new("w", "Wide").add_column(Column::new("w_c", "customer_id", "INTEGER")),
            |e, i| e.add_column(Column::new(format!("w{i}"), format!("attr{i}"), "INTEGER")),
        );

        let outcome = run(&[wide, customer()]);

        let main = &outcome.updated_entities[0];
        assert_eq!(main.columns[0].name, "customer_id");
        assert!(!main.columns[0].is_foreign_key);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = vec![order(), customer()];
        let snapshot = input.clone();

        let _ = run(&input);

        assert_eq!(input, snapshot);
    }

    #[test]
    fn test_roles_use_input_flags() {
        // Inference happens after classification: Order stays a dimension
        let input = vec![order(), customer()];
        assert_eq!(classify(&input).role(0), TableRole::Dimension);
    }

    #[test]
    fn test_outcome_wire_shape() {
        let outcome = run(&[listing()]);

        let value = serde_json::to_value(&outcome).unwrap();

        assert!(value["updatedEntities"].is_array());
        assert_eq!(value["newEntities"][0]["id"], "dim_agent_1");
        assert_eq!(value["newEntities"][0]["columns"][0]["isPrimaryKey"], true);
        assert_eq!(value["newEntities"][0]["columns"][0]["dataType"], "INTEGER");
        assert!(value["newEntities"][0]["columns"][0].get("description").is_none());
        assert_eq!(value["newEntities"][0]["visible"], true);
    }
}
