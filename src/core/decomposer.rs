//! Splitting oversized entities into a core entity and a detail entity
//!
//! Column selection is substring-based and deliberately loose: `"id"` matches
//! `"guide"`, `"name"` matches `"rename_flag"`. Columns that are neither core
//! nor detail are dropped from the output. That loss is reported in
//! [`Decomposition::dropped`] and logged, but the returned entities keep the
//! original shape so existing recommendation text stays valid.

use super::{Column, Entity, IdGenerator};
use serde::Serialize;

/// Entities with more columns than this are decomposed (fact candidates excepted)
pub const DECOMPOSITION_THRESHOLD: usize = 8;

/// Columns kept when no column qualifies as core
pub const FALLBACK_CORE_COLUMNS: usize = 5;

const CORE_NAME_MARKERS: [&str; 3] = ["name", "title", "id"];
const DETAIL_NAME_MARKERS: [&str; 4] = ["description", "address", "detail", "note"];
const DETAIL_DATA_TYPE: &str = "TEXT";

/// Offset of the detail entity from the original on the canvas
const DETAIL_OFFSET: (f64, f64) = (400.0, 100.0);

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decomposition {
    /// The original entity restricted to its core columns
    pub main: Entity,
    /// Descriptive columns moved out, if any qualified
    pub detail: Option<Entity>,
    /// Columns present in neither output
    pub dropped: Vec<Column>,
}

pub fn exceeds_threshold(entity: &Entity) -> bool {
    entity.columns.len() > DECOMPOSITION_THRESHOLD
}

/// Key columns plus anything named like an identifier or a label
pub fn is_core_column(column: &Column) -> bool {
    column.is_primary_key
        || column.is_foreign_key
        || CORE_NAME_MARKERS
            .iter()
            .any(|marker| column.name.contains(marker))
}

pub fn is_detail_column(column: &Column) -> bool {
    DETAIL_NAME_MARKERS
        .iter()
        .any(|marker| column.name.contains(marker))
        || column.data_type == DETAIL_DATA_TYPE
}

/// Split `entity` into a main entity and an optional `<name>_Details` entity.
///
/// Does not check the threshold or the entity's role; the orchestrator decides
/// eligibility. Consumes one id token only when a detail entity is produced.
pub fn decompose(entity: &Entity, ids: &mut impl IdGenerator) -> Decomposition {
    let core: Vec<usize> = entity
        .columns
        .iter()
        .enumerate()
        .filter(|(_, column)| is_core_column(column))
        .map(|(index, _)| index)
        .collect();

    // Detail excludes only rule-selected core columns, so with the fallback a
    // column can land in both outputs.
    let detail: Vec<usize> = entity
        .columns
        .iter()
        .enumerate()
        .filter(|(index, column)| !core.contains(index) && is_detail_column(column))
        .map(|(index, _)| index)
        .collect();

    let main_columns: Vec<Column> = if core.is_empty() {
        entity
            .columns
            .iter()
            .take(FALLBACK_CORE_COLUMNS)
            .cloned()
            .collect()
    } else {
        core.iter().map(|&i| entity.columns[i].clone()).collect()
    };
    let kept_in_main = if core.is_empty() {
        (0..entity.columns.len().min(FALLBACK_CORE_COLUMNS)).collect()
    } else {
        core
    };

    let dropped: Vec<Column> = entity
        .columns
        .iter()
        .enumerate()
        .filter(|(index, _)| !kept_in_main.contains(index) && !detail.contains(index))
        .map(|(_, column)| column.clone())
        .collect();

    if !dropped.is_empty() {
        tracing::warn!(
            "Decomposing '{}' drops {} column(s): {}",
            entity.name,
            dropped.len(),
            dropped
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let detail_entity = if detail.is_empty() {
        None
    } else {
        let detail_columns = detail.iter().map(|&i| entity.columns[i].clone());
        Some(build_detail_entity(entity, detail_columns, ids))
    };

    Decomposition {
        main: Entity {
            columns: main_columns,
            ..entity.clone()
        },
        detail: detail_entity,
        dropped,
    }
}

fn build_detail_entity(
    entity: &Entity,
    detail_columns: impl Iterator<Item = Column>,
    ids: &mut impl IdGenerator,
) -> Entity {
    let token = ids.next_token();
    let mut columns = vec![
        Column::new(format!("detail_id_{token}"), "id", "INTEGER").primary_key(),
        Column::new(
            format!("detail_fk_{token}"),
            format!("{}_id", entity.name.to_lowercase()),
            "INTEGER",
        )
        .foreign_key(),
    ];
    columns.extend(detail_columns);

    Entity {
        id: format!("{}_details", entity.id),
        name: format!("{}_Details", entity.name),
        columns,
        position: entity.position.offset(DETAIL_OFFSET.0, DETAIL_OFFSET.1),
        visible: true,
    }
}
