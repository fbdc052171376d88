//! Fact / dimension classification
//!
//! A pure function of the current key flags. Inference is not run here: callers
//! flag foreign keys first if they want inferred keys to count.

use super::Entity;
use serde::Serialize;

/// Minimum number of foreign-key columns for a fact candidate
pub const FACT_FOREIGN_KEY_THRESHOLD: usize = 2;

/// Dimensional-modeling role of an entity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum TableRole {
    #[display("fact")]
    Fact,
    #[display("dimension")]
    Dimension,
    #[display("unclassified")]
    Unclassified,
}

impl TableRole {
    pub fn of(entity: &Entity) -> Self {
        if is_fact_candidate(entity) {
            TableRole::Fact
        } else if entity.has_primary_key() {
            TableRole::Dimension
        } else {
            TableRole::Unclassified
        }
    }
}

pub fn is_fact_candidate(entity: &Entity) -> bool {
    entity.foreign_key_count() >= FACT_FOREIGN_KEY_THRESHOLD
}

pub fn is_dimension_candidate(entity: &Entity) -> bool {
    TableRole::of(entity) == TableRole::Dimension
}

/// Roles of a schema snapshot, aligned with the entity list
#[derive(Clone, Debug)]
pub struct Classification<'a> {
    entities: &'a [Entity],
    roles: Vec<TableRole>,
}

impl<'a> Classification<'a> {
    pub fn role(&self, index: usize) -> TableRole {
        self.roles
            .get(index)
            .copied()
            .unwrap_or(TableRole::Unclassified)
    }

    pub fn roles(&self) -> &[TableRole] {
        &self.roles
    }

    pub fn is_fact(&self, index: usize) -> bool {
        self.role(index) == TableRole::Fact
    }

    fn with_role(&self, role: TableRole) -> impl Iterator<Item = &'a Entity> + '_ {
        self.entities
            .iter()
            .zip(self.roles.iter())
            .filter(move |(_, r)| **r == role)
            .map(|(entity, _)| entity)
    }

    /// Fact candidates in list order
    pub fn facts(&self) -> Vec<&'a Entity> {
        self.with_role(TableRole::Fact).collect()
    }

    /// Dimension candidates in list order
    pub fn dimensions(&self) -> Vec<&'a Entity> {
        self.with_role(TableRole::Dimension).collect()
    }

    pub fn unclassified(&self) -> Vec<&'a Entity> {
        self.with_role(TableRole::Unclassified).collect()
    }
}

/// Partition a schema into fact and dimension candidates
pub fn classify(entities: &[Entity]) -> Classification<'_> {
    Classification {
        entities,
        roles: entities.iter().map(TableRole::of).collect(),
    }
}
