//! Relationship inference from column naming conventions
//!
//! Relationships are never stored: a column named `<referent>_id` points at the
//! entity whose name (or id) matches `<referent>`. Every function here takes the
//! full candidate set explicitly and recomputes from scratch on each call.

use super::{Entity, Relationship, RelationshipGraph, RelationshipType};
use petgraph::graph::NodeIndex;

/// Suffix that marks a column as a reference to another entity
pub const FOREIGN_KEY_SUFFIX: &str = "_id";

/// Strip the trailing `_id` from a column name. Names without the suffix are
/// returned unchanged.
pub fn foreign_key_stem(column_name: &str) -> &str {
    column_name
        .strip_suffix(FOREIGN_KEY_SUFFIX)
        .unwrap_or(column_name)
}

/// Naming rules tried in this fixed order when resolving a referent
#[derive(Clone, Copy, Debug, PartialEq, Eq, derive_more::Display)]
pub enum MatchRule {
    /// Lower-cased entity name equals the stem
    #[display("exact name")]
    ExactName,
    /// Lower-cased entity name with spaces turned into underscores
    #[display("spaces to underscores")]
    SpacesToUnderscores,
    /// Lower-cased entity name with spaces removed
    #[display("spaces removed")]
    SpacesRemoved,
    /// Raw entity id equals the stem
    #[display("entity id")]
    EntityId,
}

impl MatchRule {
    pub const ORDERED: [MatchRule; 4] = [
        MatchRule::ExactName,
        MatchRule::SpacesToUnderscores,
        MatchRule::SpacesRemoved,
        MatchRule::EntityId,
    ];

    fn matches(self, entity: &Entity, stem: &str, stem_lower: &str) -> bool {
        match self {
            MatchRule::ExactName => entity.name.to_lowercase() == stem_lower,
            MatchRule::SpacesToUnderscores => {
                entity.name.to_lowercase().replace(' ', "_") == stem_lower
            }
            MatchRule::SpacesRemoved => entity.name.to_lowercase().replace(' ', "") == stem_lower,
            MatchRule::EntityId => entity.id == stem,
        }
    }
}

/// A resolved referent together with the rule that found it
#[derive(Clone, Copy, Debug)]
pub struct Referent<'a> {
    pub entity: &'a Entity,
    pub rule: MatchRule,
}

/// Rule-major search: the first rule that any candidate satisfies wins, and
/// within a rule the first candidate in list order wins.
fn resolve_index(column_name: &str, candidates: &[&Entity]) -> Option<(usize, MatchRule)> {
    let stem = foreign_key_stem(column_name);
    if stem.is_empty() {
        return None;
    }
    let stem_lower = stem.to_lowercase();

    MatchRule::ORDERED.into_iter().find_map(|rule| {
        candidates
            .iter()
            .position(|entity| rule.matches(entity, stem, &stem_lower))
            .map(|index| (index, rule))
    })
}

/// Find the entity a column name refers to, with the matching rule
pub fn resolve_referent<'a, I>(column_name: &str, candidates: I) -> Option<Referent<'a>>
where
    I: IntoIterator<Item = &'a Entity>,
{
    let candidates: Vec<&'a Entity> = candidates.into_iter().collect();
    resolve_index(column_name, &candidates).map(|(index, rule)| Referent {
        entity: candidates[index],
        rule,
    })
}

/// Find the entity a column name refers to
pub fn infer_referent<'a, I>(column_name: &str, candidates: I) -> Option<&'a Entity>
where
    I: IntoIterator<Item = &'a Entity>,
{
    resolve_referent(column_name, candidates).map(|referent| referent.entity)
}

/// Flag un-flagged `_id` columns as foreign keys when their stem resolves to
/// an entity in `all_entities`. Never clears a flag and never touches
/// primary-key columns.
pub fn optimize_entity(entity: &Entity, all_entities: &[Entity]) -> Entity {
    let mut optimized = entity.clone();

    for column in optimized.columns.iter_mut() {
        if column.is_foreign_key
            || column.is_primary_key
            || !column.name.ends_with(FOREIGN_KEY_SUFFIX)
        {
            continue;
        }

        if let Some(referent) = resolve_referent(&column.name, all_entities) {
            tracing::debug!(
                "Flagging {}.{} as foreign key to '{}' ({})",
                entity.name,
                column.name,
                referent.entity.name,
                referent.rule
            );
            column.is_foreign_key = true;
        }
    }

    optimized
}

/// An inferred link, by position in the entity list
struct Link {
    referent: usize,
    owner: usize,
    column: usize,
}

fn inferred_links(entities: &[Entity]) -> Vec<Link> {
    let candidates: Vec<&Entity> = entities.iter().collect();
    let mut links = Vec::new();

    for (owner, entity) in entities.iter().enumerate() {
        for (column_index, column) in entity.columns.iter().enumerate() {
            let looks_like_reference = column.is_foreign_key
                || (!column.is_primary_key && column.name.ends_with(FOREIGN_KEY_SUFFIX));
            if !looks_like_reference {
                continue;
            }
            if let Some((referent, _)) = resolve_index(&column.name, &candidates) {
                links.push(Link {
                    referent,
                    owner,
                    column: column_index,
                });
            }
        }
    }

    links
}

/// All relationships implied by naming conventions, in entity then column order
pub fn infer_relationships(entities: &[Entity]) -> Vec<Relationship> {
    inferred_links(entities)
        .into_iter()
        .map(|link| {
            let referent = &entities[link.referent];
            let owner = &entities[link.owner];
            let column = &owner.columns[link.column];
            Relationship {
                id: format!("rel_{}_{}", owner.id, column.id),
                from_entity_id: referent.id.clone(),
                to_entity_id: owner.id.clone(),
                relationship_type: RelationshipType::OneToMany,
                from_column: referent.primary_key_name().to_string(),
                to_column: column.name.clone(),
            }
        })
        .collect()
}

/// Build a graph of the inferred relationships. Node weights are entity ids;
/// edges point from the referenced entity to the entity holding the key.
pub fn relationship_graph(entities: &[Entity]) -> RelationshipGraph {
    let mut graph = RelationshipGraph::default();
    let nodes: Vec<NodeIndex> = entities
        .iter()
        .map(|entity| graph.add_node(entity.id.clone()))
        .collect();

    for (link, relationship) in inferred_links(entities)
        .into_iter()
        .zip(infer_relationships(entities))
    {
        graph.add_edge(nodes[link.referent], nodes[link.owner], relationship);
    }

    graph
}
