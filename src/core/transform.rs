//! Transformation orchestrator
//!
//! Single entry point for the editor: takes a snapshot of all entities and
//! returns the rewritten originals plus every entity synthesized along the way.
//! Inputs are never mutated; the caller merges the outcome into its own state.
//!
//! Order of work:
//! 1. Classify every entity once, from the input flags.
//! 2. Decompose oversized non-fact entities; run the foreign-key optimizer on
//!    the rest against the full input list.
//! 3. Synthesize missing dimensions for each fact candidate, in input order,
//!    against the input plus everything synthesized so far.
//! 4. Add a date dimension when a date/time column exists and no date entity does.

use super::classifier::classify;
use super::decomposer::{decompose, exceeds_threshold};
use super::inference::optimize_entity;
use super::synthesizer::{
    date_dimension, has_date_entity, has_temporal_columns, synthesize_missing_dimensions,
};
use super::{Column, Entity, IdGenerator, UuidIds};
use serde::{Deserialize, Serialize};

/// Result of a transformation pass
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOutcome {
    /// One entry per input entity, in input order
    pub updated_entities: Vec<Entity>,
    /// Detail, dimension and date entities created by the pass
    pub new_entities: Vec<Entity>,
}

impl TransformOutcome {
    /// Updated entities followed by new ones
    pub fn merged(self) -> Vec<Entity> {
        let mut entities = self.updated_entities;
        entities.extend(self.new_entities);
        entities
    }
}

/// What happened during a pass, for logging and diagnostics
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformReport {
    pub decomposed: Vec<String>,
    pub dropped_columns: Vec<(String, Column)>,
    pub flagged_foreign_keys: usize,
    pub synthesized_dimensions: usize,
    pub synthesized_date_dimension: bool,
}

/// Runs transformation passes with an injected id generator
#[derive(Clone, Debug, Default)]
pub struct Transformer<G> {
    ids: G,
}

impl<G: IdGenerator> Transformer<G> {
    pub fn new(ids: G) -> Self {
        Self { ids }
    }

    pub fn into_ids(self) -> G {
        self.ids
    }

    pub fn transform(&mut self, entities: &[Entity]) -> TransformOutcome {
        self.transform_with_report(entities).0
    }

    pub fn transform_with_report(
        &mut self,
        entities: &[Entity],
    ) -> (TransformOutcome, TransformReport) {
        let mut outcome = TransformOutcome::default();
        let mut report = TransformReport::default();

        let classification = classify(entities);
        let facts = classification.facts();
        tracing::debug!(
            "Classified {} entities: {} fact, {} dimension candidates",
            entities.len(),
            facts.len(),
            classification.dimensions().len()
        );

        for (index, entity) in entities.iter().enumerate() {
            if exceeds_threshold(entity) && !classification.is_fact(index) {
                let decomposition = decompose(entity, &mut self.ids);
                report.decomposed.push(entity.id.clone());
                report.dropped_columns.extend(
                    decomposition
                        .dropped
                        .into_iter()
                        .map(|column| (entity.id.clone(), column)),
                );
                outcome.updated_entities.push(decomposition.main);
                outcome.new_entities.extend(decomposition.detail);
            } else {
                let optimized = optimize_entity(entity, entities);
                report.flagged_foreign_keys += optimized
                    .columns
                    .iter()
                    .zip(entity.columns.iter())
                    .filter(|(after, before)| after.is_foreign_key && !before.is_foreign_key)
                    .count();
                outcome.updated_entities.push(optimized);
            }
        }

        for fact in facts {
            let dimensions = synthesize_missing_dimensions(
                fact,
                entities.iter().chain(outcome.new_entities.iter()),
                &mut self.ids,
            );
            report.synthesized_dimensions += dimensions.len();
            outcome.new_entities.extend(dimensions);
        }

        // Date tables are looked up in the input only
        if has_temporal_columns(entities) && !has_date_entity(entities) {
            outcome.new_entities.push(date_dimension(&mut self.ids));
            report.synthesized_date_dimension = true;
        }

        tracing::info!(
            "Transform complete: {} updated, {} new, {} decomposed, {} foreign keys flagged",
            outcome.updated_entities.len(),
            outcome.new_entities.len(),
            report.decomposed.len(),
            report.flagged_foreign_keys
        );

        (outcome, report)
    }
}

/// Transform with random ids
pub fn transform(entities: &[Entity]) -> TransformOutcome {
    Transformer::new(UuidIds).transform(entities)
}
