//! Auto-layout module for automatic entity arrangement
//!
//! Entities are packed into a roughly square grid sized to the canvas. Root
//! entities (no foreign keys) fill the first slots, then the rest in order of
//! descending foreign-key count, so the most connected entities end up last.

use super::{Entity, Position};

/// Layout configuration
#[derive(Clone, Debug)]
pub struct LayoutConfig {
    /// Canvas width the grid is spread over
    pub canvas_width: f64,
    /// Canvas height the grid is spread over
    pub canvas_height: f64,
    /// Estimated entity width for spacing calculations
    pub entity_width: f64,
    /// Estimated entity height for spacing calculations
    pub entity_height: f64,
    /// Lower bound for horizontal spacing
    pub min_spacing_x: f64,
    /// Lower bound for vertical spacing
    pub min_spacing_y: f64,
    /// Columns per entity count: `cols = ceil(sqrt(n * aspect))`
    pub aspect: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1600.0,
            canvas_height: 1200.0,
            entity_width: 280.0,
            entity_height: 200.0,
            min_spacing_x: 120.0,
            min_spacing_y: 100.0,
            aspect: 1.2,
        }
    }
}

/// Result of auto-layout calculation
#[derive(Clone, Debug, Default)]
pub struct LayoutResult {
    /// New positions for each entity: (entity id, position)
    pub positions: Vec<(String, Position)>,
}

impl LayoutResult {
    pub fn position_of(&self, entity_id: &str) -> Option<Position> {
        self.positions
            .iter()
            .find(|(id, _)| id == entity_id)
            .map(|(_, position)| *position)
    }
}

/// Calculates grid positions for all entities
pub fn calculate_grid_layout(entities: &[Entity], config: &LayoutConfig) -> LayoutResult {
    if entities.is_empty() {
        return LayoutResult::default();
    }

    let count = entities.len();
    let cols = ((count as f64 * config.aspect).sqrt().ceil() as usize).max(1);
    let rows = count.div_ceil(cols);

    let spacing_x = config
        .min_spacing_x
        .max((config.canvas_width - cols as f64 * config.entity_width) / (cols as f64 + 1.0));
    let spacing_y = config
        .min_spacing_y
        .max((config.canvas_height - rows as f64 * config.entity_height) / (rows as f64 + 1.0));

    let (mut ordered, mut connected): (Vec<&Entity>, Vec<&Entity>) =
        entities.iter().partition(|e| e.foreign_key_count() == 0);
    // sort_by is stable: ties keep input order
    connected.sort_by(|a, b| b.foreign_key_count().cmp(&a.foreign_key_count()));
    ordered.extend(connected);

    let positions = ordered
        .into_iter()
        .enumerate()
        .map(|(index, entity)| {
            let row = index / cols;
            let col = index % cols;
            let x = spacing_x + col as f64 * (config.entity_width + spacing_x);
            let y = spacing_y + row as f64 * (config.entity_height + spacing_y);
            (entity.id.clone(), Position::new(x, y))
        })
        .collect();

    LayoutResult { positions }
}

/// Grid positions with the default configuration
pub fn calculate_auto_layout(entities: &[Entity]) -> LayoutResult {
    calculate_grid_layout(entities, &LayoutConfig::default())
}

/// Round a position to the nearest grid intersection
pub fn snap_to_grid(position: Position, grid_size: f64) -> Position {
    Position::new(
        (position.x / grid_size).round() * grid_size,
        (position.y / grid_size).round() * grid_size,
    )
}

/// Applies the calculated layout, returning repositioned copies
pub fn apply_layout(entities: &[Entity], layout: &LayoutResult) -> Vec<Entity> {
    entities
        .iter()
        .map(|entity| match layout.position_of(&entity.id) {
            Some(position) => Entity {
                position,
                ..entity.clone()
            },
            None => entity.clone(),
        })
        .collect()
}

/// Convenience function to auto-layout with default config
pub fn auto_layout(entities: &[Entity]) -> Vec<Entity> {
    apply_layout(entities, &calculate_auto_layout(entities))
}
