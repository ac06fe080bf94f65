//! Spawn table and spawn gate

use glam::Vec2;
use serde::Serialize;

use super::random::RandomSource;
use super::state::FallingObject;
use crate::tuning::{Archetype, ArchetypeTable, Category, Tuning};

/// Map a uniform draw onto the cumulative category table
pub fn pick_category(draw: f32, tuning: &Tuning) -> Category {
    if draw < tuning.spawn_good {
        Category::Good
    } else if draw < tuning.spawn_bonus {
        Category::Bonus
    } else {
        Category::Bad
    }
}

/// Two draws: one for the category, one for the archetype within it
pub fn pick_archetype<'a>(
    table: &'a ArchetypeTable,
    tuning: &Tuning,
    rng: &mut impl RandomSource,
) -> &'a Archetype {
    let category = pick_category(rng.next_unit(), tuning);
    // Table construction guarantees every category is non-empty
    let choices = table.in_category(category);
    let index = ((rng.next_unit() * choices.len() as f32) as usize).min(choices.len() - 1);
    &choices[index]
}

/// Build an object at the top edge, fully inside the playfield width
pub fn spawn_object(
    id: u32,
    archetype: &Archetype,
    tuning: &Tuning,
    fall_speed: f32,
    rng: &mut impl RandomSource,
) -> FallingObject {
    let x = rng.next_unit() * (tuning.playfield_width - tuning.object_size);
    FallingObject {
        id,
        pos: Vec2::new(x, 0.0),
        size: Vec2::splat(tuning.object_size),
        speed: fall_speed,
        archetype: archetype.name.clone(),
        effect: archetype.effect,
    }
}

/// Spawn throttle: fires once `delay` ticks have passed and there is room
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpawnGate {
    counter: u32,
}

impl SpawnGate {
    /// Advance one tick. Returns true (and rewinds) when a spawn is due.
    pub fn tick(&mut self, live_objects: usize, cap: usize, delay: u32) -> bool {
        self.counter = self.counter.saturating_add(1);
        if live_objects < cap && self.counter >= delay {
            self.counter = 0;
            true
        } else {
            false
        }
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }
}
