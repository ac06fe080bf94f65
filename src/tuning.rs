//! Data-driven game balance
//!
//! `Tuning` holds every number the simulation reads; `ArchetypeTable` holds
//! the falling-object catalogue. Both are immutable once handed to the engine,
//! so retuning never touches simulation code.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Broad class of a falling object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Must be caught; missing one costs a life
    Good,
    /// Optional pickup (combo jump or extra life)
    Bonus,
    /// Hazard; catching one costs score and lives
    Bad,
}

/// Archetype configuration as authored (JSON-friendly)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchetypeConfig {
    /// Score delta on catch (negative for hazards)
    pub points: i32,
    /// Life delta on catch
    #[serde(default)]
    pub lives: i32,
    pub category: Category,
    /// Multiplier forced on catch (combo bonuses only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combo: Option<u32>,
}

/// What catching an object does, validated from its `ArchetypeConfig`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CatchEffect {
    /// Score `points` times the active multiplier, extend the combo
    Good { points: u32 },
    /// Flat score and a forced multiplier
    ComboBonus { points: u32, jump_to: u32 },
    /// Restore lives (up to the maximum)
    LifeBonus { lives: u8, points: u32 },
    /// Lose score and lives, break the combo. Both deltas are <= 0.
    Bad { points: i32, lives: i32 },
}

impl CatchEffect {
    pub fn category(&self) -> Category {
        match self {
            CatchEffect::Good { .. } => Category::Good,
            CatchEffect::ComboBonus { .. } | CatchEffect::LifeBonus { .. } => Category::Bonus,
            CatchEffect::Bad { .. } => Category::Bad,
        }
    }
}

impl ArchetypeConfig {
    /// Validate into a `CatchEffect`, rejecting contradictory values
    pub fn effect(&self, name: &str) -> Result<CatchEffect, ConfigError> {
        let invalid = |reason| ConfigError::InvalidArchetype {
            name: name.to_string(),
            reason,
        };

        match self.category {
            Category::Good => {
                if self.points <= 0 {
                    return Err(invalid("good archetypes must award points"));
                }
                if self.lives != 0 || self.combo.is_some() {
                    return Err(invalid("good archetypes only carry points"));
                }
                Ok(CatchEffect::Good {
                    points: self.points as u32,
                })
            }
            Category::Bonus => {
                if self.points < 0 {
                    return Err(invalid("bonus archetypes cannot cost points"));
                }
                match self.combo {
                    Some(jump_to) => {
                        if !(1..=MAX_COMBO_MULTIPLIER).contains(&jump_to) {
                            return Err(invalid("combo jump outside the multiplier range"));
                        }
                        if self.lives != 0 {
                            return Err(invalid("combo bonuses cannot change lives"));
                        }
                        Ok(CatchEffect::ComboBonus {
                            points: self.points as u32,
                            jump_to,
                        })
                    }
                    None => {
                        if self.lives <= 0 || self.lives > u8::MAX as i32 {
                            return Err(invalid("bonus without combo must restore lives"));
                        }
                        Ok(CatchEffect::LifeBonus {
                            lives: self.lives as u8,
                            points: self.points as u32,
                        })
                    }
                }
            }
            Category::Bad => {
                if self.points > 0 || self.lives > 0 {
                    return Err(invalid("bad archetypes must not award points or lives"));
                }
                if self.points == 0 && self.lives == 0 {
                    return Err(invalid("bad archetypes must cost something"));
                }
                if self.combo.is_some() {
                    return Err(invalid("bad archetypes cannot carry a combo jump"));
                }
                Ok(CatchEffect::Bad {
                    points: self.points,
                    lives: self.lives,
                })
            }
        }
    }
}

/// A named, validated archetype
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Archetype {
    pub name: String,
    pub effect: CatchEffect,
}

/// Archetypes grouped by category, in name order
#[derive(Debug, Clone)]
pub struct ArchetypeTable {
    good: Vec<Archetype>,
    bonus: Vec<Archetype>,
    bad: Vec<Archetype>,
}

impl ArchetypeTable {
    /// Build from authored configs. Every category needs at least one archetype.
    pub fn from_configs(configs: &BTreeMap<String, ArchetypeConfig>) -> Result<Self, ConfigError> {
        let mut table = Self {
            good: Vec::new(),
            bonus: Vec::new(),
            bad: Vec::new(),
        };

        for (name, config) in configs {
            let effect = config.effect(name)?;
            let archetype = Archetype {
                name: name.clone(),
                effect,
            };
            match effect.category() {
                Category::Good => table.good.push(archetype),
                Category::Bonus => table.bonus.push(archetype),
                Category::Bad => table.bad.push(archetype),
            }
        }

        for category in [Category::Good, Category::Bonus, Category::Bad] {
            if table.in_category(category).is_empty() {
                return Err(ConfigError::EmptyCategory(category));
            }
        }

        Ok(table)
    }

    /// Parse a JSON object of `name -> ArchetypeConfig`
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let configs: BTreeMap<String, ArchetypeConfig> = serde_json::from_str(json)?;
        Self::from_configs(&configs)
    }

    /// The stock vegetable catalogue
    pub fn default_configs() -> BTreeMap<String, ArchetypeConfig> {
        let entry = |points, lives, category, combo| ArchetypeConfig {
            points,
            lives,
            category,
            combo,
        };
        BTreeMap::from([
            ("dill".to_string(), entry(5, 0, Category::Good, None)),
            ("carrot".to_string(), entry(2, 0, Category::Good, None)),
            ("zucchini".to_string(), entry(3, 0, Category::Good, None)),
            ("pepper".to_string(), entry(10, 0, Category::Bonus, Some(2))),
            ("heart".to_string(), entry(0, 1, Category::Bonus, None)),
            ("stone".to_string(), entry(-10, -2, Category::Bad, None)),
            ("chocolate".to_string(), entry(-5, -1, Category::Bad, None)),
        ])
    }

    pub fn in_category(&self, category: Category) -> &[Archetype] {
        match category {
            Category::Good => &self.good,
            Category::Bonus => &self.bonus,
            Category::Bad => &self.bad,
        }
    }

    /// Look up an archetype by name
    pub fn get(&self, name: &str) -> Option<&Archetype> {
        self.good
            .iter()
            .chain(&self.bonus)
            .chain(&self.bad)
            .find(|a| a.name == name)
    }
}

impl Default for ArchetypeTable {
    fn default() -> Self {
        Self::from_configs(&Self::default_configs()).expect("stock archetypes are valid")
    }
}

/// Every number the simulation reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,

    // === Catcher ===
    pub catcher_width: f32,
    pub catcher_height: f32,
    pub catcher_floor_gap: f32,

    // === Falling objects ===
    pub object_size: f32,
    pub initial_fall_speed: f32,
    pub fall_speed_step: f32,
    pub initial_max_objects: usize,
    pub max_objects_cap: usize,
    pub spawn_delay_ticks: u32,
    /// Cumulative probability bound of the good bucket
    pub spawn_good: f32,
    /// Cumulative probability bound of the bonus bucket
    pub spawn_bonus: f32,

    // === Run ===
    pub initial_lives: u8,
    pub max_lives: u8,
    pub level_1_target: u32,
    pub target_step: u32,
    pub final_level: u8,
    pub level_transition_ms: f64,

    // === Combo ===
    pub combo_timeout_ms: f64,

    // === Effects ===
    pub particle_lifetime: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,

            catcher_width: CATCHER_WIDTH,
            catcher_height: CATCHER_HEIGHT,
            catcher_floor_gap: CATCHER_FLOOR_GAP,

            object_size: OBJECT_SIZE,
            initial_fall_speed: INITIAL_FALL_SPEED,
            fall_speed_step: FALL_SPEED_STEP,
            initial_max_objects: INITIAL_MAX_OBJECTS,
            max_objects_cap: MAX_OBJECTS_CAP,
            spawn_delay_ticks: SPAWN_DELAY_TICKS,
            spawn_good: SPAWN_GOOD,
            spawn_bonus: SPAWN_BONUS,

            initial_lives: INITIAL_LIVES,
            max_lives: MAX_LIVES,
            level_1_target: LEVEL_1_TARGET,
            target_step: TARGET_STEP,
            final_level: FINAL_LEVEL,
            level_transition_ms: LEVEL_TRANSITION_MS,

            combo_timeout_ms: COMBO_TIMEOUT_MS,

            particle_lifetime: PARTICLE_LIFETIME,
        }
    }
}

impl Tuning {
    /// Parse from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let check = |ok: bool, field, reason| {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::InvalidTuning { field, reason })
            }
        };

        check(
            self.playfield_width > 0.0 && self.playfield_height > 0.0,
            "playfield",
            "dimensions must be positive",
        )?;
        check(
            self.catcher_width > 0.0 && self.catcher_width <= self.playfield_width,
            "catcher_width",
            "must be positive and fit the playfield",
        )?;
        check(
            self.catcher_height > 0.0
                && self.catcher_floor_gap >= 0.0
                && self.catcher_height + self.catcher_floor_gap <= self.playfield_height,
            "catcher_height",
            "catcher must fit above the floor",
        )?;
        check(
            self.object_size > 0.0 && self.object_size < self.playfield_width,
            "object_size",
            "must be positive and narrower than the playfield",
        )?;
        check(
            self.initial_fall_speed > 0.0,
            "initial_fall_speed",
            "objects must fall",
        )?;
        check(
            self.fall_speed_step > 0.0,
            "fall_speed_step",
            "each level must fall faster",
        )?;
        check(
            self.initial_max_objects > 0 && self.initial_max_objects <= self.max_objects_cap,
            "initial_max_objects",
            "must be positive and within max_objects_cap",
        )?;
        check(
            0.0 < self.spawn_good && self.spawn_good < self.spawn_bonus && self.spawn_bonus <= 1.0,
            "spawn_good",
            "need 0 < spawn_good < spawn_bonus <= 1",
        )?;
        check(
            self.initial_lives > 0 && self.initial_lives <= self.max_lives,
            "initial_lives",
            "must be positive and within max_lives",
        )?;
        check(self.final_level > 0, "final_level", "need at least one level")?;
        check(
            self.level_1_target > 0,
            "level_1_target",
            "a zero target completes the level instantly",
        )?;
        check(
            self.target_step > 0,
            "target_step",
            "each level must raise the target",
        )?;
        check(
            self.target_step
                .checked_mul(u32::from(self.final_level - 1))
                .and_then(|extra| extra.checked_add(self.level_1_target))
                .is_some(),
            "target_step",
            "final level target overflows",
        )?;
        check(
            self.level_transition_ms >= 0.0 && self.combo_timeout_ms >= 0.0,
            "level_transition_ms",
            "durations cannot be negative",
        )?;
        check(
            self.particle_lifetime > 0,
            "particle_lifetime",
            "must be positive",
        )?;
        Ok(())
    }

    /// Score needed to finish `level` (1-based)
    pub fn target_for_level(&self, level: u8) -> u32 {
        self.level_1_target + self.target_step * u32::from(level.saturating_sub(1))
    }

    /// Top edge of the catcher
    pub fn catcher_y(&self) -> f32 {
        self.playfield_height - self.catcher_height - self.catcher_floor_gap
    }
}
