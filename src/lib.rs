//! Veggie Catch - a falling-object catcher arcade game
//!
//! Core modules:
//! - `sim`: Per-frame simulation (spawning, movement, collisions, scoring, levels)
//! - `tuning`: Data-driven game balance and the archetype table
//! - `settings`: Host preferences (particle quality)
//! - `facts`: Educational facts shown between levels
//! - `web`: wasm32 host bindings

pub mod error;
pub mod facts;
pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::ConfigError;
pub use settings::{QualityPreset, Settings};
pub use sim::{Engine, EntityView, GameEvent, GamePhase, RunState, TickInput, TickReport};
pub use tuning::{ArchetypeConfig, ArchetypeTable, Category, Tuning};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const PLAYFIELD_WIDTH: f32 = 1200.0;
    pub const PLAYFIELD_HEIGHT: f32 = 800.0;

    /// Catcher defaults
    pub const CATCHER_WIDTH: f32 = 100.0;
    pub const CATCHER_HEIGHT: f32 = 150.0;
    /// Gap between the catcher's bottom edge and the playfield floor
    pub const CATCHER_FLOOR_GAP: f32 = 20.0;
    /// Horizontal speed the host applies while a direction is held (px/tick)
    pub const CATCHER_SPEED: f32 = 10.0;

    /// Falling objects are square
    pub const OBJECT_SIZE: f32 = 70.0;
    /// Fall speed at level 1 (px/tick)
    pub const INITIAL_FALL_SPEED: f32 = 3.0;
    /// Fall speed added on every level-up
    pub const FALL_SPEED_STEP: f32 = 1.0;
    /// Concurrent object cap at level 1
    pub const INITIAL_MAX_OBJECTS: usize = 3;
    /// Upper bound for the concurrent object cap
    pub const MAX_OBJECTS_CAP: usize = 5;
    /// Ticks between spawns
    pub const SPAWN_DELAY_TICKS: u32 = 50;

    /// Cumulative spawn probabilities (good < 0.50, bonus < 0.65, else bad)
    pub const SPAWN_GOOD: f32 = 0.50;
    pub const SPAWN_BONUS: f32 = 0.65;

    pub const INITIAL_LIVES: u8 = 5;
    pub const MAX_LIVES: u8 = 8;

    pub const LEVEL_1_TARGET: u32 = 50;
    pub const TARGET_STEP: u32 = 100;
    pub const FINAL_LEVEL: u8 = 3;
    /// Real-time pause between levels (ms)
    pub const LEVEL_TRANSITION_MS: f64 = 4000.0;

    /// Silence after the last catch that breaks a combo (ms)
    pub const COMBO_TIMEOUT_MS: f64 = 2000.0;
    /// Good catches per multiplier step
    pub const COMBO_STEP: u32 = 3;
    pub const MAX_COMBO_MULTIPLIER: u32 = 5;

    /// Particle lifetime (ticks)
    pub const PARTICLE_LIFETIME: u32 = 30;
}
