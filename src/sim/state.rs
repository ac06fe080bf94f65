//! Run state and entity types
//!
//! Everything the tick mutates lives here. Snapshots handed to hosts are
//! plain clones of these structs.

use std::collections::VecDeque;

use glam::Vec2;
use serde::Serialize;

use super::collision::Rect;
use crate::tuning::{Category, CatchEffect, Tuning};

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Host-requested pause; nothing moves
    Paused,
    /// Between-level fact screen; simulation frozen until the delay elapses
    LevelTransition,
    /// Lives ran out (terminal)
    GameOver,
    /// Final level cleared (terminal)
    Victory,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Victory)
    }
}

/// Pending level change while in `GamePhase::LevelTransition`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelTransition {
    /// Timestamp (ms) the transition began
    pub started_ms: f64,
    /// Level that starts once the delay elapses
    pub next_level: u8,
    pub fact: &'static str,
}

/// Score, lives, level and combo bookkeeping for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunState {
    pub score: u32,
    pub lives: u8,
    pub max_lives: u8,
    /// Current level (1-based)
    pub level: u8,
    /// Score needed to finish the current level
    pub target_score: u32,
    /// Consecutive good catches
    pub combo_counter: u32,
    /// Score multiplier derived from the combo counter (1..=5)
    pub combo_multiplier: u32,
    /// Timestamp (ms) of the last catch that fed the combo
    pub last_catch_ms: f64,
    pub phase: GamePhase,
    /// Set only while `phase == LevelTransition`
    pub transition: Option<LevelTransition>,
}

impl RunState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            lives: tuning.initial_lives,
            max_lives: tuning.max_lives,
            level: 1,
            target_score: tuning.target_for_level(1),
            combo_counter: 0,
            combo_multiplier: 1,
            last_catch_ms: 0.0,
            phase: GamePhase::Playing,
            transition: None,
        }
    }

    /// Break the combo
    pub fn reset_combo(&mut self) {
        self.combo_counter = 0;
        self.combo_multiplier = 1;
    }

    /// Add a (possibly negative) life delta, clamped to [0, max_lives]
    pub fn adjust_lives(&mut self, delta: i32) {
        let lives = (i32::from(self.lives) + delta).clamp(0, i32::from(self.max_lives));
        self.lives = lives as u8;
    }

    /// Add a (possibly negative) score delta, clamped at zero
    pub fn adjust_score(&mut self, delta: i64) {
        let score = (i64::from(self.score) + delta).clamp(0, i64::from(u32::MAX));
        self.score = score as u32;
    }
}

/// The player's catcher
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catcher {
    /// Left edge
    pub x: f32,
    /// Top edge (fixed above the floor)
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Horizontal velocity from input (px/tick)
    pub velocity: f32,
}

impl Catcher {
    /// Centered on the floor
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            x: (tuning.playfield_width - tuning.catcher_width) / 2.0,
            y: tuning.catcher_y(),
            width: tuning.catcher_width,
            height: tuning.catcher_height,
            velocity: 0.0,
        }
    }

    /// Move by `velocity`, staying inside [0, playfield_width]
    pub fn steer(&mut self, velocity: f32, playfield_width: f32) {
        self.velocity = velocity;
        self.x = (self.x + velocity).clamp(0.0, playfield_width - self.width);
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// A falling object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallingObject {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Fall speed at spawn time. Movement uses the engine's current speed.
    pub speed: f32,
    pub archetype: String,
    pub effect: CatchEffect,
}

impl FallingObject {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn category(&self) -> Category {
        self.effect.category()
    }

    /// Burst origin: top center
    pub fn burst_origin(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y)
    }
}

/// A particle for visual feedback (not gameplay-affecting)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0xRRGGBB
    pub color: u32,
    pub radius: f32,
    /// Ticks left
    pub life: u32,
    pub max_life: u32,
}

impl Particle {
    /// Opacity for rendering (1.0 fresh, approaching 0.0 at death)
    pub fn fade(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }
}

/// Default particle ring capacity
pub const MAX_PARTICLES: usize = 256;

/// Bounded particle ring; the oldest particle is evicted when full
#[derive(Debug, Clone, Serialize)]
pub struct ParticlePool {
    particles: VecDeque<Particle>,
    #[serde(skip)]
    capacity: usize,
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::with_capacity(MAX_PARTICLES)
    }
}

impl ParticlePool {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change capacity, dropping the oldest particles if shrinking
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.particles.len() > capacity {
            self.particles.pop_front();
        }
    }

    pub fn push(&mut self, particle: Particle) {
        if self.capacity == 0 {
            return;
        }
        if self.particles.len() >= self.capacity {
            self.particles.pop_front();
        }
        self.particles.push_back(particle);
    }

    /// Linear step: move by velocity, age one tick, drop the dead
    pub fn advance(&mut self) {
        for particle in self.particles.iter_mut() {
            particle.pos += particle.vel;
            particle.life = particle.life.saturating_sub(1);
        }
        self.particles.retain(|p| p.life > 0);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}
