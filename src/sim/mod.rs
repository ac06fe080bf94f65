//! Simulation module
//!
//! All gameplay logic lives here:
//! - One ordered tick per frame, no hidden callbacks
//! - Randomness and time are injected by the host
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod events;
pub mod level;
pub mod random;
pub mod scoring;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, rects_overlap};
pub use events::{GameEvent, SoundCue};
pub use level::{Difficulty, RunCheck};
pub use random::{RandomSource, ScriptedRandom};
pub use scoring::combo_multiplier;
pub use state::{
    Catcher, FallingObject, GamePhase, LevelTransition, MAX_PARTICLES, Particle, ParticlePool,
    RunState,
};
pub use tick::{Engine, EntityView, TickInput, TickReport};
