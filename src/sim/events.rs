//! Events reported by the tick
//!
//! Renderers and the audio host react to these instead of diffing state.

use serde::Serialize;

use crate::tuning::Category;

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// A new object entered at the top
    Spawned { id: u32, archetype: String },
    /// The catcher intercepted an object
    Caught {
        id: u32,
        archetype: String,
        category: Category,
        /// Score change actually applied (after clamping)
        score_delta: i64,
    },
    /// A good object reached the floor
    Missed { id: u32, archetype: String },
    /// The combo multiplier rose
    ComboUp { multiplier: u32 },
    /// An active combo was broken (timeout, miss or hazard)
    ComboLost,
    /// A bonus restored lives
    LifeRestored { lives: u8 },
    /// Target reached; the fact screen is up
    LevelComplete { next_level: u8, fact: &'static str },
    /// The fact screen closed and a new level began
    LevelUp { level: u8 },
    GameOver { score: u32, level: u8 },
    Victory { score: u32 },
    Paused,
    Resumed,
}

/// Sound the audio host should play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SoundCue {
    Catch,
    Miss,
    Combo,
    Bonus,
    HealthRestore,
    BadObject,
    FunFact,
    GameOver,
    Win,
}

impl SoundCue {
    /// Asset key used by the audio host
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Catch => "catch",
            SoundCue::Miss => "miss",
            SoundCue::Combo => "combo",
            SoundCue::Bonus => "bonus",
            SoundCue::HealthRestore => "healthRestore",
            SoundCue::BadObject => "badObject",
            SoundCue::FunFact => "funFact",
            SoundCue::GameOver => "gameOver",
            SoundCue::Win => "win",
        }
    }
}

impl GameEvent {
    pub fn sound(&self) -> Option<SoundCue> {
        match self {
            GameEvent::Caught { category, .. } => Some(match category {
                Category::Good => SoundCue::Catch,
                Category::Bonus => SoundCue::Bonus,
                Category::Bad => SoundCue::BadObject,
            }),
            GameEvent::Missed { .. } => Some(SoundCue::Miss),
            GameEvent::ComboUp { .. } => Some(SoundCue::Combo),
            GameEvent::LifeRestored { .. } => Some(SoundCue::HealthRestore),
            GameEvent::LevelComplete { .. } => Some(SoundCue::FunFact),
            GameEvent::GameOver { .. } => Some(SoundCue::GameOver),
            GameEvent::Victory { .. } => Some(SoundCue::Win),
            GameEvent::Spawned { .. }
            | GameEvent::ComboLost
            | GameEvent::LevelUp { .. }
            | GameEvent::Paused
            | GameEvent::Resumed => None,
        }
    }
}
