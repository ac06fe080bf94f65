//! Level and run state machine
//!
//! Playing -> LevelTransition -> Playing -> ... -> GameOver | Victory.
//! GameOver wins over everything else on the tick lives run out.

use serde::Serialize;

use super::state::{GamePhase, LevelTransition, RunState};
use crate::tuning::Tuning;

/// Level-scaled spawn and movement parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Difficulty {
    /// Global fall speed (px/tick), shared by every live object
    pub fall_speed: f32,
    /// Concurrent object cap
    pub max_objects: usize,
}

impl Difficulty {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            fall_speed: tuning.initial_fall_speed,
            max_objects: tuning.initial_max_objects,
        }
    }

    fn step_up(&mut self, tuning: &Tuning) {
        self.fall_speed += tuning.fall_speed_step;
        self.max_objects = (self.max_objects + 1).min(tuning.max_objects_cap);
    }
}

/// Verdict of the end-of-tick check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunCheck {
    Continue,
    GameOver,
    Victory,
    LevelComplete { next_level: u8 },
}

/// Decide whether the run should leave `Playing`
pub fn check_run(state: &RunState, final_level: u8) -> RunCheck {
    if state.lives == 0 {
        RunCheck::GameOver
    } else if state.score >= state.target_score {
        if state.level >= final_level {
            RunCheck::Victory
        } else {
            RunCheck::LevelComplete {
                next_level: state.level + 1,
            }
        }
    } else {
        RunCheck::Continue
    }
}

/// Freeze the run on the fact screen
pub fn begin_transition(state: &mut RunState, next_level: u8, fact: &'static str, now_ms: f64) {
    state.phase = GamePhase::LevelTransition;
    state.transition = Some(LevelTransition {
        started_ms: now_ms,
        next_level,
        fact,
    });
}

/// Finish a pending transition once its delay has elapsed.
/// Returns the new level when it does.
pub fn finish_transition(
    state: &mut RunState,
    difficulty: &mut Difficulty,
    tuning: &Tuning,
    now_ms: f64,
) -> Option<u8> {
    let (started_ms, next_level) = state
        .transition
        .as_ref()
        .map(|t| (t.started_ms, t.next_level))?;
    if now_ms - started_ms < tuning.level_transition_ms {
        return None;
    }

    state.level = next_level;
    state.target_score += tuning.target_step;
    state.phase = GamePhase::Playing;
    state.transition = None;
    difficulty.step_up(tuning);
    Some(state.level)
}
