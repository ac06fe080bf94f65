//! Scoring and combo engine
//!
//! Turns catch and miss events into score, life and combo changes. The
//! multiplier is always derived from the combo counter:
//! `min(counter / 3 + 1, 5)` while a combo is running, 1 otherwise.

use super::state::RunState;
use crate::consts::{COMBO_STEP, MAX_COMBO_MULTIPLIER};
use crate::tuning::CatchEffect;

/// Particle colors (0xRRGGBB)
pub const COLOR_COMBO_GOLD: u32 = 0xFFD700;
pub const COLOR_ORANGE: u32 = 0xFFA500;
pub const COLOR_PINK: u32 = 0xFF69B4;
pub const COLOR_RED: u32 = 0xFF0000;

/// Multiplier for a given combo counter
#[inline]
pub fn combo_multiplier(counter: u32) -> u32 {
    if counter == 0 {
        1
    } else {
        (counter / COMBO_STEP + 1).min(MAX_COMBO_MULTIPLIER)
    }
}

/// Particle burst requested by a catch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Burst {
    pub color: u32,
    pub count: usize,
}

/// What a catch changed, for event reporting
#[derive(Debug, Clone, PartialEq)]
pub struct CatchOutcome {
    /// Score change after clamping
    pub score_delta: i64,
    /// New multiplier, if it rose
    pub combo_up: Option<u32>,
    /// A running combo was broken
    pub combo_lost: bool,
    /// Lives after a life bonus
    pub lives_restored: Option<u8>,
    pub burst: Burst,
}

/// Apply a caught object's effect
pub fn apply_catch(state: &mut RunState, effect: &CatchEffect, now_ms: f64) -> CatchOutcome {
    let score_before = state.score;
    let multiplier_before = state.combo_multiplier;
    let mut combo_lost = false;
    let mut lives_restored = None;

    let burst = match *effect {
        CatchEffect::Good { points } => {
            // Score with the multiplier active at catch time, then extend the combo
            state.adjust_score(i64::from(points) * i64::from(multiplier_before));
            state.combo_counter += 1;
            state.combo_multiplier = combo_multiplier(state.combo_counter);
            state.last_catch_ms = now_ms;
            Burst {
                color: COLOR_COMBO_GOLD,
                count: 5,
            }
        }
        CatchEffect::ComboBonus { points, jump_to } => {
            // Counter jumps by one multiplier step, and at least far enough
            // that the formula yields `jump_to`
            let floor = COMBO_STEP * (jump_to - 1);
            state.combo_counter = (state.combo_counter + COMBO_STEP).max(floor);
            state.combo_multiplier = combo_multiplier(state.combo_counter);
            state.adjust_score(i64::from(points));
            state.last_catch_ms = now_ms;
            Burst {
                color: COLOR_ORANGE,
                count: 10,
            }
        }
        CatchEffect::LifeBonus { lives, points } => {
            state.adjust_lives(i32::from(lives));
            state.adjust_score(i64::from(points));
            lives_restored = Some(state.lives);
            Burst {
                color: COLOR_PINK,
                count: 8,
            }
        }
        CatchEffect::Bad { points, lives } => {
            state.adjust_score(i64::from(points));
            state.adjust_lives(lives);
            combo_lost = state.combo_counter > 0;
            state.reset_combo();
            Burst {
                color: COLOR_RED,
                count: 6,
            }
        }
    };

    CatchOutcome {
        score_delta: i64::from(state.score) - i64::from(score_before),
        combo_up: (state.combo_multiplier > multiplier_before).then_some(state.combo_multiplier),
        combo_lost,
        lives_restored,
        burst,
    }
}

/// A good object hit the floor. Returns true if a combo was broken.
pub fn apply_miss(state: &mut RunState) -> bool {
    let combo_lost = state.combo_counter > 0;
    state.adjust_lives(-1);
    state.reset_combo();
    combo_lost
}

/// Break the combo once `timeout_ms` has passed since the last catch.
/// Returns true on the tick the reset happens.
pub fn check_combo_timeout(state: &mut RunState, now_ms: f64, timeout_ms: f64) -> bool {
    if state.combo_counter > 0 && now_ms - state.last_catch_ms > timeout_ms {
        state.reset_combo();
        true
    } else {
        false
    }
}
