//! Per-frame simulation tick
//!
//! `Engine` owns the whole simulation and advances it one frame per `tick`
//! call, always in the same order:
//! input -> catcher -> spawn gate -> movement -> collisions/misses ->
//! combo timeout -> run-end check.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::collision::rects_overlap;
use super::events::GameEvent;
use super::level::{self, Difficulty, RunCheck};
use super::random::RandomSource;
use super::scoring::{self, Burst};
use super::spawn::{self, SpawnGate};
use super::state::{Catcher, FallingObject, GamePhase, Particle, ParticlePool, RunState};
use crate::consts::CATCHER_SPEED;
use crate::error::ConfigError;
use crate::facts;
use crate::tuning::{ArchetypeTable, Category, Tuning};

/// Input for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Catcher horizontal velocity (px/tick); zero when no direction is held
    pub velocity: f32,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    pub fn moving(velocity: f32) -> Self {
        Self {
            velocity,
            ..Default::default()
        }
    }

    /// Arrow-key style input. Holding both keys cancels out.
    pub fn from_keys(left: bool, right: bool) -> Self {
        let velocity = match (left, right) {
            (true, false) => -CATCHER_SPEED,
            (false, true) => CATCHER_SPEED,
            _ => 0.0,
        };
        Self::moving(velocity)
    }
}

/// Result of one tick
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub state: RunState,
    pub events: Vec<GameEvent>,
}

/// Read-only view for renderers
#[derive(Debug, Serialize)]
pub struct EntityView<'a> {
    pub catcher: &'a Catcher,
    pub objects: &'a [FallingObject],
    pub particles: &'a ParticlePool,
}

/// The simulation core
#[derive(Debug)]
pub struct Engine<R: RandomSource = Pcg32> {
    tuning: Tuning,
    archetypes: ArchetypeTable,
    rng: R,
    state: RunState,
    difficulty: Difficulty,
    catcher: Catcher,
    /// Live objects in spawn order
    objects: Vec<FallingObject>,
    particles: ParticlePool,
    spawn_gate: SpawnGate,
    /// Simulated ticks since (re)start, excluding frozen ones
    time_ticks: u64,
    next_id: u32,
}

impl Engine<Pcg32> {
    /// Engine driven by a seeded PCG generator
    pub fn with_seed(
        tuning: Tuning,
        archetypes: ArchetypeTable,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::new(tuning, archetypes, Pcg32::seed_from_u64(seed))
    }
}

impl<R: RandomSource> Engine<R> {
    /// Build an engine. Rejects tuning the simulation cannot run with.
    pub fn new(tuning: Tuning, archetypes: ArchetypeTable, rng: R) -> Result<Self, ConfigError> {
        tuning.validate()?;
        Ok(Self {
            state: RunState::new(&tuning),
            difficulty: Difficulty::new(&tuning),
            catcher: Catcher::new(&tuning),
            objects: Vec::new(),
            particles: ParticlePool::default(),
            spawn_gate: SpawnGate::default(),
            time_ticks: 0,
            next_id: 1,
            tuning,
            archetypes,
            rng,
        })
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn entities(&self) -> EntityView<'_> {
        EntityView {
            catcher: &self.catcher,
            objects: &self.objects,
            particles: &self.particles,
        }
    }

    /// Resize the particle ring (host quality setting)
    pub fn set_particle_capacity(&mut self, capacity: usize) {
        self.particles.set_capacity(capacity);
    }

    /// Reinitialize the run. Tuning, archetypes and particle capacity survive.
    pub fn restart(&mut self) -> RunState {
        log::info!("Restarting run");
        self.state = RunState::new(&self.tuning);
        self.difficulty = Difficulty::new(&self.tuning);
        self.catcher = Catcher::new(&self.tuning);
        self.objects.clear();
        self.particles.clear();
        self.spawn_gate = SpawnGate::default();
        self.time_ticks = 0;
        self.next_id = 1;
        self.state.clone()
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Advance the simulation by one frame
    pub fn tick(&mut self, input: &TickInput, now_ms: f64) -> TickReport {
        let mut events = Vec::new();

        // Pause toggle only applies to live play
        if input.pause {
            match self.state.phase {
                GamePhase::Playing => {
                    self.state.phase = GamePhase::Paused;
                    events.push(GameEvent::Paused);
                    return self.report(events);
                }
                GamePhase::Paused => {
                    self.state.phase = GamePhase::Playing;
                    events.push(GameEvent::Resumed);
                }
                _ => {}
            }
        }

        match self.state.phase {
            GamePhase::Paused | GamePhase::GameOver | GamePhase::Victory => {
                return self.report(events);
            }
            GamePhase::LevelTransition => {
                if let Some(level) = level::finish_transition(
                    &mut self.state,
                    &mut self.difficulty,
                    &self.tuning,
                    now_ms,
                ) {
                    log::info!(
                        "Level {} started: target={}, fall_speed={}, max_objects={}",
                        level,
                        self.state.target_score,
                        self.difficulty.fall_speed,
                        self.difficulty.max_objects
                    );
                    events.push(GameEvent::LevelUp { level });
                }
                return self.report(events);
            }
            GamePhase::Playing => {}
        }

        self.time_ticks += 1;

        // Catcher
        self.catcher.steer(input.velocity, self.tuning.playfield_width);

        // Spawn gate
        if self.spawn_gate.tick(
            self.objects.len(),
            self.difficulty.max_objects,
            self.tuning.spawn_delay_ticks,
        ) {
            self.spawn(&mut events);
        }

        // Movement
        for object in &mut self.objects {
            object.pos.y += self.difficulty.fall_speed;
        }
        self.particles.advance();

        // Collisions and misses
        self.resolve_objects(now_ms, &mut events);

        // Combo timeout
        if scoring::check_combo_timeout(&mut self.state, now_ms, self.tuning.combo_timeout_ms) {
            log::debug!("Combo timed out");
            events.push(GameEvent::ComboLost);
        }

        self.check_run_end(now_ms, &mut events);

        self.report(events)
    }

    fn report(&self, events: Vec<GameEvent>) -> TickReport {
        TickReport {
            state: self.state.clone(),
            events,
        }
    }

    fn spawn(&mut self, events: &mut Vec<GameEvent>) {
        let archetype =
            spawn::pick_archetype(&self.archetypes, &self.tuning, &mut self.rng).clone();
        let id = self.next_entity_id();
        let object = spawn::spawn_object(
            id,
            &archetype,
            &self.tuning,
            self.difficulty.fall_speed,
            &mut self.rng,
        );
        log::debug!("Spawned {} #{} at x={:.0}", object.archetype, id, object.pos.x);
        events.push(GameEvent::Spawned {
            id,
            archetype: archetype.name,
        });
        self.objects.push(object);
    }

    /// Catch overlapping objects, drop the ones past the floor
    fn resolve_objects(&mut self, now_ms: f64, events: &mut Vec<GameEvent>) {
        let catcher = self.catcher.rect();
        let floor = self.tuning.playfield_height;

        for object in std::mem::take(&mut self.objects) {
            if rects_overlap(&catcher, &object.rect()) {
                self.catch_object(object, now_ms, events);
            } else if object.pos.y > floor {
                if object.category() == Category::Good {
                    log::debug!("Missed {} #{}", object.archetype, object.id);
                    if scoring::apply_miss(&mut self.state) {
                        events.push(GameEvent::ComboLost);
                    }
                    events.push(GameEvent::Missed {
                        id: object.id,
                        archetype: object.archetype,
                    });
                }
            } else {
                self.objects.push(object);
            }
        }
    }

    fn catch_object(&mut self, object: FallingObject, now_ms: f64, events: &mut Vec<GameEvent>) {
        let outcome = scoring::apply_catch(&mut self.state, &object.effect, now_ms);
        log::debug!(
            "Caught {} #{}: score {:+} -> {}",
            object.archetype,
            object.id,
            outcome.score_delta,
            self.state.score
        );

        self.emit_burst(object.burst_origin(), outcome.burst);

        events.push(GameEvent::Caught {
            id: object.id,
            category: object.category(),
            archetype: object.archetype,
            score_delta: outcome.score_delta,
        });
        if let Some(multiplier) = outcome.combo_up {
            events.push(GameEvent::ComboUp { multiplier });
        }
        if outcome.combo_lost {
            events.push(GameEvent::ComboLost);
        }
        if let Some(lives) = outcome.lives_restored {
            events.push(GameEvent::LifeRestored { lives });
        }
    }

    fn emit_burst(&mut self, origin: Vec2, burst: Burst) {
        let lifetime = self.tuning.particle_lifetime;
        for _ in 0..burst.count {
            let vel = Vec2::new(
                (self.rng.next_unit() - 0.5) * 4.0,
                (self.rng.next_unit() - 0.5) * 4.0 - 2.0,
            );
            let radius = self.rng.next_unit() * 10.0 + 5.0;
            self.particles.push(Particle {
                pos: origin,
                vel,
                color: burst.color,
                radius,
                life: lifetime,
                max_life: lifetime,
            });
        }
    }

    fn check_run_end(&mut self, now_ms: f64, events: &mut Vec<GameEvent>) {
        match level::check_run(&self.state, self.tuning.final_level) {
            RunCheck::Continue => {}
            RunCheck::GameOver => {
                log::info!(
                    "Game over at level {} with score {}",
                    self.state.level,
                    self.state.score
                );
                self.state.phase = GamePhase::GameOver;
                events.push(GameEvent::GameOver {
                    score: self.state.score,
                    level: self.state.level,
                });
            }
            RunCheck::Victory => {
                log::info!("Victory with score {}", self.state.score);
                self.state.phase = GamePhase::Victory;
                events.push(GameEvent::Victory {
                    score: self.state.score,
                });
            }
            RunCheck::LevelComplete { next_level } => {
                let fact = facts::random_fact(&mut self.rng);
                log::info!(
                    "Level {} complete with score {}",
                    self.state.level,
                    self.state.score
                );
                level::begin_transition(&mut self.state, next_level, fact, now_ms);
                events.push(GameEvent::LevelComplete { next_level, fact });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ScriptedRandom;

    const FRAME_MS: f64 = 16.0;
    /// x that puts a 70px object squarely over the centered catcher
    const OVER_CATCHER: f32 = 565.0;

    fn engine() -> Engine<ScriptedRandom> {
        Engine::new(
            Tuning::default(),
            ArchetypeTable::default(),
            ScriptedRandom::constant(0.1),
        )
        .unwrap()
    }

    fn drop_object(engine: &mut Engine<ScriptedRandom>, name: &str, x: f32, y: f32) -> u32 {
        let archetype = engine.archetypes.get(name).unwrap().clone();
        let id = engine.next_entity_id();
        engine.objects.push(FallingObject {
            id,
            pos: Vec2::new(x, y),
            size: Vec2::splat(engine.tuning.object_size),
            speed: engine.difficulty.fall_speed,
            archetype: archetype.name,
            effect: archetype.effect,
        });
        id
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_spawn_after_delay() {
        let mut engine = engine();
        for i in 0..49 {
            let report = engine.tick(&idle(), i as f64 * FRAME_MS);
            assert!(report.events.is_empty());
        }
        assert!(engine.entities().objects.is_empty());

        let report = engine.tick(&idle(), 49.0 * FRAME_MS);
        assert_eq!(
            report.events,
            vec![GameEvent::Spawned {
                id: 1,
                archetype: "carrot".to_string()
            }]
        );
        let object = &engine.entities().objects[0];
        // Spawned at the top, then moved once this tick
        assert_eq!(object.pos.y, 3.0);
        assert!((object.pos.x - 113.0).abs() < 0.01);
    }

    #[test]
    fn test_object_cap_never_exceeded() {
        let mut engine =
            Engine::with_seed(Tuning::default(), ArchetypeTable::default(), 42).unwrap();
        for i in 0..5000 {
            engine.tick(&idle(), i as f64 * FRAME_MS);
            assert!(engine.entities().objects.len() <= engine.difficulty().max_objects);
        }
    }

    #[test]
    fn test_catch_scores_and_removes() {
        let mut engine = engine();
        let id = drop_object(&mut engine, "dill", OVER_CATCHER, 600.0);

        let report = engine.tick(&idle(), 100.0);
        assert_eq!(report.state.score, 5);
        assert_eq!(report.state.combo_counter, 1);
        assert_eq!(report.state.last_catch_ms, 100.0);
        assert!(report.events.contains(&GameEvent::Caught {
            id,
            archetype: "dill".to_string(),
            category: Category::Good,
            score_delta: 5,
        }));
        assert!(engine.entities().objects.is_empty());
        assert_eq!(engine.entities().particles.len(), 5);
    }

    #[test]
    fn test_catcher_moves_before_collision() {
        let mut engine = engine();
        // Just right of the catcher; only caught if the catcher moves first
        drop_object(&mut engine, "carrot", 655.0, 600.0);

        let report = engine.tick(&TickInput::moving(10.0), 0.0);
        assert_eq!(report.state.score, 2);
        assert_eq!(engine.entities().catcher.x, 560.0);
    }

    #[test]
    fn test_good_object_past_floor_is_a_miss() {
        let mut engine = engine();
        let id = drop_object(&mut engine, "zucchini", 0.0, 799.0);

        let report = engine.tick(&idle(), 0.0);
        assert_eq!(report.state.lives, 4);
        assert!(report.events.contains(&GameEvent::Missed {
            id,
            archetype: "zucchini".to_string()
        }));
        assert!(engine.entities().objects.is_empty());
    }

    #[test]
    fn test_hazard_past_floor_is_harmless() {
        let mut engine = engine();
        drop_object(&mut engine, "stone", 0.0, 799.0);
        drop_object(&mut engine, "heart", 100.0, 799.0);

        let report = engine.tick(&idle(), 0.0);
        assert_eq!(report.state.lives, 5);
        assert!(report.events.is_empty());
        assert!(engine.entities().objects.is_empty());
    }

    #[test]
    fn test_three_misses_cost_three_lives() {
        let mut engine = engine();
        engine.state.combo_counter = 1;
        engine.state.last_catch_ms = 0.0;
        for x in [0.0, 100.0, 200.0] {
            drop_object(&mut engine, "dill", x, 799.0);
        }

        let report = engine.tick(&idle(), 10.0);
        assert_eq!(report.state.lives, 2);
        assert_eq!(report.state.combo_counter, 0);
        assert_eq!(report.state.combo_multiplier, 1);
        let misses = report
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Missed { .. }))
            .count();
        assert_eq!(misses, 3);
    }

    #[test]
    fn test_combo_times_out_on_crossing_tick() {
        let mut engine = engine();
        drop_object(&mut engine, "dill", OVER_CATCHER, 600.0);
        engine.tick(&idle(), 1000.0);
        drop_object(&mut engine, "dill", OVER_CATCHER, 600.0);
        engine.tick(&idle(), 1100.0);
        assert_eq!(engine.state().combo_counter, 2);

        // 2000ms after the last catch: still alive
        let report = engine.tick(&idle(), 3100.0);
        assert_eq!(report.state.combo_counter, 2);
        assert!(!report.events.contains(&GameEvent::ComboLost));

        let report = engine.tick(&idle(), 3116.0);
        assert_eq!(report.state.combo_counter, 0);
        assert_eq!(report.state.combo_multiplier, 1);
        assert!(report.events.contains(&GameEvent::ComboLost));
    }

    #[test]
    fn test_dill_streak_completes_level_one() {
        let mut engine = engine();
        let expected_scores = [5, 10, 15, 25, 35, 45, 60];
        let mut now = 0.0;

        for (i, expected) in expected_scores.iter().enumerate() {
            drop_object(&mut engine, "dill", OVER_CATCHER, 600.0);
            let report = engine.tick(&idle(), now);
            now += FRAME_MS;
            assert_eq!(report.state.score, *expected, "catch {}", i + 1);

            if i == 2 {
                assert!(report.events.contains(&GameEvent::ComboUp { multiplier: 2 }));
            }
            if i < expected_scores.len() - 1 {
                assert_eq!(report.state.phase, GamePhase::Playing);
            }
        }

        let state = engine.state();
        assert_eq!(state.phase, GamePhase::LevelTransition);
        assert_eq!(state.combo_counter, 7);
        assert_eq!(state.combo_multiplier, 3);
        let transition = state.transition.as_ref().unwrap();
        assert_eq!(transition.next_level, 2);
        assert!(facts::FACTS.contains(&transition.fact));
    }

    #[test]
    fn test_level_transition_freezes_then_levels_up() {
        let mut engine = engine();
        engine.state.score = 48;
        drop_object(&mut engine, "carrot", OVER_CATCHER, 600.0);
        let falling = drop_object(&mut engine, "stone", 0.0, 100.0);

        let report = engine.tick(&idle(), 1000.0);
        assert_eq!(report.state.phase, GamePhase::LevelTransition);
        assert!(
            report
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::LevelComplete { next_level: 2, .. }))
        );

        // Frozen: nothing moves, the catcher ignores input
        let report = engine.tick(&TickInput::moving(10.0), 4999.0);
        assert!(report.events.is_empty());
        let view = engine.entities();
        assert_eq!(view.objects[0].id, falling);
        assert_eq!(view.objects[0].pos.y, 103.0);
        assert_eq!(view.catcher.x, 550.0);

        let report = engine.tick(&idle(), 5000.0);
        assert_eq!(report.events, vec![GameEvent::LevelUp { level: 2 }]);
        assert_eq!(report.state.phase, GamePhase::Playing);
        assert_eq!(report.state.level, 2);
        assert_eq!(report.state.score, 50);
        assert_eq!(report.state.target_score, 150);
        assert_eq!(engine.difficulty().fall_speed, 4.0);
        assert_eq!(engine.difficulty().max_objects, 4);

        // Objects now fall at the new speed
        engine.tick(&idle(), 5016.0);
        assert_eq!(engine.entities().objects[0].pos.y, 107.0);
    }

    #[test]
    fn test_game_over_beats_level_complete() {
        let mut engine = engine();
        engine.state.score = 49;
        engine.state.lives = 1;
        drop_object(&mut engine, "dill", OVER_CATCHER, 600.0);
        drop_object(&mut engine, "carrot", 0.0, 799.0);

        let report = engine.tick(&idle(), 0.0);
        assert_eq!(report.state.score, 54);
        assert_eq!(report.state.lives, 0);
        assert_eq!(report.state.phase, GamePhase::GameOver);
        assert!(report.events.contains(&GameEvent::GameOver { score: 54, level: 1 }));
        assert!(
            !report
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::LevelComplete { .. }))
        );
    }

    #[test]
    fn test_final_level_target_is_victory() {
        let mut engine = engine();
        engine.state.level = 3;
        engine.state.target_score = 250;
        engine.state.score = 248;
        drop_object(&mut engine, "carrot", OVER_CATCHER, 600.0);

        let report = engine.tick(&idle(), 0.0);
        assert_eq!(report.state.phase, GamePhase::Victory);
        assert!(report.events.contains(&GameEvent::Victory { score: 250 }));

        // Terminal: input, pause and time change nothing
        let before = engine.state().clone();
        let pause = TickInput {
            velocity: 10.0,
            pause: true,
        };
        let report = engine.tick(&pause, 1e6);
        assert!(report.events.is_empty());
        assert_eq!(report.state, before);
    }

    #[test]
    fn test_bad_catch_can_end_the_run() {
        let mut engine = engine();
        engine.state.lives = 2;
        drop_object(&mut engine, "stone", OVER_CATCHER, 600.0);

        let report = engine.tick(&idle(), 0.0);
        assert_eq!(report.state.lives, 0);
        assert_eq!(report.state.score, 0);
        assert_eq!(report.state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut engine = engine();
        drop_object(&mut engine, "dill", 0.0, 100.0);
        engine.state.combo_counter = 1;
        engine.state.last_catch_ms = 0.0;

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        let report = engine.tick(&pause, 0.0);
        assert_eq!(report.state.phase, GamePhase::Paused);
        assert_eq!(report.events, vec![GameEvent::Paused]);

        let report = engine.tick(&TickInput::moving(-10.0), 10_000.0);
        assert!(report.events.is_empty());
        assert_eq!(report.state.combo_counter, 1);
        assert_eq!(engine.entities().objects[0].pos.y, 100.0);
        assert_eq!(engine.time_ticks(), 0);

        let report = engine.tick(&pause, 10_016.0);
        assert_eq!(report.state.phase, GamePhase::Playing);
        assert_eq!(report.events[0], GameEvent::Resumed);
        assert_eq!(engine.entities().objects[0].pos.y, 103.0);
    }

    #[test]
    fn test_restart_reproduces_initial_snapshot() {
        let mut engine =
            Engine::with_seed(Tuning::default(), ArchetypeTable::default(), 7).unwrap();
        let initial = engine.state().clone();
        let initial_difficulty = engine.difficulty().clone();

        for i in 0..3000 {
            let velocity = if i % 200 < 100 { 10.0 } else { -10.0 };
            engine.tick(&TickInput::moving(velocity), i as f64 * FRAME_MS);
        }
        assert!(engine.state().phase.is_terminal());

        let restarted = engine.restart();
        assert_eq!(restarted, initial);
        assert_eq!(engine.difficulty(), &initial_difficulty);
        assert!(engine.entities().objects.is_empty());
        assert!(engine.entities().particles.is_empty());
        assert_eq!(engine.entities().catcher, &Catcher::new(engine.tuning()));
        assert_eq!(engine.time_ticks(), 0);
    }

    #[test]
    fn test_restart_after_victory() {
        let mut engine = engine();
        let initial = engine.state().clone();
        engine.state.level = 3;
        engine.state.target_score = 250;
        engine.state.score = 248;
        engine.difficulty.fall_speed = 5.0;
        drop_object(&mut engine, "carrot", OVER_CATCHER, 600.0);
        drop_object(&mut engine, "stone", 0.0, 100.0);

        let report = engine.tick(&TickInput::moving(10.0), 0.0);
        assert_eq!(report.state.phase, GamePhase::Victory);

        assert_eq!(engine.restart(), initial);
        assert_eq!(engine.difficulty(), &Difficulty::new(engine.tuning()));
        assert!(engine.entities().objects.is_empty());
        assert!(engine.entities().particles.is_empty());
        assert_eq!(engine.entities().catcher, &Catcher::new(engine.tuning()));

        // Play resumes from level 1
        let report = engine.tick(&idle(), 16.0);
        assert_eq!(report.state.phase, GamePhase::Playing);
        assert_eq!(engine.time_ticks(), 1);
    }

    #[test]
    fn test_flat_level_steps_rejected() {
        let tuning = Tuning {
            target_step: 0,
            fall_speed_step: 0.0,
            ..Default::default()
        };
        let result = Engine::new(tuning, ArchetypeTable::default(), ScriptedRandom::default());
        assert!(matches!(result, Err(ConfigError::InvalidTuning { .. })));
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let tuning = Tuning {
            initial_max_objects: 0,
            ..Default::default()
        };
        let result = Engine::new(tuning, ArchetypeTable::default(), ScriptedRandom::default());
        assert!(matches!(result, Err(ConfigError::InvalidTuning { .. })));
    }

    #[test]
    fn test_from_keys() {
        assert_eq!(TickInput::from_keys(true, false).velocity, -CATCHER_SPEED);
        assert_eq!(TickInput::from_keys(false, true).velocity, CATCHER_SPEED);
        assert_eq!(TickInput::from_keys(true, true).velocity, 0.0);
    }
}
