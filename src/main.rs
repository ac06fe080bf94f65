//! Veggie Catch native entry point
//!
//! Runs a headless game with a simple autopilot at a simulated 60 Hz and
//! logs what happens. The browser build drives the engine through `web.rs`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use veggie_catch::Settings;
    use veggie_catch::sim::{Engine, GameEvent, GamePhase};
    use veggie_catch::tuning::{ArchetypeTable, Tuning};

    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
    log::info!("Veggie Catch (native, headless) starting with seed {}", seed);

    let mut engine = match Engine::with_seed(Tuning::default(), ArchetypeTable::default(), seed) {
        Ok(engine) => engine,
        Err(err) => {
            log::error!("Failed to build engine: {}", err);
            std::process::exit(1);
        }
    };
    engine.set_particle_capacity(Settings::load().max_particles());

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_TICKS: u64 = 60 * 60 * 10;

    let mut now = 0.0;
    let mut catches = 0u32;
    let mut misses = 0u32;

    for _ in 0..MAX_TICKS {
        let input = autopilot::steer(&engine);
        let report = engine.tick(&input, now);
        now += FRAME_MS;

        for event in &report.events {
            match event {
                GameEvent::Caught { .. } => catches += 1,
                GameEvent::Missed { .. } => misses += 1,
                GameEvent::LevelComplete { next_level, fact } => {
                    log::info!("On to level {}. Did you know? {}", next_level, fact);
                }
                _ => {}
            }
            if let Some(cue) = event.sound() {
                log::trace!("sound: {}", cue.as_str());
            }
        }

        if report.state.phase.is_terminal() {
            break;
        }
    }

    let state = engine.state();
    let outcome = match state.phase {
        GamePhase::Victory => "victory",
        GamePhase::GameOver => "game over",
        _ => "time limit",
    };
    log::info!(
        "Run ended ({}): score={}, level={}, lives={}, catches={}, misses={}",
        outcome,
        state.score,
        state.level,
        state.lives,
        catches,
        misses
    );
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use veggie_catch::consts::CATCHER_SPEED;
    use veggie_catch::sim::{Engine, RandomSource, TickInput};
    use veggie_catch::tuning::Category;

    /// Chase the lowest non-hazard object
    pub fn steer<R: RandomSource>(engine: &Engine<R>) -> TickInput {
        let view = engine.entities();
        let target = view
            .objects
            .iter()
            .filter(|o| o.category() != Category::Bad)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        let Some(target) = target else {
            return TickInput::default();
        };

        let delta = (target.pos.x + target.size.x / 2.0) - view.catcher.center_x();
        if delta.abs() < CATCHER_SPEED {
            TickInput::moving(delta)
        } else {
            TickInput::moving(CATCHER_SPEED.copysign(delta))
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}
