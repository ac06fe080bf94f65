//! Browser host bindings
//!
//! The page owns the animation loop, canvas, audio and menus. It calls
//! `tick` once per `requestAnimationFrame` with the held direction and
//! `performance.now()`, then draws from `entities()` and plays the sound
//! cues attached to each reported event. Snapshots cross the boundary as JSON.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::settings::{QualityPreset, Settings};
use crate::sim::{Engine, GameEvent, TickInput, TickReport};
use crate::tuning::{ArchetypeTable, Tuning};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Veggie Catch core loaded");
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_json(value: &impl Serialize) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_error)
}

/// Event plus the sound the page should play for it
#[derive(Serialize)]
struct CuedEvent<'a> {
    event: &'a GameEvent,
    sound: Option<&'static str>,
}

#[derive(Serialize)]
struct CuedReport<'a> {
    state: &'a crate::sim::RunState,
    events: Vec<CuedEvent<'a>>,
}

impl<'a> From<&'a TickReport> for CuedReport<'a> {
    fn from(report: &'a TickReport) -> Self {
        Self {
            state: &report.state,
            events: report
                .events
                .iter()
                .map(|event| CuedEvent {
                    event,
                    sound: event.sound().map(|cue| cue.as_str()),
                })
                .collect(),
        }
    }
}

/// JS-facing wrapper around `Engine`
#[wasm_bindgen]
pub struct WebEngine {
    engine: Engine,
    settings: Settings,
}

#[wasm_bindgen]
impl WebEngine {
    /// Build from optional JSON overrides for the archetype table and tuning
    #[wasm_bindgen(constructor)]
    pub fn new(
        archetypes_json: Option<String>,
        tuning_json: Option<String>,
    ) -> Result<WebEngine, JsValue> {
        let archetypes = match archetypes_json {
            Some(json) => ArchetypeTable::from_json(&json).map_err(js_error)?,
            None => ArchetypeTable::default(),
        };
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).map_err(js_error)?,
            None => Tuning::default(),
        };

        let seed = js_sys::Date::now() as u64;
        let mut engine = Engine::with_seed(tuning, archetypes, seed).map_err(js_error)?;
        let settings = Settings::load();
        engine.set_particle_capacity(settings.max_particles());

        Ok(WebEngine { engine, settings })
    }

    /// Advance one frame; returns `{ state, events: [{ event, sound }] }`
    pub fn tick(&mut self, velocity: f32, pause: bool, now_ms: f64) -> Result<String, JsValue> {
        let report = self.engine.tick(&TickInput { velocity, pause }, now_ms);
        to_json(&CuedReport::from(&report))
    }

    pub fn restart(&mut self) -> Result<String, JsValue> {
        to_json(&self.engine.restart())
    }

    /// Catcher, falling objects and particles for the renderer
    pub fn entities(&self) -> Result<String, JsValue> {
        to_json(&self.engine.entities())
    }

    /// Change and persist the quality preset
    pub fn set_quality(&mut self, preset: &str) -> bool {
        let Some(quality) = QualityPreset::parse(preset) else {
            return false;
        };
        self.settings.quality = quality;
        self.settings.save();
        self.engine.set_particle_capacity(self.settings.max_particles());
        true
    }
}
