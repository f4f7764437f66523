//! Browser bindings
//!
//! A JS renderer owns the animation loop: it forwards `keydown` events,
//! calls `frame` from `requestAnimationFrame`, and reads the returned JSON
//! snapshot plus `track_json` to draw.

use wasm_bindgen::prelude::*;

use crate::audio::WebAudio;
use crate::persistence::LocalStore;
use crate::session::Session;
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Sled Slide starting...");
}

/// Game handle exported to JS
#[wasm_bindgen]
pub struct WebGame {
    session: Session<LocalStore, WebAudio>,
}

#[wasm_bindgen]
impl WebGame {
    /// `tuning_json` may be empty for the default balance
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: &str) -> WebGame {
        let tuning = if tuning_json.trim().is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json(tuning_json).unwrap_or_else(|e| {
                log::warn!("{} - using default tuning", e);
                Tuning::default()
            })
        };
        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);
        WebGame {
            session: Session::new(seed, tuning, LocalStore, WebAudio::new()),
        }
    }

    pub fn start(&mut self) -> String {
        to_json(&self.session.start())
    }

    pub fn reset(&mut self) -> String {
        to_json(&self.session.reset())
    }

    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str) {
        self.session.key_down(key);
    }

    #[wasm_bindgen(js_name = setAutopilot)]
    pub fn set_autopilot(&mut self, on: bool) {
        self.session.set_autopilot(on);
    }

    /// Advance by `dt` seconds; returns the snapshot as JSON
    pub fn frame(&mut self, dt: f32) -> String {
        to_json(&self.session.frame(dt))
    }

    /// Segment ring as JSON (offsets, biomes, items)
    #[wasm_bindgen(js_name = trackJson)]
    pub fn track_json(&self) -> String {
        to_json(&self.session.track().segments())
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::warn!("Snapshot encode failed: {}", e);
        String::from("null")
    })
}
