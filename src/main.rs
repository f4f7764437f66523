//! Sled Slide entry point
//!
//! Native builds run a headless attract-mode session and log how it went;
//! the browser build is driven through `sled_slide::web` instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use sled_slide::Tuning;
    use sled_slide::audio::SilentAudio;
    use sled_slide::hud;
    use sled_slide::persistence::FileStore;
    use sled_slide::session::Session;
    use sled_slide::sim::GamePhase;

    /// Simulated frame time (60 Hz)
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up after five simulated minutes
    const MAX_FRAMES: u32 = 5 * 60 * 60;

    env_logger::init();
    log::info!("Sled Slide (native) starting...");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let store = FileStore::open(std::env::temp_dir().join("sled-slide-save.json"));
    let mut session = Session::new(seed, Tuning::default(), store, SilentAudio);
    session.set_autopilot(true);

    log::info!("Autopilot run with seed {}", seed);
    let mut snapshot = session.start();
    let mut frames = 0;
    while snapshot.phase == GamePhase::Playing && frames < MAX_FRAMES {
        snapshot = session.frame(FRAME_DT);
        frames += 1;
        if frames % (60 * 10) == 0 {
            log::info!(
                "{} | score {} | {} km/h | {:?}",
                hud::clock_label(snapshot.time_of_day),
                snapshot.score,
                hud::speed_kmh(snapshot.speed),
                session.track().current_biome()
            );
        }
    }

    log::info!(
        "Finished after {:.1}s: score {}, best {}{}",
        frames as f32 * FRAME_DT,
        snapshot.score,
        snapshot.high_score,
        if hud::is_new_best(&snapshot) { " (new best!)" } else { "" }
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is sled_slide::web::init, this is just to satisfy the compiler
}
