//! Stardust entry point
//!
//! On the web this mounts the page animation. Natively it runs the
//! simulation headless and logs what it would draw.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_page {
    use std::cell::RefCell;

    use stardust::platform::web::Page;

    thread_local! {
        /// The mounted page; taking it out unmounts
        static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Stardust starting...");

        match Page::mount().await {
            Ok(page) => {
                PAGE.with(|p| *p.borrow_mut() = Some(page));
                log::info!("Stardust running!");
            }
            Err(e) => log::error!("Failed to start: {}", e),
        }
    }

    pub fn unmount() {
        if let Some(page) = PAGE.with(|p| p.borrow_mut().take()) {
            drop(page);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_page::run().await;
}

/// Tear the animation down (frame loop, listeners, timers, display mode)
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn unmount() {
    wasm_page::unmount();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Stardust (native) starting...");
    log::info!("Rendering needs a browser canvas - run with `trunk serve` for the web version");

    let settings = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => stardust::Settings::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Could not read {} ({}), using defaults", path, e);
                stardust::Settings::default()
            }
        },
        None => stardust::Settings::default(),
    };

    headless::run(&settings, 10.0);
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use stardust::Settings;
    use stardust::platform::{FrameClock, canvas_pixel_size};
    use stardust::renderer::{build_instances, camera_uniform};
    use stardust::sim::{
        CssSpawner, ParticleScene, SceneConfig, SpawnerEvent, Viewport, entropy_seed, seeded,
    };

    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Drive the hero scene and the CSS spawner for `seconds` of page time
    pub fn run(settings: &Settings, seconds: f64) {
        let seed = entropy_seed();
        let mut rng = seeded(seed);
        log::info!("Seed: {}", seed);

        let mut scene = ParticleScene::new(SceneConfig::hero_from_settings(settings), &mut rng);
        let mut spawner = CssSpawner::new(settings.spawner_config(), seeded(seed.wrapping_add(1)), 0.0);
        let (width, height) = canvas_pixel_size(1280, 720, 1.0);
        let camera = camera_uniform(width, height);
        log::debug!("Camera point scale: {}", camera.point_scale);

        let mut clock = FrameClock::new();
        let mut instances = Vec::new();
        let mut resets = 0usize;
        let mut spawned = 0usize;
        let mut expired = 0usize;
        let mut peak_active = 0usize;

        let frames = (seconds * 1000.0 / FRAME_MS).ceil() as usize;
        for frame in 0..=frames {
            let now_ms = frame as f64 * FRAME_MS;
            let dt = clock.delta(now_ms);

            // Sweep the pointer across the viewport
            let t = now_ms as f32 / 1000.0;
            scene.on_pointer_move(
                (t.sin() * 0.5 + 0.5) * width as f32,
                (t.cos() * 0.5 + 0.5) * height as f32,
                Viewport::new(width as f32, height as f32),
            );

            let before: Vec<_> = scene.stars().iter().map(|s| s.position).collect();
            scene.tick(dt);
            resets += scene
                .stars()
                .iter()
                .zip(&before)
                .filter(|(s, prev)| s.position == s.spawn && **prev != s.position)
                .count();

            build_instances(&scene.frame(), &mut instances);

            if settings.css_stars_enabled() {
                for event in spawner.advance(now_ms / 1000.0) {
                    match event {
                        SpawnerEvent::Spawned(_) => spawned += 1,
                        SpawnerEvent::Expired(_) => expired += 1,
                    }
                }
                peak_active = peak_active.max(spawner.len());
            }
        }

        let (rx, ry) = scene.rotation();
        log::info!(
            "{} frames: {} instances/frame, {} bound resets, rotation ({:.3}, {:.3})",
            frames,
            instances.len(),
            resets,
            rx,
            ry
        );
        log::info!(
            "CSS stars: {} spawned, {} expired, peak {} active (bound {})",
            spawned,
            expired,
            peak_active,
            settings.spawner_config().max_active()
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
