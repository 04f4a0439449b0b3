//! maze3d: first-person maze tour in a software-rendered window
//!
//! The engine renders into a 15-bit framebuffer every tick; this binary
//! only uploads it to a texture and scales it to the window.

use std::time::{Duration, Instant};

use macroquad::prelude::*;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use maze3d::app::{load_level_or_classic, load_textures};
use maze3d::config::CONFIG_PATH;
use maze3d::rasterizer::Framebuffer;
use maze3d::world::Level;
use maze3d::{Engine, EngineConfig, VERSION};

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("maze3d=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

fn window_conf() -> Conf {
    // Logging isn't up yet; main reloads the config and reports problems
    let config = EngineConfig::load(CONFIG_PATH).unwrap_or_default();
    Conf {
        window_title: format!("maze3d v{}", VERSION),
        window_width: window_extent(config.screen_width, config.window_scale),
        window_height: window_extent(config.screen_height, config.window_scale),
        window_resizable: true,
        ..Default::default()
    }
}

fn window_extent(pixels: usize, scale: u32) -> i32 {
    let extent = (pixels as u64).saturating_mul(scale as u64);
    extent.min(i32::MAX as u64) as i32
}

/// Aspect-preserving fit of `w`x`h` into the window, centred
fn fit_to_window(w: f32, h: f32) -> (f32, f32, f32, f32) {
    let scale = (screen_width() / w).min(screen_height() / h);
    let draw_w = w * scale;
    let draw_h = h * scale;
    ((screen_width() - draw_w) / 2.0, (screen_height() - draw_h) / 2.0, draw_w, draw_h)
}

#[macroquad::main(window_conf)]
async fn main() {
    setup_logging();
    tracing::info!("=== maze3d v{} ===", VERSION);

    let config = EngineConfig::load_or_default(CONFIG_PATH);
    let level = load_level_or_classic(&config.level_path);

    let mut engine = match Engine::new(&config, &level, load_textures(&config)) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::warn!("Level '{}' rejected: {}", level.name, e);
            tracing::warn!("Using built-in classic maze");
            match Engine::new(&config, &Level::classic(), load_textures(&config)) {
                Ok(engine) => engine,
                Err(e) => {
                    tracing::error!("Built-in maze rejected: {}", e);
                    return;
                }
            }
        }
    };

    let mut fb = Framebuffer::new(config.screen_width, config.screen_height);
    let mut rgba = Vec::with_capacity(fb.pixels.len() * 4);

    // Window close is handled below so the exit summary still gets logged
    prevent_quit();

    let mut running = true;
    let mut frames: u64 = 0;
    let mut total_render_time = Duration::ZERO;

    while running {
        if is_key_pressed(KeyCode::Escape) || is_quit_requested() {
            running = false;
        }

        engine.update();

        let start = Instant::now();
        engine.render(&mut fb);
        total_render_time += start.elapsed();

        fb.to_rgba8(&mut rgba);
        let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &rgba);
        texture.set_filter(FilterMode::Nearest);

        // In magnified mode only the top-left region holds the image
        let (visible_w, visible_h) = fb.visible_size();
        let (x, y, w, h) = fit_to_window(fb.width as f32, fb.height as f32);

        clear_background(BLACK);
        draw_texture_ex(
            &texture,
            x,
            y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(w, h)),
                source: Some(Rect::new(0.0, 0.0, visible_w as f32, visible_h as f32)),
                ..Default::default()
            },
        );

        frames += 1;

        next_frame().await;
    }

    if frames > 0 {
        tracing::info!(
            frames,
            ticks = engine.ticks(),
            avg_render_ms = total_render_time.as_secs_f64() * 1000.0 / frames as f64,
            "exiting"
        );
    }
}
