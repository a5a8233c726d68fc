//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing (host timestamps to clamped deltas)
//! - Canvas sizing
//! - DOM styles for CSS stars and the custom cursor
//!
//! The `web` submodule does the actual browser wiring and only builds for
//! wasm32; everything here is plain data so it can be tested natively.

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::consts::MAX_FRAME_DT;
use crate::sim::{CssParticle, CursorTransform};

/// Clamp a host frame delta (seconds) to something safe to integrate
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    if !dt.is_finite() || dt < 0.0 {
        0.0
    } else {
        dt.min(MAX_FRAME_DT)
    }
}

/// Turns host frame timestamps (milliseconds) into step deltas (seconds)
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta since the previous call. The first frame steps by zero.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        clamp_dt(dt)
    }

    /// Forget the last timestamp (e.g. after the tab was hidden)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Backing-store size for a canvas laid out at `client_w` x `client_h` CSS px
pub fn canvas_pixel_size(client_w: i32, client_h: i32, dpr: f64) -> (u32, u32) {
    let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    let w = (client_w.max(0) as f64 * dpr).round() as u32;
    let h = (client_h.max(0) as f64 * dpr).round() as u32;
    (w.max(1), h.max(1))
}

/// Inline style for a CSS star node
pub fn css_particle_style(particle: &CssParticle) -> String {
    format!(
        "left: {:.3}%; top: -10px; animation: shootingStar {:.3}s linear forwards;",
        particle.horizontal_position, particle.lifetime
    )
}

/// Inline `transform` for the custom cursor element
pub fn cursor_css_transform(t: CursorTransform) -> String {
    format!("translate({}px, {}px) scale({})", t.left, t.top, t.scale)
}
