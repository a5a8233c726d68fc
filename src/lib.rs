//! Stardust - animated starfield for a single-page portfolio
//!
//! Core modules:
//! - `sim`: Deterministic animation state (trails, shooting stars, star fields, CSS spawner)
//! - `renderer`: WebGPU point-sprite pipeline
//! - `platform`: Browser wiring (frame driver, pointer events, timers, DOM)
//! - `settings`: Runtime configuration
//! - `display_mode`: Scoped page-wide cursor/scroll mode

pub mod display_mode;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use display_mode::{DisplayModeGuard, PageStyle};
pub use error::InitError;
pub use settings::{QualityPreset, Settings};

use glam::Vec3;

/// Animation configuration constants
pub mod consts {
    /// Hero field point count
    pub const HERO_STAR_COUNT: usize = 2000;
    /// Secondary "subtle" field point count
    pub const SUBTLE_STAR_COUNT: usize = 500;
    /// Spherical shell the static fields are sampled on
    pub const FIELD_MIN_RADIUS: f32 = 0.5;
    pub const FIELD_MAX_RADIUS: f32 = 2.5;
    /// Half extents of the box layout for subtle backdrops
    pub const SUBTLE_BOX_HALF_EXTENTS: [f32; 3] = [5.0, 5.0, 2.5];
    /// Fixed tilt of the hero field group around z (radians)
    pub const HERO_BASE_TILT_Z: f32 = std::f32::consts::FRAC_PI_4;
    /// Pointer-to-rotation gain (radians per normalized unit)
    pub const POINTER_TILT_GAIN: f32 = 0.05;

    /// Number of shooting stars in the hero scene
    pub const SHOOTING_STAR_COUNT: usize = 8;
    /// Trail buffer length (K)
    pub const TRAIL_LENGTH: usize = 10;
    /// Agents reset once |x| or |y| exceeds this
    pub const BOUND_HALF_EXTENT: f32 = 5.0;
    /// Spawn region half extents (x, y, z)
    pub const SPAWN_HALF_EXTENTS: [f32; 3] = [2.0, 2.0, 1.0];
    /// Shooting star speed range (units/sec)
    pub const SPEED_MIN: f32 = 0.5;
    pub const SPEED_MAX: f32 = 1.5;

    /// CSS spawner timing (seconds)
    pub const CSS_SPAWN_PERIOD: f64 = 3.0;
    pub const CSS_LIFETIME_MIN: f64 = 2.0;
    pub const CSS_LIFETIME_MAX: f64 = 5.0;

    /// Largest frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Camera (matches the page canvas: eye at z=1, 75° vertical fov)
    pub const CAMERA_Z: f32 = 1.0;
    pub const CAMERA_FOV_Y_DEG: f32 = 75.0;
    pub const CAMERA_NEAR: f32 = 0.1;
    pub const CAMERA_FAR: f32 = 1000.0;

    /// Custom cursor
    pub const CURSOR_HALF_SIZE: f32 = 8.0;
    pub const CURSOR_HOVER_SCALE: f32 = 3.0;
    pub const CURSOR_HOVER_SELECTOR: &str = "a, button, [role=\"button\"], .hover-target";
}

/// Convert spherical (r, theta, phi) to cartesian.
///
/// `theta` is the azimuth around z, `phi` the polar angle from +z.
#[inline]
pub fn spherical_to_cartesian(r: f32, theta: f32, phi: f32) -> Vec3 {
    let sin_phi = phi.sin();
    Vec3::new(
        r * sin_phi * theta.cos(),
        r * sin_phi * theta.sin(),
        r * phi.cos(),
    )
}

/// Convert a `0xRRGGBB` color to linear-ish RGBA floats with the given alpha
#[inline]
pub const fn rgb_hex(hex: u32, alpha: f32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        alpha,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_spherical_axes() {
        let up = spherical_to_cartesian(2.0, 0.0, 0.0);
        assert!((up - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-6);

        let x = spherical_to_cartesian(1.0, 0.0, FRAC_PI_2);
        assert!((x - Vec3::X).length() < 1e-6);

        let neg_y = spherical_to_cartesian(1.0, -FRAC_PI_2, FRAC_PI_2);
        assert!((neg_y + Vec3::Y).length() < 1e-6);

        let down = spherical_to_cartesian(1.0, 1.3, PI);
        assert!((down + Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_rgb_hex() {
        assert_eq!(rgb_hex(0xffffff, 0.8), [1.0, 1.0, 1.0, 0.8]);
        let blue = rgb_hex(0x3b82f6, 1.0);
        assert!((blue[0] - 59.0 / 255.0).abs() < 1e-6);
        assert!((blue[2] - 246.0 / 255.0).abs() < 1e-6);
    }
}
