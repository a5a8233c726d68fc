//! Particle scene: static field + shooting stars + pointer tilt
//!
//! Driven once per rendered frame by `tick`; pointer events only touch the
//! field's rotation scalars.

use glam::{Mat3, Vec2, Vec3};
use rand::Rng;

use super::field::{FieldShape, StaticField};
use super::shooting_star::{ShootingStar, ShootingStarSpawn};
use crate::consts::*;
use crate::settings::Settings;

/// Point material handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldMaterial {
    /// RGB in 0..1
    pub color: [f32; 3],
    /// Point size in world units
    pub size: f32,
    pub opacity: f32,
    /// Shrink with distance from the camera
    pub size_attenuation: bool,
    pub depth_write: bool,
}

impl FieldMaterial {
    pub const HERO: Self = Self {
        color: [1.0, 1.0, 1.0],
        size: 0.008,
        opacity: 0.8,
        size_attenuation: true,
        depth_write: false,
    };

    pub const SUBTLE: Self = Self {
        color: [1.0, 1.0, 1.0],
        size: 0.003,
        opacity: 0.3,
        size_attenuation: true,
        depth_write: false,
    };

    /// Shooting star trail points (#3b82f6)
    pub const TRAIL: Self = Self {
        color: [59.0 / 255.0, 130.0 / 255.0, 246.0 / 255.0],
        size: 0.01,
        opacity: 0.6,
        size_attenuation: true,
        depth_write: true,
    };

    /// Shooting star head (#60a5fa sphere of radius 0.02)
    pub const HEAD: Self = Self {
        color: [96.0 / 255.0, 165.0 / 255.0, 250.0 / 255.0],
        size: 0.04,
        opacity: 1.0,
        size_attenuation: true,
        depth_write: true,
    };

    #[inline]
    pub fn rgba(&self) -> [f32; 4] {
        [self.color[0], self.color[1], self.color[2], self.opacity]
    }
}

/// Viewport size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Map a screen position to [-1, 1] on both axes (+y up).
///
/// Returns `None` for a zero-sized (or degenerate) viewport.
pub fn normalize_pointer(x: f32, y: f32, viewport: Viewport) -> Option<Vec2> {
    if !(viewport.width > 0.0 && viewport.height > 0.0) {
        return None;
    }
    Some(Vec2::new(
        (x / viewport.width) * 2.0 - 1.0,
        -(y / viewport.height) * 2.0 + 1.0,
    ))
}

/// Scene construction parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub field_shape: FieldShape,
    pub star_count: usize,
    pub field_material: FieldMaterial,
    /// Fixed tilt of the field group around z (radians)
    pub base_tilt_z: f32,
    /// Whether pointer movement tilts the field
    pub pointer_tilt: bool,
    pub shooting_stars: usize,
    pub trail_length: usize,
    pub bound_half_extent: f32,
}

impl SceneConfig {
    /// Hero section: dense tilted shell with shooting stars
    pub fn hero() -> Self {
        Self {
            field_shape: FieldShape::default(),
            star_count: HERO_STAR_COUNT,
            field_material: FieldMaterial::HERO,
            base_tilt_z: HERO_BASE_TILT_Z,
            pointer_tilt: true,
            shooting_stars: SHOOTING_STAR_COUNT,
            trail_length: TRAIL_LENGTH,
            bound_half_extent: BOUND_HALF_EXTENT,
        }
    }

    /// Secondary sections: sparse, faint, static
    pub fn subtle() -> Self {
        Self {
            field_shape: FieldShape::default(),
            star_count: SUBTLE_STAR_COUNT,
            field_material: FieldMaterial::SUBTLE,
            base_tilt_z: 0.0,
            pointer_tilt: false,
            shooting_stars: 0,
            trail_length: TRAIL_LENGTH,
            bound_half_extent: BOUND_HALF_EXTENT,
        }
    }

    pub fn hero_from_settings(settings: &Settings) -> Self {
        Self {
            star_count: settings.effective_hero_star_count(),
            shooting_stars: settings.effective_shooting_stars(),
            trail_length: settings.effective_trail_length(),
            bound_half_extent: settings.bound_half_extent,
            ..Self::hero()
        }
    }

    pub fn subtle_from_settings(settings: &Settings) -> Self {
        Self {
            field_shape: settings.subtle_shape,
            star_count: settings.effective_subtle_star_count(),
            ..Self::subtle()
        }
    }
}

/// One shooting star as seen by the renderer
#[derive(Debug, Clone, Copy)]
pub struct StarFrame<'a> {
    pub head: Vec3,
    /// Newest first
    pub trail: &'a [Vec3],
}

/// Renderable snapshot of the scene for one frame
#[derive(Debug, Clone)]
pub struct SceneFrame<'a> {
    pub field_points: &'a [Vec3],
    pub field_material: FieldMaterial,
    /// Euler angles of the field (x, y from the pointer, z the base tilt)
    pub field_rotation: Vec3,
    pub stars: Vec<StarFrame<'a>>,
    pub head_material: FieldMaterial,
    pub trail_material: FieldMaterial,
}

impl SceneFrame<'_> {
    /// Field rotation as a matrix: base tilt applied outside the pointer tilt
    pub fn field_rotation_matrix(&self) -> Mat3 {
        let r = self.field_rotation;
        Mat3::from_rotation_z(r.z) * Mat3::from_rotation_x(r.x) * Mat3::from_rotation_y(r.y)
    }
}

/// The animated particle scene
#[derive(Debug, Clone)]
pub struct ParticleScene {
    config: SceneConfig,
    field: StaticField,
    stars: Vec<ShootingStar>,
}

impl ParticleScene {
    pub fn new(config: SceneConfig, rng: &mut impl Rng) -> Self {
        let field = StaticField::new(rng, config.field_shape, config.star_count);
        let stars = (0..config.shooting_stars)
            .map(|_| {
                ShootingStar::new(
                    ShootingStarSpawn::random(rng),
                    config.trail_length,
                    config.bound_half_extent,
                )
            })
            .collect();
        Self {
            config,
            field,
            stars,
        }
    }

    /// Build a scene from explicit parts (field and agents)
    pub fn from_parts(config: SceneConfig, field: StaticField, stars: Vec<ShootingStar>) -> Self {
        Self {
            config,
            field,
            stars,
        }
    }

    /// Advance every shooting star by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        // Agents share no state, so order does not matter
        for star in &mut self.stars {
            star.step(dt);
        }
    }

    /// Tilt the field toward the pointer.
    ///
    /// Direct assignment, no easing. Returns `false` (no change) when the
    /// viewport is empty or this scene ignores the pointer.
    pub fn on_pointer_move(&mut self, x: f32, y: f32, viewport: Viewport) -> bool {
        if !self.config.pointer_tilt {
            return false;
        }
        let Some(n) = normalize_pointer(x, y, viewport) else {
            log::debug!("pointer move ignored: empty viewport {viewport:?}");
            return false;
        };
        self.field.rotation_x = n.y * POINTER_TILT_GAIN;
        self.field.rotation_y = n.x * POINTER_TILT_GAIN;
        true
    }

    /// Current (x, y) field rotation
    pub fn rotation(&self) -> (f32, f32) {
        (self.field.rotation_x, self.field.rotation_y)
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn field(&self) -> &StaticField {
        &self.field
    }

    pub fn stars(&self) -> &[ShootingStar] {
        &self.stars
    }

    pub fn stars_mut(&mut self) -> &mut [ShootingStar] {
        &mut self.stars
    }

    /// Snapshot for the renderer
    pub fn frame(&self) -> SceneFrame<'_> {
        SceneFrame {
            field_points: self.field.points(),
            field_material: self.config.field_material,
            field_rotation: Vec3::new(
                self.field.rotation_x,
                self.field.rotation_y,
                self.config.base_tilt_z,
            ),
            stars: self
                .stars
                .iter()
                .map(|s| StarFrame {
                    head: s.position,
                    trail: s.trail.read(),
                })
                .collect(),
            head_material: FieldMaterial::HEAD,
            trail_material: FieldMaterial::TRAIL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::seeded;

    fn hero(seed: u64) -> ParticleScene {
        ParticleScene::new(SceneConfig::hero(), &mut seeded(seed))
    }

    #[test]
    fn test_hero_scene_shape() {
        let scene = hero(5);
        assert_eq!(scene.field().len(), HERO_STAR_COUNT);
        assert_eq!(scene.stars().len(), SHOOTING_STAR_COUNT);
        for star in scene.stars() {
            assert_eq!(star.trail.len(), TRAIL_LENGTH);
        }
    }

    #[test]
    fn test_normalize_pointer() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(normalize_pointer(400.0, 300.0, vp), Some(Vec2::ZERO));
        assert_eq!(normalize_pointer(0.0, 0.0, vp), Some(Vec2::new(-1.0, 1.0)));
        assert_eq!(normalize_pointer(800.0, 600.0, vp), Some(Vec2::new(1.0, -1.0)));
        assert_eq!(normalize_pointer(10.0, 10.0, Viewport::new(0.0, 600.0)), None);
        assert_eq!(normalize_pointer(10.0, 10.0, Viewport::new(800.0, 0.0)), None);
        assert_eq!(normalize_pointer(10.0, 10.0, Viewport::new(f32::NAN, 1.0)), None);
    }

    #[test]
    fn test_pointer_sets_rotation_directly() {
        let mut scene = hero(1);
        let vp = Viewport::new(1000.0, 500.0);
        assert!(scene.on_pointer_move(1000.0, 0.0, vp));
        let (rx, ry) = scene.rotation();
        assert!((rx - 0.05).abs() < 1e-6);
        assert!((ry - 0.05).abs() < 1e-6);

        // No smoothing: the next event fully replaces the last
        assert!(scene.on_pointer_move(500.0, 250.0, vp));
        assert_eq!(scene.rotation(), (0.0, 0.0));
    }

    #[test]
    fn test_pointer_zero_viewport_is_noop() {
        let mut scene = hero(1);
        scene.on_pointer_move(100.0, 20.0, Viewport::new(400.0, 400.0));
        let before = scene.rotation();
        assert!(!scene.on_pointer_move(300.0, 300.0, Viewport::new(0.0, 400.0)));
        assert_eq!(scene.rotation(), before);
    }

    #[test]
    fn test_subtle_scene_ignores_pointer() {
        let mut scene = ParticleScene::new(SceneConfig::subtle(), &mut seeded(3));
        assert!(scene.stars().is_empty());
        assert!(!scene.on_pointer_move(0.0, 0.0, Viewport::new(100.0, 100.0)));
        assert_eq!(scene.rotation(), (0.0, 0.0));
    }

    #[test]
    fn test_tick_moves_every_star() {
        let mut scene = hero(8);
        let before: Vec<Vec3> = scene.stars().iter().map(|s| s.position).collect();
        let dt = 1.0 / 60.0;
        scene.tick(dt);
        for (star, old) in scene.stars().iter().zip(&before) {
            assert_eq!(star.trail.head(), *old + star.direction * star.speed * dt);
        }
    }

    #[test]
    fn test_frame_exposes_state() {
        let mut scene = hero(2);
        scene.tick(0.016);
        scene.on_pointer_move(0.0, 0.0, Viewport::new(10.0, 10.0));
        let frame = scene.frame();
        assert_eq!(frame.field_points.len(), HERO_STAR_COUNT);
        assert_eq!(frame.stars.len(), SHOOTING_STAR_COUNT);
        assert_eq!(frame.field_rotation.z, HERO_BASE_TILT_Z);
        assert!((frame.field_rotation.x - 0.05).abs() < 1e-6);
        assert!((frame.field_rotation.y + 0.05).abs() < 1e-6);
        for (sf, star) in frame.stars.iter().zip(scene.stars()) {
            assert_eq!(sf.head, star.position);
            assert_eq!(sf.trail.len(), TRAIL_LENGTH);
        }
        assert_eq!(frame.field_material, FieldMaterial::HERO);
    }

    #[test]
    fn test_rotation_matrix_base_tilt() {
        let scene = hero(4);
        let m = scene.frame().field_rotation_matrix();
        let v = m * Vec3::X;
        let s = std::f32::consts::FRAC_1_SQRT_2;
        assert!((v - Vec3::new(s, s, 0.0)).length() < 1e-5);
    }
}
