//! Procedural static star fields
//!
//! Generated once per field; only the field's aggregate rotation changes
//! afterwards (see `scene`).

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::spherical_to_cartesian;

/// Layout a static field is sampled from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldShape {
    /// Uniform directions on a spherical shell, radius uniform in `[min_radius, max_radius)`
    Shell { min_radius: f32, max_radius: f32 },
    /// Uniform inside an axis-aligned box centered on the origin
    Box { half_extents: [f32; 3] },
}

impl Default for FieldShape {
    fn default() -> Self {
        FieldShape::Shell {
            min_radius: FIELD_MIN_RADIUS,
            max_radius: FIELD_MAX_RADIUS,
        }
    }
}

impl FieldShape {
    /// Box layout for section backdrops
    pub fn subtle_box() -> Self {
        FieldShape::Box {
            half_extents: SUBTLE_BOX_HALF_EXTENTS,
        }
    }

    pub fn sample(&self, rng: &mut impl Rng, count: usize) -> Vec<Vec3> {
        match *self {
            FieldShape::Shell {
                min_radius,
                max_radius,
            } => generate_shell(rng, count, min_radius, max_radius),
            FieldShape::Box { half_extents } => generate_box(rng, count, Vec3::from(half_extents)),
        }
    }
}

/// `count` points on the default shell (radius 0.5..2.5)
pub fn generate(rng: &mut impl Rng, count: usize) -> Vec<Vec3> {
    generate_shell(rng, count, FIELD_MIN_RADIUS, FIELD_MAX_RADIUS)
}

/// `count` points on a spherical shell.
///
/// `phi = acos(u)` with `u ~ U(-1, 1)` keeps the density uniform over the
/// sphere instead of bunching at the poles.
pub fn generate_shell(rng: &mut impl Rng, count: usize, min_r: f32, max_r: f32) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            let radius = min_r + rng.random::<f32>() * (max_r - min_r);
            let theta = rng.random::<f32>() * TAU;
            let phi = (rng.random::<f32>() * 2.0 - 1.0).clamp(-1.0, 1.0).acos();
            spherical_to_cartesian(radius, theta, phi)
        })
        .collect()
}

/// `count` points uniform in `[-half, half)` per axis
pub fn generate_box(rng: &mut impl Rng, count: usize, half: Vec3) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            Vec3::new(
                (rng.random::<f32>() - 0.5) * 2.0 * half.x,
                (rng.random::<f32>() - 0.5) * 2.0 * half.y,
                (rng.random::<f32>() - 0.5) * 2.0 * half.z,
            )
        })
        .collect()
}

/// Immutable point cloud plus its current 2-axis tilt
#[derive(Debug, Clone)]
pub struct StaticField {
    points: Box<[Vec3]>,
    /// Rotation around x (radians)
    pub rotation_x: f32,
    /// Rotation around y (radians)
    pub rotation_y: f32,
}

impl StaticField {
    pub fn new(rng: &mut impl Rng, shape: FieldShape, count: usize) -> Self {
        Self::from_points(shape.sample(rng, count))
    }

    pub fn from_points(points: Vec<Vec3>) -> Self {
        Self {
            points: points.into_boxed_slice(),
            rotation_x: 0.0,
            rotation_y: 0.0,
        }
    }

    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
