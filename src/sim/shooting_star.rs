//! Self-propelled shooting star with an owned trail

use glam::Vec3;
use rand::Rng;

use super::trail::TrailBuffer;
use crate::consts::*;

/// Initial parameters of a shooting star
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShootingStarSpawn {
    pub position: Vec3,
    /// Direction in the x/y plane (z is always 0), not normalized
    pub direction: Vec3,
    pub speed: f32,
}

impl ShootingStarSpawn {
    /// Random spawn inside the default inner region
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::random_in(rng, Vec3::from(SPAWN_HALF_EXTENTS), SPEED_MIN, SPEED_MAX)
    }

    /// Random spawn: position uniform in `[-half, half)`, direction x/y
    /// uniform in `[-1, 1)`, speed uniform in `[speed_min, speed_max)`
    pub fn random_in(rng: &mut impl Rng, half: Vec3, speed_min: f32, speed_max: f32) -> Self {
        let mut centered = |h: f32| (rng.random::<f32>() - 0.5) * 2.0 * h;
        let position = Vec3::new(centered(half.x), centered(half.y), centered(half.z));
        let direction = Vec3::new(centered(1.0), centered(1.0), 0.0);
        let speed = speed_min + rng.random::<f32>() * (speed_max - speed_min);
        Self {
            position,
            direction,
            speed,
        }
    }
}

/// One shooting star agent
#[derive(Debug, Clone, PartialEq)]
pub struct ShootingStar {
    /// Spawn point; the agent returns here when it leaves the bounds
    pub spawn: Vec3,
    pub position: Vec3,
    pub direction: Vec3,
    pub speed: f32,
    /// Reset once |x| or |y| exceeds this
    pub bound_half_extent: f32,
    pub trail: TrailBuffer,
}

impl ShootingStar {
    /// Create an agent with a trail of `trail_len` points at the origin
    pub fn new(spawn: ShootingStarSpawn, trail_len: usize, bound_half_extent: f32) -> Self {
        Self {
            spawn: spawn.position,
            position: spawn.position,
            direction: spawn.direction,
            speed: spawn.speed,
            bound_half_extent,
            trail: TrailBuffer::new(trail_len, Vec3::ZERO),
        }
    }

    /// Advance by `dt` seconds.
    ///
    /// Integrates, records the new position in the trail, then resets to the
    /// spawn point if outside the bounds. The trail is left as-is on reset.
    pub fn step(&mut self, dt: f32) {
        self.position += self.direction * self.speed * dt;
        self.trail.push(self.position);

        if self.out_of_bounds() {
            self.position = self.spawn;
        }
    }

    #[inline]
    fn out_of_bounds(&self) -> bool {
        self.position.x.abs() > self.bound_half_extent
            || self.position.y.abs() > self.bound_half_extent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::seeded;

    fn straight_line() -> ShootingStar {
        ShootingStar::new(
            ShootingStarSpawn {
                position: Vec3::ZERO,
                direction: Vec3::X,
                speed: 10.0,
            },
            TRAIL_LENGTH,
            5.0,
        )
    }

    #[test]
    fn test_step_integrates_and_records() {
        let mut star = straight_line();
        star.step(0.25);
        assert_eq!(star.position, Vec3::new(2.5, 0.0, 0.0));
        assert_eq!(star.trail.head(), star.position);
        assert_eq!(star.trail.read()[1], Vec3::ZERO);
    }

    #[test]
    fn test_bounds_reset_to_spawn_not_clamp() {
        let mut star = straight_line();
        star.step(0.5);
        assert_eq!(star.position.x, 5.0);
        // Exactly on the bound is still inside
        star.step(0.0);
        assert_eq!(star.position.x, 5.0);

        star.step(0.5);
        assert_eq!(star.position.x, 0.0, "reset to spawn, not clamped to 5");
        // Trail keeps the out-of-bounds sample
        assert_eq!(star.trail.head(), Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(star.direction, Vec3::X);
        assert_eq!(star.speed, 10.0);
    }

    #[test]
    fn test_reset_on_y_axis() {
        let mut star = ShootingStar::new(
            ShootingStarSpawn {
                position: Vec3::new(1.0, -1.0, 0.5),
                direction: Vec3::new(0.0, -1.0, 0.0),
                speed: 3.0,
            },
            4,
            5.0,
        );
        star.step(1.0);
        star.step(1.0);
        assert_eq!(star.position, Vec3::new(1.0, -1.0, 0.5));
    }

    #[test]
    fn test_random_spawn_ranges() {
        let mut rng = seeded(42);
        for _ in 0..500 {
            let s = ShootingStarSpawn::random(&mut rng);
            assert!(s.position.x.abs() <= 2.0 && s.position.y.abs() <= 2.0);
            assert!(s.position.z.abs() <= 1.0);
            assert!(s.direction.x.abs() <= 1.0 && s.direction.y.abs() <= 1.0);
            assert_eq!(s.direction.z, 0.0);
            assert!((SPEED_MIN..SPEED_MAX).contains(&s.speed));
        }
    }

    #[test]
    fn test_seeded_spawns_repeat() {
        let a = ShootingStarSpawn::random(&mut seeded(9));
        let b = ShootingStarSpawn::random(&mut seeded(9));
        assert_eq!(a, b);
    }
}
