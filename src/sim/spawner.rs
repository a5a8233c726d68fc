//! Finite-lifetime 2D particle emitter for the CSS shooting stars
//!
//! Independent of the 3D frame loop. Particles go spawned -> active ->
//! expired; each one carries its own deadline, so removal never waits for
//! the next spawn tick.
//!
//! Two ways to drive it:
//! - timer-driven: the host calls `spawn` from a periodic timer and
//!   `expire` from a per-particle one-shot timer
//! - clock-driven: `advance(now)` replays every spawn/expiry up to `now`
//!   in chronological order

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rng::SceneRng;
use crate::consts::*;

/// Unique particle token
pub type ParticleId = u64;

/// One CSS particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CssParticle {
    pub id: ParticleId,
    /// Horizontal position in percent of the viewport width, `[0, 100)`
    pub horizontal_position: f32,
    /// Seconds from spawn to removal
    pub lifetime: f64,
    /// Spawn time (seconds)
    pub spawned_at: f64,
}

impl CssParticle {
    #[inline]
    pub fn expires_at(&self) -> f64 {
        self.spawned_at + self.lifetime
    }

    /// Active on `[spawned_at, spawned_at + lifetime)`
    #[inline]
    pub fn is_active_at(&self, t: f64) -> bool {
        t >= self.spawned_at && t < self.expires_at()
    }
}

/// Spawner timing (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnerConfig {
    pub period: f64,
    pub lifetime_min: f64,
    pub lifetime_max: f64,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            period: CSS_SPAWN_PERIOD,
            lifetime_min: CSS_LIFETIME_MIN,
            lifetime_max: CSS_LIFETIME_MAX,
        }
    }
}

impl SpawnerConfig {
    /// Upper bound on concurrently active particles in steady state
    pub fn max_active(&self) -> usize {
        if self.period <= 0.0 {
            return usize::MAX;
        }
        (self.lifetime_max / self.period).ceil() as usize
    }
}

/// Lifecycle transitions reported by `advance`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnerEvent {
    Spawned(CssParticle),
    Expired(ParticleId),
}

/// The CSS particle emitter
#[derive(Debug, Clone)]
pub struct CssSpawner<R = SceneRng> {
    config: SpawnerConfig,
    rng: R,
    active: HashMap<ParticleId, CssParticle>,
    next_id: ParticleId,
    /// Time of the next periodic spawn (clock-driven mode)
    next_spawn_at: f64,
}

impl<R: Rng> CssSpawner<R> {
    /// Create a spawner whose timer starts at `start`; the first particle
    /// appears one period later
    pub fn new(config: SpawnerConfig, rng: R, start: f64) -> Self {
        Self {
            config,
            rng,
            active: HashMap::new(),
            next_id: 1,
            next_spawn_at: start + config.period,
        }
    }

    pub fn config(&self) -> &SpawnerConfig {
        &self.config
    }

    /// Create one particle at `now` with randomized position and lifetime
    pub fn spawn(&mut self, now: f64) -> CssParticle {
        let id = self.next_id;
        self.next_id += 1;

        let horizontal_position = self.rng.random_range(0.0f32..100.0);
        let SpawnerConfig {
            lifetime_min,
            lifetime_max,
            ..
        } = self.config;
        let lifetime = if lifetime_max > lifetime_min {
            self.rng.random_range(lifetime_min..lifetime_max)
        } else {
            lifetime_min
        };

        let particle = CssParticle {
            id,
            horizontal_position,
            lifetime,
            spawned_at: now,
        };
        self.active.insert(id, particle);
        log::debug!(
            "css star {} spawned at {:.1}% for {:.2}s",
            id,
            horizontal_position,
            lifetime
        );
        particle
    }

    /// Remove a particle; `None` if it was already gone
    pub fn expire(&mut self, id: ParticleId) -> Option<CssParticle> {
        let removed = self.active.remove(&id);
        if removed.is_some() {
            log::debug!("css star {} expired", id);
        }
        removed
    }

    /// Replay all timer fires up to and including `now`
    pub fn advance(&mut self, now: f64) -> Vec<SpawnerEvent> {
        let mut events = Vec::new();
        loop {
            let next_expiry = self
                .active
                .values()
                .map(|p| (p.expires_at(), p.id))
                .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

            let spawn_due = self.config.period > 0.0 && self.next_spawn_at <= now;
            match next_expiry {
                // Expiries first on ties so a slot frees before the next spawn
                Some((at, id)) if at <= now && (!spawn_due || at <= self.next_spawn_at) => {
                    self.expire(id);
                    events.push(SpawnerEvent::Expired(id));
                }
                _ if spawn_due => {
                    let at = self.next_spawn_at;
                    self.next_spawn_at += self.config.period;
                    let particle = self.spawn(at);
                    events.push(SpawnerEvent::Spawned(particle));
                }
                _ => break,
            }
        }
        events
    }

    /// Unordered view of the active set
    pub fn active(&self) -> impl Iterator<Item = &CssParticle> {
        self.active.values()
    }

    pub fn get(&self, id: ParticleId) -> Option<&CssParticle> {
        self.active.get(&id)
    }

    pub fn contains(&self, id: ParticleId) -> bool {
        self.active.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Drop every active particle (teardown)
    pub fn clear(&mut self) {
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::seeded;
    use proptest::prelude::*;

    fn spawner(seed: u64) -> CssSpawner {
        CssSpawner::new(SpawnerConfig::default(), seeded(seed), 0.0)
    }

    #[test]
    fn test_spawn_ranges() {
        let mut s = spawner(1);
        for i in 0..200 {
            let p = s.spawn(i as f64);
            assert!((0.0..100.0).contains(&p.horizontal_position));
            assert!((2.0..5.0).contains(&p.lifetime));
        }
        assert_eq!(s.len(), 200);
    }

    #[test]
    fn test_ids_unique() {
        let mut s = spawner(2);
        let a = s.spawn(0.0);
        let b = s.spawn(0.0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_expire_twice() {
        let mut s = spawner(3);
        let p = s.spawn(0.0);
        assert_eq!(s.expire(p.id), Some(p));
        assert_eq!(s.expire(p.id), None);
        assert!(s.is_empty());
    }

    #[test]
    fn test_first_spawn_after_one_period() {
        let mut s = spawner(4);
        assert!(s.advance(2.999).is_empty());
        let events = s.advance(3.0);
        assert_eq!(events.len(), 1);
        let SpawnerEvent::Spawned(p) = events[0] else {
            panic!("expected a spawn, got {:?}", events[0]);
        };
        assert_eq!(p.spawned_at, 3.0);
        assert!(s.contains(p.id));
    }

    #[test]
    fn test_removal_not_batched_with_spawns() {
        let mut s = spawner(5);
        s.advance(3.0);
        let p = *s.active().next().unwrap();
        // Removed at its own deadline, well before the next spawn at t=6
        s.advance(p.expires_at());
        assert!(!s.contains(p.id));
        assert!(p.expires_at() < 8.0);
    }

    #[test]
    fn test_steady_state_bound() {
        let mut s = spawner(6);
        let bound = s.config().max_active();
        assert_eq!(bound, 2);
        let mut t = 0.0;
        while t < 600.0 {
            t += 0.25;
            s.advance(t);
            assert!(s.len() <= bound, "{} active at t={t}", s.len());
        }
    }

    #[test]
    fn test_fixed_lifetime_config() {
        let config = SpawnerConfig {
            period: 1.0,
            lifetime_min: 2.0,
            lifetime_max: 2.0,
        };
        let mut s = CssSpawner::new(config, seeded(7), 0.0);
        let p = s.spawn(0.0);
        assert_eq!(p.lifetime, 2.0);
    }

    proptest! {
        #[test]
        fn lifecycle_window(seed in any::<u64>(), probe in 0.0f64..0.999) {
            let mut s = spawner(seed);
            // Catch the first particle right at its spawn
            let spawned: Vec<CssParticle> = s
                .advance(3.0)
                .into_iter()
                .filter_map(|e| match e {
                    SpawnerEvent::Spawned(p) => Some(p),
                    SpawnerEvent::Expired(_) => None,
                })
                .collect();
            prop_assert_eq!(spawned.len(), 1);
            let p = spawned[0];
            prop_assert!(s.contains(p.id));

            // Anywhere inside [T, T + D) it is still present
            let inside = p.spawned_at + probe * p.lifetime;
            s.advance(inside);
            prop_assert!(p.is_active_at(inside));
            prop_assert!(s.contains(p.id));

            // From T + D on it is gone for good
            s.advance(p.expires_at());
            prop_assert!(!s.contains(p.id));
            s.advance(p.expires_at() + 10.0);
            prop_assert!(!s.contains(p.id));
        }
    }
}
