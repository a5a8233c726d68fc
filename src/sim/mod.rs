//! Deterministic animation module
//!
//! All animated state lives here. This module must be pure and deterministic:
//! - Time only enters through explicit deltas / timestamps
//! - Injected RNG only (see `rng`)
//! - No rendering or platform dependencies

pub mod cursor;
pub mod field;
pub mod rng;
pub mod scene;
pub mod shooting_star;
pub mod spawner;
pub mod trail;

pub use cursor::{CursorState, CursorTransform};
pub use field::{FieldShape, StaticField, generate, generate_box, generate_shell};
pub use rng::{SceneRng, entropy_seed, seeded};
pub use scene::{
    FieldMaterial, ParticleScene, SceneConfig, SceneFrame, StarFrame, Viewport, normalize_pointer,
};
pub use shooting_star::{ShootingStar, ShootingStarSpawn};
pub use spawner::{CssParticle, CssSpawner, ParticleId, SpawnerConfig, SpawnerEvent};
pub use trail::TrailBuffer;
