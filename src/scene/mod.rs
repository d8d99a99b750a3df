// scene/ - Particles, stars and sweeps laid out against one surface size
//
// Entity storage is Structure-of-Arrays, one module per entity type.
// A Scene is never patched after a resize: the builder allocates a fresh
// one and the old one is dropped whole.

mod particle;
mod star;
mod sweep;

pub use particle::{Particles, pulse, wrap};
pub use star::Stars;
pub use sweep::Sweeps;

use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::{DensityTier, NetworkConfig};
use crate::rng::Rng;

static NEXT_EPOCH: AtomicU64 = AtomicU64::new(1);

pub struct Scene {
    // Surface size in CSS pixels
    pub w: u32,
    pub h: u32,
    pub tier: DensityTier,

    /// Unique per build, so a rebuilt scene is never mistaken for the old one
    pub epoch: u64,

    pub particles: Particles,
    pub stars: Stars,
    pub sweeps: Sweeps,
}

impl Scene {
    /// Allocate a fresh scene for the given surface size and density tier.
    ///
    /// Zero-sized surfaces are allowed; everything lands on the origin and
    /// nothing moves.
    pub fn build(w: u32, h: u32, tier: DensityTier, config: &NetworkConfig, rng: &mut Rng) -> Self {
        let counts = config.counts(tier);
        let (fw, fh) = (w as f32, h as f32);

        let mut particles = Particles::with_capacity(counts.particles);
        for _ in 0..counts.particles {
            let x = rng.next_f32() * fw;
            let y = rng.next_f32() * fh;
            let vx = rng.signed(config.particle_speed);
            let vy = rng.signed(config.particle_speed);
            let r = config.particle_radius.lerp(rng.next_f32());
            particles.push(x, y, vx, vy, r);
        }

        let mut stars = Stars::with_capacity(counts.stars);
        for _ in 0..counts.stars {
            let x = rng.next_f32() * fw;
            let y = rng.next_f32() * fh;
            let phase = rng.next_f32() * std::f32::consts::TAU;
            let speed = config.star_speed.lerp(rng.next_f32());
            let base = config.star_opacity.lerp(rng.next_f32());
            stars.push(x, y, phase, speed, base);
        }

        let mut sweeps = Sweeps::with_capacity(counts.sweeps);
        for _ in 0..counts.sweeps {
            let a = (rng.next_f32(), rng.next_f32());
            let b = (rng.next_f32(), rng.next_f32());
            let duration = config.sweep_duration.lerp(rng.next_f32());
            sweeps.push(a, b, duration);
        }

        Self {
            w,
            h,
            tier,
            epoch: NEXT_EPOCH.fetch_add(1, Ordering::Relaxed),
            particles,
            stars,
            sweeps,
        }
    }
}
