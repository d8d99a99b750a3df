// ============================================================================
// AMBIENT NETWORK - Drifting particle network background with twinkling stars
// ============================================================================
//
// The core (scene, gate, scheduler, renderer) is plain Rust and runs
// anywhere. `web` binds it to a browser canvas when built for wasm32.

pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod render;
pub mod rng;
pub mod scene;
pub mod scheduler;
pub mod subscription;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{Backdrop, DensityTier, NetworkConfig, Rgb, Span, TierCounts};
pub use engine::NetworkBackground;
pub use error::{EngineError, Result};
pub use gate::VisibilityGate;
pub use render::{Renderer, link_opacity};
pub use scene::Scene;
pub use scheduler::{FrameHost, FrameScheduler, ManualHost, SchedulerState};
pub use subscription::Subscriptions;
pub use surface::{PixelBuffer, Surface};
