// config.rs - Tuning constants for the ambient network
//
// Everything visual is a presentation knob. The host may pass a JSON
// object with any subset of fields; the rest keep their defaults.
//
// Two properties are worth keeping when retuning:
//   - desktop counts are roughly 1.7x the mobile counts
//   - link opacity falls off linearly to zero at `link_distance`

use serde::{Deserialize, Deserializer};

use crate::error::{EngineError, Result};

pub type Rgb = [u8; 3];

/// Inclusive-exclusive float range, written as `[min, max]` in JSON.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Span(pub f32, pub f32);

impl Span {
    #[inline]
    pub fn lerp(self, t: f32) -> f32 {
        self.0 + (self.1 - self.0) * t
    }

    fn is_ordered(self) -> bool {
        self.0 <= self.1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DensityTier {
    Mobile,
    Desktop,
}

impl DensityTier {
    /// The one place the breakpoint is compared. Width equal to the
    /// breakpoint already counts as desktop.
    pub fn for_width(width: u32, breakpoint: u32) -> Self {
        if width < breakpoint { DensityTier::Mobile } else { DensityTier::Desktop }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierCounts {
    pub particles: usize,
    pub stars: usize,
    pub sweeps: usize,
}

const MOBILE_COUNTS: TierCounts = TierCounts { particles: 14, stars: 14, sweeps: 5 };
const DESKTOP_COUNTS: TierCounts = TierCounts { particles: 24, stars: 24, sweeps: 8 };

// Tier objects in JSON may name only some counts
#[derive(Deserialize)]
struct TierPatch {
    particles: Option<usize>,
    stars: Option<usize>,
    sweeps: Option<usize>,
}

impl TierPatch {
    fn over(self, base: TierCounts) -> TierCounts {
        TierCounts {
            particles: self.particles.unwrap_or(base.particles),
            stars: self.stars.unwrap_or(base.stars),
            sweeps: self.sweeps.unwrap_or(base.sweeps),
        }
    }
}

fn mobile_counts<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<TierCounts, D::Error> {
    Ok(TierPatch::deserialize(de)?.over(MOBILE_COUNTS))
}

fn desktop_counts<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<TierCounts, D::Error> {
    Ok(TierPatch::deserialize(de)?.over(DESKTOP_COUNTS))
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Backdrop {
    pub base: Rgb,
    // Horizontal tint, transparent on the left edge
    pub tint: Rgb,
    pub tint_alpha: f32,
    // Radial glow anchored at the top-right corner
    pub glow: Rgb,
    pub glow_alpha: f32,
    /// Glow falloff radius as a fraction of the surface diagonal
    pub glow_radius: f32,
}

impl Backdrop {
    /// Glow falloff radius in the same units as `w` and `h`
    pub fn glow_extent(&self, w: f32, h: f32) -> f32 {
        self.glow_radius * (w * w + h * h).sqrt()
    }
}

/// `rgba(r, g, b, a)` for canvas styles
pub fn css_rgba(c: Rgb, alpha: f32) -> String {
    format!("rgba({}, {}, {}, {})", c[0], c[1], c[2], alpha.clamp(0.0, 1.0))
}

impl Default for Backdrop {
    fn default() -> Self {
        Self {
            base: [10, 10, 10],
            tint: [239, 68, 68],
            tint_alpha: 0.15,
            glow: [234, 88, 12],
            glow_alpha: 0.25,
            glow_radius: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub breakpoint: u32,
    #[serde(deserialize_with = "mobile_counts")]
    pub mobile: TierCounts,
    #[serde(deserialize_with = "desktop_counts")]
    pub desktop: TierCounts,

    // Particles (units per frame at 60fps)
    pub particle_speed: f32,
    pub particle_radius: Span,
    pub particle_color: Rgb,

    // Pulse: radius grows by `pulse_scale` and opacity drops by
    // `pulse_fade` over `pulse_duration` seconds, then rests `pulse_delay`
    pub pulse_scale: f32,
    pub pulse_fade: f32,
    pub pulse_duration: f32,
    pub pulse_delay: f32,

    // Links
    pub link_distance: f32,
    pub link_alpha: f32,
    pub link_width: f32,
    pub link_color: Rgb,

    // Stars (speed in radians per second)
    pub star_opacity: Span,
    pub star_speed: Span,
    pub star_size: f32,
    pub twinkle: f32,
    pub star_color: Rgb,

    // Decorative sweeps (seconds)
    pub sweep_duration: Span,
    pub sweep_hold: f32,
    // Stroke alpha fades from start to end along the line
    pub sweep_alpha_start: f32,
    pub sweep_alpha_end: f32,
    // Peak opacity of the whole stroke at full progress
    pub sweep_opacity: f32,
    pub sweep_color: Rgb,

    // Scheduling
    pub frame_interval_ms: f64,
    pub max_delta: f32,
    pub intersection_threshold: f64,

    pub backdrop: Backdrop,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            breakpoint: 768,
            mobile: MOBILE_COUNTS,
            desktop: DESKTOP_COUNTS,
            particle_speed: 0.225,
            particle_radius: Span(1.0, 2.0),
            particle_color: [255, 255, 255],
            pulse_scale: 0.2,
            pulse_fade: 0.2,
            pulse_duration: 2.0,
            pulse_delay: 1.0,
            link_distance: 180.0,
            link_alpha: 0.8,
            link_width: 0.75,
            link_color: [255, 255, 255],
            star_opacity: Span(0.15, 0.5),
            star_speed: Span(0.5, 2.0),
            star_size: 2.0,
            twinkle: 0.35,
            star_color: [255, 255, 255],
            sweep_duration: Span(2.0, 4.0),
            sweep_hold: 0.5,
            sweep_alpha_start: 0.3,
            sweep_alpha_end: 0.1,
            sweep_opacity: 0.5,
            sweep_color: [255, 255, 255],
            frame_interval_ms: 1000.0 / 60.0,
            max_delta: 3.0,
            intersection_threshold: 0.1,
            backdrop: Backdrop::default(),
        }
    }
}

impl NetworkConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: NetworkConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn tier_for(&self, width: u32) -> DensityTier {
        DensityTier::for_width(width, self.breakpoint)
    }

    pub fn counts(&self, tier: DensityTier) -> TierCounts {
        match tier {
            DensityTier::Mobile => self.mobile,
            DensityTier::Desktop => self.desktop,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let bad = |msg: &str| Err(EngineError::InvalidConfig(msg.to_string()));

        if self.breakpoint == 0 { return bad("breakpoint must be positive"); }
        if !(self.link_distance > 0.0) { return bad("link_distance must be positive"); }
        if !(self.frame_interval_ms > 0.0) { return bad("frame_interval_ms must be positive"); }
        if !(self.max_delta >= 1.0) { return bad("max_delta must be at least one frame"); }
        if !(0.0..=1.0).contains(&self.intersection_threshold) {
            return bad("intersection_threshold must be within [0, 1]");
        }
        if self.particle_speed < 0.0 { return bad("particle_speed must not be negative"); }

        for (name, span) in [
            ("particle_radius", self.particle_radius),
            ("star_opacity", self.star_opacity),
            ("star_speed", self.star_speed),
            ("sweep_duration", self.sweep_duration),
        ] {
            if !span.is_ordered() {
                return Err(EngineError::InvalidConfig(format!("{name} range is inverted")));
            }
        }
        if self.sweep_duration.0 <= 0.0 { return bad("sweep_duration must be positive"); }
        if !(self.pulse_duration > 0.0) { return bad("pulse_duration must be positive"); }
        if self.pulse_delay < 0.0 { return bad("pulse_delay must not be negative"); }
        if self.pulse_scale < 0.0 { return bad("pulse_scale must not be negative"); }

        for (name, alpha) in [
            ("link_alpha", self.link_alpha),
            ("twinkle", self.twinkle),
            ("pulse_fade", self.pulse_fade),
            ("sweep_alpha_start", self.sweep_alpha_start),
            ("sweep_alpha_end", self.sweep_alpha_end),
            ("sweep_opacity", self.sweep_opacity),
            ("backdrop.tint_alpha", self.backdrop.tint_alpha),
            ("backdrop.glow_alpha", self.backdrop.glow_alpha),
        ] {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(EngineError::InvalidConfig(format!("{name} must be within [0, 1]")));
            }
        }
        Ok(())
    }
}
