// render.rs - Paint one frame of the scene
//
// Frame order:
//   1. clear to backdrop
//   2. advance particle positions (the only scene mutation)
//   3. sweeps, links, particles, stars
//
// Nodes pulse together: radius up, opacity down, on one shared clock.
//
// Links are an all-pairs scan. The tiers cap particles at a few dozen, so
// a spatial index would cost more than it saves.

use crate::config::{NetworkConfig, Rgb};
use crate::scene::{Scene, pulse};
use crate::surface::Surface;

pub struct Renderer {
    link_distance: f32,
    link_alpha: f32,
    link_width: f32,
    link_color: Rgb,

    particle_color: Rgb,
    pulse_scale: f32,
    pulse_fade: f32,
    pulse_duration: f32,
    pulse_delay: f32,

    star_size: f32,
    twinkle: f32,
    star_color: Rgb,

    sweep_hold: f32,
    sweep_alpha_start: f32,
    sweep_alpha_end: f32,
    sweep_opacity: f32,
    sweep_color: Rgb,
}

impl Renderer {
    pub fn new(config: &NetworkConfig) -> Self {
        Self {
            link_distance: config.link_distance,
            link_alpha: config.link_alpha,
            link_width: config.link_width,
            link_color: config.link_color,
            particle_color: config.particle_color,
            pulse_scale: config.pulse_scale,
            pulse_fade: config.pulse_fade,
            pulse_duration: config.pulse_duration,
            pulse_delay: config.pulse_delay,
            star_size: config.star_size,
            twinkle: config.twinkle,
            star_color: config.star_color,
            sweep_hold: config.sweep_hold,
            sweep_alpha_start: config.sweep_alpha_start,
            sweep_alpha_end: config.sweep_alpha_end,
            sweep_opacity: config.sweep_opacity,
            sweep_color: config.sweep_color,
        }
    }

    /// Advance particles by `delta` nominal frames and paint the scene.
    /// `time` is global time in seconds and drives the twinkle and sweeps.
    pub fn draw<S: Surface>(&self, scene: &mut Scene, surface: &mut S, delta: f32, time: f32) {
        surface.clear();
        scene.particles.advance(delta, scene.w as f32, scene.h as f32);

        self.draw_sweeps(scene, surface, time);
        self.draw_links(scene, surface);
        self.draw_particles(scene, surface, time);
        self.draw_stars(scene, surface, time);

        surface.present();
    }

    fn draw_sweeps<S: Surface>(&self, scene: &Scene, surface: &mut S, time: f32) {
        let (w, h) = (scene.w as f32, scene.h as f32);
        let sw = &scene.sweeps;
        for i in 0..sw.len() {
            let p = sw.progress(i, time, self.sweep_hold);
            if p <= 0.0 { continue; }
            let (x1, y1) = (sw.x1[i] * w, sw.y1[i] * h);
            let (x2, y2) = (x1 + (sw.x2[i] * w - x1) * p, y1 + (sw.y2[i] * h - y1) * p);
            // The gradient spans the full line; only the drawn part is stroked
            let a1 = self.sweep_alpha_start;
            let a2 = a1 + (self.sweep_alpha_end - a1) * p;
            let fade = self.sweep_opacity * p;
            surface.fade_line(x1, y1, x2, y2, 1.0, self.sweep_color, a1 * fade, a2 * fade);
        }
    }

    fn draw_links<S: Surface>(&self, scene: &Scene, surface: &mut S) {
        let p = &scene.particles;
        let max_sq = self.link_distance * self.link_distance;

        for i in 0..p.len() {
            for j in (i + 1)..p.len() {
                let dx = p.x[i] - p.x[j];
                let dy = p.y[i] - p.y[j];
                let d2 = dx * dx + dy * dy;
                if d2 >= max_sq { continue; }

                let alpha = link_opacity(d2.sqrt(), self.link_distance, self.link_alpha);
                if alpha <= 0.0 { continue; }
                surface.line(p.x[i], p.y[i], p.x[j], p.y[j], self.link_width, self.link_color, alpha);
            }
        }
    }

    fn draw_particles<S: Surface>(&self, scene: &Scene, surface: &mut S, time: f32) {
        let k = pulse(time, self.pulse_duration, self.pulse_delay);
        let grow = 1.0 + self.pulse_scale * k;
        let alpha = 1.0 - self.pulse_fade * k;

        let p = &scene.particles;
        for i in 0..p.len() {
            surface.disc(p.x[i], p.y[i], p.r[i] * grow, self.particle_color, alpha);
        }
    }

    fn draw_stars<S: Surface>(&self, scene: &Scene, surface: &mut S, time: f32) {
        let s = &scene.stars;
        let half = self.star_size * 0.5;
        for i in 0..s.len() {
            let alpha = s.opacity(i, time, self.twinkle);
            surface.rect(s.x[i] - half, s.y[i] - half, self.star_size, self.star_size, self.star_color, alpha);
        }
    }
}

/// Linear falloff: `alpha_scale` at distance 0, zero at `max_dist` and beyond
#[inline]
pub fn link_opacity(dist: f32, max_dist: f32, alpha_scale: f32) -> f32 {
    ((1.0 - dist / max_dist) * alpha_scale).max(0.0)
}
