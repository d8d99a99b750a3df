// particle.rs - Drifting network nodes
//
// Velocity is fixed at spawn. Positions live on a torus: anything that
// drifts off one edge re-enters from the opposite one.

pub struct Particles {
    // Position (CSS pixels)
    pub x: Vec<f32>,
    pub y: Vec<f32>,

    // Velocity (units per frame at 60fps)
    pub vx: Vec<f32>,
    pub vy: Vec<f32>,

    pub r: Vec<f32>,
}

impl Particles {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            vx: Vec::with_capacity(n),
            vy: Vec::with_capacity(n),
            r: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, x: f32, y: f32, vx: f32, vy: f32, r: f32) {
        self.x.push(x);
        self.y.push(y);
        self.vx.push(vx);
        self.vy.push(vy);
        self.r.push(r);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Step every particle by `velocity * delta` and wrap into [0, w) x [0, h)
    pub fn advance(&mut self, delta: f32, w: f32, h: f32) {
        for i in 0..self.len() {
            self.x[i] = wrap(self.x[i] + self.vx[i] * delta, w);
            self.y[i] = wrap(self.y[i] + self.vy[i] * delta, h);
        }
    }
}

/// Fold `v` into [0, dim). Degenerate dimensions pin to the origin.
#[inline]
pub fn wrap(v: f32, dim: f32) -> f32 {
    if !(dim > 0.0) { return 0.0; }
    let m = v.rem_euclid(dim);
    // rem_euclid can round up to `dim` for tiny negative inputs
    if m >= 0.0 && m < dim { m } else { 0.0 }
}

/// Pulse strength in [0, 1] at `time` seconds: eases up and back down over
/// `duration`, then rests at 0 for `delay`. Every node shares the phase.
pub fn pulse(time: f32, duration: f32, delay: f32) -> f32 {
    if !(duration > 0.0) || !time.is_finite() { return 0.0; }
    let t = time.max(0.0).rem_euclid(duration + delay.max(0.0));
    if t >= duration { return 0.0; }
    let tri = 1.0 - (2.0 * t / duration - 1.0).abs();
    tri * tri * (3.0 - 2.0 * tri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_past_right_edge() {
        let mut p = Particles::with_capacity(1);
        p.push(999.0, 400.0, 5.0, 0.0, 1.0);
        p.advance(1.0, 1000.0, 800.0);
        assert_eq!(p.x[0], 4.0);
        assert_eq!(p.y[0], 400.0);
    }

    #[test]
    fn wraps_past_top_edge() {
        let mut p = Particles::with_capacity(1);
        p.push(10.0, 0.5, 0.0, -2.0, 1.0);
        p.advance(1.0, 100.0, 100.0);
        assert_eq!(p.y[0], 98.5);
    }

    #[test]
    fn wrap_holds_for_extreme_inputs() {
        let dims = [1.0, 3.0, 767.0, 1000.0, 1920.0];
        let values = [-1e-8, -0.0, -1.0, -1e6, 1e6, 1e-8, 2.5e9, f32::MIN_POSITIVE];
        for &d in &dims {
            for &v in &values {
                let w = wrap(v, d);
                assert!(w >= 0.0 && w < d, "wrap({v}, {d}) = {w}");
            }
            for k in 0..200 {
                let w = wrap(d * k as f32 - 1e-5, d);
                assert!(w >= 0.0 && w < d);
            }
        }
    }

    #[test]
    fn wrap_handles_non_finite() {
        assert_eq!(wrap(f32::NAN, 10.0), 0.0);
        assert_eq!(wrap(f32::INFINITY, 10.0), 0.0);
        assert_eq!(wrap(5.0, 0.0), 0.0);
    }

    #[test]
    fn invariant_holds_over_many_frames() {
        let mut p = Particles::with_capacity(4);
        p.push(0.0, 0.0, -7.3, 11.9, 1.0);
        p.push(499.9, 299.9, 0.225, 0.225, 1.0);
        p.push(250.0, 150.0, -400.0, 900.0, 1.0);
        p.push(1.0, 1.0, 3.0, -3.0, 1.0);
        for frame in 0..2_000 {
            let delta = 1.0 + (frame % 3) as f32;
            p.advance(delta, 500.0, 300.0);
            for i in 0..p.len() {
                assert!(p.x[i] >= 0.0 && p.x[i] < 500.0);
                assert!(p.y[i] >= 0.0 && p.y[i] < 300.0);
            }
        }
    }

    #[test]
    fn pulse_peaks_mid_cycle_then_rests() {
        assert_eq!(pulse(0.0, 2.0, 1.0), 0.0);
        assert_eq!(pulse(1.0, 2.0, 1.0), 1.0);
        assert!((pulse(0.5, 2.0, 1.0) - pulse(1.5, 2.0, 1.0)).abs() < 1e-6);
        // Rest window
        assert_eq!(pulse(2.5, 2.0, 1.0), 0.0);
        // Next cycle starts at 3s
        assert_eq!(pulse(4.0, 2.0, 1.0), 1.0);
    }

    #[test]
    fn pulse_stays_in_unit_range() {
        for k in 0..600 {
            let v = pulse(k as f32 * 0.013, 2.0, 1.0);
            assert!((0.0..=1.0).contains(&v));
        }
        assert_eq!(pulse(1.0, 0.0, 1.0), 0.0);
        assert_eq!(pulse(f32::NAN, 2.0, 1.0), 0.0);
    }
}
