// sweep.rs - Decorative sweep lines
//
// Each sweep draws itself from one endpoint to the other, holds, retracts,
// holds, and repeats. Endpoints are fractions of the surface so they
// survive aspect changes without regeneration.

pub struct Sweeps {
    // Endpoints in [0, 1) surface fractions
    pub x1: Vec<f32>,
    pub y1: Vec<f32>,
    pub x2: Vec<f32>,
    pub y2: Vec<f32>,

    pub duration: Vec<f32>, // seconds per stroke
}

impl Sweeps {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            x1: Vec::with_capacity(n),
            y1: Vec::with_capacity(n),
            x2: Vec::with_capacity(n),
            y2: Vec::with_capacity(n),
            duration: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, a: (f32, f32), b: (f32, f32), duration: f32) {
        self.x1.push(a.0);
        self.y1.push(a.1);
        self.x2.push(b.0);
        self.y2.push(b.1);
        self.duration.push(duration);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.x1.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x1.is_empty()
    }

    /// Drawn fraction of sweep `i` at `time` seconds, in [0, 1]
    pub fn progress(&self, i: usize, time: f32, hold: f32) -> f32 {
        stroke_progress(time, self.duration[i], hold)
    }
}

/// Forward stroke, hold, reverse stroke, hold.
pub fn stroke_progress(time: f32, duration: f32, hold: f32) -> f32 {
    if !(duration > 0.0) { return 1.0; }
    let hold = hold.max(0.0);
    let period = 2.0 * (duration + hold);
    let u = time.rem_euclid(period);

    if u < duration {
        ease_in_out(u / duration)
    } else if u < duration + hold {
        1.0
    } else if u < 2.0 * duration + hold {
        1.0 - ease_in_out((u - duration - hold) / duration)
    } else {
        0.0
    }
}

#[inline]
fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
