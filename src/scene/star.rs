// star.rs - Stationary twinkling points
//
// Stars never move and never interact with particles. Only their opacity
// changes, as a function of global time.

pub struct Stars {
    pub x: Vec<f32>,
    pub y: Vec<f32>,

    // Twinkle
    pub phase: Vec<f32>, // radians
    pub speed: Vec<f32>, // radians per second
    pub base: Vec<f32>,  // resting opacity
}

impl Stars {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            phase: Vec::with_capacity(n),
            speed: Vec::with_capacity(n),
            base: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, x: f32, y: f32, phase: f32, speed: f32, base: f32) {
        self.x.push(x);
        self.y.push(y);
        self.phase.push(phase);
        self.speed.push(speed);
        self.base.push(base);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Opacity of star `i` at `time` seconds
    #[inline]
    pub fn opacity(&self, i: usize, time: f32, amplitude: f32) -> f32 {
        twinkle(self.base[i], amplitude, time, self.speed[i], self.phase[i])
    }
}

/// `base + amplitude * (sin(time * speed + phase) + 1) / 2`, capped at 1
#[inline]
pub fn twinkle(base: f32, amplitude: f32, time: f32, speed: f32, phase: f32) -> f32 {
    let wave = ((time * speed + phase).sin() + 1.0) * 0.5;
    (base + amplitude * wave).min(1.0)
}
