// rng.rs - xorshift32
//
// Small and seedable so scenes are reproducible in tests and previews.

pub struct Rng(u32);

impl Rng {
    pub fn new(seed: u32) -> Self {
        // xorshift has a fixed point at zero
        Self(if seed == 0 { 0xDEADBEEF } else { seed })
    }

    /// Uniform in [0, 1)
    #[inline(always)]
    pub fn next_f32(&mut self) -> f32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        (self.0 >> 8) as f32 * (1.0 / 16777216.0)
    }

    /// Uniform in [-mag, mag)
    #[inline]
    pub fn signed(&mut self, mag: f32) -> f32 {
        (self.next_f32() * 2.0 - 1.0) * mag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_in_unit_interval() {
        let mut rng = Rng::new(7);
        for _ in 0..10_000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn zero_seed_still_moves() {
        let mut rng = Rng::new(0);
        assert_ne!(rng.next_f32(), rng.next_f32());
    }
}
