// gate.rs - Visibility gate
//
// Combines on-screen presence with the reduced-motion preference into a
// single "should animate" signal. The host feeds it events; there is no
// polling and no debounce.

pub struct VisibilityGate {
    threshold: f64,
    intersecting: bool,
    reduced_motion: bool,
}

impl VisibilityGate {
    /// Starts as visible so the first paint is never skipped while the
    /// intersection observer is still spinning up.
    pub fn new(threshold: f64, reduced_motion: bool) -> Self {
        Self { threshold, intersecting: true, reduced_motion }
    }

    #[inline]
    pub fn active(&self) -> bool {
        self.intersecting && !self.reduced_motion
    }

    pub fn intersecting(&self) -> bool {
        self.intersecting
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Record the visible fraction of the surface. Returns true if the
    /// active signal flipped.
    pub fn set_intersection(&mut self, ratio: f64) -> bool {
        let before = self.active();
        // a zero threshold still means "at least some pixel on screen"
        self.intersecting = if self.threshold > 0.0 { ratio >= self.threshold } else { ratio > 0.0 };
        before != self.active()
    }

    /// Returns true if the active signal flipped.
    pub fn set_reduced_motion(&mut self, reduce: bool) -> bool {
        let before = self.active();
        self.reduced_motion = reduce;
        before != self.active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_visible() {
        let gate = VisibilityGate::new(0.1, false);
        assert!(gate.intersecting());
        assert!(gate.active());
    }

    #[test]
    fn reduced_motion_wins_over_visibility() {
        let mut gate = VisibilityGate::new(0.1, true);
        assert!(!gate.active());
        assert!(!gate.set_intersection(1.0));
        assert!(!gate.active());
        assert!(gate.set_reduced_motion(false));
        assert!(gate.active());
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut gate = VisibilityGate::new(0.1, false);
        assert!(gate.set_intersection(0.05));
        assert!(!gate.active());
        assert!(gate.set_intersection(0.1));
        assert!(gate.active());
    }

    #[test]
    fn repeated_events_report_no_flip() {
        let mut gate = VisibilityGate::new(0.1, false);
        assert!(!gate.set_intersection(0.8));
        assert!(gate.set_intersection(0.0));
        assert!(!gate.set_intersection(0.0));
        assert!(!gate.set_reduced_motion(true));
    }
}
