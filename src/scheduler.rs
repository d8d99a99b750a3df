// scheduler.rs - Frame scheduler
//
// Owns the per-frame loop and the Idle / Running / Rebuilding state.
// The host decides when a requested frame actually fires; the scheduler
// only guarantees that at most one request is ever outstanding.

use log::{debug, warn};

/// Source of "run before the next repaint" callbacks.
pub trait FrameHost {
    type Handle: Copy + Eq + std::fmt::Debug;

    /// Ask for one frame callback. `None` if the host refused.
    fn request_frame(&mut self) -> Option<Self::Handle>;

    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Host driven by hand: requests queue up until the caller takes them.
/// Used headless (preview rendering) and in tests.
#[derive(Default)]
pub struct ManualHost {
    next: u32,
    outstanding: Vec<u32>,
    requests: usize,
    cancels: usize,
}

impl ManualHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    /// Total requests ever made
    pub fn requests(&self) -> usize {
        self.requests
    }

    pub fn cancels(&self) -> usize {
        self.cancels
    }

    /// Consume the oldest outstanding request, as if the display fired it
    pub fn take_due(&mut self) -> Option<u32> {
        if self.outstanding.is_empty() { None } else { Some(self.outstanding.remove(0)) }
    }
}

impl FrameHost for ManualHost {
    type Handle = u32;

    fn request_frame(&mut self) -> Option<u32> {
        self.next += 1;
        self.requests += 1;
        self.outstanding.push(self.next);
        Some(self.next)
    }

    fn cancel_frame(&mut self, handle: u32) {
        self.cancels += 1;
        self.outstanding.retain(|&h| h != handle);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Rebuilding,
}

pub struct FrameScheduler<H: FrameHost> {
    host: H,
    state: SchedulerState,
    pending: Option<H::Handle>,
    last_frame: Option<f64>,

    // Timing
    frame_interval: f64, // ms per nominal frame
    max_delta: f32,      // in nominal frames
}

impl<H: FrameHost> FrameScheduler<H> {
    pub fn new(host: H, frame_interval: f64, max_delta: f32) -> Self {
        Self {
            host,
            state: SchedulerState::Idle,
            pending: None,
            last_frame: None,
            frame_interval,
            max_delta,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    /// 0 or 1, never more
    pub fn outstanding(&self) -> usize {
        self.pending.is_some() as usize
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Idle -> Running. No-op while a frame is already pending.
    pub fn start(&mut self) {
        if self.pending.is_some() { return; }

        // Resume with a nominal step instead of the whole paused interval
        self.last_frame = None;
        self.schedule();
        if self.pending.is_some() {
            debug!("scheduler running");
        }
    }

    /// Running -> Idle. Safe to call any number of times.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.host.cancel_frame(handle);
            debug!("scheduler idle");
        }
        self.state = SchedulerState::Idle;
    }

    /// Handle a fired frame callback: compute the clamped delta, draw,
    /// record the timestamp and queue the next frame.
    pub fn fire(&mut self, now: f64, draw: impl FnOnce(f32)) {
        if self.state != SchedulerState::Running { return; }
        // A callback we no longer own (cancelled, or already consumed)
        if self.pending.take().is_none() { return; }

        let delta = self.delta(now);
        draw(delta);
        self.last_frame = Some(now);
        self.schedule();
    }

    /// Elapsed time since the last frame, in nominal frames, clamped to
    /// [0, max_delta]. The first frame after starting counts as one.
    pub fn delta(&self, now: f64) -> f32 {
        match self.last_frame {
            None => 1.0,
            Some(last) => (((now - last) / self.frame_interval) as f32).clamp(0.0, self.max_delta),
        }
    }

    /// Any state -> Rebuilding -> Running or Idle. `rebuild` runs with no
    /// frame pending, so no callback can observe a half-built scene.
    pub fn rebuild(&mut self, active: bool, rebuild: impl FnOnce()) {
        if let Some(handle) = self.pending.take() {
            self.host.cancel_frame(handle);
        }
        self.state = SchedulerState::Rebuilding;
        rebuild();

        if active {
            self.start();
        } else {
            self.state = SchedulerState::Idle;
        }
    }

    fn schedule(&mut self) {
        match self.host.request_frame() {
            Some(handle) => {
                self.pending = Some(handle);
                self.state = SchedulerState::Running;
            }
            None => {
                warn!("frame request refused, animation paused");
                self.state = SchedulerState::Idle;
            }
        }
    }
}
