// engine.rs - One mounted network background
//
// Single owner of the scene, the surface and the scheduler. Host events
// (mount, resize, visibility, reduced motion, frame callbacks) come in as
// method calls; nothing else holds a reference to the scene, so per-frame
// updates never leave this struct.

use log::{debug, info, warn};

use crate::config::NetworkConfig;
use crate::gate::VisibilityGate;
use crate::render::Renderer;
use crate::rng::Rng;
use crate::scene::Scene;
use crate::scheduler::{FrameHost, FrameScheduler, ManualHost, SchedulerState};
use crate::surface::Surface;

pub struct NetworkBackground<H: FrameHost, S: Surface> {
    config: NetworkConfig,
    gate: VisibilityGate,
    scheduler: FrameScheduler<H>,
    renderer: Renderer,

    // None when the host could not provide a drawable context
    surface: Option<S>,
    scene: Option<Scene>,

    rng: Rng,
    mounted: bool,
}

impl<H: FrameHost, S: Surface> NetworkBackground<H, S> {
    pub fn new(config: NetworkConfig, host: H, surface: Option<S>, reduced_motion: bool, seed: u32) -> Self {
        let gate = VisibilityGate::new(config.intersection_threshold, reduced_motion);
        let scheduler = FrameScheduler::new(host, config.frame_interval_ms, config.max_delta);
        let renderer = Renderer::new(&config);
        Self {
            config,
            gate,
            scheduler,
            renderer,
            surface,
            scene: None,
            rng: Rng::new(seed),
            mounted: false,
        }
    }

    /// First size-known event. Sizes the surface and paints the backdrop
    /// once, builds the first scene and starts animating if the gate allows.
    pub fn mount(&mut self, w: u32, h: u32, dpr: f32) {
        if self.mounted { return self.resize(w, h, dpr); }

        let Some(surface) = self.surface.as_mut() else {
            warn!("no drawable surface, keeping static fallback");
            return;
        };
        surface.set_backdrop(&self.config.backdrop);

        self.mounted = true;
        info!("network background mounted at {w}x{h} (dpr {dpr})");
        self.resize(w, h, dpr);
    }

    /// Cancel, resize the surface, paint the backdrop, rebuild the scene
    /// wholesale and restart if still active.
    pub fn resize(&mut self, w: u32, h: u32, dpr: f32) {
        if !self.mounted { return; }

        let active = self.gate.active();
        let Self { config, scheduler, surface, scene, rng, .. } = self;

        scheduler.rebuild(active, || {
            if let Some(surface) = surface.as_mut() {
                surface.resize(w, h, dpr);
                surface.clear();
                surface.present();
            }
            // Drop the old scene before allocating the new one
            *scene = None;
            let tier = config.tier_for(w);
            let fresh = Scene::build(w, h, tier, config, rng);
            debug!(
                "scene rebuilt: {w}x{h} {tier:?}, {} particles, {} stars",
                fresh.particles.len(),
                fresh.stars.len()
            );
            *scene = Some(fresh);
        });
    }

    pub fn set_intersection(&mut self, ratio: f64) {
        if self.gate.set_intersection(ratio) { self.sync(); }
    }

    pub fn set_reduced_motion(&mut self, reduce: bool) {
        if self.gate.set_reduced_motion(reduce) { self.sync(); }
    }

    /// A frame callback fired at `now_ms` (host clock, milliseconds).
    pub fn frame(&mut self, now_ms: f64) {
        let Self { scheduler, renderer, scene, surface, .. } = self;
        let (Some(scene), Some(surface)) = (scene.as_mut(), surface.as_mut()) else { return };

        let time = (now_ms / 1000.0) as f32;
        scheduler.fire(now_ms, |delta| renderer.draw(scene, surface, delta, time));
    }

    /// Cancel the pending frame and drop the scene. Safe to repeat.
    pub fn unmount(&mut self) {
        self.scheduler.stop();
        self.scene = None;
        if self.mounted {
            self.mounted = false;
            info!("network background unmounted");
        }
    }

    fn sync(&mut self) {
        if !self.mounted { return; }
        if self.gate.active() { self.scheduler.start(); } else { self.scheduler.stop(); }
    }

    // Accessors

    pub fn config(&self) -> &NetworkConfig { &self.config }
    pub fn gate(&self) -> &VisibilityGate { &self.gate }
    pub fn scene(&self) -> Option<&Scene> { self.scene.as_ref() }
    pub fn scene_mut(&mut self) -> Option<&mut Scene> { self.scene.as_mut() }
    pub fn surface(&self) -> Option<&S> { self.surface.as_ref() }
    pub fn host(&self) -> &H { self.scheduler.host() }
    pub fn host_mut(&mut self) -> &mut H { self.scheduler.host_mut() }
    pub fn state(&self) -> SchedulerState { self.scheduler.state() }
    pub fn is_running(&self) -> bool { self.scheduler.is_running() }
    pub fn is_mounted(&self) -> bool { self.mounted }
    pub fn outstanding(&self) -> usize { self.scheduler.outstanding() }
}

impl<S: Surface> NetworkBackground<ManualHost, S> {
    /// Fire the next requested frame, if any. Returns false when idle.
    pub fn step(&mut self, now_ms: f64) -> bool {
        if self.host_mut().take_due().is_none() { return false; }
        self.frame(now_ms);
        true
    }
}

impl<H: FrameHost, S: Surface> Drop for NetworkBackground<H, S> {
    fn drop(&mut self) {
        self.scheduler.stop();
    }
}
