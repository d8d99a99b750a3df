// End-to-end behaviour of a mounted network background, driven by a
// manual frame host and a software pixel buffer.

use network_engine::{
    Backdrop, DensityTier, ManualHost, NetworkBackground, NetworkConfig, PixelBuffer, Rgb,
    SchedulerState, Surface,
};

const FRAME: f64 = 1000.0 / 60.0;

type Engine = NetworkBackground<ManualHost, PixelBuffer>;

fn engine(reduced_motion: bool) -> Engine {
    let surface = PixelBuffer::new(1, 1, 1.0);
    NetworkBackground::new(NetworkConfig::default(), ManualHost::new(), Some(surface), reduced_motion, 42)
}

fn mounted(w: u32, h: u32) -> Engine {
    let mut e = engine(false);
    e.mount(w, h, 1.0);
    e
}

#[test]
fn desktop_scene_scenario() {
    let mut e = mounted(1000, 800);
    let config = NetworkConfig::default();

    let scene = e.scene().unwrap();
    assert_eq!(scene.tier, DensityTier::Desktop);
    assert_eq!((scene.w, scene.h), (1000, 800));
    assert_eq!(scene.particles.len(), config.desktop.particles);
    assert_eq!(scene.stars.len(), config.desktop.stars);

    let scene = e.scene_mut().unwrap();
    scene.particles.x[0] = 999.0;
    scene.particles.y[0] = 400.0;
    scene.particles.vx[0] = 5.0;
    scene.particles.vy[0] = 0.0;

    // First frame after starting advances by exactly one nominal frame
    assert!(e.step(5_000.0));
    let p = &e.scene().unwrap().particles;
    assert_eq!(p.x[0], 4.0);
    assert_eq!(p.y[0], 400.0);
}

#[test]
fn starts_before_any_visibility_event() {
    let e = mounted(800, 600);
    assert_eq!(e.state(), SchedulerState::Running);
    assert_eq!(e.outstanding(), 1);
    assert_eq!(e.host().outstanding(), 1);
}

#[test]
fn reduced_motion_at_mount_never_schedules() {
    let mut e = engine(true);
    e.mount(1200, 900, 1.0);
    e.set_intersection(1.0);

    assert_eq!(e.state(), SchedulerState::Idle);
    assert_eq!(e.host().requests(), 0);
    assert!(!e.step(FRAME));
    // The static backdrop is still there
    assert!(e.scene().is_some());
}

#[test]
fn reduced_motion_toggles_at_runtime() {
    let mut e = mounted(1200, 900);
    e.set_reduced_motion(true);
    assert_eq!(e.state(), SchedulerState::Idle);
    assert_eq!(e.host().outstanding(), 0);

    e.set_reduced_motion(false);
    assert_eq!(e.state(), SchedulerState::Running);
    assert_eq!(e.host().outstanding(), 1);
}

#[test]
fn visibility_flapping_never_leaks_frames() {
    let mut e = mounted(1200, 900);
    for k in 0..200 {
        e.set_intersection(if k % 2 == 0 { 0.0 } else { 0.6 });
        e.set_intersection(0.6);
        e.set_intersection(0.02);
        assert!(e.host().outstanding() <= 1);
        assert_eq!(e.host().outstanding(), e.outstanding());
    }
    e.set_intersection(0.0);
    assert_eq!(e.host().outstanding(), 0);

    e.set_intersection(0.5);
    assert_eq!(e.host().outstanding(), 1);
    assert!(e.step(FRAME));
    assert_eq!(e.host().outstanding(), 1);
}

#[test]
fn resize_rebuilds_a_fresh_scene() {
    let mut e = mounted(1000, 800);
    let old_epoch = e.scene().unwrap().epoch;
    e.step(FRAME);

    e.resize(767, 600, 2.0);
    let scene = e.scene().unwrap();
    assert_ne!(scene.epoch, old_epoch);
    assert_eq!((scene.w, scene.h), (767, 600));
    assert_eq!(scene.tier, DensityTier::Mobile);
    assert_eq!(scene.particles.len(), NetworkConfig::default().mobile.particles);

    let buf = e.surface().unwrap();
    assert_eq!((buf.width(), buf.height()), (1534, 1200));
    assert_eq!(buf.len(), 1534 * 1200 * 4);

    assert_eq!(e.state(), SchedulerState::Running);
    assert_eq!(e.host().outstanding(), 1);
}

#[test]
fn breakpoint_width_is_desktop() {
    let e = mounted(768, 600);
    assert_eq!(e.scene().unwrap().tier, DensityTier::Desktop);
    let e = mounted(767, 600);
    assert_eq!(e.scene().unwrap().tier, DensityTier::Mobile);
}

#[test]
fn resize_while_hidden_stays_idle() {
    let mut e = mounted(1000, 800);
    e.set_intersection(0.0);
    e.resize(640, 480, 1.0);

    assert_eq!(e.state(), SchedulerState::Idle);
    assert_eq!(e.host().outstanding(), 0);
    assert_eq!(e.scene().unwrap().w, 640);
}

#[test]
fn missing_surface_degrades_to_fallback() {
    let mut e: Engine = NetworkBackground::new(NetworkConfig::default(), ManualHost::new(), None, false, 1);
    e.mount(1000, 800, 1.0);
    e.set_intersection(1.0);
    e.resize(500, 400, 1.0);

    assert!(!e.is_mounted());
    assert_eq!(e.state(), SchedulerState::Idle);
    assert_eq!(e.host().requests(), 0);
    assert!(e.scene().is_none());
}

#[test]
fn unmount_cancels_everything() {
    let mut e = mounted(1000, 800);
    e.step(FRAME);
    e.unmount();

    assert_eq!(e.outstanding(), 0);
    assert_eq!(e.host().outstanding(), 0);
    assert!(e.scene().is_none());
    assert!(!e.step(2.0 * FRAME));

    // Events after teardown are ignored
    e.set_intersection(1.0);
    e.set_reduced_motion(false);
    assert_eq!(e.host().outstanding(), 0);
    e.unmount();
}

#[test]
fn particles_stay_on_the_torus() {
    let mut e = mounted(500, 300);
    let mut now = 0.0;
    for k in 0..1_500 {
        // Irregular clock, including long stalls that hit the delta clamp
        now += if k % 97 == 0 { 5_000.0 } else { FRAME * (1 + k % 4) as f64 };
        assert!(e.step(now));
        let p = &e.scene().unwrap().particles;
        for i in 0..p.len() {
            assert!(p.x[i] >= 0.0 && p.x[i] < 500.0);
            assert!(p.y[i] >= 0.0 && p.y[i] < 300.0);
        }
    }
}

#[test]
fn frames_paint_particles_over_the_backdrop() {
    let mut e = mounted(400, 300);
    assert!(e.step(FRAME));

    let (x, y) = {
        let p = &e.scene().unwrap().particles;
        (p.x[0], p.y[0])
    };
    let buf = e.surface().unwrap();
    // Near-white: the pulse dims nodes slightly away from its rest phase
    let px = buf.pixel(x as u32, y as u32);
    assert!(px[..3].iter().all(|&c| c >= 240), "{px:?}");
    assert_eq!(px[3], 255);
    // Bottom-left corner keeps the base colour unless something landed on it
    let corner = buf.pixel(0, 299);
    assert_eq!(corner[3], 255);
}

/// Counts the calls the engine makes, draws nothing
#[derive(Default)]
struct Tally {
    resizes: usize,
    backdrops: usize,
    clears: usize,
    presents: usize,
}

impl Surface for Tally {
    fn resize(&mut self, _: u32, _: u32, _: f32) { self.resizes += 1; }
    fn set_backdrop(&mut self, _: &Backdrop) { self.backdrops += 1; }
    fn clear(&mut self) { self.clears += 1; }
    fn fade_line(&mut self, _: f32, _: f32, _: f32, _: f32, _: f32, _: Rgb, _: f32, _: f32) {}
    fn disc(&mut self, _: f32, _: f32, _: f32, _: Rgb, _: f32) {}
    fn rect(&mut self, _: f32, _: f32, _: f32, _: f32, _: Rgb, _: f32) {}
    fn present(&mut self) { self.presents += 1; }
}

#[test]
fn mount_sizes_and_paints_the_surface_once() {
    let mut e = NetworkBackground::new(NetworkConfig::default(), ManualHost::new(), Some(Tally::default()), true, 7);
    e.mount(1280, 720, 2.0);

    let t = e.surface().unwrap();
    assert_eq!((t.resizes, t.backdrops, t.clears, t.presents), (1, 1, 1, 1));

    e.resize(640, 480, 1.0);
    let t = e.surface().unwrap();
    assert_eq!((t.resizes, t.backdrops, t.clears, t.presents), (2, 1, 2, 2));
}

#[test]
fn mount_rasterises_the_backdrop_once() {
    let mut e = mounted(320, 240);
    assert_eq!(e.surface().unwrap().backdrop_renders(), 1);
    for k in 1..=5 {
        assert!(e.step(k as f64 * FRAME));
    }
    assert_eq!(e.surface().unwrap().backdrop_renders(), 1);
}
