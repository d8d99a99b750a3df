// web.rs - Browser binding
//
// Wires the engine to requestAnimationFrame, a 2D canvas, and the three
// host signals: window resize, IntersectionObserver, and the
// prefers-reduced-motion media query.
//
// Ownership: AmbientNetwork owns the engine (Rc) and the subscriptions.
// Every JS-facing closure holds only a Weak to the engine. A host signal
// that cannot be subscribed is logged and skipped, never fatal.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, MediaQueryList, MediaQueryListEvent,
    Window,
};

use crate::config::{Backdrop, NetworkConfig, Rgb, css_rgba};
use crate::engine::NetworkBackground;
use crate::error::{EngineError, Result};
use crate::scheduler::FrameHost;
use crate::subscription::Subscriptions;
use crate::surface::Surface;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;
type WebEngine = NetworkBackground<RafHost, CanvasSurface>;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

// ============================================================================
// Frame host
// ============================================================================

pub struct RafHost {
    window: Window,
    callback: FrameCallback,
}

impl FrameHost for RafHost {
    type Handle = i32;

    fn request_frame(&mut self) -> Option<i32> {
        let callback = self.callback.borrow();
        let callback = callback.as_ref()?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|e| warn!("requestAnimationFrame failed: {e:?}"))
            .ok()
    }

    fn cancel_frame(&mut self, handle: i32) {
        if let Err(e) = self.window.cancel_animation_frame(handle) {
            warn!("cancelAnimationFrame failed: {e:?}");
        }
    }
}

// ============================================================================
// Canvas surface
// ============================================================================

/// Draws straight into a 2D canvas context. Coordinates stay in CSS pixels;
/// the context transform applies the device pixel ratio.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    css_w: f64,
    css_h: f64,

    backdrop: Option<Backdrop>,
    // Tint and glow, rebuilt by the first clear after a resize
    gradients: Option<(CanvasGradient, CanvasGradient)>,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| EngineError::SurfaceUnavailable(format!("{e:?}")))?
            .ok_or_else(|| EngineError::SurfaceUnavailable("2d context not supported".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| EngineError::SurfaceUnavailable("unexpected context type".into()))?;
        Ok(Self { canvas, ctx, css_w: 0.0, css_h: 0.0, backdrop: None, gradients: None })
    }

    fn build_gradients(&self, bd: &Backdrop) -> std::result::Result<(CanvasGradient, CanvasGradient), JsValue> {
        let (w, h) = (self.css_w, self.css_h);

        let tint = self.ctx.create_linear_gradient(0.0, 0.0, w, 0.0);
        tint.add_color_stop(0.0, &css_rgba(bd.tint, 0.0))?;
        tint.add_color_stop(1.0, &css_rgba(bd.tint, bd.tint_alpha))?;

        let radius = bd.glow_extent(w as f32, h as f32).max(1.0) as f64;
        let glow = self.ctx.create_radial_gradient(w, 0.0, 0.0, w, 0.0, radius)?;
        glow.add_color_stop(0.0, &css_rgba(bd.glow, bd.glow_alpha))?;
        glow.add_color_stop(1.0, &css_rgba(bd.glow, 0.0))?;

        Ok((tint, glow))
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, css_w: u32, css_h: u32, scale: f32) {
        let scale = if scale > 0.0 { scale as f64 } else { 1.0 };
        self.css_w = css_w as f64;
        self.css_h = css_h as f64;
        // Setting the size also resets the context transform
        self.canvas.set_width((self.css_w * scale).round() as u32);
        self.canvas.set_height((self.css_h * scale).round() as u32);
        if let Err(e) = self.ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0) {
            warn!("setTransform failed: {e:?}");
        }
        self.gradients = None;
    }

    fn set_backdrop(&mut self, backdrop: &Backdrop) {
        self.backdrop = Some(backdrop.clone());
        self.gradients = None;
    }

    fn clear(&mut self) {
        let (w, h) = (self.css_w, self.css_h);
        let Some(bd) = &self.backdrop else {
            self.ctx.clear_rect(0.0, 0.0, w, h);
            return;
        };

        if self.gradients.is_none() {
            self.gradients = self
                .build_gradients(bd)
                .map_err(|e| warn!("backdrop gradient failed: {e:?}"))
                .ok();
        }

        self.ctx.set_fill_style_str(&css_rgba(bd.base, 1.0));
        self.ctx.fill_rect(0.0, 0.0, w, h);
        if let Some((tint, glow)) = &self.gradients {
            self.ctx.set_fill_style_canvas_gradient(tint);
            self.ctx.fill_rect(0.0, 0.0, w, h);
            self.ctx.set_fill_style_canvas_gradient(glow);
            self.ctx.fill_rect(0.0, 0.0, w, h);
        }
    }

    fn fade_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32, color: Rgb, a1: f32, a2: f32) {
        let (x1, y1, x2, y2) = (x1 as f64, y1 as f64, x2 as f64, y2 as f64);
        if a1 == a2 {
            self.ctx.set_stroke_style_str(&css_rgba(color, a1));
        } else {
            let grad = self.ctx.create_linear_gradient(x1, y1, x2, y2);
            if grad.add_color_stop(0.0, &css_rgba(color, a1)).is_err()
                || grad.add_color_stop(1.0, &css_rgba(color, a2)).is_err()
            {
                return;
            }
            self.ctx.set_stroke_style_canvas_gradient(&grad);
        }
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(x1, y1);
        self.ctx.line_to(x2, y2);
        self.ctx.stroke();
    }

    fn disc(&mut self, cx: f32, cy: f32, r: f32, color: Rgb, alpha: f32) {
        self.ctx.set_fill_style_str(&css_rgba(color, alpha));
        self.ctx.begin_path();
        if self.ctx.arc(cx as f64, cy as f64, r.max(0.0) as f64, 0.0, std::f64::consts::TAU).is_ok() {
            self.ctx.fill();
        }
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, alpha: f32) {
        self.ctx.set_fill_style_str(&css_rgba(color, alpha));
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }
}

// ============================================================================
// Host signals
// ============================================================================

/// Register resize, visibility and reduced-motion listeners one at a time.
/// Whatever fails is skipped: without an observer the gate stays visible,
/// without a media query the motion preference stays as read at mount.
fn subscribe(
    window: &Window,
    canvas: &HtmlCanvasElement,
    motion: Option<MediaQueryList>,
    engine: Weak<RefCell<WebEngine>>,
    threshold: f64,
) -> Subscriptions {
    let mut subs = Subscriptions::new();

    subs.try_add("resize listener", || {
        let on_resize = Closure::<dyn FnMut()>::new({
            let (engine, window, canvas) = (engine.clone(), window.clone(), canvas.clone());
            move || {
                if let Some(engine) = engine.upgrade() {
                    let (w, h) = css_size(&window, &canvas);
                    engine.borrow_mut().resize(w, h, window.device_pixel_ratio() as f32);
                }
            }
        });
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
        let window = window.clone();
        Ok::<_, JsValue>(move || {
            let _ = window.remove_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
        })
    });

    subs.try_add("intersection observer", || {
        let on_intersect = Closure::<dyn FnMut(js_sys::Array)>::new({
            let engine = engine.clone();
            move |entries: js_sys::Array| {
                let Some(engine) = engine.upgrade() else { return };
                // Only the latest entry matters
                let last = entries.length().saturating_sub(1);
                let Ok(entry) = entries.get(last).dyn_into::<IntersectionObserverEntry>() else { return };
                let ratio = if entry.is_intersecting() { entry.intersection_ratio() } else { 0.0 };
                engine.borrow_mut().set_intersection(ratio);
            }
        });
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        let observer = IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &init)?;
        observer.observe(canvas);
        Ok::<_, JsValue>(move || {
            observer.disconnect();
            drop(on_intersect);
        })
    });

    if let Some(mql) = motion {
        subs.try_add("reduced-motion listener", || {
            let on_motion = Closure::<dyn FnMut(MediaQueryListEvent)>::new({
                let engine = engine.clone();
                move |ev: MediaQueryListEvent| {
                    if let Some(engine) = engine.upgrade() {
                        engine.borrow_mut().set_reduced_motion(ev.matches());
                    }
                }
            });
            mql.add_event_listener_with_callback("change", on_motion.as_ref().unchecked_ref())?;
            Ok::<_, JsValue>(move || {
                let _ = mql.remove_event_listener_with_callback("change", on_motion.as_ref().unchecked_ref());
            })
        });
    }

    debug!("host signals: {:?}", subs.names().collect::<Vec<_>>());
    subs
}

// ============================================================================
// Exported handle
// ============================================================================

#[wasm_bindgen]
pub struct AmbientNetwork {
    engine: Rc<RefCell<WebEngine>>,
    callback: FrameCallback,
    subscriptions: Subscriptions,
}

#[wasm_bindgen]
impl AmbientNetwork {
    /// Mount on `canvas`. `config` is an optional JSON object; missing
    /// fields keep their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config: Option<String>) -> std::result::Result<AmbientNetwork, JsValue> {
        let config = match config {
            Some(json) => NetworkConfig::from_json(&json).map_err(to_js)?,
            None => NetworkConfig::default(),
        };
        let window = web_sys::window().ok_or_else(|| to_js(EngineError::SurfaceUnavailable("no window".into())))?;

        // Fallback fill until (or instead of) the first frame
        let base = config.backdrop.base;
        let _ = canvas
            .style()
            .set_property("background-color", &format!("rgb({}, {}, {})", base[0], base[1], base[2]));

        let motion = window.match_media(REDUCED_MOTION_QUERY).ok().flatten();
        let reduced = motion.as_ref().is_some_and(|m| m.matches());

        let surface = CanvasSurface::new(canvas.clone())
            .map_err(|e| warn!("{e}"))
            .ok();

        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let host = RafHost { window: window.clone(), callback: callback.clone() };
        let seed = (js_sys::Math::random() * u32::MAX as f64) as u32;
        let threshold = config.intersection_threshold;
        let engine = Rc::new(RefCell::new(NetworkBackground::new(config, host, surface, reduced, seed)));

        *callback.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new({
            let engine = Rc::downgrade(&engine);
            move |now: f64| {
                if let Some(engine) = engine.upgrade() {
                    engine.borrow_mut().frame(now);
                }
            }
        }));

        let subscriptions = subscribe(&window, &canvas, motion, Rc::downgrade(&engine), threshold);

        let (w, h) = css_size(&window, &canvas);
        engine.borrow_mut().mount(w, h, window.device_pixel_ratio() as f32);

        Ok(Self { engine, callback, subscriptions })
    }

    /// Cancel the pending frame and release every listener. Safe to repeat.
    pub fn unmount(&mut self) {
        // Listeners first, so nothing can restart the loop mid-teardown
        self.subscriptions.release();
        self.engine.borrow_mut().unmount();
        self.callback.borrow_mut().take();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.engine.borrow().is_running()
    }
}

impl Drop for AmbientNetwork {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// CSS pixel size of the canvas, falling back to the viewport before layout
fn css_size(window: &Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
    let (cw, ch) = (canvas.client_width(), canvas.client_height());
    if cw > 0 && ch > 0 {
        return (cw as u32, ch as u32);
    }
    let dim = |v: std::result::Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as u32;
    (dim(window.inner_width()), dim(window.inner_height()))
}

fn to_js(e: EngineError) -> JsValue {
    JsValue::from_str(&e.to_string())
}
