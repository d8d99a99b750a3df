// surface.rs - Pixel surfaces the renderer paints into
//
// Drawing coordinates are CSS pixels. The surface multiplies them by its
// device pixel ratio, so the backing buffer is css_size * ratio.
//
// PixelBuffer layout: RGBA8, row-major, straight alpha, always opaque after
// a clear. Hosts read it as-is (PNG encode).

use crate::config::{Backdrop, Rgb};

pub trait Surface {
    /// Replace the backing store for a new CSS size and pixel ratio.
    fn resize(&mut self, css_w: u32, css_h: u32, scale: f32);

    /// Set the backdrop painted by `clear`.
    fn set_backdrop(&mut self, backdrop: &Backdrop);

    /// Paint the backdrop over the whole surface.
    fn clear(&mut self);

    /// Stroke whose alpha runs from `a1` at the first point to `a2` at the second.
    fn fade_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32, color: Rgb, a1: f32, a2: f32);

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32, color: Rgb, alpha: f32) {
        self.fade_line(x1, y1, x2, y2, width, color, alpha, alpha);
    }

    fn disc(&mut self, cx: f32, cy: f32, r: f32, color: Rgb, alpha: f32);
    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, alpha: f32);

    /// Make the finished frame visible.
    fn present(&mut self) {}
}

pub struct PixelBuffer {
    // Backing size in device pixels
    w: u32,
    h: u32,
    scale: f32,

    data: Vec<u8>,

    // Prerendered clear image, rebuilt by the first clear after a change
    backdrop: Option<Backdrop>,
    cache: Vec<u8>,
    stale: bool,
    renders: usize,
}

impl PixelBuffer {
    pub fn new(css_w: u32, css_h: u32, scale: f32) -> Self {
        let mut buf = Self {
            w: 0,
            h: 0,
            scale: 1.0,
            data: Vec::new(),
            backdrop: None,
            cache: Vec::new(),
            stale: false,
            renders: 0,
        };
        buf.resize(css_w, css_h, scale);
        buf
    }

    pub fn width(&self) -> u32 { self.w }
    pub fn height(&self) -> u32 { self.h }
    pub fn scale(&self) -> f32 { self.scale }
    pub fn data(&self) -> &[u8] { &self.data }
    pub fn len(&self) -> usize { self.data.len() }
    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    /// Paint every pixel opaque `color`
    pub fn fill(&mut self, color: Rgb) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[color[0], color[1], color[2], 255]);
        }
    }

    /// How many times the backdrop image has been rasterised
    pub fn backdrop_renders(&self) -> usize { self.renders }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.w + x) * 4) as usize;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    fn render_backdrop(&mut self) {
        self.stale = false;
        let Some(bd) = &self.backdrop else {
            self.cache.clear();
            return;
        };
        self.renders += 1;

        let (w, h) = (self.w as f32, self.h as f32);
        let radius = bd.glow_extent(w, h);
        let mut cache = vec![0u8; self.data.len()];

        for py in 0..self.h {
            for px in 0..self.w {
                let mut c = [bd.base[0] as f32, bd.base[1] as f32, bd.base[2] as f32];

                // Horizontal tint, strongest at the right edge
                let t = if self.w > 1 { px as f32 / (w - 1.0) } else { 0.0 };
                mix(&mut c, bd.tint, bd.tint_alpha * t);

                // Radial glow from the top-right corner
                if radius > 0.0 {
                    let (dx, dy) = (w - px as f32, py as f32);
                    let fall = 1.0 - (dx * dx + dy * dy).sqrt() / radius;
                    if fall > 0.0 { mix(&mut c, bd.glow, bd.glow_alpha * fall); }
                }

                let i = ((py * self.w + px) * 4) as usize;
                cache[i] = c[0] as u8;
                cache[i + 1] = c[1] as u8;
                cache[i + 2] = c[2] as u8;
                cache[i + 3] = 255;
            }
        }
        self.cache = cache;
    }

    #[inline]
    fn blend(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        if (x as u32) >= self.w || (y as u32) >= self.h { return; }
        let i = ((y as u32 * self.w + x as u32) * 4) as usize;
        let a = alpha.clamp(0.0, 1.0);
        for k in 0..3 {
            let d = self.data[i + k] as f32;
            self.data[i + k] = (d + (color[k] as f32 - d) * a).round() as u8;
        }
        let da = self.data[i + 3] as f32;
        self.data[i + 3] = (da + (255.0 - da) * a).round() as u8;
    }
}

#[inline]
fn mix(c: &mut [f32; 3], src: Rgb, a: f32) {
    for k in 0..3 {
        c[k] += (src[k] as f32 - c[k]) * a;
    }
}

impl Surface for PixelBuffer {
    fn resize(&mut self, css_w: u32, css_h: u32, scale: f32) {
        self.scale = if scale > 0.0 { scale } else { 1.0 };
        self.w = (css_w as f32 * self.scale).round() as u32;
        self.h = (css_h as f32 * self.scale).round() as u32;
        // Fresh allocation; the old frame is dropped, never grown in place
        self.data = vec![0; (self.w * self.h * 4) as usize];
        self.stale = true;
    }

    fn set_backdrop(&mut self, backdrop: &Backdrop) {
        self.backdrop = Some(backdrop.clone());
        self.stale = true;
    }

    fn clear(&mut self) {
        if self.stale { self.render_backdrop(); }
        if self.cache.len() == self.data.len() {
            self.data.copy_from_slice(&self.cache);
        } else {
            self.data.fill(0);
        }
    }

    fn fade_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32, color: Rgb, a1: f32, a2: f32) {
        let s = self.scale;
        let (x1, y1, x2, y2) = (x1 * s, y1 * s, x2 * s, y2 * s);
        let stroke = width * s;
        // Hairlines fade instead of thinning below one pixel
        let coverage = stroke.min(1.0);
        let thick = stroke.round().max(1.0) as i32;

        let (dx, dy) = (x2 - x1, y2 - y1);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i32;
        let x_major = dx.abs() >= dy.abs();
        let half = thick / 2;

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let alpha = (a1 + (a2 - a1) * t) * coverage;
            let px = (x1 + dx * t).floor() as i32;
            let py = (y1 + dy * t).floor() as i32;
            for o in -half..(thick - half) {
                if x_major { self.blend(px, py + o, color, alpha); }
                else { self.blend(px + o, py, color, alpha); }
            }
        }
    }

    fn disc(&mut self, cx: f32, cy: f32, r: f32, color: Rgb, alpha: f32) {
        let s = self.scale;
        let (cx, cy) = (cx * s, cy * s);
        let r = (r * s).max(0.5);
        let r2 = r * r;

        let (x0, x1) = ((cx - r).floor() as i32, (cx + r).ceil() as i32);
        let (y0, y1) = ((cy - r).floor() as i32, (cy + r).ceil() as i32);
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 { self.blend(px, py, color, alpha); }
            }
        }
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, alpha: f32) {
        let s = self.scale;
        let x0 = (x * s).floor() as i32;
        let y0 = (y * s).floor() as i32;
        let x1 = ((x + w) * s).ceil().max(x0 as f32 + 1.0) as i32;
        let y1 = ((y + h) * s).ceil().max(y0 as f32 + 1.0) as i32;
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, color, alpha);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb = [255, 255, 255];

    #[test]
    fn resize_replaces_backing_store() {
        let mut buf = PixelBuffer::new(100, 50, 1.0);
        assert_eq!(buf.len(), 100 * 50 * 4);

        buf.resize(40, 30, 2.0);
        assert_eq!((buf.width(), buf.height()), (80, 60));
        assert_eq!(buf.len(), 80 * 60 * 4);

        buf.resize(40, 30, 1.0);
        assert_eq!(buf.scale(), 1.0);
        assert_eq!(buf.len(), 40 * 30 * 4);
    }

    #[test]
    fn clear_paints_the_backdrop() {
        let mut buf = PixelBuffer::new(64, 64, 1.0);
        buf.set_backdrop(&Backdrop::default());
        buf.fill(WHITE);
        buf.clear();

        // Bottom-left is far from tint and glow
        assert_eq!(buf.pixel(0, 63), [10, 10, 10, 255]);
        // Top-right picks up the warm glow
        let tr = buf.pixel(63, 0);
        assert!(tr[0] > tr[2]);
        assert!(tr[0] > 10);
    }

    #[test]
    fn backdrop_renders_once_per_size() {
        let mut buf = PixelBuffer::new(16, 16, 1.0);
        buf.set_backdrop(&Backdrop::default());
        buf.resize(32, 16, 2.0);
        assert_eq!(buf.backdrop_renders(), 0);

        buf.clear();
        buf.clear();
        assert_eq!(buf.backdrop_renders(), 1);
        assert_eq!(buf.pixel(0, 31), [10, 10, 10, 255]);

        buf.resize(8, 8, 1.0);
        buf.clear();
        assert_eq!(buf.backdrop_renders(), 2);
    }

    #[test]
    fn clear_without_backdrop_is_transparent() {
        let mut buf = PixelBuffer::new(8, 8, 1.0);
        buf.fill(WHITE);
        buf.clear();
        assert!(buf.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn disc_covers_its_center() {
        let mut buf = PixelBuffer::new(20, 20, 1.0);
        buf.fill([0, 0, 0]);
        buf.disc(10.0, 10.0, 2.0, WHITE, 1.0);
        assert_eq!(buf.pixel(10, 10), [255, 255, 255, 255]);
        assert_eq!(buf.pixel(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn blending_is_source_over() {
        let mut buf = PixelBuffer::new(4, 4, 1.0);
        buf.fill([0, 0, 0]);
        buf.rect(0.0, 0.0, 1.0, 1.0, [200, 100, 0], 0.5);
        assert_eq!(buf.pixel(0, 0), [100, 50, 0, 255]);
        assert_eq!(buf.pixel(1, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn line_reaches_both_endpoints() {
        let mut buf = PixelBuffer::new(32, 32, 1.0);
        buf.fill([0, 0, 0]);
        buf.line(2.0, 3.0, 28.0, 20.0, 1.0, WHITE, 1.0);
        assert_eq!(buf.pixel(2, 3)[0], 255);
        assert_eq!(buf.pixel(28, 20)[0], 255);
    }

    #[test]
    fn fade_line_interpolates_alpha() {
        let mut buf = PixelBuffer::new(101, 3, 1.0);
        buf.fill([0, 0, 0]);
        buf.fade_line(0.0, 1.0, 100.0, 1.0, 1.0, WHITE, 1.0, 0.0);
        assert_eq!(buf.pixel(0, 1)[0], 255);
        assert_eq!(buf.pixel(100, 1)[0], 0);
        let mid = buf.pixel(50, 1)[0];
        assert!((120..=135).contains(&mid), "mid = {mid}");
    }

    #[test]
    fn drawing_is_clipped() {
        let mut buf = PixelBuffer::new(10, 10, 1.0);
        buf.disc(-5.0, -5.0, 8.0, WHITE, 1.0);
        buf.line(-100.0, 5.0, 100.0, 5.0, 1.0, WHITE, 1.0);
        buf.rect(8.0, 8.0, 50.0, 50.0, WHITE, 1.0);
        assert_eq!(buf.len(), 400);
    }

    #[test]
    fn scale_maps_css_to_device_pixels() {
        let mut buf = PixelBuffer::new(10, 10, 2.0);
        buf.fill([0, 0, 0]);
        buf.rect(5.0, 5.0, 1.0, 1.0, WHITE, 1.0);
        assert_eq!(buf.pixel(10, 10)[0], 255);
        assert_eq!(buf.pixel(11, 11)[0], 255);
        assert_eq!(buf.pixel(9, 9)[0], 0);
    }
}
