// output.rs - PNG export for rendered frames

use image::RgbaImage;
use network_engine::{EngineError, PixelBuffer, Result};
use std::path::Path;

/// Write the buffer at its device-pixel size
pub fn save_png(buf: &PixelBuffer, path: &Path) -> Result<()> {
    let img = RgbaImage::from_raw(buf.width(), buf.height(), buf.data().to_vec())
        .ok_or_else(|| EngineError::Image("buffer size does not match dimensions".into()))?;
    img.save(path).map_err(|e| EngineError::Image(format!("{}: {e}", path.display())))
}
