// netpreview - Render the ambient network headlessly to PNG frames
//
// Drives the same engine the browser uses, with a manual frame host and a
// software pixel buffer, at a fixed 60fps clock. Engine logs go to stderr
// (RUST_LOG overrides the default info level).
//
// Usage: cargo run --bin netpreview -- [--width 1280] [--height 720] [--dpr 1]
//            [--frames 120] [--every 30] [--seed N] [--config FILE] [--out DIR]

mod output;

use network_engine::{ManualHost, NetworkBackground, NetworkConfig, PixelBuffer};
use std::env;
use std::fs;
use std::path::PathBuf;

const FRAME_MS: f64 = 1000.0 / 60.0;

fn main() {
    init_logging();
    let args: Vec<String> = env::args().collect();

    let mut width = 1280u32;
    let mut height = 720u32;
    let mut dpr = 1.0f32;
    let mut frames = 120usize;
    let mut every = 30usize;
    let mut seed = 0x5EEDu32;
    let mut config_path: Option<String> = None;
    let mut out = PathBuf::from("preview");

    let mut i = 1;
    while i < args.len() {
        let val = args.get(i + 1);
        match args[i].as_str() {
            "--width" => { width = val.and_then(|s| s.parse().ok()).unwrap_or(width); i += 2; }
            "--height" => { height = val.and_then(|s| s.parse().ok()).unwrap_or(height); i += 2; }
            "--dpr" => { dpr = val.and_then(|s| s.parse().ok()).unwrap_or(dpr); i += 2; }
            "--frames" => { frames = val.and_then(|s| s.parse().ok()).unwrap_or(frames); i += 2; }
            "--every" => { every = val.and_then(|s| s.parse().ok()).unwrap_or(every).max(1); i += 2; }
            "--seed" => { seed = val.and_then(|s| s.parse().ok()).unwrap_or(seed); i += 2; }
            "--config" => { config_path = val.cloned(); i += 2; }
            "--out" => { out = val.map(PathBuf::from).unwrap_or(out); i += 2; }
            "--help" | "-h" => {
                eprintln!("Usage: {} [--width N] [--height N] [--dpr F] [--frames N] [--every N] [--seed N] [--config FILE] [--out DIR]", args[0]);
                return;
            }
            _ => i += 1,
        }
    }

    let config = match config_path {
        Some(path) => {
            let json = fs::read_to_string(&path).unwrap_or_else(|e| fail(&format!("read {path}: {e}")));
            NetworkConfig::from_json(&json).unwrap_or_else(|e| fail(&e.to_string()))
        }
        None => NetworkConfig::default(),
    };

    fs::create_dir_all(&out).unwrap_or_else(|e| fail(&format!("create {}: {e}", out.display())));

    let tier = config.tier_for(width);
    println!("Rendering {} frames at {}x{} (dpr {}, {:?})...", frames, width, height, dpr, tier);

    let surface = PixelBuffer::new(width, height, dpr);
    let mut engine = NetworkBackground::new(config, ManualHost::new(), Some(surface), false, seed);
    engine.mount(width, height, dpr);

    let mut written = 0;
    for frame in 0..frames {
        if !engine.step(frame as f64 * FRAME_MS) { break; }
        if frame % every != 0 { continue; }

        let Some(buf) = engine.surface() else { break };
        let path = out.join(format!("frame_{frame:04}.png"));
        output::save_png(buf, &path).unwrap_or_else(|e| fail(&e.to_string()));
        written += 1;
    }

    println!("  Wrote {} frames to {}", written, out.display());
    println!("Done!");
}

fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    // A second init (tests) keeps the first logger
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn fail(msg: &str) -> ! {
    eprintln!("error: {msg}");
    std::process::exit(1);
}
