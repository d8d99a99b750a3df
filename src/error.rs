// error.rs - Engine error types
//
// The only runtime failure the animation knows about is a missing surface,
// and even that degrades to the static fallback fill instead of surfacing.

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("image output error: {0}")]
    Image(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
