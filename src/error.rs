use thiserror::Error;

/// Failures surfaced by the gallery.
///
/// Only asset loading can fail once the GPU is up. Those failures are
/// reported to the log and the asset registry, never to the render path.
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("failed to load asset {path}: {reason}")]
    AssetLoadFailed { path: String, reason: String },
    #[error("GPU setup failed: {0}")]
    Gpu(String),
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

impl GalleryError {
    pub fn asset(path: &str, err: &anyhow::Error) -> Self {
        Self::AssetLoadFailed {
            path: path.to_string(),
            reason: format!("{err:#}"),
        }
    }
}
