//! Error types shared across the crate.

use std::path::PathBuf;

/// Everything that can go wrong while bringing the garden up or keeping it running.
///
/// Scene composition itself never fails; errors come from resources (fonts),
/// configuration, and the GPU/windowing stack.
#[derive(Debug, thiserror::Error)]
pub enum GardenError {
    /// A font file could not be read from disk.
    #[error("failed to read font '{}': {source}", path.display())]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A font file was read but could not be parsed.
    #[error("failed to parse font '{}': {reason}", path.display())]
    FontParse { path: PathBuf, reason: String },

    /// The composer was asked to rebuild before `initialize` succeeded.
    #[error("scene composer used before initialization")]
    NotInitialized,

    /// A configuration value could not be understood.
    #[error("invalid configuration value for {key}: '{value}'")]
    InvalidConfig { key: &'static str, value: String },

    #[error("failed to create render surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GardenError>;
