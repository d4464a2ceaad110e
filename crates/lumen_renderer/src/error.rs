//! Error types for camera configuration and rendering.

use thiserror::Error;

/// Invalid camera or render configuration, caught before any ray is traced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("image width must be at least 1 pixel")]
    ZeroImageWidth,

    #[error("aspect ratio must be finite and positive, got {0}")]
    InvalidAspectRatio(f64),

    #[error("samples per pixel must be at least 1")]
    ZeroSamplesPerPixel,

    #[error("vertical field of view must be in (0, 180) degrees, got {0}")]
    InvalidFieldOfView(f64),

    #[error("focus distance must be finite and positive, got {0}")]
    InvalidFocusDistance(f64),

    #[error("defocus angle must be in [0, 180) degrees, got {0}")]
    InvalidDefocusAngle(f64),

    #[error("camera look-from and look-at points coincide")]
    DegenerateView,

    #[error("camera up vector is zero or parallel to the view direction")]
    DegenerateUp,

    #[error("concurrent rendering needs at least one worker")]
    ZeroWorkers,

    #[error("tile size must be at least 1 pixel")]
    ZeroTileSize,
}

/// Errors that can occur while rendering an image.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Render produced {received} pixels, expected {expected}")]
    IncompleteImage { expected: usize, received: usize },
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
