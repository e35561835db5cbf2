// error.rs - Engine error taxonomy
//
// Per-frame simulation is pure numeric code and never fails; errors only
// come from configuration, resource acquisition and the drawing surface.

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Options violate a configuration invariant; nothing is constructed.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    /// Drawing target is missing, detached or refused a draw call.
    #[error("render surface unavailable: {0}")]
    RenderSurfaceUnavailable(String),

    /// Window, container, canvas or 2D context could not be acquired.
    #[error("resource initialization failed: {0}")]
    ResourceInitialization(String),

    /// `resize`/`render` called before the engine finished initializing.
    #[error("engine is not ready")]
    NotReady,
}

pub type Result<T> = std::result::Result<T, Error>;
