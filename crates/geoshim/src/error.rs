//! Error types for the GEOS context guard.

use thiserror::Error;

/// Errors surfaced by the GEOS context guard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeosError {
    /// `GEOS_init_r` did not produce a usable context handle
    #[error("geos: context initialization failed: {0}")]
    Init(String),

    /// Message captured by the error handler during a native call.
    ///
    /// Empty when no error has been captured on the context yet.
    #[error("geos: {0}")]
    Native(String),

    /// `GEOSversion()` returned something other than `X.Y.Z[-CAPI-...]`
    #[error("geos: unrecognized version string '{0}'")]
    Version(String),
}

impl GeosError {
    /// The message without the `geos: ` namespace tag.
    pub fn message(&self) -> &str {
        match self {
            GeosError::Init(msg) | GeosError::Native(msg) | GeosError::Version(msg) => msg,
        }
    }
}

/// Result type for GEOS guard operations
pub type Result<T> = std::result::Result<T, GeosError>;
