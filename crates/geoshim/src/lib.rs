//! # geoshim
//!
//! Thread-safe access to the GEOS C API:
//! - **context**: a GEOS context handle behind a lock, with captured errors
//! - **version**: the linked GEOS version
//! - **error**: `GeosError`, surfaced as `geos: <message>`
//! - **tracing**: logging setup; GEOS notices are logged, never raised.
//!   They reach stderr only once `geoshim::tracing::init()` (or another
//!   `tracing` subscriber) is installed; until then they are only counted.
//!
//! GEOS reports failures through a callback rather than a return value.
//! Every native call that takes the context handle must happen while holding
//! the context lock, and a failure must be pulled with `last_error()` before
//! the lock is released:
//!
//! ```rust,no_run
//! let guard = geoshim::lock();
//! // ... call geoshim::sys::*_r(guard.handle(), ...) ...
//! let err = guard.last_error();
//! println!("{err}"); // "geos: ..."
//! ```
//!
//! Linking requires libgeos_c at build and run time (see `geoshim-sys`).

mod buffer;
mod handlers;

pub mod context;
pub mod error;
pub mod tracing;
pub mod version;

pub use geoshim_sys as sys;

// Re-export commonly used items at crate root
pub use buffer::ERROR_BUFFER_LEN;
pub use context::{global, last_error, lock, ContextGuard, GeosContext};
pub use error::{GeosError, Result};
pub use version::{version, version_info, GeosVersion};
