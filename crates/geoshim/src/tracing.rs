//! Logging setup for binaries that use geoshim.
//!
//! GEOS notices are emitted as `warn` events with target `geoshim::notice`;
//! captured errors as `debug` events with target `geoshim::error`. Output
//! goes to stderr so notices land where GEOS itself would print them.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Route GEOS notices (and geoshim's own debug events) to stderr.
///
/// Until a subscriber like this one is installed, notices are counted per
/// context but never printed. Uses `RUST_LOG` when set, else `info`, which
/// lets `NOTICE:` lines through and hides captured-error debug events.
pub fn init() {
    init_with_filter("info");
}

/// Like [`init`], with `default_filter` used when `RUST_LOG` is unset.
///
/// `geoshim::error=debug` additionally logs every message the error
/// handler captures; `geoshim::notice=off` silences notices.
///
/// # Panics
/// If a global subscriber is already installed.
pub fn init_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Message prefixes.
pub mod prefix {
    /// GEOS notice messages
    pub const NOTICE: &str = "NOTICE: ";
}
