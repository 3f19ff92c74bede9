//! GEOS version query.
//!
//! `GEOSversion()` reads static library data and takes no context handle,
//! so neither function here touches the context lock.

use std::ffi::CStr;
use std::fmt;
use std::str::FromStr;

use geoshim_sys::GEOSversion;

use crate::error::{GeosError, Result};

/// The version string reported by the linked GEOS library,
/// e.g. `3.12.1-CAPI-1.18.1`.
pub fn version() -> String {
    let ptr = unsafe { GEOSversion() };
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

/// The linked GEOS version, parsed.
pub fn version_info() -> Result<GeosVersion> {
    version().parse()
}

/// Parsed form of a GEOS version string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeosVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    /// Anything following the patch number, such as `beta1` or `dev`
    pub pre_release: Option<String>,
    /// Version of the C API, the part after `-CAPI-`
    pub capi: Option<String>,
}

impl GeosVersion {
    /// Whether this is `major.minor` or newer.
    pub fn at_least(&self, major: u32, minor: u32) -> bool {
        (self.major, self.minor) >= (major, minor)
    }
}

impl FromStr for GeosVersion {
    type Err = GeosError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || GeosError::Version(s.to_string());
        let trimmed = s.trim();

        let (lib, capi) = match trimmed.split_once("-CAPI-") {
            Some((lib, capi)) if !capi.is_empty() => (lib, Some(capi.to_string())),
            Some(_) => return Err(invalid()),
            None => (trimmed, None),
        };

        let mut parts = lib.splitn(3, '.');
        let major = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let minor = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let rest = parts.next().ok_or_else(invalid)?;

        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        let patch = rest[..digits].parse().map_err(|_| invalid())?;
        let pre_release = match &rest[digits..] {
            "" => None,
            suffix => Some(suffix.to_string()),
        };

        Ok(Self {
            major,
            minor,
            patch,
            pre_release,
            capi,
        })
    }
}

impl fmt::Display for GeosVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre_release {
            write!(f, "{}", pre)?;
        }
        if let Some(capi) = &self.capi {
            write!(f, "-CAPI-{}", capi)?;
        }
        Ok(())
    }
}
