//! Call-site helpers shared by the integration tests.
//!
//! Each helper follows the same discipline a geometry wrapper would: it runs
//! under a caller-held guard and pulls the error before returning.

#![allow(dead_code)]

use std::ffi::CString;

use geoshim::{sys, ContextGuard, Result};

/// Parse `wkt` and discard the geometry.
pub fn read_wkt(guard: &ContextGuard<'_>, wkt: &str) -> Result<()> {
    with_geometry(guard, wkt, |_| Ok(()))
}

/// Parse `wkt` and check its validity. Invalid geometries report their
/// reason through the notice handler.
pub fn is_valid(guard: &ContextGuard<'_>, wkt: &str) -> Result<bool> {
    with_geometry(guard, wkt, |geom| {
        guard.check_predicate(unsafe { sys::GEOSisValid_r(guard.handle(), geom) })
    })
}

fn with_geometry<R>(
    guard: &ContextGuard<'_>,
    wkt: &str,
    f: impl FnOnce(*const sys::GEOSGeometry) -> Result<R>,
) -> Result<R> {
    let wkt = CString::new(wkt).expect("test WKT has no NUL bytes");

    unsafe {
        let reader = guard.check_ptr(sys::GEOSWKTReader_create_r(guard.handle()))?;
        let geom = sys::GEOSWKTReader_read_r(guard.handle(), reader.as_ptr(), wkt.as_ptr());
        sys::GEOSWKTReader_destroy_r(guard.handle(), reader.as_ptr());

        let geom = guard.check_ptr(geom)?;
        let result = f(geom.as_ptr());
        sys::GEOSGeom_destroy_r(guard.handle(), geom.as_ptr());
        result
    }
}

/// A WKT geometry type GEOS does not know, unique per `n`.
///
/// Fixed width so no tag is a substring of another. The trailing `X` keeps
/// GEOS from reading a `Z`/`M` dimension suffix off the end.
pub fn bogus_type(n: usize) -> String {
    let mut n = n;
    let mut letters = [b'A'; 4];
    for slot in letters.iter_mut().rev() {
        *slot = b'A' + (n % 26) as u8;
        n /= 26;
    }
    format!("BOGUS{}X", String::from_utf8_lossy(&letters))
}

pub const VALID_SQUARE: &str = "POLYGON ((0 0, 4 0, 4 4, 0 4, 0 0))";
pub const BOWTIE: &str = "POLYGON ((0 0, 2 2, 2 0, 0 2, 0 0))";
