//! Raw FFI declarations for the GEOS C API.
//!
//! Only the re-entrant (`*_r`) surface needed by `geoshim` is declared here,
//! together with the message handler function-pointer types. Everything in
//! this crate is `unsafe` to call; the safe layer lives in `geoshim`.
//!
//! # Linking
//!
//! `build.rs` emits `-lgeos_c`. Set `GEOS_LIB_DIR` when libgeos_c is
//! installed outside the default linker search path. The shared library must
//! also be resolvable at run time.

#![allow(non_camel_case_types, non_snake_case)]

use std::os::raw::{c_char, c_void};

/// Opaque GEOS context state.
#[repr(C)]
pub struct GEOSContextHandle_HS {
    _private: [u8; 0],
}

/// Handle passed as the first argument to every re-entrant entry point.
pub type GEOSContextHandle_t = *mut GEOSContextHandle_HS;

/// Opaque geometry.
#[repr(C)]
pub struct GEOSGeometry {
    _private: [u8; 0],
}

/// Opaque WKT reader.
#[repr(C)]
pub struct GEOSWKTReader {
    _private: [u8; 0],
}

/// Classic printf-style message handler, as taken by `initGEOS_r`.
pub type GEOSMessageHandler = Option<unsafe extern "C" fn(fmt: *const c_char, ...)>;

/// Context-aware message handler. GEOS formats the message before the call.
pub type GEOSMessageHandler_r =
    Option<unsafe extern "C" fn(message: *const c_char, userdata: *mut c_void)>;

extern "C" {
    // Context lifecycle

    pub fn GEOS_init_r() -> GEOSContextHandle_t;
    pub fn GEOS_finish_r(handle: GEOSContextHandle_t);

    pub fn initGEOS_r(
        notice_function: GEOSMessageHandler,
        error_function: GEOSMessageHandler,
    ) -> GEOSContextHandle_t;
    pub fn finishGEOS_r(handle: GEOSContextHandle_t);

    // Message handlers

    pub fn GEOSContext_setNoticeMessageHandler_r(
        handle: GEOSContextHandle_t,
        nf: GEOSMessageHandler_r,
        user_data: *mut c_void,
    ) -> GEOSMessageHandler_r;

    pub fn GEOSContext_setErrorMessageHandler_r(
        handle: GEOSContextHandle_t,
        ef: GEOSMessageHandler_r,
        user_data: *mut c_void,
    ) -> GEOSMessageHandler_r;

    // Version

    pub fn GEOSversion() -> *const c_char;

    // WKT input

    pub fn GEOSWKTReader_create_r(handle: GEOSContextHandle_t) -> *mut GEOSWKTReader;
    pub fn GEOSWKTReader_destroy_r(handle: GEOSContextHandle_t, reader: *mut GEOSWKTReader);
    pub fn GEOSWKTReader_read_r(
        handle: GEOSContextHandle_t,
        reader: *mut GEOSWKTReader,
        wkt: *const c_char,
    ) -> *mut GEOSGeometry;

    // Geometry

    pub fn GEOSGeom_destroy_r(handle: GEOSContextHandle_t, g: *mut GEOSGeometry);

    /// Returns 1 if valid, 0 if invalid (reason reported as a notice), 2 on exception.
    pub fn GEOSisValid_r(handle: GEOSContextHandle_t, g: *const GEOSGeometry) -> c_char;
}
