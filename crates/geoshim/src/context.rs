//! Serialized access to a GEOS context handle.
//!
//! A [`GeosContext`] owns one `GEOSContextHandle_t` together with the sink
//! its notice and error handlers write into. The handle is only reachable
//! through a [`ContextGuard`], which holds the context lock for its whole
//! lifetime:
//!
//! ```rust,no_run
//! use std::ffi::CString;
//! use geoshim::sys;
//!
//! # fn main() -> geoshim::Result<()> {
//! let wkt = CString::new("POINT (1 2)").unwrap();
//! let guard = geoshim::lock();
//! unsafe {
//!     let reader = guard.check_ptr(sys::GEOSWKTReader_create_r(guard.handle()))?;
//!     let geom = sys::GEOSWKTReader_read_r(guard.handle(), reader.as_ptr(), wkt.as_ptr());
//!     sys::GEOSWKTReader_destroy_r(guard.handle(), reader.as_ptr());
//!     // Pull the error before the guard is released
//!     let geom = guard.check_ptr(geom)?;
//!     sys::GEOSGeom_destroy_r(guard.handle(), geom.as_ptr());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Error capture hazard
//!
//! GEOS reports errors by calling back into the context's error handler,
//! which overwrites a single fixed-size buffer. Nothing is raised
//! automatically: a call site that sees a failure sentinel must pull the
//! message with [`ContextGuard::last_error`] before dropping the guard.
//! [`GeosContext::last_error`] takes the lock on its own. Called from the
//! thread already holding a guard it re-enters that section and sees its
//! message; called from outside any section, another caller may already
//! have replaced the message by the time it reads the buffer.
//!
//! The lock is re-entrant per thread: a thread holding a guard may lock the
//! same context again without blocking. Threads still exclude each other.

use std::os::raw::{c_char, c_void};
use std::ptr::NonNull;
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use tracing::{debug, trace};

use geoshim_sys::{
    GEOSContextHandle_HS, GEOSContextHandle_t, GEOSContext_setErrorMessageHandler_r,
    GEOSContext_setNoticeMessageHandler_r, GEOS_finish_r, GEOS_init_r,
};

use crate::error::{GeosError, Result};
use crate::handlers::{error_trampoline, notice_trampoline, MessageSink};

struct RawHandle(NonNull<GEOSContextHandle_HS>);

// SAFETY: a GEOS context may be used from any thread as long as no two
// threads use it at once, which the surrounding mutex guarantees.
unsafe impl Send for RawHandle {}

/// A GEOS context handle behind a mutual-exclusion lock.
///
/// Use [`global()`] for the process-wide instance. Explicitly constructed
/// contexts release their handle with `GEOS_finish_r` when dropped; the
/// global one lives for the rest of the process.
pub struct GeosContext {
    handle: ReentrantMutex<RawHandle>,
    // Shared with GEOS through the handlers' userdata pointer
    sink: Arc<MessageSink>,
}

impl GeosContext {
    /// Initialize a new GEOS context and register its message handlers.
    pub fn new() -> Result<Self> {
        let raw = unsafe { GEOS_init_r() };
        let handle = NonNull::new(raw)
            .ok_or_else(|| GeosError::Init("GEOS_init_r returned a null handle".to_string()))?;

        let sink = Arc::new(MessageSink::new());
        let userdata = Arc::as_ptr(&sink) as *mut c_void;

        unsafe {
            GEOSContext_setNoticeMessageHandler_r(
                handle.as_ptr(),
                Some(notice_trampoline),
                userdata,
            );
            GEOSContext_setErrorMessageHandler_r(
                handle.as_ptr(),
                Some(error_trampoline),
                userdata,
            );
        }

        debug!(version = %crate::version(), "initialized GEOS context");

        Ok(Self {
            handle: ReentrantMutex::new(RawHandle(handle)),
            sink,
        })
    }

    /// Acquire the context lock, blocking until no other thread holds it.
    ///
    /// Re-entrant: a thread that already holds a guard gets a second one
    /// immediately. The lock is released when the last guard is dropped.
    pub fn lock(&self) -> ContextGuard<'_> {
        trace!("acquiring GEOS context lock");
        ContextGuard {
            handle: self.handle.lock(),
            sink: &self.sink,
        }
    }

    /// Run `f` inside a critical section.
    pub fn with<R>(&self, f: impl FnOnce(&ContextGuard<'_>) -> R) -> R {
        let guard = self.lock();
        f(&guard)
    }

    /// Read the last captured error.
    ///
    /// Inside a critical section already held by this thread this re-enters
    /// it and returns that section's message, same as
    /// [`ContextGuard::last_error`]. Outside one it takes the lock briefly,
    /// and another caller may have overwritten the message since the call
    /// that failed.
    pub fn last_error(&self) -> GeosError {
        self.lock().last_error()
    }

    /// Number of notices GEOS has reported on this context.
    pub fn notice_count(&self) -> u64 {
        self.sink.notice_count()
    }
}

impl Drop for GeosContext {
    fn drop(&mut self) {
        let handle = self.handle.get_mut().0;
        unsafe { GEOS_finish_r(handle.as_ptr()) };
        debug!("finished GEOS context");
    }
}

/// Exclusive access to a [`GeosContext`] handle for the guard's lifetime.
pub struct ContextGuard<'a> {
    handle: ReentrantMutexGuard<'a, RawHandle>,
    sink: &'a MessageSink,
}

impl ContextGuard<'_> {
    /// The native handle for `*_r` calls.
    ///
    /// Must not be used after the guard is dropped.
    pub fn handle(&self) -> GEOSContextHandle_t {
        self.handle.0.as_ptr()
    }

    /// The message last captured by the error handler, as a
    /// [`GeosError::Native`]. Does not clear it.
    ///
    /// Before any error occurs on the context the message is empty.
    pub fn last_error(&self) -> GeosError {
        GeosError::Native(self.last_error_message())
    }

    /// The raw contents of the error buffer.
    pub fn last_error_message(&self) -> String {
        // The guard is the lock.
        unsafe { self.sink.last_error() }
    }

    /// Number of notices GEOS has reported on this context.
    pub fn notice_count(&self) -> u64 {
        self.sink.notice_count()
    }

    /// Treat a null return as failure and pull the captured error.
    pub fn check_ptr<T>(&self, ptr: *mut T) -> Result<NonNull<T>> {
        NonNull::new(ptr).ok_or_else(|| self.last_error())
    }

    /// Map a GEOS predicate return (0 false, 1 true, 2 exception).
    pub fn check_predicate(&self, value: c_char) -> Result<bool> {
        match value {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(self.last_error()),
        }
    }
}

lazy_static! {
    static ref GLOBAL: GeosContext = match GeosContext::new() {
        Ok(ctx) => ctx,
        Err(e) => panic!("{e}; GEOS operations cannot proceed"),
    };
}

/// The process-wide GEOS context, initialized on first use.
///
/// # Panics
/// If GEOS cannot create a context handle.
pub fn global() -> &'static GeosContext {
    &GLOBAL
}

/// Acquire the process-wide context lock.
pub fn lock() -> ContextGuard<'static> {
    global().lock()
}

/// The last error captured on the process-wide context.
///
/// Safe to call while holding [`lock()`] on the same thread. See
/// [`GeosContext::last_error`] for when the message may not belong to your call.
pub fn last_error() -> GeosError {
    global().last_error()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fresh_context_has_empty_error() {
        let ctx = GeosContext::new().unwrap();
        assert_eq!(ctx.last_error(), GeosError::Native(String::new()));
        assert_eq!(ctx.last_error().to_string(), "geos: ");
        assert_eq!(ctx.notice_count(), 0);
    }

    #[test]
    fn test_guard_exposes_non_null_handle() {
        let ctx = GeosContext::new().unwrap();
        let guard = ctx.lock();
        assert!(!guard.handle().is_null());
    }

    fn locked_by_other_thread(ctx: &GeosContext) -> bool {
        std::thread::scope(|s| s.spawn(|| ctx.handle.try_lock().is_none()).join().unwrap())
    }

    #[test]
    fn test_lock_is_released_on_drop() {
        let ctx = GeosContext::new().unwrap();
        {
            let _guard = ctx.lock();
            assert!(locked_by_other_thread(&ctx));
        }
        assert!(!locked_by_other_thread(&ctx));
    }

    #[test]
    fn test_lock_reenters_on_holding_thread() {
        let ctx = GeosContext::new().unwrap();
        let outer = ctx.lock();
        let inner = ctx.lock();
        assert_eq!(outer.handle(), inner.handle());

        drop(inner);
        assert!(locked_by_other_thread(&ctx));
        drop(outer);
        assert!(!locked_by_other_thread(&ctx));
    }

    #[test]
    fn test_last_error_inside_held_section_does_not_block() {
        let ctx = GeosContext::new().unwrap();
        let guard = ctx.lock();
        assert_eq!(ctx.last_error(), guard.last_error());

        let nested = ctx.with(|_| ctx.last_error());
        assert_eq!(nested, GeosError::Native(String::new()));
    }

    #[test]
    fn test_global_last_error_under_global_lock() {
        let guard = lock();
        assert_eq!(last_error(), guard.last_error());
    }

    #[test]
    fn test_with_releases_lock_after_closure() {
        let ctx = GeosContext::new().unwrap();
        let handle = ctx.with(|guard| guard.handle() as usize);
        assert_ne!(handle, 0);
        assert!(!locked_by_other_thread(&ctx));
    }

    #[test]
    fn test_check_predicate_sentinels() {
        let ctx = GeosContext::new().unwrap();
        let guard = ctx.lock();
        assert_eq!(guard.check_predicate(0), Ok(false));
        assert_eq!(guard.check_predicate(1), Ok(true));
        assert_eq!(
            guard.check_predicate(2),
            Err(GeosError::Native(String::new()))
        );
    }

    #[test]
    fn test_check_ptr_null_pulls_last_error() {
        let ctx = GeosContext::new().unwrap();
        let guard = ctx.lock();
        let err = guard.check_ptr(std::ptr::null_mut::<u8>()).unwrap_err();
        assert_eq!(err, GeosError::Native(String::new()));

        let mut value = 7u8;
        assert!(guard.check_ptr(&mut value as *mut u8).is_ok());
    }

    #[test]
    fn test_contexts_have_independent_handles() {
        let a = GeosContext::new().unwrap();
        let b = GeosContext::new().unwrap();
        assert_ne!(a.lock().handle(), b.lock().handle());
    }

    #[test]
    fn test_global_is_a_single_instance() {
        assert!(std::ptr::eq(global(), global()));
    }

    #[test]
    fn test_context_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GeosContext>();
    }
}
