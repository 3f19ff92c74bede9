//! Notice and error trampolines registered with each GEOS context.
//!
//! GEOS calls these with an already formatted message and the `userdata`
//! pointer given at registration, which points at the context's
//! [`MessageSink`]. Neither handler may unwind back into GEOS.

use std::ffi::CStr;
use std::os::raw::{c_char, c_void};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::buffer::ErrorBuffer;
use crate::tracing::prefix;

/// Per-context destination for GEOS messages.
pub(crate) struct MessageSink {
    last_error: ErrorBuffer,
    notices: AtomicU64,
}

impl MessageSink {
    pub(crate) fn new() -> Self {
        Self {
            last_error: ErrorBuffer::new(),
            notices: AtomicU64::new(0),
        }
    }

    /// # Safety
    /// The caller must hold the owning context's lock.
    pub(crate) unsafe fn last_error(&self) -> String {
        unsafe { self.last_error.read() }
    }

    pub(crate) fn notice_count(&self) -> u64 {
        self.notices.load(Ordering::Relaxed)
    }
}

/// # Safety
/// `message` must be null or a NUL-terminated string that outlives `'a`.
unsafe fn message_bytes<'a>(message: *const c_char) -> &'a [u8] {
    if message.is_null() {
        return &[];
    }
    unsafe { CStr::from_ptr(message) }.to_bytes()
}

/// Logs the notice as a `warn` event on target `geoshim::notice`. Never
/// touches the error buffer.
///
/// The event is only printed once a subscriber is installed, e.g. with
/// [`crate::tracing::init`], which writes to stderr. Without one the notice
/// is still counted but not printed.
pub(crate) unsafe extern "C" fn notice_trampoline(message: *const c_char, userdata: *mut c_void) {
    if let Some(sink) = unsafe { (userdata as *const MessageSink).as_ref() } {
        sink.notices.fetch_add(1, Ordering::Relaxed);
    }

    let text = String::from_utf8_lossy(unsafe { message_bytes(message) });
    warn!(target: "geoshim::notice", "{}{}", prefix::NOTICE, text.trim_end());
}

/// Overwrites the context's error buffer with the message, truncating it to fit.
pub(crate) unsafe extern "C" fn error_trampoline(message: *const c_char, userdata: *mut c_void) {
    let Some(sink) = (unsafe { (userdata as *const MessageSink).as_ref() }) else {
        return;
    };

    let bytes = unsafe { message_bytes(message) };
    // GEOS only invokes handlers from inside a call made with the context
    // handle, and the handle is only reachable while the lock is held.
    unsafe { sink.last_error.write(bytes) };

    debug!(
        target: "geoshim::error",
        message = %String::from_utf8_lossy(bytes),
        "captured GEOS error"
    );
}
