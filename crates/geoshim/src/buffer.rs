//! Fixed-capacity error message buffer.
//!
//! The buffer has no lock of its own. It is written by the error handler
//! while a native call runs under the context lock, and read through a
//! [`ContextGuard`](crate::ContextGuard) of the same lock.

use std::cell::UnsafeCell;

/// Capacity of the error buffer in bytes, including the NUL terminator.
pub const ERROR_BUFFER_LEN: usize = 256;

pub(crate) struct ErrorBuffer {
    bytes: UnsafeCell<[u8; ERROR_BUFFER_LEN]>,
}

// SAFETY: every access goes through `write`/`read`, whose callers hold the
// owning context's lock (or `&mut` to the context). The lock serializes them.
unsafe impl Sync for ErrorBuffer {}

impl ErrorBuffer {
    /// Zero-initialized, so the initial message is the empty string.
    pub(crate) const fn new() -> Self {
        Self {
            bytes: UnsafeCell::new([0; ERROR_BUFFER_LEN]),
        }
    }

    /// Replace the contents with `message`, truncated to
    /// `ERROR_BUFFER_LEN - 1` bytes and always NUL-terminated.
    ///
    /// # Safety
    /// The caller must hold the owning context's lock.
    pub(crate) unsafe fn write(&self, message: &[u8]) {
        let bytes = unsafe { &mut *self.bytes.get() };
        let len = message.len().min(ERROR_BUFFER_LEN - 1);
        bytes[..len].copy_from_slice(&message[..len]);
        bytes[len] = 0;
    }

    /// Contents up to the first NUL. A multi-byte character cut by
    /// truncation comes back as U+FFFD.
    ///
    /// # Safety
    /// The caller must hold the owning context's lock.
    pub(crate) unsafe fn read(&self) -> String {
        let bytes = unsafe { &*self.bytes.get() };
        let end = bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(ERROR_BUFFER_LEN);
        String::from_utf8_lossy(&bytes[..end]).into_owned()
    }
}
