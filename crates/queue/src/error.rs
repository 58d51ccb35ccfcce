//! Queue Error Handling
//!
//! Two kinds of failure exist: a bad argument (null queue, null string,
//! removal from an empty queue) and a denied allocation. Safe callers get a
//! [`QueueError`]; C callers get `false`/null plus a thread-local message
//! they can fetch afterwards.
//!
//! # Usage
//!
//! ```ignore
//! if !lab_queue_insert_tail(q, s) {
//!     let msg = lab_queue_take_error();
//!     // report msg...
//! }
//! ```

use std::cell::RefCell;
use std::ffi::{CString, c_char};
use std::fmt;
use std::ptr;

/// Failure reported by every fallible queue operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// Null queue/string reference, or removal from an empty queue
    InvalidArgument(&'static str),
    /// The allocator refused a node, a string copy or the queue itself
    AllocationFailure,
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::InvalidArgument(what) => write!(f, "invalid argument: {}", what),
            QueueError::AllocationFailure => write!(f, "allocation failure"),
        }
    }
}

impl std::error::Error for QueueError {}

thread_local! {
    /// Last error recorded by a C ABI call on this thread
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };

    /// Cached C string handed out by `lab_queue_take_error`
    static ERROR_CSTRING: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Record the error of the current C ABI call
pub fn set_last_error(op: &str, err: QueueError) {
    ERROR_CSTRING.with(|cs| *cs.borrow_mut() = None);
    LAST_ERROR.with(|e| *e.borrow_mut() = Some(format!("{}: {}", op, err)));
}

/// Take (and clear) the last error message
pub fn take_last_error() -> Option<String> {
    LAST_ERROR.with(|e| e.borrow_mut().take())
}

/// Check if an error is pending
pub fn has_last_error() -> bool {
    LAST_ERROR.with(|e| e.borrow().is_some())
}

/// Clear any pending error
pub fn clear_last_error() {
    LAST_ERROR.with(|e| *e.borrow_mut() = None);
    ERROR_CSTRING.with(|cs| *cs.borrow_mut() = None);
}

/// Check if an error is pending (FFI-safe)
#[unsafe(no_mangle)]
pub extern "C" fn lab_queue_has_error() -> bool {
    has_last_error()
}

/// Take (and clear) the last error as a C string (FFI-safe)
///
/// Returns null if no error is pending.
///
/// # WARNING: Pointer Lifetime
/// The pointer stays valid until the next queue call on this thread that
/// fails, or until `lab_queue_take_error`/`lab_queue_clear_error` is called
/// again. Copy the string if it must outlive that.
#[unsafe(no_mangle)]
pub extern "C" fn lab_queue_take_error() -> *const c_char {
    match take_last_error() {
        Some(msg) => ERROR_CSTRING.with(|cs| {
            // CString::new rejects interior NULs
            let safe: String = msg.chars().map(|c| if c == '\0' { '?' } else { c }).collect();
            match CString::new(safe) {
                Ok(cstring) => {
                    let p = cstring.as_ptr();
                    *cs.borrow_mut() = Some(cstring);
                    p
                }
                Err(_) => ptr::null(),
            }
        }),
        None => ptr::null(),
    }
}

/// Clear any pending error (FFI-safe)
#[unsafe(no_mangle)]
pub extern "C" fn lab_queue_clear_error() {
    clear_last_error();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn test_display() {
        assert_eq!(
            QueueError::InvalidArgument("queue is empty").to_string(),
            "invalid argument: queue is empty"
        );
        assert_eq!(QueueError::AllocationFailure.to_string(), "allocation failure");
    }

    #[test]
    fn test_set_and_take() {
        clear_last_error();
        assert!(!has_last_error());

        set_last_error("remove_head", QueueError::InvalidArgument("queue is empty"));
        assert!(has_last_error());
        assert_eq!(
            take_last_error().as_deref(),
            Some("remove_head: invalid argument: queue is empty")
        );
        assert!(!has_last_error());
    }

    #[test]
    fn test_take_error_ffi() {
        clear_last_error();
        assert!(lab_queue_take_error().is_null());

        set_last_error("insert_tail", QueueError::AllocationFailure);
        let p = lab_queue_take_error();
        assert!(!p.is_null());
        let msg = unsafe { CStr::from_ptr(p) }.to_str().unwrap();
        assert_eq!(msg, "insert_tail: allocation failure");
        assert!(!lab_queue_has_error());
    }

    #[test]
    fn test_clear_ffi() {
        set_last_error("new", QueueError::AllocationFailure);
        lab_queue_clear_error();
        assert!(!has_last_error());
    }
}
