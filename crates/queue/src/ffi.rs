//! C ABI for the queue
//!
//! These functions keep the classic `queue.h` contract: the queue is an
//! opaque heap pointer, strings are NUL-terminated, failure is `false` (or
//! null from `lab_queue_new`). The reason for the last failure on the calling
//! thread is available from `lab_queue_take_error`. Successful calls leave it
//! untouched. Strings are copied byte for byte; no encoding is assumed.
//!
//! A null queue pointer is accepted everywhere and treated as invalid input
//! (or as a no-op for `lab_queue_free`, `lab_queue_size` and
//! `lab_queue_reverse`).

use crate::error::{QueueError, set_last_error};
use crate::queue::Queue;
use std::ffi::{CStr, c_char};
use std::ptr;
use std::slice;
use tracing::debug;

fn fail(op: &str, err: QueueError) -> bool {
    debug!("{} failed: {}", op, err);
    set_last_error(op, err);
    false
}

/// Borrow the bytes of a C string, without the terminator
///
/// # Safety
/// `s` must be null or point to a NUL-terminated string.
unsafe fn text_arg<'a>(s: *const c_char) -> Result<&'a [u8], QueueError> {
    if s.is_null() {
        return Err(QueueError::InvalidArgument("string is null"));
    }
    Ok(unsafe { CStr::from_ptr(s) }.to_bytes())
}

/// Allocate a new empty queue
///
/// Returns null if memory allocation failed. The caller owns the queue and
/// must release it with `lab_queue_free`.
#[unsafe(no_mangle)]
pub extern "C" fn lab_queue_new() -> *mut Queue {
    match Queue::try_new() {
        Ok(q) => Box::into_raw(q),
        Err(err) => {
            fail("new", err);
            ptr::null_mut()
        }
    }
}

/// Free a queue together with every element and string it holds
///
/// # Safety
/// `q` must be null or a pointer returned by `lab_queue_new` that has not
/// been freed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lab_queue_free(q: *mut Queue) {
    if !q.is_null() {
        unsafe {
            drop(Box::from_raw(q));
        }
    }
}

/// Insert a copy of `s` at the head of the queue
///
/// # Safety
/// `q` must be null or a live queue; `s` must be null or NUL-terminated.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lab_queue_insert_head(q: *mut Queue, s: *const c_char) -> bool {
    if q.is_null() {
        return fail("insert_head", QueueError::InvalidArgument("queue is null"));
    }
    let result = unsafe { text_arg(s) }.and_then(|text| unsafe { (*q).insert_head_bytes(text) });
    match result {
        Ok(()) => true,
        Err(err) => fail("insert_head", err),
    }
}

/// Insert a copy of `s` at the tail of the queue
///
/// # Safety
/// `q` must be null or a live queue; `s` must be null or NUL-terminated.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lab_queue_insert_tail(q: *mut Queue, s: *const c_char) -> bool {
    if q.is_null() {
        return fail("insert_tail", QueueError::InvalidArgument("queue is null"));
    }
    let result = unsafe { text_arg(s) }.and_then(|text| unsafe { (*q).insert_tail_bytes(text) });
    match result {
        Ok(()) => true,
        Err(err) => fail("insert_tail", err),
    }
}

/// Remove the head element
///
/// If `buf` is non-null and `bufsize` is non-zero, up to `bufsize - 1`
/// bytes of the removed string are copied into `buf` followed by a NUL.
///
/// # Safety
/// `q` must be null or a live queue; `buf` must be null or valid for
/// `bufsize` bytes of writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lab_queue_remove_head(
    q: *mut Queue,
    buf: *mut c_char,
    bufsize: usize,
) -> bool {
    if q.is_null() {
        return fail("remove_head", QueueError::InvalidArgument("queue is null"));
    }
    let out = if buf.is_null() || bufsize == 0 {
        None
    } else {
        Some(unsafe { slice::from_raw_parts_mut(buf as *mut u8, bufsize) })
    };
    match unsafe { (*q).remove_head(out) } {
        Ok(_) => true,
        Err(err) => fail("remove_head", err),
    }
}

/// Number of elements in the queue, 0 for a null queue
///
/// # Safety
/// `q` must be null or a live queue.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lab_queue_size(q: *const Queue) -> usize {
    if q.is_null() {
        return 0;
    }
    unsafe { (*q).size() }
}

/// Reverse the queue in place; no-op for null, empty or single-element queues
///
/// # Safety
/// `q` must be null or a live queue.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lab_queue_reverse(q: *mut Queue) {
    if !q.is_null() {
        unsafe { (*q).reverse() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{clear_last_error, has_last_error, take_last_error};
    use std::ffi::CString;

    fn c(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    #[test]
    fn test_new_free() {
        let q = lab_queue_new();
        assert!(!q.is_null());
        unsafe {
            assert_eq!(lab_queue_size(q), 0);
            lab_queue_free(q);
        }
    }

    #[test]
    fn test_null_queue() {
        unsafe {
            let s = c("a");
            assert!(!lab_queue_insert_head(ptr::null_mut(), s.as_ptr()));
            assert_eq!(
                take_last_error().as_deref(),
                Some("insert_head: invalid argument: queue is null")
            );
            assert!(!lab_queue_insert_tail(ptr::null_mut(), s.as_ptr()));
            assert!(!lab_queue_remove_head(ptr::null_mut(), ptr::null_mut(), 0));
            assert_eq!(lab_queue_size(ptr::null()), 0);
            lab_queue_reverse(ptr::null_mut());
            lab_queue_free(ptr::null_mut());
        }
    }

    #[test]
    fn test_null_string() {
        unsafe {
            let q = lab_queue_new();
            assert!(!lab_queue_insert_tail(q, ptr::null()));
            assert_eq!(
                take_last_error().as_deref(),
                Some("insert_tail: invalid argument: string is null")
            );
            assert_eq!(lab_queue_size(q), 0);
            lab_queue_free(q);
        }
    }

    #[test]
    fn test_insert_remove_roundtrip() {
        unsafe {
            let q = lab_queue_new();
            let a = c("alpha");
            let b = c("beta");
            assert!(lab_queue_insert_tail(q, a.as_ptr()));
            assert!(lab_queue_insert_head(q, b.as_ptr()));
            assert_eq!(lab_queue_size(q), 2);

            let mut buf = [0 as c_char; 16];
            assert!(lab_queue_remove_head(q, buf.as_mut_ptr(), buf.len()));
            assert_eq!(CStr::from_ptr(buf.as_ptr()).to_str().unwrap(), "beta");

            lab_queue_reverse(q);
            assert!(lab_queue_remove_head(q, buf.as_mut_ptr(), 3));
            assert_eq!(CStr::from_ptr(buf.as_ptr()).to_str().unwrap(), "al");

            assert!(!lab_queue_remove_head(q, buf.as_mut_ptr(), buf.len()));
            assert!(has_last_error());
            assert_eq!(lab_queue_size(q), 0);
            lab_queue_free(q);
        }
    }

    #[test]
    fn test_non_utf8_string() {
        unsafe {
            let q = lab_queue_new();
            let raw = CString::new(&b"caf\xe9"[..]).unwrap();
            assert!(lab_queue_insert_tail(q, raw.as_ptr()));
            assert!(lab_queue_insert_head(q, raw.as_ptr()));
            assert_eq!(lab_queue_size(q), 2);

            let mut buf = [0x7f as c_char; 8];
            assert!(lab_queue_remove_head(q, buf.as_mut_ptr(), buf.len()));
            assert_eq!(CStr::from_ptr(buf.as_ptr()).to_bytes(), b"caf\xe9");
            assert_eq!(lab_queue_size(q), 1);
            lab_queue_free(q);
        }
    }

    #[test]
    fn test_success_keeps_pending_error() {
        unsafe {
            clear_last_error();
            assert!(!lab_queue_remove_head(ptr::null_mut(), ptr::null_mut(), 0));

            let q = lab_queue_new();
            let s = c("a");
            assert!(lab_queue_insert_tail(q, s.as_ptr()));
            assert!(lab_queue_remove_head(q, ptr::null_mut(), 0));
            assert_eq!(
                take_last_error().as_deref(),
                Some("remove_head: invalid argument: queue is null")
            );
            lab_queue_free(q);
        }
    }

    #[test]
    fn test_remove_with_null_buffer() {
        unsafe {
            let q = lab_queue_new();
            let s = c("x");
            assert!(lab_queue_insert_tail(q, s.as_ptr()));
            assert!(lab_queue_remove_head(q, ptr::null_mut(), 10));
            assert_eq!(lab_queue_size(q), 0);
            lab_queue_free(q);
        }
    }

    #[test]
    fn test_free_with_elements() {
        let before = crate::node::node_stats();
        unsafe {
            let q = lab_queue_new();
            for s in ["a", "b", "c"] {
                let s = c(s);
                assert!(lab_queue_insert_tail(q, s.as_ptr()));
            }
            lab_queue_free(q);
        }
        assert_eq!(crate::node::node_stats().live(), before.live());
    }
}
