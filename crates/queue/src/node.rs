//! Queue Nodes - explicit allocation of list elements
//!
//! Every node is obtained from the global allocator through an explicit
//! `Layout`, so a refused allocation comes back as an error instead of
//! aborting the process. The same holds for the owned copy of the text.
//!
//! Text is stored as raw bytes: C callers may hand over any NUL-terminated
//! string, UTF-8 or not.
//!
//! Design:
//! - A node owns its text; the queue owns every node
//! - `next` is a raw link, null at the tail
//! - Allocation order is node first, then text; if the text copy fails the
//!   node memory is returned before reporting
//!
//! Per-thread counters track allocations and releases so tests can check
//! that teardown returns every node.

use crate::error::QueueError;
use std::alloc::{Layout, alloc, dealloc};
use std::cell::Cell;
use std::ptr;

/// A single queue element
pub struct Node {
    /// Owned copy of the inserted text (without the NUL terminator)
    pub value: Box<[u8]>,

    /// Next node towards the tail (null for the last node)
    pub next: *mut Node,
}

/// Allocation counters for the current thread
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeStats {
    pub allocated: u64,
    pub released: u64,
}

impl NodeStats {
    /// Nodes allocated on this thread that have not been released here
    pub fn live(&self) -> i64 {
        self.allocated as i64 - self.released as i64
    }
}

thread_local! {
    static NODES_ALLOCATED: Cell<u64> = const { Cell::new(0) };
    static NODES_RELEASED: Cell<u64> = const { Cell::new(0) };
}

/// Which allocation a test wants refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailPoint {
    Node,
    Text,
}

#[cfg(test)]
thread_local! {
    /// Number of upcoming allocations to refuse, and which kind
    static FAIL_NEXT: Cell<Option<(FailPoint, u32)>> = const { Cell::new(None) };
}

/// Refuse the next `count` allocations of the given kind on this thread
#[cfg(test)]
pub(crate) fn fail_next(point: FailPoint, count: u32) {
    FAIL_NEXT.with(|f| f.set(if count == 0 { None } else { Some((point, count)) }));
}

#[cfg(test)]
fn should_fail(point: FailPoint) -> bool {
    FAIL_NEXT.with(|f| match f.get() {
        Some((p, n)) if p == point => {
            f.set(if n > 1 { Some((p, n - 1)) } else { None });
            true
        }
        _ => false,
    })
}

#[cfg(not(test))]
#[inline(always)]
fn should_fail(_point: FailPoint) -> bool {
    false
}

/// Copy `text` into a freshly allocated, exactly sized buffer
fn copy_text(text: &[u8]) -> Result<Box<[u8]>, QueueError> {
    if should_fail(FailPoint::Text) {
        return Err(QueueError::AllocationFailure);
    }

    let mut owned = Vec::new();
    owned
        .try_reserve_exact(text.len())
        .map_err(|_| QueueError::AllocationFailure)?;
    owned.extend_from_slice(text);
    Ok(owned.into_boxed_slice())
}

/// Allocate a node holding an owned copy of `text`
///
/// Returns a non-null pointer on success. On failure nothing stays
/// allocated.
pub fn allocate(text: &[u8], next: *mut Node) -> Result<*mut Node, QueueError> {
    let layout = Layout::new::<Node>();

    if should_fail(FailPoint::Node) {
        return Err(QueueError::AllocationFailure);
    }

    let raw = unsafe { alloc(layout) as *mut Node };
    if raw.is_null() {
        return Err(QueueError::AllocationFailure);
    }

    let value = match copy_text(text) {
        Ok(value) => value,
        Err(err) => {
            // Give the node back before reporting
            unsafe { dealloc(raw as *mut u8, layout) };
            return Err(err);
        }
    };

    unsafe { ptr::write(raw, Node { value, next }) };
    NODES_ALLOCATED.with(|c| c.set(c.get() + 1));
    Ok(raw)
}

/// Release a node and hand back its text
///
/// # Safety
/// - `node` must have come from [`allocate`] and not be released yet
/// - No link to `node` may be followed afterwards
pub unsafe fn release(node: *mut Node) -> Box<[u8]> {
    assert!(!node.is_null(), "release: null node");
    let Node { value, .. } = unsafe { ptr::read(node) };
    unsafe { dealloc(node as *mut u8, Layout::new::<Node>()) };
    NODES_RELEASED.with(|c| c.set(c.get() + 1));
    value
}

/// Get node allocation counters for the current thread
pub fn node_stats() -> NodeStats {
    NodeStats {
        allocated: NODES_ALLOCATED.with(|c| c.get()),
        released: NODES_RELEASED.with(|c| c.get()),
    }
}
