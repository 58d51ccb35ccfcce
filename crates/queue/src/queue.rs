//! String Queue
//!
//! A singly-linked list of owned strings with pointers to both ends, so it
//! serves as a FIFO (insert at tail, remove at head) and as a LIFO (insert
//! and remove at head).
//!
//! ## Layout
//!
//! ```text
//!  head                            tail
//!   │                               │
//!   ▼                               ▼
//! ┌─────┬───┐   ┌─────┬───┐   ┌─────┬──────┐
//! │ "c" │ ●─┼──▶│ "a" │ ●─┼──▶│ "b" │ null │
//! └─────┴───┘   └─────┴───┘   └─────┴──────┘
//! ```
//!
//! Invariants (checked by [`Queue::check_invariants`]):
//! - `size` equals the number of nodes reachable from `head`
//! - empty ⇔ `head` and `tail` are both null; one element ⇔ `head == tail`
//! - `tail` is reached from `head` in `size - 1` hops and its `next` is null
//!
//! Insertion at either end and removal at the head are O(1). Reverse is
//! linear and never allocates.
//!
//! Elements are byte strings. The `&str` methods are conveniences over the
//! `_bytes` ones; reading text back as `String` replaces invalid UTF-8.


use crate::error::QueueError;
use crate::node::{self, Node};
use std::alloc::{Layout, alloc};
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;
use std::ptr;

/// FIFO/LIFO queue of owned strings
pub struct Queue {
    /// First node (null when empty)
    head: *mut Node,
    /// Last node (null when empty)
    tail: *mut Node,
    /// Number of nodes in the chain
    size: usize,
}

// The queue exclusively owns every node reachable from `head`; nothing
// else holds a link into the chain, so moving it to another thread is fine.
// Shared access goes through `SharedQueue`.
unsafe impl Send for Queue {}

impl Queue {
    /// Create an empty queue
    pub const fn new() -> Self {
        Queue {
            head: ptr::null_mut(),
            tail: ptr::null_mut(),
            size: 0,
        }
    }

    /// Create an empty heap-allocated queue, reporting allocation failure
    pub fn try_new() -> Result<Box<Queue>, QueueError> {
        let raw = unsafe { alloc(Layout::new::<Queue>()) as *mut Queue };
        if raw.is_null() {
            return Err(QueueError::AllocationFailure);
        }
        unsafe {
            ptr::write(raw, Queue::new());
            // Global allocator + Layout::new::<Queue>() is what Box expects
            Ok(Box::from_raw(raw))
        }
    }

    /// Number of stored strings
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Alias for [`Queue::size`]
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Check if the queue holds no strings
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Insert a copy of `text` at the head
    pub fn insert_head(&mut self, text: &str) -> Result<(), QueueError> {
        self.insert_head_bytes(text.as_bytes())
    }

    /// Insert a copy of `text` at the tail
    pub fn insert_tail(&mut self, text: &str) -> Result<(), QueueError> {
        self.insert_tail_bytes(text.as_bytes())
    }

    pub fn insert_head_bytes(&mut self, text: &[u8]) -> Result<(), QueueError> {
        let new_head = node::allocate(text, self.head)?;
        self.head = new_head;
        if self.tail.is_null() {
            self.tail = new_head;
        }
        self.size += 1;
        Ok(())
    }

    pub fn insert_tail_bytes(&mut self, text: &[u8]) -> Result<(), QueueError> {
        let new_tail = node::allocate(text, ptr::null_mut())?;
        if self.tail.is_null() {
            self.head = new_tail;
        } else {
            unsafe { (*self.tail).next = new_tail };
        }
        self.tail = new_tail;
        self.size += 1;
        Ok(())
    }

    /// Remove the head element
    ///
    /// If `buf` is given and not empty, up to `buf.len() - 1` bytes of the
    /// removed string are copied into it, followed by a NUL terminator; the
    /// rest of the buffer is zero-filled. Longer strings are truncated
    /// silently. Returns the number of string bytes copied.
    pub fn remove_head(&mut self, buf: Option<&mut [u8]>) -> Result<usize, QueueError> {
        let value = self.unlink_head()?;
        Ok(match buf {
            Some(buf) => copy_truncated(&value, buf),
            None => 0,
        })
    }

    /// Remove the head element and return it as text
    pub fn pop_head(&mut self) -> Option<String> {
        self.pop_head_bytes()
            .map(|value| String::from_utf8_lossy(&value).into_owned())
    }

    /// Remove the head element and return its bytes
    pub fn pop_head_bytes(&mut self) -> Option<Box<[u8]>> {
        self.unlink_head().ok()
    }

    /// Borrow the head element without removing it
    pub fn peek_head(&self) -> Option<&[u8]> {
        if self.head.is_null() {
            None
        } else {
            Some(unsafe { &*(*self.head).value })
        }
    }

    /// Reverse the order of the elements in place
    ///
    /// Only links are rewritten; no node is allocated or released.
    pub fn reverse(&mut self) {
        if self.size <= 1 {
            return;
        }

        let mut prev: *mut Node = ptr::null_mut();
        let mut curr = self.head;
        self.tail = self.head;
        while !curr.is_null() {
            unsafe {
                let next = (*curr).next;
                (*curr).next = prev;
                prev = curr;
                curr = next;
            }
        }
        self.head = prev;
    }

    /// Walk the elements from head to tail
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head,
            remaining: self.size,
            _queue: PhantomData,
        }
    }

    /// Verify the structural invariants
    ///
    /// Returns a description of the first violation found.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.size == 0 {
            if !self.head.is_null() || !self.tail.is_null() {
                return Err("empty queue has a head or tail".to_string());
            }
            return Ok(());
        }
        if self.head.is_null() || self.tail.is_null() {
            return Err(format!("queue of size {} is missing head or tail", self.size));
        }

        let mut count = 1;
        let mut curr = self.head;
        unsafe {
            while !(*curr).next.is_null() {
                if count > self.size {
                    return Err(format!("chain is longer than size {}", self.size));
                }
                curr = (*curr).next;
                count += 1;
            }
        }

        if count != self.size {
            return Err(format!("size is {} but chain holds {} nodes", self.size, count));
        }
        if curr != self.tail {
            return Err("last node of the chain is not the tail".to_string());
        }
        Ok(())
    }

    /// Detach the head node and return its bytes
    fn unlink_head(&mut self) -> Result<Box<[u8]>, QueueError> {
        if self.head.is_null() {
            return Err(QueueError::InvalidArgument("queue is empty"));
        }

        let old_head = self.head;
        self.head = unsafe { (*old_head).next };
        if self.head.is_null() {
            self.tail = ptr::null_mut();
        }
        self.size -= 1;
        Ok(unsafe { node::release(old_head) })
    }
}

impl Default for Queue {
    fn default() -> Self {
        Queue::new()
    }
}

impl Drop for Queue {
    fn drop(&mut self) {
        let mut curr = self.head;
        while !curr.is_null() {
            unsafe {
                let next = (*curr).next;
                node::release(curr);
                curr = next;
            }
        }
        self.head = ptr::null_mut();
        self.tail = ptr::null_mut();
        self.size = 0;
    }
}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(String::from_utf8_lossy))
            .finish()
    }
}

impl<'a> IntoIterator for &'a Queue {
    type Item = &'a [u8];
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Borrowing iterator over a [`Queue`], head to tail
pub struct Iter<'a> {
    next: *mut Node,
    remaining: usize,
    _queue: PhantomData<&'a Queue>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        if self.next.is_null() {
            return None;
        }
        unsafe {
            let node = &*self.next;
            self.next = node.next;
            self.remaining -= 1;
            Some(&*node.value)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> Iter<'a> {
    /// Elements as text, invalid UTF-8 replaced
    pub fn lossy(self) -> impl Iterator<Item = Cow<'a, str>> {
        self.map(String::from_utf8_lossy)
    }
}

/// strncpy-style copy: at most `buf.len() - 1` bytes, then NUL padding
pub(crate) fn copy_truncated(value: &[u8], buf: &mut [u8]) -> usize {
    if buf.is_empty() {
        return 0;
    }
    let n = value.len().min(buf.len() - 1);
    buf[..n].copy_from_slice(&value[..n]);
    buf[n..].fill(0);
    n
}
