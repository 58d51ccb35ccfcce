//! Shared queue
//!
//! [`Queue`] does no locking of its own. `SharedQueue` puts one mutex around
//! it and hands out cheap clones of the handle, so several threads can push
//! and pop the same queue. Every operation takes the lock once.

use crate::error::QueueError;
use crate::queue::Queue;
use std::sync::{Arc, Mutex, MutexGuard};

/// Clonable, thread-safe handle to a [`Queue`]
#[derive(Clone, Default)]
pub struct SharedQueue {
    inner: Arc<Mutex<Queue>>,
}

impl SharedQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing queue
    pub fn from_queue(queue: Queue) -> Self {
        SharedQueue {
            inner: Arc::new(Mutex::new(queue)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Queue> {
        // Queue methods never panic between relinking steps
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert_head(&self, text: &str) -> Result<(), QueueError> {
        self.lock().insert_head(text)
    }

    pub fn insert_tail(&self, text: &str) -> Result<(), QueueError> {
        self.lock().insert_tail(text)
    }

    /// See [`Queue::remove_head`]
    pub fn remove_head(&self, buf: Option<&mut [u8]>) -> Result<usize, QueueError> {
        self.lock().remove_head(buf)
    }

    pub fn pop_head(&self) -> Option<String> {
        self.lock().pop_head()
    }

    pub fn size(&self) -> usize {
        self.lock().size()
    }

    pub fn reverse(&self) {
        self.lock().reverse()
    }

    /// Run `f` with exclusive access to the queue
    pub fn with<R>(&self, f: impl FnOnce(&mut Queue) -> R) -> R {
        f(&mut self.lock())
    }

    /// Snapshot of the current contents as text, head first
    pub fn to_vec(&self) -> Vec<String> {
        self.lock().iter().lossy().map(|s| s.into_owned()).collect()
    }
}
