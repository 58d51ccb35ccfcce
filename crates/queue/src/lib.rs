//! Lab Queue: a singly-linked queue of owned strings
//!
//! The queue supports FIFO and LIFO use: insertion at either end, removal
//! at the head into a bounded byte buffer, O(1) size and in-place reversal.
//!
//! # Modules
//!
//! - `queue`: the [`Queue`] container and its iterator
//! - `node`: explicit node allocation and per-thread allocation counters
//! - `error`: [`QueueError`] and the thread-local last error for C callers
//! - `ffi`: `extern "C"` entry points with the classic `queue.h` contract
//! - `shared`: [`SharedQueue`], a mutex-guarded handle for multi-threaded use

pub mod error;
pub mod ffi;
pub mod node;
pub mod queue;
pub mod shared;

pub use error::{QueueError, clear_last_error, has_last_error, take_last_error};
pub use node::{NodeStats, node_stats};
pub use queue::{Iter, Queue};
pub use shared::SharedQueue;
