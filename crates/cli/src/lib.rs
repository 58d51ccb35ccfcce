//! labtest: drivers for the lab queue and the bit puzzles
//!
//! - `qtest`: command-script interpreter exercising [`lab_queue::Queue`]
//! - `btest`: report rendering and argument parsing for the puzzle checker
//! - `config`: layered TOML configuration shared by both drivers

pub mod btest;
pub mod config;
pub mod qtest;

pub use config::{ConfigOverrides, LabConfig};
pub use qtest::{QtestOutcome, QtestSession};
