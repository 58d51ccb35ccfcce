//! Lab Bits: two's-complement puzzles under operator restrictions
//!
//! Every puzzle in [`puzzles`] is a branch-free, loop-free function over
//! `i64` built from `! ~ & ^ | + << >>` only. [`reference`] holds the plain
//! versions they are measured against, [`catalog`] describes each one
//! (budget, rating, argument ranges) and [`check`] compares the two.

pub mod catalog;
pub mod check;
pub mod puzzles;
pub mod reference;

pub use catalog::{PUZZLES, Puzzle, PuzzleFn, find, max_score};
pub use check::{
    CheckOptions, CheckSummary, Counterexample, PuzzleReport, check_all, check_args, check_puzzle,
};
pub use puzzles::{
    any_odd_bit, bit_count, bit_mask, bit_parity, conditional, copy_lsb, divide_power2, get_byte,
    rotate_left, subtraction_ok, true_five_eighths,
};
