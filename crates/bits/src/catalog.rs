//! Puzzle catalog
//!
//! One [`Puzzle`] record per function: the solution, its oracle, the
//! operator budget it was written against and the argument ranges the
//! checker draws from.

use crate::{puzzles, reference};
use std::fmt;
use std::ops::RangeInclusive;

/// Full signed 64-bit range
pub const FULL: RangeInclusive<i64> = i64::MIN..=i64::MAX;

/// Function shape of a puzzle
#[derive(Clone, Copy)]
pub enum PuzzleFn {
    Unary(fn(i64) -> i64),
    Binary(fn(i64, i64) -> i64),
    Ternary(fn(i64, i64, i64) -> i64),
}

impl PuzzleFn {
    /// Number of arguments
    pub fn arity(&self) -> usize {
        match self {
            PuzzleFn::Unary(_) => 1,
            PuzzleFn::Binary(_) => 2,
            PuzzleFn::Ternary(_) => 3,
        }
    }

    /// Call with the leading `arity()` entries of `args`
    pub fn call(&self, args: &[i64; 3]) -> i64 {
        match self {
            PuzzleFn::Unary(f) => f(args[0]),
            PuzzleFn::Binary(f) => f(args[0], args[1]),
            PuzzleFn::Ternary(f) => f(args[0], args[1], args[2]),
        }
    }
}

impl fmt::Debug for PuzzleFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PuzzleFn/{}", self.arity())
    }
}

/// Catalog entry for one puzzle
#[derive(Debug, Clone)]
pub struct Puzzle {
    /// Function name as used on the command line
    pub name: &'static str,
    /// Operators the solution may use
    pub legal_ops: &'static str,
    /// Maximum operator count
    pub max_ops: u32,
    /// Points awarded when the solution is correct
    pub rating: u32,
    /// Valid input range of each argument (unused trailing ranges are FULL)
    pub ranges: [RangeInclusive<i64>; 3],
    /// Restricted-operator solution
    pub solution: PuzzleFn,
    /// Oracle
    pub reference: PuzzleFn,
}

impl Puzzle {
    pub fn arity(&self) -> usize {
        self.solution.arity()
    }

    /// Check that `args` lie inside this puzzle's argument ranges
    pub fn validate_args(&self, args: &[i64; 3]) -> Result<(), String> {
        for (i, (arg, range)) in args.iter().zip(&self.ranges).enumerate().take(self.arity()) {
            if !range.contains(arg) {
                return Err(format!(
                    "{}: argument {} = {} is outside [{}, {}]",
                    self.name,
                    i + 1,
                    arg,
                    range.start(),
                    range.end()
                ));
            }
        }
        Ok(())
    }
}

const BASE_OPS: &str = "! ~ & ^ | + << >>";

/// Every puzzle, grouped by rating
pub static PUZZLES: [Puzzle; 11] = [
    // Rating 2
    Puzzle {
        name: "copyLSB",
        legal_ops: BASE_OPS,
        max_ops: 5,
        rating: 2,
        ranges: [FULL, FULL, FULL],
        solution: PuzzleFn::Unary(puzzles::copy_lsb),
        reference: PuzzleFn::Unary(reference::copy_lsb),
    },
    Puzzle {
        name: "dividePower2",
        legal_ops: BASE_OPS,
        max_ops: 15,
        rating: 2,
        ranges: [FULL, 0..=62, FULL],
        solution: PuzzleFn::Binary(puzzles::divide_power2),
        reference: PuzzleFn::Binary(reference::divide_power2),
    },
    Puzzle {
        name: "getByte",
        legal_ops: BASE_OPS,
        max_ops: 6,
        rating: 2,
        ranges: [FULL, 0..=7, FULL],
        solution: PuzzleFn::Binary(puzzles::get_byte),
        reference: PuzzleFn::Binary(reference::get_byte),
    },
    Puzzle {
        name: "anyOddBit",
        legal_ops: BASE_OPS,
        max_ops: 14,
        rating: 2,
        ranges: [FULL, FULL, FULL],
        solution: PuzzleFn::Unary(puzzles::any_odd_bit),
        reference: PuzzleFn::Unary(reference::any_odd_bit),
    },
    // Rating 3
    Puzzle {
        name: "conditional",
        legal_ops: "! ~ & ^ | << >>",
        max_ops: 16,
        rating: 3,
        ranges: [FULL, FULL, FULL],
        solution: PuzzleFn::Ternary(puzzles::conditional),
        reference: PuzzleFn::Ternary(reference::conditional),
    },
    Puzzle {
        name: "subtractionOK",
        legal_ops: BASE_OPS,
        max_ops: 20,
        rating: 3,
        ranges: [FULL, FULL, FULL],
        solution: PuzzleFn::Binary(puzzles::subtraction_ok),
        reference: PuzzleFn::Binary(reference::subtraction_ok),
    },
    Puzzle {
        name: "bitMask",
        legal_ops: BASE_OPS,
        max_ops: 16,
        rating: 3,
        ranges: [0..=63, 0..=63, FULL],
        solution: PuzzleFn::Binary(puzzles::bit_mask),
        reference: PuzzleFn::Binary(reference::bit_mask),
    },
    Puzzle {
        name: "rotateLeft",
        legal_ops: BASE_OPS,
        max_ops: 25,
        rating: 3,
        ranges: [FULL, 0..=63, FULL],
        solution: PuzzleFn::Binary(puzzles::rotate_left),
        reference: PuzzleFn::Binary(reference::rotate_left),
    },
    // Rating 4
    Puzzle {
        name: "trueFiveEighths",
        legal_ops: BASE_OPS,
        max_ops: 20,
        rating: 4,
        ranges: [FULL, FULL, FULL],
        solution: PuzzleFn::Unary(puzzles::true_five_eighths),
        reference: PuzzleFn::Unary(reference::true_five_eighths),
    },
    Puzzle {
        name: "bitCount",
        legal_ops: BASE_OPS,
        max_ops: 50,
        rating: 4,
        ranges: [FULL, FULL, FULL],
        solution: PuzzleFn::Unary(puzzles::bit_count),
        reference: PuzzleFn::Unary(reference::bit_count),
    },
    Puzzle {
        name: "bitParity",
        legal_ops: BASE_OPS,
        max_ops: 22,
        rating: 4,
        ranges: [FULL, FULL, FULL],
        solution: PuzzleFn::Unary(puzzles::bit_parity),
        reference: PuzzleFn::Unary(reference::bit_parity),
    },
];

/// Look up a puzzle by name
///
/// Accepts the camelCase name (`bitCount`) and the snake_case Rust function
/// name (`bit_count`).
pub fn find(name: &str) -> Option<&'static Puzzle> {
    let wanted: String = name.chars().filter(|c| *c != '_').collect();
    PUZZLES
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(&wanted))
}

/// Sum of all ratings
pub fn max_score() -> u32 {
    PUZZLES.iter().map(|p| p.rating).sum()
}
