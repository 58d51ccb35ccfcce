//! Puzzle checker
//!
//! Runs every selected puzzle against its reference over two sets of
//! arguments:
//! - corner values of each argument range (bounds, their neighbours, 0, ±1
//!   and every single-bit value), combined across arguments
//! - `trials` random tuples drawn from a seeded generator
//!
//! The first disagreement is kept as the counterexample. A correct puzzle
//! earns its rating in points.

use crate::catalog::{PUZZLES, Puzzle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use tracing::{debug, info};

/// Checker configuration
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Seed for the random tuples
    pub seed: u64,
    /// Random tuples per puzzle
    pub trials: usize,
}

impl Default for CheckOptions {
    fn default() -> Self {
        CheckOptions {
            seed: 0x15213,
            trials: 10_000,
        }
    }
}

/// Disagreement between a puzzle and its reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counterexample {
    pub args: Vec<i64>,
    pub got: i64,
    pub expected: i64,
}

/// Outcome for one puzzle
#[derive(Debug, Clone)]
pub struct PuzzleReport {
    pub name: &'static str,
    pub rating: u32,
    pub max_ops: u32,
    /// Number of argument tuples evaluated
    pub cases: usize,
    pub counterexample: Option<Counterexample>,
}

impl PuzzleReport {
    pub fn passed(&self) -> bool {
        self.counterexample.is_none()
    }

    /// Rating if passed, else 0
    pub fn points(&self) -> u32 {
        if self.passed() { self.rating } else { 0 }
    }
}

/// Reports for a whole run
#[derive(Debug, Clone, Default)]
pub struct CheckSummary {
    pub reports: Vec<PuzzleReport>,
}

impl CheckSummary {
    pub fn score(&self) -> u32 {
        self.reports.iter().map(PuzzleReport::points).sum()
    }

    pub fn max_score(&self) -> u32 {
        self.reports.iter().map(|r| r.rating).sum()
    }

    pub fn failed(&self) -> usize {
        self.reports.iter().filter(|r| !r.passed()).count()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }
}

/// Corner values of a range, deduplicated and in ascending order
pub fn corner_values(range: &RangeInclusive<i64>) -> Vec<i64> {
    let (lo, hi) = (*range.start(), *range.end());
    let mut values = vec![
        lo,
        lo.saturating_add(1),
        hi.saturating_sub(1),
        hi,
        0,
        1,
        -1,
    ];
    for bit in 0..64 {
        let v = 1i64 << bit;
        values.push(v);
        values.push(!v);
    }
    values.retain(|v| range.contains(v));
    values.sort_unstable();
    values.dedup();
    values
}

/// Evaluate `puzzle` at `args`, returning the counterexample on mismatch
pub fn check_args(puzzle: &Puzzle, args: &[i64; 3]) -> Option<Counterexample> {
    let got = puzzle.solution.call(args);
    let expected = puzzle.reference.call(args);
    if got == expected {
        None
    } else {
        Some(Counterexample {
            args: args[..puzzle.arity()].to_vec(),
            got,
            expected,
        })
    }
}

/// Check a single puzzle over corner and random arguments
pub fn check_puzzle(puzzle: &Puzzle, options: &CheckOptions) -> PuzzleReport {
    let arity = puzzle.arity();
    let corners: Vec<Vec<i64>> = (0..3)
        .map(|i| {
            if i < arity {
                corner_values(&puzzle.ranges[i])
            } else {
                vec![0]
            }
        })
        .collect();

    let mut cases = 0;
    let mut counterexample = None;

    'corners: for &a in &corners[0] {
        for &b in &corners[1] {
            for &c in &corners[2] {
                cases += 1;
                if let Some(found) = check_args(puzzle, &[a, b, c]) {
                    counterexample = Some(found);
                    break 'corners;
                }
            }
        }
    }

    if counterexample.is_none() {
        // Mix the name into the seed so puzzles do not share tuples
        let salt = puzzle
            .name
            .bytes()
            .fold(0u64, |h, b| h.wrapping_mul(31).wrapping_add(b as u64));
        let mut rng = StdRng::seed_from_u64(options.seed ^ salt);
        for _ in 0..options.trials {
            let mut args = [0i64; 3];
            for (i, arg) in args.iter_mut().enumerate().take(arity) {
                *arg = rng.gen_range(puzzle.ranges[i].clone());
            }
            cases += 1;
            if let Some(found) = check_args(puzzle, &args) {
                counterexample = Some(found);
                break;
            }
        }
    }

    debug!(
        "{}: {} cases, {}",
        puzzle.name,
        cases,
        if counterexample.is_some() { "FAILED" } else { "ok" }
    );

    PuzzleReport {
        name: puzzle.name,
        rating: puzzle.rating,
        max_ops: puzzle.max_ops,
        cases,
        counterexample,
    }
}

/// Check the named puzzles, or every puzzle when `names` is empty
pub fn check_all(names: &[String], options: &CheckOptions) -> Result<CheckSummary, String> {
    let selected: Vec<&Puzzle> = if names.is_empty() {
        PUZZLES.iter().collect()
    } else {
        names
            .iter()
            .map(|n| crate::catalog::find(n).ok_or_else(|| format!("No puzzle named '{}'", n)))
            .collect::<Result<_, _>>()?
    };

    info!(
        "Checking {} puzzle(s), seed={:#x}, trials={}",
        selected.len(),
        options.seed,
        options.trials
    );

    Ok(CheckSummary {
        reports: selected
            .into_iter()
            .map(|p| check_puzzle(p, options))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FULL, PuzzleFn, find};

    #[test]
    fn test_corner_values_clipped_to_range() {
        let values = corner_values(&(0..=7));
        assert_eq!(values, vec![0, 1, 2, 4, 6, 7]);
    }

    #[test]
    fn test_corner_values_full_range() {
        let values = corner_values(&FULL);
        assert_eq!(values.first(), Some(&i64::MIN));
        assert_eq!(values.last(), Some(&i64::MAX));
        assert!(values.contains(&0));
        assert!(values.contains(&-1));
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_every_puzzle_passes() {
        let options = CheckOptions {
            seed: 7,
            trials: 2_000,
        };
        let summary = check_all(&[], &options).unwrap();
        for report in &summary.reports {
            assert!(
                report.passed(),
                "{} failed: {:?}",
                report.name,
                report.counterexample
            );
        }
        assert_eq!(summary.score(), crate::catalog::max_score());
    }

    #[test]
    fn test_broken_puzzle_is_caught() {
        fn wrong(x: i64) -> i64 {
            x & 1
        }
        let mut puzzle = find("copyLSB").unwrap().clone();
        puzzle.solution = PuzzleFn::Unary(wrong);

        let report = check_puzzle(&puzzle, &CheckOptions::default());
        assert!(!report.passed());
        assert_eq!(report.points(), 0);
        let cx = report.counterexample.unwrap();
        assert_eq!(cx.args.len(), 1);
        assert_ne!(cx.got, cx.expected);
    }

    #[test]
    fn test_check_args_explicit() {
        let p = find("getByte").unwrap();
        assert_eq!(check_args(p, &[0x12345678, 1, 0]), None);
    }

    #[test]
    fn test_unknown_name() {
        let err = check_all(&["bogus".to_string()], &CheckOptions::default()).unwrap_err();
        assert!(err.contains("bogus"));
    }

    #[test]
    fn test_selected_subset() {
        let summary = check_all(
            &["bitParity".to_string(), "rotate_left".to_string()],
            &CheckOptions { seed: 1, trials: 10 },
        )
        .unwrap();
        let names: Vec<_> = summary.reports.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["bitParity", "rotateLeft"]);
        assert_eq!(summary.max_score(), 7);
    }
}
