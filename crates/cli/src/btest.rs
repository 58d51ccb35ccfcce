//! Puzzle checker front end
//!
//! Turns checker results into the classic btest table:
//!
//! ```text
//! Score   Rating  Errors  Function
//!  2      2       0       copyLSB
//!  0      3       1       bitMask
//! Total points: 2/5
//! ```

use lab_bits::{CheckSummary, Counterexample, Puzzle, PuzzleReport};
use std::fmt::Write;

/// `value[0xhex]`, as btest prints arguments and results
fn show_value(v: i64) -> String {
    format!("{}[{:#x}]", v, v)
}

/// Describe a failing case
pub fn describe_counterexample(name: &str, cx: &Counterexample) -> String {
    let args: Vec<String> = cx.args.iter().map(|a| show_value(*a)).collect();
    format!(
        "ERROR: Test {}({}) failed...\n...Gives {}. Should be {}",
        name,
        args.join(","),
        show_value(cx.got),
        show_value(cx.expected)
    )
}

/// Full report: failures first, then the score table
pub fn render_summary(summary: &CheckSummary) -> String {
    let mut out = String::new();
    for report in &summary.reports {
        if let Some(cx) = &report.counterexample {
            let _ = writeln!(out, "{}", describe_counterexample(report.name, cx));
        }
    }
    let _ = writeln!(out, "Score\tRating\tErrors\tFunction");
    for report in &summary.reports {
        let _ = writeln!(out, "{}", table_row(report));
    }
    let _ = writeln!(out, "{}", render_total(summary));
    out
}

fn table_row(report: &PuzzleReport) -> String {
    let errors = if report.passed() { 0 } else { 1 };
    format!(
        " {}\t{}\t{}\t{}",
        report.points(),
        report.rating,
        errors,
        report.name
    )
}

/// `Total points: N/M`
pub fn render_total(summary: &CheckSummary) -> String {
    format!("Total points: {}/{}", summary.score(), summary.max_score())
}

/// Result line for a check at explicit arguments
pub fn render_single(puzzle: &Puzzle, args: &[i64; 3], cx: Option<&Counterexample>) -> String {
    match cx {
        Some(cx) => describe_counterexample(puzzle.name, cx),
        None => {
            let shown: Vec<String> = args[..puzzle.arity()]
                .iter()
                .map(|a| show_value(*a))
                .collect();
            format!(
                "Test {}({}) passed: {}",
                puzzle.name,
                shown.join(","),
                show_value(puzzle.solution.call(args))
            )
        }
    }
}

/// Parse a decimal or `0x` hexadecimal argument
///
/// Hex values are read as 64-bit patterns, so `0xFFFFFFFFFFFFFFFF` is -1.
pub fn parse_arg(s: &str) -> Result<i64, String> {
    let trimmed = s.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let magnitude = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).map_err(|e| format!("Invalid argument '{}': {}", s, e))? as i64
    } else {
        return trimmed
            .parse::<i64>()
            .map_err(|e| format!("Invalid argument '{}': {}", s, e));
    };
    Ok(if negative { magnitude.wrapping_neg() } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lab_bits::{CheckOptions, check_all, find};

    #[test]
    fn test_parse_arg() {
        assert_eq!(parse_arg("42"), Ok(42));
        assert_eq!(parse_arg("-33"), Ok(-33));
        assert_eq!(parse_arg("0x38"), Ok(0x38));
        assert_eq!(parse_arg("0xFFFFFFFFFFFFFFFF"), Ok(-1));
        assert_eq!(parse_arg("0x8000000000000000"), Ok(i64::MIN));
        assert_eq!(parse_arg("-0x10"), Ok(-16));
        assert!(parse_arg("zebra").is_err());
        assert!(parse_arg("0xZZ").is_err());
    }

    #[test]
    fn test_describe_counterexample() {
        let cx = Counterexample {
            args: vec![5],
            got: 3,
            expected: 2,
        };
        assert_eq!(
            describe_counterexample("bitCount", &cx),
            "ERROR: Test bitCount(5[0x5]) failed...\n...Gives 3[0x3]. Should be 2[0x2]"
        );
    }

    #[test]
    fn test_render_summary() {
        let summary = check_all(
            &["copyLSB".to_string(), "bitMask".to_string()],
            &CheckOptions { seed: 3, trials: 50 },
        )
        .unwrap();
        let text = render_summary(&summary);
        assert!(text.starts_with("Score\tRating\tErrors\tFunction\n"));
        assert!(text.contains(" 2\t2\t0\tcopyLSB\n"));
        assert!(text.contains(" 3\t3\t0\tbitMask\n"));
        assert!(text.ends_with("Total points: 5/5\n"));
    }

    #[test]
    fn test_render_single() {
        let p = find("bitMask").unwrap();
        assert_eq!(
            render_single(p, &[5, 3, 0], None),
            "Test bitMask(5[0x5],3[0x3]) passed: 56[0x38]"
        );
    }
}
