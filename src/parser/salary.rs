use std::sync::LazyLock;

use regex::Regex;

use super::classify::is_salary_line;

static RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d[\d\s]*)\s*-\s*(\d[\d\s]*)\s*PLN").unwrap());

pub const CONTRACT_TAG: &str = "b2b";
pub const PERMANENT_TAG: &str = "permanent";

/// Extract `(min, max)` from a salary line. Thousands may be separated by
/// any whitespace. No match, or a figure that doesn't fit, yields `(None, None)`.
pub fn parse_salary_range(line: &str) -> (Option<u32>, Option<u32>) {
    if !is_salary_line(line) {
        return (None, None);
    }
    let Some(caps) = RANGE_RE.captures(line) else {
        return (None, None);
    };

    match (parse_amount(&caps[1]), parse_amount(&caps[2])) {
        (Some(min), Some(max)) => (Some(min), Some(max)),
        _ => (None, None),
    }
}

fn parse_amount(raw: &str) -> Option<u32> {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .parse()
        .ok()
}

/// Hourly rates read as contract work, monthly/yearly as permanent.
pub fn employment_type(salary_line: &str) -> Option<&'static str> {
    let lower = salary_line.to_lowercase();
    if lower.contains("/h") {
        Some(CONTRACT_TAG)
    } else if lower.contains("/month") || lower.contains("/year") {
        Some(PERMANENT_TAG)
    } else {
        None
    }
}

// ── Tests ──
