use std::sync::LazyLock;

use regex::Regex;

static DAYS_LEFT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+d left$").unwrap());
static OVERFLOW_BADGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^,\s*\+\d+$").unwrap());

pub const SUPER_OFFER: &str = "super offer";

/// UI chrome labels rendered inside a listing card.
const META_LABELS: &[&str] = &["new", "locations", "1-click apply", SUPER_OFFER];

/// Badge, countdown or overflow counter. Never a field candidate.
pub fn is_meta_line(line: &str) -> bool {
    let stripped = line.trim();
    let lower = stripped.to_lowercase();

    META_LABELS.contains(&lower.as_str())
        || DAYS_LEFT_RE.is_match(&lower)
        || OVERFLOW_BADGE_RE.is_match(stripped)
}

/// "12 000 - 18 000 PLN/month", "150 - 180 PLN/h", "Undisclosed Salary".
pub fn is_salary_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("pln/") || lower.contains("undisclosed salary")
}

pub fn is_super_offer(line: &str) -> bool {
    line.trim().to_lowercase() == SUPER_OFFER
}

// ── Tests ──
