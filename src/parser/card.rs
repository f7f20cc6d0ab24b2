use crate::model::{WorkplaceType, MAX_SKILLS, UNKNOWN_COMPANY};

use super::classify::{is_meta_line, is_salary_line, is_super_offer};
use super::salary::{employment_type, parse_salary_range};
use super::slug::{offer_slug, title_from_slug};

/// Fields recovered from one listing card's visible text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFields {
    pub title: String,
    pub company: String,
    pub city: Option<String>,
    pub salary_line: Option<String>,
    pub salary_min_pln: Option<u32>,
    pub salary_max_pln: Option<u32>,
    pub employment_type: Option<String>,
    pub workplace_type: WorkplaceType,
    pub skills: Vec<String>,
    pub external_id: String,
}

/// Positional read of a card: optional "super offer" badge, title, optional
/// salary line, company, city, then whatever is left counts as skills.
///
/// Total over its input: an empty card yields a record built from the URL slug.
pub fn extract_fields(offer_url: &str, lines: &[String]) -> CardFields {
    let external_id = offer_slug(offer_url);
    let lines: Vec<&str> = lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    if lines.is_empty() {
        return CardFields {
            title: title_from_slug(&external_id),
            company: UNKNOWN_COMPANY.to_string(),
            city: None,
            salary_line: None,
            salary_min_pln: None,
            salary_max_pln: None,
            employment_type: None,
            workplace_type: WorkplaceType::Unknown,
            skills: Vec::new(),
            external_id,
        };
    }

    let mut cursor = 0;
    if lines.len() > 1 && is_super_offer(lines[0]) {
        cursor = 1;
    }

    let title = lines[cursor];
    cursor += 1;

    let salary_line = match lines.get(cursor) {
        Some(l) if is_salary_line(l) => {
            cursor += 1;
            Some(*l)
        }
        _ => None,
    };

    let is_candidate = |l: &str| !is_meta_line(l) && !is_salary_line(l);

    let company_at = (cursor..lines.len()).find(|&i| is_candidate(lines[i]));
    let company = company_at.map_or(UNKNOWN_COMPANY, |i| lines[i]);

    let city_from = company_at.map_or(cursor, |i| i + 1);
    let city = lines[city_from.min(lines.len())..]
        .iter()
        .copied()
        .find(|l| is_candidate(*l) && *l != company);

    let (salary_min_pln, salary_max_pln) = salary_line.map_or((None, None), parse_salary_range);

    let workplace_type = if city.is_some_and(|c| c.to_lowercase().contains("remote"))
        || external_id.to_lowercase().contains("remote")
    {
        WorkplaceType::Remote
    } else {
        WorkplaceType::Unknown
    };

    let excluded = |l: &str| l == title || l == company || Some(l) == city || Some(l) == salary_line;
    let mut skills: Vec<String> = Vec::new();
    for line in &lines {
        let line = *line;
        if excluded(line) || !is_candidate(line) || line.chars().count() < 2 {
            continue;
        }
        if !skills.iter().any(|s| s == line) {
            skills.push(line.to_string());
        }
    }
    skills.truncate(MAX_SKILLS);

    CardFields {
        title: title.to_string(),
        company: company.to_string(),
        city: city.map(str::to_string),
        salary_line: salary_line.map(str::to_string),
        salary_min_pln,
        salary_max_pln,
        employment_type: salary_line.and_then(employment_type).map(str::to_string),
        workplace_type,
        skills,
        external_id,
    }
}

// ── Tests ──
