use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::JobOffer;

static NON_ALNUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").unwrap());

/// User criteria an offer must satisfy to be kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferFilter {
    pub min_salary_pln: Option<u32>,
    pub city: Option<String>,
    pub must_have_skills: Vec<String>,
}

impl OfferFilter {
    pub fn matches(&self, offer: &JobOffer) -> bool {
        if let Some(threshold) = self.min_salary_pln {
            match offer.salary_floor() {
                Some(floor) if floor >= threshold => {}
                _ => return false,
            }
        }

        if let Some(city) = self.city.as_deref().filter(|c| !c.is_empty()) {
            match &offer.city {
                Some(c) if c.to_lowercase() == city.to_lowercase() => {}
                _ => return false,
            }
        }

        if !self.must_have_skills.is_empty() {
            let have: HashSet<String> = offer.skills.iter().map(|s| normalize_skill(s)).collect();
            if !self
                .must_have_skills
                .iter()
                .all(|req| have.contains(&normalize_skill(req)))
            {
                return false;
            }
        }

        true
    }
}

/// Lower-case, collapse every run of non-alphanumerics to one space, trim.
/// "C++" and "c  + +" both become "c"; so does plain "C".
pub fn normalize_skill(skill: &str) -> String {
    let lower = skill.to_lowercase();
    NON_ALNUM_RE
        .replace_all(&lower, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keep matching offers, in input order.
pub fn filter_offers(offers: Vec<JobOffer>, filter: &OfferFilter) -> Vec<JobOffer> {
    offers.into_iter().filter(|o| filter.matches(o)).collect()
}

// ── Tests ──
