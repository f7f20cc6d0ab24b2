use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const DEFAULT_CURRENCY: &str = "PLN";
pub const UNKNOWN_COMPANY: &str = "Unknown company";
pub const UNKNOWN_SLUG: &str = "unknown";
pub const MAX_SKILLS: usize = 12;

/// Site an offer was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    JustJoinIt,
    TheProtocol,
    Other,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::JustJoinIt, Source::TheProtocol, Source::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::JustJoinIt => "justjoinit",
            Source::TheProtocol => "theprotocol",
            Source::Other => "other",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .into_iter()
            .find(|src| src.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSource(s.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("unknown source: {0}")]
pub struct UnknownSource(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkplaceType {
    Remote,
    Hybrid,
    Office,
    #[default]
    Unknown,
}

impl WorkplaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkplaceType::Remote => "remote",
            WorkplaceType::Hybrid => "hybrid",
            WorkplaceType::Office => "office",
            WorkplaceType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for WorkplaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized job posting. Built once by the parser, never mutated after.
#[derive(Debug, Clone, PartialEq)]
pub struct JobOffer {
    pub source: Source,
    pub external_id: String,
    pub title: String,
    pub company: String,
    pub city: Option<String>,
    pub workplace_type: WorkplaceType,
    pub employment_type: Option<String>,
    pub salary_min_pln: Option<u32>,
    pub salary_max_pln: Option<u32>,
    pub currency: Option<String>,
    pub skills: Vec<String>,
    pub offer_url: Url,
    pub published_at: Option<DateTime<Utc>>,
    pub scraped_at: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq)]
pub enum InvalidOffer {
    #[error("offer url is not a valid absolute url: {0}")]
    Url(String),
    #[error("offer field `{0}` is empty")]
    EmptyField(&'static str),
    #[error("offer has {0} skills, at most 12 allowed")]
    TooManySkills(usize),
}

impl JobOffer {
    /// Checks the record invariants. Salary ordering is deliberately not checked.
    pub fn validate(&self) -> Result<(), InvalidOffer> {
        for (name, value) in [
            ("external_id", &self.external_id),
            ("title", &self.title),
            ("company", &self.company),
        ] {
            if value.trim().is_empty() {
                return Err(InvalidOffer::EmptyField(name));
            }
        }
        if self.skills.len() > MAX_SKILLS {
            return Err(InvalidOffer::TooManySkills(self.skills.len()));
        }
        Ok(())
    }

    /// Lowest salary figure we know about: the min bound, else the max bound.
    pub fn salary_floor(&self) -> Option<u32> {
        self.salary_min_pln.or(self.salary_max_pln)
    }
}

/// Parse an offer URL, rejecting anything that isn't absolute http(s).
pub fn parse_offer_url(raw: &str) -> Result<Url, InvalidOffer> {
    let url = Url::parse(raw.trim()).map_err(|_| InvalidOffer::Url(raw.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(InvalidOffer::Url(raw.to_string())),
    }
}
