use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat, FileSourceFile};
use serde::Deserialize;
use thiserror::Error;

use crate::filter::OfferFilter;

pub const ENV_PREFIX: &str = "JOBPULSE";
pub const DEFAULT_CONFIG_FILE: &str = "config.json";
const DEFAULT_MIN_SALARY_PLN: u32 = 12_000;
const DEFAULT_SKILLS: &[&str] = &["python"];

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Runtime options for one fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_filters")]
    pub filters: FilterSettings,
}

/// Present-but-partial sections leave the missing criteria unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterSettings {
    #[serde(default)]
    pub min_salary_pln: Option<u32>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub must_have_skills: Vec<String>,
}

fn default_sources() -> Vec<String> {
    vec!["justjoinit".to_string()]
}

fn default_limit() -> usize {
    30
}

fn default_db_path() -> PathBuf {
    PathBuf::from("jobpulse.db")
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_filters() -> FilterSettings {
    FilterSettings {
        min_salary_pln: Some(DEFAULT_MIN_SALARY_PLN),
        city: None,
        must_have_skills: DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect(),
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            limit: default_limit(),
            db_path: default_db_path(),
            timeout_secs: default_timeout_secs(),
            filters: default_filters(),
        }
    }
}

/// `JOBPULSE_LIMIT`, `JOBPULSE_FILTERS__MUST_HAVE_SKILLS=python,sql`, ...
pub fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("sources")
        .with_list_parse_key("filters.must_have_skills")
        .try_parsing(true)
}

fn file_source(path: Option<&Path>) -> File<FileSourceFile, FileFormat> {
    match path {
        Some(p) => File::from(p).required(true),
        None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    }
}

impl Settings {
    /// Layer the config file (when there is one) under the environment.
    /// A path given explicitly must exist; the default one is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_with(path, env_source())
    }

    pub fn load_with(path: Option<&Path>, env: Environment) -> Result<Self, SettingsError> {
        // A `filters` table written in the file replaces the default criteria
        // wholesale. Env keys alone only override the ones they name.
        let file_layer = Config::builder().add_source(file_source(path)).build()?;
        let mut builder = Config::builder();
        if file_layer.get_table("filters").is_err() {
            builder = builder
                .set_default("filters.min_salary_pln", i64::from(DEFAULT_MIN_SALARY_PLN))?
                .set_default("filters.must_have_skills", DEFAULT_SKILLS.to_vec())?;
        }
        let settings: Settings = builder
            .add_source(file_source(path))
            .add_source(env)
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.limit == 0 {
            return Err(SettingsError::Invalid("`limit` must be at least 1".into()));
        }
        if self.timeout_secs == 0 {
            return Err(SettingsError::Invalid("`timeout_secs` must be at least 1".into()));
        }
        if self.sources.iter().all(|s| s.trim().is_empty()) {
            return Err(SettingsError::Invalid("`sources` must name at least one source".into()));
        }
        if self.db_path.as_os_str().is_empty() {
            return Err(SettingsError::Invalid("`db_path` must not be empty".into()));
        }
        if self.filters.must_have_skills.iter().any(|s| s.trim().is_empty()) {
            return Err(SettingsError::Invalid(
                "`filters.must_have_skills` contains an empty entry".into(),
            ));
        }
        Ok(())
    }

    pub fn offer_filter(&self) -> OfferFilter {
        OfferFilter {
            min_salary_pln: self.filters.min_salary_pln,
            city: self
                .filters
                .city
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            must_have_skills: self.filters.must_have_skills.clone(),
        }
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        env_source().source(Some(map))
    }

    fn json_file(body: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f
    }

    #[test]
    fn defaults_without_file_or_env() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        let s = Settings::load_with(None, env(&[])).unwrap();
        assert_eq!(s.limit, 30);
        assert_eq!(s.sources, vec!["justjoinit"]);
        assert_eq!(s.filters.min_salary_pln, Some(12_000));
        assert_eq!(s.filters.must_have_skills, vec!["python"]);
        assert!(Settings::load_with(Some(&missing), env(&[])).is_err());
    }

    #[test]
    fn file_values_override_defaults() {
        let f = json_file(
            r#"{"limit": 5, "db_path": "x.db", "filters": {"city": "Kraków"}}"#,
        );
        let s = Settings::load_with(Some(f.path()), env(&[])).unwrap();
        assert_eq!(s.limit, 5);
        assert_eq!(s.db_path, PathBuf::from("x.db"));
        assert_eq!(s.filters.city.as_deref(), Some("Kraków"));
        // partial filters section: omitted criteria stay unset
        assert_eq!(s.filters.min_salary_pln, None);
        assert!(s.filters.must_have_skills.is_empty());
    }

    #[test]
    fn env_overrides_file() {
        let f = json_file(r#"{"limit": 5}"#);
        let s = Settings::load_with(
            Some(f.path()),
            env(&[
                ("JOBPULSE_LIMIT", "7"),
                ("JOBPULSE_SOURCES", "justjoinit,theprotocol"),
                ("JOBPULSE_FILTERS__MIN_SALARY_PLN", "15000"),
                ("JOBPULSE_FILTERS__MUST_HAVE_SKILLS", "rust,sql"),
            ]),
        )
        .unwrap();
        assert_eq!(s.limit, 7);
        assert_eq!(s.sources, vec!["justjoinit", "theprotocol"]);
        assert_eq!(s.filters.min_salary_pln, Some(15_000));
        assert_eq!(s.filters.must_have_skills, vec!["rust", "sql"]);
    }

    #[test]
    fn env_filter_key_keeps_other_default_criteria() {
        let s = Settings::load_with(None, env(&[("JOBPULSE_FILTERS__CITY", "Kraków")])).unwrap();
        assert_eq!(s.filters.city.as_deref(), Some("Kraków"));
        assert_eq!(s.filters.min_salary_pln, Some(12_000));
        assert_eq!(s.filters.must_have_skills, vec!["python"]);
    }

    #[test]
    fn env_filter_key_layers_over_file_filters() {
        let f = json_file(r#"{"filters": {"must_have_skills": ["rust"]}}"#);
        let s = Settings::load_with(
            Some(f.path()),
            env(&[("JOBPULSE_FILTERS__MIN_SALARY_PLN", "9000")]),
        )
        .unwrap();
        assert_eq!(s.filters.min_salary_pln, Some(9_000));
        assert_eq!(s.filters.must_have_skills, vec!["rust"]);
        assert_eq!(s.filters.city, None);
    }

    #[test]
    fn malformed_file_is_fatal() {
        let f = json_file("{ not json");
        assert!(matches!(
            Settings::load_with(Some(f.path()), env(&[])),
            Err(SettingsError::Load(_))
        ));
    }

    #[test]
    fn wrong_type_is_fatal() {
        let f = json_file(r#"{"limit": "lots"}"#);
        assert!(Settings::load_with(Some(f.path()), env(&[])).is_err());
    }

    #[test]
    fn zero_limit_rejected() {
        let f = json_file(r#"{"limit": 0}"#);
        assert!(matches!(
            Settings::load_with(Some(f.path()), env(&[])),
            Err(SettingsError::Invalid(_))
        ));
    }

    #[test]
    fn blank_skill_rejected() {
        let s = Settings {
            filters: FilterSettings {
                must_have_skills: vec!["rust".into(), " ".into()],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn offer_filter_drops_blank_city() {
        let s = Settings {
            filters: FilterSettings {
                city: Some("  ".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(s.offer_filter().city, None);
    }
}
