use std::path::Path;

use anyhow::{bail, Context, Result};
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;

use crate::model::JobOffer;

pub fn connect(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

/// Open an existing store for reading. Never creates the file or touches
/// its journal mode or schema.
pub fn connect_read_only(path: &Path) -> Result<Connection> {
    if !path.exists() {
        bail!("Database not found: {}", path.display());
    }
    Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("Failed to open {:?} read-only", path))
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS job_offers (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            source          TEXT NOT NULL,
            external_id     TEXT NOT NULL,
            title           TEXT NOT NULL,
            company         TEXT NOT NULL,
            city            TEXT,
            workplace_type  TEXT NOT NULL,
            employment_type TEXT,
            salary_min_pln  INTEGER,
            salary_max_pln  INTEGER,
            currency        TEXT,
            skills          TEXT,
            offer_url       TEXT NOT NULL,
            published_at    TEXT,
            scraped_at      TEXT NOT NULL,
            UNIQUE(source, external_id)
        );
        CREATE INDEX IF NOT EXISTS idx_job_offers_company ON job_offers(company);
        CREATE INDEX IF NOT EXISTS idx_job_offers_city ON job_offers(city);
        ",
    )?;
    Ok(())
}

// ── Writing ──

/// Insert offers, skipping any whose (source, external_id) is already stored.
/// Returns how many rows were actually written.
pub fn save_offers(conn: &Connection, offers: &[JobOffer]) -> Result<usize> {
    if offers.is_empty() {
        return Ok(0);
    }

    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO job_offers
             (source, external_id, title, company, city, workplace_type, employment_type,
              salary_min_pln, salary_max_pln, currency, skills, offer_url, published_at, scraped_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        )?;
        for o in offers {
            let skills = serde_json::to_string(&o.skills)?;
            count += stmt.execute(rusqlite::params![
                o.source.as_str(),
                o.external_id,
                o.title,
                o.company,
                o.city,
                o.workplace_type.as_str(),
                o.employment_type,
                o.salary_min_pln,
                o.salary_max_pln,
                o.currency,
                skills,
                o.offer_url.as_str(),
                o.published_at.map(|t| t.to_rfc3339()),
                o.scraped_at.to_rfc3339(),
            ])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

// ── Reading ──

/// Read-side search. Every set field narrows the result; text fields are
/// substring matches, `source` is exact, `min_salary` accepts either bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferQuery {
    pub city: Option<String>,
    pub company: Option<String>,
    pub skill: Option<String>,
    pub title: Option<String>,
    pub source: Option<String>,
    pub min_salary: Option<u32>,
    pub limit: usize,
}

impl Default for OfferQuery {
    fn default() -> Self {
        Self {
            city: None,
            company: None,
            skill: None,
            title: None,
            source: None,
            min_salary: None,
            limit: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferRow {
    pub source: String,
    pub external_id: String,
    pub title: String,
    pub company: String,
    pub city: Option<String>,
    pub workplace_type: String,
    pub employment_type: Option<String>,
    pub salary_min_pln: Option<u32>,
    pub salary_max_pln: Option<u32>,
    pub skills: Vec<String>,
    pub offer_url: String,
    pub scraped_at: String,
}

pub fn count(conn: &Connection) -> Result<usize> {
    let n: usize = conn.query_row("SELECT COUNT(*) FROM job_offers", [], |r| r.get(0))?;
    Ok(n)
}

/// Newest first (by insertion), capped at `query.limit`.
pub fn query_offers(conn: &Connection, query: &OfferQuery) -> Result<Vec<OfferRow>> {
    let mut conditions = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    let like_fields = [
        ("city", &query.city),
        ("company", &query.company),
        ("skills", &query.skill),
        ("title", &query.title),
    ];
    for (column, value) in like_fields {
        if let Some(v) = value {
            conditions.push(format!("{} LIKE ?{}", column, params.len() + 1));
            params.push(Box::new(format!("%{}%", v)));
        }
    }
    if let Some(s) = &query.source {
        conditions.push(format!("source = ?{}", params.len() + 1));
        params.push(Box::new(s.clone()));
    }
    if let Some(min) = query.min_salary {
        let n = params.len() + 1;
        conditions.push(format!("(salary_min_pln >= ?{n} OR salary_max_pln >= ?{n})"));
        params.push(Box::new(min));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        "SELECT source, external_id, title, company, city, workplace_type, employment_type,
                salary_min_pln, salary_max_pln, COALESCE(skills, '[]'), offer_url, scraped_at
         FROM job_offers{}
         ORDER BY id DESC
         LIMIT {}",
        where_clause, query.limit
    );

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt
        .query_map(param_refs.as_slice(), |row| {
            let skills: String = row.get(9)?;
            Ok(OfferRow {
                source: row.get(0)?,
                external_id: row.get(1)?,
                title: row.get(2)?,
                company: row.get(3)?,
                city: row.get(4)?,
                workplace_type: row.get(5)?,
                employment_type: row.get(6)?,
                salary_min_pln: row.get(7)?,
                salary_max_pln: row.get(8)?,
                skills: serde_json::from_str(&skills).unwrap_or_default(),
                offer_url: row.get(10)?,
                scraped_at: row.get(11)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Tests ──
