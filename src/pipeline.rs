use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::collector::{Collector, RawListing};
use crate::db;
use crate::filter::filter_offers;
use crate::model::{JobOffer, Source};
use crate::parser;
use crate::settings::Settings;

/// Outcome of one collect → extract → filter → store pass.
pub struct CycleReport {
    pub fetched: usize,
    pub kept: Vec<JobOffer>,
    pub inserted: usize,
}

pub async fn run_cycle(
    conn: &Connection,
    settings: &Settings,
    collectors: &[Box<dyn Collector>],
) -> Result<CycleReport> {
    let timeout = Duration::from_secs(settings.timeout_secs);
    let mut offers = Vec::new();

    for collector in collectors {
        let source = collector.source();
        let mut listings = collector.collect(timeout).await;
        listings.truncate(settings.limit);
        info!(source = %source, "Extracting {} listings", listings.len());
        offers.extend(extract_offers(source, &listings)?);
    }

    let fetched = offers.len();
    let kept = filter_offers(offers, &settings.offer_filter());
    info!("{} of {} offers passed filters", kept.len(), fetched);

    let inserted = db::save_offers(conn, &kept)?;
    info!("Stored {} new offers ({} already known)", inserted, kept.len() - inserted);

    Ok(CycleReport {
        fetched,
        kept,
        inserted,
    })
}

/// Extract every listing independently; a listing that can't become a valid
/// offer is dropped on its own. Output keeps listing order.
pub fn extract_offers(source: Source, listings: &[RawListing]) -> Result<Vec<JobOffer>> {
    let pb = ProgressBar::new(listings.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let offers: Vec<JobOffer> = listings
        .par_iter()
        .filter_map(|listing| {
            let result = parser::to_job_offer(source, listing);
            pb.inc(1);
            match result {
                Ok(offer) => Some(offer),
                Err(e) => {
                    debug!(url = %listing.url, "Dropping listing: {}", e);
                    None
                }
            }
        })
        .collect();

    pb.finish_and_clear();
    Ok(offers)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::settings::FilterSettings;

    struct Fixture(Vec<RawListing>);

    #[async_trait]
    impl Collector for Fixture {
        fn source(&self) -> Source {
            Source::JustJoinIt
        }

        async fn collect(&self, _timeout: Duration) -> Vec<RawListing> {
            self.0.clone()
        }
    }

    fn listing(slug: &str, lines: &[&str]) -> RawListing {
        RawListing {
            url: format!("https://justjoin.it/job-offer/{slug}"),
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn fixture() -> Vec<Box<dyn Collector>> {
        vec![Box::new(Fixture(vec![
            listing("acme-python-dev", &["Python Dev", "15 000 - 20 000 PLN/month", "Acme", "Kraków", "Python"]),
            listing("globex-go-dev", &["Go Dev", "20 000 - 25 000 PLN/month", "Globex", "Kraków", "Go"]),
            listing("cheap-python-dev", &["Python Dev", "5 000 - 7 000 PLN/month", "Cheap", "Kraków", "Python"]),
            listing("senior-python-dev", &[]),
            RawListing { url: "/job-offer/relative".into(), lines: vec!["Broken".into()] },
        ]))]
    }

    fn settings(limit: usize) -> Settings {
        Settings {
            limit,
            filters: FilterSettings {
                min_salary_pln: Some(12_000),
                city: None,
                must_have_skills: vec!["python".into()],
            },
            ..Default::default()
        }
    }

    fn mem() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn extraction_drops_only_bad_listings_and_keeps_order() {
        let listings = vec![
            listing("b", &["B", "Beta"]),
            RawListing { url: "nope".into(), lines: vec![] },
            listing("a", &[]),
        ];
        let offers = extract_offers(Source::JustJoinIt, &listings).unwrap();
        let ids: Vec<&str> = offers.iter().map(|o| o.external_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn cycle_filters_then_stores_once() {
        let conn = mem();
        let collectors = fixture();

        let first = run_cycle(&conn, &settings(30), &collectors).await.unwrap();
        assert_eq!(first.fetched, 4);
        let kept: Vec<&str> = first.kept.iter().map(|o| o.external_id.as_str()).collect();
        assert_eq!(kept, vec!["acme-python-dev"]);
        assert_eq!(first.inserted, 1);

        let second = run_cycle(&conn, &settings(30), &collectors).await.unwrap();
        assert_eq!(second.kept.len(), 1);
        assert_eq!(second.inserted, 0);
        assert_eq!(db::count(&conn).unwrap(), 1);
    }

    #[tokio::test]
    async fn limit_caps_listings_before_extraction() {
        let conn = mem();
        let report = run_cycle(&conn, &settings(2), &fixture()).await.unwrap();
        assert_eq!(report.fetched, 2);
    }

    #[tokio::test]
    async fn empty_collection_is_a_normal_cycle() {
        let conn = mem();
        let collectors: Vec<Box<dyn Collector>> = vec![Box::new(Fixture(vec![]))];
        let report = run_cycle(&conn, &settings(30), &collectors).await.unwrap();
        assert_eq!(report.fetched, 0);
        assert_eq!(report.inserted, 0);
    }
}
