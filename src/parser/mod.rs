pub mod card;
pub mod classify;
pub mod salary;
pub mod slug;

use chrono::Utc;

use crate::collector::RawListing;
use crate::model::{parse_offer_url, InvalidOffer, JobOffer, Source, DEFAULT_CURRENCY};

/// Card text → extracted fields → validated offer.
pub fn to_job_offer(source: Source, listing: &RawListing) -> Result<JobOffer, InvalidOffer> {
    let offer_url = parse_offer_url(&listing.url)?;
    let fields = card::extract_fields(&listing.url, &listing.lines);

    let offer = JobOffer {
        source,
        external_id: fields.external_id,
        title: fields.title,
        company: fields.company,
        city: fields.city,
        workplace_type: fields.workplace_type,
        employment_type: fields.employment_type,
        salary_min_pln: fields.salary_min_pln,
        salary_max_pln: fields.salary_max_pln,
        currency: Some(DEFAULT_CURRENCY.to_string()),
        skills: fields.skills,
        offer_url,
        published_at: None,
        scraped_at: Utc::now(),
    };
    offer.validate()?;
    Ok(offer)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{WorkplaceType, UNKNOWN_COMPANY};

    fn listing(url: &str, lines: &[&str]) -> RawListing {
        RawListing {
            url: url.to_string(),
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn builds_offer_from_card() {
        let l = listing(
            "https://justjoin.it/job-offer/acme-rust-dev",
            &["Rust Dev", "12 000 - 18 000 PLN/month", "Acme", "Remote", "Rust"],
        );
        let o = to_job_offer(Source::JustJoinIt, &l).unwrap();
        assert_eq!(o.source, Source::JustJoinIt);
        assert_eq!(o.external_id, "acme-rust-dev");
        assert_eq!(o.salary_min_pln, Some(12_000));
        assert_eq!(o.salary_max_pln, Some(18_000));
        assert_eq!(o.employment_type.as_deref(), Some("permanent"));
        assert_eq!(o.workplace_type, WorkplaceType::Remote);
        assert_eq!(o.currency.as_deref(), Some("PLN"));
        assert_eq!(o.offer_url.as_str(), "https://justjoin.it/job-offer/acme-rust-dev");
        assert!(o.published_at.is_none());
    }

    #[test]
    fn degraded_offer_is_still_valid() {
        let l = listing("https://justjoin.it/job-offer/senior-python-dev", &[]);
        let o = to_job_offer(Source::JustJoinIt, &l).unwrap();
        assert_eq!(o.title, "Senior Python Dev");
        assert_eq!(o.company, UNKNOWN_COMPANY);
        assert_eq!(o.city, None);
        assert_eq!(o.salary_min_pln, None);
        assert_eq!(o.salary_max_pln, None);
        assert_eq!(o.employment_type, None);
        assert!(o.skills.is_empty());
    }

    #[test]
    fn relative_url_dropped() {
        let l = listing("/job-offer/acme-rust-dev", &["Rust Dev", "Acme"]);
        assert!(matches!(to_job_offer(Source::JustJoinIt, &l), Err(InvalidOffer::Url(_))));
    }
}
