use tracing::warn;

use super::justjoinit::JustJoinIt;
use super::Collector;
use crate::model::Source;

/// Sources that have a working collector.
pub const REGISTERED: &[Source] = &[Source::JustJoinIt];

/// Collectors for the configured source ids, in order. Ids without a
/// collector are skipped with a warning.
pub fn collectors(sources: &[String]) -> Vec<Box<dyn Collector>> {
    sources
        .iter()
        .filter_map(|id| match id.parse::<Source>() {
            Ok(Source::JustJoinIt) => Some(Box::new(JustJoinIt::from_env()) as Box<dyn Collector>),
            Ok(other) => {
                warn!(source = %other, "No collector registered, skipping");
                None
            }
            Err(e) => {
                warn!("Skipping {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn known_source_has_collector() {
        let got = collectors(&ids(&["justjoinit"]));
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].source(), Source::JustJoinIt);
    }

    #[test]
    fn unknown_and_unbacked_sources_skipped() {
        let got = collectors(&ids(&["pracuj", "theprotocol", "JustJoinIt", ""]));
        let sources: Vec<Source> = got.iter().map(|c| c.source()).collect();
        assert_eq!(sources, vec![Source::JustJoinIt]);
    }

    #[test]
    fn every_registered_source_builds() {
        for src in REGISTERED {
            assert_eq!(collectors(&[src.as_str().to_string()]).len(), 1);
        }
    }
}
