//! Reference matching: pool gathering and best-match selection.

use verity_signals::thresholds::MATCH_THRESHOLD;
use verity_signals::token_set_ratio;

use crate::source::ReferenceSource;
use crate::types::{MatchResult, ReferenceCandidate};

/// Selects the single best reference for a candidate title.
///
/// Deterministic and side-effect-free: every candidate title is scored
/// with the token-set ratio, the strictly highest score wins (first-seen
/// wins exact ties), and anything below the threshold collapses to the
/// sentinel.
pub struct ReferenceMatcher {
    pub threshold: f64,
}

impl Default for ReferenceMatcher {
    fn default() -> Self {
        Self {
            threshold: MATCH_THRESHOLD,
        }
    }
}

impl ReferenceMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Pick the best candidate from the pool, or the sentinel.
    pub fn select(&self, query: &str, pool: &[ReferenceCandidate]) -> MatchResult {
        let mut best_score = 0.0_f64;
        let mut best: Option<&ReferenceCandidate> = None;

        for candidate in pool {
            let score = token_set_ratio(query, &candidate.title);
            // Strict comparison keeps the first-seen candidate on ties;
            // NaN can never displace a real score.
            if score > best_score {
                best_score = score;
                best = Some(candidate);
            }
        }

        match best {
            Some(candidate) if best_score >= self.threshold => {
                MatchResult::matched(candidate.clone(), best_score)
            }
            _ => MatchResult::none(),
        }
    }

    /// Query every enabled source and pool the results.
    ///
    /// A failing source is logged and skipped so one flaky marketplace
    /// never empties the pool.
    pub async fn gather(
        &self,
        query: &str,
        sources: &[Box<dyn ReferenceSource>],
    ) -> Vec<ReferenceCandidate> {
        let mut pool = Vec::new();
        for source in sources {
            if !source.enable(query) {
                log::debug!("source {} disabled for query '{}'", source.name(), query);
                continue;
            }
            match source.search(query).await {
                Ok(mut candidates) => {
                    log::info!(
                        "source {} returned {} candidates for '{}'",
                        source.name(),
                        candidates.len(),
                        query
                    );
                    pool.append(&mut candidates);
                }
                Err(e) => {
                    log::warn!("source {} search failed: {}", source.name(), e);
                }
            }
        }
        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    fn reference(source: &str, title: &str) -> ReferenceCandidate {
        ReferenceCandidate {
            source: source.into(),
            title: title.into(),
            ..ReferenceCandidate::default()
        }
    }

    #[test]
    fn empty_pool_yields_sentinel() {
        let matcher = ReferenceMatcher::default();
        let result = matcher.select("Nike Air Max 90", &[]);
        assert!(!result.is_match());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn empty_query_yields_sentinel() {
        let matcher = ReferenceMatcher::default();
        let pool = vec![reference("Amazon India", "Nike Air Max 90")];
        assert!(!matcher.select("", &pool).is_match());
    }

    #[test]
    fn exact_title_matches_with_full_confidence() {
        let matcher = ReferenceMatcher::default();
        let pool = vec![
            reference("Amazon India", "Adidas Ultraboost 22"),
            reference("Flipkart", "Nike Air Max 90"),
        ];
        let result = matcher.select("Nike Air Max 90", &pool);
        assert!(result.is_match());
        assert!((result.confidence - 1.0).abs() < 1e-12);
        assert_eq!(result.source(), "Flipkart");
    }

    #[test]
    fn below_threshold_yields_sentinel() {
        let matcher = ReferenceMatcher::default();
        let pool = vec![reference("Amazon India", "Stainless Steel Water Bottle")];
        let result = matcher.select("Nike Air Max 90", &pool);
        assert!(!result.is_match());
    }

    #[test]
    fn first_seen_wins_exact_ties() {
        let matcher = ReferenceMatcher::default();
        let pool = vec![
            reference("Amazon India", "Nike Air Max 90"),
            reference("Snapdeal", "Nike Air Max 90"),
        ];
        let result = matcher.select("Nike Air Max 90", &pool);
        assert_eq!(result.source(), "Amazon India");
    }

    #[test]
    fn non_sentinel_confidence_meets_threshold() {
        let matcher = ReferenceMatcher::default();
        let pool = vec![
            reference("Amazon India", "Nike Air Max 90 Running Shoes"),
            reference("Flipkart", "Garden Hose 20m"),
        ];
        let result = matcher.select("Nike Air Max 90", &pool);
        if result.is_match() {
            assert!(result.confidence >= matcher.threshold);
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ReferenceSource for FailingSource {
        async fn search(&self, _query: &str) -> Result<Vec<ReferenceCandidate>, String> {
            Err("marketplace timeout".into())
        }
    }

    struct FixedSource(Vec<ReferenceCandidate>);

    #[async_trait]
    impl ReferenceSource for FixedSource {
        async fn search(&self, _query: &str) -> Result<Vec<ReferenceCandidate>, String> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn gather_skips_failing_sources() {
        let matcher = ReferenceMatcher::default();
        let sources: Vec<Box<dyn ReferenceSource>> = vec![
            Box::new(FailingSource),
            Box::new(FixedSource(vec![reference("Flipkart", "Nike Air Max 90")])),
        ];
        let pool = matcher.gather("Nike Air Max 90", &sources).await;
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].source, "Flipkart");
    }
}
