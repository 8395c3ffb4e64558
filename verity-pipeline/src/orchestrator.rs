//! Decision orchestration: extraction record in, final report out.
//!
//! Sequences reference matching, feature assembly, and classification,
//! then applies the override rules in fixed precedence:
//!
//! 1. scraping error → terminal "cannot analyze" report, score 0
//! 2. empty extraction → fixed 50 (trusted domain) / 25 (otherwise)
//! 3. trusted domain with strong signals → Likely Genuine, fixed 90
//! 4. everything else → the classifier's output verbatim
//!
//! Later rules never override an earlier hard default.

use std::collections::BTreeMap;

use chrono::Utc;

use verity_signals::thresholds::{
    MISSING_DATA_TRUSTED_SCORE, MISSING_DATA_UNTRUSTED_SCORE, TRUSTED_OVERRIDE_MIN_DESC_LENGTH,
    TRUSTED_OVERRIDE_MIN_RATING, TRUSTED_OVERRIDE_MIN_REVIEWS, TRUSTED_OVERRIDE_SCORE,
};
use verity_signals::{AuthenticityClassifier, FeatureVector, Verdict};

use crate::assembler::FeatureAssembler;
use crate::matcher::ReferenceMatcher;
use crate::source::ReferenceSource;
use crate::types::{AnalysisReport, AnalysisRequest, MatchResult, ProductRecord};

/// Marketplace domains pre-classified as reliable.
///
/// A deployment passes its own list to the orchestrator; this default
/// covers the marketplaces the stock catalogs are built from.
pub const DEFAULT_TRUSTED_DOMAINS: [&str; 13] = [
    "amazon.com",
    "amazon.in",
    "flipkart.com",
    "tatacliq.com",
    "reliancedigital.in",
    "snapdeal.com",
    "myntra.com",
    "nykaa.com",
    "adidas.co.in",
    "nike.com",
    "puma.com",
    "reebok.in",
    "ajio.com",
];

const SCRAPING_ERROR_RECOMMENDATION: &str =
    "Could not extract product details. Please review manually.";
const MISSING_DATA_UNTRUSTED_RECOMMENDATION: &str =
    "Could not extract product details. Avoid purchasing.";
const TRUSTED_SOURCE_NOTE: &str =
    "This product is from a trusted source, but the authenticity is still analyzed.";

/// The full decision pipeline with its injected collaborators.
pub struct DecisionOrchestrator {
    sources: Vec<Box<dyn ReferenceSource>>,
    matcher: ReferenceMatcher,
    assembler: FeatureAssembler,
    classifier: AuthenticityClassifier,
    trusted_domains: Vec<String>,
}

impl DecisionOrchestrator {
    pub fn new(
        sources: Vec<Box<dyn ReferenceSource>>,
        matcher: ReferenceMatcher,
        assembler: FeatureAssembler,
        classifier: AuthenticityClassifier,
        trusted_domains: Vec<String>,
    ) -> Self {
        Self {
            sources,
            matcher,
            assembler,
            classifier,
            trusted_domains,
        }
    }

    fn is_trusted(&self, url: &str) -> bool {
        let url = url.to_lowercase();
        self.trusted_domains.iter().any(|d| url.contains(d.as_str()))
    }

    /// Run one analysis end to end. Never fails: every input produces a
    /// defined report.
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisReport {
        let record = &request.record;
        let trusted = self.is_trusted(&request.url);

        // Rule 1: extraction failed; nothing downstream can help.
        if record.scraping_error {
            log::warn!(
                "scraping error for {}: {}",
                request.url,
                record.scraping_error_message.as_deref().unwrap_or("unknown")
            );
            let recommendation = record
                .scraping_error_message
                .clone()
                .unwrap_or_else(|| SCRAPING_ERROR_RECOMMENDATION.to_string());
            return self.report(
                record,
                Verdict::NeedsReview,
                0,
                FeatureVector::default(),
                "N/A",
                recommendation,
                trusted,
            );
        }

        // Rule 2: the extractor returned a shell of a listing. A hard
        // default beats anything the classifier would infer from zeros.
        if record.is_empty_extraction() {
            log::info!("empty extraction for {}; applying fixed default", request.url);
            let features = self.assembler.assemble(record, &MatchResult::none());
            let (verdict, score, recommendation) = if trusted {
                (
                    Verdict::NeedsReview,
                    MISSING_DATA_TRUSTED_SCORE,
                    SCRAPING_ERROR_RECOMMENDATION.to_string(),
                )
            } else {
                (
                    Verdict::HighRisk,
                    MISSING_DATA_UNTRUSTED_SCORE,
                    MISSING_DATA_UNTRUSTED_RECOMMENDATION.to_string(),
                )
            };
            return self.report(record, verdict, score, features, "N/A", recommendation, trusted);
        }

        // Normal path: pool, match, assemble.
        let pool = self.matcher.gather(&record.title, &self.sources).await;
        let match_result = self.matcher.select(&record.title, &pool);
        log::info!(
            "matched '{}' against {} candidates: source={} confidence={:.2}",
            record.title,
            pool.len(),
            match_result.source(),
            match_result.confidence
        );
        let features = self.assembler.assemble(record, &match_result);
        let reference_source = match &match_result.reference {
            Some(r) => r.source.clone(),
            None => "N/A".to_string(),
        };

        // Rule 3: trusted domain with strong positive signals.
        if trusted
            && record.avg_rating >= TRUSTED_OVERRIDE_MIN_RATING
            && record.num_reviews > TRUSTED_OVERRIDE_MIN_REVIEWS
            && record.desc_length > TRUSTED_OVERRIDE_MIN_DESC_LENGTH
        {
            log::info!("trusted-domain override for {}", request.url);
            return self.report(
                record,
                Verdict::LikelyGenuine,
                TRUSTED_OVERRIDE_SCORE,
                features,
                &reference_source,
                recommendation_for(Verdict::LikelyGenuine),
                trusted,
            );
        }

        // Rule 4: classify.
        let classification = self.classifier.classify(&features);
        log::info!(
            "classified {}: score={} verdict={}",
            request.url,
            classification.score,
            classification.verdict
        );
        self.report(
            record,
            classification.verdict,
            classification.score,
            features,
            &reference_source,
            recommendation_for(classification.verdict),
            trusted,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn report(
        &self,
        record: &ProductRecord,
        verdict: Verdict,
        score: u8,
        features: FeatureVector,
        reference_source: &str,
        recommendation: String,
        trusted: bool,
    ) -> AnalysisReport {
        AnalysisReport {
            verdict,
            authenticity_score: score,
            details: build_details(record, &features, reference_source),
            recommendation,
            note: trusted.then(|| TRUSTED_SOURCE_NOTE.to_string()),
            reference_source: reference_source.to_string(),
            features,
            analyzed_at: Utc::now().to_rfc3339(),
        }
    }
}

fn recommendation_for(verdict: Verdict) -> String {
    match verdict {
        Verdict::HighlyGenuine | Verdict::LikelyGenuine => {
            "Safe to buy from trusted source.".to_string()
        }
        Verdict::NeedsReview => "Review details carefully.".to_string(),
        Verdict::Suspicious | Verdict::HighRisk => "Avoid purchasing.".to_string(),
    }
}

fn percent(value: f64) -> String {
    format!("{}%", (value * 100.0).round() as i64)
}

/// Human-readable display values. Keys are presentation labels; the
/// feature vector on the report carries the raw numbers.
fn build_details(
    record: &ProductRecord,
    features: &FeatureVector,
    reference_source: &str,
) -> BTreeMap<String, String> {
    let display = |s: &str| {
        if s.is_empty() {
            "N/A".to_string()
        } else {
            s.to_string()
        }
    };

    let mut details = BTreeMap::new();
    details.insert("Product Title".into(), display(&record.title));
    details.insert("Product Price".into(), display(&record.price));
    details.insert("Seller".into(), display(&record.seller));
    details.insert("Title Similarity".into(), percent(features.text_similarity));
    details.insert("Image Similarity".into(), percent(features.image_similarity));
    details.insert("Price Deviation".into(), percent(features.price_deviation));
    details.insert("Reference Source".into(), reference_source.to_string());
    details.insert("Num Reviews".into(), record.num_reviews.to_string());
    details.insert("Avg Rating".into(), format!("{:.1}", record.avg_rating));
    details.insert("Image Count".into(), record.image_count.to_string());
    details.insert("Description Length".into(), record.desc_length.to_string());
    details.insert(
        "Keyword: Original".into(),
        u8::from(record.keyword_flags.original).to_string(),
    );
    details.insert(
        "Keyword: Replica".into(),
        u8::from(record.keyword_flags.replica).to_string(),
    );
    details.insert(
        "Keyword: 100% Genuine".into(),
        u8::from(record.keyword_flags.genuine).to_string(),
    );
    details
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trusted_domain_matching_is_substring_based() {
        let orchestrator = DecisionOrchestrator::new(
            Vec::new(),
            ReferenceMatcher::default(),
            FeatureAssembler::new(
                Box::new(crate::adapters::TokenSetTextSimilarity),
                Box::new(crate::adapters::NeutralImageSimilarity),
            ),
            AuthenticityClassifier::heuristic_only(),
            DEFAULT_TRUSTED_DOMAINS.iter().map(|s| s.to_string()).collect(),
        );
        assert!(orchestrator.is_trusted("https://www.amazon.in/dp/B0AIRMAX90"));
        assert!(orchestrator.is_trusted("HTTPS://WWW.NIKE.COM/shoe"));
        assert!(!orchestrator.is_trusted("https://cheap-kicks.example/airmax"));
    }

    #[test]
    fn recommendations_follow_verdicts() {
        assert_eq!(
            recommendation_for(Verdict::LikelyGenuine),
            "Safe to buy from trusted source."
        );
        assert_eq!(recommendation_for(Verdict::HighRisk), "Avoid purchasing.");
        assert_eq!(
            recommendation_for(Verdict::NeedsReview),
            "Review details carefully."
        );
    }

    #[test]
    fn details_carry_percentage_strings() {
        let record = ProductRecord {
            title: "Nike Air Max 90".into(),
            num_reviews: 12,
            ..ProductRecord::default()
        };
        let features = FeatureVector {
            text_similarity: 0.87,
            ..FeatureVector::default()
        };
        let details = build_details(&record, &features, "Amazon India");
        assert_eq!(details["Title Similarity"], "87%");
        assert_eq!(details["Num Reviews"], "12");
        assert_eq!(details["Reference Source"], "Amazon India");
        assert_eq!(details["Product Price"], "N/A");
    }
}
