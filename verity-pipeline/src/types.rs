use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use verity_signals::{FeatureVector, Verdict};

// ---------------------------------------------------------------------------
// Candidate listing
// ---------------------------------------------------------------------------

/// Fixed suspicious/reassuring keyword vocabulary scanned in descriptions.
pub const KEYWORD_VOCABULARY: [&str; 3] = ["original", "replica", "100% genuine"];

/// Presence flags for the fixed keyword vocabulary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordFlags {
    pub original: bool,
    pub replica: bool,
    pub genuine: bool,
}

impl KeywordFlags {
    /// Scan a description for the vocabulary, case-insensitively.
    pub fn scan(text: &str) -> Self {
        let lower = text.to_lowercase();
        Self {
            original: lower.contains("original"),
            replica: lower.contains("replica"),
            genuine: lower.contains("100% genuine"),
        }
    }
}

/// One extracted product listing, the immutable input to an analysis.
///
/// Replaces the per-site duck-typed records of the original scraper with
/// a single shape every extractor must produce. The derived fields
/// (`image_count`, `desc_length`, `keyword_flags`) are recomputed by
/// [`ProductRecord::finalize`] so hand-written JSON inputs stay honest.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductRecord {
    pub title: String,
    /// Raw price text as scraped; may be unparsable.
    pub price: String,
    pub seller: String,
    pub description: String,
    pub images: Vec<String>,
    pub num_reviews: u32,
    pub avg_rating: f64,
    pub image_count: usize,
    pub desc_length: usize,
    pub keyword_flags: KeywordFlags,
    pub scraping_error: bool,
    pub scraping_error_message: Option<String>,
}

impl ProductRecord {
    /// Recompute the fields derived from the raw attributes.
    pub fn finalize(mut self) -> Self {
        self.image_count = self.images.len();
        self.desc_length = self.description.chars().count();
        self.keyword_flags = KeywordFlags::scan(&self.description);
        self
    }

    /// True when the extractor produced no usable listing content at all.
    pub fn is_empty_extraction(&self) -> bool {
        self.num_reviews == 0
            && self.avg_rating == 0.0
            && self.desc_length == 0
            && self.image_count == 0
    }

    pub fn first_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Parse scraped price text into a number.
///
/// Currency symbols, grouping commas, and whitespace are stripped before
/// parsing; anything that still fails to parse (or parses non-positive)
/// yields `None` and the caller degrades that single field.
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Some(v),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Reference listings
// ---------------------------------------------------------------------------

/// A listing found on a trusted marketplace, used as the comparison
/// reference. Transient: the pool is discarded after match selection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceCandidate {
    /// Marketplace identifier, e.g. "Amazon India".
    pub source: String,
    pub title: String,
    pub price: String,
    pub seller: String,
    pub images: Vec<String>,
    pub url: String,
}

/// Source label carried by the sentinel "no reference found" result.
pub const NO_MATCH_SOURCE: &str = "No Match Found";

/// The selected reference plus fuzzy confidence, or the sentinel.
///
/// Invariant (enforced by the matcher): `reference` is `Some` only when
/// `confidence` reached the configured match threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult {
    pub reference: Option<ReferenceCandidate>,
    pub confidence: f64,
}

impl MatchResult {
    pub fn matched(reference: ReferenceCandidate, confidence: f64) -> Self {
        Self {
            reference: Some(reference),
            confidence,
        }
    }

    /// The sentinel: no usable reference, confidence 0.0.
    pub fn none() -> Self {
        Self {
            reference: None,
            confidence: 0.0,
        }
    }

    pub fn is_match(&self) -> bool {
        self.reference.is_some()
    }

    pub fn source(&self) -> &str {
        self.reference
            .as_ref()
            .map(|r| r.source.as_str())
            .unwrap_or(NO_MATCH_SOURCE)
    }
}

// ---------------------------------------------------------------------------
// Analysis request / report
// ---------------------------------------------------------------------------

/// One analysis request: the listing URL plus its extracted record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub url: String,
    pub record: ProductRecord,
}

/// Final decision output for the boundary layer.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisReport {
    pub verdict: Verdict,
    pub authenticity_score: u8,
    /// Human-readable display values (percentage strings, raw counts).
    pub details: BTreeMap<String, String>,
    pub recommendation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub reference_source: String,
    pub features: FeatureVector,
    /// RFC 3339 analysis timestamp.
    pub analyzed_at: String,
}
