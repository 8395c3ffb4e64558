//! Authenticity classification: feature vector in, bounded score and
//! discrete verdict out.
//!
//! The trained model path is preferred when a model is loaded; the
//! deterministic heuristic below is always available and takes over on
//! any model failure. Classification never propagates an error: every
//! input produces a defined `(score, verdict)` pair.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::features::FeatureVector;
use crate::model::ProbabilityModel;
use crate::thresholds::{
    DEFAULT_FALLBACK_SCORE, HIGHLY_GENUINE_CUTOFF, HIGH_DEVIATION_THRESHOLD,
    LIKELY_GENUINE_CUTOFF, SUSPICIOUS_CUTOFF,
};

/// Discrete authenticity verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Verdict {
    #[serde(rename = "Highly Genuine")]
    HighlyGenuine,
    #[serde(rename = "Likely Genuine")]
    LikelyGenuine,
    #[serde(rename = "Suspicious")]
    Suspicious,
    #[serde(rename = "High Risk")]
    HighRisk,
    /// Reserved for orchestrator overrides (missing or unextractable
    /// data); never produced by score banding.
    #[serde(rename = "Needs Review")]
    NeedsReview,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::HighlyGenuine => write!(f, "Highly Genuine"),
            Verdict::LikelyGenuine => write!(f, "Likely Genuine"),
            Verdict::Suspicious => write!(f, "Suspicious"),
            Verdict::HighRisk => write!(f, "High Risk"),
            Verdict::NeedsReview => write!(f, "Needs Review"),
        }
    }
}

/// Map a 0–100 score to its verdict band. Applied identically on the
/// model path and the heuristic path.
pub fn verdict_for_score(score: u8) -> Verdict {
    if score >= HIGHLY_GENUINE_CUTOFF {
        Verdict::HighlyGenuine
    } else if score >= LIKELY_GENUINE_CUTOFF {
        Verdict::LikelyGenuine
    } else if score >= SUSPICIOUS_CUTOFF {
        Verdict::Suspicious
    } else {
        Verdict::HighRisk
    }
}

/// Result of one classification.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Classification {
    pub score: u8,
    pub verdict: Verdict,
}

impl Classification {
    fn from_score(score: u8) -> Self {
        Self {
            score: score.min(100),
            verdict: verdict_for_score(score.min(100)),
        }
    }

    /// Fixed low-confidence default used when both paths are unusable.
    pub fn low_confidence() -> Self {
        Self {
            score: DEFAULT_FALLBACK_SCORE,
            verdict: Verdict::HighRisk,
        }
    }
}

/// Deterministic fallback heuristic: a weighted positive score minus
/// red-flag penalties, clamped to [0, 100].
///
/// Positive weights sum to 110, so a flawless listing can still reach
/// the top of the range after minor penalties. Counts are normalized
/// before weighting: reviews against 100, rating against 5, images
/// against 5, description length against 500 characters.
pub fn heuristic_score(features: &FeatureVector) -> u8 {
    let f = features.sanitized();

    let review_term = (f.num_reviews / 100.0).clamp(0.0, 1.0);
    let rating_term = (f.avg_rating / 5.0).clamp(0.0, 1.0);
    let image_term = (f.image_count / 5.0).clamp(0.0, 1.0);
    let desc_term = (f.desc_length / 500.0).clamp(0.0, 1.0);
    let deviation = f.price_deviation.clamp(0.0, 2.0);
    let price_term = 1.0 - deviation.min(1.0);

    let mut score = f.text_similarity.clamp(0.0, 1.0) * 25.0
        + f.image_similarity.clamp(0.0, 1.0) * 20.0
        + price_term * 15.0
        + f.known_seller.clamp(0.0, 1.0) * 15.0
        + review_term * 10.0
        + rating_term * 10.0
        + image_term * 5.0
        + desc_term * 5.0
        + f.keyword_genuine.clamp(0.0, 1.0) * 10.0
        + f.keyword_original.clamp(0.0, 1.0) * 5.0;

    // Red flags.
    if f.keyword_replica > 0.5 {
        score -= 30.0;
    }
    if deviation > HIGH_DEVIATION_THRESHOLD {
        score -= 20.0;
    }
    if f.avg_rating < 2.0 && f.num_reviews > 10.0 {
        score -= 15.0;
    }
    if f.image_count < 2.0 {
        score -= 10.0;
    }
    if f.desc_length < 50.0 {
        score -= 10.0;
    }

    if !score.is_finite() {
        return DEFAULT_FALLBACK_SCORE;
    }
    score.clamp(0.0, 100.0).round() as u8
}

/// Classifier facade holding the optionally loaded model.
///
/// The model is read-only after construction and shared across
/// concurrent analyses without synchronization.
#[derive(Default)]
pub struct AuthenticityClassifier {
    model: Option<Arc<dyn ProbabilityModel>>,
}

impl AuthenticityClassifier {
    /// Heuristic-only classifier.
    pub fn heuristic_only() -> Self {
        Self { model: None }
    }

    /// Classifier preferring the given trained model.
    pub fn with_model(model: Arc<dyn ProbabilityModel>) -> Self {
        Self { model: Some(model) }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Classify a feature vector into a bounded score and verdict.
    pub fn classify(&self, features: &FeatureVector) -> Classification {
        let clean = features.sanitized();

        if let Some(model) = &self.model {
            match model.predict_genuine(&clean.as_array()) {
                Ok(p) if p.is_finite() => {
                    let score = (p.clamp(0.0, 1.0) * 100.0).round() as u8;
                    return Classification::from_score(score);
                }
                Ok(p) => {
                    log::warn!(
                        "model {} returned non-finite probability {}; using fallback heuristic",
                        model.name(),
                        p
                    );
                }
                Err(e) => {
                    log::warn!(
                        "model {} failed: {}; using fallback heuristic",
                        model.name(),
                        e
                    );
                }
            }
        }

        Classification::from_score(heuristic_score(&clean))
    }
}
