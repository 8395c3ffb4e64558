//! Similarity adapter seams.
//!
//! Text and image similarity are black-box collaborators to the decision
//! core: they return a value in [0, 1] or the neutral 0.5 when input is
//! missing or the underlying comparison fails. Missing input maps to
//! 0.5, not 0.0: absence of an image is no evidence either way.

use verity_signals::thresholds::NEUTRAL_SIMILARITY;
use verity_signals::token_set_ratio;

/// Black-box text similarity between two titles, in [0, 1].
pub trait TextSimilarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

/// Black-box image similarity between two image URLs, in [0, 1].
pub trait ImageSimilarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

/// Token-set text similarity, the default production adapter.
#[derive(Default)]
pub struct TokenSetTextSimilarity;

impl TextSimilarity for TokenSetTextSimilarity {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        if a.trim().is_empty() || b.trim().is_empty() {
            return NEUTRAL_SIMILARITY;
        }
        token_set_ratio(a, b).clamp(0.0, 1.0)
    }
}

/// Image similarity stand-in that always reports the neutral value.
///
/// Perceptual hashing lives outside this core; deployments plug their
/// own adapter in. Returning the neutral value keeps image similarity
/// from tipping the verdict either way when no comparator is wired up.
#[derive(Default)]
pub struct NeutralImageSimilarity;

impl ImageSimilarity for NeutralImageSimilarity {
    fn similarity(&self, _a: &str, _b: &str) -> f64 {
        NEUTRAL_SIMILARITY
    }
}

/// Test double returning a fixed similarity for any input.
pub struct FixedSimilarity(pub f64);

impl TextSimilarity for FixedSimilarity {
    fn similarity(&self, _a: &str, _b: &str) -> f64 {
        self.0
    }
}

impl ImageSimilarity for FixedSimilarity {
    fn similarity(&self, _a: &str, _b: &str) -> f64 {
        self.0
    }
}
