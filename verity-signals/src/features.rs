//! The fixed-order feature vector consumed by the classifier.
//!
//! Order is load-bearing: a trained model consumes positions, not names.
//! `FEATURE_NAMES` and [`FeatureVector::as_array`] must stay in lockstep
//! with the training column order.

use serde::Serialize;

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 11;

/// Feature names in classifier input order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "text_similarity",
    "image_similarity",
    "price_deviation",
    "known_seller",
    "num_reviews",
    "avg_rating",
    "image_count",
    "desc_length",
    "keyword_original",
    "keyword_replica",
    "keyword_genuine",
];

/// Normalized signal vector for one candidate listing.
///
/// Boolean signals (`known_seller`, keyword flags) are encoded 0.0/1.0;
/// counts are carried raw and normalized inside the fallback heuristic.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FeatureVector {
    pub text_similarity: f64,
    pub image_similarity: f64,
    pub price_deviation: f64,
    pub known_seller: f64,
    pub num_reviews: f64,
    pub avg_rating: f64,
    pub image_count: f64,
    pub desc_length: f64,
    pub keyword_original: f64,
    pub keyword_replica: f64,
    pub keyword_genuine: f64,
}

impl FeatureVector {
    /// Flatten to the fixed classifier input order.
    pub fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.text_similarity,
            self.image_similarity,
            self.price_deviation,
            self.known_seller,
            self.num_reviews,
            self.avg_rating,
            self.image_count,
            self.desc_length,
            self.keyword_original,
            self.keyword_replica,
            self.keyword_genuine,
        ]
    }

    /// Replace any non-finite field with 0.0.
    ///
    /// Upstream degradation rules should already guarantee finiteness;
    /// this is the last line before numbers reach a model.
    pub fn sanitized(&self) -> FeatureVector {
        fn finite(v: f64) -> f64 {
            if v.is_finite() {
                v
            } else {
                0.0
            }
        }
        FeatureVector {
            text_similarity: finite(self.text_similarity),
            image_similarity: finite(self.image_similarity),
            price_deviation: finite(self.price_deviation),
            known_seller: finite(self.known_seller),
            num_reviews: finite(self.num_reviews),
            avg_rating: finite(self.avg_rating),
            image_count: finite(self.image_count),
            desc_length: finite(self.desc_length),
            keyword_original: finite(self.keyword_original),
            keyword_replica: finite(self.keyword_replica),
            keyword_genuine: finite(self.keyword_genuine),
        }
    }

    /// True when every field is finite.
    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite())
    }
}
