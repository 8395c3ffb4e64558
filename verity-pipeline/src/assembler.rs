//! Feature assembly: a (candidate, reference-or-sentinel) pair becomes
//! the fixed-order feature vector.

use verity_signals::price_deviation;
use verity_signals::thresholds::NEUTRAL_SIMILARITY;
use verity_signals::FeatureVector;

use crate::adapters::{ImageSimilarity, TextSimilarity};
use crate::types::{parse_price, MatchResult, ProductRecord};

/// Assembles feature vectors from a record and its match result.
///
/// Degradation rules: no reference zeroes the comparison features; a
/// missing image on either side yields the neutral similarity; an
/// unparsable price degrades only `price_deviation` to 0.0. Assembly
/// itself never fails and every output field is finite.
pub struct FeatureAssembler {
    text: Box<dyn TextSimilarity>,
    image: Box<dyn ImageSimilarity>,
}

impl FeatureAssembler {
    pub fn new(text: Box<dyn TextSimilarity>, image: Box<dyn ImageSimilarity>) -> Self {
        Self { text, image }
    }

    pub fn assemble(&self, record: &ProductRecord, match_result: &MatchResult) -> FeatureVector {
        let (text_similarity, image_similarity, deviation, known_seller) =
            match &match_result.reference {
                Some(reference) => {
                    let text_sim = self
                        .text
                        .similarity(&record.title, &reference.title)
                        .clamp(0.0, 1.0);

                    let image_sim = match (record.first_image(), reference.images.first()) {
                        (Some(a), Some(b)) => self.image.similarity(a, b).clamp(0.0, 1.0),
                        _ => NEUTRAL_SIMILARITY,
                    };

                    let deviation = match (parse_price(&record.price), parse_price(&reference.price))
                    {
                        (Some(candidate), Some(reference_price)) => {
                            price_deviation(candidate, &[reference_price])
                        }
                        _ => 0.0,
                    };

                    let known = !record.seller.trim().is_empty()
                        && record
                            .seller
                            .trim()
                            .eq_ignore_ascii_case(reference.seller.trim());

                    (text_sim, image_sim, deviation, if known { 1.0 } else { 0.0 })
                }
                None => (0.0, 0.0, 0.0, 0.0),
            };

        FeatureVector {
            text_similarity,
            image_similarity,
            price_deviation: deviation,
            known_seller,
            num_reviews: record.num_reviews as f64,
            avg_rating: record.avg_rating,
            image_count: record.image_count as f64,
            desc_length: record.desc_length as f64,
            keyword_original: if record.keyword_flags.original { 1.0 } else { 0.0 },
            keyword_replica: if record.keyword_flags.replica { 1.0 } else { 0.0 },
            keyword_genuine: if record.keyword_flags.genuine { 1.0 } else { 0.0 },
        }
        .sanitized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FixedSimilarity, NeutralImageSimilarity, TokenSetTextSimilarity};
    use crate::types::{MatchResult, ReferenceCandidate};
    use verity_signals::FEATURE_COUNT;

    fn sample_record() -> ProductRecord {
        ProductRecord {
            title: "Nike Air Max 90".into(),
            price: "8,999".into(),
            seller: "Nike Official Store".into(),
            description: "Original Nike Air Max 90 with 100% genuine materials".into(),
            images: vec!["https://img.example/candidate.jpg".into()],
            num_reviews: 240,
            avg_rating: 4.4,
            ..ProductRecord::default()
        }
        .finalize()
    }

    fn sample_reference() -> ReferenceCandidate {
        ReferenceCandidate {
            source: "Amazon India".into(),
            title: "Nike Air Max 90 Running Shoes".into(),
            price: "9,999".into(),
            seller: "NIKE OFFICIAL STORE".into(),
            images: vec!["https://img.example/reference.jpg".into()],
            url: "https://amazon.in/airmax90".into(),
        }
    }

    fn assembler() -> FeatureAssembler {
        FeatureAssembler::new(
            Box::new(TokenSetTextSimilarity),
            Box::new(NeutralImageSimilarity),
        )
    }

    #[test]
    fn sentinel_zeroes_comparison_features() {
        let features = assembler().assemble(&sample_record(), &MatchResult::none());
        assert_eq!(features.text_similarity, 0.0);
        assert_eq!(features.image_similarity, 0.0);
        assert_eq!(features.price_deviation, 0.0);
        assert_eq!(features.known_seller, 0.0);
        // Candidate's own attributes still flow through.
        assert_eq!(features.num_reviews, 240.0);
        assert_eq!(features.avg_rating, 4.4);
        assert_eq!(features.image_count, 1.0);
        assert_eq!(features.keyword_original, 1.0);
        assert_eq!(features.keyword_genuine, 1.0);
        assert_eq!(features.keyword_replica, 0.0);
    }

    #[test]
    fn sentinel_assembly_always_finite_with_eleven_fields() {
        let features = assembler().assemble(&ProductRecord::default(), &MatchResult::none());
        let arr = features.as_array();
        assert_eq!(arr.len(), FEATURE_COUNT);
        assert!(arr.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn matched_reference_drives_comparison_features() {
        let result = MatchResult::matched(sample_reference(), 1.0);
        let features = assembler().assemble(&sample_record(), &result);
        assert!((features.text_similarity - 1.0).abs() < 1e-12); // query tokens subset
        assert_eq!(features.image_similarity, 0.5);
        // 8999 vs 9999: |8999 - 9999| / 9999 ~ 0.1
        assert!((features.price_deviation - 0.1).abs() < 0.01);
        assert_eq!(features.known_seller, 1.0); // case-insensitive seller match
    }

    #[test]
    fn seller_mismatch_is_not_known() {
        let mut reference = sample_reference();
        reference.seller = "Gray Market Imports".into();
        let features = assembler().assemble(
            &sample_record(),
            &MatchResult::matched(reference, 1.0),
        );
        assert_eq!(features.known_seller, 0.0);
    }

    #[test]
    fn empty_sellers_are_not_known() {
        let mut record = sample_record();
        record.seller = String::new();
        let mut reference = sample_reference();
        reference.seller = String::new();
        let features = assembler().assemble(&record, &MatchResult::matched(reference, 1.0));
        assert_eq!(features.known_seller, 0.0);
    }

    #[test]
    fn missing_image_yields_neutral_similarity() {
        let mut record = sample_record();
        record.images.clear();
        let record = record.finalize();
        // FixedSimilarity(0.9) would be consulted if both images existed.
        let assembler = FeatureAssembler::new(
            Box::new(TokenSetTextSimilarity),
            Box::new(FixedSimilarity(0.9)),
        );
        let features = assembler.assemble(&record, &MatchResult::matched(sample_reference(), 1.0));
        assert_eq!(features.image_similarity, 0.5);
    }

    #[test]
    fn unparsable_price_degrades_only_deviation() {
        let mut record = sample_record();
        record.price = "Price on request".into();
        let features = assembler().assemble(&record, &MatchResult::matched(sample_reference(), 1.0));
        assert_eq!(features.price_deviation, 0.0);
        assert!(features.text_similarity > 0.0); // other fields unaffected
    }
}
