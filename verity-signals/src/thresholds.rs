//! Centralized calibration constants for the authenticity decision pipeline.
//!
//! Changing a value here affects BOTH reference matching (in
//! `verity-pipeline/matcher.rs`) and classification (in `classifier.rs`),
//! so they live in one place.

/// Minimum token-set ratio for a reference candidate to count as a match.
/// Below this the matcher returns the "No Match Found" sentinel.
pub const MATCH_THRESHOLD: f64 = 0.40;

/// Upper cap on the unsigned price deviation metric (200%).
pub const PRICE_DEVIATION_CAP: f64 = 2.0;

/// Deviation above which the fallback heuristic applies a red-flag penalty.
pub const HIGH_DEVIATION_THRESHOLD: f64 = 0.5;

/// Neutral similarity returned by adapters on failure or missing input.
pub const NEUTRAL_SIMILARITY: f64 = 0.5;

/// Score band cutoffs: >= HIGHLY_GENUINE_CUTOFF is Highly Genuine,
/// then Likely Genuine, then Suspicious, below SUSPICIOUS_CUTOFF is High Risk.
pub const HIGHLY_GENUINE_CUTOFF: u8 = 80;
pub const LIKELY_GENUINE_CUTOFF: u8 = 65;
pub const SUSPICIOUS_CUTOFF: u8 = 45;

/// Fixed score returned when classification fails entirely.
pub const DEFAULT_FALLBACK_SCORE: u8 = 30;

/// Fixed scores for the missing-data override: trusted domain vs. not.
pub const MISSING_DATA_TRUSTED_SCORE: u8 = 50;
pub const MISSING_DATA_UNTRUSTED_SCORE: u8 = 25;

/// Fixed score for the trusted-domain strong-signal override.
pub const TRUSTED_OVERRIDE_SCORE: u8 = 90;

/// Strong-signal requirements for the trusted-domain override.
pub const TRUSTED_OVERRIDE_MIN_RATING: f64 = 4.0;
pub const TRUSTED_OVERRIDE_MIN_REVIEWS: u32 = 100;
pub const TRUSTED_OVERRIDE_MIN_DESC_LENGTH: usize = 100;
