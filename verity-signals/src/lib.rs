pub mod classifier;
pub mod features;
pub mod model;
pub mod price;
pub mod similarity;
pub mod thresholds;

pub use classifier::{
    heuristic_score, verdict_for_score, AuthenticityClassifier, Classification, Verdict,
};
pub use features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use model::{LogisticModel, ModelError, ProbabilityModel};
pub use price::{price_deviation, price_stats, PriceStats};
pub use similarity::token_set_ratio;
