//! Trained probability models for the genuine/fake decision.
//!
//! The classifier treats a model as a black box producing the probability
//! of the "genuine" class. Models are loaded once at startup, are
//! read-only afterwards, and may be shared across concurrent analyses.

use ndarray::Array1;
use serde::Deserialize;
use thiserror::Error;

use crate::features::FEATURE_COUNT;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to read model file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse model weights: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model expects {expected} weights, file has {got}")]
    Shape { expected: usize, got: usize },

    #[error("Model produced a non-finite probability")]
    NonFiniteOutput,
}

/// A scorer mapping the fixed-order feature array to P(genuine) in [0, 1].
pub trait ProbabilityModel: Send + Sync {
    fn predict_genuine(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64, ModelError>;

    /// Stable name for logging.
    fn name(&self) -> &str {
        "ProbabilityModel"
    }
}

/// On-disk weight format: `{"weights": [... 11 values ...], "bias": b}`.
#[derive(Debug, Deserialize)]
struct LogisticWeights {
    weights: Vec<f64>,
    bias: f64,
}

/// Logistic regression over the 11-feature vector.
///
/// Stands in for the original deployment's externally trained classifier;
/// weights are exported to JSON and evaluated as `sigmoid(w · x + b)`.
pub struct LogisticModel {
    weights: Array1<f64>,
    bias: f64,
}

impl LogisticModel {
    pub fn new(weights: [f64; FEATURE_COUNT], bias: f64) -> Self {
        Self {
            weights: Array1::from_iter(weights),
            bias,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let parsed: LogisticWeights = serde_json::from_str(json)?;
        if parsed.weights.len() != FEATURE_COUNT {
            return Err(ModelError::Shape {
                expected: FEATURE_COUNT,
                got: parsed.weights.len(),
            });
        }
        Ok(Self {
            weights: Array1::from_vec(parsed.weights),
            bias: parsed.bias,
        })
    }

    pub fn from_json_file(path: &str) -> Result<Self, ModelError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

impl ProbabilityModel for LogisticModel {
    fn predict_genuine(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64, ModelError> {
        let x = Array1::from_iter(features.iter().copied());
        let z = self.weights.dot(&x) + self.bias;
        let p = 1.0 / (1.0 + (-z).exp());
        if !p.is_finite() {
            return Err(ModelError::NonFiniteOutput);
        }
        Ok(p.clamp(0.0, 1.0))
    }

    fn name(&self) -> &str {
        "LogisticModel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_weights_predict_half() {
        let model = LogisticModel::new([0.0; FEATURE_COUNT], 0.0);
        let p = model.predict_genuine(&[0.0; FEATURE_COUNT]).unwrap();
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn positive_evidence_raises_probability() {
        let mut weights = [0.0; FEATURE_COUNT];
        weights[0] = 3.0; // text_similarity
        let model = LogisticModel::new(weights, 0.0);

        let mut low = [0.0; FEATURE_COUNT];
        let mut high = [0.0; FEATURE_COUNT];
        low[0] = 0.1;
        high[0] = 0.9;

        let p_low = model.predict_genuine(&low).unwrap();
        let p_high = model.predict_genuine(&high).unwrap();
        assert!(p_high > p_low);
        assert!(p_high > 0.5);
    }

    #[test]
    fn output_stays_in_unit_interval() {
        let model = LogisticModel::new([100.0; FEATURE_COUNT], 50.0);
        let p = model.predict_genuine(&[1.0; FEATURE_COUNT]).unwrap();
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn parses_json_weights() {
        let json = r#"{
            "weights": [2.0, 1.5, -1.0, 1.0, 0.01, 0.3, 0.1, 0.002, 0.5, -3.0, 0.8],
            "bias": -0.5
        }"#;
        let model = LogisticModel::from_json_str(json).unwrap();
        let p = model.predict_genuine(&[0.0; FEATURE_COUNT]).unwrap();
        // sigmoid(-0.5) ~ 0.3775
        assert!((p - 0.3775).abs() < 1e-3);
    }

    #[test]
    fn rejects_wrong_weight_count() {
        let json = r#"{"weights": [1.0, 2.0], "bias": 0.0}"#;
        match LogisticModel::from_json_str(json) {
            Err(ModelError::Shape { expected, got }) => {
                assert_eq!(expected, FEATURE_COUNT);
                assert_eq!(got, 2);
            }
            other => panic!("expected shape error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            LogisticModel::from_json_str("not json"),
            Err(ModelError::Parse(_))
        ));
    }
}
