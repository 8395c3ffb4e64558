//! Price deviation between a candidate listing and trusted references.
//!
//! The decision path uses a single unsigned, capped metric: both
//! overpriced and underpriced listings register as deviation. A signed
//! statistical summary exists for display only and is never consulted
//! when scoring.

use crate::thresholds::PRICE_DEVIATION_CAP;

/// Compute the unsigned price deviation of `candidate_price` from the
/// mean of `reference_prices`, capped at [`PRICE_DEVIATION_CAP`].
///
/// Reference prices are filtered to positive finite values first. If no
/// usable reference remains, or the candidate price is not a positive
/// finite number, the deviation is 0.0 (no evidence either way).
pub fn price_deviation(candidate_price: f64, reference_prices: &[f64]) -> f64 {
    if !candidate_price.is_finite() || candidate_price <= 0.0 {
        return 0.0;
    }

    let usable: Vec<f64> = reference_prices
        .iter()
        .copied()
        .filter(|p| p.is_finite() && *p > 0.0)
        .collect();
    if usable.is_empty() {
        return 0.0;
    }

    let mean = usable.iter().sum::<f64>() / usable.len() as f64;
    if mean <= 0.0 {
        return 0.0;
    }

    ((candidate_price - mean).abs() / mean).min(PRICE_DEVIATION_CAP)
}

/// Diagnostic price statistics for human-readable output.
///
/// Non-authoritative: the classifier only ever sees [`price_deviation`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PriceStats {
    /// Signed relative deviation from the reference mean (uncapped).
    pub signed_deviation: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    /// True when the candidate sits more than two standard deviations
    /// from the reference mean.
    pub is_outlier: bool,
}

/// Compute diagnostic statistics, or `None` when no usable reference
/// price exists.
pub fn price_stats(candidate_price: f64, reference_prices: &[f64]) -> Option<PriceStats> {
    let mut usable: Vec<f64> = reference_prices
        .iter()
        .copied()
        .filter(|p| p.is_finite() && *p > 0.0)
        .collect();
    if usable.is_empty() || !candidate_price.is_finite() || candidate_price <= 0.0 {
        return None;
    }

    usable.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = usable.len() as f64;
    let mean = usable.iter().sum::<f64>() / n;
    let median = if usable.len() % 2 == 1 {
        usable[usable.len() / 2]
    } else {
        (usable[usable.len() / 2 - 1] + usable[usable.len() / 2]) / 2.0
    };
    let variance = usable.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    Some(PriceStats {
        signed_deviation: (candidate_price - mean) / mean,
        mean,
        median,
        std_dev,
        is_outlier: std_dev > 0.0 && (candidate_price - mean).abs() > 2.0 * std_dev,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_references_give_zero() {
        assert_eq!(price_deviation(100.0, &[]), 0.0);
    }

    #[test]
    fn non_positive_candidate_gives_zero() {
        assert_eq!(price_deviation(0.0, &[100.0]), 0.0);
        assert_eq!(price_deviation(-5.0, &[100.0]), 0.0);
        assert_eq!(price_deviation(f64::NAN, &[100.0]), 0.0);
    }

    #[test]
    fn non_positive_references_are_filtered() {
        assert_eq!(price_deviation(100.0, &[0.0, -10.0, f64::NAN]), 0.0);
        // Only the positive reference counts: mean 100, no deviation.
        assert_eq!(price_deviation(100.0, &[100.0, 0.0, -10.0]), 0.0);
    }

    #[test]
    fn exact_match_has_zero_deviation() {
        assert_eq!(price_deviation(100.0, &[100.0]), 0.0);
    }

    #[test]
    fn deviation_is_unsigned() {
        let over = price_deviation(150.0, &[100.0]);
        let under = price_deviation(50.0, &[100.0]);
        assert!((over - 0.5).abs() < 1e-12);
        assert!((under - 0.5).abs() < 1e-12);
    }

    #[test]
    fn deviation_is_capped_at_two() {
        assert_eq!(price_deviation(10_000.0, &[100.0]), 2.0);
    }

    #[test]
    fn deviation_is_monotone_in_distance_from_mean() {
        let refs = [80.0, 100.0, 120.0];
        let mut last = 0.0;
        for p in [100.0, 110.0, 130.0, 170.0, 250.0] {
            let d = price_deviation(p, &refs);
            assert!(d >= last, "deviation should not decrease: {} < {}", d, last);
            last = d;
        }
    }

    #[test]
    fn uses_mean_of_multiple_references() {
        // mean of [90, 110] = 100
        let d = price_deviation(120.0, &[90.0, 110.0]);
        assert!((d - 0.2).abs() < 1e-12);
    }

    #[test]
    fn stats_report_signed_deviation() {
        let stats = price_stats(50.0, &[100.0]).unwrap();
        assert!((stats.signed_deviation + 0.5).abs() < 1e-12);
        assert_eq!(stats.mean, 100.0);
        assert_eq!(stats.median, 100.0);
    }

    #[test]
    fn stats_flag_outliers() {
        let refs = [98.0, 99.0, 100.0, 101.0, 102.0];
        let inlier = price_stats(100.5, &refs).unwrap();
        let outlier = price_stats(500.0, &refs).unwrap();
        assert!(!inlier.is_outlier);
        assert!(outlier.is_outlier);
    }

    #[test]
    fn stats_none_without_references() {
        assert!(price_stats(100.0, &[]).is_none());
        assert!(price_stats(-1.0, &[100.0]).is_none());
    }

    #[test]
    fn stats_median_of_even_count() {
        let stats = price_stats(100.0, &[90.0, 110.0, 120.0, 80.0]).unwrap();
        assert!((stats.median - 100.0).abs() < 1e-12);
    }
}
