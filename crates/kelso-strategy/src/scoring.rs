//! Overdraft suitability scoring.
//!
//! The score blends survival probability with liquidity headroom:
//! `(1 − PD) × cash ratio`. A business with PD 0.10 and a cash ratio of
//! 0.5 scores 0.45. Higher is better; the scale is relative, meant for
//! ranking a book rather than absolute interpretation.

use crate::error::{Result, StrategyError};

/// Suitability score for one business.
///
/// The probability is clamped to [0, 1] before use, so a model artifact
/// that drifts slightly outside the unit interval cannot produce a
/// negative survival factor. The cash ratio is already capped upstream.
pub fn od_suitability(pd: f64, cash_ratio: f64) -> f64 {
    (1.0 - pd.clamp(0.0, 1.0)) * cash_ratio
}

/// Suitability scores for a book of businesses.
///
/// # Errors
///
/// Returns [`StrategyError::LengthMismatch`] when the slices differ in
/// length and [`StrategyError::EmptyInput`] for empty inputs.
pub fn score_all(pds: &[f64], cash_ratios: &[f64]) -> Result<Vec<f64>> {
    if pds.len() != cash_ratios.len() {
        return Err(StrategyError::LengthMismatch {
            expected: pds.len(),
            actual: cash_ratios.len(),
        });
    }
    if pds.is_empty() {
        return Err(StrategyError::EmptyInput("suitability scoring"));
    }
    Ok(pds
        .iter()
        .zip(cash_ratios.iter())
        .map(|(&pd, &ratio)| od_suitability(pd, ratio))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_score() {
        assert_relative_eq!(od_suitability(0.10, 0.5), 0.45);
    }

    #[test]
    fn test_certain_default_scores_zero() {
        assert_relative_eq!(od_suitability(1.0, 3.0), 0.0);
    }

    #[test]
    fn test_out_of_range_pd_clamped() {
        assert_relative_eq!(od_suitability(1.2, 2.0), 0.0);
        assert_relative_eq!(od_suitability(-0.1, 2.0), 2.0);
    }

    #[test]
    fn test_score_orders_by_risk_at_equal_liquidity() {
        let low_risk = od_suitability(0.05, 1.0);
        let high_risk = od_suitability(0.60, 1.0);
        assert!(low_risk > high_risk);
    }

    #[test]
    fn test_score_all_length_mismatch() {
        let err = score_all(&[0.1, 0.2], &[1.0]).unwrap_err();
        assert!(matches!(err, StrategyError::LengthMismatch { .. }));
    }

    #[test]
    fn test_score_all_matches_scalar() {
        let scores = score_all(&[0.1, 0.5], &[0.5, 2.0]).unwrap();
        assert_relative_eq!(scores[0], 0.45);
        assert_relative_eq!(scores[1], 1.0);
    }
}
