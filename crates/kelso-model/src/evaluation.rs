//! Holdout evaluation of default-probability predictions.
//!
//! Reports ROC AUC (rank-based, tie-aware), accuracy at a decision
//! threshold, the confusion matrix, and the false-negative rate. The
//! false-negative rate is first-class here: a missed default is the most
//! expensive mistake an overdraft book can make.

use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};

/// Counts of each prediction outcome at the decision threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// Defaults predicted as defaults
    pub true_positives: usize,
    /// Non-defaults predicted as defaults
    pub false_positives: usize,
    /// Non-defaults predicted as non-defaults
    pub true_negatives: usize,
    /// Defaults predicted as non-defaults
    pub false_negatives: usize,
}

/// Holdout metrics for a trained risk model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Rank-based ROC AUC, ties contributing one half
    pub auc: f64,
    /// Fraction of correct predictions at the threshold
    pub accuracy: f64,
    /// Fraction of actual defaults predicted as non-defaults
    pub false_negative_rate: f64,
    /// Outcome counts at the threshold
    pub confusion: ConfusionMatrix,
    /// Decision threshold the hard predictions used
    pub threshold: f64,
}

/// Score predicted default probabilities against true labels.
///
/// AUC is computed by the rank statistic: the mean rank of positive scores
/// against the count of pairs, with tied scores sharing their average rank.
/// This equals the probability that a random default outranks a random
/// non-default, counting ties as one half.
///
/// # Errors
///
/// Returns [`ModelError::SchemaMismatch`] when lengths differ,
/// [`ModelError::EmptyInput`] for empty inputs, and
/// [`ModelError::DegenerateLabels`] when only one class is present (AUC is
/// undefined there).
pub fn evaluate(probabilities: &[f64], labels: &[bool], threshold: f64) -> Result<EvaluationReport> {
    if probabilities.len() != labels.len() {
        return Err(ModelError::SchemaMismatch {
            expected: labels.len(),
            actual: probabilities.len(),
        });
    }
    if labels.is_empty() {
        return Err(ModelError::EmptyInput("evaluation"));
    }
    if probabilities.iter().any(|p| !p.is_finite()) {
        return Err(ModelError::Numeric(
            "non-finite probability in evaluation input".to_string(),
        ));
    }

    let n_pos = labels.iter().filter(|&&l| l).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(ModelError::DegenerateLabels(
            "evaluation labels contain a single class",
        ));
    }

    // Average ranks, tied scores sharing the midpoint of their rank block.
    let mut order: Vec<usize> = (0..probabilities.len()).collect();
    order.sort_by(|&i, &j| {
        probabilities[i]
            .partial_cmp(&probabilities[j])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0.0; probabilities.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len()
            && probabilities[order[end + 1]] == probabilities[order[start]]
        {
            end += 1;
        }
        // 1-based ranks start+1 ..= end+1 average to (start + end) / 2 + 1.
        let shared = (start + end) as f64 / 2.0 + 1.0;
        for &idx in &order[start..=end] {
            ranks[idx] = shared;
        }
        start = end + 1;
    }

    let positive_rank_sum: f64 = labels
        .iter()
        .zip(ranks.iter())
        .filter(|&(&l, _)| l)
        .map(|(_, &r)| r)
        .sum();
    let auc = (positive_rank_sum - (n_pos * (n_pos + 1)) as f64 / 2.0)
        / (n_pos as f64 * n_neg as f64);

    let mut confusion = ConfusionMatrix {
        true_positives: 0,
        false_positives: 0,
        true_negatives: 0,
        false_negatives: 0,
    };
    for (&p, &label) in probabilities.iter().zip(labels.iter()) {
        let predicted = p >= threshold;
        match (label, predicted) {
            (true, true) => confusion.true_positives += 1,
            (false, true) => confusion.false_positives += 1,
            (false, false) => confusion.true_negatives += 1,
            (true, false) => confusion.false_negatives += 1,
        }
    }

    let accuracy =
        (confusion.true_positives + confusion.true_negatives) as f64 / labels.len() as f64;
    let false_negative_rate = confusion.false_negatives as f64 / n_pos as f64;

    Ok(EvaluationReport {
        auc,
        accuracy,
        false_negative_rate,
        confusion,
        threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perfect_classifier() {
        let probs = [0.9, 0.8, 0.1, 0.2];
        let labels = [true, true, false, false];
        let report = evaluate(&probs, &labels, 0.5).unwrap();

        assert_relative_eq!(report.auc, 1.0);
        assert_relative_eq!(report.accuracy, 1.0);
        assert_relative_eq!(report.false_negative_rate, 0.0);
        assert_eq!(report.confusion.true_positives, 2);
        assert_eq!(report.confusion.true_negatives, 2);
    }

    #[test]
    fn test_inverted_classifier_scores_zero_auc() {
        let probs = [0.1, 0.2, 0.9, 0.8];
        let labels = [true, true, false, false];
        let report = evaluate(&probs, &labels, 0.5).unwrap();
        assert_relative_eq!(report.auc, 0.0);
    }

    #[test]
    fn test_constant_scores_give_half_auc() {
        let probs = [0.5, 0.5, 0.5, 0.5];
        let labels = [true, false, true, false];
        let report = evaluate(&probs, &labels, 0.5).unwrap();
        assert_relative_eq!(report.auc, 0.5);
    }

    #[test]
    fn test_tied_scores_share_rank() {
        // One positive tied with one negative at 0.6, one clean pair.
        let probs = [0.9, 0.6, 0.6, 0.1];
        let labels = [true, true, false, false];
        let report = evaluate(&probs, &labels, 0.5).unwrap();
        // Pairs: (0.9 vs 0.6) win, (0.9 vs 0.1) win, (0.6 vs 0.6) half,
        // (0.6 vs 0.1) win → 3.5 / 4.
        assert_relative_eq!(report.auc, 0.875);
    }

    #[test]
    fn test_false_negative_rate_counts_missed_defaults() {
        let probs = [0.9, 0.1, 0.2, 0.05];
        let labels = [true, true, true, false];
        let report = evaluate(&probs, &labels, 0.5).unwrap();

        assert_eq!(report.confusion.false_negatives, 2);
        assert_relative_eq!(report.false_negative_rate, 2.0 / 3.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let probs = [0.5, 0.4];
        let labels = [true, false];
        let report = evaluate(&probs, &labels, 0.5).unwrap();
        assert_eq!(report.confusion.true_positives, 1);
        assert_eq!(report.confusion.true_negatives, 1);
    }

    #[test]
    fn test_single_class_rejected() {
        let err = evaluate(&[0.1, 0.9], &[true, true], 0.5).unwrap_err();
        assert!(matches!(err, ModelError::DegenerateLabels(_)));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = evaluate(&[0.1], &[true, false], 0.5).unwrap_err();
        assert!(matches!(err, ModelError::SchemaMismatch { .. }));
    }
}
