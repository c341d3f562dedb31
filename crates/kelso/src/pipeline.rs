//! End-to-end pipeline orchestration.
//!
//! Stage order matters and is fixed: features are engineered once, scaling
//! and PCA are fit on the full cleaned set, segmentation runs in reduced
//! space, and the risk model trains on the reduced features with the
//! cluster label appended as one extra column. Scores, rate actions and
//! tiers are then derived for every record, while evaluation metrics come
//! from the held-out split only.

use crate::config::PipelineConfig;
use crate::error::Result;
use chrono::Utc;
use kelso_data::BusinessRecord;
use kelso_features::{FeatureMatrix, LabelPolicy, engineer, training_labels};
use kelso_model::{
    ClusterModel, EvaluationReport, FittedPca, FittedScaler, TrainedRiskModel, evaluate,
    stratified_split,
};
use kelso_output::{SectorReport, StrategyRow};
use kelso_strategy::{TierLabel, assign_tiers, od_suitability, recommend_rate};
use ndarray::{Array2, Axis};

/// Everything a pipeline run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Per-business verdicts, in input order.
    pub rows: Vec<StrategyRow>,

    /// Sector × cluster aggregate report.
    pub report: SectorReport,

    /// Holdout metrics for the risk model.
    pub evaluation: EvaluationReport,

    /// Tier label assigned to each cluster, indexed by cluster label.
    pub tiers: Vec<TierLabel>,

    /// Fitted scaler, for snapshotting and later scoring runs.
    pub scaler: FittedScaler,

    /// Fitted projection.
    pub pca: FittedPca,

    /// Fitted segmentation.
    pub segmentation: ClusterModel,

    /// Trained risk model.
    pub risk_model: TrainedRiskModel,

    /// Records labelled by the stress proxy rather than ground truth.
    pub proxy_labelled: usize,
}

/// Run the full pipeline over cleaned records.
///
/// # Errors
///
/// Propagates the first stage failure: invalid configuration, non-finite
/// features, degenerate labels, or a model stage rejecting its input.
pub fn run_pipeline(records: &[BusinessRecord], config: &PipelineConfig) -> Result<PipelineOutcome> {
    config.validate()?;

    let features = FeatureMatrix::from_records(records)?;

    let labelled = training_labels(records);
    let labels: Vec<bool> = labelled.iter().map(|(l, _)| *l).collect();
    let proxy_labelled = labelled
        .iter()
        .filter(|(_, p)| *p == LabelPolicy::StressProxy)
        .count();

    let scaler = FittedScaler::fit(features.values())?;
    let scaled = scaler.transform(features.values())?;

    let pca = FittedPca::fit(&scaled, &config.pca)?;
    let reduced = pca.transform(&scaled)?;

    let segmentation = ClusterModel::fit(&reduced, &config.kmeans)?;
    let clusters = segmentation.predict(&reduced)?;

    // Reduced features plus the cluster label as one extra model input.
    let n = reduced.nrows();
    let mut model_input = Array2::<f64>::zeros((n, reduced.ncols() + 1));
    model_input
        .slice_mut(ndarray::s![.., ..reduced.ncols()])
        .assign(&reduced);
    for (i, &cluster) in clusters.iter().enumerate() {
        model_input[[i, reduced.ncols()]] = cluster as f64;
    }

    let (train_idx, test_idx) = stratified_split(&labels, config.test_fraction, config.seed)?;
    let x_train = model_input.select(Axis(0), &train_idx);
    let y_train: Vec<bool> = train_idx.iter().map(|&i| labels[i]).collect();

    let risk_model = TrainedRiskModel::fit(&x_train, &y_train, &config.risk_model)?;
    let pd = risk_model.predict(&model_input)?;

    let pd_test: Vec<f64> = test_idx.iter().map(|&i| pd[i]).collect();
    let y_test: Vec<bool> = test_idx.iter().map(|&i| labels[i]).collect();
    let evaluation = evaluate(&pd_test, &y_test, config.decision_threshold)?;

    let pd_all: Vec<f64> = pd.to_vec();
    let tiers = assign_tiers(&clusters, &pd_all, config.kmeans.k)?;

    let rows: Vec<StrategyRow> = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let derived = engineer(record);
            let score = od_suitability(pd_all[i], derived.cash_ratio);
            let action = recommend_rate(pd_all[i], record.od_utilization, &config.strategy);
            StrategyRow::new(
                record.business_id.clone(),
                record.sector.name().to_string(),
                clusters[i],
                tiers[clusters[i]],
                pd_all[i],
                score,
                record.od_utilization,
                derived.cash_ratio,
                derived.profit,
                derived.profit_margin,
                action,
            )
        })
        .collect();

    let report = SectorReport::summarize(&rows, Utc::now().date_naive());

    Ok(PipelineOutcome {
        rows,
        report,
        evaluation,
        tiers,
        scaler,
        pca,
        segmentation,
        risk_model,
        proxy_labelled,
    })
}
