//! Kelso CLI binary.
//!
//! Provides the command-line interface for the Kelso OD pipeline.

use chrono::Utc;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use kelso::{PipelineConfig, PipelineOutcome, run_pipeline};
use kelso_data::{BusinessSector, LoaderConfig, clean_rows, load_csv};
use kelso_output::{ExportFormat, Exporter};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration as StdDuration;

#[derive(Parser)]
#[command(name = "kelso")]
#[command(about = "Kelso: business credit-risk scoring and OD strategy", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline over a business CSV
    Run {
        /// Input CSV file
        input: PathBuf,

        /// Directory for exported results
        #[arg(long, default_value = ".")]
        output: PathBuf,

        /// Export format (csv, json or pretty-json)
        #[arg(long, default_value = "csv")]
        format: String,

        /// Seed for every randomized stage
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Cumulative explained-variance ratio PCA must retain
        #[arg(long, default_value = "0.95")]
        variance_threshold: f64,

        /// PD below which a rate reduction may be offered
        #[arg(long, default_value = "0.15")]
        pd_threshold: f64,

        /// OD utilization above which a rate reduction may be offered
        #[arg(long, default_value = "0.70")]
        util_threshold: f64,

        /// Fraction of records held out for evaluation
        #[arg(long, default_value = "0.2")]
        test_fraction: f64,

        /// Maximum tolerated fraction of rejected CSV rows
        #[arg(long, default_value = "0.05")]
        max_rejected: f64,

        /// Also write the fitted model artifacts as JSON
        #[arg(long)]
        snapshot: bool,
    },

    /// Load and clean a business CSV, reporting data quality only
    Inspect {
        /// Input CSV file
        input: PathBuf,

        /// Maximum tolerated fraction of rejected CSV rows
        #[arg(long, default_value = "0.05")]
        max_rejected: f64,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            output,
            format,
            seed,
            variance_threshold,
            pd_threshold,
            util_threshold,
            test_fraction,
            max_rejected,
            snapshot,
        } => {
            let format = parse_format(&format)?;
            let mut config = PipelineConfig::default().with_seed(seed);
            config.pca.variance_threshold = variance_threshold;
            config.strategy.pd_threshold = pd_threshold;
            config.strategy.od_util_threshold = util_threshold;
            config.test_fraction = test_fraction;

            run_full_pipeline(&input, &output, format, config, max_rejected, snapshot)?;
        }
        Commands::Inspect {
            input,
            max_rejected,
        } => {
            inspect_input(&input, max_rejected)?;
        }
    }

    Ok(())
}

fn parse_format(format: &str) -> Result<ExportFormat, Box<dyn std::error::Error>> {
    match format {
        "csv" => Ok(ExportFormat::Csv),
        "json" => Ok(ExportFormat::Json),
        "pretty-json" => Ok(ExportFormat::PrettyJson),
        other => Err(format!("unknown format '{other}' (expected csv, json or pretty-json)").into()),
    }
}

fn stage_spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(StdDuration::from_millis(100));
    pb.set_message(message);
    pb
}

fn run_full_pipeline(
    input: &Path,
    output: &Path,
    format: ExportFormat,
    config: PipelineConfig,
    max_rejected: f64,
    snapshot: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║{:^62}║", "KELSO OD PIPELINE");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Input: {}", input.display());
    println!("Seed: {}", config.seed);
    println!(
        "Thresholds: PD < {}, utilization > {}",
        config.strategy.pd_threshold, config.strategy.od_util_threshold
    );
    println!();

    let loader = LoaderConfig {
        max_rejected_fraction: max_rejected,
    };

    let pb = stage_spinner("Loading and cleaning records...");
    let (raw, load_report) = load_csv(input, &loader)?;
    let (records, clean_report) = clean_rows(raw)?;
    pb.finish_and_clear();

    println!(
        "Loaded {} rows ({} rejected), cleaned to {} records",
        load_report.total_rows, load_report.rejected_rows, clean_report.rows_out
    );
    for sample in &load_report.rejection_samples {
        eprintln!("  rejected: {sample}");
    }
    if clean_report.values_imputed > 0 {
        println!(
            "  {} missing values imputed with column medians",
            clean_report.values_imputed
        );
    }
    if clean_report.dropped_missing_sector > 0 {
        println!(
            "  {} records dropped for unknown sector",
            clean_report.dropped_missing_sector
        );
    }

    let pb = stage_spinner("Running pipeline...");
    let outcome = run_pipeline(&records, &config)?;
    pb.finish_and_clear();

    if !outcome.segmentation.converged {
        eprintln!(
            "Warning: segmentation hit the iteration budget ({} iterations)",
            outcome.segmentation.n_iter
        );
    }
    println!(
        "Risk model: {} epochs, validation loss {:.4}{}",
        outcome.risk_model.epochs_run,
        outcome.risk_model.best_validation_loss,
        if outcome.risk_model.converged {
            " (early stop)"
        } else {
            ""
        }
    );
    if outcome.proxy_labelled > 0 {
        println!(
            "Labels: {} of {} records labelled by the stress proxy",
            outcome.proxy_labelled,
            outcome.rows.len()
        );
    }

    println!("{}", outcome.report.to_ascii_table());

    println!("\nSector risk ranking (riskiest first):");
    for (rank, (sector, mean_pd)) in outcome.report.sector_risk_ranking().iter().enumerate() {
        println!("  {:>2}. {:<16} mean PD {:.4}", rank + 1, sector, mean_pd);
    }
    println!();

    print_evaluation(&outcome);

    export_results(output, format, &outcome, snapshot, &config)?;
    Ok(())
}

fn print_evaluation(outcome: &PipelineOutcome) {
    let eval = &outcome.evaluation;
    println!("Holdout Evaluation (threshold {:.2}):", eval.threshold);
    println!("  AUC:                 {:.4}", eval.auc);
    println!("  Accuracy:            {:.4}", eval.accuracy);
    println!("  False negative rate: {:.4}", eval.false_negative_rate);
    println!(
        "  Confusion: TP {} / FP {} / TN {} / FN {}",
        eval.confusion.true_positives,
        eval.confusion.false_positives,
        eval.confusion.true_negatives,
        eval.confusion.false_negatives
    );

    println!("\nCluster tiers:");
    for (cluster, tier) in outcome.tiers.iter().enumerate() {
        println!("  cluster {cluster}: {tier}");
    }
    println!();
}

fn export_results(
    output: &Path,
    format: ExportFormat,
    outcome: &PipelineOutcome,
    snapshot: bool,
    config: &PipelineConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(output)?;

    let rows_path = output.join(format!("strategy_rows.{}", format.extension()));
    outcome.rows.export_to_file(&rows_path, format)?;
    println!("Wrote {}", rows_path.display());

    let report_path = output.join(format!("sector_report.{}", format.extension()));
    outcome.report.export_to_file(&report_path, format)?;
    println!("Wrote {}", report_path.display());

    if snapshot {
        let snapshot_path = output.join("model_snapshot.json");
        let payload = json!({
            "generated": Utc::now().date_naive(),
            "config": config,
            "scaler": outcome.scaler,
            "pca": outcome.pca,
            "segmentation": outcome.segmentation,
            "risk_model": outcome.risk_model,
        });
        std::fs::write(&snapshot_path, serde_json::to_string_pretty(&payload)?)?;
        println!("Wrote {}", snapshot_path.display());
    }

    Ok(())
}

fn inspect_input(input: &Path, max_rejected: f64) -> Result<(), Box<dyn std::error::Error>> {
    let loader = LoaderConfig {
        max_rejected_fraction: max_rejected,
    };

    let (raw, load_report) = load_csv(input, &loader)?;
    let (records, clean_report) = clean_rows(raw)?;

    println!("\nData quality: {}", input.display());
    println!("{}", "-".repeat(60));
    println!("Rows seen:            {}", load_report.total_rows);
    println!(
        "Rows rejected:        {} ({:.1}%)",
        load_report.rejected_rows,
        load_report.rejected_fraction() * 100.0
    );
    println!("Duplicates removed:   {}", clean_report.duplicates_removed);
    println!("Values imputed:       {}", clean_report.values_imputed);
    println!("Unknown sectors:      {}", clean_report.dropped_missing_sector);
    println!("Clean records:        {}", clean_report.rows_out);
    for sample in &load_report.rejection_samples {
        eprintln!("  rejected: {sample}");
    }

    println!("\nSector breakdown:");
    for sector in BusinessSector::all() {
        let count = records.iter().filter(|r| r.sector == sector).count();
        if count > 0 {
            println!("  {:<16} {count}", sector.name());
        }
    }

    Ok(())
}
