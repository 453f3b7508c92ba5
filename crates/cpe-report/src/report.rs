use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use cpe::{build_grid_from_ranges, compute_elasticities, ElasticityResult, SensitivityGrid};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ReportConfig;
use crate::output::{
    create_timestamped_output_dir, write_elasticity_json, write_manifest_json,
    write_sensitivity_csv, Manifest, ELASTICITY_JSON, OUTPUT_SCHEMA_VERSION,
};
use crate::ReportError;

/// Both computed results; the grid does not depend on the elasticities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub elasticities: ElasticityResult,
    pub grid: SensitivityGrid,
}

#[derive(Debug, Clone)]
pub struct ReportSummary {
    pub evaluation: Evaluation,
    pub output_dir: PathBuf,
    pub csv_path: PathBuf,
    pub elasticity_path: PathBuf,
    pub manifest_path: PathBuf,
}

/// Validate the config and compute both components, without touching the filesystem.
pub fn evaluate(config: &ReportConfig) -> Result<Evaluation, ReportError> {
    config.validate()?;
    let baseline = config.baseline();

    let elasticities = compute_elasticities(baseline, config.delta)?;
    debug!(
        revenue = elasticities.revenue,
        marketing_spend = elasticities.marketing_spend,
        "computed elasticities"
    );

    let grid = build_grid_from_ranges(baseline, &config.revenue_sweep, &config.marketing_sweep)?;
    let (rows, cols) = grid.shape();
    debug!(rows, cols, "built sensitivity grid");

    Ok(Evaluation { elasticities, grid })
}

/// Evaluate, then write every artifact into a new timestamped directory under `output_root`.
///
/// Nothing is created under `output_root` when evaluation fails.
pub fn run_report(
    config: &ReportConfig,
    output_root: &Path,
) -> Result<ReportSummary, ReportError> {
    let evaluation = evaluate(config)?;
    let output_dir = create_timestamped_output_dir(output_root)?;
    run_report_into_dir(config, evaluation, &output_dir)
}

/// Write an evaluation produced from `config` into `output_dir`.
pub fn run_report_into_dir(
    config: &ReportConfig,
    evaluation: Evaluation,
    output_dir: &Path,
) -> Result<ReportSummary, ReportError> {
    info!(output_dir = %output_dir.display(), "writing contribution profit report");
    fs::create_dir_all(output_dir)?;

    let csv_path = output_dir.join(&config.csv_file_name);
    write_sensitivity_csv(&csv_path, &evaluation.grid)?;

    let elasticity_path = output_dir.join(ELASTICITY_JSON);
    write_elasticity_json(&elasticity_path, &evaluation.elasticities)?;

    let manifest = Manifest {
        schema_version: OUTPUT_SCHEMA_VERSION.to_string(),
        created_at: Utc::now().to_rfc3339(),
        baseline_profit: config.baseline().baseline_profit(),
        config: config.clone(),
        files: vec![config.csv_file_name.clone(), ELASTICITY_JSON.to_string()],
    };
    let manifest_path = write_manifest_json(output_dir, &manifest)?;

    info!("report complete");
    Ok(ReportSummary {
        evaluation,
        output_dir: output_dir.to_path_buf(),
        csv_path,
        elasticity_path,
        manifest_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cpe::CpeError;

    #[test]
    fn test_evaluate_defaults() {
        let evaluation = evaluate(&ReportConfig::default()).unwrap();
        assert_relative_eq!(evaluation.elasticities.revenue, 7.5, epsilon = 1e-6);
        assert_relative_eq!(evaluation.elasticities.marketing_spend, -6.5, epsilon = 1e-6);
        assert_eq!(evaluation.grid.shape(), (11, 11));
    }

    #[test]
    fn test_evaluate_surfaces_zero_profit() {
        let config = ReportConfig {
            revenue: 1_000_000.0,
            marketing_spend: 200_000.0,
            product_margin: 0.5,
            other_costs_pct: 0.3,
            ..ReportConfig::default()
        };
        let err = evaluate(&config).unwrap_err();
        assert!(matches!(
            err,
            ReportError::Model(CpeError::UndefinedElasticity { .. })
        ));
    }
}
