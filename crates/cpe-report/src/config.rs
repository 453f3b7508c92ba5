use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use cpe::{BaselineParams, SweepRange, DEFAULT_DELTA};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use tracing::{debug, warn};

use crate::ReportError;

/// File name offered for the exported sensitivity table
pub const DEFAULT_CSV_FILE_NAME: &str = "sensitivity_table.csv";

/// Config files picked up from the working directory when no path is given
const IMPLICIT_CONFIG_FILES: [&str; 2] = ["cpe.toml", "cpe.json"];

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    #[serde_as(as = "DefaultOnNull")]
    pub revenue: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub marketing_spend: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub product_margin: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub other_costs_pct: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub delta: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub revenue_sweep: SweepRange,
    #[serde_as(as = "DefaultOnNull")]
    pub marketing_sweep: SweepRange,
    #[serde_as(as = "DefaultOnNull")]
    pub csv_file_name: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let baseline = BaselineParams::default();
        Self {
            revenue: baseline.revenue,
            marketing_spend: baseline.marketing_spend,
            product_margin: baseline.product_margin,
            other_costs_pct: baseline.other_costs_pct,
            delta: DEFAULT_DELTA,
            revenue_sweep: SweepRange::default(),
            marketing_sweep: SweepRange::default(),
            csv_file_name: DEFAULT_CSV_FILE_NAME.to_string(),
        }
    }
}

impl ReportConfig {
    pub fn baseline(&self) -> BaselineParams {
        BaselineParams::new(
            self.revenue,
            self.marketing_spend,
            self.product_margin,
            self.other_costs_pct,
        )
    }

    pub fn validate(&self) -> Result<(), ReportError> {
        self.baseline().validate()?;
        cpe::validate_delta(self.delta)?;
        self.revenue_sweep.validate()?;
        self.marketing_sweep.validate()?;

        if self.csv_file_name.trim().is_empty() {
            return Err(ReportError::InvalidConfig(
                "csv_file_name must not be empty".to_string(),
            ));
        }

        if Path::new(&self.csv_file_name).file_name() != Some(OsStr::new(&self.csv_file_name)) {
            return Err(ReportError::InvalidConfig(format!(
                "csv_file_name must be a bare file name, got {}",
                self.csv_file_name
            )));
        }

        Ok(())
    }

    /// Load a config file, choosing the format from its extension.
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let raw = fs::read_to_string(path)?;
        let config: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&raw)?,
            Some("toml") => toml::from_str(&raw)?,
            _ => {
                return Err(ReportError::InvalidConfig(format!(
                    "unsupported config format: {} (expected .json or .toml)",
                    path.display()
                )));
            }
        };
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Explicit path first, then `cpe.toml` / `cpe.json` in `dir`, then defaults.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self, ReportError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        for name in IMPLICIT_CONFIG_FILES {
            let candidate: PathBuf = dir.join(name);
            if candidate.exists() {
                warn!(path = %candidate.display(), "using config found in working directory");
                return Self::load(&candidate);
            }
        }

        Ok(Self::default())
    }
}
