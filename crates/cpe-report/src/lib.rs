pub mod config;
pub mod output;
pub mod render;
pub mod report;

use thiserror::Error;

pub use config::ReportConfig;
pub use output::{create_timestamped_output_dir, parse_sensitivity_csv, read_sensitivity_csv};
pub use report::{evaluate, run_report, run_report_into_dir, Evaluation, ReportSummary};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Model(#[from] cpe::CpeError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("malformed sensitivity table at line {line}: {reason}")]
    MalformedTable { line: usize, reason: String },
}
