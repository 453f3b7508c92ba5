use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use cpe::{ElasticityResult, SensitivityGrid};
use csv::{ReaderBuilder, Writer};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ReportConfig;
use crate::ReportError;

pub const OUTPUT_SCHEMA_VERSION: &str = "1.0.0";
pub const ELASTICITY_JSON: &str = "elasticities.json";
pub const MANIFEST_JSON: &str = "manifest.json";

/// Sensitivity table as read back from its CSV export
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityTable {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub cells: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub schema_version: String,
    pub created_at: String,
    pub baseline_profit: f64,
    pub config: ReportConfig,
    pub files: Vec<String>,
}

/// Allocate a fresh `YYYY-MM-DDTHH-MM-SSZ` directory under `output_root`.
pub fn create_timestamped_output_dir(output_root: &Path) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(output_root)?;

    let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%SZ").to_string();
    let mut output_dir = output_root.join(&timestamp);
    let mut counter = 1_u32;

    while output_dir.exists() {
        output_dir = output_root.join(format!("{timestamp}-{counter:02}"));
        counter += 1;
    }

    fs::create_dir_all(&output_dir)?;
    Ok(output_dir)
}

fn fmt_cell(value: f64) -> String {
    // `+ 0.0` turns -0.0 into 0.0
    format!("{:.2}", value + 0.0)
}

/// UTF-8 CSV: an empty corner cell and the column labels, then one labeled row per revenue change.
pub fn sensitivity_csv_bytes(grid: &SensitivityGrid) -> Result<Vec<u8>, ReportError> {
    let mut writer = Writer::from_writer(Vec::new());

    let mut header = vec![String::new()];
    header.extend(grid.column_labels());
    writer.write_record(&header)?;

    for (label, row) in grid.rows() {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(label);
        record.extend(row.iter().copied().map(fmt_cell));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    writer.into_inner().map_err(|err| err.into_error().into())
}

pub fn write_sensitivity_csv(path: &Path, grid: &SensitivityGrid) -> Result<(), ReportError> {
    fs::write(path, sensitivity_csv_bytes(grid)?)?;
    info!(path = %path.display(), "wrote sensitivity table");
    Ok(())
}

pub fn parse_sensitivity_csv(text: &str) -> Result<SensitivityTable, ReportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut records = reader.records();

    let header = records.next().ok_or_else(|| ReportError::MalformedTable {
        line: 1,
        reason: "missing header row".to_string(),
    })??;

    if header.get(0).map_or(true, |corner| !corner.is_empty()) {
        return Err(ReportError::MalformedTable {
            line: 1,
            reason: "header must start with an empty corner cell".to_string(),
        });
    }

    let column_labels: Vec<String> = header.iter().skip(1).map(str::to_string).collect();
    let mut row_labels = Vec::new();
    let mut cells = Vec::new();

    for (idx, record) in records.enumerate() {
        let record = record?;
        let line = idx + 2;

        if record.len() != column_labels.len() + 1 {
            return Err(ReportError::MalformedTable {
                line,
                reason: format!(
                    "expected {} fields, got {}",
                    column_labels.len() + 1,
                    record.len()
                ),
            });
        }

        let mut fields = record.iter();
        let label = fields.next().unwrap_or_default().to_string();
        let row = fields
            .map(|field| {
                field.trim().parse::<f64>().map_err(|err| ReportError::MalformedTable {
                    line,
                    reason: format!("invalid value {field:?}: {err}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        row_labels.push(label);
        cells.push(row);
    }

    Ok(SensitivityTable {
        row_labels,
        column_labels,
        cells,
    })
}

pub fn read_sensitivity_csv(path: &Path) -> Result<SensitivityTable, ReportError> {
    let text = fs::read_to_string(path)?;
    parse_sensitivity_csv(&text)
}

pub fn write_elasticity_json(path: &Path, result: &ElasticityResult) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(result)?;
    fs::write(path, json)?;
    info!(path = %path.display(), "wrote elasticities");
    Ok(())
}

pub fn write_manifest_json(
    output_dir: &Path,
    manifest: &Manifest,
) -> Result<PathBuf, ReportError> {
    let path = output_dir.join(MANIFEST_JSON);
    fs::write(&path, serde_json::to_string_pretty(manifest)?)?;
    Ok(path)
}
