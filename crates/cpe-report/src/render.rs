//! Plain-text rendering for the terminal.

use std::fmt::Write;

use cpe::{ElasticityResult, SensitivityGrid};

const BAR_WIDTH: usize = 30;
const SHADES: [char; 5] = [' ', '.', '+', '*', '#'];

/// Labeled values followed by a bar per elasticity, scaled to the larger magnitude.
pub fn render_elasticities(result: &ElasticityResult) -> String {
    let entries = result.entries();
    let label_width = entries.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let max_abs = entries
        .iter()
        .map(|(_, value)| value.abs())
        .fold(0.0_f64, f64::max);

    let mut out = String::from("Elasticity of Contribution Profit\n");
    for (label, value) in entries {
        let len = if max_abs > 0.0 {
            ((value.abs() / max_abs) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let glyph = if value < 0.0 { '-' } else { '+' };
        let bar: String = std::iter::repeat(glyph).take(len).collect();
        let _ = writeln!(out, "{label:<label_width$}  {value:>10.4} |{bar}");
    }
    out
}

/// Annotated table of the grid, each cell tagged with a shade keyed to the value range.
pub fn render_grid(grid: &SensitivityGrid) -> String {
    let columns = grid.column_labels();
    let rows: Vec<(String, &[f64])> = grid.rows().collect();
    let (lo, hi) = grid.value_range().unwrap_or((0.0, 0.0));

    let label_width = rows
        .iter()
        .map(|(label, _)| label.len())
        .chain(std::iter::once("Rev \\ Mkt".len()))
        .max()
        .unwrap_or(0);
    let cell_width = columns
        .iter()
        .map(String::len)
        .chain(grid.cells.iter().flatten().map(|v| format!("{v:.2}").len() + 1))
        .max()
        .unwrap_or(0);

    let mut out = String::from("Contribution Profit Sensitivity Table ($M)\n");
    let _ = write!(out, "{:<label_width$}", "Rev \\ Mkt");
    for column in &columns {
        let _ = write!(out, " {column:>cell_width$}");
    }
    out.push('\n');

    for (label, row) in rows {
        let _ = write!(out, "{label:<label_width$}");
        for &value in row {
            let annotated = format!("{value:.2}{}", shade(value, lo, hi));
            let _ = write!(out, " {annotated:>cell_width$}");
        }
        out.push('\n');
    }

    let legend: String = SHADES.iter().collect();
    let _ = writeln!(out, "range: {lo:.2} .. {hi:.2}  shades: [{legend}]");
    out
}

fn shade(value: f64, lo: f64, hi: f64) -> char {
    let span = hi - lo;
    if span.abs() < f64::EPSILON {
        return SHADES[SHADES.len() / 2];
    }

    let t = ((value - lo) / span).clamp(0.0, 1.0);
    let idx = (t * (SHADES.len() - 1) as f64).round() as usize;
    SHADES[idx]
}
