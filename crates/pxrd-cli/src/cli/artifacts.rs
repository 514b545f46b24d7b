//! Text artifact helpers for the command-line workflows.
//!
//! Spectrum files are plain two-column text: the angular axis in degrees and
//! the intensity, whitespace separated, with `#` comment lines.

use anyhow::Context;
use std::fs;
use std::path::Path;

pub fn normalize_text_artifact(content: &str) -> String {
    let mut normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    if !normalized.is_empty() && !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}

pub fn write_text_artifact(path: &Path, content: &str) -> anyhow::Result<()> {
    fs::write(path, normalize_text_artifact(content))
        .with_context(|| format!("writing {}", path.display()))
}

/// Reads a two-column spectrum file into axis and intensity vectors.
pub fn read_two_column_data(path: &Path) -> anyhow::Result<(Vec<f64>, Vec<f64>)> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    let mut axis = Vec::new();
    let mut intensity = Vec::new();
    for (line_number, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut fields = trimmed.split_whitespace();
        let (first, second) = match (fields.next(), fields.next()) {
            (Some(first), Some(second)) => (first, second),
            _ => anyhow::bail!(
                "{}:{}: expected two columns, got {trimmed:?}",
                path.display(),
                line_number + 1
            ),
        };
        let parse = |field: &str| -> anyhow::Result<f64> {
            field.parse().with_context(|| {
                format!("{}:{}: invalid number {field:?}", path.display(), line_number + 1)
            })
        };
        axis.push(parse(first)?);
        intensity.push(parse(second)?);
    }
    Ok((axis, intensity))
}

/// Renders axis and intensity columns as a two-column artifact body.
pub fn format_two_column_data(axis: &[f64], intensity: &[f64]) -> String {
    let mut body = String::with_capacity(axis.len() * 32);
    for (x, y) in axis.iter().zip(intensity) {
        body.push_str(&format!("{x:>14.6} {y:>16.8e}\n"));
    }
    body
}
