//! Text, JSON and delimited output for the three commands.

use std::io::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;
use iac_reconcile_core::{ReconciledRecord, Source, Summary, TypeSummary};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DetailFormat {
    SpaceSeparated,
    TabSeparated,
    Csv,
    /// Aligned columns separated by `|`.
    Table,
}

/// Summary plus run metadata, as printed by `summarize`.
#[derive(Debug, Serialize)]
pub struct SummaryReport<'a> {
    #[serde(flatten)]
    pub summary: &'a Summary,
    pub state_files: usize,
    pub fingerprint: String,
}

pub fn write_summary(out: &mut impl Write, report: &SummaryReport<'_>, format: SummaryFormat) -> Result<()> {
    match format {
        SummaryFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
        SummaryFormat::Text => {
            writeln!(out, "Summary:")?;
            writeln!(out, "Both (Config+IaC): {}", report.summary.both)?;
            writeln!(out, "Source All Only Mapped Unmapped")?;
            for source in &report.summary.sources {
                writeln!(
                    out,
                    "{}: {} {} {} {}",
                    source.name, source.total, source.only, source.only_mapped, source.only_unmapped
                )?;
            }
            writeln!(out, "Terraform Files: {}", report.state_files)?;
            writeln!(out, "Fingerprint: {}", report.fingerprint)?;
        }
    }
    Ok(())
}

pub fn write_resources(out: &mut impl Write, rows: &[&TypeSummary]) -> Result<()> {
    let sources: Vec<&str> = Source::ALL.iter().map(|s| s.as_str()).collect();
    writeln!(out, "ResourceType Total Single-Only Both {}", sources.join(" "))?;
    for row in rows {
        write!(out, "{}: {} {} {}", row.resource_type, row.count, row.single_only, row.both)?;
        for source in &sources {
            write!(out, " {}", row.source_count(source))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

/// Header plus one row per record.
pub fn detail_rows(records: &[&ReconciledRecord]) -> Vec<Vec<String>> {
    let mut header: Vec<String> = ["ResourceType", "ResourceName", "ResourceID", "ARN", "owned"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend(Source::ALL.iter().map(|s| s.as_str().to_string()));

    let mut rows = vec![header];
    for record in records {
        let mut row = vec![
            or_dash(&record.resource_type),
            or_dash(&record.resource_name),
            or_dash(&record.resource_id),
            or_dash(&record.arn),
            record.owned().to_string(),
        ];
        row.extend(Source::ALL.iter().map(|s| record.source(*s).to_string()));
        rows.push(row);
    }
    rows
}

pub fn write_detail(out: &mut impl Write, rows: &[Vec<String>], format: DetailFormat) -> Result<()> {
    let delimiter = match format {
        DetailFormat::SpaceSeparated => b' ',
        DetailFormat::TabSeparated => b'\t',
        DetailFormat::Csv => b',',
        DetailFormat::Table => {
            out.write_all(render_table(rows).as_bytes())?;
            return Ok(());
        }
    };
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(out);
    for row in rows {
        writer.write_record(row).context("failed to write detail row")?;
    }
    writer.flush()?;
    Ok(())
}

/// Pad every column to its widest cell.
fn render_table(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            rows.iter()
                .filter_map(|r| r.get(c))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        out.push_str(cells.join(" | ").trim_end());
        out.push('\n');
    }
    out
}
