//! IaC Reconciler CLI
//!
//! The `iac-reconcile` command compares an AWS Config snapshot against
//! Terraform state and reports what is managed, owned, or unaccounted for.
//!
//! ## Commands
//!
//! - `summarize`: Totals per source plus the run fingerprint
//! - `resources`: Counts per resource type
//! - `detail`: One row per reconciled resource

mod render;

use std::cmp::Ordering;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use iac_reconcile_core::{
    summarize, ReconciledRecord, Reconciliation, Source, TypeMap, TypeSummary,
};
use tracing::{info, Level};

use render::{DetailFormat, SummaryFormat, SummaryReport};

#[derive(Parser)]
#[command(name = "iac-reconcile")]
#[command(author = "IaC Reconciler Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Reconcile AWS Config inventory against Terraform state", long_about = None)]
struct Cli {
    /// AWS Config snapshot file
    #[arg(long, global = true, env = "IAC_RECONCILE_SNAPSHOT")]
    aws_config: Option<PathBuf>,

    /// Terraform state file, or a directory with --tf-recursive
    #[arg(long, global = true, env = "IAC_RECONCILE_TERRAFORM")]
    terraform: Option<PathBuf>,

    /// Walk --terraform as a directory and load every *.tfstate below it
    #[arg(long, global = true)]
    tf_recursive: bool,

    /// Type translation table overriding the built-in one
    #[arg(long, global = true, env = "IAC_RECONCILE_TYPEMAP")]
    typemap: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Totals per source, number of state files and the run fingerprint
    Summarize {
        #[arg(long, value_enum, default_value = "text")]
        format: SummaryFormat,
    },

    /// Counts per resource type
    Resources {
        #[command(flatten)]
        order: OrderArgs,
    },

    /// One row per reconciled resource, optionally limited to some types
    Detail {
        /// Resource types to include (default: all)
        types: Vec<String>,

        #[command(flatten)]
        order: OrderArgs,

        #[arg(long, value_enum, default_value = "space-separated")]
        format: DetailFormat,
    },
}

#[derive(clap::Args, Debug, Clone)]
struct OrderArgs {
    /// resource-name, count-total, count-both, count-single or count-<source>
    #[arg(long, default_value = "resource-name")]
    sort: SortKey,

    /// Sort descending instead of ascending
    #[arg(long)]
    descending: bool,

    /// Keep the first N rows; negative keeps the last N; 0 keeps all
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    top: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortKey {
    ResourceName,
    CountTotal,
    CountBoth,
    CountSingle,
    CountSource(Source),
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "resource-name" => Ok(SortKey::ResourceName),
            "count-total" => Ok(SortKey::CountTotal),
            "count-both" => Ok(SortKey::CountBoth),
            "count-single" => Ok(SortKey::CountSingle),
            other => other
                .strip_prefix("count-")
                .and_then(Source::parse)
                .map(SortKey::CountSource)
                .ok_or_else(|| format!("unknown sort key: {other}")),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    iac_reconcile_core::init_tracing(cli.json, level);

    let reconciliation = run_reconcile(&cli)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Summarize { format } => cmd_summarize(&mut out, &reconciliation, format),
        Commands::Resources { order } => cmd_resources(&mut out, &reconciliation, &order),
        Commands::Detail {
            types,
            order,
            format,
        } => cmd_detail(&mut out, &reconciliation, &types, &order, format),
    }
}

fn required<'a>(value: Option<&'a Path>, flag: &str) -> Result<&'a Path> {
    match value {
        Some(path) => Ok(path),
        None => bail!("missing required flag --{flag}"),
    }
}

fn load_types(path: Option<&Path>) -> Result<TypeMap> {
    match path {
        Some(path) => TypeMap::from_path(path)
            .with_context(|| format!("Failed to load type map: {:?}", path)),
        None => TypeMap::builtin().context("Built-in type map is invalid"),
    }
}

fn run_reconcile(cli: &Cli) -> Result<Reconciliation> {
    let snapshot_path = required(cli.aws_config.as_deref(), "aws-config")?;
    let terraform_path = required(cli.terraform.as_deref(), "terraform")?;

    let types = load_types(cli.typemap.as_deref())?;
    let snapshot = iac_load::load_snapshot(snapshot_path)
        .with_context(|| format!("Failed to load AWS Config snapshot: {:?}", snapshot_path))?;
    let states = iac_load::load_states(terraform_path, cli.tf_recursive)
        .with_context(|| format!("Failed to load Terraform state: {:?}", terraform_path))?;

    info!(
        items = snapshot.configuration_items.len(),
        state_files = states.len(),
        "inputs loaded"
    );
    Ok(iac_reconcile_core::reconcile(&snapshot, &states, &types))
}

fn cmd_summarize(
    out: &mut impl Write,
    reconciliation: &Reconciliation,
    format: SummaryFormat,
) -> Result<()> {
    let summary = summarize(reconciliation);
    let report = SummaryReport {
        summary: &summary,
        state_files: reconciliation.state_files(),
        fingerprint: reconciliation.fingerprint(),
    };
    render::write_summary(out, &report, format)
}

fn cmd_resources(out: &mut impl Write, reconciliation: &Reconciliation, order: &OrderArgs) -> Result<()> {
    let summary = summarize(reconciliation);
    let mut rows: Vec<&TypeSummary> = summary.by_type.iter().collect();
    rows.sort_by(|a, b| compare_types(a, b, order.sort));
    if order.descending {
        rows.reverse();
    }
    let rows = apply_top(&rows, order.top);
    render::write_resources(out, rows)
}

fn cmd_detail(
    out: &mut impl Write,
    reconciliation: &Reconciliation,
    types: &[String],
    order: &OrderArgs,
    format: DetailFormat,
) -> Result<()> {
    let mut records: Vec<&ReconciledRecord> = reconciliation
        .visible()
        .filter(|r| types.is_empty() || types.iter().any(|t| *t == r.resource_type))
        .collect();
    records.sort_by(|a, b| compare_records(a, b, order.sort));
    if order.descending {
        records.reverse();
    }
    let records = apply_top(&records, order.top);
    render::write_detail(out, &render::detail_rows(records), format)
}

/// Counts sort ascending; ties fall back to the type name.
fn compare_types(a: &TypeSummary, b: &TypeSummary, key: SortKey) -> Ordering {
    let by_count = match key {
        SortKey::ResourceName => Ordering::Equal,
        SortKey::CountTotal => a.count.cmp(&b.count),
        SortKey::CountBoth => a.both.cmp(&b.both),
        SortKey::CountSingle => a.single_only.cmp(&b.single_only),
        SortKey::CountSource(source) => a
            .source_count(source.as_str())
            .cmp(&b.source_count(source.as_str())),
    };
    by_count.then_with(|| a.resource_type.cmp(&b.resource_type))
}

/// Records carrying the flag sort first; ties fall back to type, name, id.
fn compare_records(a: &ReconciledRecord, b: &ReconciledRecord, key: SortKey) -> Ordering {
    let both = |r: &ReconciledRecord| r.in_inventory() && r.in_declarative_state();
    let flag = |r: &ReconciledRecord| match key {
        SortKey::ResourceName | SortKey::CountTotal => false,
        SortKey::CountBoth => both(r),
        SortKey::CountSingle => !both(r),
        SortKey::CountSource(source) => r.source(source),
    };
    flag(b)
        .cmp(&flag(a))
        .then_with(|| a.resource_type.cmp(&b.resource_type))
        .then_with(|| a.resource_name.cmp(&b.resource_name))
        .then_with(|| a.resource_id.cmp(&b.resource_id))
}

/// Positive keeps the first `top`, negative the last `-top`; clamps to the
/// slice length.
fn apply_top<T>(rows: &[T], top: i64) -> &[T] {
    let limit = usize::try_from(top.unsigned_abs()).unwrap_or(usize::MAX).min(rows.len());
    match top.cmp(&0) {
        Ordering::Greater => &rows[..limit],
        Ordering::Less => &rows[rows.len() - limit..],
        Ordering::Equal => rows,
    }
}
