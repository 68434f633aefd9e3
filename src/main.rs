use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use manhattan::data::points::{prepare_points, prepare_points_json, PreparedData};
use manhattan::{ManhattanConfig, ManhattanPlot, RawRecord, Size};

#[derive(Parser, Debug)]
#[command(
    name = "manhattan",
    about = "Interactive Manhattan plot with draggable point annotations"
)]
struct Cli {
    /// JSON array of records (`id`, `pValue`, optional `color`, `annotated`, extra fields)
    #[arg(long)]
    data: Option<PathBuf>,
    /// Plot configuration (YAML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write the plot as SVG and exit without opening a window
    #[arg(long)]
    export_svg: Option<PathBuf>,
    /// Write the plot as PNG and exit without opening a window
    #[arg(long)]
    export_png: Option<PathBuf>,
    /// Canvas width for headless export
    #[arg(long, default_value_t = 1000.0)]
    width: f64,
    /// Canvas height for headless export
    #[arg(long, default_value_t = 600.0)]
    height: f64,
}

const CHROMOSOME_COLORS: [&str; 2] = ["steelblue", "grey"];

/// Deterministic demo dataset: 22 "chromosomes" with a few strong peaks.
fn demo_records() -> Vec<RawRecord> {
    let mut out = Vec::new();
    for chr in 1..=22usize {
        let color = CHROMOSOME_COLORS[chr % 2];
        for k in 0..12usize {
            let i = (chr - 1) * 12 + k;
            let noise = ((i as f64 * 0.731).sin() * (i as f64 * 0.117).cos()).abs();
            let peak = if k == 6 && chr % 5 == 0 { 5.0 } else { 0.0 };
            let p = 10f64.powf(-(noise * 3.0 + peak + 0.05));
            out.push(
                RawRecord::new(format!("rs{}", 1000 + i), p)
                    .with_color(color)
                    .annotated(peak > 0.0 && chr == 10)
                    .with_field("chr", chr as u64)
                    .with_field("pos", (k as u64 + 1) * 1_250_000),
            );
        }
    }
    out
}

fn load_records(path: &Path) -> manhattan::Result<PreparedData> {
    prepare_points_json(&std::fs::read_to_string(path)?)
}

fn run(cli: Cli) -> manhattan::Result<()> {
    let config = match &cli.config {
        Some(path) => ManhattanConfig::load_from_path(path)?,
        None => ManhattanConfig {
            title: Some("Demo Manhattan Plot".to_string()),
            significance_threshold: Some(5e-8),
            show_download_button: true,
            show_export_annotations_button: true,
            ..ManhattanConfig::default()
        },
    };
    let prepared = match &cli.data {
        Some(path) => load_records(path)?,
        None => {
            tracing::info!("no --data given, using demo dataset");
            prepare_points(demo_records())
        }
    };

    let plot = ManhattanPlot::from_prepared(prepared, config, Size::new(cli.width, cli.height));
    if !plot.rejected().is_empty() {
        tracing::warn!(count = plot.rejected().len(), "some rows were not plotted");
    }

    if cli.export_svg.is_some() || cli.export_png.is_some() {
        if let Some(path) = &cli.export_svg {
            plot.save_svg(path)?;
        }
        if let Some(path) = &cli.export_png {
            plot.save_png(path)?;
        }
        return Ok(());
    }

    manhattan::run_manhattan(plot)?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "manhattan failed");
            ExitCode::FAILURE
        }
    }
}
