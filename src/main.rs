use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use pyramidplot::data::{fixtures, loader};
use pyramidplot::{ChartConfig, ChartKind, Cohort, PopulationChart, Result, ScenarioSeries};

#[derive(Parser, Debug)]
#[command(
    name = "pyramidplot",
    about = "Render age/gender population pyramids from scenario series"
)]
struct Cli {
    /// JSON chart configuration; missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// CSV of female scenario series (age column, one column per scenario).
    #[arg(long)]
    female: Option<PathBuf>,
    /// CSV of male scenario series.
    #[arg(long)]
    male: Option<PathBuf>,
    /// Chart kind, overriding the configuration.
    #[arg(long, value_enum)]
    chart: Option<ChartKind>,
    /// Render every chart kind, one file each.
    #[arg(long, conflicts_with = "chart")]
    all: bool,
    #[arg(long, short, default_value = "pyramid.png")]
    output: PathBuf,
    /// Print per-bucket statistics.
    #[arg(long)]
    report: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => ChartConfig::load(path)?,
        None => ChartConfig::default(),
    };
    if let Some(kind) = cli.chart {
        config.chart = kind;
    }

    let female = scenarios(cli.female.as_deref(), Cohort::Female)?;
    let male = scenarios(cli.male.as_deref(), Cohort::Male)?;

    let kinds: Vec<ChartKind> = if cli.all {
        ChartKind::ALL.to_vec()
    } else {
        vec![config.chart]
    };

    for kind in kinds {
        let chart = PopulationChart::build(ChartConfig { chart: kind, ..config.clone() }, &female, &male)?;
        if cli.report {
            print!("{}", chart.report());
        }

        let path = if cli.all {
            output_for(&cli.output, kind)
        } else {
            cli.output.clone()
        };
        chart.rasterize().save(&path)?;
        tracing::info!("{} written to {:?}", kind.label(), path);
    }
    Ok(())
}

fn scenarios(path: Option<&Path>, cohort: Cohort) -> Result<Vec<ScenarioSeries>> {
    match path {
        Some(path) => loader::load_csv(path),
        None => {
            tracing::info!("No {} data given, using default scenarios", cohort.label());
            Ok(fixtures::default_scenarios(cohort))
        }
    }
}

/// `pyramid.png` → `pyramid-box-plot.png`.
fn output_for(base: &Path, kind: ChartKind) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pyramid".to_string());
    let ext = base
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());
    let suffix = match kind {
        ChartKind::BoxPlot => "box-plot",
        ChartKind::DispersionBand => "dispersion-band",
        ChartKind::FiveNumberBand => "five-number-band",
    };
    base.with_file_name(format!("{stem}-{suffix}.{ext}"))
}
