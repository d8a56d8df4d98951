use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use grapher_rs::legend::{DEFAULT_FONT_PX, DEFAULT_PADDING, DEFAULT_ROW_HEIGHT};
use grapher_rs::{
    AdaptOutcome, ApproximateMeasurer, ChartConfig, ColorCache, DataPayload, LegendPacker,
    RenderableChartModel, Viewport, storage,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "grapher",
    version,
    about = "Adapt fetched series to a chart configuration and lay out its legend"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the renderable chart model (or the invalid-configuration result) as JSON.
    Adapt(AdaptArgs),
    /// Print the packed legend layout as JSON.
    Legend(LegendArgs),
    /// Write the adapted series as a table, without gap-fill points.
    Export(ExportArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Data payload JSON (`{ data: [{ id, key, values }], timeType, dimensions }`).
    #[arg(long)]
    data: PathBuf,
    /// Chart configuration JSON.
    #[arg(long)]
    config: PathBuf,
    /// Seed for generated entity colors (random if omitted).
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct AdaptArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Viewport width in pixels.
    #[arg(long, default_value_t = 1100.0)]
    width: f64,
    /// Viewport height in pixels.
    #[arg(long, default_value_t = 660.0)]
    height: f64,
}

#[derive(Args, Debug)]
struct LegendArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Width available to the legend.
    #[arg(long, default_value_t = 1100.0)]
    width: f64,
    #[arg(long, default_value_t = DEFAULT_PADDING)]
    padding: f64,
    #[arg(long, default_value_t = DEFAULT_ROW_HEIGHT)]
    row_height: f64,
    #[arg(long, default_value_t = DEFAULT_FONT_PX)]
    font_px: f64,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Output file.
    #[arg(long)]
    out: PathBuf,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Adapt(args) => cmd_adapt(args),
        Command::Legend(args) => cmd_legend(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn load_inputs(input: &InputArgs, viewport: Viewport) -> Result<AdaptOutcome> {
    let payload = DataPayload::load(&input.data)
        .with_context(|| format!("reading data payload {}", input.data.display()))?;
    let mut config = ChartConfig::load(&input.config)
        .with_context(|| format!("reading chart config {}", input.config.display()))?;
    if config.dimensions.is_empty() {
        config.dimensions = payload.dimensions.clone();
    }

    let series = payload.to_series(config.chart_type);
    let mut cache = match input.seed {
        Some(seed) => ColorCache::seeded(seed),
        None => ColorCache::new(),
    };
    Ok(grapher_rs::adapt(&series, &config, &viewport, &mut cache))
}

fn ready_model(outcome: AdaptOutcome) -> Result<RenderableChartModel> {
    match outcome {
        AdaptOutcome::Ready(model) => Ok(model),
        AdaptOutcome::Invalid(reason) => Err(anyhow::anyhow!(reason)),
    }
}

fn cmd_adapt(args: AdaptArgs) -> Result<()> {
    let viewport = Viewport {
        width: args.width,
        height: args.height,
    };
    let outcome = load_inputs(&args.input, viewport)?;
    if let AdaptOutcome::Invalid(reason) = &outcome {
        eprintln!("Nothing to render: {reason}");
    }
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn cmd_legend(args: LegendArgs) -> Result<()> {
    let model = ready_model(load_inputs(&args.input, Viewport::default())?)?;
    let measurer = ApproximateMeasurer;
    let layout = LegendPacker::new(&measurer).with_font_px(args.font_px).pack(
        &model.legend_entries(),
        args.width,
        args.padding,
        args.row_height,
    );
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}

fn cmd_export(args: ExportArgs) -> Result<()> {
    let model = ready_model(load_inputs(&args.input, Viewport::default())?)?;
    let rows = storage::table_rows(&model.series);
    let path: &Path = &args.out;
    let fmt = match args.format {
        Some(OutFormat::Csv) => "csv",
        Some(OutFormat::Json) => "json",
        None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
    }
    .to_ascii_lowercase();
    match fmt.as_str() {
        "csv" => storage::save_csv(&rows, path)?,
        "json" => storage::save_json(&rows, path)?,
        other => anyhow::bail!("unsupported format: {}", other),
    }
    eprintln!("Saved {} rows to {}", rows.len(), path.display());
    Ok(())
}
