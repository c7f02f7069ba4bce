//! Salinity viewer.
//!
//! Loads the drifter campaign once, serves a single map request and writes
//! the map layer, legend and comparative diagram to the output directory.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use map_pipeline::{augment_derived, DisplayMode, MapLayer, Pipeline, PointSource, Request};
use ocean_common::{Channel, ChannelStats, TimeWindow};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use salinity_viewer::config::ViewerConfig;
use salinity_viewer::output::FileSinks;
use salinity_viewer::source::JsonFileSource;

#[derive(Parser, Debug)]
#[command(name = "salinity-viewer")]
#[command(about = "Classify one day of drifter samples into contour or point maps")]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "VIEWER_CONFIG")]
    config: Option<PathBuf>,

    /// Window start, e.g. 2013-06-01 or 2013-06-01T06:00
    #[arg(short, long, default_value = "2013-06-01")]
    start: String,

    /// Classification pivot (default from config)
    #[arg(short, long)]
    pivot: Option<f64>,

    /// Gaussian smoothing strength in grid steps (default from config)
    #[arg(long)]
    smoothing: Option<f64>,

    /// Draw colored points instead of contours
    #[arg(long)]
    points: bool,

    /// Channel id to classify, 1-7 (default from config)
    #[arg(long)]
    channel: Option<u8>,

    /// Point dump path (overrides config)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Output directory (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level (overrides config)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut config = ViewerConfig::load(args.config.as_deref())?;
    if let Some(data) = &args.data {
        config.data_path = data.clone();
    }
    if let Some(output) = &args.output {
        config.output_dir = output.clone();
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }

    init_tracing(&config)?;
    info!("Starting salinity viewer");

    let start = TimeWindow::parse_start(&args.start)
        .with_context(|| format!("Invalid --start {:?}", args.start))?;
    if !config.time_bounds.contains(&start) {
        bail!(
            "Window start {} is outside the dataset ({} to {})",
            start,
            config.time_bounds.min,
            config.time_bounds.max
        );
    }

    let load_start = Instant::now();
    let source = JsonFileSource::new(&config.data_path);
    let mut points = source.load()?;
    let augmented = augment_derived(&mut points);
    if augmented < 2 {
        warn!(augmented = augmented, "Some derived samples carry no channel values");
    }
    let stats = ChannelStats::from_samples(points.union());

    let channel = match args.channel {
        Some(id) => Channel::from_id(id)?,
        None => config.pipeline.channel,
    };
    let (pivot_min, pivot_max) = stats.pivot_range(channel);
    info!(
        samples = stats.sample_count(),
        pivot_min = pivot_min,
        pivot_max = pivot_max,
        elapsed_ms = load_start.elapsed().as_millis() as u64,
        "Dataset ready"
    );

    let window = TimeWindow::day_starting(start);
    let mut request = Request::new(window, &config.pipeline);
    request.channel = channel;
    if let Some(pivot) = args.pivot {
        request = request.with_pivot(pivot);
    }
    if let Some(smoothing) = args.smoothing {
        request = request.with_smoothing(smoothing);
    }
    if args.points {
        request = request.with_mode(DisplayMode::Points);
    }

    let pipeline = Pipeline::new(config.pipeline.clone());
    let outcome = pipeline.update(&points, &stats, &request)?;

    let mut sinks = FileSinks::create(&config.output_dir)?;
    let mut diagram_sink = sinks.clone();
    pipeline.render(&outcome, &mut sinks, &mut diagram_sink)?;

    let drawn = match &outcome.layer {
        MapLayer::Empty => 0,
        MapLayer::Contours(regions) => regions.len(),
        MapLayer::Points(markers) => markers.len(),
    };
    info!(
        window = %window,
        selected = outcome.selected,
        drawn = drawn,
        previous_day = config.time_bounds.can_shift(&window, -1),
        next_day = config.time_bounds.can_shift(&window, 1),
        output = %config.output_dir.display(),
        "Request rendered"
    );

    Ok(())
}

fn init_tracing(config: &ViewerConfig) -> Result<()> {
    let level = match config.logging.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if config.logging.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}
