use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use floodjoin::config::FileConfig;
use floodjoin::{Pipeline, RunSummary};

/// Assign flood depths to transport network links
///
/// Buffers every link of the network by half its width, joins the buffered
/// corridors against flood-extent polygons and writes the maximum flood depth
/// per link.
///
/// Examples:
///   # Run with the default file names in the current directory
///   floodjoin
///
///   # Explicit inputs and outputs
///   floodjoin -n network.geojson -f depth30.geojson -o out/floods.csv --corridors out/network_buf.geojson
///
///   # Use a config file
///   floodjoin --config my-run.toml
#[derive(Parser, Debug)]
#[command(name = "floodjoin")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches floodjoin.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Network links (GeoJSON FeatureCollection of lines)
    #[arg(short = 'n', long)]
    network: Option<PathBuf>,

    /// Flood extents (GeoJSON FeatureCollection of polygons)
    #[arg(short = 'f', long)]
    floods: Option<PathBuf>,

    /// Output depth table (CSV)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output buffered corridor layer (GeoJSON)
    #[arg(long)]
    corridors: Option<PathBuf>,

    /// Link id attribute in the network layer
    #[arg(long)]
    id_field: Option<String>,

    /// Link width attribute in the network layer
    #[arg(long)]
    width_field: Option<String>,

    /// Depth band attribute in the flood layer
    #[arg(long)]
    band_field: Option<String>,

    /// CRS of the network, written to the corridor layer (e.g. EPSG:27700)
    #[arg(long)]
    crs: Option<String>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Args {
    /// Command line values take precedence over the config file
    fn apply(self, mut config: FileConfig) -> FileConfig {
        if let Some(network) = self.network {
            config.network = network;
        }
        if let Some(floods) = self.floods {
            config.floods = floods;
        }
        if let Some(output) = self.output {
            config.depth_table = output;
        }
        if let Some(corridors) = self.corridors {
            config.corridor_layer = corridors;
        }
        if let Some(id_field) = self.id_field {
            config.id_field = id_field;
        }
        if let Some(width_field) = self.width_field {
            config.width_field = width_field;
        }
        if let Some(band_field) = self.band_field {
            config.band_field = band_field;
        }
        if let Some(crs) = self.crs {
            config.crs = crs;
        }
        config.verbose |= self.verbose;
        config
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let (config_source, file_config) = if let Some(ref config_path) = args.config {
        if !config_path.is_file() {
            bail!("Config file not found: {:?}", config_path);
        }
        let config = FileConfig::from_path(config_path)
            .context(format!("Failed to read config file: {:?}", config_path))?;
        (Some(config_path.clone()), config)
    } else {
        match FileConfig::load().context("Failed to load config file")? {
            Some((path, config)) => (Some(path), config),
            None => (None, FileConfig::default()),
        }
    };

    let file_config = args.apply(file_config);
    let verbose = file_config.verbose;
    init_logging(verbose);

    let config = file_config
        .into_run_config()
        .context("Invalid configuration")?;

    println!("floodjoin - Flood Depth Network Join");
    println!("====================================");
    println!();

    if verbose {
        println!("Configuration:");
        match config_source {
            Some(ref path) => println!("  Config file: {}", path.display()),
            None => println!("  Config file: none (defaults)"),
        }
        println!("  Network: {}", config.network.display());
        println!("  Floods: {}", config.floods.display());
        println!("  Depth table: {}", config.depth_table.display());
        println!("  Corridor layer: {}", config.corridor_layer.display());
        println!(
            "  Fields: id={}, width={}, band={}",
            config.network_fields.id, config.network_fields.width, config.flood_fields.band
        );
        println!("  CRS: {}", config.crs);
        println!();
    }

    let pipeline = Pipeline::new(config);

    let spinner = create_spinner("Reading inputs and building flood index...");
    let start = Instant::now();
    let inputs = pipeline.load().context("Failed to load inputs")?;
    spinner.finish_with_message(format!(
        "Loaded {} links and {} flood polygons [{:.1}s]",
        inputs.links.len(),
        inputs.index.len(),
        start.elapsed().as_secs_f32()
    ));

    let spinner = create_spinner("Joining link corridors with floods...");
    let start = Instant::now();
    let sink = pipeline.join_all(&inputs);
    spinner.finish_with_message(format!(
        "Joined {} links, {} flooded [{:.1}s]",
        sink.len(),
        sink.flooded(),
        start.elapsed().as_secs_f32()
    ));

    let spinner = create_spinner("Writing outputs...");
    let start = Instant::now();
    pipeline.emit(&sink).context("Failed to write outputs")?;
    spinner.finish_with_message(format!(
        "Wrote depth table and corridor layer [{:.1}s]",
        start.elapsed().as_secs_f32()
    ));

    let summary = pipeline.summarize(&inputs, &sink);

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );
    println!();
    print_summary(&summary);

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("Links:          {}", summary.links);
    println!("Flood polygons: {}", summary.floods);
    println!("Flooded links:  {}", summary.flooded);
    if summary.duplicates > 0 {
        println!(
            "Duplicate ids:  {} (later records overwrote earlier ones)",
            summary.duplicates
        );
    }
    println!();
    println!("Output: {}", summary.depth_table.display());
    println!("        {}", summary.corridor_layer.display());
}

fn init_logging(verbose: bool) {
    let level = if verbose { "floodjoin=debug" } else { "floodjoin=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
