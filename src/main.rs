use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ocs_palette::models::{AppConfig, Bitplanes, DitherMode, EdgePolicy, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};
use ocs_palette::rendering::{read_png, requantize_buffer, write_png};
use ocs_palette::services::{
    replace_layer, LayerStack, OcsPipeline, PaletteQuantizer, TracingProgress, UndoGroup,
};

#[derive(Parser)]
#[command(name = "ocs-palette")]
#[command(about = "Reduce images to an Amiga OCS style palette")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $OCS_PALETTE_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log pipeline stages and progress
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full palette reduction on a PNG
    Convert {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Dither mode: 0-3 or none, floyd-steinberg, floyd-steinberg-reduced-bleed, positioned
        #[arg(short, long)]
        dither: Option<DitherMode>,

        /// Bitplanes (1-5), the image gets at most 2^bitplanes colors
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
        bitplanes: Option<u8>,

        /// Also requantize the rightmost column
        #[arg(long)]
        full_width: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Only round channels to 16 levels, without palette reduction
    Requantize {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Also requantize the rightmost column
        #[arg(long)]
        full_width: bool,
    },
    /// Write a config file with the default settings
    Init {
        /// Target path
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = AppConfig::resolve_path(cli.config);

    match cli.command {
        None => run_status_command(config_path.as_deref()),
        Some(Commands::Convert {
            input,
            output,
            dither,
            bitplanes,
            full_width,
            json,
        }) => {
            let mut config = AppConfig::load(config_path.as_deref())?;
            if let Some(dither) = dither {
                config.dither = dither;
            }
            if let Some(planes) = bitplanes {
                config.bitplanes = Bitplanes::new(planes)?;
            }
            if full_width {
                config.edge_policy = EdgePolicy::FullWidth;
            }
            run_convert_command(&config, &input, &output, json)
        }
        Some(Commands::Requantize {
            input,
            output,
            full_width,
        }) => {
            let mut config = AppConfig::load(config_path.as_deref())?;
            if full_width {
                config.edge_policy = EdgePolicy::FullWidth;
            }
            run_requantize_command(&config, &input, &output)
        }
        Some(Commands::Init { path, force }) => run_init_command(&path, force),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "ocs_palette=debug,ocs_quantize=debug"
    } else {
        "ocs_palette=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run_convert_command(
    config: &AppConfig,
    input: &Path,
    output: &Path,
    json: bool,
) -> anyhow::Result<()> {
    let mut image = read_png(input)?;
    let layer = image
        .top_layer()
        .map(|l| l.id)
        .ok_or_else(|| anyhow::anyhow!("{} has no layers", input.display()))?;

    let mut pipeline = OcsPipeline::new(PaletteQuantizer::new(), config.params());
    let report = pipeline.run(&mut image, layer, &mut TracingProgress::new())?;

    write_png(&image, output, config.optimize_png)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} -> {}: layer \"{}\", {} colors ({} bitplanes), dither {}",
            input.display(),
            output.display(),
            report.derived_name,
            report.colors,
            report.bitplanes,
            report.dither,
        );
    }
    Ok(())
}

fn run_requantize_command(config: &AppConfig, input: &Path, output: &Path) -> anyhow::Result<()> {
    let mut image = read_png(input)?;
    let layer = image
        .top_layer()
        .map(|l| l.id)
        .ok_or_else(|| anyhow::anyhow!("{} has no layers", input.display()))?;

    let mut progress = TracingProgress::new();
    {
        let mut group = UndoGroup::begin(&mut image, "Requantize")?;
        let buffer = group.read_region(layer)?;
        let requantized = requantize_buffer(&buffer, config.edge_policy, &mut progress)?;
        replace_layer(&mut *group, layer, requantized, &config.layer_prefix)?;
        group.commit()?;
    }

    write_png(&image, output, config.optimize_png)?;
    println!("{} -> {}", input.display(), output.display());
    Ok(())
}

fn run_init_command(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        eprintln!("{} already exists, use --force to overwrite", path.display());
        std::process::exit(1);
    }

    let yaml = AppConfig::default().to_yaml()?;
    std::fs::write(path, yaml)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn run_status_command(config_path: Option<&Path>) -> anyhow::Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("ocs-palette v{VERSION}");
    println!("Amiga OCS palette reduction for PNG images\n");

    println!("Environment Variables:");
    println!(
        "  {CONFIG_ENV_VAR} = {}",
        std::env::var(CONFIG_ENV_VAR).as_deref().unwrap_or("(not set)")
    );

    let source = match config_path {
        Some(path) if path.exists() => path.display().to_string(),
        Some(path) => format!("{} (not found, using defaults)", path.display()),
        None => "defaults".to_string(),
    };
    println!("\nConfig: {source}\n");

    let config = AppConfig::load(config_path)?;
    print!("{}", config.to_yaml()?);

    println!("\nRun 'ocs-palette --help' for commands.");
    Ok(())
}
