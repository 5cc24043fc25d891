//! Head tilt quiz: answer two-choice questions by tilting your head.

use anyhow::{Context, Result};
use clap::Parser;
use head_tilt_quiz::app::{AppConfig, FrameSource, RunMode, TiltApp};
use head_tilt_quiz::config::Config;
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON-lines pose frames to replay ("-" for stdin)
    #[arg(short, long, default_value = "-")]
    frames: String,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Seconds a tilt must be held before it can be confirmed
    #[arg(short, long)]
    ready_threshold: Option<f64>,

    /// Run mode (quiz, monitor)
    #[arg(short, long, default_value = "quiz")]
    mode: String,

    /// Seed for question order
    #[arg(long)]
    seed: Option<u64>,

    /// Print the example configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if args.print_config {
        print!("{}", head_tilt_quiz::config::EXAMPLE_CONFIG);
        return Ok(());
    }

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Head Tilt Quiz");

    // Load configuration if provided
    let mut settings = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::from_file(path).with_context(|| format!("Failed to load config {}", path.display()))?
        }
        None => Config::default(),
    };

    // Command line overrides
    if let Some(threshold) = args.ready_threshold {
        settings.selector.ready_threshold = threshold;
    }
    if args.seed.is_some() {
        settings.game.seed = args.seed;
    }
    settings.validate().context("Invalid configuration")?;

    let config = AppConfig {
        source: match args.frames.as_str() {
            "-" => FrameSource::Stdin,
            path => FrameSource::File(PathBuf::from(path)),
        },
        mode: match args.mode.as_str() {
            "monitor" => RunMode::Monitor,
            _ => RunMode::Quiz,
        },
        settings,
    };

    // Create and run application
    let mut app = TiltApp::new(config)?;
    app.run()?;

    Ok(())
}
