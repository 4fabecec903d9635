//! Command-line tools for tuning the aura effect offline

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use site_aura::config::SiteConfig;
use site_aura::aura::TrackerSettings;
use site_aura::replay::{load_script, play_live, replay_file};
use std::path::PathBuf;

/// Site Aura - replay, play and inspect aura sessions
#[derive(Parser)]
#[command(name = "site-aura")]
#[command(version)]
#[command(about = "Replay cursor aura sessions and inspect configuration", long_about = None)]
struct Cli {
    /// JSON configuration file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scripted session and write per-frame aura positions
    Replay {
        /// Script with elements and timestamped input
        script: PathBuf,

        /// Output file for the frames
        #[arg(long, default_value = "frames.json")]
        out: PathBuf,

        /// Simulated frame rate
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
    },
    /// Play a scripted session in real time on the frame driver and print
    /// where each aura settled
    Live {
        /// Script with elements and timestamped input
        script: PathBuf,
    },
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<SiteConfig> {
    match path {
        Some(path) => SiteConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(SiteConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    site_aura::init_logging();

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Replay { script, out, fps } => {
            let frames = replay_file(&script, &out, &config, fps)
                .with_context(|| format!("Failed to replay {}", script.display()))?;
            println!("Wrote {} frames to {}", frames, out.display());
        }
        Commands::Live { script } => {
            let session = load_script(&script)
                .with_context(|| format!("Failed to read {}", script.display()))?;
            let settings = TrackerSettings::from_config(&config.aura)?;
            let runtime = tokio::runtime::Runtime::new()?;
            let samples = runtime
                .block_on(play_live(&session, settings, config.aura.frame_interval()))
                .context("Live session failed")?;
            println!("{}", serde_json::to_string_pretty(&samples)?);
        }
        Commands::Config { show } => {
            if show {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Usage: site-aura config --show");
            }
        }
    }

    Ok(())
}
