//! Tendroid CLI
//!
//! Inspect approach zones, validate config files, print the config schema and
//! run scripted recovery scenarios.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use tendroid_core::{ProximityDetector, RecoveryConfig};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "tendroid_cli")]
#[command(about = "Contact and recovery tooling for tendroid obstacles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Print zone thresholds in centimeters
    Zones {
        /// Config file (.json / .yaml / .yml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Preset name (default, small_agent, large_agent, sensitive)
        #[arg(long)]
        preset: Option<String>,

        /// Also classify this surface distance (m)
        #[arg(long)]
        probe: Option<f32>,
    },

    /// Load and validate a config file
    Validate {
        /// Config file path
        file: PathBuf,

        /// Print the resolved config as YAML
        #[arg(long, default_value = "false")]
        print: bool,
    },

    /// Print the JSON schema of the config file format
    Schema,

    /// Run a scripted contact scenario
    Simulate {
        /// Scenario name (bump, linger, double_tap, stiff_obstacle, shove)
        scenario: String,

        /// Config file (.json / .yaml / .yml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Preset name
        #[arg(long)]
        preset: Option<String>,

        /// Frame step in seconds
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,

        /// Print one JSON line per frame instead of the summary
        #[arg(long, default_value = "false")]
        frames: bool,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Zones { config, preset, probe } => {
            let cfg = tendroid_cli::resolve_config(config.as_deref(), preset.as_deref())?;
            print_zones(&cfg, probe)?;
        }

        Commands::Validate { file, print } => {
            let cfg = tendroid_cli::load_config(&file)?;
            println!("✅ {} is valid", file.display());
            if print {
                print!("{}", serde_yaml::to_string(&cfg)?);
            }
        }

        Commands::Schema => {
            println!("{}", RecoveryConfig::json_schema_string());
        }

        Commands::Simulate { scenario, config, preset, dt, frames } => {
            let scenario = tendroid_cli::Scenario::from_name(&scenario)?;
            let cfg = tendroid_cli::resolve_config(config.as_deref(), preset.as_deref())?;
            let sim = tendroid_cli::run_scenario(&scenario, cfg, dt)?;
            if frames {
                for record in &sim.frames {
                    println!("{}", serde_json::to_string(record)?);
                }
            } else {
                println!("{}", serde_json::to_string_pretty(&sim.summary)?);
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[cfg(feature = "cli")]
fn print_zones(cfg: &RecoveryConfig, probe: Option<f32>) -> Result<()> {
    let detector = ProximityDetector::from_config(cfg)?;
    println!("Approach zones (distance from surface):");
    let mut lower = 0.0;
    for band in tendroid_cli::zone_bands(&cfg.approach) {
        match band.upper_cm {
            Some(upper) => {
                println!("   {:<12} {:>7.1} - {:>7.1} cm", band.zone, lower, upper);
                lower = upper;
            }
            None => println!("   {:<12} {:>7.1} cm and beyond", band.zone, lower),
        }
    }
    if let Some(distance) = probe {
        let zone = detector.classify(distance);
        println!(
            "\n{:.3} m -> {} (push {:.2})",
            distance,
            zone.name(),
            detector.forces().strength(zone)
        );
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("tendroid_cli is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
