mod app;
mod color;
mod config;
mod data;
mod pipeline;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use config::{parse_standard_energy, Config};
use data::revision::revise_dataset;
use state::AppState;

#[derive(Parser)]
#[command(
    name = "rusty-xps",
    about = "Calibrate an XPS text export against a reference peak and write per-category results"
)]
struct Cli {
    /// XPS text export to process
    input: PathBuf,

    /// Standard energy of the reference peak in eV [default: 284.6]
    #[arg(value_parser = parse_standard_energy)]
    standard_energy: Option<f64>,

    /// Category whose peak anchors the calibration [default: C]
    #[arg(long)]
    reference_label: Option<String>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write results here instead of next to the input
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Open the spectrum viewer after writing results
    #[arg(long)]
    plot: bool,

    /// Enable verbose debug output
    #[arg(long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    if let Some(energy) = cli.standard_energy {
        config.standard_energy = energy;
    }
    if let Some(label) = &cli.reference_label {
        config.reference_label = label.clone();
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli).context("loading configuration")?;
    println!("------>  The file to process is {}", cli.input.display());
    println!(
        "------>  The standard energy of {} is set to {}",
        config.reference_label, config.standard_energy
    );

    let out = pipeline::run(&cli.input, cli.out_dir.as_deref(), &config)?;

    let names: Vec<&str> = out.dataset.iter().map(|c| c.display_name()).collect();
    println!("------>  Found categories: {names:?}");
    println!("------>  max position is {}", out.calibration.peak_energy);
    println!("------>  delta is {}", out.calibration.offset.delta);
    for path in &out.written {
        println!("------>  wrote {}", path.display());
    }

    if cli.plot {
        let revised = revise_dataset(&out.dataset, out.calibration.offset);
        let series = pipeline::plot_series(&revised, &config);
        let state = AppState::new(cli.input.display().to_string(), series, out.calibration.clone());
        app::show(state).map_err(|e| anyhow::anyhow!("spectrum viewer failed: {e}"))?;
    }

    Ok(())
}
