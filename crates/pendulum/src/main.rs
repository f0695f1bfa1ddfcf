//! Command-line front end: integrate a spring pendulum and print or plot it.
//!
//! # Usage
//!
//! ```text
//! sprung                                  # reference scenario, table on stdout
//! sprung --config scenarios/reference.toml --step 0.05
//! sprung --legacy --t-end 10
//! cargo run -p sprung --features plot -- --plot --rates
//! ```

use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use sprung::{Config, IncrementRule, Trajectory, integrate, logging};

#[derive(Parser)]
#[command(name = "sprung")]
#[command(version)]
#[command(about = "Integrate a spring-loaded pendulum with fixed-step RK4", long_about = None)]
struct Cli {
    /// Scenario file (TOML); the built-in reference scenario when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Step size h
    #[arg(long)]
    step: Option<f64>,

    /// Start time
    #[arg(long, allow_hyphen_values = true)]
    t_start: Option<f64>,

    /// End time
    #[arg(long, allow_hyphen_values = true)]
    t_end: Option<f64>,

    /// Advance swing with the stretch stages, as the first version did
    #[arg(long)]
    legacy: bool,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Open a plot window after integrating
    #[arg(long)]
    plot: bool,

    /// Also plot stretch rate and swing rate
    #[arg(long)]
    rates: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let config = build_config(&cli)?;
    let trajectory = integrate(&config).context("integration failed")?;

    info!(
        steps = trajectory.len() - 1,
        h = config.step(),
        increment = ?config.increment(),
        "integration finished"
    );

    print_table(&trajectory).context("failed to write trajectory")?;

    if cli.plot {
        show_plot(&trajectory, &config, cli.rates)?;
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(step) = cli.step {
        config = config.with_step(step)?;
    }
    if cli.t_start.is_some() || cli.t_end.is_some() {
        let t_start = cli.t_start.unwrap_or(config.t_start());
        let t_end = cli.t_end.unwrap_or(config.t_end());
        config = config.with_span(t_start, t_end)?;
    }
    if cli.legacy {
        config = config.with_increment(IncrementRule::Legacy);
    }

    Ok(config)
}

fn print_table(trajectory: &Trajectory) -> io::Result<()> {
    let mut out = BufWriter::new(io::stdout().lock());

    writeln!(out, "# t stretch swing")?;
    for (t, state) in trajectory.rows() {
        writeln!(out, "{t:.6} {:.12} {:.12}", state.stretch, state.swing)?;
    }

    out.flush()
}

#[cfg(feature = "plot")]
fn show_plot(trajectory: &Trajectory, config: &Config, rates: bool) -> Result<()> {
    use sprung::plot::{self, ShowConfig};

    let mut show = ShowConfig::new().title(format!(
        "Spring pendulum (h = {}, {:?} increment)",
        config.step(),
        config.increment()
    ));
    if rates {
        show = show.rates();
    }

    plot::show(trajectory, show).map_err(|err| anyhow::anyhow!("plot window failed: {err}"))
}

#[cfg(not(feature = "plot"))]
fn show_plot(_trajectory: &Trajectory, _config: &Config, _rates: bool) -> Result<()> {
    tracing::warn!("built without the `plot` feature, skipping plot");
    Ok(())
}
