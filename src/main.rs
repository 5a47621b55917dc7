//! `hhl`: run the 2×2 HHL swap-test demonstration.
//!
//! ```bash
//! hhl --shots 1000 --seed 7
//! hhl --noise depolarizing --noise-prob 0.02 --json
//! hhl --config run.json --log-level debug
//! ```
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use hhlsim::circuit::analyze;
use hhlsim::core::NoiseChannel;
use hhlsim::{hhl, HhlOutcome, Result, RunConfig};

#[derive(Parser, Debug)]
#[command(name = "hhl", version, about = "HHL 2x2 solver verified by a swap test", long_about = None)]
struct Args {
    /// JSON run configuration; flags below override its fields.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of circuit executions.
    #[arg(short, long)]
    shots: Option<u64>,

    /// RNG seed for reproducible sampling.
    #[arg(long)]
    seed: Option<u64>,

    /// Noise channel applied after every gate.
    #[arg(long, value_enum)]
    noise: Option<NoiseKind>,

    /// Error probability for `--noise`.
    #[arg(long, default_value_t = 0.01, requires = "noise")]
    noise_prob: f64,

    /// Print the outcome as JSON instead of the report.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Log level (off, trace, debug, info, warn, error). Falls back to RUST_LOG.
    #[arg(long, value_parser = parse_log_level)]
    log_level: Option<LevelFilter>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NoiseKind {
    BitFlip,
    PhaseFlip,
    Depolarizing,
    AmplitudeDamping,
}

impl NoiseKind {
    fn channel(self, prob: f64) -> NoiseChannel {
        match self {
            NoiseKind::BitFlip => NoiseChannel::BitFlip { prob },
            NoiseKind::PhaseFlip => NoiseChannel::PhaseFlip { prob },
            NoiseKind::Depolarizing => NoiseChannel::Depolarizing { prob },
            NoiseKind::AmplitudeDamping => NoiseChannel::AmplitudeDamping { gamma: prob },
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.log_level);

    let config = match load_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("invalid run configuration: {e}");
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(shots = config.shots, seed = ?config.seed, noise = ?config.noise, "configuration loaded");

    let result = if args.json { run_json(&config) } else { run_report(&config) };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("run failed: {e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so `--json` output stays parseable.
fn init_tracing(level: Option<LevelFilter>) {
    let filter = match level {
        Some(level) => EnvFilter::default().add_directive(level.into()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_log_level(s: &str) -> std::result::Result<LevelFilter, String> {
    s.parse::<LevelFilter>()
        .map_err(|_| format!("unknown log level `{s}` (expected off, trace, debug, info, warn or error)"))
}

fn load_config(args: &Args) -> Result<RunConfig> {
    let mut config = match args.config.as_deref() {
        Some(path) => {
            info!("loading configuration from {}", path.display());
            RunConfig::from_json(path)?
        }
        None => RunConfig::default(),
    };

    if let Some(shots) = args.shots {
        config.shots = shots;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(kind) = args.noise {
        config.noise = Some(kind.channel(args.noise_prob));
    }
    config.validate()?;
    Ok(config)
}

fn run_json(config: &RunConfig) -> Result<()> {
    let outcome = hhl::run(&config.backend(), config.shots)?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn run_report(config: &RunConfig) -> Result<()> {
    print_banner();

    let circuit = hhl::build_circuit()?;
    println!("━━━ Circuit ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{circuit}");
    println!();
    println!("━━━ Analysis ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{}", analyze(&circuit).report());

    println!("━━━ Ideal solution ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    let [q0, q1] = hhl::solution_amplitudes()?;
    let [c0, c1] = hhl::classical_solution();
    println!("  quantum   : ({q0:.4}, {q1:.4})");
    println!("  classical : ({c0:.4}, {c1:.4})");
    println!("  P(ancilla = 1) = {:.4}", hhl::ideal_postselection_rate()?);
    println!();

    let outcome = hhl::run(&config.backend(), config.shots)?;
    print_outcome(&outcome, config);
    Ok(())
}

fn print_outcome(outcome: &HhlOutcome, config: &RunConfig) {
    println!("━━━ Sampling ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  backend : {}", outcome.backend);
    if let Some(channel) = config.noise {
        println!("  noise   : {channel}");
    }
    println!("  shots   : {}", outcome.shots);
    println!("  counts  : {}", outcome.counts);
    println!();
    println!("Post-selection rate : {:.4}", outcome.postselection_rate);
    println!("Success probability : {:.4}", outcome.success_probability);
    println!("Fidelity estimate   : {:.4}", outcome.fidelity_estimate);
}

fn print_banner() {
    println!("╔══════════════════════════════════════════════╗");
    println!("║          hhlsim v{:<28}║", env!("CARGO_PKG_VERSION"));
    println!("║     HHL 2x2 Solver with Swap-Test Check      ║");
    println!("╚══════════════════════════════════════════════╝");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_accepts_known_levels() {
        assert_eq!(parse_log_level("debug"), Ok(LevelFilter::DEBUG));
        assert_eq!(parse_log_level("off"), Ok(LevelFilter::OFF));
    }

    #[test]
    fn log_level_rejects_unknown() {
        assert!(parse_log_level("verbose").is_err());
        let err = Args::try_parse_from(["hhl", "--log-level", "verbose"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "hhl", "--shots", "250", "--seed", "4", "--noise", "bit-flip", "--noise-prob", "0.2",
        ])
        .unwrap();
        let cfg = load_config(&args).unwrap();
        assert_eq!(cfg.shots, 250);
        assert_eq!(cfg.seed, Some(4));
        assert_eq!(cfg.noise, Some(NoiseChannel::BitFlip { prob: 0.2 }));
    }

    #[test]
    fn invalid_noise_prob_is_an_error() {
        let args =
            Args::try_parse_from(["hhl", "--noise", "depolarizing", "--noise-prob", "1.5"]).unwrap();
        assert!(matches!(load_config(&args), Err(hhlsim::HhlError::Config(_))));
    }
}
