//! # jolt Planner
//!
//! Plans the moves listed in a TOML configuration file and prints one report
//! per move: minimum duration, blocked intervals, the chosen profile and the
//! state it ends in.
//!
//! A move without `duration` is planned in minimum time. `--duration`
//! overrides the configured duration of every selected move.

use clap::{Parser, ValueEnum};
use jolt_common::config::LogLevel;
use jolt_planner::config::{MoveConfig, PlannerConfig, load_config};
use jolt_planner::plan::{MoveReport, plan_min_time, plan_with_duration};
use std::path::PathBuf;
use std::process;
use thiserror::Error;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// jolt Planner: jerk-limited single-axis trajectories
#[derive(Parser, Debug)]
#[command(name = "jolt_planner")]
#[command(version)]
#[command(about = "Time-optimal jerk-limited single-axis trajectory planner")]
struct Args {
    /// Path to the planner configuration TOML.
    #[arg(default_value = "config/jolt.toml")]
    config: PathBuf,

    /// Plan only the move with this name.
    #[arg(long = "move", value_name = "NAME")]
    move_name: Option<String>,

    /// Total duration [s] for every selected move.
    #[arg(long, value_name = "S")]
    duration: Option<f64>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("no move named '{0}' in configuration")]
    UnknownMove(String),

    #[error("configuration contains no moves")]
    NoMoves,

    #[error("{failed} of {total} moves could not be planned")]
    PlanningFailed { failed: usize, total: usize },
}

fn main() {
    let args = Args::parse();

    // Logging is configured from the file when it loads; a broken file is
    // still reported through a default subscriber.
    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            setup_tracing(&args, LogLevel::Info);
            error!("FATAL: {} ({})", e, args.config.display());
            process::exit(1);
        }
    };
    setup_tracing(&args, config.shared.log_level);

    info!("jolt Planner v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args, &config) {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

fn run(args: &Args, config: &PlannerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let moves: Vec<&MoveConfig> = match &args.move_name {
        Some(name) => vec![
            config
                .find_move(name)
                .ok_or_else(|| CliError::UnknownMove(name.clone()))?,
        ],
        None => config.moves.iter().collect(),
    };
    if moves.is_empty() {
        return Err(CliError::NoMoves.into());
    }

    let limits = config.limits.to_limits();
    info!(
        service = %config.shared.service_name,
        moves = moves.len(),
        v_max = limits.v_max,
        v_min = limits.v_min,
        a_max = limits.a_max,
        j_max = limits.j_max,
        "planning"
    );

    let mut reports = Vec::with_capacity(moves.len());
    let mut failed = 0;
    for mv in &moves {
        let block = match plan_min_time(&mv.start, &mv.goal, &limits) {
            Ok(block) => block,
            Err(e) => {
                warn!(name = %mv.name, "{e}");
                failed += 1;
                continue;
            }
        };

        let profile = match args.duration.or(mv.duration) {
            Some(duration) => match plan_with_duration(&mv.start, &mv.goal, &limits, duration) {
                Ok(profile) => profile,
                Err(e) => {
                    warn!(name = %mv.name, "{e}");
                    failed += 1;
                    continue;
                }
            },
            None => block.p_min,
        };

        info!(name = %mv.name, t_min = block.t_min, duration = profile.duration(), "planned");
        reports.push(MoveReport::new(&mv.name, &block, &profile));
    }

    match args.format {
        Format::Text => {
            for report in &reports {
                println!("{report}");
            }
        }
        Format::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }

    if failed > 0 {
        return Err(CliError::PlanningFailed {
            failed,
            total: moves.len(),
        }
        .into());
    }
    Ok(())
}

fn setup_tracing(args: &Args, configured: LogLevel) {
    let filter = if args.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(
            configured
                .as_directive()
                .parse()
                .unwrap_or_else(|_| Level::INFO.into()),
        )
    };

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
