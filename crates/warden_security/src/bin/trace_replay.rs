//! # Trace Replay
//!
//! Command-line tool that replays a recorded movement trace through the
//! checks and reports every flagged tick.

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use warden_core::{Location, PlayerId};
use warden_security::{CheckConfig, MovementBridge, SecurityResult, Trace, TraceStep};

/// Prints corrective actions instead of sending them to a server.
struct LoggingBridge;

impl MovementBridge for LoggingBridge {
    fn setback(&mut self, player: PlayerId, location: Location) {
        info!(player = %player, ?location, "setback");
    }

    fn cancel(&mut self, player: PlayerId) {
        info!(player = %player, "cancel");
    }
}

fn load_config(path: Option<&str>) -> SecurityResult<CheckConfig> {
    match path {
        Some(path) => CheckConfig::from_file(path),
        None => Ok(CheckConfig::default()),
    }
}

fn print_step(step: &TraceStep) {
    let outcome = &step.outcome;
    println!(
        "│  #{:<5} t={:>7}ms  +{:>7.3} vl={:>8.3}  {}{}",
        step.index,
        step.timestamp_ms,
        outcome.vl_delta,
        outcome.violation_level,
        if outcome.setback.is_some() { "SETBACK " } else { "" },
        if outcome.cancel { "CANCEL" } else { "" },
    );
    println!("│          tags: {}", outcome.tags);
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         WARDEN TRACE REPLAY                                      ║");
    println!("║         MOVEMENT INTEGRITY                                       ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        println!("Usage: trace_replay <trace.toml>");
        println!();
        println!("Options:");
        println!("  --config <file>  Check configuration (TOML)");
        println!("  --verbose        Show every tick, not only flagged ones");
        return ExitCode::FAILURE;
    }

    let trace_path = &args[1];
    let verbose = args.iter().any(|a| a == "--verbose");
    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(String::as_str);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "could not load configuration");
            return ExitCode::FAILURE;
        }
    };
    let trace = match Trace::from_file(trace_path) {
        Ok(trace) => trace,
        Err(e) => {
            warn!(error = %e, "could not load trace");
            return ExitCode::FAILURE;
        }
    };

    println!("┌─ TRACE INFO ─────────────────────────────────────────────────────┐");
    println!("│ File:               {trace_path}");
    println!("│ Player:             {}", trace.player);
    println!("│ Spawn:              {:.2} {:.2} {:.2}", trace.spawn.x, trace.spawn.y, trace.spawn.z);
    println!("│ Events:             {}", trace.events.len());
    println!("│ Movements:          {}", trace.movement_count());
    println!("│ Terrain blocks:     {}", trace.build_terrain().len());
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    let checker = warden_security::MovementChecker::new(Arc::new(config));
    let steps = match trace.replay(&checker, &mut LoggingBridge) {
        Ok(steps) => steps,
        Err(e) => {
            warn!(error = %e, "replay aborted");
            return ExitCode::FAILURE;
        }
    };

    let flagged: Vec<&TraceStep> = steps.iter().filter(|step| !step.outcome.is_clean()).collect();
    let peak = steps
        .iter()
        .map(|step| step.outcome.violation_level)
        .fold(0.0_f64, f64::max);

    println!("┌─ ANALYSIS RESULTS ───────────────────────────────────────────────┐");
    println!("│ Ticks Analyzed:     {}", steps.len());
    println!("│ Flagged Ticks:      {}", flagged.len());
    println!("│ Peak Level:         {peak:.3}");
    if verbose {
        println!("│");
        steps.iter().for_each(print_step);
    } else if !flagged.is_empty() {
        println!("│");
        println!("│ FLAGGED:");
        flagged.iter().copied().for_each(print_step);
    }
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    if flagged.is_empty() {
        println!("✓ No movement violations");
    } else {
        println!("⚠ {} flagged ticks - manual review recommended", flagged.len());
    }
    ExitCode::SUCCESS
}
