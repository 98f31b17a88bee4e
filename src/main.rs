//! Stargate CLI
//!
//! Usage:
//!   stargate --dial 27,7,15,32,12,30,1          # Dial an address on a simulated gate
//!   stargate --dial 27,7,15,32,12,30,1 --incoming
//!   stargate --profile 0,240                    # Print a ring rotation track
//!   stargate --serve                            # HTTP lookup API
//!   stargate --profile 350,10 --json            # JSON output

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use tokio::sync::broadcast::error::RecvError;

use stargate::config::{load_settings, Settings};
use stargate::core::{generate_rotation, run_server, DialSequencer, GateStateMachine, SimulatedHost, StaticDirectory};
use stargate::types::{parse_symbols, DialPlan, GateStatus, RotationDirection, RotationTrack};
use stargate::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "stargate",
    version = VERSION,
    about = "Ring-and-chevron gate dialer",
    long_about = "Turns the symbol ring with a trapezoidal speed profile and locks\n\
                  chevrons one by one, against a simulated actor host.\n\n\
                  Modes:\n  \
                  --dial     Dial an address (7-9 symbols, 0-38)\n  \
                  --profile  Print the rotation track between two angles\n  \
                  --serve    HTTP address lookup API"
)]
struct Args {
    /// Comma separated address symbols
    #[arg(short, long)]
    dial: Option<String>,

    /// Play the dial as an inbound connection
    #[arg(long)]
    incoming: bool,

    /// Source and target angle, e.g. "0,240"
    #[arg(short, long)]
    profile: Option<String>,

    /// Rotate clockwise when printing a profile (default counter-clockwise)
    #[arg(long)]
    cw: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (overrides configuration)
    #[arg(long)]
    addr: Option<String>,

    /// Configuration file (default: ./stargate.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.no_color {
        colored::control::set_override(false);
    }

    let settings = match load_settings(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => fail(&format!("Configuration error: {}", e)),
    };

    let outcome = if args.serve {
        run_serve(&args, &settings).await
    } else if let Some(ref raw) = args.profile {
        run_profile(raw, &args)
    } else if let Some(ref raw) = args.dial {
        run_dial(raw, &args, &settings).await
    } else {
        print_header();
        println!("Nothing to do. Try --dial 27,7,15,32,12,30,1 or --help.");
        Ok(())
    };

    if let Err(e) = outcome {
        fail(&e);
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message.red());
    std::process::exit(1);
}

/// Print a rotation track
fn run_profile(raw: &str, args: &Args) -> Result<(), String> {
    let angles: Vec<f64> = raw
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("Invalid angle in `{}`: {}", raw, e))?;
    let &[source, target] = angles.as_slice() else {
        return Err(format!("Expected SOURCE,TARGET, got `{}`", raw));
    };

    let direction = RotationDirection::from_flag(!args.cw);
    let track = generate_rotation(source, target, direction);

    if args.json {
        let json = serde_json::to_string_pretty(&track).map_err(|e| e.to_string())?;
        println!("{}", json);
    } else {
        print_track(&track);
    }
    Ok(())
}

/// Dial an address against the simulated host
async fn run_dial(raw: &str, args: &Args, settings: &Settings) -> Result<(), String> {
    let variant = settings.gate_variant().map_err(|e| e.to_string())?;
    let symbols = parse_symbols(raw).map_err(|e| e.to_string())?;
    let plan = DialPlan::for_address(&symbols, &variant).map_err(|e| e.to_string())?;

    let host = Arc::new(SimulatedHost::new());
    let mut sequencer = DialSequencer::init(host.clone(), variant)
        .await
        .map_err(|e| format!("Gate failed to initialize: {}", e))?;

    let gate = GateStateMachine::new();
    let started = if args.incoming {
        gate.announce_incoming().and_then(|_| gate.accept_incoming())
    } else {
        gate.start_dialing()
    };
    started.map_err(|e| e.to_string())?;

    if !args.json {
        print_header();
        println!("Dialing {} ({} symbols)", raw.bold(), plan.len());
        println!();
    }

    let mut reports = sequencer.subscribe_status();
    let json = args.json;
    let plain = args.no_color;
    let printer = tokio::spawn(async move {
        loop {
            match reports.recv().await {
                Ok(report) if json => match serde_json::to_string(&report) {
                    Ok(line) => println!("{}", line),
                    Err(e) => tracing::warn!(error = %e, "status report not serializable"),
                },
                Ok(report) if plain => println!("{}", report.to_parseable_string()),
                Ok(report) => println!("{}", report.to_terminal_string()),
                Err(RecvError::Lagged(skipped)) => tracing::warn!(skipped, "status lines dropped"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let locked = sequencer
        .dial_address(&gate, &plan)
        .await
        .map_err(|e| format!("Dialing failed: {}", e))?;

    if locked == plan.len() {
        gate.connect().map_err(|e| e.to_string())?;
    } else {
        gate.abort();
    }

    drop(sequencer);
    let _ = printer.await;

    let status = gate.status();
    if !json {
        println!();
        let line = format!("Gate {} | {} of {} chevrons locked", status, locked, plan.len());
        if status == GateStatus::Connected {
            println!("{}", line.green().bold());
        } else {
            println!("{}", line.red().bold());
        }
    }
    Ok(())
}

/// Run HTTP API server
async fn run_serve(args: &Args, settings: &Settings) -> Result<(), String> {
    let addr = args.addr.clone().unwrap_or_else(|| settings.server_bind.clone());
    let directory = StaticDirectory::new(settings.directory.clone());

    print_header();
    println!("  Lookup API on {} ({} known gates)", addr.bold(), directory.len());
    println!();

    run_server(&addr, Arc::new(directory))
        .await
        .map_err(|e| format!("Server error: {}", e))
}

/// Print header
fn print_header() {
    println!("{}", "========================================".bold());
    println!("{}", format!("  Stargate v{}", VERSION).bold());
    println!("{}", "========================================".bold());
    println!();
}

/// Print one line per keyframe
fn print_track(track: &RotationTrack) {
    println!(
        "{} {:.1} -> {:.1} ({:.1} deg, {:.2} s, {} keyframes)",
        track.direction.to_string().cyan(),
        track.source(),
        track.resolved_target(),
        track.distance(),
        track.duration(),
        track.len()
    );
    for kf in &track.keyframes {
        println!("  t={:>6.3}s  angle={:>8.3}  bearing={:>7.3}", kf.time, kf.angle, kf.bearing());
    }
}
