//! A minimal reference driver: wires the three logical tasks spec.md §5
//! describes (input reader, simulator, renderer) around the public
//! `reactor_sim` API over stdin/stdout. Not a TUI — the terminal/3D
//! rendering layer is an external collaborator; this is plumbing enough to
//! exercise the whole core end to end.
//!
//! Grounded in the teacher's `main.rs` (thread spawning, `Arc<AtomicBool>`
//! shutdown flag, dropping senders to unblock receivers) and
//! `component_a/sensor.rs`'s `spin_sleep`-paced loop (used inside
//! `reactor_sim::driver::spawn_simulator`).

use clap::Parser;
use crossbeam::channel::bounded;
use log::{error, info};
use parking_lot::Mutex;
use reactor_sim::config::Config;
use reactor_sim::driver::{self, ErrorSink, INPUTS_CAPACITY, LOG_CAPACITY};
use reactor_sim::simulation::Simulation;
use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "reactor_sim", about = "Reference driver for the reactor simulation core")]
struct Args {
    /// Path to a TOML config file; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print each frame's state snapshot as JSON instead of plain text.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("failed to load config: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };
    let tick_interval = config.tick_interval();

    let sim = Arc::new(Mutex::new(Simulation::new(config)));
    let (inputs_tx, inputs_rx) = bounded::<String>(INPUTS_CAPACITY);
    let (log_tx, log_rx) = bounded::<reactor_sim::LogMessage>(LOG_CAPACITY);
    let running = Arc::new(AtomicBool::new(true));
    let (sink, err_rx) = ErrorSink::new();

    info!("reactor_sim starting, tick interval {tick_interval:?}");

    let simulator = driver::spawn_simulator(
        sim.clone(),
        tick_interval,
        inputs_rx,
        log_tx,
        running.clone(),
        sink.clone(),
    );

    let json_output = args.json;
    let renderer = driver::spawn_renderer(
        sim.clone(),
        log_rx,
        Duration::from_millis(100),
        running.clone(),
        sink.clone(),
        move |snapshot, lines| {
            for line in lines {
                println!("# {}", line.text);
            }
            if json_output {
                match snapshot.to_json() {
                    Ok(json) => println!("{json}"),
                    Err(e) => error!("failed to serialize state snapshot: {e}"),
                }
                return;
            }
            println!(
                "output={:.1} core={:.1} containment={:.1} turbine_rpm={:.1}",
                snapshot.output, snapshot.core_temp, snapshot.containment_temp, snapshot.turbine_rpm
            );
            for alarm in &snapshot.alarms {
                if alarm.severity != reactor_sim::severity::Severity::None {
                    println!("  ALARM {} -> {:?} (new={})", alarm.name, alarm.severity, alarm.is_new);
                }
            }
        },
    );

    println!("Type commands (e.g. `cr * 0`, `pp 255`, `scram`, `quit`):");
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if !running.load(Ordering::Acquire) {
            break;
        }
        if driver::submit_line(&inputs_tx, line).is_err() {
            error!("input queue full, dropping command");
        }
    }

    running.store(false, Ordering::Release);
    drop(inputs_tx);

    let _ = simulator.join();
    let _ = renderer.join();

    match err_rx.try_recv() {
        Ok(e) => {
            error!("driver failed: {e}");
            ExitCode::FAILURE
        }
        Err(_) => ExitCode::SUCCESS,
    }
}
