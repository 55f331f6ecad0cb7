//! driver.rs
//! The external-collaborator contract from spec.md §4.11 and §5: three
//! logical tasks (simulator, input handler, renderer) cooperating over two
//! bounded channels, with a single mutex-protected `Simulation` as the
//! shared mutable aggregate.
//!
//! This module is deliberately thin — a reference wiring, not a TUI. The
//! real terminal/3D rendering, keyboard handling, and HTTP admin endpoints
//! are out of scope (spec.md §1) and live outside this crate.
//!
//! Grounded in the teacher's `main.rs` (thread::spawn closures over
//! `Arc`-shared state, an `Arc<AtomicBool>` shutdown flag, explicit
//! `drop` of senders to unblock blocked receivers) and
//! `component_a/sensor.rs` (a `spin_sleep`-paced fixed-interval loop).

use crate::simulation::{Directive, LogMessage, Simulation};
use crossbeam::channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use spin_sleep::SpinSleeper;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;

/// Bounded capacity of the command-text channel from the input task to the
/// simulator task. Spec.md §5 describes this channel as carrying "pending
/// motions"; here it carries the raw command text instead, because
/// resolving a motion (reading the current `Position` it ramps from)
/// requires the same mutable reactor access that only the simulator-owning
/// task should take — see DESIGN.md.
pub const INPUTS_CAPACITY: usize = 64;

/// Bounded capacity of the log channel from the simulator task to any
/// number of renderer/consumer tasks.
pub const LOG_CAPACITY: usize = 1024;

pub type SharedSimulation = Arc<Mutex<Simulation>>;

/// Errors a driver task can raise. `Panic` wraps any unexpected runtime
/// fault caught at a task boundary; `Quit` is not an error but is surfaced
/// here too so a single "first result wins" channel can carry both.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("task '{task}' panicked: {message}")]
    Panic { task: &'static str, message: String },
}

/// First-error-wins channel: the first send succeeds, every later send is
/// dropped (the channel is bounded to capacity 1 and sends are
/// non-blocking), matching spec.md §5's "first error wins" cancellation
/// rule.
#[derive(Clone)]
pub struct ErrorSink {
    tx: Sender<DriverError>,
}

impl ErrorSink {
    pub fn new() -> (Self, Receiver<DriverError>) {
        let (tx, rx) = bounded(1);
        (Self { tx }, rx)
    }

    pub fn report(&self, error: DriverError) {
        let _ = self.tx.try_send(error);
    }
}

/// Runs `body`, catching any panic and reporting it to `sink` as a
/// `DriverError::Panic` instead of unwinding across the task boundary.
fn run_catching<F>(task: &'static str, sink: &ErrorSink, body: F)
where
    F: FnOnce(),
{
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(body)) {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        sink.report(DriverError::Panic { task, message });
    }
}

/// `simulate()`: ticks the shared simulation on a fixed interval, applying
/// any command text waiting on `inputs` first, then forwarding freshly
/// logged messages onto `log`. Stops on `Directive::Quit` or when
/// `running` is cleared by another task.
pub fn spawn_simulator(
    sim: SharedSimulation,
    tick_interval: Duration,
    inputs: Receiver<String>,
    log_tx: Sender<LogMessage>,
    running: Arc<AtomicBool>,
    sink: ErrorSink,
) -> JoinHandle<()> {
    thread::spawn(move || {
        run_catching("simulator", &sink, move || {
            let sleeper = SpinSleeper::new(100_000);
            while running.load(Ordering::Acquire) {
                while let Ok(text) = inputs.try_recv() {
                    let directive = sim.lock().submit_command(&text);
                    if directive == Directive::Quit {
                        running.store(false, Ordering::Release);
                    }
                }

                {
                    let mut guard = sim.lock();
                    guard.tick(tick_interval);
                    for message in guard.drain_log() {
                        if let Err(TrySendError::Disconnected(_)) = log_tx.try_send(message) {
                            break;
                        }
                    }
                }

                sleeper.sleep(tick_interval);
            }
        });
    })
}

/// `handle_input(event)`: the driver's keystroke-to-command-buffer
/// translation lives outside this crate; this helper is the piece of the
/// contract the core can own — forwarding a already-assembled command line
/// onto the `inputs` channel for the simulator task to apply.
pub fn submit_line(inputs: &Sender<String>, line: String) -> Result<(), TrySendError<String>> {
    inputs.try_send(line)
}

/// `render()`: reads a state snapshot and drains whatever log messages are
/// waiting, with no side effects on simulation state beyond the drain.
/// `on_frame` is called once per frame with the snapshot and the drained
/// log lines; real terminal/3D rendering is an external collaborator.
pub fn spawn_renderer<F>(
    sim: SharedSimulation,
    log_rx: Receiver<LogMessage>,
    frame_interval: Duration,
    running: Arc<AtomicBool>,
    sink: ErrorSink,
    mut on_frame: F,
) -> JoinHandle<()>
where
    F: FnMut(crate::reactor::StateSnapshot, Vec<LogMessage>) + Send + 'static,
{
    thread::spawn(move || {
        run_catching("renderer", &sink, move || {
            while running.load(Ordering::Acquire) {
                let snapshot = {
                    let guard = sim.lock();
                    guard.reactor.snapshot(&guard.config)
                };
                let mut lines = Vec::new();
                while let Ok(line) = log_rx.try_recv() {
                    lines.push(line);
                }
                on_frame(snapshot, lines);
                thread::sleep(frame_interval);
            }
        });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex as StdMutex;

    #[test]
    fn simulator_applies_submitted_commands_and_ticks() {
        let sim = Arc::new(Mutex::new(Simulation::new(Config::default())));
        let (inputs_tx, inputs_rx) = bounded::<String>(INPUTS_CAPACITY);
        let (log_tx, log_rx) = bounded::<LogMessage>(LOG_CAPACITY);
        let running = Arc::new(AtomicBool::new(true));
        let (sink, _err_rx) = ErrorSink::new();

        let handle = spawn_simulator(
            sim.clone(),
            Duration::from_millis(1),
            inputs_rx,
            log_tx,
            running.clone(),
            sink,
        );

        submit_line(&inputs_tx, "cr 0 0".to_string()).unwrap();
        // Give the simulator a few ticks to pick up the command and advance.
        thread::sleep(Duration::from_millis(50));
        running.store(false, Ordering::Release);
        handle.join().unwrap();

        assert!(log_rx.try_iter().count() > 0);
    }

    #[test]
    fn quit_command_stops_the_simulator() {
        let sim = Arc::new(Mutex::new(Simulation::new(Config::default())));
        let (inputs_tx, inputs_rx) = bounded::<String>(INPUTS_CAPACITY);
        let (log_tx, _log_rx) = bounded::<LogMessage>(LOG_CAPACITY);
        let running = Arc::new(AtomicBool::new(true));
        let (sink, _err_rx) = ErrorSink::new();

        let handle = spawn_simulator(
            sim,
            Duration::from_millis(1),
            inputs_rx,
            log_tx,
            running.clone(),
            sink,
        );

        submit_line(&inputs_tx, "quit".to_string()).unwrap();
        handle.join().unwrap();
        assert!(!running.load(Ordering::Acquire));
    }

    #[test]
    fn panic_in_a_task_is_caught_and_reported_once() {
        let (sink, err_rx) = ErrorSink::new();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(StdMutex::new(Vec::new()));

        for _ in 0..3 {
            let sink = sink.clone();
            run_catching("test-task", &sink, || {
                panic!("boom");
            });
        }

        while let Ok(err) = err_rx.try_recv() {
            count.fetch_add(1, Ordering::Relaxed);
            seen.lock().unwrap().push(err.to_string());
        }
        // Only the first of the three panics is retained (capacity-1 channel).
        assert_eq!(count.load(Ordering::Relaxed), 1);
    }
}
