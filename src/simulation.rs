//! simulation.rs
//! The simulation kernel: owns the reactor, the pending-motion queue, the
//! log channel, the operator alert banner, and the monotonic simulated
//! time accumulator.

use crate::command::{self, CommandError};
use crate::config::Config;
use crate::reactor::Reactor;
use crate::motion::PositionChange;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, SystemTime};

/// What the driver should do after a `submit_command` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Continue,
    Quit,
}

/// `Info`-class messages omit the timestamp; `Message`-class include it.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LogMessage {
    pub timestamp: Option<SystemTime>,
    pub text: String,
    pub fields: Option<HashMap<String, String>>,
}

impl LogMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            timestamp: None,
            text: text.into(),
            fields: None,
        }
    }

    pub fn message(text: impl Into<String>) -> Self {
        Self {
            timestamp: Some(SystemTime::now()),
            text: text.into(),
            fields: None,
        }
    }
}

pub struct Simulation {
    pub config: Config,
    pub reactor: Reactor,
    pub pending_motions: VecDeque<PositionChange>,
    pub log: VecDeque<LogMessage>,
    pub command_buffer: String,
    pub alert: String,
    pub sim_time: Duration,
}

impl Simulation {
    pub fn new(config: Config) -> Self {
        let reactor = Reactor::new(&config);
        Self {
            config,
            reactor,
            pending_motions: VecDeque::new(),
            log: VecDeque::new(),
            command_buffer: String::new(),
            alert: String::new(),
            sim_time: Duration::ZERO,
        }
    }

    pub fn log_info(&mut self, text: impl Into<String>) {
        self.log.push_back(LogMessage::info(text));
    }

    pub fn log_message(&mut self, text: impl Into<String>) {
        self.log.push_back(LogMessage::message(text));
    }

    /// Drain every log message currently queued, in FIFO order.
    pub fn drain_log(&mut self) -> Vec<LogMessage> {
        self.log.drain(..).collect()
    }

    /// Advances the reactor, then advances each queued motion exactly once
    /// (a snapshot of the queue length at the start of the drain — never
    /// more — so a re-enqueued motion isn't advanced twice this tick), then
    /// accumulates simulated time.
    pub fn tick(&mut self, dt: Duration) {
        self.reactor.tick(dt, &self.config);

        let mut pending = std::mem::take(&mut self.pending_motions);
        let n = pending.len();
        for _ in 0..n {
            let motion = match pending.pop_front() {
                Some(m) => m,
                None => break,
            };
            if motion.done(&self.reactor) {
                continue;
            }
            motion.tick(dt, &mut self.reactor);
            if !motion.done(&self.reactor) {
                pending.push_back(motion);
            }
        }
        self.pending_motions = pending;

        self.sim_time += dt;
    }

    /// Forwards to the command parser/dispatcher. `ParseError`/
    /// `ValidationError` are logged and the simulation continues;
    /// `Quitting` propagates as `Directive::Quit`.
    pub fn submit_command(&mut self, text: &str) -> Directive {
        match command::dispatch(self, text, 0) {
            Ok(directive) => directive,
            Err(CommandError::UnknownCommand(verb)) => {
                self.log_info(format!("invalid command: {verb}"));
                Directive::Continue
            }
            Err(e) => {
                self.log_info(e.to_string());
                Directive::Continue
            }
        }
    }
}
