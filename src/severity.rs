//! severity.rs
//! Severity lattice and the edge-triggered threshold observer built on it.
//!
//! REQUIREMENT 1: totally ordered severity {None < Info < Warning < Critical < Fatal}.
//! REQUIREMENT 2: edge-triggered "new" notification — a consumer must call
//! `seen()` to clear it; nothing clears it automatically.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    None = 0,
    Info = 1,
    Warning = 2,
    Critical = 4,
    Fatal = 8,
}

impl Default for Severity {
    fn default() -> Self {
        Severity::None
    }
}

/// Returns the first band `value` crosses from the top: `Fatal` if
/// `value > fatal`, else `Critical` if `value > critical`, else `Warning`
/// if `value > warning`, else `None`.
pub fn severity_threshold(fatal: f64, critical: f64, warning: f64) -> impl Fn(f64) -> Severity {
    move |value| {
        if value > fatal {
            Severity::Fatal
        } else if value > critical {
            Severity::Critical
        } else if value > warning {
            Severity::Warning
        } else {
            Severity::None
        }
    }
}

/// Tracks the previous severity read from a provider and flags a one-shot
/// `new` bit on every transition. `new` is never cleared automatically —
/// see REQUIREMENT 2 above.
#[derive(Debug, Clone, Default)]
pub struct SeverityObserver {
    previous: Severity,
    new: bool,
}

impl SeverityObserver {
    pub fn new() -> Self {
        Self {
            previous: Severity::None,
            new: false,
        }
    }

    /// Re-evaluate against `current`; sets `new` true on any transition.
    pub fn tick(&mut self, current: Severity) {
        if current != self.previous {
            self.new = true;
            self.previous = current;
        }
    }

    pub fn severity(&self) -> Severity {
        self.previous
    }

    pub fn is_new(&self) -> bool {
        self.new
    }

    /// Acknowledge the current `new` flag, clearing it.
    pub fn seen(&mut self) {
        self.new = false;
    }
}

/// A named threshold alarm: severity is derived from a live value each tick
/// via `severity_for`, and edge-triggering is delegated to a `SeverityObserver`.
#[derive(Debug, Clone)]
pub struct ThresholdAlarm {
    pub name: &'static str,
    observer: SeverityObserver,
}

impl ThresholdAlarm {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            observer: SeverityObserver::new(),
        }
    }

    pub fn tick(&mut self, value: f64, severity_for: impl Fn(f64) -> Severity) {
        self.observer.tick(severity_for(value));
    }

    pub fn severity(&self) -> Severity {
        self.observer.severity()
    }

    pub fn is_new(&self) -> bool {
        self.observer.is_new()
    }

    pub fn seen(&mut self) {
        self.observer.seen();
    }
}

/// Sum type over the two alarm shapes the reactor aggregates: threshold
/// alarms (rod/core/pump/turbine temperatures and RPM) and position-zero
/// alarms (not currently emitted by any component, but kept as a distinct
/// variant per the design note's "sum type of alarm kinds").
#[derive(Debug, Clone)]
pub enum AlarmKind {
    Threshold { name: &'static str },
    PositionZero { name: &'static str },
}

/// One flattened, reactor-owned alarm reading, produced fresh each poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmReading {
    pub name: &'static str,
    pub severity: Severity,
    pub is_new: bool,
}

impl AlarmKind {
    pub fn name(&self) -> &'static str {
        match self {
            AlarmKind::Threshold { name } | AlarmKind::PositionZero { name } => name,
        }
    }
}
