//! rate.rs
//! Linear ramp rate: how fast a `Position` moves from one value to another
//! given a configured full-sweep duration.

use crate::units::Position;
use std::time::Duration;

/// `|from - to| / max * full_sweep`.
///
/// A partial sweep takes proportionally less wall-clock time than a full
/// `0..=max` sweep; a no-op (`from == to`) yields zero.
pub fn relative_quantum(from: f64, to: f64, max: f64, full_sweep: Duration) -> Duration {
    if max <= 0.0 {
        return Duration::ZERO;
    }
    full_sweep.mul_f64((from - to).abs() / max)
}

/// The rate at which a `Position` ramps toward a target: a signed delta and
/// the wall-clock duration (`quantum`) a full `0..=1` sweep would take,
/// scaled down for partial sweeps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRate {
    pub delta: f64,
    pub quantum: Duration,
}

impl LinearRate {
    /// `delta = to - from`; `quantum` derived via `relative_quantum` against
    /// the full `[0, 1]` range.
    pub fn new(from: Position, to: Position, full_sweep: Duration) -> Self {
        let quantum = relative_quantum(from.get(), to.get(), 1.0, full_sweep);
        Self {
            delta: to.get() - from.get(),
            quantum,
        }
    }

    pub fn is_additive(&self) -> bool {
        self.delta > 0.0
    }

    /// Advance `position` by this tick's share of `delta`. Treated as an
    /// instantaneous set when `quantum` is zero (undefined otherwise, per
    /// spec — a zero quantum only ever arises from a no-op change).
    pub fn affect(&self, position: &mut Position, dt: Duration) {
        if self.quantum.is_zero() {
            *position += self.delta;
            return;
        }
        let fraction = dt.as_secs_f64() / self.quantum.as_secs_f64();
        *position += fraction * self.delta;
    }
}
