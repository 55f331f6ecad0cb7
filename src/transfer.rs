//! transfer.rs
//! Symmetric heat transfer between two scalar temperatures.

use std::time::Duration;

/// Moves `from` and `to` toward their midpoint at `rate_per_minute`, scaled
/// by `dt`. Never crosses over: the transferred amount is clamped to the
/// raw difference, and the split is even, so `from + to` is preserved
/// (within floating-point epsilon).
pub fn transfer(from: &mut f64, to: &mut f64, rate_per_minute: f64, dt: Duration) {
    let dt_minutes = dt.as_secs_f64() / 60.0;
    let effective = rate_per_minute * dt_minutes;
    let delta = *from - *to;
    let transferred = if delta.abs() < effective.abs() {
        delta
    } else {
        delta.signum() * effective.abs()
    };
    *from -= transferred / 2.0;
    *to += transferred / 2.0;
}
