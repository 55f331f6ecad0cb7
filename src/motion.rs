//! motion.rs
//! Actuator motions: long-running linear ramps queued by the simulation
//! kernel and advanced one tick at a time until `done`.

use crate::rate::LinearRate;
use crate::reactor::{ActuatorHandle, Reactor};
use crate::units::Position;
use std::time::Duration;

/// A scheduled ramp of one `Position` toward a target. Binds to reactor
/// state through a typed `ActuatorHandle` rather than a raw pointer, so the
/// motion can be queued, re-queued, and dropped freely — see spec.md §9.
#[derive(Debug, Clone)]
pub struct PositionChange {
    pub label: String,
    pub handle: ActuatorHandle,
    pub original: Position,
    pub desired: Position,
    pub rate: LinearRate,
}

impl PositionChange {
    pub fn new(
        label: impl Into<String>,
        handle: ActuatorHandle,
        current: Position,
        desired: Position,
        full_sweep: Duration,
    ) -> Self {
        let rate = LinearRate::new(current, desired, full_sweep);
        Self {
            label: label.into(),
            handle,
            original: current,
            desired,
            rate,
        }
    }

    /// Advance via `rate.affect`, then clamp to `desired` on the correct
    /// side so the target never overshoots.
    pub fn tick(&self, dt: Duration, reactor: &mut Reactor) {
        let position = reactor.position_mut(self.handle);
        self.rate.affect(position, dt);

        if self.rate.is_additive() {
            if position.get() > self.desired.get() {
                *position = self.desired;
            }
        } else if position.get() < self.desired.get() {
            *position = self.desired;
        }
    }

    /// `*target == desired`, exactly, after clamping.
    pub fn done(&self, reactor: &Reactor) -> bool {
        reactor.position(self.handle).get() == self.desired.get()
    }

    /// A human-readable `label; from→to (rate)` line for the log.
    pub fn describe(&self) -> String {
        format!(
            "{}; {:.3}->{:.3} ({:.0}ms)",
            self.label,
            self.original.get(),
            self.desired.get(),
            self.rate.quantum.as_secs_f64() * 1000.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn noop_change_is_immediately_done() {
        let config = Config::default();
        let reactor = Reactor::new(&config);
        let p = reactor.position(ActuatorHandle::ControlRod(0));
        let motion = PositionChange::new(
            "cr0",
            ActuatorHandle::ControlRod(0),
            p,
            p,
            config.control_rod_adjustment(),
        );
        assert!(motion.done(&reactor));
    }

    #[test]
    fn full_sweep_completes_in_one_big_tick() {
        let config = Config::default();
        let mut reactor = Reactor::new(&config);
        let from = reactor.position(ActuatorHandle::ControlRod(0));
        let to = Position::new(0.0);
        let motion = PositionChange::new(
            "cr0",
            ActuatorHandle::ControlRod(0),
            from,
            to,
            config.control_rod_adjustment(),
        );
        motion.tick(config.control_rod_adjustment(), &mut reactor);
        assert!(motion.done(&reactor));
        assert_eq!(reactor.position(ActuatorHandle::ControlRod(0)).get(), 0.0);
    }

    #[test]
    fn partial_tick_does_not_overshoot() {
        let config = Config::default();
        let mut reactor = Reactor::new(&config);
        let from = reactor.position(ActuatorHandle::ControlRod(0));
        let to = Position::new(0.0);
        let motion = PositionChange::new(
            "cr0",
            ActuatorHandle::ControlRod(0),
            from,
            to,
            config.control_rod_adjustment(),
        );
        for _ in 0..1000 {
            motion.tick(Duration::from_millis(1), &mut reactor);
            let p = reactor.position(ActuatorHandle::ControlRod(0)).get();
            assert!((0.0..=1.0).contains(&p));
            if motion.done(&reactor) {
                break;
            }
        }
        assert!(motion.done(&reactor));
    }
}
