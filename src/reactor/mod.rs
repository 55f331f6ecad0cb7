//! reactor/mod.rs
//! The physical plant: five control rods, core/containment temperatures,
//! two coolant pumps, and a turbine, advanced together each tick in the
//! fixed order spec'd below.

pub mod control_rod;
pub mod pump;
pub mod turbine;

use crate::config::Config;
use crate::severity::{severity_threshold, AlarmReading, ThresholdAlarm};
use crate::transfer::transfer;
use crate::units::Position;
use control_rod::ControlRod;
use pump::Pump;
use serde::Serialize;
use std::time::Duration;
use turbine::Turbine;

/// Number of control rods; fixed for the lifetime of the reactor.
pub const N_RODS: usize = 5;

/// Core and containment temperature alarm bands. Not specified by name in
/// the upstream drafts (only rod/pump/turbine bands are); chosen to sit
/// above the rod bands since the core aggregates heat from all five rods.
/// See DESIGN.md.
pub const CORE_WARNING: f64 = 4000.0;
pub const CORE_CRITICAL: f64 = 6000.0;
pub const CORE_FATAL: f64 = 8000.0;

pub const CONTAINMENT_WARNING: f64 = 2000.0;
pub const CONTAINMENT_CRITICAL: f64 = 3000.0;
pub const CONTAINMENT_FATAL: f64 = 4000.0;

/// Fraction of the core<->primary conduction rate used for the core's direct
/// heat leak into containment. The upstream drafts disagree on whether this
/// path exists at all; DESIGN.md records the decision to include it at a
/// small fraction, per the spec's own recommendation.
const CORE_CONTAINMENT_FRACTION: f64 = 0.05;

/// A typed reference into one `Position` field of a `Reactor`. Motions hold
/// a handle rather than a raw pointer, so advancing a motion never aliases
/// reactor state — see DESIGN.md's discussion of the indexed-handle
/// strategy (spec.md §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorHandle {
    ControlRod(usize),
    PrimaryThrottle,
    SecondaryThrottle,
}

#[derive(Debug, Clone)]
pub struct Reactor {
    pub core_temp: f64,
    pub containment_temp: f64,
    pub core_alarm: ThresholdAlarm,
    pub containment_alarm: ThresholdAlarm,
    pub control_rods: [ControlRod; N_RODS],
    pub primary: Pump,
    pub secondary: Pump,
    pub turbine: Turbine,
    base_temp: f64,
}

impl Reactor {
    pub fn new(config: &Config) -> Self {
        let base_temp = config.base_temp;
        Self {
            core_temp: base_temp,
            containment_temp: base_temp,
            core_alarm: ThresholdAlarm::new("core_temp"),
            containment_alarm: ThresholdAlarm::new("containment_temp"),
            control_rods: std::array::from_fn(|i| ControlRod::new(i as u32, base_temp)),
            primary: Pump::new("primary", base_temp),
            secondary: Pump::new("secondary", base_temp),
            turbine: Turbine::new(base_temp),
            base_temp,
        }
    }

    pub fn position(&self, handle: ActuatorHandle) -> Position {
        match handle {
            ActuatorHandle::ControlRod(i) => self.control_rods[i].position,
            ActuatorHandle::PrimaryThrottle => self.primary.throttle,
            ActuatorHandle::SecondaryThrottle => self.secondary.throttle,
        }
    }

    pub fn position_mut(&mut self, handle: ActuatorHandle) -> &mut Position {
        match handle {
            ActuatorHandle::ControlRod(i) => &mut self.control_rods[i].position,
            ActuatorHandle::PrimaryThrottle => &mut self.primary.throttle,
            ActuatorHandle::SecondaryThrottle => &mut self.secondary.throttle,
        }
    }

    /// Advances rods, core, containment, both pumps, and the turbine, in
    /// the fixed order the spec requires (this tick's rod heat is visible
    /// to the core before it's transferred outward; the just-updated
    /// primary outlet feeds the secondary inlet the same tick). Finishes
    /// by re-evaluating every alarm observer.
    pub fn tick(&mut self, dt: Duration, config: &Config) {
        for rod in &mut self.control_rods {
            rod.tick(dt, config.fission_rate_minute);
            transfer(
                &mut rod.temp,
                &mut self.core_temp,
                config.conduction_rate_minute / N_RODS as f64,
                dt,
            );
        }

        transfer(
            &mut self.core_temp,
            &mut self.primary.inlet_temp,
            config.conduction_rate_minute,
            dt,
        );

        transfer(
            &mut self.core_temp,
            &mut self.containment_temp,
            config.conduction_rate_minute * CORE_CONTAINMENT_FRACTION,
            dt,
        );

        // Ambient is an infinite reservoir: transfer against a scratch copy
        // so containment loses heat without warming the ambient back.
        let mut ambient = self.base_temp;
        transfer(
            &mut self.containment_temp,
            &mut ambient,
            config.containment_transfer_rate_minute / 2.0,
            dt,
        );

        self.primary.tick(dt, config.pump_transfer_rate_minute);

        transfer(
            &mut self.primary.outlet_temp,
            &mut self.secondary.inlet_temp,
            config.conduction_rate_minute,
            dt,
        );

        self.secondary.tick(dt, config.pump_transfer_rate_minute);

        transfer(
            &mut self.secondary.outlet_temp,
            &mut self.turbine.inlet_temp,
            config.conduction_rate_minute,
            dt,
        );

        self.turbine.tick(
            dt,
            config.base_temp,
            config.turbine_thermal_rate_minute,
            config.turbine_drag,
        );

        self.tick_alarms();
    }

    fn tick_alarms(&mut self) {
        for rod in &mut self.control_rods {
            rod.tick_alarm();
        }
        self.primary.tick_alarms();
        self.secondary.tick_alarms();
        self.turbine.tick_alarm();

        let core_for = severity_threshold(CORE_FATAL, CORE_CRITICAL, CORE_WARNING);
        self.core_alarm.tick(self.core_temp, core_for);

        let containment_for =
            severity_threshold(CONTAINMENT_FATAL, CONTAINMENT_CRITICAL, CONTAINMENT_WARNING);
        self.containment_alarm.tick(self.containment_temp, containment_for);
    }

    /// Flattens every component's alarms into one list, per spec.md §4.6
    /// ("the reactor flattens these").
    pub fn alarms(&self) -> Vec<AlarmReading> {
        let mut out = Vec::with_capacity(N_RODS + 5);
        out.push(reading(&self.core_alarm));
        out.push(reading(&self.containment_alarm));
        for rod in &self.control_rods {
            out.push(reading(&rod.temp_alarm));
        }
        out.push(reading(&self.primary.inlet_alarm));
        out.push(reading(&self.primary.outlet_alarm));
        out.push(reading(&self.secondary.inlet_alarm));
        out.push(reading(&self.secondary.outlet_alarm));
        out.push(reading(&self.turbine.rpm_alarm));
        out
    }

    pub fn output(&self, config: &Config) -> f64 {
        self.turbine.output(config.turbine_output_rate_minute)
    }

    pub fn snapshot(&self, config: &Config) -> StateSnapshot {
        StateSnapshot {
            output: self.output(config),
            core_temp: self.core_temp,
            containment_temp: self.containment_temp,
            turbine_rpm: self.turbine.speed_rpm,
            rods: self
                .control_rods
                .iter()
                .map(|r| RodSnapshot {
                    index: r.index,
                    position: r.position.get(),
                    temp: r.temp,
                })
                .collect(),
            primary: PumpSnapshot {
                throttle: self.primary.throttle.get(),
                inlet_temp: self.primary.inlet_temp,
                outlet_temp: self.primary.outlet_temp,
            },
            secondary: PumpSnapshot {
                throttle: self.secondary.throttle.get(),
                inlet_temp: self.secondary.inlet_temp,
                outlet_temp: self.secondary.outlet_temp,
            },
            alarms: self.alarms(),
        }
    }
}

fn reading(alarm: &ThresholdAlarm) -> AlarmReading {
    AlarmReading {
        name: alarm.name,
        severity: alarm.severity(),
        is_new: alarm.is_new(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RodSnapshot {
    pub index: u32,
    pub position: f64,
    pub temp: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PumpSnapshot {
    pub throttle: f64,
    pub inlet_temp: f64,
    pub outlet_temp: f64,
}

/// Read-only dictionary for external consumers (e.g. an HTTP `/state`
/// handler living outside this crate), per spec.md §6.
#[derive(Debug, Clone, Serialize)]
pub struct StateSnapshot {
    pub output: f64,
    pub core_temp: f64,
    pub containment_temp: f64,
    pub turbine_rpm: f64,
    pub rods: Vec<RodSnapshot>,
    pub primary: PumpSnapshot,
    pub secondary: PumpSnapshot,
    pub alarms: Vec<crate::severity::AlarmReading>,
}

impl StateSnapshot {
    /// Serialize to the wire format an external `/state` consumer would
    /// poll, the same `serde_json::to_vec`/`to_string` pairing the teacher
    /// uses to publish its own control state.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
