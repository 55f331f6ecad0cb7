//! pump.rs
//! A coolant pump: throttle-gated transfer between an inlet and outlet
//! temperature. Throttle 0 means no flow; throttle 1 means flow at the
//! configured `pump_transfer_rate_minute`.

use crate::severity::{severity_threshold, ThresholdAlarm};
use crate::transfer::transfer;
use crate::units::Position;
use std::time::Duration;

pub const INLET_WARNING: f64 = 1000.0;
pub const INLET_CRITICAL: f64 = 2000.0;
pub const INLET_FATAL: f64 = 3000.0;

pub const OUTLET_WARNING: f64 = 500.0;
pub const OUTLET_CRITICAL: f64 = 1000.0;
pub const OUTLET_FATAL: f64 = 1500.0;

#[derive(Debug, Clone)]
pub struct Pump {
    pub name: &'static str,
    pub throttle: Position,
    pub inlet_temp: f64,
    pub outlet_temp: f64,
    pub inlet_alarm: ThresholdAlarm,
    pub outlet_alarm: ThresholdAlarm,
}

impl Pump {
    pub fn new(name: &'static str, base_temp: f64) -> Self {
        Self {
            name,
            throttle: Position::MIN,
            inlet_temp: base_temp,
            outlet_temp: base_temp,
            inlet_alarm: ThresholdAlarm::new("pump_inlet_temp"),
            outlet_alarm: ThresholdAlarm::new("pump_outlet_temp"),
        }
    }

    pub fn tick(&mut self, dt: Duration, pump_transfer_rate_minute: f64) {
        let rate = self.throttle.get() * pump_transfer_rate_minute;
        transfer(&mut self.inlet_temp, &mut self.outlet_temp, rate, dt);
    }

    pub fn tick_alarms(&mut self) {
        let inlet_for = severity_threshold(INLET_FATAL, INLET_CRITICAL, INLET_WARNING);
        self.inlet_alarm.tick(self.inlet_temp, inlet_for);

        let outlet_for = severity_threshold(OUTLET_FATAL, OUTLET_CRITICAL, OUTLET_WARNING);
        self.outlet_alarm.tick(self.outlet_temp, outlet_for);
    }
}
