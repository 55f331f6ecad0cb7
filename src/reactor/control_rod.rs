//! control_rod.rs
//! A single control rod: heat generation proportional to retraction, no
//! passive cooling (cooling comes exclusively from conduction into the
//! core, driven by the reactor's composition step).

use crate::severity::{severity_threshold, ThresholdAlarm};
use crate::units::Position;
use std::time::Duration;

pub const ROD_TEMP_WARNING: f64 = 2000.0;
pub const ROD_TEMP_CRITICAL: f64 = 3000.0;
pub const ROD_TEMP_FATAL: f64 = 4000.0;

#[derive(Debug, Clone)]
pub struct ControlRod {
    pub index: u32,
    pub position: Position,
    pub temp: f64,
    pub temp_alarm: ThresholdAlarm,
}

impl ControlRod {
    pub fn new(index: u32, base_temp: f64) -> Self {
        Self {
            index,
            position: Position::MAX,
            temp: base_temp,
            temp_alarm: ThresholdAlarm::new("control_rod_temp"),
        }
    }

    /// `rate = (1 - position) * fission_rate_minute * dt_minutes; temp += rate`.
    pub fn tick(&mut self, dt: Duration, fission_rate_minute: f64) {
        let dt_minutes = dt.as_secs_f64() / 60.0;
        let rate = (1.0 - self.position.get()) * fission_rate_minute * dt_minutes;
        self.temp += rate;
    }

    pub fn tick_alarm(&mut self) {
        let severity_for = severity_threshold(ROD_TEMP_FATAL, ROD_TEMP_CRITICAL, ROD_TEMP_WARNING);
        self.temp_alarm.tick(self.temp, severity_for);
    }
}
