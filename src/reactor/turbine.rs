//! turbine.rs
//! Thermal-to-RPM spin-up with drag, and RPM-to-output conversion.

use crate::severity::{severity_threshold, ThresholdAlarm};
use std::time::Duration;

pub const RPM_WARNING: f64 = 5000.0;
pub const RPM_CRITICAL: f64 = 6000.0;
pub const RPM_FATAL: f64 = 8000.0;

#[derive(Debug, Clone)]
pub struct Turbine {
    pub inlet_temp: f64,
    pub speed_rpm: f64,
    pub rpm_alarm: ThresholdAlarm,
}

impl Turbine {
    pub fn new(base_temp: f64) -> Self {
        Self {
            inlet_temp: base_temp,
            speed_rpm: 0.0,
            rpm_alarm: ThresholdAlarm::new("turbine_rpm"),
        }
    }

    /// `output = speed_rpm * turbine_output_rate_minute`.
    pub fn output(&self, turbine_output_rate_minute: f64) -> f64 {
        self.speed_rpm * turbine_output_rate_minute
    }

    pub fn tick(
        &mut self,
        dt: Duration,
        base_temp: f64,
        turbine_thermal_rate_minute: f64,
        turbine_drag: f64,
    ) {
        let dt_minutes = dt.as_secs_f64() / 60.0;
        let delta_t = self.inlet_temp - base_temp;
        let accel = dt_minutes * turbine_thermal_rate_minute * delta_t;
        let drag = dt_minutes * turbine_drag * self.speed_rpm;
        self.speed_rpm = (self.speed_rpm + accel - drag).max(0.0);
    }

    pub fn tick_alarm(&mut self) {
        let severity_for = severity_threshold(RPM_FATAL, RPM_CRITICAL, RPM_WARNING);
        self.rpm_alarm.tick(self.speed_rpm, severity_for);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cold_turbine_stays_at_rest() {
        let mut t = Turbine::new(10.0);
        t.tick(Duration::from_secs(60), 10.0, 16.0, 0.33);
        assert_eq!(t.speed_rpm, 0.0);
    }

    #[test]
    fn hot_inlet_spins_up() {
        let mut t = Turbine::new(10.0);
        t.inlet_temp = 500.0;
        t.tick(Duration::from_secs(60), 10.0, 16.0, 0.33);
        assert!(t.speed_rpm > 0.0);
    }

    #[test]
    fn speed_never_goes_negative() {
        let mut t = Turbine::new(10.0);
        t.speed_rpm = 1.0;
        // huge drag, no heat input
        t.tick(Duration::from_secs(600), 10.0, 0.0, 100.0);
        assert!(t.speed_rpm >= 0.0);
    }
}
