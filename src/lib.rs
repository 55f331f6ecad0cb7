//! reactor_sim
//! Fixed-step simulation core for an interactive reactor-operation game:
//! thermal/neutronic plant physics, actuator motion scheduling, threshold
//! alarms, and a small command language. The terminal UI, 3D rendering,
//! and HTTP admin surface are external collaborators — see `driver` for
//! the thin reference wiring this crate expects them to sit on top of.

pub mod command;
pub mod config;
pub mod driver;
pub mod motion;
pub mod rate;
pub mod reactor;
pub mod severity;
pub mod simulation;
pub mod transfer;
pub mod units;

pub use config::Config;
pub use reactor::Reactor;
pub use simulation::{Directive, LogMessage, Simulation};
