//! End-to-end scenarios from spec.md §8 (E1-E6): drive `Simulation`
//! through a sequence of commands and ticks exactly as a driver would, and
//! check the resulting reactor state.

use reactor_sim::command;
use reactor_sim::config::Config;
use reactor_sim::reactor::ActuatorHandle;
use reactor_sim::simulation::{Directive, Simulation};
use std::time::Duration;

fn ticks_for(sim: &Simulation, duration: Duration) -> u32 {
    let dt = sim.config.tick_interval();
    (duration.as_secs_f64() / dt.as_secs_f64()).ceil() as u32
}

/// E1: cold start, no commands — after one tick, every rod temp is
/// unchanged (fully inserted, zero heat rate) and the core stays at base.
#[test]
fn e1_cold_start_is_inert() {
    let config = Config::default();
    let mut sim = Simulation::new(config.clone());
    sim.tick(config.tick_interval());

    for rod in &sim.reactor.control_rods {
        assert_eq!(rod.temp, config.base_temp);
        assert_eq!(rod.position.get(), 1.0);
    }
    assert_eq!(sim.reactor.core_temp, config.base_temp);
}

/// E2: `cr 0 0` fully withdraws rod 0; once the configured sweep duration
/// has elapsed, rod 0 sits at position 0 and keeps heating up afterward.
#[test]
fn e2_withdrawing_a_rod_heats_it_once_fully_withdrawn() {
    let config = Config::default();
    let mut sim = Simulation::new(config.clone());
    sim.submit_command("cr 0 0");

    let dt = config.tick_interval();
    let sweep_ticks = ticks_for(&sim, config.control_rod_adjustment());
    for _ in 0..(sweep_ticks + 2) {
        sim.tick(dt);
    }

    assert_eq!(
        sim.reactor.position(ActuatorHandle::ControlRod(0)).get(),
        0.0
    );

    let t1 = sim.reactor.control_rods[0].temp;
    sim.tick(dt);
    let t2 = sim.reactor.control_rods[0].temp;
    sim.tick(dt);
    let t3 = sim.reactor.control_rods[0].temp;
    assert!(t2 > t1);
    assert!(t3 > t2);
}

/// E3: withdraw every rod and open both pumps fully; eventually the
/// turbine produces nonzero output and nonzero RPM.
#[test]
fn e3_full_withdrawal_with_coolant_spins_up_the_turbine() {
    let config = Config::default();
    let mut sim = Simulation::new(config.clone());
    sim.submit_command("cr * 0");
    sim.submit_command("pp 255");
    sim.submit_command("sp 255");

    let dt = config.tick_interval();
    for _ in 0..6000 {
        sim.tick(dt);
    }

    assert!(sim.reactor.output(&sim.config) > 0.0);
    assert!(sim.reactor.turbine.speed_rpm > 0.0);
}

/// E4: from a hot, spun-up state, `scram` drives every rod back to fully
/// inserted within `control_rod_adjustment`, after which rod heat rates
/// fall to zero and the core begins to cool (pumps still running).
#[test]
fn e4_scram_reinserts_rods_and_the_core_begins_cooling() {
    let config = Config::default();
    let mut sim = Simulation::new(config.clone());
    sim.submit_command("cr * 0");
    sim.submit_command("pp 255");
    sim.submit_command("sp 255");

    let dt = config.tick_interval();
    for _ in 0..6000 {
        sim.tick(dt);
    }

    sim.submit_command("scram");
    let sweep_ticks = ticks_for(&sim, config.control_rod_adjustment());
    for _ in 0..(sweep_ticks + 2) {
        sim.tick(dt);
    }

    for rod in &sim.reactor.control_rods {
        assert_eq!(rod.position.get(), 1.0);
    }

    let core_after_scram = sim.reactor.core_temp;
    for _ in 0..200 {
        sim.tick(dt);
    }
    assert!(sim.reactor.core_temp < core_after_scram);
}

/// E5: an out-of-range rod index is a validation error; nothing is
/// enqueued and reactor state is untouched.
#[test]
fn e5_unknown_rod_index_is_rejected_without_side_effects() {
    let config = Config::default();
    let mut sim = Simulation::new(config.clone());
    let err = command::dispatch(&mut sim, "cr 99 0", 0).unwrap_err();
    assert!(matches!(err, command::CommandError::UnknownRodIndex(99)));
    assert!(sim.pending_motions.is_empty());
    for rod in &sim.reactor.control_rods {
        assert_eq!(rod.position.get(), 1.0);
        assert_eq!(rod.temp, config.base_temp);
    }
}

/// E6: `quit` yields the Quitting sentinel directive.
#[test]
fn e6_quit_yields_quit_directive() {
    let mut sim = Simulation::new(Config::default());
    assert_eq!(sim.submit_command("quit"), Directive::Quit);
}
