//! command/mod.rs
//! The `verb [noun...] [value]` command language: parsing, uint8/glob
//! validation, motion scheduling, and recursive named-script expansion.

use crate::motion::PositionChange;
use crate::reactor::{ActuatorHandle, N_RODS};
use crate::simulation::{Directive, Simulation};
use crate::units::Position;
use thiserror::Error;

/// Recursion depth cap for scripts invoking scripts (spec.md §9's open
/// question, resolved here rather than tracking an "already executing"
/// set — see SPEC_FULL.md §4.13 and DESIGN.md).
pub const MAX_SCRIPT_DEPTH: u8 = 8;

/// Parse/validation error taxonomy (spec.md §7). `Quitting` is not a
/// variant here — it is a normal control-flow `Directive`, not a failure.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CommandError {
    #[error("invalid command: {0}")]
    UnknownCommand(String),

    #[error("missing argument for '{verb}'")]
    MissingArgument { verb: String },

    #[error("invalid value '{value}': not a uint8")]
    NotUint8 { value: String },

    #[error("invalid value {value}: out of range [0,255]")]
    OutOfRange { value: i64 },

    #[error("unknown rod index {0}")]
    UnknownRodIndex(u32),

    #[error("script recursion exceeded depth {0}")]
    ScriptTooDeep(u8),
}

/// Parse a decimal integer and validate it falls in `[0, 255]`.
fn parse_uint8(s: &str) -> Result<u8, CommandError> {
    let value: i64 = s.parse().map_err(|_| CommandError::NotUint8 {
        value: s.to_string(),
    })?;
    if !(0..=255).contains(&value) {
        return Err(CommandError::OutOfRange { value });
    }
    Ok(value as u8)
}

/// Parse and dispatch one command line against `sim`. `depth` is the
/// current script-expansion nesting level (0 at the top level).
pub fn dispatch(sim: &mut Simulation, text: &str, depth: u8) -> Result<Directive, CommandError> {
    let mut parts = text.split_whitespace();
    let verb = match parts.next() {
        Some(v) => v,
        None => return Ok(Directive::Continue),
    };
    let args: Vec<&str> = parts.collect();

    match verb {
        "quit" | "q" => Ok(Directive::Quit),
        "help" | "?" => {
            for line in HELP_LINES {
                sim.log_info(*line);
            }
            Ok(Directive::Continue)
        }
        "alert" => {
            sim.alert = args.join(" ");
            Ok(Directive::Continue)
        }
        "scripts" => {
            for (name, lines) in &sim.config.scripts {
                sim.log_info(format!("{name}: {} commands", lines.len()));
            }
            Ok(Directive::Continue)
        }
        "cr" => dispatch_control_rod(sim, &args),
        "pp" => dispatch_pump(sim, &args, ActuatorHandle::PrimaryThrottle, "pp"),
        "sp" => dispatch_pump(sim, &args, ActuatorHandle::SecondaryThrottle, "sp"),
        // Not listed among spec.md §4.10's named verbs, but required by the
        // default `scram`/`base`/`full`/`fail` scripts, which all contain
        // literal "notice ..." lines. Treated as a verb: joins its
        // arguments into one Message-class log line (see DESIGN.md).
        "notice" => {
            sim.log_message(args.join(" "));
            Ok(Directive::Continue)
        }
        other => dispatch_script(sim, other, depth),
    }
}

fn dispatch_control_rod(sim: &mut Simulation, args: &[&str]) -> Result<Directive, CommandError> {
    let index_arg = args.first().ok_or_else(|| CommandError::MissingArgument {
        verb: "cr".to_string(),
    })?;
    let value_arg = args.get(1).ok_or_else(|| CommandError::MissingArgument {
        verb: "cr".to_string(),
    })?;
    let value = parse_uint8(value_arg)?;
    let desired = Position::from_control(value);

    if *index_arg == "*" {
        for i in 0..N_RODS {
            schedule_rod(sim, i, desired);
        }
        return Ok(Directive::Continue);
    }

    let index: u32 = index_arg
        .parse()
        .map_err(|_| CommandError::NotUint8 {
            value: index_arg.to_string(),
        })?;
    if index as usize >= N_RODS {
        return Err(CommandError::UnknownRodIndex(index));
    }
    schedule_rod(sim, index as usize, desired);
    Ok(Directive::Continue)
}

fn schedule_rod(sim: &mut Simulation, index: usize, desired: Position) {
    let handle = ActuatorHandle::ControlRod(index);
    let current = sim.reactor.position(handle);
    let motion = PositionChange::new(
        format!("cr{index}"),
        handle,
        current,
        desired,
        sim.config.control_rod_adjustment(),
    );
    sim.log_info(motion.describe());
    sim.pending_motions.push_back(motion);
}

fn dispatch_pump(
    sim: &mut Simulation,
    args: &[&str],
    handle: ActuatorHandle,
    verb: &str,
) -> Result<Directive, CommandError> {
    let value_arg = args.first().ok_or_else(|| CommandError::MissingArgument {
        verb: verb.to_string(),
    })?;
    let value = parse_uint8(value_arg)?;
    let desired = Position::from_control(value);
    let current = sim.reactor.position(handle);
    let motion = PositionChange::new(
        verb.to_string(),
        handle,
        current,
        desired,
        sim.config.pump_throttle_adjustment(),
    );
    sim.log_info(motion.describe());
    sim.pending_motions.push_back(motion);
    Ok(Directive::Continue)
}

fn dispatch_script(sim: &mut Simulation, name: &str, depth: u8) -> Result<Directive, CommandError> {
    if depth >= MAX_SCRIPT_DEPTH {
        return Err(CommandError::ScriptTooDeep(depth));
    }
    let lines = match sim.config.scripts.get(name) {
        Some(lines) => lines.clone(),
        None => return Err(CommandError::UnknownCommand(name.to_string())),
    };

    for line in lines {
        match dispatch(sim, &line, depth + 1) {
            Ok(Directive::Quit) => return Ok(Directive::Quit),
            Ok(Directive::Continue) => {}
            Err(e) => sim.log_info(e.to_string()),
        }
    }
    Ok(Directive::Continue)
}

const HELP_LINES: &[&str] = &[
    "quit|q                 exit the simulation",
    "help|?                 show this message",
    "alert <text>           set the operator alert banner",
    "scripts                list configured scripts",
    "cr <index|*> <0-255>   move a control rod (or all rods) to a control value",
    "pp <0-255>             move the primary pump throttle",
    "sp <0-255>             move the secondary pump throttle",
    "<script name>          run a named script",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn sim() -> Simulation {
        Simulation::new(Config::default())
    }

    #[test]
    fn cr_schedules_a_motion() {
        let mut s = sim();
        dispatch(&mut s, "cr 0 0", 0).unwrap();
        assert_eq!(s.pending_motions.len(), 1);
    }

    #[test]
    fn cr_glob_schedules_one_motion_per_rod() {
        let mut s = sim();
        dispatch(&mut s, "cr * 255", 0).unwrap();
        assert_eq!(s.pending_motions.len(), N_RODS);
    }

    #[test]
    fn unknown_rod_index_is_validation_error_and_enqueues_nothing() {
        let mut s = sim();
        let err = dispatch(&mut s, "cr 99 0", 0).unwrap_err();
        assert_eq!(err, CommandError::UnknownRodIndex(99));
        assert_eq!(s.pending_motions.len(), 0);
    }

    #[test]
    fn out_of_range_value_is_rejected() {
        let mut s = sim();
        let err = dispatch(&mut s, "cr 0 256", 0).unwrap_err();
        assert_eq!(err, CommandError::OutOfRange { value: 256 });
    }

    #[test]
    fn quit_yields_quit_directive() {
        let mut s = sim();
        let directive = dispatch(&mut s, "quit", 0).unwrap();
        assert_eq!(directive, Directive::Quit);
    }

    #[test]
    fn unknown_verb_is_unknown_command() {
        let mut s = sim();
        let err = dispatch(&mut s, "frobnicate", 0).unwrap_err();
        assert_eq!(err, CommandError::UnknownCommand("frobnicate".to_string()));
    }

    #[test]
    fn scram_script_inserts_all_rods_and_opens_both_pumps() {
        let mut s = sim();
        dispatch(&mut s, "scram", 0).unwrap();
        assert_eq!(s.pending_motions.len(), N_RODS + 2);
    }

    #[test]
    fn az5_is_an_alias_for_scram() {
        let mut s = sim();
        dispatch(&mut s, "az5", 0).unwrap();
        assert_eq!(s.pending_motions.len(), N_RODS + 2);
    }

    #[test]
    fn self_referential_script_is_bounded_by_depth() {
        // A script line's error is logged and the line skipped, not
        // propagated out of the script (so one bad line doesn't abort the
        // rest) -- but the depth cap still bottoms the recursion out after
        // MAX_SCRIPT_DEPTH levels instead of overflowing the stack.
        let mut s = sim();
        s.config
            .scripts
            .insert("loopy".to_string(), vec!["loopy".to_string()]);
        let directive = dispatch(&mut s, "loopy", 0).unwrap();
        assert_eq!(directive, Directive::Continue);
        assert!(s
            .log
            .iter()
            .any(|m| m.text.contains("exceeded depth")));
    }

    #[test]
    fn alert_sets_alert_text() {
        let mut s = sim();
        dispatch(&mut s, "alert reactor trip imminent", 0).unwrap();
        assert_eq!(s.alert, "reactor trip imminent");
    }
}
