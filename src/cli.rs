//! Command-line flags for the `tile-cascade` binary.
//!
//! Flags override whatever [`GameConfig::from_env`] produced.

use anyhow::{anyhow, Result};

use crate::core::config::parse_number;
use crate::core::GameConfig;

pub const USAGE: &str = "\
usage: tile-cascade [--seed N] [--level N] [--no-animation] [--log FILE] [--trace FILE] [--verbose]

keys: arrows/hjkl/wasd move, enter/space select, esc cancel,
      r restart, n next level, q quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play(GameConfig),
    Help,
}

/// Parse `args` (without the program name) on top of `base`.
pub fn parse_args(args: &[String], base: GameConfig) -> Result<Command> {
    let mut config = base;
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--seed" => {
                i += 1;
                let v = value(args, i, "--seed")?;
                config.seed = parse_number("--seed", v)?;
            }
            "--level" => {
                i += 1;
                let v = value(args, i, "--level")?;
                let level = parse_number("--level", v)?;
                if level == 0 {
                    return Err(anyhow!("--level must be at least 1"));
                }
                config.level = level;
            }
            "--no-animation" => config.animate = false,
            "--verbose" => config.verbose = true,
            "--log" => {
                i += 1;
                config.log_path = Some(value(args, i, "--log")?.to_string());
            }
            "--trace" => {
                i += 1;
                config.trace_path = Some(value(args, i, "--trace")?.to_string());
            }
            other => return Err(anyhow!("unknown argument: {}", other)),
        }
        i += 1;
    }
    Ok(Command::Play(config))
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing value for {}", flag))
}
