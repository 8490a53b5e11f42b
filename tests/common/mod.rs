//! Shared fixtures for integration tests.

#![allow(dead_code)]

use tile_cascade::core::GameSession;

/// A full board with no runs: alternating row patterns.
pub const QUIET: [&str; 9] = [
    "B G P W B G P W B",
    "P W B G P W B G P",
    "B G P W B G P W B",
    "P W B G P W B G P",
    "B G P W B G P W B",
    "P W B G P W B G P",
    "B G P W B G P W B",
    "P W B G P W B G P",
    "B G P W B G P W B",
];

/// Session over `rows` with the level-start events already drained.
pub fn session(seed: u32, rows: &[&str]) -> GameSession {
    let mut s = GameSession::from_layout(seed, rows).expect("valid layout");
    s.take_events();
    s
}
