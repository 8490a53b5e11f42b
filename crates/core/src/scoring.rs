//! Score rules.
//!
//! - Each removal wave of a cascade iteration scores `10 * tiles * combo`
//! - A golden whirlwind scores a flat `10 * tiles`
//! - End-of-turn removals (ball lightning, fusion cores) score nothing

use crate::types::POINTS_PER_TILE;

/// Points for one removal wave at the given combo depth (1-based).
pub fn wave_score(tiles: usize, combo: u32) -> u32 {
    POINTS_PER_TILE * tiles as u32 * combo.max(1)
}

/// Points for the tiles swept up by a golden whirlwind.
pub fn whirlwind_score(tiles: usize) -> u32 {
    POINTS_PER_TILE * tiles as u32
}
