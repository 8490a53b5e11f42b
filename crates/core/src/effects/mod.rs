//! Color skills.
//!
//! Every match group triggers exactly one handler, picked by length tier and
//! color: five or more forges a gold tile, four triggers the color's match-4
//! skill, three its match-3 skill. Handlers only mark cells for removal or
//! mutate tiles in place; nothing leaves the board until the chain step runs.
//!
//! | Color | Match-3 | Match-4 |
//! |-------|---------|---------|
//! | red | strike one non-red neighbor | up to 3 reds each strike a neighbor |
//! | green | cut both flanks unless one is green | every other green slides one cell |
//! | blue | prime a nearby blue | clear the line, prime blues beside it |
//! | purple | recolor a neighbor to the local majority | prime a purple |
//! | white | freeze the run (or shatter its frozen part) | flood-shatter ice, freeze white pairs |
//! | orange | convert a neighbor | convert 3 tiles of the dominant color |
//! | yellow | voltage-driven bolts, EMP or fusion core | ball lightning |

mod blue;
mod green;
mod orange;
pub(crate) mod purple;
mod red;
mod white;
pub(crate) mod yellow;

pub use yellow::BallLightning;

use crate::board::Board;
use crate::chain::{CascadeStep, Forge};
use crate::error::BoardError;
use crate::matcher::{MatchGroup, MatchTier};
use crate::rng::SimpleRng;
use crate::session::GameSession;
use crate::types::{Color, GameEvent, Pos, Tile, TileKind, TileState};

/// Run the skill for one match group.
pub(crate) fn apply_group(
    s: &mut GameSession,
    step: &mut CascadeStep,
    group: &MatchGroup,
) -> Result<(), BoardError> {
    let origin = group.creation_pos();
    let color = s.board.tile(origin)?.color;
    let tier = MatchTier::of(group.len());
    s.events.game(GameEvent::Explosion(color));

    // White match-3 decides per tile whether it shatters or freezes.
    if !(tier == MatchTier::Three && color == Color::White) {
        step.removal.extend(group.tiles.iter().copied());
    }

    match (tier, color) {
        (MatchTier::Five, _) => {
            step.forge.push(Forge::Gold { pos: origin, color });
            Ok(())
        }
        (MatchTier::Three, Color::Red) => red::scorch(s, step, group),
        (MatchTier::Four, Color::Red) => red::firestorm(s, step, group),
        (MatchTier::Three, Color::Green) => green::wind_slash(s, step, group),
        (MatchTier::Four, Color::Green) => green::gale(s, step, group),
        (MatchTier::Three, Color::Blue) => blue::prime(s, step, group),
        (MatchTier::Four, Color::Blue) => blue::hydro_beam(s, step, group),
        (MatchTier::Three, Color::Purple) => purple::vortex(s, step, group),
        (MatchTier::Four, Color::Purple) => purple::empower(s, step, group),
        (MatchTier::Three, Color::White) => white::frost_nova(s, step, group),
        (MatchTier::Four, Color::White) => white::glacier(s, step, group),
        (MatchTier::Three, Color::Orange) => orange::acid(s, step, group),
        (MatchTier::Four, Color::Orange) => orange::biohazard(s, step, group),
        (MatchTier::Three, Color::Yellow) => yellow::discharge(s, step, group),
        (MatchTier::Four, Color::Yellow) => yellow::ball_lightning(s, step, group),
    }
}

/// Most frequent color, ties broken uniformly at random. `None` if all counts are 0.
pub(crate) fn mode_color(counts: &[u32; 7], rng: &mut SimpleRng) -> Option<Color> {
    let best = *counts.iter().max()?;
    if best == 0 {
        return None;
    }
    let tied: Vec<Color> = Color::ALL
        .iter()
        .copied()
        .filter(|c| counts[c.index()] == best)
        .collect();
    rng.pick(&tied).copied()
}

/// Color histogram over the occupied cells of `cells` accepted by `filter`.
pub(crate) fn count_colors(
    board: &Board,
    cells: &[Pos],
    filter: impl Fn(Pos, &Tile) -> bool,
) -> Result<[u32; 7], BoardError> {
    let mut counts = [0u32; 7];
    for &pos in cells {
        if let Some(tile) = board.get(pos)? {
            if filter(pos, tile) {
                counts[tile.color.index()] += 1;
            }
        }
    }
    Ok(counts)
}

/// Occupied positions in `cells` whose tile satisfies `pred`.
pub(crate) fn select(
    board: &Board,
    cells: &[Pos],
    pred: impl Fn(Pos, &Tile) -> bool,
) -> Result<Vec<Pos>, BoardError> {
    let mut out = Vec::new();
    for &pos in cells {
        if let Some(tile) = board.get(pos)? {
            if pred(pos, tile) {
                out.push(pos);
            }
        }
    }
    Ok(out)
}

/// Every occupied position on the board whose tile satisfies `pred`.
pub(crate) fn select_all(board: &Board, pred: impl Fn(Pos, &Tile) -> bool) -> Vec<Pos> {
    board
        .occupied()
        .filter(|(pos, tile)| pred(*pos, tile))
        .map(|(pos, _)| pos)
        .collect()
}

/// Gold tiles are immune.
pub(crate) fn freeze(tile: &mut Tile) -> bool {
    if tile.is_gold() {
        return false;
    }
    tile.state = TileState::Frozen;
    true
}

/// Recolor a tile and strip any special kind it carried.
pub(crate) fn convert(tile: &mut Tile, color: Color) {
    tile.transmute_to(color);
    if tile.kind != TileKind::Normal {
        *tile = tile.with_kind(TileKind::Normal);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Layout helpers shared by the skill tests.

    use super::*;
    use crate::types::{Orientation, GRID_SIZE};

    /// No runs, no red, orange or yellow.
    pub const QUIET: [&str; GRID_SIZE] = [
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

    pub fn session(rows: &[&str]) -> GameSession {
        GameSession::from_layout(17, rows).unwrap()
    }

    pub fn row_group(row: usize, cols: std::ops::Range<usize>) -> MatchGroup {
        MatchGroup::new(
            Orientation::Horizontal,
            cols.map(|c| Pos::new(row, c)).collect(),
        )
    }

    pub fn col_group(col: usize, rows: std::ops::Range<usize>) -> MatchGroup {
        MatchGroup::new(
            Orientation::Vertical,
            rows.map(|r| Pos::new(r, col)).collect(),
        )
    }

    pub fn run(s: &mut GameSession, group: &MatchGroup) -> CascadeStep {
        let mut step = CascadeStep::new();
        apply_group(s, &mut step, group).unwrap();
        step
    }

    pub fn color_at(s: &GameSession, row: usize, col: usize) -> Color {
        s.board().tile(Pos::new(row, col)).unwrap().color
    }

    pub fn tile_at(s: &GameSession, row: usize, col: usize) -> Tile {
        *s.board().tile(Pos::new(row, col)).unwrap()
    }
}
