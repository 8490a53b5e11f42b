//! Chain propagation: growing a removal set through primed and explosive
//! tiles, then splitting it into frozen shatter waves.

use std::collections::{BTreeSet, HashSet};

use crate::board::Board;
use crate::effects::purple;
use crate::error::BoardError;
use crate::session::GameSession;
use crate::types::{Color, EffectKind, Pos, TileId, TileKind, TileState, VisualEffect};

/// Special tiles to place once the removal of an iteration is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forge {
    Gold { pos: Pos, color: Color },
}

/// Working state of one cascade iteration (or one end-of-turn pass).
///
/// The removal set is ordered so that iteration, and with it every RNG draw
/// made while walking it, is reproducible.
#[derive(Debug, Clone, Default)]
pub struct CascadeStep {
    pub removal: BTreeSet<Pos>,
    pub forge: Vec<Forge>,
    /// Yellow tiles that already overloaded in this step.
    pub(crate) overloaded: HashSet<TileId>,
}

impl CascadeStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn removal(&self) -> &BTreeSet<Pos> {
        &self.removal
    }
}

/// Expand `step.removal` through every special tile it sweeps up.
///
/// - bright-blue: adds its 3x3
/// - bright-purple: recolors part of its 5x5 (nothing added)
/// - row / column / area clear: adds the row, column or 3x3
///
/// Each tile fires at most once per turn.
pub(crate) fn expand(session: &mut GameSession, step: &mut CascadeStep) -> Result<(), BoardError> {
    let mut stack: Vec<Pos> = step.removal.iter().copied().collect();

    while let Some(pos) = stack.pop() {
        let Some(tile) = session.board.get(pos)?.copied() else {
            continue;
        };
        let primed = matches!(tile.state, TileState::BrightBlue | TileState::BrightPurple);
        if !primed && !tile.kind.is_explosive() {
            continue;
        }
        if !session.processed.insert(tile.id) {
            continue;
        }

        let mut blast: Vec<Pos> = Vec::new();
        match tile.state {
            TileState::BrightBlue => {
                blast.extend(Board::area(pos, 1));
                session
                    .events
                    .effect(VisualEffect::new(EffectKind::TidalBurst, pos).with_cells(blast.clone()));
            }
            TileState::BrightPurple => purple::void_pulse(session, pos)?,
            TileState::Normal | TileState::Frozen => {}
        }

        let line: Vec<Pos> = match tile.kind {
            TileKind::RowClear => Board::row_cells(pos.row).collect(),
            TileKind::ColumnClear => Board::col_cells(pos.col).collect(),
            TileKind::AreaClear => Board::area(pos, 1),
            _ => Vec::new(),
        };
        if !line.is_empty() {
            session
                .events
                .effect(VisualEffect::new(EffectKind::LineClear, pos).with_cells(line.clone()));
            blast.extend(line);
        }

        for p in blast {
            if step.removal.insert(p) {
                stack.push(p);
            }
        }
    }
    Ok(())
}

/// Narrower expansion used by the golden whirlwind: only bright-blue tiles
/// and row / column / area clears fire. Bright-blue wins over the tile's kind.
pub(crate) fn expand_whirlwind(
    session: &mut GameSession,
    step: &mut CascadeStep,
) -> Result<(), BoardError> {
    let mut stack: Vec<Pos> = step.removal.iter().copied().collect();

    while let Some(pos) = stack.pop() {
        let Some(tile) = session.board.get(pos)?.copied() else {
            continue;
        };
        let bright_blue = tile.state == TileState::BrightBlue;
        if !bright_blue && !tile.kind.is_explosive() {
            continue;
        }
        if !session.processed.insert(tile.id) {
            continue;
        }

        let (kind, blast): (EffectKind, Vec<Pos>) = if bright_blue {
            (EffectKind::TidalBurst, Board::area(pos, 1))
        } else {
            let cells = match tile.kind {
                TileKind::RowClear => Board::row_cells(pos.row).collect(),
                TileKind::ColumnClear => Board::col_cells(pos.col).collect(),
                _ => Board::area(pos, 1),
            };
            (EffectKind::LineClear, cells)
        };
        session
            .events
            .effect(VisualEffect::new(kind, pos).with_cells(blast.clone()));

        for p in blast {
            if step.removal.insert(p) {
                stack.push(p);
            }
        }
    }
    Ok(())
}

/// Split a removal set into waves: wave 0 is the set itself, each following
/// wave holds the frozen tiles orthogonally touching the previous wave.
pub fn build_frozen_waves(
    board: &Board,
    removal: &BTreeSet<Pos>,
) -> Result<Vec<Vec<Pos>>, BoardError> {
    let mut waves: Vec<Vec<Pos>> = vec![removal.iter().copied().collect()];
    let mut seen: BTreeSet<Pos> = removal.clone();

    loop {
        let mut next: BTreeSet<Pos> = BTreeSet::new();
        if let Some(last) = waves.last() {
            for &pos in last {
                for n in Board::neighbors4(pos) {
                    if seen.contains(&n) {
                        continue;
                    }
                    if board.get(n)?.is_some_and(|t| t.is_frozen()) {
                        next.insert(n);
                    }
                }
            }
        }
        if next.is_empty() {
            break;
        }
        seen.extend(next.iter().copied());
        waves.push(next.into_iter().collect());
    }
    Ok(waves)
}
