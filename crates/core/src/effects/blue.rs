//! Blue: priming and the hydro beam.

use super::select;
use crate::board::Board;
use crate::chain::CascadeStep;
use crate::error::BoardError;
use crate::matcher::MatchGroup;
use crate::session::GameSession;
use crate::types::{Color, EffectKind, Orientation, Pos, Tile, TileState, VisualEffect};

fn primable(tile: &Tile) -> bool {
    tile.color == Color::Blue && tile.state == TileState::Normal
}

pub(super) fn prime(
    s: &mut GameSession,
    _step: &mut CascadeStep,
    group: &MatchGroup,
) -> Result<(), BoardError> {
    let origin = group.creation_pos();
    let candidates = select(&s.board, &Board::area(origin, 1), |pos, t| {
        primable(t) && !group.contains(pos)
    })?;
    let Some(&target) = s.rng.pick(&candidates) else {
        return Ok(());
    };
    s.board.tile_mut(target)?.state = TileState::BrightBlue;
    s.events
        .effect(VisualEffect::new(EffectKind::Prime, origin).with_target(target));
    Ok(())
}

pub(super) fn hydro_beam(
    s: &mut GameSession,
    step: &mut CascadeStep,
    group: &MatchGroup,
) -> Result<(), BoardError> {
    let origin = group.creation_pos();
    let (beam, beside): (Vec<Pos>, Vec<Pos>) = match group.orientation {
        Orientation::Horizontal => (
            Board::row_cells(origin.row).collect(),
            [origin.row.checked_sub(1), Some(origin.row + 1)]
                .into_iter()
                .flatten()
                .filter(|&r| Board::in_bounds(r as isize, 0))
                .flat_map(Board::row_cells)
                .collect(),
        ),
        Orientation::Vertical => (
            Board::col_cells(origin.col).collect(),
            [origin.col.checked_sub(1), Some(origin.col + 1)]
                .into_iter()
                .flatten()
                .filter(|&c| Board::in_bounds(0, c as isize))
                .flat_map(Board::col_cells)
                .collect(),
        ),
    };

    step.removal.extend(beam.iter().copied());
    s.events.effect(
        VisualEffect::new(EffectKind::HydroBeam, origin)
            .with_orientation(group.orientation)
            .with_cells(beam),
    );

    let primed = select(&s.board, &beside, |_, t| primable(t))?;
    for &pos in &primed {
        s.board.tile_mut(pos)?.state = TileState::BrightBlue;
    }
    if !primed.is_empty() {
        s.events
            .effect(VisualEffect::new(EffectKind::Prime, origin).with_cells(primed));
    }
    Ok(())
}
