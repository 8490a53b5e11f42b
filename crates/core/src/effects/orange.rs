//! Orange: acid and biohazard. Both convert tiles rather than remove them.

use super::{convert, count_colors, mode_color, select, select_all};
use crate::board::Board;
use crate::chain::CascadeStep;
use crate::error::BoardError;
use crate::matcher::MatchGroup;
use crate::session::GameSession;
use crate::types::{Color, EffectKind, GameEvent, Pos, Tile, TileState, VisualEffect};

const BIOHAZARD_SPREAD: usize = 3;

fn corrodible(tile: &Tile) -> bool {
    tile.color != Color::Orange && !tile.is_gold() && !tile.is_fusion_core()
}

fn infect(s: &mut GameSession, pos: Pos) -> Result<(), BoardError> {
    let tile = s.board.tile_mut(pos)?;
    convert(tile, Color::Orange);
    tile.state = TileState::Normal;
    Ok(())
}

pub(super) fn acid(
    s: &mut GameSession,
    _step: &mut CascadeStep,
    group: &MatchGroup,
) -> Result<(), BoardError> {
    let origin = group.creation_pos();
    let candidates = select(&s.board, &Board::area(origin, 1), |_, t| corrodible(t))?;
    let Some(&target) = s.rng.pick(&candidates) else {
        return Ok(());
    };
    infect(s, target)?;
    s.events
        .effect(VisualEffect::new(EffectKind::Acid, origin).with_target(target));
    Ok(())
}

pub(super) fn biohazard(
    s: &mut GameSession,
    _step: &mut CascadeStep,
    group: &MatchGroup,
) -> Result<(), BoardError> {
    let all: Vec<Pos> = Board::positions().collect();
    let counts = count_colors(&s.board, &all, |_, t| corrodible(t))?;
    let Some(mode) = mode_color(&counts, &mut s.rng) else {
        return Ok(());
    };

    let mut victims = select_all(&s.board, |_, t| t.color == mode && corrodible(t));
    s.rng.shuffle(&mut victims);
    victims.truncate(BIOHAZARD_SPREAD);
    for &pos in &victims {
        infect(s, pos)?;
    }
    s.events.game(GameEvent::Siren);
    s.events.effect(
        VisualEffect::new(EffectKind::Biohazard, group.creation_pos()).with_cells(victims),
    );
    Ok(())
}
