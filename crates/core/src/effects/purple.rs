//! Purple: vortex, empower, and the void pulse fired by bright-purple tiles.

use super::{convert, count_colors, mode_color, select};
use crate::board::Board;
use crate::chain::CascadeStep;
use crate::error::BoardError;
use crate::matcher::MatchGroup;
use crate::session::GameSession;
use crate::types::{Color, EffectKind, Pos, TileState, VisualEffect, VOID_PULSE_RECOLORS};

pub(super) fn vortex(
    s: &mut GameSession,
    _step: &mut CascadeStep,
    group: &MatchGroup,
) -> Result<(), BoardError> {
    let origin = group.creation_pos();
    let area = Board::area(origin, 1);
    let counts = count_colors(&s.board, &area, |pos, t| !t.is_gold() && !group.contains(pos))?;
    let Some(mode) = mode_color(&counts, &mut s.rng) else {
        return Ok(());
    };

    let targets = select(&s.board, &area, |pos, t| {
        !t.is_frozen()
            && !t.is_gold()
            && !t.is_fusion_core()
            && !group.contains(pos)
            && t.color != mode
    })?;
    let Some(&target) = s.rng.pick(&targets) else {
        return Ok(());
    };
    convert(s.board.tile_mut(target)?, mode);
    s.events
        .effect(VisualEffect::new(EffectKind::Vortex, origin).with_target(target));
    Ok(())
}

pub(super) fn empower(
    s: &mut GameSession,
    _step: &mut CascadeStep,
    group: &MatchGroup,
) -> Result<(), BoardError> {
    let candidates = super::select_all(&s.board, |_, t| {
        t.color == Color::Purple && t.state == TileState::Normal
    });
    let Some(&target) = s.rng.pick(&candidates) else {
        return Ok(());
    };
    s.board.tile_mut(target)?.state = TileState::BrightPurple;
    s.events.effect(
        VisualEffect::new(EffectKind::Empower, group.creation_pos()).with_target(target),
    );
    Ok(())
}

/// Recolor up to [`VOID_PULSE_RECOLORS`] tiles of the 5x5 around `center` to
/// the area's dominant color. The pulsing tile itself is left alone.
pub(crate) fn void_pulse(s: &mut GameSession, center: Pos) -> Result<(), BoardError> {
    let area = Board::area(center, 2);
    let counts = count_colors(&s.board, &area, |_, t| !t.is_gold())?;
    let Some(mode) = mode_color(&counts, &mut s.rng) else {
        return Ok(());
    };

    let mut targets = select(&s.board, &area, |pos, t| {
        pos != center && !t.is_gold() && !t.is_fusion_core() && !t.is_frozen()
    })?;
    s.rng.shuffle(&mut targets);
    targets.truncate(VOID_PULSE_RECOLORS);

    // Only color and state change; clear tiles keep their kind.
    for &pos in &targets {
        let tile = s.board.tile_mut(pos)?;
        tile.transmute_to(mode);
        tile.state = TileState::Normal;
    }
    s.events
        .effect(VisualEffect::new(EffectKind::VoidPulse, center).with_cells(targets));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::types::TileKind;

    #[test]
    fn test_vortex_recolors_one_tile_to_local_majority() {
        let mut rows = QUIET;
        rows[3] = "P W B G R R R G P";
        rows[4] = "B G P W P P P W B";
        rows[5] = "P W B G R R B G P";
        let mut s = session(&rows);
        let group = row_group(4, 4..7);
        let _ = run(&mut s, &group);

        // Red holds 5 of the 6 remaining cells; (5,6) is the only other color.
        assert_eq!(color_at(&s, 5, 6), Color::Red);
    }

    #[test]
    fn test_vortex_skips_frozen_and_gold() {
        let mut rows = QUIET;
        rows[3] = "P W B G R R R G P";
        rows[4] = "B G P W P P P W B";
        rows[5] = "P W B G R R B$ G P";
        let mut s = session(&rows);
        let _ = run(&mut s, &row_group(4, 4..7));
        let tile = tile_at(&s, 5, 6);
        assert_eq!(tile.color, Color::Blue);
        assert_eq!(tile.kind, TileKind::Gold);
    }

    #[test]
    fn test_empower_marks_a_purple() {
        let mut rows = QUIET;
        rows[4] = "B G P W P P P P B";
        let mut s = session(&rows);
        let _ = run(&mut s, &row_group(4, 4..8));
        let bright = s
            .board()
            .occupied()
            .filter(|(_, t)| t.state == TileState::BrightPurple)
            .count();
        assert_eq!(bright, 1);
    }

    #[test]
    fn test_void_pulse_recolors_four() {
        let mut rows = QUIET;
        rows[4] = "B G P W P^ G P W B";
        let mut s = session(&rows);
        let center = Pos::new(4, 4);
        let before = s.board().clone();
        void_pulse(&mut s, center).unwrap();

        let changed = Board::area(center, 2)
            .into_iter()
            .filter(|&p| before.tile(p).unwrap().color != s.board().tile(p).unwrap().color)
            .count();
        assert!(changed <= VOID_PULSE_RECOLORS);
        assert_eq!(tile_at(&s, 4, 4).state, TileState::BrightPurple);
    }

    #[test]
    fn test_void_pulse_keeps_clear_tiles_explosive() {
        let mut rows = QUIET;
        rows[3] = "P W B@ G- P| W@ B G P";
        rows[4] = "B G P@ W- P^ G| P@ W B";
        rows[5] = "P W B- G@ P| W- B G P";
        let mut s = session(&rows);
        let center = Pos::new(4, 4);
        let clears = |s: &GameSession| {
            s.board()
                .occupied()
                .filter(|(_, t)| t.kind.is_explosive())
                .count()
        };
        assert_eq!(clears(&s), 12);

        void_pulse(&mut s, center).unwrap();
        assert_eq!(clears(&s), 12);
    }
}
