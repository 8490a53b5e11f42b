//! Green: wind slash and gale.

use std::collections::HashSet;

use crate::board::Board;
use crate::chain::CascadeStep;
use crate::error::BoardError;
use crate::matcher::MatchGroup;
use crate::session::GameSession;
use crate::types::{Color, Direction, EffectKind, Pos, VisualEffect};

pub(super) fn wind_slash(
    s: &mut GameSession,
    step: &mut CascadeStep,
    group: &MatchGroup,
) -> Result<(), BoardError> {
    let origin = group.creation_pos();
    let flanks: Vec<Pos> = group
        .orientation
        .perpendicular()
        .iter()
        .filter_map(|&dir| Board::step(origin, dir))
        .collect();

    let mut cut = Vec::with_capacity(2);
    for &pos in &flanks {
        match s.board.get(pos)? {
            Some(tile) if tile.color == Color::Green => {
                s.events.effect(
                    VisualEffect::new(EffectKind::SlashBlocked, origin)
                        .with_orientation(group.orientation)
                        .with_target(pos),
                );
                return Ok(());
            }
            Some(_) => cut.push(pos),
            None => {}
        }
    }

    step.removal.extend(cut.iter().copied());
    s.events.effect(
        VisualEffect::new(EffectKind::WindSlash, origin)
            .with_orientation(group.orientation)
            .with_cells(cut),
    );
    Ok(())
}

pub(super) fn gale(
    s: &mut GameSession,
    _step: &mut CascadeStep,
    group: &MatchGroup,
) -> Result<(), BoardError> {
    let mut greens = super::select_all(&s.board, |pos, t| {
        t.color == Color::Green && !t.is_frozen() && !t.is_fusion_core() && !group.contains(pos)
    });
    s.rng.shuffle(&mut greens);

    let mut reserved: HashSet<Pos> = HashSet::new();
    let mut slides: Vec<(Pos, Pos)> = Vec::new();

    for from in greens {
        if reserved.contains(&from) {
            continue;
        }
        let mut dirs = Direction::ALL;
        s.rng.shuffle(&mut dirs);

        let mut claimed = None;
        for dir in dirs {
            let Some(to) = Board::step(from, dir) else {
                continue;
            };
            if reserved.contains(&to) {
                continue;
            }
            let open = match s.board.get(to)? {
                None => true,
                Some(t) => {
                    !t.is_gold() && !t.is_frozen() && !t.is_fusion_core() && t.color != Color::Green
                }
            };
            if open {
                claimed = Some(to);
                break;
            }
        }

        match claimed {
            Some(to) => {
                reserved.insert(from);
                reserved.insert(to);
                slides.push((from, to));
            }
            None => s
                .events
                .effect(VisualEffect::new(EffectKind::SlideBlocked, from)),
        }
    }

    for &(from, to) in &slides {
        s.board.swap(from, to)?;
    }
    s.events.effect(
        VisualEffect::new(EffectKind::Gale, group.creation_pos())
            .with_cells(slides.iter().map(|&(_, to)| to).collect()),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use crate::types::{Color, Pos};

    #[test]
    fn test_wind_slash_cuts_both_flanks() {
        let mut rows = QUIET;
        rows[4] = "B G P W G G G W B";
        let mut s = session(&rows);
        let step = run(&mut s, &row_group(4, 4..7));
        assert_eq!(step.removal.len(), 5);
        assert!(step.removal.contains(&Pos::new(3, 5)));
        assert!(step.removal.contains(&Pos::new(5, 5)));
    }

    #[test]
    fn test_wind_slash_blocked_by_green_flank() {
        let mut rows = QUIET;
        rows[4] = "B W G G G W P W B";
        // (3,3) is green in the quiet layout.
        let mut s = session(&rows);
        let step = run(&mut s, &row_group(4, 2..5));
        assert_eq!(step.removal.len(), 3);
    }

    #[test]
    fn test_vertical_slash_uses_row_flanks() {
        let mut rows = QUIET;
        rows[3] = "P W B G G W B G P";
        rows[4] = "B G P W G W P W B";
        rows[5] = "P W B G G W B G P";
        let mut s = session(&rows);
        let step = run(&mut s, &col_group(4, 3..6));
        assert!(step.removal.contains(&Pos::new(4, 3)));
        assert!(step.removal.contains(&Pos::new(4, 5)));
        assert_eq!(step.removal.len(), 5);
    }

    #[test]
    fn test_gale_slides_every_free_green_once() {
        let mut rows = QUIET;
        rows[8] = "B W G G G G P W B";
        let mut s = session(&rows);
        let before: Vec<Pos> = s
            .board()
            .occupied()
            .filter(|(p, t)| t.color == Color::Green && p.row != 8)
            .map(|(p, _)| p)
            .collect();
        let group = row_group(8, 2..6);
        let _ = run(&mut s, &group);

        // Greens never swap with greens, so the green count outside the
        // group is preserved and none of the old cells keeps its green.
        let after = s
            .board()
            .occupied()
            .filter(|(p, t)| t.color == Color::Green && !group.contains(*p))
            .count();
        assert_eq!(after, before.len());
        for pos in before {
            assert_ne!(color_at(&s, pos.row, pos.col), Color::Green);
        }
    }
}
