//! Red: scorch and firestorm.

use super::select;
use crate::board::Board;
use crate::chain::CascadeStep;
use crate::error::BoardError;
use crate::matcher::MatchGroup;
use crate::session::GameSession;
use crate::types::{Color, EffectKind, Pos, VisualEffect};

/// Random occupied non-red neighbor of `origin`, if any.
fn ember_target(s: &mut GameSession, origin: Pos) -> Result<Option<Pos>, BoardError> {
    let around: Vec<Pos> = Board::neighbors8(origin).into_iter().collect();
    let targets = select(&s.board, &around, |_, t| t.color != Color::Red)?;
    Ok(s.rng.pick(&targets).copied())
}

pub(super) fn scorch(
    s: &mut GameSession,
    step: &mut CascadeStep,
    group: &MatchGroup,
) -> Result<(), BoardError> {
    let origin = group.creation_pos();
    let Some(target) = ember_target(s, origin)? else {
        return Ok(());
    };
    step.removal.insert(target);
    s.events
        .effect(VisualEffect::new(EffectKind::Scorch, origin).with_target(target));
    Ok(())
}

pub(super) fn firestorm(
    s: &mut GameSession,
    step: &mut CascadeStep,
    group: &MatchGroup,
) -> Result<(), BoardError> {
    let mut reds = super::select_all(&s.board, |_, t| t.color == Color::Red);
    s.rng.shuffle(&mut reds);
    reds.truncate(3);

    let mut struck = Vec::new();
    for red in reds {
        if let Some(target) = ember_target(s, red)? {
            step.removal.insert(target);
            struck.push(target);
        }
    }
    s.events.effect(
        VisualEffect::new(EffectKind::Firestorm, group.creation_pos()).with_cells(struck),
    );
    Ok(())
}
