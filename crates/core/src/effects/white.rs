//! White: frost nova and glacier.

use std::collections::BTreeSet;

use super::freeze;
use crate::board::Board;
use crate::chain::CascadeStep;
use crate::error::BoardError;
use crate::matcher::MatchGroup;
use crate::session::GameSession;
use crate::types::{Color, Direction, EffectKind, Pos, VisualEffect};

const GLACIER_SEEDS: usize = 4;
const GLACIER_PAIRS: usize = 2;

pub(super) fn frost_nova(
    s: &mut GameSession,
    step: &mut CascadeStep,
    group: &MatchGroup,
) -> Result<(), BoardError> {
    let origin = group.creation_pos();
    let mut frozen = Vec::new();
    for &pos in &group.tiles {
        if s.board.tile(pos)?.is_frozen() {
            frozen.push(pos);
        }
    }

    if frozen.is_empty() {
        for &pos in &group.tiles {
            freeze(s.board.tile_mut(pos)?);
        }
        s.events.effect(
            VisualEffect::new(EffectKind::FrostNova, origin).with_cells(group.tiles.clone()),
        );
        return Ok(());
    }

    for &pos in &group.tiles {
        if !frozen.contains(&pos) {
            freeze(s.board.tile_mut(pos)?);
        }
    }
    step.removal.extend(frozen.iter().copied());
    s.events
        .effect(VisualEffect::new(EffectKind::Shatter, origin).with_cells(frozen));
    Ok(())
}

pub(super) fn glacier(
    s: &mut GameSession,
    step: &mut CascadeStep,
    group: &MatchGroup,
) -> Result<(), BoardError> {
    let mut seeds = super::select_all(&s.board, |_, t| t.is_frozen());
    s.rng.shuffle(&mut seeds);
    seeds.truncate(GLACIER_SEEDS);

    // Flood each seed through orthogonally connected ice.
    let mut shattered: BTreeSet<Pos> = BTreeSet::new();
    let mut stack = seeds;
    while let Some(pos) = stack.pop() {
        if !shattered.insert(pos) {
            continue;
        }
        for n in Board::neighbors4(pos) {
            if !shattered.contains(&n) && s.board.get(n)?.is_some_and(|t| t.is_frozen()) {
                stack.push(n);
            }
        }
    }
    step.removal.extend(shattered.iter().copied());

    let touches_group =
        |p: Pos| group.contains(p) || Board::neighbors4(p).iter().any(|&n| group.contains(n));
    let mut pairs: Vec<(Pos, Pos)> = Vec::new();
    for (pos, tile) in s.board.occupied() {
        if !freezable_white(tile) || touches_group(pos) {
            continue;
        }
        for dir in [Direction::Right, Direction::Down] {
            let Some(other) = Board::step(pos, dir) else {
                continue;
            };
            if touches_group(other) {
                continue;
            }
            if s.board.get(other)?.is_some_and(freezable_white) {
                pairs.push((pos, other));
            }
        }
    }
    s.rng.shuffle(&mut pairs);
    pairs.truncate(GLACIER_PAIRS);

    let mut iced = Vec::with_capacity(GLACIER_PAIRS * 2);
    for (a, b) in pairs {
        for p in [a, b] {
            if freeze(s.board.tile_mut(p)?) {
                iced.push(p);
            }
        }
    }

    let mut cells: Vec<Pos> = shattered.into_iter().collect();
    cells.extend(iced);
    s.events.effect(
        VisualEffect::new(EffectKind::Glacier, group.creation_pos()).with_cells(cells),
    );
    Ok(())
}

fn freezable_white(tile: &crate::types::Tile) -> bool {
    tile.color == Color::White && !tile.is_frozen() && !tile.is_gold()
}
