//! Yellow: the voltage system.
//!
//! Yellow tiles carry a voltage from 1 to 3. A match-3 spends the summed
//! voltage of its run on exactly one discharge tier:
//!
//! - 9: queue a fusion core at the creation position
//! - 7+: EMP over the 3x3
//! - 5+: two bolts within a 7x7
//! - 3+: one bolt anywhere on the board
//!
//! Charging a tile already at 3, or charging it up to 3, overloads it: the
//! tile drops back to 1 and blasts its 3x3, chaining into neighboring
//! fully charged yellows. A match-4 releases a ball lightning instead, which
//! roams a few cells after the cascade settles and then detonates.

use super::{convert, select_all};
use crate::board::Board;
use crate::chain::CascadeStep;
use crate::error::BoardError;
use crate::matcher::MatchGroup;
use crate::session::GameSession;
use crate::types::{
    Color, Direction, EffectKind, GameEvent, Pos, TileState, VisualEffect, BALL_LIGHTNING_STEPS,
    BOLT_MS, BOLT_VOLTAGE, BALL_STEP_MS, EMP_VOLTAGE, FUSION_VOLTAGE, GRID_SIZE, MAX_VOLTAGE,
    TWIN_BOLT_RADIUS, TWIN_BOLT_VOLTAGE,
};

/// A ball lightning waiting for the board to settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BallLightning {
    pub pos: Pos,
    pub last_dir: Direction,
    pub steps_left: u8,
}

pub(super) fn discharge(
    s: &mut GameSession,
    step: &mut CascadeStep,
    group: &MatchGroup,
) -> Result<(), BoardError> {
    let origin = group.creation_pos();
    let mut sum: u32 = 0;
    for &pos in &group.tiles {
        sum += u32::from(s.board.tile(pos)?.voltage());
    }

    if sum >= u32::from(FUSION_VOLTAGE) {
        s.pending_fusion_cores.push(origin);
    } else if sum >= u32::from(EMP_VOLTAGE) {
        emp(s, origin)?;
    } else if sum >= u32::from(TWIN_BOLT_VOLTAGE) {
        bolt(s, step, origin, TWIN_BOLT_RADIUS)?;
        bolt(s, step, origin, TWIN_BOLT_RADIUS)?;
    } else if sum >= u32::from(BOLT_VOLTAGE) {
        bolt(s, step, origin, GRID_SIZE)?;
    }
    Ok(())
}

/// Strike the least charged yellow within `radius` of `origin`.
fn bolt(
    s: &mut GameSession,
    step: &mut CascadeStep,
    origin: Pos,
    radius: usize,
) -> Result<(), BoardError> {
    let mut candidates: Vec<(Pos, u8)> = Vec::new();
    for pos in Board::area(origin, radius) {
        if let Some(tile) = s.board.get(pos)? {
            if tile.color == Color::Yellow && !tile.is_fusion_core() {
                candidates.push((pos, tile.voltage()));
            }
        }
    }

    let Some(lowest) = candidates.iter().map(|&(_, v)| v).min() else {
        s.events.game(GameEvent::Fizzle);
        s.events.effect(VisualEffect::new(EffectKind::Fizzle, origin));
        return Ok(());
    };
    let weakest: Vec<Pos> = candidates
        .iter()
        .filter(|&&(_, v)| v == lowest)
        .map(|&(p, _)| p)
        .collect();
    let Some(&target) = s.rng.pick(&weakest) else {
        return Ok(());
    };

    s.events
        .effect(VisualEffect::new(EffectKind::Lightning, origin).with_target(target));
    s.events.game(GameEvent::Zap);
    s.events.pause(BOLT_MS);
    charge(s, step, target)
}

/// Add one unit of charge to a yellow tile.
pub(crate) fn charge(
    s: &mut GameSession,
    step: &mut CascadeStep,
    pos: Pos,
) -> Result<(), BoardError> {
    let tile = s.board.tile_mut(pos)?;
    if tile.color != Color::Yellow {
        return Ok(());
    }
    if tile.voltage() >= MAX_VOLTAGE {
        return overload(s, step, pos);
    }
    let charged = tile.voltage() + 1;
    tile.voltage = Some(charged);
    if charged >= MAX_VOLTAGE {
        overload(s, step, pos)?;
    }
    Ok(())
}

/// Overload the tile at `start` and every fully charged yellow its blast reaches.
pub(crate) fn overload(
    s: &mut GameSession,
    step: &mut CascadeStep,
    start: Pos,
) -> Result<(), BoardError> {
    let mut queue = vec![start];
    while let Some(pos) = queue.pop() {
        let Some(tile) = s.board.get_mut(pos)? else {
            continue;
        };
        if !step.overloaded.insert(tile.id) {
            continue;
        }
        tile.voltage = Some(1);

        let mut blast = Vec::with_capacity(8);
        for n in Board::neighbors8(pos) {
            match s.board.get(n)? {
                Some(t)
                    if t.color == Color::Yellow
                        && !t.is_fusion_core()
                        && t.voltage() >= MAX_VOLTAGE =>
                {
                    queue.push(n)
                }
                Some(_) => {
                    step.removal.insert(n);
                    blast.push(n);
                }
                None => {}
            }
        }
        s.events.game(GameEvent::Explosion(Color::Yellow));
        s.events
            .effect(VisualEffect::new(EffectKind::Overload, pos).with_cells(blast));
    }
    Ok(())
}

fn emp(s: &mut GameSession, origin: Pos) -> Result<(), BoardError> {
    let mut hit = Vec::new();
    for pos in Board::area(origin, 1) {
        let Some(tile) = s.board.get_mut(pos)? else {
            continue;
        };
        if tile.is_gold() || tile.is_frozen() || tile.is_fusion_core() {
            continue;
        }
        if tile.color == Color::Yellow {
            tile.voltage = Some(MAX_VOLTAGE);
        } else {
            convert(tile, Color::Yellow);
            hit.push(pos);
        }
    }
    s.events
        .effect(VisualEffect::new(EffectKind::Emp, origin).with_cells(hit));
    Ok(())
}

/// Ball lightning contact rule for a single cell.
fn transmute(s: &mut GameSession, step: &mut CascadeStep, pos: Pos) -> Result<(), BoardError> {
    let Some(tile) = s.board.get_mut(pos)? else {
        return Ok(());
    };
    if tile.is_gold() || tile.is_fusion_core() {
        return Ok(());
    }
    if tile.color != Color::Yellow {
        convert(tile, Color::Yellow);
        tile.state = TileState::Normal;
        return Ok(());
    }
    if tile.voltage() < MAX_VOLTAGE {
        tile.voltage = Some(MAX_VOLTAGE);
        return Ok(());
    }
    overload(s, step, pos)
}

pub(super) fn ball_lightning(
    s: &mut GameSession,
    step: &mut CascadeStep,
    group: &MatchGroup,
) -> Result<(), BoardError> {
    let origin = group.creation_pos();
    let in_bounds = |d: &Direction| Board::step(origin, *d).is_some();

    let mut dirs: Vec<Direction> = group
        .orientation
        .perpendicular()
        .into_iter()
        .filter(in_bounds)
        .collect();
    if dirs.is_empty() {
        dirs = Direction::ALL.into_iter().filter(in_bounds).collect();
    }
    let Some(&dir) = s.rng.pick(&dirs) else {
        return Ok(());
    };
    let Some(pos) = Board::step(origin, dir) else {
        return Ok(());
    };

    s.events
        .effect(VisualEffect::new(EffectKind::BallLightning, origin).with_target(pos));
    transmute(s, step, pos)?;
    s.pending_ball_lightnings.push(BallLightning {
        pos,
        last_dir: dir,
        steps_left: BALL_LIGHTNING_STEPS,
    });
    Ok(())
}

/// Let every queued ball lightning finish its walk and detonate.
///
/// Drains the queue. The returned step still has to go through chain
/// expansion and removal.
pub(crate) fn resume_ball_lightnings(s: &mut GameSession) -> Result<CascadeStep, BoardError> {
    let mut step = CascadeStep::new();
    let balls = std::mem::take(&mut s.pending_ball_lightnings);

    for mut ball in balls {
        for _ in 0..ball.steps_left {
            let back = ball.last_dir.opposite();
            let moves: Vec<Direction> = Direction::ALL
                .into_iter()
                .filter(|&d| d != back && Board::step(ball.pos, d).is_some())
                .collect();
            let Some(&dir) = s.rng.pick(&moves) else {
                break;
            };
            let Some(next) = Board::step(ball.pos, dir) else {
                break;
            };
            ball.pos = next;
            ball.last_dir = dir;

            s.events.pause(BALL_STEP_MS);
            s.events
                .effect(VisualEffect::new(EffectKind::BallLightning, next));
            transmute(s, &mut step, next)?;
        }

        let blast = Board::area(ball.pos, 1);
        step.removal.extend(blast.iter().copied());
        s.events.game(GameEvent::Explosion(Color::Yellow));
        s.events
            .effect(VisualEffect::new(EffectKind::BallDetonation, ball.pos).with_cells(blast));
    }
    Ok(step)
}

/// End-of-turn pulse of every fusion core on the board.
pub(crate) fn pulse_fusion_cores(s: &mut GameSession) -> Result<CascadeStep, BoardError> {
    let mut step = CascadeStep::new();
    let cores = select_all(&s.board, |_, t| t.is_fusion_core());

    for core in cores {
        let mut zapped = Vec::new();
        for n in Board::neighbors8(core) {
            let Some(tile) = s.board.get(n)?.copied() else {
                continue;
            };
            if tile.is_fusion_core() || tile.is_gold() {
                continue;
            }
            if tile.color == Color::Yellow {
                charge(s, &mut step, n)?;
            } else {
                step.removal.insert(n);
                zapped.push(n);
            }
        }

        let tile = s.board.tile_mut(core)?;
        let left = tile.durability.unwrap_or(1).saturating_sub(1);
        tile.durability = Some(left);
        if left == 0 {
            let blast = Board::area(core, 1);
            step.removal.extend(blast.iter().copied());
            s.events.game(GameEvent::Explosion(Color::Yellow));
            s.events
                .effect(VisualEffect::new(EffectKind::FusionMeltdown, core).with_cells(blast));
        } else {
            s.events
                .effect(VisualEffect::new(EffectKind::FusionPulse, core).with_cells(zapped));
        }
    }
    Ok(step)
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::observer::TurnEvent;
    use crate::types::{FUSION_CORE_DURABILITY, TileKind};

    fn effect_count(s: &GameSession, kind: EffectKind) -> usize {
        s.events
            .recorded()
            .iter()
            .filter(|e| matches!(e, TurnEvent::Effect(v) if v.kind == kind))
            .count()
    }

    #[test]
    fn test_full_charge_run_queues_fusion_core_only() {
        let mut rows = QUIET;
        rows[4] = "B G P Y3 Y3 Y3 P W B";
        let mut s = session(&rows);
        let _ = s.take_events();
        let step = run(&mut s, &row_group(4, 3..6));

        assert_eq!(s.pending_fusion_cores(), &[Pos::new(4, 4)]);
        assert_eq!(step.removal.len(), 3);
        assert_eq!(effect_count(&s, EffectKind::Emp), 0);
        assert_eq!(effect_count(&s, EffectKind::Lightning), 0);
        assert_eq!(effect_count(&s, EffectKind::Fizzle), 0);
    }

    #[test]
    fn test_emp_converts_neighbors() {
        let mut rows = QUIET;
        rows[3] = "P W B G P* W B G P";
        rows[4] = "B G P Y3 Y3 Y1 P W B";
        let mut s = session(&rows);
        let _ = run(&mut s, &row_group(4, 3..6));

        let converted = tile_at(&s, 5, 4);
        assert_eq!(converted.color, Color::Yellow);
        assert_eq!(converted.voltage, Some(1));
        // Frozen tiles resist.
        assert_eq!(color_at(&s, 3, 4), Color::Purple);
        // Yellow members are topped up.
        assert_eq!(tile_at(&s, 4, 5).voltage, Some(3));
        assert!(s.pending_fusion_cores().is_empty());
    }

    #[test]
    fn test_bolt_prefers_lowest_voltage() {
        let mut rows = QUIET;
        rows[0] = "Y2 G P W B G P W B";
        rows[8] = "B G P W B G P W Y1";
        let mut s = session(&rows);
        let mut step = CascadeStep::new();
        bolt(&mut s, &mut step, Pos::new(4, 4), GRID_SIZE).unwrap();
        assert_eq!(tile_at(&s, 8, 8).voltage, Some(2));
        assert_eq!(tile_at(&s, 0, 0).voltage, Some(2));
        assert!(step.removal.is_empty());
    }

    #[test]
    fn test_bolt_without_yellow_fizzles() {
        let mut s = session(&QUIET);
        let _ = s.take_events();
        let mut step = CascadeStep::new();
        bolt(&mut s, &mut step, Pos::new(4, 4), TWIN_BOLT_RADIUS).unwrap();
        assert_eq!(effect_count(&s, EffectKind::Fizzle), 1);
        assert!(step.removal.is_empty());
    }

    #[test]
    fn test_charge_to_three_overloads() {
        let mut rows = QUIET;
        rows[4] = "B G P W Y2 G P W B";
        let mut s = session(&rows);
        let mut step = CascadeStep::new();
        charge(&mut s, &mut step, Pos::new(4, 4)).unwrap();
        assert_eq!(tile_at(&s, 4, 4).voltage, Some(1));
        assert_eq!(step.removal.len(), 8);
        assert!(!step.removal.contains(&Pos::new(4, 4)));
    }

    #[test]
    fn test_overload_chains_once_per_tile() {
        let mut rows = QUIET;
        rows[4] = "B G P W Y3 Y3 P W B";
        let mut s = session(&rows);
        let mut step = CascadeStep::new();
        overload(&mut s, &mut step, Pos::new(4, 4)).unwrap();
        // Two overlapping 3x3 blasts. The second blast takes the first
        // center, which is back at voltage 1; the last link survives.
        assert_eq!(step.removal.len(), 11);
        assert!(step.removal.contains(&Pos::new(4, 4)));
        assert!(!step.removal.contains(&Pos::new(4, 5)));
        assert_eq!(step.overloaded.len(), 2);
        assert_eq!(effect_count(&s, EffectKind::Overload), 2);
    }

    #[test]
    fn test_ball_lightning_escapes_sideways_then_detonates() {
        let mut rows = QUIET;
        rows[4] = "B G Y Y Y Y P W B";
        let mut s = session(&rows);
        let step = run(&mut s, &row_group(4, 2..6));
        assert_eq!(step.removal.len(), 4);

        let ball = s.pending_ball_lightnings()[0];
        assert_eq!(ball.pos.col, 4);
        assert!(ball.pos.row == 3 || ball.pos.row == 5);
        assert_eq!(ball.steps_left, BALL_LIGHTNING_STEPS);
        assert_eq!(color_at(&s, ball.pos.row, ball.pos.col), Color::Yellow);

        let after = resume_ball_lightnings(&mut s).unwrap();
        assert!(s.pending_ball_lightnings().is_empty());
        assert!(after.removal.len() >= 4);
        assert_eq!(effect_count(&s, EffectKind::BallDetonation), 1);
    }

    #[test]
    fn test_transmute_thaws_and_recolors() {
        let mut rows = QUIET;
        rows[2] = "B G P W* B G P W B";
        let mut s = session(&rows);
        let mut step = CascadeStep::new();
        transmute(&mut s, &mut step, Pos::new(2, 3)).unwrap();
        let tile = tile_at(&s, 2, 3);
        assert_eq!(tile.color, Color::Yellow);
        assert_eq!(tile.voltage, Some(1));
        assert_eq!(tile.state, TileState::Normal);
    }

    #[test]
    fn test_fusion_core_pulse_wears_down() {
        let mut rows = QUIET;
        rows[4] = "B G P W Y3# G P W B";
        let mut s = session(&rows);
        let step = pulse_fusion_cores(&mut s).unwrap();
        assert_eq!(step.removal.len(), 8);
        let core = tile_at(&s, 4, 4);
        assert_eq!(core.kind, TileKind::FusionCore);
        assert_eq!(core.durability, Some(FUSION_CORE_DURABILITY - 1));

        s.board.tile_mut(Pos::new(4, 4)).unwrap().durability = Some(1);
        let step = pulse_fusion_cores(&mut s).unwrap();
        assert_eq!(step.removal.len(), 9);
        assert!(step.removal.contains(&Pos::new(4, 4)));
    }

    #[test]
    fn test_fusion_core_charges_adjacent_yellow() {
        let mut rows = QUIET;
        rows[3] = "P W B G Y1 W B G P";
        rows[4] = "B G P W Y3# G P W B";
        let mut s = session(&rows);
        let step = pulse_fusion_cores(&mut s).unwrap();
        assert_eq!(tile_at(&s, 3, 4).voltage, Some(2));
        assert_eq!(step.removal.len(), 7);
    }
}
