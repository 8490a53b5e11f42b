//! Turn controller: one player swap, resolved to a quiescent board.
//!
//! A turn runs to completion inside [`GameSession::request_swap`]. Every step
//! is reported through the session's observer as it happens and is also
//! recorded, with pacing pauses, in the returned event log:
//!
//! 1. validate and swap (golden swaps trigger a whirlwind instead of matching)
//! 2. resolve cascades: effects, chain expansion, frozen waves, spawns, gravity
//! 3. ball lightnings finish their walk and detonate
//! 4. fusion cores pulse
//! 5. reshuffle while no legal move exists, then check the level objectives

use thiserror::Error;

use crate::chain::{self, build_frozen_waves, CascadeStep, Forge};
use crate::effects::{self, yellow};
use crate::error::EngineResult;
use crate::gravity;
use crate::matcher::{find_match_groups, has_matches, MatchGroup};
use crate::moves::has_possible_moves;
use crate::observer::TurnEvent;
use crate::scoring::{wave_score, whirlwind_score};
use crate::session::GameSession;
use crate::types::{
    EffectKind, GameEvent, Pos, TileKind, VisualEffect, EFFECT_MS, GOLD_ABSORB_COUNT, GRAVITY_MS,
    GRID_SIZE, INVALID_MS, REMOVE_MS, SHUFFLE_MS, SWAP_MS, WAVE_PAUSE_MS, WHIRLWIND_MS,
};
use crate::{log_debug, log_error, log_info, log_warn};

/// Cascade iterations per resolve loop before giving up on the board.
const MAX_CASCADE_ITERATIONS: u32 = 100;
/// Reshuffles per turn before accepting a board without moves.
const MAX_RESHUFFLES: u32 = 50;

/// Why a swap request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidMove {
    #[error("cell is outside the board")]
    OutOfBounds,
    #[error("both cells are the same")]
    SameCell,
    #[error("cell is empty")]
    EmptyCell,
    #[error("frozen tiles cannot move")]
    Frozen,
    #[error("fusion cores cannot move")]
    FusionCore,
    #[error("cells are not adjacent")]
    NotAdjacent,
}

/// Summary of a resolved turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub events: Vec<TurnEvent>,
    pub score_gained: u32,
    /// Cascade iterations across every resolve loop of the turn.
    pub combos: u32,
    pub golden: bool,
    pub reshuffles: u32,
    pub level_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// A turn is already resolving, or the level is over.
    Ignored,
    Rejected(InvalidMove),
    /// The swap made no match and was undone.
    Reverted(Vec<TurnEvent>),
    Resolved(TurnReport),
    /// Resolution hit a structural error. The board is left as it was at that point.
    Aborted(crate::error::EngineError),
}

impl TurnOutcome {
    pub fn events(&self) -> &[TurnEvent] {
        match self {
            TurnOutcome::Reverted(events) => events,
            TurnOutcome::Resolved(report) => &report.events,
            _ => &[],
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, TurnOutcome::Resolved(_))
    }
}

#[derive(Debug, Default)]
struct TurnStats {
    combos: u32,
    golden: bool,
    reshuffles: u32,
}

fn on_board(pos: Pos) -> bool {
    pos.row < GRID_SIZE && pos.col < GRID_SIZE
}

impl GameSession {
    /// Try to swap the tiles at `a` and `b` and resolve everything that follows.
    pub fn request_swap(&mut self, a: Pos, b: Pos) -> TurnOutcome {
        if self.processing || self.complete {
            return TurnOutcome::Ignored;
        }
        if let Err(reason) = self.validate_swap(a, b) {
            log_debug!("Turn", "swap {:?} -> {:?} rejected: {}", a, b, reason);
            self.events.game(GameEvent::Invalid);
            self.events.take_log();
            return TurnOutcome::Rejected(reason);
        }

        self.processing = true;
        self.processed.clear();
        let start_score = self.score;
        let result = self.run_turn(a, b);
        self.processing = false;
        let events = self.events.take_log();

        match result {
            Ok(Some(stats)) => TurnOutcome::Resolved(TurnReport {
                events,
                score_gained: self.score.saturating_sub(start_score),
                combos: stats.combos,
                golden: stats.golden,
                reshuffles: stats.reshuffles,
                level_complete: self.complete,
            }),
            Ok(None) => TurnOutcome::Reverted(events),
            Err(err) => {
                log_error!("Turn", "resolution aborted: {}", err);
                self.pending_fusion_cores.clear();
                self.pending_ball_lightnings.clear();
                TurnOutcome::Aborted(err)
            }
        }
    }

    fn validate_swap(&self, a: Pos, b: Pos) -> Result<(), InvalidMove> {
        if !on_board(a) || !on_board(b) {
            return Err(InvalidMove::OutOfBounds);
        }
        if a == b {
            return Err(InvalidMove::SameCell);
        }
        let (Some(ta), Some(tb)) = (
            self.board.get(a).ok().flatten(),
            self.board.get(b).ok().flatten(),
        ) else {
            return Err(InvalidMove::EmptyCell);
        };
        if ta.is_frozen() || tb.is_frozen() {
            return Err(InvalidMove::Frozen);
        }
        if ta.is_fusion_core() || tb.is_fusion_core() {
            return Err(InvalidMove::FusionCore);
        }
        if !a.is_adjacent(b) && !ta.is_gold() && !tb.is_gold() {
            return Err(InvalidMove::NotAdjacent);
        }
        Ok(())
    }

    /// `Ok(None)` when the swap was reverted.
    fn run_turn(&mut self, a: Pos, b: Pos) -> EngineResult<Option<TurnStats>> {
        let golden = self.board.tile(a)?.is_gold() || self.board.tile(b)?.is_gold();
        log_debug!("Turn", "swap {:?} <-> {:?} (golden: {})", a, b, golden);

        self.board.swap(a, b)?;
        self.events.game(GameEvent::Swap);
        self.events.board_changed(&self.board);
        self.events.pause(SWAP_MS);

        let mut stats = TurnStats {
            golden,
            ..TurnStats::default()
        };

        if golden {
            let gold_pos = if self.board.tile(b)?.is_gold() { b } else { a };
            self.golden_whirlwind(gold_pos)?;
        } else {
            let groups = find_match_groups(&self.board);
            if !groups.iter().any(|g| g.contains(a) || g.contains(b)) {
                self.board.swap(a, b)?;
                self.events.game(GameEvent::Invalid);
                self.events.board_changed(&self.board);
                self.events.pause(INVALID_MS);
                return Ok(None);
            }
        }

        self.stabilize(&mut stats)?;
        self.fusion_core_epilogue(&mut stats)?;
        self.settle_deadlock(&mut stats)?;
        self.check_level_progress();
        Ok(Some(stats))
    }

    /// Sweep away the gold tile and up to [`GOLD_ABSORB_COUNT`] random others,
    /// plus whatever bright-blue tiles and clears among them reach. The sweep
    /// is one batch: no frozen waves, no bright-purple pulses.
    fn golden_whirlwind(&mut self, gold_pos: Pos) -> EngineResult<()> {
        let mut others: Vec<Pos> = self
            .board
            .occupied()
            .map(|(pos, _)| pos)
            .filter(|&pos| pos != gold_pos)
            .collect();
        self.rng.shuffle(&mut others);
        others.truncate(GOLD_ABSORB_COUNT);

        let mut step = CascadeStep::new();
        step.removal.insert(gold_pos);
        step.removal.extend(others);

        self.events.game(GameEvent::Whirlwind);
        self.events.effect(
            VisualEffect::new(EffectKind::Whirlwind, gold_pos)
                .with_cells(step.removal.iter().copied().collect()),
        );
        self.events.pause(WHIRLWIND_MS);

        chain::expand_whirlwind(self, &mut step)?;
        let swept: Vec<Pos> = step.removal.iter().copied().collect();
        let removed = self.remove_tiles(&swept)?;
        self.add_score(whirlwind_score(removed));
        self.events.board_changed(&self.board);
        self.events.pause(REMOVE_MS);
        self.drop_tiles()
    }

    /// Resolve cascades, then let queued ball lightnings finish, until the
    /// board holds no match and nothing is pending.
    fn stabilize(&mut self, stats: &mut TurnStats) -> EngineResult<()> {
        self.resolve_cascades(stats)?;
        while !self.pending_ball_lightnings.is_empty() {
            let mut step = yellow::resume_ball_lightnings(self)?;
            self.clear_step(&mut step, None)?;
            self.drop_tiles()?;
            self.resolve_cascades(stats)?;
        }
        Ok(())
    }

    fn resolve_cascades(&mut self, stats: &mut TurnStats) -> EngineResult<()> {
        let mut combo = 0;
        loop {
            let groups = find_match_groups(&self.board);
            if groups.is_empty() {
                break;
            }
            if combo >= MAX_CASCADE_ITERATIONS {
                log_warn!(
                    "Turn",
                    "cascade still running after {} iterations; stopping",
                    MAX_CASCADE_ITERATIONS
                );
                break;
            }
            combo += 1;
            self.last_combo = combo;
            self.events.game(GameEvent::MatchCombo(combo));
            self.resolve_iteration(&groups, combo)?;
        }
        stats.combos += combo;
        Ok(())
    }

    /// Run one cascade iteration for `groups` at combo depth `combo`:
    /// effects, removal with scoring, special spawns and gravity.
    pub fn resolve_iteration(&mut self, groups: &[MatchGroup], combo: u32) -> EngineResult<()> {
        let mut step = self.collect_effects(groups)?;
        self.clear_step(&mut step, Some(combo))?;
        self.materialize(&step)?;
        self.drop_tiles()
    }

    /// Trigger the skill of every group, in scan order, against the current
    /// board. Nothing is removed yet; the returned step holds the removal set.
    pub fn collect_effects(&mut self, groups: &[MatchGroup]) -> EngineResult<CascadeStep> {
        let mut step = CascadeStep::new();
        for group in groups {
            effects::apply_group(self, &mut step, group)?;
        }
        self.events.pause(EFFECT_MS);
        Ok(step)
    }

    /// Expand a removal set, then remove it wave by wave. Waves score only
    /// when a combo depth is given.
    fn clear_step(&mut self, step: &mut CascadeStep, combo: Option<u32>) -> EngineResult<()> {
        chain::expand(self, step)?;
        let waves = build_frozen_waves(&self.board, &step.removal)?;

        for (i, wave) in waves.iter().enumerate() {
            if wave.is_empty() {
                continue;
            }
            if i > 0 {
                self.events.pause(WAVE_PAUSE_MS);
                self.events.effect(
                    VisualEffect::new(EffectKind::Shatter, wave[0]).with_cells(wave.clone()),
                );
            }
            let removed = self.remove_tiles(wave)?;
            if let Some(combo) = combo {
                self.add_score(wave_score(removed, combo));
            }
            self.events.board_changed(&self.board);
            self.events.pause(REMOVE_MS);
        }
        Ok(())
    }

    /// Place the gold tiles and fusion cores earned this iteration.
    fn materialize(&mut self, step: &CascadeStep) -> EngineResult<()> {
        let mut placed = false;
        for forge in &step.forge {
            match *forge {
                Forge::Gold { pos, color } => {
                    let tile = self.factory.gold(color);
                    self.board.set(pos, Some(tile))?;
                    self.events.game(GameEvent::SpecialCreated(TileKind::Gold));
                    self.events.effect(VisualEffect::new(EffectKind::Forge, pos));
                    placed = true;
                }
            }
        }
        for pos in std::mem::take(&mut self.pending_fusion_cores) {
            let tile = self.factory.fusion_core();
            self.board.set(pos, Some(tile))?;
            self.events
                .game(GameEvent::SpecialCreated(TileKind::FusionCore));
            self.events.effect(VisualEffect::new(EffectKind::Forge, pos));
            placed = true;
        }
        if placed {
            self.events.board_changed(&self.board);
        }
        Ok(())
    }

    fn drop_tiles(&mut self) -> EngineResult<()> {
        let moves = gravity::apply_gravity(&mut self.board, &mut self.factory, &mut self.rng)?;
        self.events.fell(moves);
        self.events.board_changed(&self.board);
        self.events.pause(GRAVITY_MS);
        Ok(())
    }

    fn fusion_core_epilogue(&mut self, stats: &mut TurnStats) -> EngineResult<()> {
        if !self.board.occupied().any(|(_, t)| t.is_fusion_core()) {
            return Ok(());
        }
        let mut step = yellow::pulse_fusion_cores(self)?;
        self.clear_step(&mut step, None)?;
        self.drop_tiles()?;
        self.stabilize(stats)
    }

    /// Reshuffle until a legal swap exists.
    fn settle_deadlock(&mut self, stats: &mut TurnStats) -> EngineResult<()> {
        while !has_possible_moves(&self.board) {
            if stats.reshuffles >= MAX_RESHUFFLES {
                log_warn!("Turn", "no legal move after {} reshuffles", MAX_RESHUFFLES);
                break;
            }
            stats.reshuffles += 1;
            log_info!("Turn", "no legal move; reshuffling");

            self.events.game(GameEvent::Shuffle);
            self.events.pause(SHUFFLE_MS);
            let mut tiles = self.board.drain_tiles();
            self.rng.shuffle(&mut tiles);
            self.board.fill_from(tiles);
            self.events.board_changed(&self.board);

            if has_matches(&self.board) {
                self.stabilize(stats)?;
            }
        }
        Ok(())
    }

    fn check_level_progress(&mut self) {
        if self.complete || !self.level_status().complete {
            return;
        }
        self.complete = true;
        log_info!("Turn", "level {} complete with {} points", self.level.number, self.score);
        self.events.game(GameEvent::LevelComplete(self.level.number));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::testing::QUIET;
    use crate::level::LevelTargets;
    use crate::moves::find_possible_move;
    use crate::types::Color;

    fn session(rows: &[&str]) -> GameSession {
        let mut s = GameSession::from_layout(21, rows).unwrap();
        s.take_events();
        s
    }

    fn first_score(events: &[TurnEvent]) -> Option<u32> {
        events.iter().find_map(|e| match e {
            TurnEvent::Score(score) => Some(*score),
            _ => None,
        })
    }

    #[test]
    fn test_rejects_invalid_requests() {
        let mut rows = QUIET;
        rows[0] = "B* G P W B G P W B";
        rows[8] = "B G P W Y3# G P W B";
        let mut s = session(&rows);

        let far = s.request_swap(Pos::new(0, 2), Pos::new(5, 5));
        assert_eq!(far, TurnOutcome::Rejected(InvalidMove::NotAdjacent));
        assert_eq!(
            s.request_swap(Pos::new(2, 2), Pos::new(2, 2)),
            TurnOutcome::Rejected(InvalidMove::SameCell)
        );
        assert_eq!(
            s.request_swap(Pos::new(0, 0), Pos::new(0, 1)),
            TurnOutcome::Rejected(InvalidMove::Frozen)
        );
        assert_eq!(
            s.request_swap(Pos::new(8, 4), Pos::new(7, 4)),
            TurnOutcome::Rejected(InvalidMove::FusionCore)
        );
        assert_eq!(
            s.request_swap(Pos::new(8, 8), Pos::new(8, 9)),
            TurnOutcome::Rejected(InvalidMove::OutOfBounds)
        );
        assert!(s.events.recorded().is_empty());
    }

    #[test]
    fn test_swap_without_match_is_reverted() {
        let mut s = session(&QUIET);
        let before = s.board().clone();
        let outcome = s.request_swap(Pos::new(4, 4), Pos::new(4, 5));
        let TurnOutcome::Reverted(events) = outcome else {
            panic!("expected revert, got {:?}", outcome);
        };
        assert_eq!(s.board(), &before);
        assert!(events.contains(&TurnEvent::Game(GameEvent::Invalid)));
        assert_eq!(s.score(), 0);
        assert!(!s.is_processing());
    }

    #[test]
    fn test_requests_ignored_while_busy_or_complete() {
        let mut s = session(&QUIET);
        s.processing = true;
        assert_eq!(s.request_swap(Pos::new(0, 0), Pos::new(0, 1)), TurnOutcome::Ignored);
        s.processing = false;
        s.complete = true;
        assert_eq!(s.request_swap(Pos::new(0, 0), Pos::new(0, 1)), TurnOutcome::Ignored);
    }

    #[test]
    fn test_five_in_a_row_forges_gold() {
        let mut rows = QUIET;
        rows[8] = "B R R R R R P W B";
        let mut s = session(&rows);
        let groups = find_match_groups(s.board());
        assert_eq!(groups.len(), 1);

        s.resolve_iteration(&groups, 1).unwrap();
        let gold = s.board().tile(Pos::new(8, 3)).unwrap();
        assert!(gold.is_gold());
        assert_eq!(gold.color, Color::Red);
        assert_eq!(s.targets().remaining(Color::Red), 10);
        assert_eq!(s.score(), 50);
        assert!(s.board().is_full());
    }

    #[test]
    fn test_combo_depth_multiplies_wave_score() {
        let mut rows = QUIET;
        rows[8] = "B R R R P G P W B";
        let mut s = session(&rows);
        let groups = find_match_groups(s.board());
        s.resolve_iteration(&groups, 3).unwrap();
        // Three reds and one scorched neighbor at depth 3.
        assert_eq!(s.score(), 120);
    }

    #[test]
    fn test_golden_swap_sweeps_twenty_six() {
        let mut rows = QUIET;
        rows[4] = "B G P W B$ G P W B";
        let mut s = session(&rows);
        let outcome = s.request_swap(Pos::new(4, 4), Pos::new(0, 0));
        let TurnOutcome::Resolved(report) = outcome else {
            panic!("expected a resolved turn, got {:?}", outcome);
        };
        assert!(report.golden);
        assert_eq!(first_score(&report.events), Some(260));
        assert!(s.board().is_full());
        assert!(!has_matches(s.board()));
    }

    #[test]
    fn test_whirlwind_ignores_frost_and_bright_purple() {
        let frozen = "W* W* W* W* W* W* W* W* W*";
        let mut rows = [frozen; 9];
        rows[0] = "B W* W* W* W* W* W* W* W*";
        rows[4] = "W* W* W* W* B$ W* W* W* W*";
        rows[8] = "P^ W* P^ W* P^ W* P^ W* P^";
        let mut s = session(&rows);

        let TurnOutcome::Resolved(report) = s.request_swap(Pos::new(4, 4), Pos::new(0, 0)) else {
            panic!("golden swap was not resolved");
        };
        assert_eq!(first_score(&report.events), Some(260));

        let sweep: Vec<&TurnEvent> = report
            .events
            .iter()
            .take_while(|e| !matches!(e, TurnEvent::Score(_)))
            .collect();
        assert!(!sweep.iter().any(|e| matches!(
            e,
            TurnEvent::Effect(v) if matches!(v.kind, EffectKind::Shatter | EffectKind::VoidPulse)
        )));
    }

    #[test]
    fn test_whirlwind_fires_swept_clears_once() {
        let mut rows = QUIET;
        rows[4] = "B G P W B$ G P W B";
        rows[2] = "B- G- P- W- B- G- P- W- B-";
        let mut s = session(&rows);
        let mut step = CascadeStep::new();
        step.removal.insert(Pos::new(2, 0));
        chain::expand_whirlwind(&mut s, &mut step).unwrap();
        assert_eq!(step.removal.len(), 9);

        let clears = s
            .events
            .recorded()
            .iter()
            .filter(|e| matches!(e, TurnEvent::Effect(v) if v.kind == EffectKind::LineClear))
            .count();
        assert_eq!(clears, 9);
    }

    #[test]
    fn test_resolved_turns_leave_a_settled_board() {
        for seed in [1u32, 7, 42, 2024, 99_999] {
            let mut s = GameSession::new(seed);
            for _ in 0..5 {
                if s.is_complete() {
                    break;
                }
                let Some((a, b)) = find_possible_move(s.board()) else {
                    break;
                };
                let outcome = s.request_swap(a, b);
                assert!(outcome.is_resolved(), "seed {seed}: {:?}", outcome);
                assert!(s.board().is_full());
                assert!(!has_matches(s.board()));
                assert!(has_possible_moves(s.board()));
                assert!(!s.is_processing());
            }
        }
    }

    #[test]
    fn test_resolved_report_counts_combos_and_score() {
        let mut s = GameSession::new(314);
        let (a, b) = find_possible_move(s.board()).unwrap();
        let TurnOutcome::Resolved(report) = s.request_swap(a, b) else {
            panic!("legal move was not resolved");
        };
        assert!(report.combos >= 1);
        assert_eq!(report.score_gained, s.score());
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e, TurnEvent::Game(GameEvent::MatchCombo(1)))));
        assert!(report.events.iter().any(|e| e.pause_ms() > 0));
    }

    #[test]
    fn test_level_completes_once() {
        let mut s = GameSession::new(8);
        s.targets = LevelTargets::new();
        s.level.target_score = 0;
        let (a, b) = find_possible_move(s.board()).unwrap();
        let TurnOutcome::Resolved(report) = s.request_swap(a, b) else {
            panic!("legal move was not resolved");
        };
        assert!(report.level_complete);
        let completions = report
            .events
            .iter()
            .filter(|e| matches!(e, TurnEvent::Game(GameEvent::LevelComplete(1))))
            .count();
        assert_eq!(completions, 1);
        assert_eq!(s.request_swap(a, b), TurnOutcome::Ignored);
    }
}
