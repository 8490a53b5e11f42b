//! The game session: one board, one RNG, one level in progress.
//!
//! `GameSession` owns all mutable game state. Turn resolution lives in
//! [`crate::turn`]; the color skills in [`crate::effects`] operate on the
//! session through crate-private fields.

use std::collections::HashSet;

use crate::board::Board;
use crate::effects::BallLightning;
use crate::error::{BoardError, EngineResult};
use crate::level::{LevelConfig, LevelStatus, LevelTargets};
use crate::moves::has_possible_moves;
use crate::observer::{EventSink, GameObserver, TurnEvent};
use crate::rng::SimpleRng;
use crate::snapshot::SessionSnapshot;
use crate::spawn::TileFactory;
use crate::types::{Pos, TileId};
use crate::{log_info, log_warn};

/// Fresh boards tried before settling for one without a legal move.
const BOARD_ATTEMPTS: usize = 100;

pub struct GameSession {
    pub(crate) board: Board,
    pub(crate) rng: SimpleRng,
    pub(crate) factory: TileFactory,
    pub(crate) level: LevelConfig,
    pub(crate) targets: LevelTargets,
    pub(crate) score: u32,
    pub(crate) last_combo: u32,
    /// Set while a turn is resolving; swap requests are ignored meanwhile.
    pub(crate) processing: bool,
    pub(crate) complete: bool,
    /// Primed and explosive tiles that already fired this turn.
    pub(crate) processed: HashSet<TileId>,
    pub(crate) pending_fusion_cores: Vec<Pos>,
    pub(crate) pending_ball_lightnings: Vec<BallLightning>,
    pub(crate) events: EventSink,
    seed: u32,
}

impl GameSession {
    /// Start level 1 with a generated board.
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let level = LevelConfig::for_level(1, &mut rng);
        let mut factory = TileFactory::new(level.weights);
        let board = generate_playable(&mut factory, &mut rng);
        Self::assemble(seed, rng, factory, board, level)
    }

    /// Start a specific level. Fails only if the level carries a malformed layout.
    pub fn with_level(seed: u32, level: LevelConfig) -> EngineResult<Self> {
        let mut session = Self::new(seed);
        session.start_level(level)?;
        Ok(session)
    }

    /// Start level `number` with its default objectives.
    pub fn at_level(seed: u32, number: u32) -> Self {
        let mut session = Self::new(seed);
        if number > 1 {
            let level = LevelConfig::for_level(number, &mut session.rng);
            // Generated levels carry no layout, so this cannot fail.
            let _ = session.start_level(level);
        }
        session
    }

    /// Convenience for hand-authored boards (level 1 objectives).
    pub fn from_layout<S: AsRef<str>>(seed: u32, rows: &[S]) -> EngineResult<Self> {
        let mut session = Self::new(seed);
        let level = session.level.clone().with_layout(rows);
        session.start_level(level)?;
        Ok(session)
    }

    fn assemble(
        seed: u32,
        rng: SimpleRng,
        factory: TileFactory,
        board: Board,
        level: LevelConfig,
    ) -> Self {
        Self {
            board,
            rng,
            factory,
            targets: level.targets.clone(),
            level,
            score: 0,
            last_combo: 0,
            processing: false,
            complete: false,
            processed: HashSet::new(),
            pending_fusion_cores: Vec::new(),
            pending_ball_lightnings: Vec::new(),
            events: EventSink::default(),
            seed,
        }
    }

    /// Reset objectives and score and lay out a new board for `level`.
    pub fn start_level(&mut self, level: LevelConfig) -> EngineResult<()> {
        self.factory.set_weights(level.weights);
        self.board = match &level.layout {
            Some(rows) => Board::parse_layout(rows, &mut self.factory)?,
            None => generate_playable(&mut self.factory, &mut self.rng),
        };
        self.targets = level.targets.clone();
        self.level = level;
        self.score = 0;
        self.last_combo = 0;
        self.complete = false;
        self.processed.clear();
        self.pending_fusion_cores.clear();
        self.pending_ball_lightnings.clear();

        log_info!("Session", "level {} started", self.level.number);
        self.events.board_changed(&self.board);
        self.events.targets(&self.targets);
        self.events.score(self.score);
        Ok(())
    }

    pub fn next_level(&mut self) -> EngineResult<()> {
        let level = LevelConfig::for_level(self.level.number + 1, &mut self.rng);
        self.start_level(level)
    }

    pub fn restart_level(&mut self) -> EngineResult<()> {
        self.start_level(self.level.clone())
    }

    pub fn set_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.events.set_observer(observer);
    }

    /// Events recorded outside of a turn (level starts), drained.
    pub fn take_events(&mut self) -> Vec<TurnEvent> {
        self.events.take_log()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn targets(&self) -> &LevelTargets {
        &self.targets
    }

    /// Combo depth reached by the most recent cascade.
    pub fn last_combo(&self) -> u32 {
        self.last_combo
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn level_status(&self) -> LevelStatus {
        LevelStatus::evaluate(&self.targets, self.score, self.level.target_score)
    }

    pub fn pending_fusion_cores(&self) -> &[Pos] {
        &self.pending_fusion_cores
    }

    pub fn pending_ball_lightnings(&self) -> &[BallLightning] {
        &self.pending_ball_lightnings
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: self.board.clone(),
            score: self.score,
            target_score: self.level.target_score,
            level: self.level.number,
            targets: self.targets.clone(),
            last_combo: self.last_combo,
            complete: self.complete,
        }
    }

    pub(crate) fn add_score(&mut self, points: u32) {
        if points == 0 {
            return;
        }
        self.score = self.score.saturating_add(points);
        self.events.score(self.score);
    }

    /// Take the tiles at `cells` off the board, counting level targets.
    /// Gold tiles never count. Returns the number of tiles removed.
    pub(crate) fn remove_tiles(&mut self, cells: &[Pos]) -> Result<usize, BoardError> {
        let mut removed = 0;
        let mut targets_moved = false;
        for &pos in cells {
            if let Some(tile) = self.board.take(pos)? {
                removed += 1;
                if !tile.is_gold() {
                    targets_moved |= self.targets.decrement(tile.color);
                }
            }
        }
        if targets_moved {
            self.events.targets(&self.targets);
        }
        Ok(removed)
    }
}

/// Generate boards until one offers a legal move.
fn generate_playable(factory: &mut TileFactory, rng: &mut SimpleRng) -> Board {
    let mut board = Board::generate(factory, rng);
    for _ in 1..BOARD_ATTEMPTS {
        if has_possible_moves(&board) {
            return board;
        }
        board = Board::generate(factory, rng);
    }
    log_warn!("Session", "no playable board after {} attempts", BOARD_ATTEMPTS);
    board
}
