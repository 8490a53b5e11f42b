//! Observer hooks and the per-turn event log.
//!
//! The engine never sleeps or draws. Everything a front end could react to is
//! pushed through [`EventSink`], which forwards it to the installed
//! [`GameObserver`] right away and also records it as a [`TurnEvent`] so the
//! whole turn can be replayed with timing afterwards.

use std::fmt;

use serde::Serialize;

use crate::board::Board;
use crate::gravity::GravityMove;
use crate::level::LevelTargets;
use crate::types::{GameEvent, VisualEffect};

/// Presentation hooks. All methods default to no-ops.
pub trait GameObserver {
    fn on_board_changed(&mut self, _board: &Board) {}
    fn on_visual_effect(&mut self, _effect: &VisualEffect) {}
    fn on_game_event(&mut self, _event: &GameEvent) {}
    fn on_targets_updated(&mut self, _targets: &LevelTargets) {}
    fn on_score_changed(&mut self, _score: u32) {}
    fn on_tiles_fell(&mut self, _moves: &[GravityMove]) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl GameObserver for NullObserver {}

/// One recorded step of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum TurnEvent {
    BoardChanged(Board),
    Effect(VisualEffect),
    Game(GameEvent),
    Score(u32),
    Targets(LevelTargets),
    Fell(Vec<GravityMove>),
    /// Pacing hint in milliseconds
    Pause(u32),
}

impl TurnEvent {
    pub fn pause_ms(&self) -> u32 {
        match self {
            TurnEvent::Pause(ms) => *ms,
            _ => 0,
        }
    }
}

/// Fan-out point for notifications: observer first, then the log.
pub struct EventSink {
    observer: Box<dyn GameObserver>,
    log: Vec<TurnEvent>,
}

impl EventSink {
    pub fn new(observer: Box<dyn GameObserver>) -> Self {
        Self {
            observer,
            log: Vec::new(),
        }
    }

    pub fn set_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.observer = observer;
    }

    pub fn board_changed(&mut self, board: &Board) {
        self.observer.on_board_changed(board);
        self.log.push(TurnEvent::BoardChanged(board.clone()));
    }

    pub fn effect(&mut self, effect: VisualEffect) {
        self.observer.on_visual_effect(&effect);
        self.log.push(TurnEvent::Effect(effect));
    }

    pub fn game(&mut self, event: GameEvent) {
        self.observer.on_game_event(&event);
        self.log.push(TurnEvent::Game(event));
    }

    pub fn score(&mut self, score: u32) {
        self.observer.on_score_changed(score);
        self.log.push(TurnEvent::Score(score));
    }

    pub fn targets(&mut self, targets: &LevelTargets) {
        self.observer.on_targets_updated(targets);
        self.log.push(TurnEvent::Targets(targets.clone()));
    }

    pub fn fell(&mut self, moves: Vec<GravityMove>) {
        if moves.is_empty() {
            return;
        }
        self.observer.on_tiles_fell(&moves);
        self.log.push(TurnEvent::Fell(moves));
    }

    pub fn pause(&mut self, ms: u32) {
        self.log.push(TurnEvent::Pause(ms));
    }

    pub fn recorded(&self) -> &[TurnEvent] {
        &self.log
    }

    /// Hand over the recorded events, leaving the log empty.
    pub fn take_log(&mut self) -> Vec<TurnEvent> {
        std::mem::take(&mut self.log)
    }
}

impl Default for EventSink {
    fn default() -> Self {
        Self::new(Box::new(NullObserver))
    }
}

impl fmt::Debug for EventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSink")
            .field("recorded", &self.log.len())
            .finish()
    }
}
