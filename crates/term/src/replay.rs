//! Time-stepped playback of a turn's event log onto a [`Scene`].
//!
//! The engine resolves a whole turn synchronously and hands back the log.
//! `Replay` walks it at wall-clock pace: events are applied in order until a
//! `Pause` is reached, which holds playback for its duration. With animation
//! disabled pauses are skipped and one `advance` call plays everything.

use std::collections::VecDeque;

use crate::board_view::{Scene, LEVEL_COMPLETE};
use crate::core::TurnEvent;
use crate::types::GameEvent;

#[derive(Debug, Clone)]
pub struct Replay {
    events: VecDeque<TurnEvent>,
    animate: bool,
    wait_ms: u32,
}

impl Replay {
    pub fn new(events: Vec<TurnEvent>, animate: bool) -> Self {
        Self {
            events: events.into(),
            animate,
            wait_ms: 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.events.is_empty() && self.wait_ms == 0
    }

    /// Total pause time still ahead, including the one in progress.
    pub fn remaining_ms(&self) -> u32 {
        if !self.animate {
            return 0;
        }
        self.wait_ms + self.events.iter().map(TurnEvent::pause_ms).sum::<u32>()
    }

    /// Play `elapsed_ms` worth of the log. Returns true if the scene changed.
    pub fn advance(&mut self, elapsed_ms: u32, scene: &mut Scene) -> bool {
        let mut budget = elapsed_ms;
        let mut changed = false;
        loop {
            if self.wait_ms > 0 {
                let spent = budget.min(self.wait_ms);
                self.wait_ms -= spent;
                budget -= spent;
                if self.wait_ms > 0 {
                    return changed;
                }
            }
            let Some(event) = self.events.pop_front() else {
                return changed;
            };
            match event {
                TurnEvent::Pause(ms) if self.animate => self.wait_ms = ms,
                TurnEvent::Pause(_) => {}
                other => changed |= apply(&other, scene),
            }
        }
    }

    /// Apply everything left at once.
    pub fn skip(&mut self, scene: &mut Scene) -> bool {
        self.wait_ms = 0;
        let mut changed = false;
        for event in self.events.drain(..) {
            changed |= apply(&event, scene);
        }
        changed
    }
}

/// Fold one event into the scene.
pub fn apply(event: &TurnEvent, scene: &mut Scene) -> bool {
    match event {
        TurnEvent::BoardChanged(board) => {
            scene.snapshot.board = board.clone();
            scene.highlight.clear();
        }
        TurnEvent::Effect(effect) => {
            scene.effect = Some(effect.kind);
            scene.highlight.clear();
            scene.highlight.push(effect.origin);
            scene.highlight.extend(effect.cells.iter().copied());
            scene.highlight.extend(effect.target);
        }
        TurnEvent::Score(score) => scene.snapshot.score = *score,
        TurnEvent::Targets(targets) => scene.snapshot.targets = targets.clone(),
        TurnEvent::Game(GameEvent::MatchCombo(n)) => {
            scene.combo = *n;
            scene.snapshot.last_combo = *n;
        }
        TurnEvent::Game(GameEvent::LevelComplete(_)) => {
            scene.snapshot.complete = true;
            scene.banner = Some(LEVEL_COMPLETE);
        }
        TurnEvent::Game(GameEvent::Shuffle) => scene.banner = Some("NO MOVES - SHUFFLE"),
        TurnEvent::Game(GameEvent::Invalid) => scene.banner = Some("NO MATCH"),
        TurnEvent::Game(_) | TurnEvent::Fell(_) | TurnEvent::Pause(_) => return false,
    }
    true
}
