use serde::Serialize;

use crate::board::Board;
use crate::level::LevelTargets;

/// Read-only view of a session for renderers and traces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub board: Board,
    pub score: u32,
    pub target_score: u32,
    pub level: u32,
    pub targets: LevelTargets,
    pub last_combo: u32,
    pub complete: bool,
}

impl SessionSnapshot {
    /// Score progress in 0.0..=1.0.
    pub fn score_progress(&self) -> f32 {
        if self.target_score == 0 {
            return 1.0;
        }
        (self.score as f32 / self.target_score as f32).min(1.0)
    }

    pub fn playable(&self) -> bool {
        !self.complete
    }
}
