//! Level objectives: color targets, score threshold and spawn weights.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::rng::SimpleRng;
use crate::spawn::ColorWeights;
use crate::types::{Color, LEVEL_SCORE_STEP, LEVEL_TARGET_BASE, LEVEL_TARGET_STEP};

/// Remaining removals per target color.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct LevelTargets(BTreeMap<Color, u32>);

impl LevelTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, color: Color, count: u32) -> Self {
        self.0.insert(color, count);
        self
    }

    pub fn remaining(&self, color: Color) -> u32 {
        self.0.get(&color).copied().unwrap_or(0)
    }

    /// Count one removal of `color`. Returns whether a target moved.
    pub fn decrement(&mut self, color: Color) -> bool {
        match self.0.get_mut(&color) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn all_met(&self) -> bool {
        self.0.values().all(|&count| count == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Color, u32)> + '_ {
        self.0.iter().map(|(&color, &count)| (color, count))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything needed to start a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelConfig {
    pub number: u32,
    pub target_score: u32,
    pub targets: LevelTargets,
    pub weights: ColorWeights,
    /// Hand-authored starting board (see [`crate::Board::parse_layout`]).
    pub layout: Option<Vec<String>>,
}

impl LevelConfig {
    /// Default objectives for a level number.
    ///
    /// Level 1 asks for red, level 2 for blue and green, later levels for
    /// `min(3, 1 + level / 2)` random colors. Every target is `10 + 5 * level`
    /// and the score threshold is `1000 * level`.
    pub fn for_level(number: u32, rng: &mut SimpleRng) -> Self {
        let number = number.max(1);
        let count = LEVEL_TARGET_BASE + LEVEL_TARGET_STEP * number;
        let colors: Vec<Color> = match number {
            1 => vec![Color::Red],
            2 => vec![Color::Blue, Color::Green],
            _ => {
                let mut pool = Color::ALL;
                rng.shuffle(&mut pool);
                let n = (1 + number / 2).min(3) as usize;
                pool[..n].to_vec()
            }
        };

        let targets = colors
            .into_iter()
            .fold(LevelTargets::new(), |t, color| t.with(color, count));

        Self {
            number,
            target_score: number * LEVEL_SCORE_STEP,
            targets,
            weights: ColorWeights::default(),
            layout: None,
        }
    }

    pub fn with_targets(mut self, targets: LevelTargets) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_target_score(mut self, target_score: u32) -> Self {
        self.target_score = target_score;
        self
    }

    pub fn with_weights(mut self, weights: ColorWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_layout<S: AsRef<str>>(mut self, rows: &[S]) -> Self {
        self.layout = Some(rows.iter().map(|r| r.as_ref().to_string()).collect());
        self
    }
}

/// Progress toward finishing the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelStatus {
    pub targets_met: bool,
    pub score_reached: bool,
    pub complete: bool,
}

impl LevelStatus {
    pub fn evaluate(targets: &LevelTargets, score: u32, target_score: u32) -> Self {
        let targets_met = targets.all_met();
        let score_reached = score >= target_score;
        Self {
            targets_met,
            score_reached,
            complete: targets_met && score_reached,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_one_and_two_targets() {
        let mut rng = SimpleRng::new(1);
        let l1 = LevelConfig::for_level(1, &mut rng);
        assert_eq!(l1.target_score, 1000);
        assert_eq!(l1.targets.remaining(Color::Red), 15);
        assert_eq!(l1.targets.len(), 1);

        let l2 = LevelConfig::for_level(2, &mut rng);
        assert_eq!(l2.target_score, 2000);
        assert_eq!(l2.targets.remaining(Color::Blue), 20);
        assert_eq!(l2.targets.remaining(Color::Green), 20);
        assert_eq!(l2.targets.len(), 2);
    }

    #[test]
    fn test_later_levels_pick_distinct_colors() {
        let mut rng = SimpleRng::new(77);
        assert_eq!(LevelConfig::for_level(3, &mut rng).targets.len(), 2);
        assert_eq!(LevelConfig::for_level(4, &mut rng).targets.len(), 3);
        let l9 = LevelConfig::for_level(9, &mut rng);
        assert_eq!(l9.targets.len(), 3);
        assert!(l9.targets.iter().all(|(_, n)| n == 55));
    }

    #[test]
    fn test_decrement_floors_at_zero() {
        let mut targets = LevelTargets::new().with(Color::Red, 1);
        assert!(targets.decrement(Color::Red));
        assert!(!targets.decrement(Color::Red));
        assert_eq!(targets.remaining(Color::Red), 0);
        assert!(!targets.decrement(Color::Blue));
        assert!(targets.all_met());
    }

    #[test]
    fn test_status_needs_both_conditions() {
        let open = LevelTargets::new().with(Color::Red, 2);
        let done = LevelTargets::new().with(Color::Red, 0);

        assert!(!LevelStatus::evaluate(&open, 5000, 1000).complete);
        assert!(!LevelStatus::evaluate(&done, 999, 1000).complete);
        let status = LevelStatus::evaluate(&done, 1000, 1000);
        assert!(status.targets_met && status.score_reached && status.complete);
    }
}
