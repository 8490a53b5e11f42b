//! Run detection.
//!
//! Rows are scanned top to bottom (left to right within a row), then columns
//! left to right (top to bottom within a column). Empty, frozen, gold and
//! fusion-core cells break a run.

use serde::Serialize;

use crate::board::Board;
use crate::types::{Color, Orientation, Pos, GRID_SIZE};

/// A maximal straight run of 3+ same-colored matchable tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchGroup {
    pub orientation: Orientation,
    pub tiles: Vec<Pos>,
}

impl MatchGroup {
    pub fn new(orientation: Orientation, tiles: Vec<Pos>) -> Self {
        Self { orientation, tiles }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Where the group's skill is anchored: the middle tile (the later of the two for even runs).
    pub fn creation_pos(&self) -> Pos {
        self.tiles[self.tiles.len() / 2]
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.tiles.contains(&pos)
    }
}

/// Tier of a group by length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Three,
    Four,
    /// Five or longer
    Five,
}

impl MatchTier {
    pub fn of(len: usize) -> Self {
        match len {
            0..=3 => MatchTier::Three,
            4 => MatchTier::Four,
            _ => MatchTier::Five,
        }
    }
}

fn run_color(board: &Board, pos: Pos) -> Option<Color> {
    board
        .get(pos)
        .ok()
        .flatten()
        .filter(|tile| tile.is_matchable())
        .map(|tile| tile.color)
}

/// Scan one line of cells, appending its runs to `out`.
fn scan_line(board: &Board, line: &[Pos], orientation: Orientation, out: &mut Vec<MatchGroup>) {
    let mut i = 0;
    while i < line.len() {
        let Some(color) = run_color(board, line[i]) else {
            i += 1;
            continue;
        };
        let mut end = i + 1;
        while end < line.len() && run_color(board, line[end]) == Some(color) {
            end += 1;
        }
        if end - i >= 3 {
            out.push(MatchGroup::new(orientation, line[i..end].to_vec()));
        }
        i = end;
    }
}

/// All match groups on the board, horizontal groups first.
pub fn find_match_groups(board: &Board) -> Vec<MatchGroup> {
    let mut groups = Vec::new();
    let mut line = [Pos::new(0, 0); GRID_SIZE];

    for row in 0..GRID_SIZE {
        for (slot, pos) in line.iter_mut().zip(Board::row_cells(row)) {
            *slot = pos;
        }
        scan_line(board, &line, Orientation::Horizontal, &mut groups);
    }
    for col in 0..GRID_SIZE {
        for (slot, pos) in line.iter_mut().zip(Board::col_cells(col)) {
            *slot = pos;
        }
        scan_line(board, &line, Orientation::Vertical, &mut groups);
    }
    groups
}

/// Whether any run of three exists. Same rules as [`find_match_groups`].
pub fn has_matches(board: &Board) -> bool {
    let triple = |a: Pos, b: Pos, c: Pos| {
        let color = run_color(board, a);
        color.is_some() && color == run_color(board, b) && color == run_color(board, c)
    };
    for r in 0..GRID_SIZE {
        for c in 0..GRID_SIZE - 2 {
            if triple(Pos::new(r, c), Pos::new(r, c + 1), Pos::new(r, c + 2)) {
                return true;
            }
            if triple(Pos::new(c, r), Pos::new(c + 1, r), Pos::new(c + 2, r)) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawn::TileFactory;

    fn board(rows: &[&str]) -> Board {
        Board::parse_layout(rows, &mut TileFactory::default()).unwrap()
    }

    const QUIET: [&str; 9] = [
        "B G P W B G P W B",
        "P W B G P W B G P",
        "B G P W B G P W B",
        "P W B G P W B G P",
        "B G P W B G P W B",
        "P W B G P W B G P",
        "B G P W B G P W B",
        "P W B G P W B G P",
        "B G P W B G P W B",
    ];

    #[test]
    fn test_quiet_board_has_no_groups() {
        let b = board(&QUIET);
        assert!(find_match_groups(&b).is_empty());
        assert!(!has_matches(&b));
    }

    #[test]
    fn test_horizontal_run_of_four() {
        let mut rows = QUIET;
        rows[4] = "B R R R R G P W B";
        let b = board(&rows);
        let groups = find_match_groups(&b);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].orientation, Orientation::Horizontal);
        assert_eq!(groups[0].tiles, (1..5).map(|c| Pos::new(4, c)).collect::<Vec<_>>());
        assert_eq!(groups[0].creation_pos(), Pos::new(4, 3));
        assert!(has_matches(&b));
    }

    #[test]
    fn test_vertical_group_after_horizontal() {
        let mut rows = QUIET;
        rows[0] = "O O O W B G P W R";
        rows[1] = "P W B G P W B G R";
        rows[2] = "B G P W B G P W R";
        let groups = find_match_groups(&board(&rows));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].orientation, Orientation::Horizontal);
        assert_eq!(groups[1].orientation, Orientation::Vertical);
        assert_eq!(groups[1].tiles[0], Pos::new(0, 8));
    }

    #[test]
    fn test_cross_shares_a_cell() {
        let mut rows = QUIET;
        rows[3] = "P W B R P W B G P";
        rows[4] = "B G R R R G P W B";
        rows[5] = "P W B R P W B G P";
        let groups = find_match_groups(&board(&rows));
        assert_eq!(groups.len(), 2);
        assert!(groups[0].contains(Pos::new(4, 3)));
        assert!(groups[1].contains(Pos::new(4, 3)));
    }

    #[test]
    fn test_breakers_split_runs() {
        let mut rows = QUIET;
        rows[2] = "R R R* R R G P W B";
        rows[6] = "Y1 Y1 Y3# Y2 Y2 G P W B";
        rows[7] = "O O O$ O . O O W B";
        let b = board(&rows);
        assert!(find_match_groups(&b).is_empty());
        assert!(!has_matches(&b));
    }

    #[test]
    fn test_gold_spanning_run_does_not_match() {
        let mut rows = QUIET;
        rows[0] = "R R$ R W B G P W B";
        assert!(!has_matches(&board(&rows)));
    }

    #[test]
    fn test_long_run_is_one_group() {
        let mut rows = QUIET;
        rows[8] = "W W W W W W W W W";
        let groups = find_match_groups(&board(&rows));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 9);
        assert_eq!(MatchTier::of(groups[0].len()), MatchTier::Five);
        assert_eq!(groups[0].creation_pos(), Pos::new(8, 4));
    }

    #[test]
    fn test_match_tier() {
        assert_eq!(MatchTier::of(3), MatchTier::Three);
        assert_eq!(MatchTier::of(4), MatchTier::Four);
        assert_eq!(MatchTier::of(5), MatchTier::Five);
        assert_eq!(MatchTier::of(7), MatchTier::Five);
    }
}
