//! Legal-move search and deadlock handling helpers.

use crate::board::Board;
use crate::matcher::has_matches;
use crate::types::{Direction, Pos};

fn movable(board: &Board, pos: Pos) -> bool {
    matches!(board.get(pos), Ok(Some(tile)) if tile.is_movable())
}

/// First adjacent swap (row-major, rightward before downward) that creates a run.
///
/// A gold tile with any movable partner always counts as a move, since swapping
/// it triggers a whirlwind regardless of adjacency.
pub fn find_possible_move(board: &Board) -> Option<(Pos, Pos)> {
    let gold = board
        .occupied()
        .find(|(_, tile)| tile.is_gold())
        .map(|(pos, _)| pos);
    if let Some(gold) = gold {
        let partner = board
            .occupied()
            .find(|(pos, tile)| *pos != gold && tile.is_movable())
            .map(|(pos, _)| pos);
        if let Some(partner) = partner {
            return Some((gold, partner));
        }
    }

    let mut scratch = board.clone();
    for pos in Board::positions() {
        for dir in [Direction::Right, Direction::Down] {
            let Some(other) = Board::step(pos, dir) else {
                continue;
            };
            if !movable(&scratch, pos) || !movable(&scratch, other) {
                continue;
            }
            // Positions are in bounds, so the swaps cannot fail.
            let _ = scratch.swap(pos, other);
            let hit = has_matches(&scratch);
            let _ = scratch.swap(pos, other);
            if hit {
                return Some((pos, other));
            }
        }
    }
    None
}

/// Whether at least one legal swap exists. Does not modify the board.
pub fn has_possible_moves(board: &Board) -> bool {
    find_possible_move(board).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawn::TileFactory;

    fn board(rows: &[&str]) -> Board {
        Board::parse_layout(rows, &mut TileFactory::default()).unwrap()
    }

    // Four colors in a pattern where no single swap lines up three.
    const STUCK: [&str; 9] = [
        "B G B G B G B G B",
        "P W P W P W P W P",
        "G B G B G B G B G",
        "W P W P W P W P W",
        "B G B G B G B G B",
        "P W P W P W P W P",
        "G B G B G B G B G",
        "W P W P W P W P W",
        "B G B G B G B G B",
    ];

    #[test]
    fn test_stuck_board_has_no_moves() {
        let b = board(&STUCK);
        assert!(!has_possible_moves(&b));
    }

    #[test]
    fn test_single_swap_is_found() {
        let mut rows = STUCK;
        rows[0] = "R R G R B G B G B";
        let b = board(&rows);
        assert_eq!(find_possible_move(&b), Some((Pos::new(0, 2), Pos::new(0, 3))));
    }

    #[test]
    fn test_frozen_tiles_cannot_be_used() {
        let mut rows = STUCK;
        rows[0] = "R R G R* B G B G B";
        rows[1] = "P W P* W P W P W P";
        assert!(!has_possible_moves(&board(&rows)));
    }

    #[test]
    fn test_gold_always_offers_a_move() {
        let mut rows = STUCK;
        rows[4] = "B G B G B$ G B G B";
        assert!(has_possible_moves(&board(&rows)));
    }

    #[test]
    fn test_check_is_idempotent() {
        let mut rows = STUCK;
        rows[0] = "R R G R B G B G B";
        let b = board(&rows);
        let before = b.clone();
        assert_eq!(has_possible_moves(&b), has_possible_moves(&b));
        assert_eq!(b, before);
    }
}
