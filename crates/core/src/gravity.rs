//! Gravity and refill.
//!
//! Each column is compacted toward the bottom, keeping the relative order of
//! its tiles, then the gap at the top is refilled with new tiles that "fall in"
//! from negative rows above the board.

use serde::Serialize;

use crate::board::Board;
use crate::error::BoardError;
use crate::rng::SimpleRng;
use crate::spawn::TileFactory;
use crate::types::{Pos, TileId, GRID_SIZE};

/// One tile's fall. New tiles have a negative `from_row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GravityMove {
    pub tile: TileId,
    pub col: usize,
    pub from_row: isize,
    pub to_row: usize,
}

impl GravityMove {
    pub fn is_spawn(&self) -> bool {
        self.from_row < 0
    }

    pub fn distance(&self) -> usize {
        (self.to_row as isize - self.from_row) as usize
    }
}

/// Compact every column and refill the gaps. Returns the moves for animation.
pub fn apply_gravity(
    board: &mut Board,
    factory: &mut TileFactory,
    rng: &mut SimpleRng,
) -> Result<Vec<GravityMove>, BoardError> {
    let mut moves = Vec::new();

    for col in 0..GRID_SIZE {
        // Bottom-up write cursor; everything above it ends up empty.
        let mut write = GRID_SIZE;
        for row in (0..GRID_SIZE).rev() {
            let Some(tile) = board.take(Pos::new(row, col))? else {
                continue;
            };
            write -= 1;
            board.set(Pos::new(write, col), Some(tile))?;
            if write != row {
                moves.push(GravityMove {
                    tile: tile.id,
                    col,
                    from_row: row as isize,
                    to_row: write,
                });
            }
        }

        let empty = write;
        for row in (0..empty).rev() {
            let below = match row + 1 {
                r if r < GRID_SIZE => board.get(Pos::new(r, col))?.map(|t| t.color),
                _ => None,
            };
            let mut color = factory.random_color(rng);
            if Some(color) == below && rng.chance(50) {
                color = factory.random_color(rng);
            }
            let tile = factory.spawn_charged(color, rng);
            board.set(Pos::new(row, col), Some(tile))?;
            moves.push(GravityMove {
                tile: tile.id,
                col,
                from_row: row as isize - empty as isize,
                to_row: row,
            });
        }
    }

    Ok(moves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;

    fn column_board() -> Board {
        let mut rows = vec!["B G P W B G P W B".to_string(); GRID_SIZE];
        rows[0] = "R G P W B G P W B".to_string();
        rows[1] = ". G P W B G P W B".to_string();
        rows[2] = "O G P W B G P W B".to_string();
        rows[3] = ". G P W B G P W B".to_string();
        rows[4] = ". G P W B G P W B".to_string();
        Board::parse_layout(&rows, &mut TileFactory::default()).unwrap()
    }

    #[test]
    fn test_gravity_compacts_in_order() {
        let mut board = column_board();
        let red = board.tile(Pos::new(0, 0)).unwrap().id;
        let orange = board.tile(Pos::new(2, 0)).unwrap().id;

        let mut factory = TileFactory::default();
        let mut rng = SimpleRng::new(3);
        let moves = apply_gravity(&mut board, &mut factory, &mut rng).unwrap();

        assert!(board.is_full());
        assert_eq!(board.tile(Pos::new(4, 0)).unwrap().id, orange);
        assert_eq!(board.tile(Pos::new(3, 0)).unwrap().id, red);

        let red_move = moves.iter().find(|m| m.tile == red).unwrap();
        assert_eq!((red_move.from_row, red_move.to_row), (0, 3));
        assert_eq!(red_move.distance(), 3);
    }

    #[test]
    fn test_refill_spawns_from_negative_rows() {
        let mut board = column_board();
        let mut factory = TileFactory::default();
        let mut rng = SimpleRng::new(3);
        let moves = apply_gravity(&mut board, &mut factory, &mut rng).unwrap();

        let mut spawns: Vec<_> = moves.iter().filter(|m| m.is_spawn()).collect();
        spawns.sort_by_key(|m| m.to_row);
        assert_eq!(spawns.len(), 3);
        assert_eq!(
            spawns.iter().map(|m| (m.from_row, m.to_row)).collect::<Vec<_>>(),
            vec![(-3, 0), (-2, 1), (-1, 2)]
        );
        assert!(spawns.iter().all(|m| m.col == 0));
    }

    #[test]
    fn test_full_board_is_untouched() {
        let rows = vec!["B G P W B G P W B".to_string(); GRID_SIZE];
        let mut board = Board::parse_layout(&rows, &mut TileFactory::default()).unwrap();
        let before = board.clone();
        let moves = apply_gravity(&mut board, &mut TileFactory::default(), &mut SimpleRng::new(1)).unwrap();
        assert!(moves.is_empty());
        assert_eq!(board, before);
    }

    #[test]
    fn test_refilled_yellow_has_voltage() {
        let mut rows = vec!["B G P W B G P W B".to_string(); GRID_SIZE];
        rows[0] = ". . . . . . . . .".to_string();
        let mut board = Board::parse_layout(&rows, &mut TileFactory::default()).unwrap();
        let mut factory = TileFactory::new(crate::spawn::ColorWeights::only(&[Color::Yellow]).unwrap());
        apply_gravity(&mut board, &mut factory, &mut SimpleRng::new(8)).unwrap();
        for pos in Board::row_cells(0) {
            let tile = board.tile(pos).unwrap();
            assert_eq!(tile.color, Color::Yellow);
            assert!(tile.voltage.is_some());
        }
    }
}
