//! Board module - manages the 9x9 tile grid
//!
//! The board is a flat, row-major array of optional tiles. Between turns every
//! cell is occupied; empty cells only exist between a removal and the next refill.
//! Coordinates are [`Pos`] values (row 0 is the top). Every accessor checks
//! bounds and reports [`BoardError::OutOfBounds`] instead of clamping.

use std::fmt;

use arrayvec::ArrayVec;
use serde::ser::{Serialize, Serializer};

use crate::error::{BoardError, LayoutError};
use crate::rng::SimpleRng;
use crate::spawn::TileFactory;
use crate::types::{Color, Direction, Pos, Tile, TileKind, TileState, CELL_COUNT, GRID_SIZE};

/// Re-draw budget per cell when avoiding ready-made runs on a fresh board.
const GENERATE_REROLLS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Row-major cells (row * GRID_SIZE + col)
    cells: [Option<Tile>; CELL_COUNT],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self {
            cells: [None; CELL_COUNT],
        }
    }

    #[inline(always)]
    fn index(pos: Pos) -> Result<usize, BoardError> {
        if pos.row >= GRID_SIZE || pos.col >= GRID_SIZE {
            return Err(BoardError::OutOfBounds {
                row: pos.row,
                col: pos.col,
                size: GRID_SIZE,
            });
        }
        Ok(pos.row * GRID_SIZE + pos.col)
    }

    pub fn size(&self) -> usize {
        GRID_SIZE
    }

    /// Signed bounds check, for neighbor arithmetic that may step off the edge.
    pub fn in_bounds(row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < GRID_SIZE && (col as usize) < GRID_SIZE
    }

    pub fn pos_at(row: isize, col: isize) -> Option<Pos> {
        Self::in_bounds(row, col).then(|| Pos::new(row as usize, col as usize))
    }

    pub fn offset(pos: Pos, d_row: isize, d_col: isize) -> Option<Pos> {
        Self::pos_at(pos.row as isize + d_row, pos.col as isize + d_col)
    }

    pub fn step(pos: Pos, dir: Direction) -> Option<Pos> {
        let (dr, dc) = dir.delta();
        Self::offset(pos, dr, dc)
    }

    pub fn get(&self, pos: Pos) -> Result<Option<&Tile>, BoardError> {
        Ok(self.cells[Self::index(pos)?].as_ref())
    }

    pub fn get_mut(&mut self, pos: Pos) -> Result<Option<&mut Tile>, BoardError> {
        Ok(self.cells[Self::index(pos)?].as_mut())
    }

    /// The tile at `pos`, failing if the cell is empty.
    pub fn tile(&self, pos: Pos) -> Result<&Tile, BoardError> {
        self.get(pos)?.ok_or(BoardError::MissingTile {
            row: pos.row,
            col: pos.col,
        })
    }

    pub fn tile_mut(&mut self, pos: Pos) -> Result<&mut Tile, BoardError> {
        self.get_mut(pos)?.ok_or(BoardError::MissingTile {
            row: pos.row,
            col: pos.col,
        })
    }

    /// Store `tile` at `pos`, returning what was there.
    pub fn set(&mut self, pos: Pos, tile: Option<Tile>) -> Result<Option<Tile>, BoardError> {
        let idx = Self::index(pos)?;
        Ok(std::mem::replace(&mut self.cells[idx], tile))
    }

    pub fn take(&mut self, pos: Pos) -> Result<Option<Tile>, BoardError> {
        self.set(pos, None)
    }

    pub fn swap(&mut self, a: Pos, b: Pos) -> Result<(), BoardError> {
        let ia = Self::index(a)?;
        let ib = Self::index(b)?;
        self.cells.swap(ia, ib);
        Ok(())
    }

    pub fn is_occupied(&self, pos: Pos) -> bool {
        matches!(self.get(pos), Ok(Some(_)))
    }

    /// Orthogonal neighbors inside the board (up, down, left, right).
    pub fn neighbors4(pos: Pos) -> ArrayVec<Pos, 4> {
        Direction::ALL
            .iter()
            .filter_map(|&dir| Self::step(pos, dir))
            .collect()
    }

    /// All eight surrounding cells inside the board.
    pub fn neighbors8(pos: Pos) -> ArrayVec<Pos, 8> {
        let mut out = ArrayVec::new();
        for dr in -1..=1 {
            for dc in -1..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                if let Some(p) = Self::offset(pos, dr, dc) {
                    out.push(p);
                }
            }
        }
        out
    }

    /// The (2r+1)x(2r+1) square around `center`, clipped to the board, row-major.
    /// Includes `center` itself.
    pub fn area(center: Pos, radius: usize) -> Vec<Pos> {
        let r = radius as isize;
        let mut out = Vec::with_capacity((2 * radius + 1).pow(2));
        for dr in -r..=r {
            for dc in -r..=r {
                if let Some(p) = Self::offset(center, dr, dc) {
                    out.push(p);
                }
            }
        }
        out
    }

    pub fn row_cells(row: usize) -> impl Iterator<Item = Pos> {
        (0..GRID_SIZE).map(move |col| Pos::new(row, col))
    }

    pub fn col_cells(col: usize) -> impl Iterator<Item = Pos> {
        (0..GRID_SIZE).map(move |row| Pos::new(row, col))
    }

    /// All 81 positions, row-major.
    pub fn positions() -> impl Iterator<Item = Pos> {
        (0..CELL_COUNT).map(|i| Pos::new(i / GRID_SIZE, i % GRID_SIZE))
    }

    /// Occupied cells with their tiles, row-major.
    pub fn occupied(&self) -> impl Iterator<Item = (Pos, &Tile)> {
        self.cells.iter().enumerate().filter_map(|(i, cell)| {
            cell.as_ref()
                .map(|tile| (Pos::new(i / GRID_SIZE, i % GRID_SIZE), tile))
        })
    }

    pub fn count_occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    pub fn find_tile(&self, id: crate::types::TileId) -> Option<Pos> {
        self.occupied()
            .find(|(_, tile)| tile.id == id)
            .map(|(pos, _)| pos)
    }

    /// Remove every tile, returning them in row-major order.
    pub fn drain_tiles(&mut self) -> Vec<Tile> {
        self.cells.iter_mut().filter_map(|c| c.take()).collect()
    }

    /// Fill the board row-major from `tiles`; missing tiles leave cells empty.
    pub fn fill_from(&mut self, tiles: impl IntoIterator<Item = Tile>) {
        let mut tiles = tiles.into_iter();
        for cell in self.cells.iter_mut() {
            *cell = tiles.next();
        }
    }

    fn color_at(&self, row: isize, col: isize) -> Option<Color> {
        let pos = Self::pos_at(row, col)?;
        self.get(pos).ok().flatten().map(|t| t.color)
    }

    /// Whether placing `color` at (row, col) would complete a run with the
    /// two cells to its left or the two above.
    fn completes_run(&self, row: usize, col: usize, color: Color) -> bool {
        let (r, c) = (row as isize, col as isize);
        let left = self.color_at(r, c - 1) == Some(color) && self.color_at(r, c - 2) == Some(color);
        let up = self.color_at(r - 1, c) == Some(color) && self.color_at(r - 2, c) == Some(color);
        left || up
    }

    /// A full board with no ready-made runs.
    pub fn generate(factory: &mut TileFactory, rng: &mut SimpleRng) -> Self {
        let mut board = Self::new();
        for pos in Self::positions() {
            let mut color = factory.random_color(rng);
            let mut rerolls = 0;
            while board.completes_run(pos.row, pos.col, color) && rerolls < GENERATE_REROLLS {
                color = factory.random_color(rng);
                rerolls += 1;
            }
            let tile = factory.spawn_charged(color, rng);
            board.cells[pos.row * GRID_SIZE + pos.col] = Some(tile);
        }
        board
    }

    /// Parse a hand-authored layout: 9 rows of 9 whitespace-separated tokens.
    ///
    /// A token is `.` for an empty cell, or a color letter (`R B G P W O Y`)
    /// followed by an optional yellow voltage digit `1-3` and any of the
    /// suffixes `*` frozen, `+` bright-blue, `^` bright-purple, `$` gold,
    /// `#` fusion core, `-` row clear, `|` column clear, `@` area clear.
    ///
    /// ```
    /// use tile_cascade_core::{Board, TileFactory};
    /// use tile_cascade_core::types::{Color, Pos, TileState};
    ///
    /// let mut rows = vec!["R G B P W O Y3 R* B+"];
    /// rows.extend(std::iter::repeat(". . . . . . . . .").take(8));
    /// let board = Board::parse_layout(&rows, &mut TileFactory::default()).unwrap();
    ///
    /// assert_eq!(board.tile(Pos::new(0, 6)).unwrap().voltage, Some(3));
    /// assert_eq!(board.tile(Pos::new(0, 7)).unwrap().state, TileState::Frozen);
    /// assert_eq!(board.tile(Pos::new(0, 0)).unwrap().color, Color::Red);
    /// assert!(board.get(Pos::new(1, 0)).unwrap().is_none());
    /// ```
    pub fn parse_layout<S: AsRef<str>>(
        rows: &[S],
        factory: &mut TileFactory,
    ) -> Result<Self, LayoutError> {
        if rows.len() != GRID_SIZE {
            return Err(LayoutError::RowCount(rows.len()));
        }
        let mut board = Self::new();
        for (row, line) in rows.iter().enumerate() {
            let tokens: Vec<&str> = line.as_ref().split_whitespace().collect();
            if tokens.len() != GRID_SIZE {
                return Err(LayoutError::ColumnCount {
                    row,
                    found: tokens.len(),
                });
            }
            for (col, token) in tokens.into_iter().enumerate() {
                let tile = parse_token(token, factory).ok_or_else(|| LayoutError::BadToken {
                    row,
                    col,
                    token: token.to_string(),
                })?;
                board.cells[row * GRID_SIZE + col] = tile;
            }
        }
        Ok(board)
    }

    /// Inverse of [`Board::parse_layout`] (ids are not preserved).
    pub fn to_layout(&self) -> Vec<String> {
        self.cells
            .chunks(GRID_SIZE)
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Some(tile) => format_token(tile),
                        None => ".".to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.to_layout() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Serialized as nested rows of optional tiles.
impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.cells.chunks(GRID_SIZE))
    }
}

fn parse_token(token: &str, factory: &mut TileFactory) -> Option<Option<Tile>> {
    if token == "." {
        return Some(None);
    }
    let mut chars = token.chars().peekable();
    let color = Color::from_letter(chars.next()?)?;
    let mut tile = factory.spawn(color);

    if let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        if color != Color::Yellow || !(1..=3).contains(&digit) {
            return None;
        }
        tile = tile.with_voltage(digit as u8);
        chars.next();
    }

    for suffix in chars {
        match suffix {
            '*' => tile.state = TileState::Frozen,
            '+' => tile.state = TileState::BrightBlue,
            '^' => tile.state = TileState::BrightPurple,
            '$' => tile = tile.with_kind(TileKind::Gold),
            '#' => tile = tile.with_kind(TileKind::FusionCore),
            '-' => tile = tile.with_kind(TileKind::RowClear),
            '|' => tile = tile.with_kind(TileKind::ColumnClear),
            '@' => tile = tile.with_kind(TileKind::AreaClear),
            _ => return None,
        }
    }
    Some(Some(tile))
}

fn format_token(tile: &Tile) -> String {
    let mut out = String::with_capacity(4);
    out.push(tile.color.letter());
    if let Some(v) = tile.voltage {
        out.push(char::from(b'0' + v));
    }
    match tile.kind {
        TileKind::Normal => {}
        TileKind::Gold => out.push('$'),
        TileKind::FusionCore => out.push('#'),
        TileKind::RowClear => out.push('-'),
        TileKind::ColumnClear => out.push('|'),
        TileKind::AreaClear => out.push('@'),
    }
    match tile.state {
        TileState::Normal => {}
        TileState::Frozen => out.push('*'),
        TileState::BrightBlue => out.push('+'),
        TileState::BrightPurple => out.push('^'),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TileId;

    fn empty_rows() -> Vec<String> {
        vec![". . . . . . . . .".to_string(); GRID_SIZE]
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.count_occupied(), 0);
        assert!(!board.is_full());
        assert_eq!(board.size(), 9);
    }

    #[test]
    fn test_get_set_roundtrip() {
        let mut board = Board::new();
        let tile = Tile::new(TileId(1), Color::Red);
        assert_eq!(board.set(Pos::new(3, 4), Some(tile)), Ok(None));
        assert_eq!(board.get(Pos::new(3, 4)), Ok(Some(&tile)));
        assert_eq!(board.take(Pos::new(3, 4)), Ok(Some(tile)));
        assert_eq!(board.get(Pos::new(3, 4)), Ok(None));
    }

    #[test]
    fn test_out_of_bounds_is_an_error() {
        let mut board = Board::new();
        let err = BoardError::OutOfBounds {
            row: 9,
            col: 0,
            size: 9,
        };
        assert_eq!(board.get(Pos::new(9, 0)), Err(err.clone()));
        assert_eq!(board.set(Pos::new(9, 0), None), Err(err));
        assert!(board.swap(Pos::new(0, 0), Pos::new(0, 12)).is_err());
    }

    #[test]
    fn test_missing_tile_is_an_error() {
        let board = Board::new();
        assert_eq!(
            board.tile(Pos::new(2, 2)),
            Err(BoardError::MissingTile { row: 2, col: 2 })
        );
    }

    #[test]
    fn test_in_bounds_signed() {
        assert!(Board::in_bounds(0, 0));
        assert!(Board::in_bounds(8, 8));
        assert!(!Board::in_bounds(-1, 0));
        assert!(!Board::in_bounds(0, 9));
    }

    #[test]
    fn test_neighbor_counts() {
        assert_eq!(Board::neighbors4(Pos::new(0, 0)).len(), 2);
        assert_eq!(Board::neighbors4(Pos::new(4, 4)).len(), 4);
        assert_eq!(Board::neighbors8(Pos::new(0, 0)).len(), 3);
        assert_eq!(Board::neighbors8(Pos::new(0, 4)).len(), 5);
        assert_eq!(Board::neighbors8(Pos::new(4, 4)).len(), 8);
    }

    #[test]
    fn test_area_is_clipped() {
        assert_eq!(Board::area(Pos::new(4, 4), 1).len(), 9);
        assert_eq!(Board::area(Pos::new(0, 0), 1).len(), 4);
        assert_eq!(Board::area(Pos::new(4, 4), 2).len(), 25);
        assert_eq!(Board::area(Pos::new(0, 8), 2).len(), 9);
        assert_eq!(Board::area(Pos::new(4, 4), 99).len(), CELL_COUNT);
    }

    #[test]
    fn test_swap_exchanges_tiles() {
        let mut board = Board::new();
        let a = Tile::new(TileId(1), Color::Red);
        let b = Tile::new(TileId(2), Color::Blue);
        board.set(Pos::new(0, 0), Some(a)).unwrap();
        board.set(Pos::new(0, 1), Some(b)).unwrap();
        board.swap(Pos::new(0, 0), Pos::new(0, 1)).unwrap();
        assert_eq!(board.tile(Pos::new(0, 0)).unwrap().id, TileId(2));
        assert_eq!(board.tile(Pos::new(0, 1)).unwrap().id, TileId(1));
    }

    #[test]
    fn test_generate_fills_without_runs() {
        for seed in 1..20 {
            let mut rng = SimpleRng::new(seed);
            let mut factory = TileFactory::default();
            let board = Board::generate(&mut factory, &mut rng);
            assert!(board.is_full());

            let color = |r: usize, c: usize| board.tile(Pos::new(r, c)).unwrap().color;
            for r in 0..GRID_SIZE {
                for c in 2..GRID_SIZE {
                    let row_run = color(r, c) == color(r, c - 1) && color(r, c) == color(r, c - 2);
                    let col_run = color(c, r) == color(c - 1, r) && color(c, r) == color(c - 2, r);
                    assert!(!row_run && !col_run, "seed {} produced a run", seed);
                }
            }
        }
    }

    #[test]
    fn test_parse_layout_tokens() {
        let mut rows = empty_rows();
        rows[0] = "R Y2 B+ P^ W* G$ O- R| Y1#".to_string();
        rows[1] = "B@ . . . . . . . .".to_string();
        let board = Board::parse_layout(&rows, &mut TileFactory::default()).unwrap();

        assert_eq!(board.tile(Pos::new(0, 1)).unwrap().voltage, Some(2));
        assert_eq!(board.tile(Pos::new(0, 2)).unwrap().state, TileState::BrightBlue);
        assert_eq!(board.tile(Pos::new(0, 3)).unwrap().state, TileState::BrightPurple);
        assert_eq!(board.tile(Pos::new(0, 4)).unwrap().state, TileState::Frozen);
        assert!(board.tile(Pos::new(0, 5)).unwrap().is_gold());
        assert_eq!(board.tile(Pos::new(0, 6)).unwrap().kind, TileKind::RowClear);
        assert_eq!(board.tile(Pos::new(0, 7)).unwrap().kind, TileKind::ColumnClear);
        assert!(board.tile(Pos::new(0, 8)).unwrap().is_fusion_core());
        assert_eq!(board.tile(Pos::new(1, 0)).unwrap().kind, TileKind::AreaClear);
        assert_eq!(board.count_occupied(), 10);
    }

    #[test]
    fn test_parse_layout_rejects_bad_input() {
        let mut factory = TileFactory::default();
        assert_eq!(
            Board::parse_layout(&empty_rows()[..3], &mut factory),
            Err(LayoutError::RowCount(3))
        );

        let mut rows = empty_rows();
        rows[2] = ". . .".to_string();
        assert_eq!(
            Board::parse_layout(&rows, &mut factory),
            Err(LayoutError::ColumnCount { row: 2, found: 3 })
        );

        let mut rows = empty_rows();
        rows[4] = ". . . . X . . . .".to_string();
        assert!(matches!(
            Board::parse_layout(&rows, &mut factory),
            Err(LayoutError::BadToken { row: 4, col: 4, .. })
        ));

        // Voltage digits only belong to yellow tiles.
        let mut rows = empty_rows();
        rows[0] = "R2 . . . . . . . .".to_string();
        assert!(Board::parse_layout(&rows, &mut factory).is_err());
    }

    #[test]
    fn test_layout_display_matches_parse() {
        let mut rows = empty_rows();
        rows[8] = "R Y3 B+ P^ W* G$ O- R| Y3#".to_string();
        let board = Board::parse_layout(&rows, &mut TileFactory::default()).unwrap();
        assert_eq!(board.to_layout(), rows);
    }

    #[test]
    fn test_drain_and_fill_preserve_tiles() {
        let mut rng = SimpleRng::new(4);
        let mut factory = TileFactory::default();
        let mut board = Board::generate(&mut factory, &mut rng);
        let before = board.clone();
        let tiles = board.drain_tiles();
        assert_eq!(tiles.len(), CELL_COUNT);
        assert_eq!(board.count_occupied(), 0);
        board.fill_from(tiles);
        assert_eq!(board, before);
    }
}
