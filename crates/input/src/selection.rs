//! Board cursor and the two-step select-then-swap gesture.

use crate::core::Board;
use crate::types::{InputAction, Pos, GRID_SIZE};

/// Result of activating the cell under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Frozen tiles, fusion cores and empty cells cannot be picked.
    Refused,
    Selected(Pos),
    Deselected,
    /// A non-adjacent cell replaced the previous selection.
    Reselected(Pos),
    /// Forward to the engine. The selection is cleared.
    Swap(Pos, Pos),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub cursor: Pos,
    pub selected: Option<Pos>,
}

impl Default for Selection {
    fn default() -> Self {
        let mid = GRID_SIZE / 2;
        Self {
            cursor: Pos::new(mid, mid),
            selected: None,
        }
    }
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the cursor one cell, clamped to the board. Returns false for
    /// actions that are not cursor moves.
    pub fn move_cursor(&mut self, action: InputAction) -> bool {
        let Pos { row, col } = self.cursor;
        let last = GRID_SIZE - 1;
        self.cursor = match action {
            InputAction::CursorUp => Pos::new(row.saturating_sub(1), col),
            InputAction::CursorDown => Pos::new((row + 1).min(last), col),
            InputAction::CursorLeft => Pos::new(row, col.saturating_sub(1)),
            InputAction::CursorRight => Pos::new(row, (col + 1).min(last)),
            _ => return false,
        };
        true
    }

    pub fn cancel(&mut self) {
        self.selected = None;
    }

    /// Activate the cell under the cursor.
    pub fn activate(&mut self, board: &Board) -> SelectionOutcome {
        self.activate_at(self.cursor, board)
    }

    /// Apply the click rules at `pos`:
    ///
    /// - frozen tiles and fusion cores are refused
    /// - with nothing selected, `pos` becomes the selection
    /// - clicking the selection again drops it
    /// - an adjacent cell, or any cell when either tile is gold, requests a swap
    /// - any other cell becomes the new selection
    pub fn activate_at(&mut self, pos: Pos, board: &Board) -> SelectionOutcome {
        let Some(tile) = board.get(pos).ok().flatten() else {
            return SelectionOutcome::Refused;
        };
        if tile.is_frozen() || tile.is_fusion_core() {
            return SelectionOutcome::Refused;
        }

        let Some(current) = self.selected else {
            self.selected = Some(pos);
            return SelectionOutcome::Selected(pos);
        };
        if current == pos {
            self.selected = None;
            return SelectionOutcome::Deselected;
        }

        let gold = tile.is_gold() || board.get(current).ok().flatten().is_some_and(|t| t.is_gold());
        if current.is_adjacent(pos) || gold {
            self.selected = None;
            return SelectionOutcome::Swap(current, pos);
        }

        self.selected = Some(pos);
        SelectionOutcome::Reselected(pos)
    }
}
