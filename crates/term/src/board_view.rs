//! BoardView: maps a [`Scene`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{Board, SessionSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Color, EffectKind, Pos, Tile, TileKind, TileState, GRID_SIZE};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Everything the view draws: the last applied session state plus UI overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub snapshot: SessionSnapshot,
    pub cursor: Pos,
    pub selected: Option<Pos>,
    /// Cells touched by the most recent effect.
    pub highlight: Vec<Pos>,
    pub effect: Option<EffectKind>,
    pub combo: u32,
    pub banner: Option<&'static str>,
}

impl Scene {
    pub fn new(snapshot: SessionSnapshot) -> Self {
        let mid = GRID_SIZE / 2;
        Self {
            snapshot,
            cursor: Pos::new(mid, mid),
            selected: None,
            highlight: Vec::new(),
            effect: None,
            combo: 0,
            banner: None,
        }
    }

    /// Replace the session state, keeping cursor and selection.
    pub fn sync(&mut self, snapshot: SessionSnapshot) {
        self.combo = snapshot.last_combo;
        if snapshot.complete {
            self.banner = Some(LEVEL_COMPLETE);
        }
        self.snapshot = snapshot;
    }

    /// Drop per-turn overlays before a new turn plays back.
    pub fn clear_transient(&mut self) {
        self.highlight.clear();
        self.effect = None;
        self.combo = 0;
        if !self.snapshot.complete {
            self.banner = None;
        }
    }
}

pub const LEVEL_COMPLETE: &str = "LEVEL COMPLETE";

const BOARD_BG: Rgb = Rgb::new(24, 24, 32);
const CURSOR_BG: Rgb = Rgb::new(90, 90, 110);
const SELECTED_BG: Rgb = Rgb::new(150, 130, 40);
const HIGHLIGHT_BG: Rgb = Rgb::new(120, 40, 40);
const LABEL: CellStyle = CellStyle::new(Rgb::new(220, 220, 220), Rgb::new(0, 0, 0)).bold();
const VALUE: CellStyle = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

pub fn color_rgb(color: Color) -> Rgb {
    match color {
        Color::Red => Rgb::new(230, 70, 70),
        Color::Blue => Rgb::new(80, 130, 240),
        Color::Green => Rgb::new(90, 210, 110),
        Color::Purple => Rgb::new(190, 110, 230),
        Color::White => Rgb::new(235, 235, 235),
        Color::Orange => Rgb::new(250, 150, 40),
        Color::Yellow => Rgb::new(245, 225, 70),
    }
}

/// Two-character face of a tile: color letter plus a marker for kind, state
/// or voltage.
pub fn tile_glyph(tile: &Tile) -> [char; 2] {
    let marker = match (tile.kind, tile.state) {
        (TileKind::Gold, _) => '$',
        (TileKind::FusionCore, _) => '#',
        (TileKind::RowClear, _) => '-',
        (TileKind::ColumnClear, _) => '|',
        (TileKind::AreaClear, _) => '@',
        (_, TileState::Frozen) => '*',
        (_, TileState::BrightBlue) => '+',
        (_, TileState::BrightPurple) => '^',
        _ => match tile.voltage {
            Some(v) => char::from_digit(v as u32, 10).unwrap_or(' '),
            None => ' ',
        },
    };
    [tile.color.letter(), marker]
}

fn tile_style(tile: &Tile, bg: Rgb) -> CellStyle {
    let fg = match (tile.kind, tile.state) {
        (TileKind::Gold, _) => Rgb::new(255, 200, 0),
        (_, TileState::Frozen) => color_rgb(tile.color).blend(Rgb::new(170, 220, 255), 160),
        _ => color_rgb(tile.color),
    };
    let style = CellStyle::new(fg, bg);
    if tile.kind != TileKind::Normal || tile.state != TileState::Normal {
        style.bold()
    } else {
        style
    }
}

pub struct BoardView {
    /// Board cell width in terminal columns.
    cell_w: u16,
}

impl Default for BoardView {
    fn default() -> Self {
        Self { cell_w: 3 }
    }
}

impl BoardView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(2),
        }
    }

    /// Terminal size of the framed board.
    pub fn frame_size(&self) -> (u16, u16) {
        let n = GRID_SIZE as u16;
        (n * self.cell_w + 2, n + 2)
    }

    /// Origin of the frame for a viewport: centered, with room for the side panel.
    pub fn frame_origin(&self, viewport: Viewport) -> (u16, u16) {
        let (w, h) = self.frame_size();
        let x = viewport.width.saturating_sub(w + PANEL_W) / 2;
        let y = viewport.height.saturating_sub(h) / 2;
        (x, y)
    }

    /// Terminal position of the left column of `pos`.
    pub fn cell_origin(&self, viewport: Viewport, pos: Pos) -> (u16, u16) {
        let (x, y) = self.frame_origin(viewport);
        (
            x + 1 + pos.col as u16 * self.cell_w,
            y + 1 + pos.row as u16,
        )
    }

    pub fn render_into(&self, scene: &Scene, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.reset(viewport.width, viewport.height);

        let (fx, fy) = self.frame_origin(viewport);
        let (fw, fh) = self.frame_size();
        fb.draw_box(fx, fy, fw, fh, CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0)));

        for pos in Board::positions() {
            self.draw_cell(fb, scene, viewport, pos);
        }

        self.draw_panel(fb, scene, viewport, fx + fw + 2, fy);

        if let Some(text) = scene.banner {
            let w = text.chars().count() as u16;
            let x = fx + fw.saturating_sub(w) / 2;
            fb.put_str(x, fy + fh / 2, text, CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold());
        }
    }

    pub fn render(&self, scene: &Scene, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(scene, viewport, &mut fb);
        fb
    }

    fn draw_cell(&self, fb: &mut FrameBuffer, scene: &Scene, viewport: Viewport, pos: Pos) {
        let bg = if scene.selected == Some(pos) {
            SELECTED_BG
        } else if scene.cursor == pos {
            CURSOR_BG
        } else if scene.highlight.contains(&pos) {
            HIGHLIGHT_BG
        } else {
            BOARD_BG
        };
        let (x, y) = self.cell_origin(viewport, pos);
        fb.fill_rect(x, y, self.cell_w, 1, ' ', CellStyle::new(BOARD_BG, bg));

        let pad = (self.cell_w - 2) / 2;
        match scene.snapshot.board.get(pos).ok().flatten() {
            Some(tile) => {
                let style = tile_style(tile, bg);
                let [letter, marker] = tile_glyph(tile);
                fb.put_char(x + pad, y, letter, style);
                fb.put_char(x + pad + 1, y, marker, style);
            }
            None => {
                let dot = CellStyle::new(Rgb::new(90, 90, 100), bg).dim();
                fb.put_char(x + pad, y, '·', dot);
            }
        }
    }

    fn draw_panel(&self, fb: &mut FrameBuffer, scene: &Scene, viewport: Viewport, x: u16, top: u16) {
        if x.saturating_add(PANEL_W) > viewport.width {
            return;
        }
        let snap = &scene.snapshot;
        let mut y = top;

        fb.put_str(x, y, "LEVEL", LABEL);
        fb.put_u32(x + 7, y, snap.level, VALUE);
        y += 2;

        fb.put_str(x, y, "SCORE", LABEL);
        y += 1;
        let end = fb.put_u32(x, y, snap.score, VALUE);
        let end = fb.put_str(end, y, " / ", VALUE.dim());
        fb.put_u32(end, y, snap.target_score, VALUE);
        y += 1;
        let filled = (snap.score_progress() * 12.0) as u16;
        fb.fill_rect(x, y, 12, 1, '░', VALUE.dim());
        fb.fill_rect(x, y, filled, 1, '█', CellStyle::new(Rgb::new(90, 210, 110), Rgb::new(0, 0, 0)));
        y += 2;

        if !snap.targets.is_empty() {
            fb.put_str(x, y, "TARGETS", LABEL);
            y += 1;
            for (color, left) in snap.targets.iter() {
                let style = CellStyle::new(color_rgb(color), Rgb::new(0, 0, 0));
                let end = fb.put_str(x, y, color.as_str(), style);
                if left == 0 {
                    fb.put_str(end + 1, y, "done", VALUE.dim());
                } else {
                    fb.put_u32(end + 1, y, left, VALUE);
                }
                y += 1;
            }
            y += 1;
        }

        if scene.combo > 1 {
            let end = fb.put_str(x, y, "COMBO x", LABEL);
            fb.put_u32(end, y, scene.combo, LABEL);
        }
        y += 1;
        if let Some(kind) = scene.effect {
            fb.put_str(x, y, kind.as_str(), VALUE.dim());
        }
    }
}

const PANEL_W: u16 = 20;
