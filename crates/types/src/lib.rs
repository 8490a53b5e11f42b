//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are plain data with no game logic attached, so they can be used
//! by the resolution engine, the terminal renderer and the trace serializer alike.
//!
//! # Board Dimensions
//!
//! The playfield is a fixed 9x9 grid:
//!
//! - **Rows**: indexed 0-8 (top to bottom)
//! - **Columns**: indexed 0-8 (left to right)
//! - Refilled tiles enter from above row 0 (negative spawn rows)
//!
//! # Color Distribution
//!
//! New tiles are drawn from a weighted distribution (weights sum to 100):
//!
//! | Color | Weight |
//! |-------|--------|
//! | red, blue, green, purple, white | 18 each |
//! | orange, yellow | 5 each |
//!
//! # Pacing Constants
//!
//! Pauses are emitted into the turn's event log; the presentation layer decides
//! whether to honor them. Values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `SWAP_MS` | 300 | Swap slide |
//! | `INVALID_MS` | 300 | Swap-back after a non-matching move |
//! | `EFFECT_MS` | 300 | Generic skill effect |
//! | `REMOVE_MS` | 300 | Removal fade |
//! | `WAVE_PAUSE_MS` | 180 | Gap between frozen shatter waves |
//! | `GRAVITY_MS` | 500 | Fall and refill |
//! | `BOLT_MS` | 200 | One lightning discharge |
//! | `BALL_STEP_MS` | 400 | One ball-lightning step |
//! | `WHIRLWIND_MS` | 800 | Golden whirlwind |
//! | `SHUFFLE_MS` | 1000 | Deadlock notice before reshuffle |
//!
//! # Examples
//!
//! ```
//! use tile_cascade_types::{Color, Tile, TileId, InputAction, GRID_SIZE};
//!
//! let color = Color::from_str("yellow").unwrap();
//! let tile = Tile::new(TileId(7), color);
//! assert_eq!(tile.voltage, Some(1));
//!
//! let action = InputAction::from_str("activate").unwrap();
//! assert_eq!(action, InputAction::Activate);
//!
//! assert_eq!(GRID_SIZE, 9);
//! ```

use serde::Serialize;

/// Board edge length in cells (9x9)
pub const GRID_SIZE: usize = 9;

/// Total number of cells on the board
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Default spawn weights in [`Color::ALL`] order.
pub const DEFAULT_COLOR_WEIGHTS: [u32; 7] = [18, 18, 18, 18, 18, 5, 5];

/// Highest voltage a yellow tile can hold; reaching it triggers an overload.
pub const MAX_VOLTAGE: u8 = 3;

/// Durability of a freshly spawned fusion core (end-of-turn pulses before meltdown).
pub const FUSION_CORE_DURABILITY: u8 = 5;

/// Number of extra tiles a golden whirlwind pulls in besides the gold tile itself.
pub const GOLD_ABSORB_COUNT: usize = 25;

/// Points per removed tile, before the combo multiplier.
pub const POINTS_PER_TILE: u32 = 10;

/// Recolor count of a bright-purple detonation.
pub const VOID_PULSE_RECOLORS: usize = 4;

/// Steps a ball lightning travels after its escape step.
pub const BALL_LIGHTNING_STEPS: u8 = 2;

/// Voltage sum thresholds for yellow match-3 (checked high to low).
pub const FUSION_VOLTAGE: u8 = 9;
pub const EMP_VOLTAGE: u8 = 7;
pub const TWIN_BOLT_VOLTAGE: u8 = 5;
pub const BOLT_VOLTAGE: u8 = 3;

/// Radius of the twin-bolt search area (7x7 around the creation cell).
pub const TWIN_BOLT_RADIUS: usize = 3;

/// Score required per level number (level 3 needs 3000).
pub const LEVEL_SCORE_STEP: u32 = 1000;

/// Color target base and per-level increment (`10 + 5 * level`).
pub const LEVEL_TARGET_BASE: u32 = 10;
pub const LEVEL_TARGET_STEP: u32 = 5;

pub const SWAP_MS: u32 = 300;
pub const INVALID_MS: u32 = 300;
pub const EFFECT_MS: u32 = 300;
pub const REMOVE_MS: u32 = 300;
pub const WAVE_PAUSE_MS: u32 = 180;
pub const GRAVITY_MS: u32 = 500;
pub const BOLT_MS: u32 = 200;
pub const BALL_STEP_MS: u32 = 400;
pub const WHIRLWIND_MS: u32 = 800;
pub const SHUFFLE_MS: u32 = 1000;

/// The seven tile colors, each with its own match skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Green,
    Purple,
    White,
    Orange,
    Yellow,
}

impl Color {
    /// All colors in canonical order (matches [`DEFAULT_COLOR_WEIGHTS`]).
    pub const ALL: [Color; 7] = [
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Purple,
        Color::White,
        Color::Orange,
        Color::Yellow,
    ];

    /// Position in [`Color::ALL`].
    pub fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Blue => 1,
            Color::Green => 2,
            Color::Purple => 3,
            Color::White => 4,
            Color::Orange => 5,
            Color::Yellow => 6,
        }
    }

    /// Parse color from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_cascade_types::Color;
    ///
    /// assert_eq!(Color::from_str("Red"), Some(Color::Red));
    /// assert_eq!(Color::from_str("purple"), Some(Color::Purple));
    /// assert_eq!(Color::from_str("gold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(Color::Red),
            "blue" => Some(Color::Blue),
            "green" => Some(Color::Green),
            "purple" => Some(Color::Purple),
            "white" => Some(Color::White),
            "orange" => Some(Color::Orange),
            "yellow" => Some(Color::Yellow),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Purple => "purple",
            Color::White => "white",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
        }
    }

    /// Single-letter code used by board layouts.
    ///
    /// ```
    /// use tile_cascade_types::Color;
    ///
    /// for color in Color::ALL {
    ///     assert_eq!(Color::from_letter(color.letter()), Some(color));
    /// }
    /// ```
    pub fn letter(&self) -> char {
        match self {
            Color::Red => 'R',
            Color::Blue => 'B',
            Color::Green => 'G',
            Color::Purple => 'P',
            Color::White => 'W',
            Color::Orange => 'O',
            Color::Yellow => 'Y',
        }
    }

    pub fn from_letter(ch: char) -> Option<Self> {
        match ch.to_ascii_uppercase() {
            'R' => Some(Color::Red),
            'B' => Some(Color::Blue),
            'G' => Some(Color::Green),
            'P' => Some(Color::Purple),
            'W' => Some(Color::White),
            'O' => Some(Color::Orange),
            'Y' => Some(Color::Yellow),
            _ => None,
        }
    }
}

/// Structural role of a tile.
///
/// - **Normal**: plain colored tile
/// - **Gold**: spawned by a 5+ run; swapping it with anything triggers a whirlwind
/// - **RowClear / ColumnClear / AreaClear**: explode their line or 3x3 when removed
/// - **FusionCore**: spawned by a 9-volt yellow run; pulses at the end of each turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Normal,
    Gold,
    RowClear,
    ColumnClear,
    AreaClear,
    FusionCore,
}

impl TileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TileKind::Normal => "normal",
            TileKind::Gold => "gold",
            TileKind::RowClear => "row_clear",
            TileKind::ColumnClear => "column_clear",
            TileKind::AreaClear => "area_clear",
            TileKind::FusionCore => "fusion_core",
        }
    }

    /// True for the kinds that expand the removal set when swept into it.
    pub fn is_explosive(&self) -> bool {
        matches!(
            self,
            TileKind::RowClear | TileKind::ColumnClear | TileKind::AreaClear
        )
    }
}

/// Transient status of a tile. A tile carries at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TileState {
    Normal,
    /// Cannot match or be swapped; removed in shatter waves.
    Frozen,
    /// Expands into its 3x3 when removed.
    BrightBlue,
    /// Recolors part of its 5x5 when removed.
    BrightPurple,
}

impl TileState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TileState::Normal => "normal",
            TileState::Frozen => "frozen",
            TileState::BrightBlue => "bright_blue",
            TileState::BrightPurple => "bright_purple",
        }
    }
}

/// Unique, never-reused tile identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TileId(pub u64);

/// A board coordinate. Bounds are checked by the board, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance between two cells.
    pub fn manhattan(&self, other: Pos) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// True when the two cells share an edge.
    pub fn is_adjacent(&self, other: Pos) -> bool {
        self.manhattan(other) == 1
    }
}

/// Orientation of a match run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// The two directions perpendicular to a run of this orientation.
    pub fn perpendicular(&self) -> [Direction; 2] {
        match self {
            Orientation::Horizontal => [Direction::Up, Direction::Down],
            Orientation::Vertical => [Direction::Left, Direction::Right],
        }
    }
}

/// Orthogonal step direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// (row delta, column delta)
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// A single tile.
///
/// Invariants kept by the constructors and [`Tile::transmute_to`]:
/// - `voltage` is `Some(1..=3)` exactly when `color` is yellow
/// - `durability` is `Some(_)` exactly when `kind` is a fusion core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Tile {
    pub id: TileId,
    pub color: Color,
    pub kind: TileKind,
    pub state: TileState,
    pub voltage: Option<u8>,
    pub durability: Option<u8>,
}

impl Tile {
    /// A normal tile. Yellow tiles start at voltage 1.
    pub fn new(id: TileId, color: Color) -> Self {
        Self {
            id,
            color,
            kind: TileKind::Normal,
            state: TileState::Normal,
            voltage: (color == Color::Yellow).then_some(1),
            durability: None,
        }
    }

    /// Set the voltage of a yellow tile (clamped to 1..=3). No-op for other colors.
    pub fn with_voltage(mut self, voltage: u8) -> Self {
        if self.color == Color::Yellow {
            self.voltage = Some(voltage.clamp(1, MAX_VOLTAGE));
        }
        self
    }

    pub fn with_kind(mut self, kind: TileKind) -> Self {
        self.kind = kind;
        self.durability = (kind == TileKind::FusionCore).then_some(FUSION_CORE_DURABILITY);
        self
    }

    pub fn with_state(mut self, state: TileState) -> Self {
        self.state = state;
        self
    }

    /// A gold tile keeping the color of the run that forged it.
    pub fn gold(id: TileId, color: Color) -> Self {
        Self::new(id, color).with_kind(TileKind::Gold)
    }

    /// A fully charged fusion core.
    pub fn fusion_core(id: TileId) -> Self {
        Self::new(id, Color::Yellow)
            .with_voltage(MAX_VOLTAGE)
            .with_kind(TileKind::FusionCore)
    }

    pub fn is_frozen(&self) -> bool {
        self.state == TileState::Frozen
    }

    pub fn is_gold(&self) -> bool {
        self.kind == TileKind::Gold
    }

    pub fn is_fusion_core(&self) -> bool {
        self.kind == TileKind::FusionCore
    }

    /// Whether the tile can take part in a match run.
    pub fn is_matchable(&self) -> bool {
        !self.is_frozen() && !self.is_gold() && !self.is_fusion_core()
    }

    /// Whether the tile can be picked up by the player.
    pub fn is_movable(&self) -> bool {
        !self.is_frozen() && !self.is_fusion_core()
    }

    pub fn voltage(&self) -> u8 {
        self.voltage.unwrap_or(0)
    }

    /// Change color, keeping the voltage invariant.
    ///
    /// A tile becoming yellow starts at voltage 1; a tile leaving yellow drops its voltage.
    pub fn transmute_to(&mut self, color: Color) {
        if color == Color::Yellow {
            if self.voltage.is_none() {
                self.voltage = Some(1);
            }
        } else {
            self.voltage = None;
        }
        self.color = color;
    }
}

/// Visual effect categories reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Red match-3 strike on one neighbor.
    Scorch,
    /// Red match-4 strikes from several red tiles.
    Firestorm,
    /// Green match-3 side cut.
    WindSlash,
    /// Green match-3 cut blocked by a green flank.
    SlashBlocked,
    /// Green match-4 slides.
    Gale,
    /// A green tile had nowhere to slide.
    SlideBlocked,
    /// Blue tile primed to bright-blue.
    Prime,
    /// Blue match-4 line sweep.
    HydroBeam,
    /// Bright-blue detonation.
    TidalBurst,
    /// Purple match-3 recolor.
    Vortex,
    /// Purple tile primed to bright-purple.
    Empower,
    /// Bright-purple detonation recolor.
    VoidPulse,
    /// White freeze.
    FrostNova,
    /// Frozen tile removed.
    Shatter,
    /// White match-4 frozen flood and pair freeze.
    Glacier,
    /// Orange match-3 conversion.
    Acid,
    /// Orange match-4 conversion of the dominant color.
    Biohazard,
    Lightning,
    Emp,
    Overload,
    BallLightning,
    BallDetonation,
    Fizzle,
    FusionPulse,
    FusionMeltdown,
    /// Golden whirlwind.
    Whirlwind,
    /// Row, column or area clear tile detonation.
    LineClear,
    /// Gold or fusion core materialized.
    Forge,
}

impl EffectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::Scorch => "scorch",
            EffectKind::Firestorm => "firestorm",
            EffectKind::WindSlash => "wind_slash",
            EffectKind::SlashBlocked => "slash_blocked",
            EffectKind::Gale => "gale",
            EffectKind::SlideBlocked => "slide_blocked",
            EffectKind::Prime => "prime",
            EffectKind::HydroBeam => "hydro_beam",
            EffectKind::TidalBurst => "tidal_burst",
            EffectKind::Vortex => "vortex",
            EffectKind::Empower => "empower",
            EffectKind::VoidPulse => "void_pulse",
            EffectKind::FrostNova => "frost_nova",
            EffectKind::Shatter => "shatter",
            EffectKind::Glacier => "glacier",
            EffectKind::Acid => "acid",
            EffectKind::Biohazard => "biohazard",
            EffectKind::Lightning => "lightning",
            EffectKind::Emp => "emp",
            EffectKind::Overload => "overload",
            EffectKind::BallLightning => "ball_lightning",
            EffectKind::BallDetonation => "ball_detonation",
            EffectKind::Fizzle => "fizzle",
            EffectKind::FusionPulse => "fusion_pulse",
            EffectKind::FusionMeltdown => "fusion_meltdown",
            EffectKind::Whirlwind => "whirlwind",
            EffectKind::LineClear => "line_clear",
            EffectKind::Forge => "forge",
        }
    }
}

/// One visual effect with the cells it touches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualEffect {
    pub kind: EffectKind,
    pub origin: Pos,
    pub cells: Vec<Pos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Pos>,
}

impl VisualEffect {
    pub fn new(kind: EffectKind, origin: Pos) -> Self {
        Self {
            kind,
            origin,
            cells: Vec::new(),
            orientation: None,
            target: None,
        }
    }

    pub fn with_cells(mut self, cells: Vec<Pos>) -> Self {
        self.cells = cells;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn with_target(mut self, target: Pos) -> Self {
        self.target = Some(target);
        self
    }
}

/// Game-level events (sound cues in a full front end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "event", content = "value")]
pub enum GameEvent {
    Select,
    Swap,
    Invalid,
    MatchCombo(u32),
    Explosion(Color),
    SpecialCreated(TileKind),
    Whirlwind,
    Zap,
    Fizzle,
    Siren,
    Shuffle,
    LevelComplete(u32),
}

/// Player intents produced by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    /// Select the cell under the cursor, or swap with the selected one
    Activate,
    /// Drop the current selection
    Cancel,
    /// Restart the current level with a fresh board
    Restart,
    /// Advance after a completed level
    NextLevel,
}

impl InputAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_cascade_types::InputAction;
    ///
    /// assert_eq!(InputAction::from_str("cursorLeft"), Some(InputAction::CursorLeft));
    /// assert_eq!(InputAction::from_str("nextlevel"), Some(InputAction::NextLevel));
    /// assert_eq!(InputAction::from_str("hardDrop"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cursorup" => Some(InputAction::CursorUp),
            "cursordown" => Some(InputAction::CursorDown),
            "cursorleft" => Some(InputAction::CursorLeft),
            "cursorright" => Some(InputAction::CursorRight),
            "activate" => Some(InputAction::Activate),
            "cancel" => Some(InputAction::Cancel),
            "restart" => Some(InputAction::Restart),
            "nextlevel" => Some(InputAction::NextLevel),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputAction::CursorUp => "cursorUp",
            InputAction::CursorDown => "cursorDown",
            InputAction::CursorLeft => "cursorLeft",
            InputAction::CursorRight => "cursorRight",
            InputAction::Activate => "activate",
            InputAction::Cancel => "cancel",
            InputAction::Restart => "restart",
            InputAction::NextLevel => "nextLevel",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one_hundred() {
        assert_eq!(DEFAULT_COLOR_WEIGHTS.iter().sum::<u32>(), 100);
        assert_eq!(DEFAULT_COLOR_WEIGHTS[Color::Orange.index()], 5);
        assert_eq!(DEFAULT_COLOR_WEIGHTS[Color::Yellow.index()], 5);
    }

    #[test]
    fn test_color_index_matches_all_order() {
        for (i, color) in Color::ALL.iter().enumerate() {
            assert_eq!(color.index(), i);
            assert_eq!(Color::from_str(color.as_str()), Some(*color));
        }
    }

    #[test]
    fn test_transmute_keeps_voltage_invariant() {
        let mut tile = Tile::new(TileId(1), Color::Red);
        assert_eq!(tile.voltage, None);

        tile.transmute_to(Color::Yellow);
        assert_eq!(tile.voltage, Some(1));

        tile.voltage = Some(3);
        tile.transmute_to(Color::Yellow);
        assert_eq!(tile.voltage, Some(3));

        tile.transmute_to(Color::Blue);
        assert_eq!(tile.voltage, None);
    }

    #[test]
    fn test_with_voltage_clamps_and_ignores_non_yellow() {
        let yellow = Tile::new(TileId(1), Color::Yellow).with_voltage(9);
        assert_eq!(yellow.voltage, Some(MAX_VOLTAGE));

        let red = Tile::new(TileId(2), Color::Red).with_voltage(2);
        assert_eq!(red.voltage, None);
    }

    #[test]
    fn test_fusion_core_carries_durability() {
        let core = Tile::fusion_core(TileId(5));
        assert!(core.is_fusion_core());
        assert_eq!(core.durability, Some(FUSION_CORE_DURABILITY));
        assert!(!core.is_matchable());
        assert!(!core.is_movable());
    }

    #[test]
    fn test_gold_never_matches_but_moves() {
        let gold = Tile::gold(TileId(3), Color::Red);
        assert!(!gold.is_matchable());
        assert!(gold.is_movable());
        assert_eq!(gold.durability, None);
    }

    #[test]
    fn test_direction_opposites() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            let (dr, dc) = dir.delta();
            let (or, oc) = dir.opposite().delta();
            assert_eq!((dr + or, dc + oc), (0, 0));
        }
    }

    #[test]
    fn test_pos_adjacency() {
        let p = Pos::new(4, 4);
        assert!(p.is_adjacent(Pos::new(3, 4)));
        assert!(p.is_adjacent(Pos::new(4, 5)));
        assert!(!p.is_adjacent(Pos::new(5, 5)));
        assert!(!p.is_adjacent(p));
    }
}
