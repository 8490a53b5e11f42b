//! Tile creation: id allocation and the weighted color distribution.

use crate::error::ConfigError;
use crate::rng::SimpleRng;
use crate::types::{Color, Tile, TileId, DEFAULT_COLOR_WEIGHTS, MAX_VOLTAGE};

/// Spawn weights per color, in [`Color::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorWeights([u32; 7]);

impl ColorWeights {
    pub fn new(weights: [u32; 7]) -> Result<Self, ConfigError> {
        if weights.iter().all(|&w| w == 0) {
            return Err(ConfigError::EmptyWeights);
        }
        Ok(Self(weights))
    }

    /// Equal weights over `colors`, zero elsewhere.
    pub fn only(colors: &[Color]) -> Result<Self, ConfigError> {
        let mut weights = [0; 7];
        for color in colors {
            weights[color.index()] = 1;
        }
        Self::new(weights)
    }

    pub fn weight(&self, color: Color) -> u32 {
        self.0[color.index()]
    }

    pub fn as_array(&self) -> [u32; 7] {
        self.0
    }

    pub fn draw(&self, rng: &mut SimpleRng) -> Color {
        rng.weighted_index(&self.0)
            .map(|i| Color::ALL[i])
            .unwrap_or(Color::Red)
    }
}

impl Default for ColorWeights {
    fn default() -> Self {
        Self(DEFAULT_COLOR_WEIGHTS)
    }
}

/// Allocates tile ids and draws new tiles.
///
/// Ids are never reused for the lifetime of a factory.
#[derive(Debug, Clone)]
pub struct TileFactory {
    next_id: u64,
    weights: ColorWeights,
}

impl TileFactory {
    pub fn new(weights: ColorWeights) -> Self {
        Self { next_id: 1, weights }
    }

    pub fn weights(&self) -> ColorWeights {
        self.weights
    }

    pub fn set_weights(&mut self, weights: ColorWeights) {
        self.weights = weights;
    }

    pub fn next_id(&mut self) -> TileId {
        let id = TileId(self.next_id);
        self.next_id += 1;
        id
    }

    /// A normal tile of a fixed color (yellow at voltage 1).
    pub fn spawn(&mut self, color: Color) -> Tile {
        Tile::new(self.next_id(), color)
    }

    pub fn random_color(&self, rng: &mut SimpleRng) -> Color {
        self.weights.draw(rng)
    }

    /// A normal tile of `color`; yellow gets a random voltage in 1..=3.
    pub fn spawn_charged(&mut self, color: Color, rng: &mut SimpleRng) -> Tile {
        let tile = self.spawn(color);
        if color == Color::Yellow {
            tile.with_voltage(rng.next_range(MAX_VOLTAGE as u32) as u8 + 1)
        } else {
            tile
        }
    }

    pub fn random_tile(&mut self, rng: &mut SimpleRng) -> Tile {
        let color = self.random_color(rng);
        self.spawn_charged(color, rng)
    }

    pub fn gold(&mut self, color: Color) -> Tile {
        Tile::gold(self.next_id(), color)
    }

    pub fn fusion_core(&mut self) -> Tile {
        Tile::fusion_core(self.next_id())
    }
}

impl Default for TileFactory {
    fn default() -> Self {
        Self::new(ColorWeights::default())
    }
}
