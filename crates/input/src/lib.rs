//! Terminal input for the cascade puzzle.
//!
//! Maps `crossterm` key events into [`crate::types::InputAction`] and turns
//! activations on the board into swap requests through [`Selection`]. Nothing
//! here touches the engine state; the caller forwards the resulting swap.

pub mod map;
pub mod selection;

pub use tile_cascade_core as core;
pub use tile_cascade_types as types;

pub use map::{map_key, should_quit};
pub use selection::{Selection, SelectionOutcome};
