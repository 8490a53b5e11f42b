//! Tile Cascade (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so the binary, integration
//! tests and benches share a single import path.

pub use tile_cascade_core as core;
pub use tile_cascade_input as input;
pub use tile_cascade_term as term;
pub use tile_cascade_types as types;

pub mod cli;
pub mod trace;
