//! Terminal front end for the cascade puzzle.
//!
//! A small game-oriented rendering layer: no widget toolkit, just a
//! framebuffer that views draw into and a [`Screen`] that flushes the changed
//! spans to the terminal.
//!
//! - [`BoardView`] is pure: [`Scene`] in, framebuffer out
//! - [`Replay`] is pure: it steps a turn's event log onto a [`Scene`] at a
//!   given pace
//! - [`Screen`] is the only part that touches the terminal

pub mod board_view;
pub mod fb;
pub mod replay;
pub mod screen;

pub use tile_cascade_core as core;
pub use tile_cascade_types as types;

pub use board_view::{color_rgb, tile_glyph, BoardView, Scene, Viewport, LEVEL_COMPLETE};
pub use fb::{Cell, CellStyle, Emphasis, FrameBuffer, Rgb};
pub use replay::Replay;
pub use screen::{changed_spans, encode_frame, Screen};
