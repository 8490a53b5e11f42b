//! Resolution engine - pure, deterministic, and testable
//!
//! This crate contains the rules of the cascade puzzle: a 9x9 board of
//! colored tiles, runs of three or more that clear, color skills that fire
//! when they do, and the chain reactions, gravity and refills that follow.
//! It has **no dependencies** on terminal, input, or timing code:
//!
//! - **Deterministic**: every random decision draws from one seeded [`SimpleRng`]
//! - **Observable**: every step is pushed to a [`GameObserver`] and recorded as a [`TurnEvent`]
//! - **Headless**: pacing is data (`TurnEvent::Pause`), never a sleep
//!
//! # Module Structure
//!
//! - [`board`]: 9x9 grid, neighborhoods, layouts and generation
//! - [`matcher`]: horizontal and vertical run detection
//! - [`effects`]: the seven color skills
//! - [`chain`]: primed and explosive tile propagation, frozen shatter waves
//! - [`gravity`]: column compaction and weighted refill
//! - [`moves`]: legal-move search
//! - [`turn`]: the swap-to-quiescence controller
//! - [`session`]: the game aggregate (board, RNG, level, score)
//! - [`level`], [`scoring`], [`spawn`]: objectives, points and tile creation
//! - [`config`], [`logging`]: environment configuration and the engine log
//!
//! # Turn Rules
//!
//! - **Swap**: two orthogonally adjacent, movable tiles; reverted unless a run
//!   forms through one of them
//! - **Gold**: a run of five leaves a gold tile; swapping gold with any tile
//!   sweeps away 26 cells
//! - **Cascades**: each iteration multiplies its score by the combo depth
//! - **Deadlock**: the board is reshuffled until a legal swap exists
//!
//! # Example
//!
//! ```
//! use tile_cascade_core::{find_possible_move, GameSession, TurnOutcome};
//!
//! let mut session = GameSession::new(12345);
//! let (a, b) = find_possible_move(session.board()).expect("fresh boards are playable");
//!
//! match session.request_swap(a, b) {
//!     TurnOutcome::Resolved(report) => assert!(report.score_gained > 0),
//!     other => panic!("unexpected outcome: {:?}", other),
//! }
//! assert!(session.board().is_full());
//! ```

pub mod board;
pub mod chain;
pub mod config;
pub mod effects;
pub mod error;
pub mod gravity;
pub mod level;
pub mod logging;
pub mod matcher;
pub mod moves;
pub mod observer;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod spawn;
pub mod turn;

pub use tile_cascade_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use chain::{build_frozen_waves, CascadeStep, Forge};
pub use config::GameConfig;
pub use effects::BallLightning;
pub use error::{BoardError, ConfigError, EngineError, EngineResult, LayoutError};
pub use gravity::{apply_gravity, GravityMove};
pub use level::{LevelConfig, LevelStatus, LevelTargets};
pub use matcher::{find_match_groups, has_matches, MatchGroup, MatchTier};
pub use moves::{find_possible_move, has_possible_moves};
pub use observer::{EventSink, GameObserver, NullObserver, TurnEvent};
pub use rng::SimpleRng;
pub use scoring::{wave_score, whirlwind_score};
pub use session::GameSession;
pub use snapshot::SessionSnapshot;
pub use spawn::{ColorWeights, TileFactory};
pub use turn::{InvalidMove, TurnOutcome, TurnReport};
