//! Engine module: the 4x4 grid, the slide/merge/spawn rules, and the
//! stateful `Game` built on top of them.
//!
//! - `Grid` is the plain board with pure helpers (`shift`, `with_random_tile`, ...).
//! - `Game` adds score, the win latch and the terminal flag.
//! - Randomness is pluggable through `TileSource`; every `rand::Rng` is one.

mod game;
mod ops;
mod spawn;
pub mod state;

pub use game::{Game, Input, MoveOutcome, Rules, Snapshot};
pub use ops::{is_game_over, slide, Slide};
pub use spawn::{ScriptedTiles, TileSource};
pub use state::{Direction, Grid, GridError, ParseDirectionError, Score, Tile, MAX_TILE, SIZE};
