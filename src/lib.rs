//! twenty48: the 2048 tile game as a small, deterministic engine
//!
//! This crate provides:
//! - A `Grid` type with pure helpers (`shift`, `with_random_tile`, `is_game_over`, ...)
//! - A stateful `Game` tracking score, best score, the win latch and game over
//! - A pluggable spawn source (`TileSource`); any `rand::Rng` works
//! - A line-oriented input adapter (`input`) and best-effort persistence (`store`)
//!
//! Quick start:
//! ```
//! use twenty48::engine::{Direction, Game, Grid};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic grid initialization with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let g0 = Grid::EMPTY.with_random_tile(&mut rng, 0.1).with_random_tile(&mut rng, 0.1);
//! let g1 = g0.shift(Direction::Left);
//! assert!(g1.tile_sum() == g0.tile_sum());
//!
//! // Or let `Game` keep score
//! let mut game = Game::seeded(42);
//! while !game.is_game_over() && game.score() < 64 {
//!     let dir = Direction::ALL
//!         .into_iter()
//!         .find(|&d| game.can_move(d))
//!         .unwrap();
//!     game.make_move(dir);
//! }
//! ```
//!
pub mod config;
pub mod engine;
pub mod input;
pub mod store;
