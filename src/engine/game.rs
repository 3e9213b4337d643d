use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::ops;
use super::spawn::TileSource;
use super::state::{Direction, Grid, Score, Tile};

/// Tunable rules. Defaults are the classic game: win at 2048, 10% fours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Merging into this value latches `won`.
    pub target_tile: Tile,
    /// Probability that a spawned tile is a 4 rather than a 2.
    pub four_probability: f64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            target_tile: 2048,
            four_probability: 0.1,
        }
    }
}

/// Discrete events accepted from the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Move(Direction),
    Reset,
}

/// What a single `make_move` call did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    /// False when the move was blocked or the game is over; nothing changed then.
    pub moved: bool,
    pub score_gained: Score,
    /// Values of the tiles created by merges.
    pub merged: Vec<Tile>,
    /// Cell that received the new tile.
    pub spawned: Option<(usize, usize)>,
}

impl MoveOutcome {
    fn blocked() -> Self {
        Self::default()
    }
}

/// Observable game state, also the persisted form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub grid: Grid,
    pub score: Score,
    #[serde(default)]
    pub best_score: Score,
    pub won: bool,
    pub game_over: bool,
}

/// A running 2048 game: grid, score, win latch and terminal flag.
///
/// Randomness comes from `S`; any `rand::Rng` works, so seeded games are
/// reproducible.
///
/// ```
/// use twenty48::engine::{Direction, Game};
/// let mut game = Game::seeded(42);
/// assert_eq!(game.grid().count_empty(), 14);
/// let before = game.score();
/// game.make_move(Direction::Left);
/// assert!(game.score() >= before);
/// ```
#[derive(Debug, Clone)]
pub struct Game<S = StdRng> {
    grid: Grid,
    score: Score,
    best_score: Score,
    won: bool,
    over: bool,
    rules: Rules,
    tiles: S,
}

impl Game<StdRng> {
    /// New game with default rules and an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_source(Rules::default(), StdRng::from_entropy())
    }

    /// New game with default rules and a deterministic RNG.
    pub fn seeded(seed: u64) -> Self {
        Self::with_source(Rules::default(), StdRng::seed_from_u64(seed))
    }
}

impl Default for Game<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TileSource> Game<S> {
    /// New game with two random tiles placed.
    pub fn with_source(rules: Rules, tiles: S) -> Self {
        let mut game = Self::from_grid(Grid::EMPTY, rules, tiles);
        game.initialize();
        game
    }

    /// Adopt an existing grid as-is (no spawn), score 0.
    ///
    /// `won` is set when the grid already holds the target tile; `game_over`
    /// is computed from the grid.
    pub fn from_grid(grid: Grid, rules: Rules, tiles: S) -> Self {
        Self {
            grid,
            score: 0,
            best_score: 0,
            won: grid.highest_tile() >= rules.target_tile,
            over: ops::is_game_over(&grid),
            rules,
            tiles,
        }
    }

    /// Start over: empty grid plus two random tiles, score 0, flags cleared.
    ///
    /// The best score survives.
    pub fn initialize(&mut self) {
        self.grid = Grid::EMPTY;
        self.score = 0;
        self.won = false;
        self.over = false;
        self.spawn_random_tile();
        self.spawn_random_tile();
        debug!("new game:\n{}", self.grid);
    }

    /// Place a 2 (or sometimes a 4) in a random empty cell; no-op on a full grid.
    pub fn spawn_random_tile(&mut self) -> Option<(usize, usize)> {
        self.grid.spawn(&mut self.tiles, self.rules.four_probability)
    }

    /// Slide and merge toward `dir`, then spawn a tile if anything moved.
    ///
    /// Blocked moves, and every move once the game is over, leave the game
    /// untouched and return an outcome with `moved == false`.
    pub fn make_move(&mut self, dir: Direction) -> MoveOutcome {
        if self.over {
            return MoveOutcome::blocked();
        }
        let slide = ops::slide(self.grid, dir);
        if !slide.moved {
            debug!("{dir}: blocked");
            return MoveOutcome::blocked();
        }

        if !self.won && slide.merged.contains(&self.rules.target_tile) {
            self.won = true;
            info!("reached {} with score {}", self.rules.target_tile, self.score + slide.gained);
        }

        self.grid = slide.grid;
        let spawned = self.spawn_random_tile();
        self.score += slide.gained;
        self.best_score = self.best_score.max(self.score);
        self.over = ops::is_game_over(&self.grid);
        debug!("{dir}: +{} (score {}), spawned at {:?}", slide.gained, self.score, spawned);
        if self.over {
            info!("game over with score {}, highest tile {}", self.score, self.grid.highest_tile());
        }

        MoveOutcome {
            moved: true,
            score_gained: slide.gained,
            merged: slide.merged,
            spawned,
        }
    }

    /// Route an input event. Resets report `moved == true`.
    pub fn apply(&mut self, input: Input) -> MoveOutcome {
        match input {
            Input::Move(dir) => self.make_move(dir),
            Input::Reset => {
                info!("reset at score {}", self.score);
                self.initialize();
                MoveOutcome {
                    moved: true,
                    ..MoveOutcome::default()
                }
            }
        }
    }

    /// Replace the observable state with `snapshot`.
    ///
    /// `game_over` is recomputed from the grid rather than trusted.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.grid = snapshot.grid;
        self.score = snapshot.score;
        self.best_score = self.best_score.max(snapshot.best_score).max(snapshot.score);
        self.won = snapshot.won;
        self.over = ops::is_game_over(&self.grid);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid,
            score: self.score,
            best_score: self.best_score,
            won: self.won,
            game_over: self.over,
        }
    }

    /// True when a move in `dir` would change the grid.
    #[inline]
    pub fn can_move(&self, dir: Direction) -> bool {
        !self.over && ops::slide(self.grid, dir).moved
    }
}

impl<S> Game<S> {
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn score(&self) -> Score {
        self.score
    }

    #[inline]
    pub fn best_score(&self) -> Score {
        self.best_score
    }

    #[inline]
    pub fn won(&self) -> bool {
        self.won
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.over
    }

    #[inline]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }
}
