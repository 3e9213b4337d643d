use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ops;
use super::spawn::TileSource;

/// Side length of the board.
pub const SIZE: usize = 4;

pub type Rows = [[Tile; SIZE]; SIZE];
pub type Tile = u32;
pub type Score = u64;

/// Largest tile a 4x4 board can hold; doubling it still fits in a `Tile`.
pub const MAX_TILE: Tile = 1 << 17;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
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

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown direction {0:?}")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("cell ({row}, {col}) holds {value}, which is not a tile value")]
    InvalidTile { row: usize, col: usize, value: Tile },
}

/// 4x4 2048 grid of tile values; `0` marks an empty cell.
///
/// Cheap to copy. `shift` is pure; the stateful rules (score, win latch,
/// game over) live in [`Game`](super::Game).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Rows", into = "Rows")]
pub struct Grid(pub(crate) Rows);

impl Grid {
    /// A constant empty grid (all zeros).
    pub const EMPTY: Grid = Grid([[0; SIZE]; SIZE]);

    /// Borrow the rows of this grid, top to bottom.
    #[inline]
    pub fn rows(&self) -> &Rows {
        &self.0
    }

    /// Value at `(row, col)`; 0 if empty.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Tile {
        self.0[row][col]
    }

    /// Return the grid resulting from sliding/merging tiles in `dir` (no random insert).
    ///
    /// ```
    /// use twenty48::engine::{Direction, Grid};
    /// let g = Grid::try_from([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
    /// assert_eq!(g.shift(Direction::Left).rows()[0], [4, 0, 0, 0]);
    /// ```
    #[inline]
    pub fn shift(self, dir: Direction) -> Self {
        ops::slide(self, dir).grid
    }

    /// Place a 2 or 4 in a uniformly chosen empty cell. A full grid is returned unchanged.
    ///
    /// Deterministic example using a seeded RNG:
    /// ```
    /// use twenty48::engine::Grid;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let g = Grid::EMPTY.with_random_tile(&mut rng, 0.1).with_random_tile(&mut rng, 0.1);
    /// assert_eq!(g.count_empty(), 14);
    /// ```
    #[inline]
    pub fn with_random_tile<S: TileSource + ?Sized>(
        mut self,
        source: &mut S,
        four_probability: f64,
    ) -> Self {
        self.spawn(source, four_probability);
        self
    }

    /// In-place spawn; returns the `(row, col)` that was filled, if any.
    pub(crate) fn spawn<S: TileSource + ?Sized>(
        &mut self,
        source: &mut S,
        four_probability: f64,
    ) -> Option<(usize, usize)> {
        let empty = self.count_empty();
        if empty == 0 {
            return None;
        }
        let pick = source.pick_cell(empty).min(empty - 1);
        let value = source.pick_value(four_probability);
        let (row, col) = self.empty_cells().nth(pick)?;
        self.0[row][col] = value;
        Some((row, col))
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..SIZE)
            .flat_map(|row| (0..SIZE).map(move |col| (row, col)))
            .filter(|&(row, col)| self.0[row][col] == 0)
    }

    /// Count the number of empty cells on the grid.
    #[inline]
    pub fn count_empty(&self) -> usize {
        self.tiles().filter(|&t| t == 0).count()
    }

    /// Return the highest tile value present, or 0 for an empty grid.
    #[inline]
    pub fn highest_tile(&self) -> Tile {
        self.tiles().max().unwrap_or(0)
    }

    /// Sum of all tile values. Merging preserves it; spawning adds to it.
    #[inline]
    pub fn tile_sum(&self) -> u64 {
        self.tiles().map(u64::from).sum()
    }

    /// Return true if no empty cell and no equal neighbours remain.
    ///
    /// ```
    /// use twenty48::engine::Grid;
    /// assert!(!Grid::EMPTY.is_game_over());
    /// ```
    #[inline]
    pub fn is_game_over(&self) -> bool {
        ops::is_game_over(self)
    }

    /// Iterate over tile values in row-major order.
    #[inline]
    pub fn tiles(&self) -> TilesIter {
        TilesIter {
            rows: self.0,
            idx: 0,
        }
    }
}

impl TryFrom<Rows> for Grid {
    type Error = GridError;

    fn try_from(rows: Rows) -> Result<Self, Self::Error> {
        for (row, cells) in rows.iter().enumerate() {
            for (col, &value) in cells.iter().enumerate() {
                if value != 0 && (value < 2 || value > MAX_TILE || !value.is_power_of_two()) {
                    return Err(GridError::InvalidTile { row, col, value });
                }
            }
        }
        Ok(Grid(rows))
    }
}

impl From<Grid> for Rows {
    fn from(g: Grid) -> Self {
        g.0
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({:?})", self.0)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(SIZE * 8 - 1);
        for (i, row) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f, "{rule}")?;
            }
            let cells: Vec<String> = row.iter().map(|&v| format_val(v)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

fn format_val(val: Tile) -> String {
    match val {
        0 => " ".repeat(7),
        x => format!("{:^7}", x),
    }
}

/// Iterator over grid tiles in row-major order.
pub struct TilesIter {
    rows: Rows,
    idx: usize,
}

impl Iterator for TilesIter {
    type Item = Tile;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.idx >= SIZE * SIZE {
            return None;
        }
        let v = self.rows[self.idx / SIZE][self.idx % SIZE];
        self.idx += 1;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = SIZE * SIZE - self.idx.min(SIZE * SIZE);
        (left, Some(left))
    }
}

impl ExactSizeIterator for TilesIter {}

impl IntoIterator for &Grid {
    type Item = Tile;
    type IntoIter = TilesIter;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.tiles()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::spawn::ScriptedTiles;

    #[test]
    fn rejects_non_tile_values() {
        let err = Grid::try_from([[0, 3, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap_err();
        assert_eq!(err, GridError::InvalidTile { row: 0, col: 1, value: 3 });
        assert!(Grid::try_from([[1, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).is_err());
        assert!(Grid::try_from([[2, 4, 8, 65536], [0; 4], [0; 4], [0; 4]]).is_ok());
    }

    #[test]
    fn rejects_tiles_above_max() {
        assert!(Grid::try_from([[MAX_TILE, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).is_ok());
        let err = Grid::try_from([[0; 4], [0, 0, MAX_TILE * 2, 0], [0; 4], [0; 4]]).unwrap_err();
        assert_eq!(err, GridError::InvalidTile { row: 1, col: 2, value: MAX_TILE * 2 });
        let huge = 1u32 << 31;
        assert!(Grid::try_from([[huge, huge, 0, 0], [0; 4], [0; 4], [0; 4]]).is_err());
    }

    #[test]
    fn spawn_fills_the_picked_empty_cell() {
        let mut g = Grid::try_from([[2, 0, 4, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
        // Empty cells in row-major order: (0,1), (0,3), (1,0), ...
        let mut src = ScriptedTiles::new([(1, 4)]);
        assert_eq!(g.spawn(&mut src, 0.1), Some((0, 3)));
        assert_eq!(g.rows()[0], [2, 0, 4, 4]);
    }

    #[test]
    fn spawn_on_full_grid_is_noop() {
        let full =
            Grid::try_from([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]).unwrap();
        let mut g = full;
        let mut src = ScriptedTiles::new([(0, 2)]);
        assert_eq!(g.spawn(&mut src, 0.1), None);
        assert_eq!(g, full);
    }

    #[test]
    fn it_count_empty() {
        assert_eq!(Grid::EMPTY.count_empty(), 16);
        let g = Grid::try_from([[2, 2, 2, 2], [0; 4], [2, 2, 2, 2], [0; 4]]).unwrap();
        assert_eq!(g.count_empty(), 8);
        assert_eq!(g.tile_sum(), 16);
    }

    #[test]
    fn highest_tile_and_iteration() {
        let g = Grid::try_from([[0, 0, 0, 0], [0, 1024, 0, 0], [0; 4], [0, 0, 0, 8]]).unwrap();
        assert_eq!(g.highest_tile(), 1024);
        assert_eq!(g.tiles().nth(5), Some(1024));
        assert_eq!(g.tiles().len(), 16);
        assert_eq!(Grid::EMPTY.highest_tile(), 0);
    }

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("LEFT".parse::<Direction>(), Ok(Direction::Left));
        assert_eq!(" up ".parse::<Direction>(), Ok(Direction::Up));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn display_renders_four_rows() {
        let g = Grid::try_from([[2, 0, 0, 2048], [0; 4], [0; 4], [0; 4]]).unwrap();
        let text = g.to_string();
        assert_eq!(text.lines().count(), 7);
        assert!(text.lines().next().unwrap().contains("2048"));
    }
}
