//! Pure grid operations: orientation transforms, the single "slide right"
//! row routine every direction goes through, and terminal detection.

use super::state::{Direction, Grid, Score, Tile, SIZE};

type Line = [Tile; SIZE];

/// Result of sliding a whole grid in one direction (no spawn).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub grid: Grid,
    /// Sum of the tiles created by merges.
    pub gained: Score,
    /// Values of the tiles created by merges, in line order.
    pub merged: Vec<Tile>,
    /// True if any line changed.
    pub moved: bool,
}

/// Result of sliding one normalized line toward its last index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LineSlide {
    pub line: Line,
    pub gained: Score,
    pub merges: [Tile; SIZE / 2],
    pub merge_count: usize,
}

/// Grid coordinate of element `k` of normalized line `i` for `dir`.
///
/// Normalized lines always slide toward index `SIZE - 1`, so the leading edge
/// of the move sits at the end of each line. The mapping is a bijection; it is
/// used both to gather lines out of the grid and to scatter them back, which
/// makes the inverse transform exact.
#[inline]
fn cell(dir: Direction, i: usize, k: usize) -> (usize, usize) {
    let last = SIZE - 1;
    match dir {
        Direction::Right => (i, k),
        Direction::Left => (i, last - k),
        Direction::Down => (k, i),
        Direction::Up => (last - k, i),
    }
}

#[inline]
fn gather(grid: &Grid, dir: Direction, i: usize) -> Line {
    let mut line = [0; SIZE];
    for (k, slot) in line.iter_mut().enumerate() {
        let (r, c) = cell(dir, i, k);
        *slot = grid.0[r][c];
    }
    line
}

#[inline]
fn scatter(grid: &mut Grid, dir: Direction, i: usize, line: &Line) {
    for (k, &v) in line.iter().enumerate() {
        let (r, c) = cell(dir, i, k);
        grid.0[r][c] = v;
    }
}

/// Compact a line toward its end and merge equal neighbours, nearest the end first.
///
/// Each tile takes part in at most one merge, so `[4, 4, 4, 4]` becomes
/// `[0, 0, 8, 8]` rather than `[0, 0, 0, 16]`.
pub(crate) fn slide_line_right(line: Line) -> LineSlide {
    // Nonzero tiles read from the merge-target end.
    let mut compact = [0; SIZE];
    let mut n = 0;
    for &v in line.iter().rev() {
        if v != 0 {
            compact[n] = v;
            n += 1;
        }
    }

    let mut out = [0; SIZE];
    let mut merges = [0; SIZE / 2];
    let mut merge_count = 0;
    let mut gained: Score = 0;
    let mut write = SIZE;
    let mut idx = 0;
    while idx < n {
        let v = compact[idx];
        write -= 1;
        if idx + 1 < n && compact[idx + 1] == v {
            let doubled = v * 2;
            out[write] = doubled;
            gained += Score::from(doubled);
            merges[merge_count] = doubled;
            merge_count += 1;
            idx += 2;
        } else {
            out[write] = v;
            idx += 1;
        }
    }

    LineSlide {
        line: out,
        gained,
        merges,
        merge_count,
    }
}

/// Slide/merge every line of `grid` toward `dir`. No randomness.
pub fn slide(grid: Grid, dir: Direction) -> Slide {
    let mut next = grid;
    let mut gained = 0;
    let mut merged = Vec::new();
    let mut moved = false;
    for i in 0..SIZE {
        let before = gather(&grid, dir, i);
        let after = slide_line_right(before);
        if after.line != before {
            moved = true;
        }
        gained += after.gained;
        merged.extend_from_slice(&after.merges[..after.merge_count]);
        scatter(&mut next, dir, i, &after.line);
    }
    Slide {
        grid: next,
        gained,
        merged,
        moved,
    }
}

/// True iff the grid is full and no two row- or column-adjacent cells match.
pub fn is_game_over(grid: &Grid) -> bool {
    let g = &grid.0;
    for i in 0..SIZE {
        for j in 0..SIZE {
            if g[i][j] == 0 {
                return false;
            }
            if j + 1 < SIZE && g[i][j] == g[i][j + 1] {
                return false;
            }
            if i + 1 < SIZE && g[i][j] == g[i + 1][j] {
                return false;
            }
        }
    }
    true
}
