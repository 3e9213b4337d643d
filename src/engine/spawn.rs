use std::collections::VecDeque;

use rand::Rng;

use super::state::Tile;

/// Source of randomness for tile spawns.
///
/// Every `rand::Rng` is a `TileSource`, so a seeded `StdRng` gives reproducible
/// games. [`ScriptedTiles`] replays a fixed sequence of picks instead.
pub trait TileSource {
    /// Index of the empty cell to fill, uniform in `0..empty`. `empty` is never 0.
    fn pick_cell(&mut self, empty: usize) -> usize;

    /// Value of the new tile: 4 with probability `four_probability`, else 2.
    fn pick_value(&mut self, four_probability: f64) -> Tile;
}

impl<R: Rng + ?Sized> TileSource for R {
    #[inline]
    fn pick_cell(&mut self, empty: usize) -> usize {
        self.gen_range(0..empty)
    }

    #[inline]
    fn pick_value(&mut self, four_probability: f64) -> Tile {
        if self.gen_bool(four_probability.clamp(0.0, 1.0)) {
            4
        } else {
            2
        }
    }
}

/// Deterministic source replaying `(cell index, value)` pairs in order.
///
/// Once the script runs out it keeps filling the first empty cell with a 2.
/// The cell index counts empty cells in row-major order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTiles {
    picks: VecDeque<(usize, Tile)>,
    pending_value: Option<Tile>,
}

impl ScriptedTiles {
    pub fn new<I: IntoIterator<Item = (usize, Tile)>>(picks: I) -> Self {
        Self {
            picks: picks.into_iter().collect(),
            pending_value: None,
        }
    }

    /// Number of picks not yet consumed.
    pub fn remaining(&self) -> usize {
        self.picks.len()
    }
}

impl TileSource for ScriptedTiles {
    fn pick_cell(&mut self, empty: usize) -> usize {
        match self.picks.pop_front() {
            Some((cell, value)) => {
                self.pending_value = Some(value);
                cell.min(empty.saturating_sub(1))
            }
            None => {
                self.pending_value = None;
                0
            }
        }
    }

    fn pick_value(&mut self, _four_probability: f64) -> Tile {
        self.pending_value.take().unwrap_or(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn rng_values_are_two_or_four() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut fours = 0;
        for _ in 0..10_000 {
            match rng.pick_value(0.1) {
                2 => {}
                4 => fours += 1,
                v => panic!("unexpected tile {v}"),
            }
        }
        // 10% expected; generous bounds keep this stable across rand versions.
        assert!((700..1300).contains(&fours), "fours = {fours}");
    }

    #[test]
    fn rng_cell_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for empty in 1..=16 {
            for _ in 0..50 {
                assert!(rng.pick_cell(empty) < empty);
            }
        }
    }

    #[test]
    fn probability_extremes() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!((0..100).all(|_| rng.pick_value(0.0) == 2));
        assert!((0..100).all(|_| rng.pick_value(1.0) == 4));
    }

    #[test]
    fn scripted_replays_then_falls_back() {
        let mut s = ScriptedTiles::new([(3, 4), (9, 2)]);
        assert_eq!(s.pick_cell(16), 3);
        assert_eq!(s.pick_value(0.1), 4);
        // Index clamped to the available empty cells.
        assert_eq!(s.pick_cell(5), 4);
        assert_eq!(s.pick_value(0.1), 2);
        assert_eq!(s.remaining(), 0);
        assert_eq!(s.pick_cell(5), 0);
        assert_eq!(s.pick_value(0.9), 2);
    }
}
