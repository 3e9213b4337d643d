//! Property tests over random move sequences.
//!
//! Invariants covered:
//! - score never decreases and grows by exactly the merged tile values;
//! - accepted moves conserve the tile sum apart from the spawned tile;
//! - moves without merges keep the multiset of existing tiles;
//! - blocked moves and moves after game over change nothing;
//! - every tile stays a power of two >= 2 and `won` never unlatches.
use proptest::prelude::*;
use twenty48::engine::{Direction, Game, Grid, ScriptedTiles, Tile};

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

fn sorted_tiles(g: &Grid) -> Vec<Tile> {
    let mut v: Vec<Tile> = g.tiles().filter(|&t| t != 0).collect();
    v.sort_unstable();
    v
}

fn without_one(mut tiles: Vec<Tile>, value: Tile) -> Vec<Tile> {
    if let Some(pos) = tiles.iter().position(|&t| t == value) {
        tiles.remove(pos);
    }
    tiles
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn move_invariants_hold(seed in any::<u64>(), moves in prop::collection::vec(direction(), 1..300)) {
        let mut game = Game::seeded(seed);
        let mut was_won = false;
        for dir in moves {
            let before = game.snapshot();
            let out = game.make_move(dir);
            let after = game.snapshot();

            prop_assert!(after.score >= before.score);
            prop_assert_eq!(after.score - before.score, out.score_gained);
            prop_assert_eq!(out.score_gained, out.merged.iter().map(|&t| u64::from(t)).sum::<u64>());
            prop_assert!(after.grid.tiles().all(|t| t == 0 || (t >= 2 && t.is_power_of_two())));

            if out.moved {
                let (r, c) = out.spawned.expect("accepted move always has room to spawn");
                let spawned = after.grid.get(r, c);
                prop_assert!(spawned == 2 || spawned == 4);
                prop_assert_eq!(after.grid.tile_sum(), before.grid.tile_sum() + u64::from(spawned));
                if out.merged.is_empty() {
                    prop_assert_eq!(without_one(sorted_tiles(&after.grid), spawned), sorted_tiles(&before.grid));
                }
            } else {
                prop_assert_eq!(&after, &before);
            }

            prop_assert!(!was_won || after.won);
            was_won = after.won;
            prop_assert_eq!(after.game_over, after.grid.is_game_over());
            prop_assert!(after.best_score >= after.score);
        }
    }

    #[test]
    fn blocked_direction_is_idempotent(seed in any::<u64>(), dir in direction()) {
        let mut game = Game::seeded(seed);
        // Slide until the direction is exhausted; the next attempt must be a no-op.
        for _ in 0..64 {
            if !game.can_move(dir) {
                break;
            }
            game.make_move(dir);
        }
        if !game.can_move(dir) {
            let before = game.snapshot();
            let out = game.make_move(dir);
            prop_assert!(!out.moved);
            prop_assert_eq!(out.spawned, None);
            prop_assert_eq!(game.snapshot(), before);
        }
    }

    #[test]
    fn shift_matches_game_move(seed in any::<u64>(), dir in direction()) {
        let mut game = Game::seeded(seed);
        let before = *game.grid();
        let pure = before.shift(dir);
        let out = game.make_move(dir);
        prop_assert_eq!(out.moved, pure != before);
        if let Some((r, c)) = out.spawned {
            // Apart from the spawned cell the game grid equals the pure shift.
            for row in 0..4 {
                for col in 0..4 {
                    if (row, col) != (r, c) {
                        prop_assert_eq!(game.grid().get(row, col), pure.get(row, col));
                    }
                }
            }
        }
    }
}

#[test]
fn spec_scenarios() {
    let cases: [([Tile; 4], Direction, [Tile; 4], u64); 3] = [
        ([2, 2, 0, 0], Direction::Left, [4, 0, 0, 0], 4),
        ([2, 0, 2, 2], Direction::Left, [4, 2, 0, 0], 4),
        ([4, 4, 4, 4], Direction::Right, [0, 0, 8, 8], 16),
    ];
    for (row, dir, expected, gained) in cases {
        let grid = Grid::try_from([row, [0; 4], [0; 4], [0; 4]]).unwrap();
        // Spawn into the last empty cell so row 0 is left alone.
        let mut game = Game::from_grid(grid, Default::default(), ScriptedTiles::new([(15, 2)]));
        let out = game.make_move(dir);
        assert!(out.moved);
        assert_eq!(game.grid().rows()[0], expected, "{row:?} {dir}");
        assert_eq!(game.score(), gained);
    }
}

#[test]
fn checkerboard_is_terminal() {
    let grid = Grid::try_from([[2, 4, 8, 16], [32, 64, 128, 256], [2, 4, 8, 16], [32, 64, 128, 256]]).unwrap();
    let mut game = Game::from_grid(grid, Default::default(), ScriptedTiles::default());
    assert!(game.is_game_over());
    for dir in Direction::ALL {
        assert!(!game.make_move(dir).moved);
        assert_eq!(game.grid(), &grid);
    }
}
