use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use twenty48::config::Config;
use twenty48::engine::{Direction, Game, Score, Tile};

/// Corner strategy: keep big tiles in the bottom-left and only go up when forced.
const PREFERENCE: [Direction; 4] = [
    Direction::Down,
    Direction::Left,
    Direction::Right,
    Direction::Up,
];

#[derive(Debug, Parser)]
#[command(name = "simulate", about = "Batch 2048 self-play with a fixed corner policy")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 1000)]
    games: u64,

    /// Base seed; game i uses seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Stop a game after this many accepted moves
    #[arg(long)]
    max_moves: Option<u64>,

    /// Path to a TOML configuration file (only [rules] is used)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy)]
struct GameResult {
    score: Score,
    moves: u64,
    highest_tile: Tile,
    won: bool,
}

fn play_one(game: &mut Game<StdRng>, max_moves: Option<u64>) -> GameResult {
    let mut moves = 0u64;
    while !game.is_game_over() {
        let Some(dir) = PREFERENCE.into_iter().find(|&d| game.can_move(d)) else {
            break;
        };
        game.make_move(dir);
        moves += 1;
        if max_moves.is_some_and(|limit| moves >= limit) {
            break;
        }
    }
    GameResult {
        score: game.score(),
        moves,
        highest_tile: game.grid().highest_tile(),
        won: game.won(),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let rules = match &args.config {
        Some(path) => Config::from_toml(path)?.rules,
        None => Default::default(),
    };

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(args.games);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} games ({eta})",
            )?
            .progress_chars("=>-"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    };

    let start = Instant::now();
    let results: Vec<GameResult> = (0..args.games)
        .into_par_iter()
        .map(|i| {
            let rng = StdRng::seed_from_u64(args.seed.wrapping_add(i));
            let mut game = Game::with_source(rules, rng);
            let r = play_one(&mut game, args.max_moves);
            debug!("game {i}: score {} in {} moves, highest {}", r.score, r.moves, r.highest_tile);
            pb.inc(1);
            r
        })
        .collect();
    pb.finish_and_clear();
    let elapsed = start.elapsed().as_secs_f64().max(1e-6);

    if results.is_empty() {
        println!("no games played");
        return Ok(());
    }

    let n = results.len() as f64;
    let total_moves: u64 = results.iter().map(|r| r.moves).sum();
    let mean_score = results.iter().map(|r| r.score as f64).sum::<f64>() / n;
    let best = results.iter().map(|r| r.score).max().unwrap_or(0);
    let wins = results.iter().filter(|r| r.won).count();
    let mut tiles: BTreeMap<Tile, usize> = BTreeMap::new();
    for r in &results {
        *tiles.entry(r.highest_tile).or_default() += 1;
    }

    info!("played {} games in {:.2}s", results.len(), elapsed);
    println!(
        "Games: {} | moves/sec: {:.1} | mean score: {:.1} | best score: {} | win rate: {:.2}%",
        results.len(),
        total_moves as f64 / elapsed,
        mean_score,
        best,
        100.0 * wins as f64 / n
    );
    println!("Highest tile distribution:");
    for (tile, count) in tiles.iter().rev() {
        println!("  {:>6}: {:>6} ({:.2}%)", tile, count, 100.0 * *count as f64 / n);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_policy_plays_to_the_end() {
        let mut game = Game::seeded(2024);
        let r = play_one(&mut game, None);
        assert!(game.is_game_over());
        assert!(r.moves > 0);
        assert!(r.highest_tile >= 8);
        assert_eq!(r.score, game.score());
    }

    #[test]
    fn move_cap_is_respected() {
        let mut game = Game::seeded(7);
        let r = play_one(&mut game, Some(10));
        assert_eq!(r.moves, 10);
    }
}
