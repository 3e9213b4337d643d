use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use twenty48::config::Config;
use twenty48::engine::{Game, Input};
use twenty48::input::{self, Command};
use twenty48::store::{self, JsonFileStore, KeyValueStore, MemoryStore};

#[derive(Parser, Debug)]
#[command(name = "twenty48", version, about = "Play 2048 in the terminal")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed the tile spawner for a reproducible game
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// JSON file to save the game to (overrides the config)
    #[arg(long, value_name = "FILE")]
    state: Option<PathBuf>,

    /// Start a new game even if a saved one exists
    #[arg(long)]
    fresh: bool,

    /// Log filter, e.g. "info" or "twenty48=debug"
    #[arg(long, default_value = "warn")]
    log: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log.as_str())).init();

    let config = match &args.config {
        Some(path) => Config::from_toml(path)?,
        None => Config::default(),
    };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = Game::with_source(config.rules, rng);

    let state_file = args.state.or(config.storage.state_file);
    let mut kv: Box<dyn KeyValueStore> = match &state_file {
        Some(path) => Box::new(JsonFileStore::new(path)),
        None => Box::new(MemoryStore::new()),
    };
    let key = config.storage.key;

    if !args.fresh {
        // Saved state is a cache: anything unreadable just means a new game.
        match store::load_snapshot(&*kv, &key) {
            Ok(Some(snapshot)) => {
                info!("resuming saved game (score {})", snapshot.score);
                game.restore(snapshot);
            }
            Ok(None) => {}
            Err(e) => warn!("ignoring saved game: {e}"),
        }
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut announced_win = game.won();
    render(&mut stdout, &game)?;

    for line in stdin.lock().lines() {
        let line = line?;
        let cmd = match line.parse::<Command>() {
            Ok(cmd) => cmd,
            Err(input::ParseInputError::Empty) => continue,
            Err(e) => {
                writeln!(stdout, "{e}")?;
                continue;
            }
        };
        let play = match cmd {
            Command::Quit => break,
            Command::Help => {
                writeln!(stdout, "{}", input::HELP)?;
                continue;
            }
            Command::Play(play) => play,
        };

        if matches!(play, Input::Reset) {
            announced_win = false;
        }
        let outcome = game.apply(play);
        if !outcome.moved {
            continue;
        }
        if let Err(e) = store::save_game(&mut *kv, &key, &game) {
            warn!("could not save game: {e}");
        }

        render(&mut stdout, &game)?;
        if game.won() && !announced_win {
            announced_win = true;
            writeln!(stdout, "You win! Keep going or type `new`.")?;
        }
        if game.is_game_over() {
            writeln!(stdout, "Game over. Type `new` to play again or `q` to quit.")?;
        }
    }
    Ok(())
}

fn render<W: Write, S>(out: &mut W, game: &Game<S>) -> io::Result<()> {
    writeln!(out, "Score: {} | Best: {}", game.score(), game.best_score())?;
    write!(out, "{}", game.grid())?;
    out.flush()
}
