//! Gesture Arcade entry point
//!
//! Headless runner: plays a game from a scripted gesture replay and reports
//! what happened. Camera/model frontends link the library directly.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use gesture_arcade::platform::{BoundedSource, GestureSource, ReplaySource};
use gesture_arcade::session::{ControlSignal, Frontend};
use gesture_arcade::sim::{Game, GameEvent, VariantKind};
use gesture_arcade::{Leaderboard, Result, SessionContext, Settings, run_variant};

#[derive(Debug, Parser)]
#[command(name = "gesture-arcade")]
#[command(about = "Gesture-controlled retro arcade (headless runner)")]
struct Cli {
    /// Settings file (JSON); defaults apply when it does not exist
    #[arg(long, default_value = "arcade_settings.json")]
    settings: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Play one game driven by a gesture replay
    Play {
        /// maze, breakout, crossing or shooter
        game: VariantKind,
        /// JSON array of gesture ids (null = no hand) per frame
        #[arg(long)]
        replay: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
        /// Initials recorded on a qualifying shooter score
        #[arg(long, default_value = "")]
        name: String,
        /// Hold the configured tick rate instead of running flat out
        #[arg(long, default_value_t = false)]
        realtime: bool,
        #[arg(long)]
        high_scores: Option<PathBuf>,
    },
    /// Print the leaderboard
    Scores {
        #[arg(long)]
        high_scores: Option<PathBuf>,
    },
}

/// Logs events and remembers the final state for the summary line
struct HeadlessFrontend {
    name: String,
    ticks: u64,
    last_score: u64,
    last_level: u32,
}

impl Frontend for HeadlessFrontend {
    fn poll_control(&mut self) -> ControlSignal {
        ControlSignal::Continue
    }

    fn present(&mut self, game: &Game, events: &[GameEvent]) {
        self.ticks += 1;
        self.last_score = game.state().score;
        self.last_level = game.state().level;
        for event in events {
            match event {
                GameEvent::Scored { .. } => log::debug!("tick {}: {:?}", self.ticks, event),
                _ => log::info!("tick {}: {:?}", self.ticks, event),
            }
        }
    }

    fn prompt_name(&mut self, score: u64) -> String {
        log::info!("score {score} qualifies for the leaderboard");
        self.name.clone()
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load(&cli.settings)?;

    match cli.command {
        Commands::Play {
            game,
            replay,
            seed,
            name,
            realtime,
            high_scores,
        } => {
            if seed.is_some() {
                settings.seed = seed;
            }
            if let Some(path) = high_scores {
                settings.high_score_path = path;
            }
            cmd_play(settings, game, &replay, name, realtime)
        }
        Commands::Scores { high_scores } => {
            let path = high_scores.unwrap_or(settings.high_score_path);
            cmd_scores(&path);
            Ok(())
        }
    }
}

fn cmd_play(
    settings: Settings,
    kind: VariantKind,
    replay: &Path,
    name: String,
    realtime: bool,
) -> Result<()> {
    let replay = ReplaySource::from_path(replay)?;
    let source: Box<dyn GestureSource> = if realtime {
        // Same acquisition path a camera pipeline takes
        Box::new(BoundedSource::spawn(replay, settings.acquisition_budget()))
    } else {
        Box::new(replay)
    };

    let mut ctx = SessionContext::new(settings, source);
    ctx.realtime = realtime;
    let mut frontend = HeadlessFrontend {
        name,
        ticks: 0,
        last_score: 0,
        last_level: 1,
    };

    let exit = run_variant(&mut ctx, kind, &mut frontend);
    println!(
        "{}: {} after {} ticks (score {}, level {}, time {:?})",
        kind,
        exit.as_str(),
        frontend.ticks,
        frontend.last_score,
        frontend.last_level,
        ctx.settings.tick_duration() * frontend.ticks as u32,
    );
    Ok(())
}

fn cmd_scores(path: &Path) {
    let board = Leaderboard::load(path);
    if board.is_empty() {
        println!("No high scores yet");
        return;
    }
    for (rank, entry) in board.entries().iter().enumerate() {
        println!("{:>2}. {:<3} {:>8}", rank + 1, entry.name, entry.score);
    }
}
