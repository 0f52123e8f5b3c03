//! Session controller
//!
//! Owns the fixed-tick frame loop for one game: poll quit/menu, take one
//! gesture sample, decode it, step the game, present. Everything the loop needs
//! from outside arrives through `SessionContext` and `Frontend`.

use std::time::{Duration, Instant};

use crate::gesture::GestureCommandDecoder;
use crate::highscores::Leaderboard;
use crate::platform::GestureSource;
use crate::settings::Settings;
use crate::sim::{Game, GameEvent, VariantKind};

/// Why `run_variant` returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitSignal {
    /// Leave the program
    Quit,
    /// Back to game selection
    Menu,
}

impl ExitSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitSignal::Quit => "quit",
            ExitSignal::Menu => "menu",
        }
    }
}

/// Out-of-band input polled once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlSignal {
    #[default]
    Continue,
    Quit,
    Menu,
}

/// Presentation side of the session (window, terminal, test harness)
pub trait Frontend {
    fn poll_control(&mut self) -> ControlSignal;

    /// Show the game after a step, along with what happened in it
    fn present(&mut self, game: &Game, events: &[GameEvent]);

    /// Ask for initials after a qualifying shooter score
    fn prompt_name(&mut self, score: u64) -> String;
}

/// Everything initialised once at program start and shared by every game
pub struct SessionContext {
    pub settings: Settings,
    pub leaderboard: Leaderboard,
    pub source: Box<dyn GestureSource>,
    /// Sleep to hold the tick rate; off for headless batch runs
    pub realtime: bool,
}

impl SessionContext {
    /// Build a context, loading the leaderboard named in `settings`
    pub fn new(settings: Settings, source: Box<dyn GestureSource>) -> Self {
        let leaderboard = Leaderboard::load(&settings.high_score_path);
        Self {
            settings,
            leaderboard,
            source,
            realtime: true,
        }
    }

    fn next_seed(&self) -> u64 {
        self.settings.seed.unwrap_or_else(rand::random)
    }
}

/// Sleeps out whatever is left of each tick
#[derive(Debug)]
pub struct FramePacer {
    tick: Duration,
    frame_start: Instant,
}

impl FramePacer {
    pub fn new(tick: Duration) -> Self {
        Self {
            tick,
            frame_start: Instant::now(),
        }
    }

    /// Time left in the current tick, zero when over budget
    pub fn remaining(&self) -> Duration {
        self.tick.saturating_sub(self.frame_start.elapsed())
    }

    pub fn wait(&mut self) {
        let sleep = self.remaining();
        if sleep > Duration::ZERO {
            std::thread::sleep(sleep);
        } else {
            log::debug!("frame over budget by {:?}", self.frame_start.elapsed() - self.tick);
        }
        self.frame_start = Instant::now();
    }
}

/// Play one game of `kind` until game over, quit, menu or end of input
pub fn run_variant(
    ctx: &mut SessionContext,
    kind: VariantKind,
    frontend: &mut dyn Frontend,
) -> ExitSignal {
    let seed = ctx.next_seed();
    let mut game = Game::new(kind, seed);
    let mut decoder = GestureCommandDecoder::with_params(
        kind.policy(),
        ctx.settings.gesture_window,
        ctx.settings.debounce_ticks,
    );
    let tick = ctx.settings.tick_duration();
    let mut pacer = FramePacer::new(tick);
    let started = Instant::now();
    let mut ticks: u32 = 0;

    loop {
        match frontend.poll_control() {
            ControlSignal::Continue => {}
            ControlSignal::Quit => return ExitSignal::Quit,
            ControlSignal::Menu => return ExitSignal::Menu,
        }

        let sample = ctx.source.next_sample();
        if sample.is_none() && ctx.source.is_finished() {
            log::info!(
                "gesture input ended after {} ticks, score {}",
                ticks,
                game.state().score
            );
            return ExitSignal::Quit;
        }

        let command = decoder.decode(sample);
        // Batch runs use simulated time so power-up expiry stays reproducible
        let now = if ctx.realtime {
            started.elapsed()
        } else {
            tick * ticks
        };
        let events = game.step(command, now);
        ticks = ticks.saturating_add(1);
        frontend.present(&game, &events);

        if game.is_over() {
            if kind.records_high_score() {
                record_high_score(ctx, game.state().score, frontend);
            }
            return ExitSignal::Menu;
        }

        if ctx.realtime {
            pacer.wait();
        }
    }
}

/// Offer a finished shooter score to the leaderboard and persist it
fn record_high_score(ctx: &mut SessionContext, score: u64, frontend: &mut dyn Frontend) {
    if !ctx.leaderboard.qualifies(score) {
        log::info!("score {score} did not make the leaderboard");
        return;
    }
    let name = frontend.prompt_name(score);
    if ctx.leaderboard.record(&name, score).is_some() {
        if let Err(err) = ctx.leaderboard.save(&ctx.settings.high_score_path) {
            log::warn!("failed to save high scores: {err}");
        }
    }
}
