//! Timed power-up effects for the shooter
//!
//! Expiry is wall-clock: callers pass `now` as time since session start.
//! At most one instance of each kind is active; picking the same kind up again
//! only pushes its expiry out.

use std::collections::BTreeMap;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    RapidFire,
    MultiShot,
    Shield,
    SpeedBoost,
    ScoreMultiplier,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::RapidFire,
        PowerUpKind::MultiShot,
        PowerUpKind::Shield,
        PowerUpKind::SpeedBoost,
        PowerUpKind::ScoreMultiplier,
    ];

    /// How long the effect lasts once collected
    pub fn duration(&self) -> Duration {
        match self {
            PowerUpKind::RapidFire => Duration::from_secs(8),
            PowerUpKind::MultiShot => Duration::from_secs(8),
            PowerUpKind::Shield => Duration::from_secs(10),
            PowerUpKind::SpeedBoost => Duration::from_secs(8),
            PowerUpKind::ScoreMultiplier => Duration::from_secs(10),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::RapidFire => "rapid_fire",
            PowerUpKind::MultiShot => "multi_shot",
            PowerUpKind::Shield => "shield",
            PowerUpKind::SpeedBoost => "speed_boost",
            PowerUpKind::ScoreMultiplier => "score_multiplier",
        }
    }

    /// Uniform pick among the five kinds
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Player weapon/movement values, baseline unless an effect is active
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    /// Ticks between player shots
    pub shot_cooldown: u32,
    /// Fire a three-way spread
    pub multi_shot: bool,
    /// Player speed multiplier
    pub speed_multiplier: f32,
    /// Points multiplier
    pub score_multiplier: u32,
    /// Next hazard hit is absorbed
    pub shielded: bool,
}

/// Ticks between shots without rapid fire (500 ms at 60 Hz)
pub const BASE_SHOT_COOLDOWN: u32 = 30;
/// Ticks between shots with rapid fire
pub const RAPID_SHOT_COOLDOWN: u32 = 10;
pub const SPEED_BOOST: f32 = 1.5;
pub const SCORE_BOOST: u32 = 2;

impl Default for Loadout {
    fn default() -> Self {
        Self {
            shot_cooldown: BASE_SHOT_COOLDOWN,
            multi_shot: false,
            speed_multiplier: 1.0,
            score_multiplier: 1,
            shielded: false,
        }
    }
}

impl Loadout {
    fn apply(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::RapidFire => self.shot_cooldown = RAPID_SHOT_COOLDOWN,
            PowerUpKind::MultiShot => self.multi_shot = true,
            PowerUpKind::Shield => self.shielded = true,
            PowerUpKind::SpeedBoost => self.speed_multiplier = SPEED_BOOST,
            PowerUpKind::ScoreMultiplier => self.score_multiplier = SCORE_BOOST,
        }
    }

    fn revert(&mut self, kind: PowerUpKind) {
        let base = Loadout::default();
        match kind {
            PowerUpKind::RapidFire => self.shot_cooldown = base.shot_cooldown,
            PowerUpKind::MultiShot => self.multi_shot = base.multi_shot,
            PowerUpKind::Shield => self.shielded = base.shielded,
            PowerUpKind::SpeedBoost => self.speed_multiplier = base.speed_multiplier,
            PowerUpKind::ScoreMultiplier => self.score_multiplier = base.score_multiplier,
        }
    }
}

/// Registry of active effects keyed by kind
#[derive(Debug, Clone, Default)]
pub struct PowerUpManager {
    expires_at: BTreeMap<PowerUpKind, Duration>,
    loadout: Loadout,
}

impl PowerUpManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or refresh) an effect
    pub fn activate(&mut self, kind: PowerUpKind, now: Duration) {
        let expires_at = now + kind.duration();
        if self.expires_at.insert(kind, expires_at).is_none() {
            self.loadout.apply(kind);
            log::info!("power-up {} active until {:?}", kind.as_str(), expires_at);
        } else {
            log::debug!("power-up {} refreshed until {:?}", kind.as_str(), expires_at);
        }
    }

    /// Expire effects whose time is up; returns the kinds that ended
    pub fn tick(&mut self, now: Duration) -> Vec<PowerUpKind> {
        let expired: Vec<PowerUpKind> = self
            .expires_at
            .iter()
            .filter(|(_, at)| now >= **at)
            .map(|(kind, _)| *kind)
            .collect();

        for kind in &expired {
            self.deactivate(*kind);
            log::info!("power-up {} expired", kind.as_str());
        }
        expired
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.expires_at.contains_key(&kind)
    }

    pub fn expires_at(&self, kind: PowerUpKind) -> Option<Duration> {
        self.expires_at.get(&kind).copied()
    }

    pub fn active(&self) -> impl Iterator<Item = PowerUpKind> + '_ {
        self.expires_at.keys().copied()
    }

    pub fn loadout(&self) -> &Loadout {
        &self.loadout
    }

    /// Spend the shield on a hazard hit. Returns `true` when the hit was absorbed.
    pub fn absorb_hit(&mut self) -> bool {
        if self.is_active(PowerUpKind::Shield) {
            self.deactivate(PowerUpKind::Shield);
            log::info!("shield absorbed a hit");
            true
        } else {
            false
        }
    }

    /// Drop every effect (new session)
    pub fn clear(&mut self) {
        self.expires_at.clear();
        self.loadout = Loadout::default();
    }

    fn deactivate(&mut self, kind: PowerUpKind) {
        if self.expires_at.remove(&kind).is_some() {
            self.loadout.revert(kind);
        }
    }
}
