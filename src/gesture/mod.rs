//! Gesture command decoding
//!
//! The classifier produces one gesture id per camera frame, and it is noisy:
//! a single frame often flips to a neighbouring class. Commands are therefore
//! taken from a majority vote over the last few frames, and the crossing game
//! additionally debounces them so one held gesture produces one hop.

mod window;

pub use window::CommandWindow;

use serde::{Deserialize, Serialize};

use crate::consts::{DEBOUNCE_TICKS, GESTURE_WINDOW};

/// One classifier result for an acquired frame.
///
/// `gesture_id` is `None` when the frame was read but no hand was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GestureSample {
    pub gesture_id: Option<u8>,
}

impl GestureSample {
    pub fn hand(gesture_id: u8) -> Self {
        Self {
            gesture_id: Some(gesture_id),
        }
    }

    pub fn no_hand() -> Self {
        Self { gesture_id: None }
    }
}

/// Discrete player command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Command {
    Left,
    Right,
    Up,
    Down,
    Action,
    #[default]
    None,
}

impl Command {
    /// Fixed gesture table: 2=left, 4=right, 3=up, 5=down, 1=action.
    pub fn from_gesture(id: u8) -> Self {
        match id {
            1 => Command::Action,
            2 => Command::Left,
            3 => Command::Up,
            4 => Command::Right,
            5 => Command::Down,
            _ => Command::None,
        }
    }

    pub fn is_direction(&self) -> bool {
        matches!(
            self,
            Command::Left | Command::Right | Command::Up | Command::Down
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Left => "left",
            Command::Right => "right",
            Command::Up => "up",
            Command::Down => "down",
            Command::Action => "action",
            Command::None => "none",
        }
    }
}

/// How decoded votes turn into commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecoderPolicy {
    /// Every frame reports the current vote (steering, paddles, shooting)
    Continuous,
    /// A vote fires once, then waits for a different vote and a cooldown
    Debounced,
}

/// Turns the per-frame gesture stream into commands.
#[derive(Debug, Clone)]
pub struct GestureCommandDecoder {
    policy: DecoderPolicy,
    window: CommandWindow,
    /// Last voted gesture id (debounced policy only)
    last_vote: Option<u8>,
    cooldown: u32,
    cooldown_ticks: u32,
}

impl GestureCommandDecoder {
    pub fn new(policy: DecoderPolicy) -> Self {
        Self::with_params(policy, GESTURE_WINDOW, DEBOUNCE_TICKS)
    }

    pub fn with_params(policy: DecoderPolicy, window_len: usize, cooldown_ticks: u32) -> Self {
        Self {
            policy,
            window: CommandWindow::new(window_len),
            last_vote: None,
            cooldown: 0,
            cooldown_ticks,
        }
    }

    pub fn policy(&self) -> DecoderPolicy {
        self.policy
    }

    pub fn window(&self) -> &CommandWindow {
        &self.window
    }

    /// Remaining debounce frames
    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Feed one frame's result and get the command for this frame.
    ///
    /// `None` means no frame could be acquired at all. The window is left
    /// untouched and no command is produced, but the debounce cooldown still
    /// counts the frame.
    pub fn decode(&mut self, sample: Option<GestureSample>) -> Command {
        let Some(sample) = sample else {
            if self.policy == DecoderPolicy::Debounced {
                self.cooldown = self.cooldown.saturating_sub(1);
            }
            return Command::None;
        };

        if let Some(id) = sample.gesture_id {
            self.window.push(id);
        }

        match self.policy {
            DecoderPolicy::Continuous => self
                .window
                .majority()
                .map(Command::from_gesture)
                .unwrap_or_default(),
            DecoderPolicy::Debounced => self.decode_debounced(),
        }
    }

    fn decode_debounced(&mut self) -> Command {
        let mut command = Command::None;

        let vote = if self.cooldown == 0 {
            self.window.majority()
        } else {
            None
        };

        if let Some(vote) = vote.filter(|v| self.last_vote != Some(*v)) {
            let candidate = Command::from_gesture(vote);
            if candidate.is_direction() {
                self.cooldown = self.cooldown_ticks;
                command = candidate;
                log::debug!("debounced command honoured: {}", command.as_str());
            }
            self.last_vote = Some(vote);
        }

        self.cooldown = self.cooldown.saturating_sub(1);
        command
    }

    /// Forget all history (new session)
    pub fn reset(&mut self) {
        self.window.clear();
        self.last_vote = None;
        self.cooldown = 0;
    }
}
